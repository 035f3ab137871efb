//! Per-tick forecasting: vessel state, burn estimates, and event predictions.
//!
//! [`Forecaster`] owns every cache. [`ForecastPlugin`] drives it from Bevy's
//! `Update` schedule and publishes a [`ForecastReport`] each frame.

use bevy::prelude::*;

use crate::burn::{BurnEstimate, BurnInputs, estimate_burn};
use crate::context::FlightContext;
use crate::prediction::{
    AtmospherePredictor, ClosestApproachPredictor, EventForecast, EventPrediction,
    ImpactPredictor, ManeuverPredictor, PredictionInput, PredictionOutcome, PredictorSlot,
};
use crate::settings::ForecastSettings;
use crate::types::{Clock, ForecastSystems, SimulationTime};
use crate::vessel::{StateChange, ThrustAggregate, VesselStateCache, aggregate_thrust};

/// Plugin running the forecaster every frame.
///
/// Requires a [`SimulationTime`] resource (see [`TimePlugin`](crate::time::TimePlugin)).
/// Hosts insert a [`FlightContext`] while a vessel is active.
pub struct ForecastPlugin;

impl Plugin for ForecastPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ForecastSettings>()
            .init_resource::<Forecaster>()
            .init_resource::<ForecastReport>()
            .configure_sets(
                Update,
                (ForecastSystems::VesselState, ForecastSystems::Predict).chain(),
            )
            .add_systems(Startup, validate_settings)
            .add_systems(
                Update,
                (
                    refresh_vessel_state.in_set(ForecastSystems::VesselState),
                    publish_forecast.in_set(ForecastSystems::Predict),
                ),
            );
    }
}

/// Forecasts published for the presentation layer.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct ForecastReport {
    /// Universal time the report was built at (s)
    pub ut: f64,
    /// Vessel mass at the last snapshot (t)
    pub mass: f64,
    /// Net thrust (kN)
    pub thrust: f64,
    pub impact: Option<EventForecast>,
    pub closest_approach: Option<EventForecast>,
    pub atmosphere: Option<EventForecast>,
    pub maneuver: Option<EventForecast>,
}

impl ForecastReport {
    /// All present forecasts, soonest first.
    pub fn upcoming(&self) -> Vec<&EventForecast> {
        let mut events: Vec<&EventForecast> = [
            &self.impact,
            &self.closest_approach,
            &self.atmosphere,
            &self.maneuver,
        ]
        .into_iter()
        .flatten()
        .collect();
        events.sort_by(|a, b| a.prediction.event_ut.total_cmp(&b.prediction.event_ut));
        events
    }
}

/// Caches and predictors for the active vessel.
#[derive(Resource, Clone, Debug, Default)]
pub struct Forecaster {
    vessel: VesselStateCache,
    thrust: ThrustAggregate,
    impact: PredictorSlot<ImpactPredictor>,
    approach: PredictorSlot<ClosestApproachPredictor>,
    atmosphere: PredictorSlot<AtmospherePredictor>,
    maneuver: PredictorSlot<ManeuverPredictor>,
}

impl Forecaster {
    /// Refresh the vessel snapshot if due and re-aggregate thrust.
    ///
    /// With no context the vessel is forgotten and every prediction resets.
    pub fn update_vessel(
        &mut self,
        ctx: Option<&FlightContext>,
        clock: Clock,
        settings: &ForecastSettings,
    ) -> StateChange {
        let Some(ctx) = ctx else {
            self.vessel.clear();
            self.thrust = ThrustAggregate::default();
            self.reset_predictions();
            return StateChange::Unchanged;
        };

        self.vessel.set_refresh_interval(settings.refresh_interval);
        let change = self
            .vessel
            .update(&ctx.vessel, clock.real, settings.infinite_propellant);
        if change == StateChange::Rebuilt {
            self.invalidate_predictions();
        }

        self.thrust = self
            .vessel
            .snapshot()
            .map(|snapshot| aggregate_thrust(snapshot, settings.infinite_propellant))
            .unwrap_or_default();
        change
    }

    /// Burn needed for a velocity change of `required_dv` with the current vessel.
    pub fn predict_burn(&self, required_dv: f64, settings: &ForecastSettings) -> BurnEstimate {
        let Some(snapshot) = self.vessel.snapshot() else {
            return BurnEstimate::no_thrust(required_dv.max(0.0));
        };
        estimate_burn(
            required_dv,
            BurnInputs::new(snapshot, &self.thrust),
            settings.burn_model(),
        )
    }

    pub fn predict_impact(
        &mut self,
        ctx: Option<&FlightContext>,
        clock: Clock,
        settings: &ForecastSettings,
    ) -> PredictionOutcome<EventPrediction> {
        let input = prediction_input(ctx, &self.vessel, clock);
        self.impact.update(input, clock.real, settings).clone()
    }

    pub fn predict_closest_approach(
        &mut self,
        ctx: Option<&FlightContext>,
        clock: Clock,
        settings: &ForecastSettings,
    ) -> PredictionOutcome<EventPrediction> {
        let input = prediction_input(ctx, &self.vessel, clock);
        self.approach.update(input, clock.real, settings).clone()
    }

    pub fn predict_atmosphere_transition(
        &mut self,
        ctx: Option<&FlightContext>,
        clock: Clock,
        settings: &ForecastSettings,
    ) -> PredictionOutcome<EventPrediction> {
        let input = prediction_input(ctx, &self.vessel, clock);
        self.atmosphere.update(input, clock.real, settings).clone()
    }

    pub fn predict_maneuver(
        &mut self,
        ctx: Option<&FlightContext>,
        clock: Clock,
        settings: &ForecastSettings,
    ) -> PredictionOutcome<EventPrediction> {
        let input = prediction_input(ctx, &self.vessel, clock);
        self.maneuver.update(input, clock.real, settings).clone()
    }

    /// Run every predictor and pair each event with its burn.
    pub fn build_report(
        &mut self,
        ctx: Option<&FlightContext>,
        clock: Clock,
        settings: &ForecastSettings,
    ) -> ForecastReport {
        let impact = self.predict_impact(ctx, clock, settings);
        let closest_approach = self.predict_closest_approach(ctx, clock, settings);
        let atmosphere = self.predict_atmosphere_transition(ctx, clock, settings);
        let maneuver = self.predict_maneuver(ctx, clock, settings);

        ForecastReport {
            ut: clock.ut,
            mass: self.vessel.snapshot().map_or(0.0, |snapshot| snapshot.total_mass),
            thrust: self.thrust.thrust,
            impact: self.forecast(impact, settings),
            closest_approach: self.forecast(closest_approach, settings),
            atmosphere: self.forecast(atmosphere, settings),
            maneuver: self.forecast(maneuver, settings),
        }
    }

    /// Full tick: vessel refresh followed by the report.
    pub fn tick(
        &mut self,
        ctx: Option<&FlightContext>,
        clock: Clock,
        settings: &ForecastSettings,
    ) -> ForecastReport {
        self.update_vessel(ctx, clock, settings);
        self.build_report(ctx, clock, settings)
    }

    pub fn thrust(&self) -> &ThrustAggregate {
        &self.thrust
    }

    pub fn vessel_state(&self) -> &VesselStateCache {
        &self.vessel
    }

    fn forecast(
        &self,
        outcome: PredictionOutcome<EventPrediction>,
        settings: &ForecastSettings,
    ) -> Option<EventForecast> {
        let prediction = outcome.into_ready()?;
        let burn = prediction
            .required_dv
            .map(|dv| self.predict_burn(dv, settings));
        Some(EventForecast::new(prediction, burn))
    }

    fn invalidate_predictions(&mut self) {
        self.impact.invalidate();
        self.approach.invalidate();
        self.atmosphere.invalidate();
        self.maneuver.invalidate();
    }

    fn reset_predictions(&mut self) {
        self.impact.reset();
        self.approach.reset();
        self.atmosphere.reset();
        self.maneuver.reset();
    }
}

fn prediction_input<'a>(
    ctx: Option<&'a FlightContext>,
    vessel: &'a VesselStateCache,
    clock: Clock,
) -> Option<PredictionInput<'a>> {
    ctx.map(|ctx| PredictionInput::new(ctx, clock.ut).with_inventory(vessel.inventory()))
}

/// Fall back to defaults if the configured settings are unusable.
fn validate_settings(mut settings: ResMut<ForecastSettings>) {
    if let Err(err) = settings.validate() {
        warn!("Ignoring forecast settings: {err}; using defaults");
        *settings = ForecastSettings::default();
    }
}

fn clock(time: &Time, sim_time: &SimulationTime) -> Clock {
    Clock::new(time.elapsed_secs_f64(), sim_time.current)
}

fn refresh_vessel_state(
    mut forecaster: ResMut<Forecaster>,
    ctx: Option<Res<FlightContext>>,
    settings: Res<ForecastSettings>,
    time: Res<Time>,
    sim_time: Res<SimulationTime>,
) {
    let change = forecaster.update_vessel(ctx.as_deref(), clock(&time, &sim_time), &settings);
    if let (StateChange::Rebuilt, Some(ctx)) = (change, ctx.as_deref()) {
        debug!(
            "Vessel '{}' changed structure, {} engines active",
            ctx.vessel.name,
            forecaster.thrust().firing_engines
        );
    }
}

fn publish_forecast(
    mut forecaster: ResMut<Forecaster>,
    mut report: ResMut<ForecastReport>,
    ctx: Option<Res<FlightContext>>,
    settings: Res<ForecastSettings>,
    time: Res<Time>,
    sim_time: Res<SimulationTime>,
) {
    *report = forecaster.build_report(ctx.as_deref(), clock(&time, &sim_time), &settings);
}
