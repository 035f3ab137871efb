//! Time-to-live cache for throttled computations.
//!
//! Expensive forecasts run at most once per refresh interval and serve
//! their last value in between. An explicit [`Throttled::invalidate`]
//! forces the next call to recompute (used on structural vessel changes).

/// A value recomputed at most once per `ttl` seconds.
#[derive(Clone, Debug)]
pub struct Throttled<T> {
    value: T,
    last_computed_at: Option<f64>,
    ttl: f64,
}

impl<T: Default> Default for Throttled<T> {
    fn default() -> Self {
        Self::new(crate::types::DEFAULT_REFRESH_INTERVAL, T::default())
    }
}

impl<T> Throttled<T> {
    pub fn new(ttl: f64, initial: T) -> Self {
        Self {
            value: initial,
            last_computed_at: None,
            ttl,
        }
    }

    pub fn ttl(&self) -> f64 {
        self.ttl
    }

    pub fn set_ttl(&mut self, ttl: f64) {
        self.ttl = ttl;
    }

    /// True if the value must be recomputed at time `now`.
    ///
    /// A clock that went backwards (host reload) also counts as stale.
    pub fn is_stale(&self, now: f64) -> bool {
        match self.last_computed_at {
            None => true,
            Some(at) => now < at || now - at >= self.ttl,
        }
    }

    pub fn last_computed_at(&self) -> Option<f64> {
        self.last_computed_at
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Store a freshly computed value.
    pub fn store(&mut self, now: f64, value: T) {
        self.value = value;
        self.last_computed_at = Some(now);
    }

    /// Replace the value without touching the refresh schedule.
    pub fn overwrite(&mut self, value: T) {
        self.value = value;
    }

    /// Force recomputation on the next access.
    pub fn invalidate(&mut self) {
        self.last_computed_at = None;
    }

    /// Recompute with `compute` if stale, then return the current value.
    ///
    /// `compute` receives the previous value so it can degrade to it.
    pub fn refresh_with(&mut self, now: f64, compute: impl FnOnce(&T) -> T) -> &T {
        if self.is_stale(now) {
            let value = compute(&self.value);
            self.store(now, value);
        }
        &self.value
    }
}
