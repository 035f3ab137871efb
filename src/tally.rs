//! Per-propellant scalar bookkeeping.
//!
//! A [`ResourceTally`] maps a propellant kind to a mass (tons) or a mass
//! flow rate (tons per second). Absent kinds are an implicit zero.

use std::collections::BTreeMap;
use std::ops::Index;

/// Mapping from propellant kind to a non-negative scalar.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResourceTally {
    amounts: BTreeMap<String, f64>,
}

impl ResourceTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset every known kind to zero, keeping the keys.
    pub fn zero(&mut self) {
        for amount in self.amounts.values_mut() {
            *amount = 0.0;
        }
    }

    /// Accumulate `amount` into `kind`, creating the entry if needed.
    pub fn add(&mut self, kind: &str, amount: f64) {
        if let Some(existing) = self.amounts.get_mut(kind) {
            *existing += amount;
        } else {
            self.amounts.insert(kind.to_owned(), amount);
        }
    }

    /// True iff the tracked amount for `kind` is strictly positive.
    pub fn has(&self, kind: &str) -> bool {
        self.amounts.get(kind).is_some_and(|&amount| amount > 0.0)
    }

    /// Amount for `kind`, if the kind has ever been added.
    pub fn get(&self, kind: &str) -> Option<f64> {
        self.amounts.get(kind).copied()
    }

    /// Total across all kinds.
    pub fn sum(&self) -> f64 {
        self.amounts.values().sum()
    }

    /// Iterate over `(kind, amount)` pairs in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.amounts.iter().map(|(kind, &amount)| (kind.as_str(), amount))
    }

    /// Number of tracked kinds (including zeroed ones).
    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }
}

/// Panics if `kind` was never added; check [`ResourceTally::has`] first.
impl Index<&str> for ResourceTally {
    type Output = f64;

    fn index(&self, kind: &str) -> &f64 {
        match self.amounts.get(kind) {
            Some(amount) => amount,
            None => panic!("resource tally has no entry for '{kind}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_accumulates() {
        let mut tally = ResourceTally::new();
        tally.add("LiquidFuel", 1.5);
        tally.add("LiquidFuel", 0.5);
        tally.add("Oxidizer", 2.0);
        assert_eq!(tally["LiquidFuel"], 2.0);
        assert_eq!(tally.sum(), 4.0);
        assert_eq!(tally.len(), 2);
    }

    #[test]
    fn test_has_requires_strictly_positive() {
        let mut tally = ResourceTally::new();
        assert!(!tally.has("XenonGas"));
        tally.add("XenonGas", 0.0);
        assert!(!tally.has("XenonGas"));
        tally.add("XenonGas", 0.1);
        assert!(tally.has("XenonGas"));
    }

    #[test]
    fn test_zero_keeps_keys() {
        let mut tally = ResourceTally::new();
        tally.add("LiquidFuel", 3.0);
        tally.zero();
        assert!(!tally.has("LiquidFuel"));
        assert_eq!(tally.get("LiquidFuel"), Some(0.0));
        assert_eq!(tally.sum(), 0.0);
    }

    #[test]
    fn test_get_absent_is_none() {
        let tally = ResourceTally::new();
        assert_eq!(tally.get("Ore"), None);
        assert!(tally.is_empty());
    }

    #[test]
    #[should_panic(expected = "no entry for 'Ore'")]
    fn test_index_absent_panics() {
        let tally = ResourceTally::new();
        let _ = tally["Ore"];
    }
}
