use crate::error::InvalidDemandError;

/// A time-indexed electrical demand profile.
///
/// `values[t]` is the required load in period `t` (MW). Always non-empty
/// and non-negative — enforced in [`Demand::new`], not re-checked anywhere
/// downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct Demand {
    values: Vec<f64>,
}

impl Demand {
    pub fn new(values: Vec<f64>) -> Result<Self, InvalidDemandError> {
        if values.is_empty() {
            return Err(InvalidDemandError::Empty);
        }
        if let Some((period, &value)) = values.iter().enumerate().find(|(_, &v)| v < 0.0) {
            return Err(InvalidDemandError::Negative { period, value });
        }
        Ok(Self { values })
    }

    /// Number of periods in the horizon.
    pub fn periods(&self) -> usize {
        self.values.len()
    }

    /// Demand in `period`, or `None` if out of range.
    pub fn get(&self, period: usize) -> Option<f64> {
        self.values.get(period).copied()
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn peak(&self) -> f64 {
        // values is non-empty by construction, and NaN can't appear since
        // new() rejects anything that failed `< 0.0`.
        self.values.iter().copied().fold(f64::MIN, f64::max)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty() {
        assert_eq!(Demand::new(vec![]).unwrap_err(), InvalidDemandError::Empty);
    }

    #[test]
    fn rejects_negative() {
        let err = Demand::new(vec![10.0, -5.0, 3.0]).unwrap_err();
        assert_eq!(
            err,
            InvalidDemandError::Negative {
                period: 1,
                value: -5.0
            }
        );
    }

    #[test]
    fn derived_queries() {
        let demand = Demand::new(vec![10.0, 30.0, 20.0]).unwrap();
        assert_eq!(demand.periods(), 3);
        assert_eq!(demand.total(), 60.0);
        assert_eq!(demand.peak(), 30.0);
        assert_eq!(demand.get(1), Some(30.0));
        assert_eq!(demand.get(99), None);
    }

    #[test]
    fn single_period() {
        let demand = Demand::new(vec![50.0]).unwrap();
        assert_eq!(demand.periods(), 1);
        assert_eq!(demand.peak(), 50.0);
    }
}

#[cfg(test)]
mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Any non-empty, all-non-negative vector is a valid Demand whose
        // derived queries agree with a plain re-derivation from the input.
        #[test]
        fn accepts_and_derives_correctly(values in proptest::collection::vec(0.0..1e6f64, 1..20)) {
            let expected_total: f64 = values.iter().sum();
            let expected_peak = values.iter().cloned().fold(f64::MIN, f64::max);
            let expected_periods = values.len();

            let demand = Demand::new(values).unwrap();

            prop_assert_eq!(demand.periods(), expected_periods);
            prop_assert!((demand.total() - expected_total).abs() < 1e-6);
            prop_assert!((demand.peak() - expected_peak).abs() < 1e-6);
        }

        // Any vector containing at least one negative value is rejected,
        // and the reported offending period/value are the first one found.
        #[test]
        fn rejects_any_negative(
            prefix in proptest::collection::vec(0.0..1e6f64, 0..5),
            bad in -1e6..-1e-9f64,
            suffix in proptest::collection::vec(-1e6..1e6f64, 0..5),
        ) {
            let period = prefix.len();
            let mut values = prefix;
            values.push(bad);
            values.extend(suffix);

            let err = Demand::new(values).unwrap_err();
            prop_assert_eq!(err, InvalidDemandError::Negative { period, value: bad });
        }
    }
}
