//! Alert causes, status, and threshold breach detection

use serde::{Deserialize, Serialize};

use crate::models::{Metric, SensorValues, ThresholdConfig};

/// Which side of a threshold range was crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "threshold_direction", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Low,
    High,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Low => "Low",
            Direction::High => "High",
        }
    }
}

/// Why an alert fired: one metric crossed in one direction.
///
/// 8 metrics and 2 directions give 16 possible causes per device. The
/// display label ("Low Moisture", "High Temperature") is derived here rather
/// than stored, so nothing downstream has to take strings apart again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlertCause {
    pub metric: Metric,
    pub direction: Direction,
}

impl AlertCause {
    pub fn new(metric: Metric, direction: Direction) -> Self {
        Self { metric, direction }
    }

    /// Label shown on the dashboard, e.g. "Low Moisture".
    pub fn label(&self) -> String {
        format!("{} {}", self.direction.label(), self.metric.label())
    }
}

/// Lifecycle state of an alert.
///
/// The only transition is Active to Resolved, taken by an operator. A later
/// breach of the same cause opens a new alert rather than reviving an old
/// row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "alert_status")]
pub enum AlertStatus {
    Active,
    Resolved,
}

/// A threshold crossing found in a single reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breach {
    pub cause: AlertCause,
    pub value: f64,
    pub threshold: f64,
}

/// Find every threshold crossing in one reading.
///
/// Metrics are checked in [`Metric::ALL`] order with low before high, so the
/// result order is deterministic. Comparisons are strict: a value sitting
/// exactly on a bound does not breach it. Metrics without a value or without
/// a configured bound are skipped. A range misconfigured with low > high can
/// fire both directions on the same reading; each breach is reported
/// independently.
pub fn detect_breaches(values: &SensorValues, thresholds: &ThresholdConfig) -> Vec<Breach> {
    let mut breaches = Vec::new();

    for metric in Metric::ALL {
        let Some(value) = values.get(metric) else {
            continue;
        };
        let range = thresholds.range(metric);

        if let Some(low) = range.low {
            if value < low {
                breaches.push(Breach {
                    cause: AlertCause::new(metric, Direction::Low),
                    value,
                    threshold: low,
                });
            }
        }
        if let Some(high) = range.high {
            if value > high {
                breaches.push(Breach {
                    cause: AlertCause::new(metric, Direction::High),
                    value,
                    threshold: high,
                });
            }
        }
    }

    breaches
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn moisture_bounds(low: Option<f64>, high: Option<f64>) -> ThresholdConfig {
        ThresholdConfig {
            threshold_moisture_low: low,
            threshold_moisture_high: high,
            ..Default::default()
        }
    }

    fn moisture_reading(value: f64) -> SensorValues {
        SensorValues {
            moisture_percent: Some(value),
            ..Default::default()
        }
    }

    #[test]
    fn test_cause_labels() {
        assert_eq!(
            AlertCause::new(Metric::Moisture, Direction::Low).label(),
            "Low Moisture"
        );
        assert_eq!(
            AlertCause::new(Metric::Temperature, Direction::High).label(),
            "High Temperature"
        );
        assert_eq!(
            AlertCause::new(Metric::Ph, Direction::Low).label(),
            "Low pH"
        );
    }

    #[test]
    fn test_value_below_low_breaches() {
        let breaches = detect_breaches(&moisture_reading(25.0), &moisture_bounds(Some(30.0), Some(70.0)));
        assert_eq!(breaches.len(), 1);
        assert_eq!(breaches[0].cause, AlertCause::new(Metric::Moisture, Direction::Low));
        assert_eq!(breaches[0].value, 25.0);
        assert_eq!(breaches[0].threshold, 30.0);
    }

    #[test]
    fn test_value_above_high_breaches() {
        let breaches = detect_breaches(&moisture_reading(75.0), &moisture_bounds(Some(30.0), Some(70.0)));
        assert_eq!(breaches.len(), 1);
        assert_eq!(breaches[0].cause, AlertCause::new(Metric::Moisture, Direction::High));
        assert_eq!(breaches[0].threshold, 70.0);
    }

    #[test]
    fn test_boundary_equality_does_not_breach() {
        let bounds = moisture_bounds(Some(30.0), Some(70.0));
        assert!(detect_breaches(&moisture_reading(30.0), &bounds).is_empty());
        assert!(detect_breaches(&moisture_reading(70.0), &bounds).is_empty());
    }

    #[test]
    fn test_unset_bound_never_fires() {
        // Only a high bound: arbitrarily low values stay quiet.
        let bounds = moisture_bounds(None, Some(70.0));
        assert!(detect_breaches(&moisture_reading(-1000.0), &bounds).is_empty());

        // Only a low bound: arbitrarily high values stay quiet.
        let bounds = moisture_bounds(Some(30.0), None);
        assert!(detect_breaches(&moisture_reading(1000.0), &bounds).is_empty());
    }

    #[test]
    fn test_missing_value_never_fires() {
        let bounds = moisture_bounds(Some(30.0), Some(70.0));
        assert!(detect_breaches(&SensorValues::default(), &bounds).is_empty());
    }

    #[test]
    fn test_metrics_breach_independently() {
        let thresholds = ThresholdConfig {
            threshold_moisture_low: Some(30.0),
            threshold_temp_high: Some(35.0),
            ..Default::default()
        };
        let values = SensorValues {
            moisture_percent: Some(20.0),
            temperature_celsius: Some(40.0),
            ph: Some(6.5),
            ..Default::default()
        };

        let breaches = detect_breaches(&values, &thresholds);
        assert_eq!(breaches.len(), 2);
        assert_eq!(breaches[0].cause, AlertCause::new(Metric::Moisture, Direction::Low));
        assert_eq!(breaches[1].cause, AlertCause::new(Metric::Temperature, Direction::High));
    }

    #[test]
    fn test_inverted_range_can_fire_both_directions() {
        // Misconfiguration: low above high. Both checks run independently.
        let breaches = detect_breaches(&moisture_reading(50.0), &moisture_bounds(Some(60.0), Some(40.0)));
        assert_eq!(breaches.len(), 2);
        assert_eq!(breaches[0].cause.direction, Direction::Low);
        assert_eq!(breaches[1].cause.direction, Direction::High);
    }

    #[test]
    fn test_breach_order_follows_metric_order() {
        // Every metric below its low bound: result must walk Metric::ALL.
        let thresholds = ThresholdConfig {
            threshold_moisture_low: Some(100.0),
            threshold_temp_low: Some(100.0),
            threshold_ph_low: Some(100.0),
            threshold_ec_low: Some(100.0),
            threshold_salinity_low: Some(100.0),
            threshold_nitrogen_low: Some(100.0),
            threshold_phosphorus_low: Some(100.0),
            threshold_potassium_low: Some(100.0),
            ..Default::default()
        };

        let values = SensorValues {
            moisture_percent: Some(0.0),
            temperature_celsius: Some(0.0),
            ec_us_cm: Some(0.0),
            salinity_mg_l: Some(0.0),
            ph: Some(0.0),
            nitrogen_mg_kg: Some(0.0),
            phosphorus_mg_kg: Some(0.0),
            potassium_mg_kg: Some(0.0),
        };

        let causes: Vec<Metric> = detect_breaches(&values, &thresholds)
            .iter()
            .map(|b| b.cause.metric)
            .collect();
        assert_eq!(causes, Metric::ALL.to_vec());
    }

    proptest! {
        /// A low bound fires exactly when the value is strictly below it.
        #[test]
        fn prop_low_bound_is_strict(value in -1e6f64..1e6, low in -1e6f64..1e6) {
            let breaches = detect_breaches(&moisture_reading(value), &moisture_bounds(Some(low), None));
            prop_assert_eq!(!breaches.is_empty(), value < low);
        }

        /// A high bound fires exactly when the value is strictly above it.
        #[test]
        fn prop_high_bound_is_strict(value in -1e6f64..1e6, high in -1e6f64..1e6) {
            let breaches = detect_breaches(&moisture_reading(value), &moisture_bounds(None, Some(high)));
            prop_assert_eq!(!breaches.is_empty(), value > high);
        }

        /// With no bounds configured, no value ever breaches.
        #[test]
        fn prop_unbounded_never_fires(value in proptest::num::f64::ANY) {
            let breaches = detect_breaches(&moisture_reading(value), &ThresholdConfig::default());
            prop_assert!(breaches.is_empty());
        }
    }
}
