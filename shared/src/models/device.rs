//! Device status and threshold configuration

use serde::{Deserialize, Serialize};

use crate::models::Metric;

/// Connectivity state reported for a field device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "device_status")]
pub enum DeviceStatus {
    Online,
    Offline,
}

/// An optional (low, high) alert bound pair for one metric.
///
/// The two bounds are independent: either, both, or neither may be set, and
/// a missing bound disables alerting for that direction only. No ordering is
/// enforced between them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThresholdRange {
    pub low: Option<f64>,
    pub high: Option<f64>,
}

/// Per-metric alert bounds for a device.
///
/// Stored flat, one nullable column per bound, matching the device table;
/// [`ThresholdConfig::range`] exposes the metric-keyed view the evaluator
/// works with.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct ThresholdConfig {
    pub threshold_moisture_low: Option<f64>,
    pub threshold_moisture_high: Option<f64>,
    pub threshold_temp_low: Option<f64>,
    pub threshold_temp_high: Option<f64>,
    pub threshold_ph_low: Option<f64>,
    pub threshold_ph_high: Option<f64>,
    pub threshold_ec_low: Option<f64>,
    pub threshold_ec_high: Option<f64>,
    pub threshold_salinity_low: Option<f64>,
    pub threshold_salinity_high: Option<f64>,
    pub threshold_nitrogen_low: Option<f64>,
    pub threshold_nitrogen_high: Option<f64>,
    pub threshold_phosphorus_low: Option<f64>,
    pub threshold_phosphorus_high: Option<f64>,
    pub threshold_potassium_low: Option<f64>,
    pub threshold_potassium_high: Option<f64>,
}

impl ThresholdConfig {
    /// Alert bounds configured for a metric.
    pub fn range(&self, metric: Metric) -> ThresholdRange {
        let (low, high) = match metric {
            Metric::Moisture => (self.threshold_moisture_low, self.threshold_moisture_high),
            Metric::Temperature => (self.threshold_temp_low, self.threshold_temp_high),
            Metric::Ph => (self.threshold_ph_low, self.threshold_ph_high),
            Metric::Ec => (self.threshold_ec_low, self.threshold_ec_high),
            Metric::Salinity => (self.threshold_salinity_low, self.threshold_salinity_high),
            Metric::Nitrogen => (self.threshold_nitrogen_low, self.threshold_nitrogen_high),
            Metric::Phosphorus => (
                self.threshold_phosphorus_low,
                self.threshold_phosphorus_high,
            ),
            Metric::Potassium => (self.threshold_potassium_low, self.threshold_potassium_high),
        };
        ThresholdRange { low, high }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_has_no_bounds() {
        let config = ThresholdConfig::default();
        for metric in Metric::ALL {
            assert_eq!(config.range(metric), ThresholdRange::default());
        }
    }

    #[test]
    fn test_range_maps_each_metric_to_its_own_columns() {
        let config = ThresholdConfig {
            threshold_moisture_low: Some(30.0),
            threshold_moisture_high: Some(70.0),
            threshold_temp_high: Some(35.0),
            threshold_ph_low: Some(5.5),
            threshold_potassium_high: Some(200.0),
            ..Default::default()
        };

        assert_eq!(
            config.range(Metric::Moisture),
            ThresholdRange {
                low: Some(30.0),
                high: Some(70.0)
            }
        );
        assert_eq!(config.range(Metric::Temperature).low, None);
        assert_eq!(config.range(Metric::Temperature).high, Some(35.0));
        assert_eq!(config.range(Metric::Ph).low, Some(5.5));
        assert_eq!(config.range(Metric::Potassium).high, Some(200.0));
        // Metrics that were never configured stay fully unset.
        assert_eq!(config.range(Metric::Nitrogen), ThresholdRange::default());
    }
}
