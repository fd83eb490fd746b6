//! Sensor metrics and reading values

use serde::{Deserialize, Serialize};

/// The quantities measured by a field device.
///
/// The declaration order is also the evaluation order for threshold checks,
/// which keeps alert emission deterministic for a given reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "sensor_metric", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Moisture,
    Temperature,
    Ph,
    Ec,
    Salinity,
    Nitrogen,
    Phosphorus,
    Potassium,
}

impl Metric {
    /// All metrics in evaluation order.
    pub const ALL: [Metric; 8] = [
        Metric::Moisture,
        Metric::Temperature,
        Metric::Ph,
        Metric::Ec,
        Metric::Salinity,
        Metric::Nitrogen,
        Metric::Phosphorus,
        Metric::Potassium,
    ];

    /// Display name used in alert labels and on the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Moisture => "Moisture",
            Metric::Temperature => "Temperature",
            Metric::Ph => "pH",
            Metric::Ec => "EC",
            Metric::Salinity => "Salinity",
            Metric::Nitrogen => "Nitrogen",
            Metric::Phosphorus => "Phosphorus",
            Metric::Potassium => "Potassium",
        }
    }
}

/// One value per metric as reported by a device.
///
/// Devices with fewer probes send partial payloads, so every field is
/// optional. A metric without a value is simply skipped during threshold
/// evaluation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct SensorValues {
    pub moisture_percent: Option<f64>,
    pub temperature_celsius: Option<f64>,
    pub ec_us_cm: Option<f64>,
    pub salinity_mg_l: Option<f64>,
    pub ph: Option<f64>,
    pub nitrogen_mg_kg: Option<f64>,
    pub phosphorus_mg_kg: Option<f64>,
    pub potassium_mg_kg: Option<f64>,
}

impl SensorValues {
    /// Value for a metric, if the reading carried one.
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Moisture => self.moisture_percent,
            Metric::Temperature => self.temperature_celsius,
            Metric::Ph => self.ph,
            Metric::Ec => self.ec_us_cm,
            Metric::Salinity => self.salinity_mg_l,
            Metric::Nitrogen => self.nitrogen_mg_kg,
            Metric::Phosphorus => self.phosphorus_mg_kg,
            Metric::Potassium => self.potassium_mg_kg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_order_is_stable() {
        assert_eq!(Metric::ALL[0], Metric::Moisture);
        assert_eq!(Metric::ALL[1], Metric::Temperature);
        assert_eq!(Metric::ALL[2], Metric::Ph);
        assert_eq!(Metric::ALL[7], Metric::Potassium);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Metric::Ph.label(), "pH");
        assert_eq!(Metric::Ec.label(), "EC");
        assert_eq!(Metric::Phosphorus.label(), "Phosphorus");
    }

    #[test]
    fn test_value_accessor_covers_every_metric() {
        let values = SensorValues {
            moisture_percent: Some(45.0),
            temperature_celsius: Some(27.5),
            ec_us_cm: Some(1200.0),
            salinity_mg_l: Some(600.0),
            ph: Some(6.8),
            nitrogen_mg_kg: Some(40.0),
            phosphorus_mg_kg: Some(15.0),
            potassium_mg_kg: Some(110.0),
        };

        for metric in Metric::ALL {
            assert!(values.get(metric).is_some(), "{:?} not mapped", metric);
        }
        assert_eq!(values.get(Metric::Ph), Some(6.8));
        assert_eq!(values.get(Metric::Ec), Some(1200.0));
    }

    #[test]
    fn test_partial_reading_has_missing_values() {
        let values = SensorValues {
            moisture_percent: Some(30.0),
            ..Default::default()
        };
        assert_eq!(values.get(Metric::Moisture), Some(30.0));
        assert_eq!(values.get(Metric::Temperature), None);
    }
}
