//! HTTP handlers for the Smart Agriculture Monitoring Platform

pub mod alert;
pub mod device;
pub mod health;
pub mod sensor_data;
pub mod user;

pub use alert::*;
pub use device::*;
pub use health::*;
pub use sensor_data::*;
pub use user::*;
