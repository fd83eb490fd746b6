//! Business logic services for the Smart Agriculture Monitoring Platform

pub mod alert;
pub mod device;
pub mod sensor_data;
pub mod user;

pub use alert::AlertService;
pub use device::DeviceService;
pub use sensor_data::ReadingService;
pub use user::UserService;
