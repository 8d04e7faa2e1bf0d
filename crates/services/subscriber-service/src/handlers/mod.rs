//! HTTP request handlers.

pub mod dashboard_handler;
pub mod device_handler;
pub mod health_handler;
pub mod house_handler;
pub mod room_handler;
pub mod sensor_data_handler;

pub use dashboard_handler::dashboard_routes;
pub use device_handler::device_routes;
pub use health_handler::{health_routes, service_info};
pub use house_handler::house_routes;
pub use room_handler::room_routes;
pub use sensor_data_handler::sensor_data_routes;
