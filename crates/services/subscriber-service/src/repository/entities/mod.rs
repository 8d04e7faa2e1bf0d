//! Database entities.

pub mod device;
pub mod house;
pub mod room;
pub mod sensor_data;
