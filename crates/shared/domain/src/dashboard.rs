//! Dashboard statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fleet-wide counters shown on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_houses: u64,
    pub total_rooms: u64,
    pub total_devices: u64,
    pub active_devices: u64,
    pub inactive_devices: u64,
    /// Share of active devices in percent, two decimals
    pub active_device_percentage: f64,
    pub last_updated: DateTime<Utc>,
}

impl DashboardStats {
    pub fn new(total_houses: u64, total_rooms: u64, total_devices: u64, active_devices: u64) -> Self {
        let active_device_percentage = if total_devices > 0 {
            let percentage = active_devices as f64 / total_devices as f64 * 100.0;
            (percentage * 100.0).round() / 100.0
        } else {
            0.0
        };

        Self {
            total_houses,
            total_rooms,
            total_devices,
            active_devices,
            inactive_devices: total_devices.saturating_sub(active_devices),
            active_device_percentage,
            last_updated: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_rounds_to_two_decimals() {
        let stats = DashboardStats::new(1, 2, 3, 2);
        assert_eq!(stats.inactive_devices, 1);
        assert_eq!(stats.active_device_percentage, 66.67);
    }

    #[test]
    fn test_no_devices_yields_zero_percent() {
        let stats = DashboardStats::new(0, 0, 0, 0);
        assert_eq!(stats.active_device_percentage, 0.0);
        assert_eq!(stats.inactive_devices, 0);
    }
}
