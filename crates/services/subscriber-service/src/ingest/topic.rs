use domain::{SENSOR_TOPIC_PREFIX, SENSOR_TOPIC_SUFFIX};

/// Sensor id carried by a `sensors/{id}/data` topic.
///
/// Extra trailing segments are tolerated; anything else yields None.
pub fn parse_sensor_topic(topic: &str) -> Option<&str> {
    let mut segments = topic.split('/');
    let prefix = segments.next()?;
    let sensor_id = segments.next()?;
    let suffix = segments.next()?;

    if prefix != SENSOR_TOPIC_PREFIX || suffix != SENSOR_TOPIC_SUFFIX || domain::is_blank(sensor_id) {
        return None;
    }
    Some(sensor_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_topics() {
        assert_eq!(parse_sensor_topic("sensors/sensor_001/data"), Some("sensor_001"));
        assert_eq!(parse_sensor_topic("sensors/porch/data/extra"), Some("porch"));
    }

    #[test]
    fn test_invalid_topics() {
        assert_eq!(parse_sensor_topic("sensor/data"), None);
        assert_eq!(parse_sensor_topic("sensors/sensor_001"), None);
        assert_eq!(parse_sensor_topic("devices/sensor_001/data"), None);
        assert_eq!(parse_sensor_topic("sensors/sensor_001/status"), None);
        assert_eq!(parse_sensor_topic("sensors//data"), None);
        assert_eq!(parse_sensor_topic(""), None);
    }
}
