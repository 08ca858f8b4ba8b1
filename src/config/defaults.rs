use super::*;

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            name: "URO SI TimeBlock".to_string(),
            attribution: "Data provided by URO SI TimeBlock Sensor".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            console_level: None,
            file_level: None,
            file: "/tmp/timeblock.log".to_string(),
            backup_count: 5,
            console_output: true,
            json_format: false,
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 8089,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sensor: SensorConfig::default(),
            poll_interval_ms: 60_000,
            timezone: LOCAL_TIMEZONE.to_string(),
            logging: LoggingConfig::default(),
            web: WebConfig::default(),
        }
    }
}
