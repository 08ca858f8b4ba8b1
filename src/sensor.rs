//! Time-block sensor for the host platform
//!
//! The sensor owns a clock, classifies "now" on every refresh and publishes
//! the result through a watch channel. Each published state fully replaces
//! the previous one; nothing else is retained between refreshes.

use crate::block::{TimeBlockReading, classify};
use crate::config::Config;
use crate::error::Result;
use crate::logging::{LogContext, StructuredLogger, get_logger_with_context};
use chrono::{Local, NaiveDateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, RwLock};
use tokio::sync::{mpsc, watch};
use tokio::time::{Duration, MissedTickBehavior, interval};

/// Stable unique id of the published entity
pub const UNIQUE_ID: &str = "uro_si_timeblock_current_block";

/// Host device class: the value is one of a closed set of blocks
pub const DEVICE_CLASS: &str = "enum";

/// Host state class
pub const STATE_CLASS: &str = "measurement";

/// Source of the moment to classify
pub trait Clock: Send + Sync {
    /// Current local wall-clock time
    fn now(&self) -> NaiveDateTime;
}

/// Clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    timezone: Option<chrono_tz::Tz>,
}

impl SystemClock {
    /// Clock matching the configured timezone
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            timezone: config.timezone()?,
        })
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        match self.timezone {
            Some(tz) => Utc::now().with_timezone(&tz).naive_local(),
            None => Local::now().naive_local(),
        }
    }
}

/// Clock pinned to a settable moment
#[derive(Debug)]
pub struct FixedClock {
    at: RwLock<NaiveDateTime>,
}

impl FixedClock {
    pub const fn new(at: NaiveDateTime) -> Self {
        Self { at: RwLock::new(at) }
    }

    /// Move the clock to `at`
    pub fn set(&self, at: NaiveDateTime) {
        if let Ok(mut guard) = self.at.write() {
            *guard = at;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        match self.at.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// State published to the host after every refresh
#[derive(Debug, Clone, Serialize)]
pub struct SensorState {
    pub name: String,
    pub unique_id: &'static str,
    pub attribution: String,
    pub device_class: &'static str,
    pub state_class: &'static str,
    /// Tariff block
    pub native_value: u8,
    /// Supplementary attributes (`is_workday`, `is_high_season`, ...)
    pub attributes: serde_json::Map<String, serde_json::Value>,
    /// Classified local timestamp
    pub last_updated: String,
    /// Refreshes since start
    pub total_updates: u64,
}

impl SensorState {
    fn from_reading(config: &Config, at: NaiveDateTime, reading: &TimeBlockReading, total_updates: u64) -> Self {
        Self {
            name: config.sensor.name.clone(),
            unique_id: UNIQUE_ID,
            attribution: config.sensor.attribution.clone(),
            device_class: DEVICE_CLASS,
            state_class: STATE_CLASS,
            native_value: reading.block,
            attributes: reading.attributes(),
            last_updated: at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            total_updates,
        }
    }
}

/// Latest published state; `None` until the first refresh
pub type StateReceiver = watch::Receiver<Option<Arc<SensorState>>>;

/// Periodically refreshed time-block sensor
pub struct TimeBlockSensor {
    config: Config,
    clock: Arc<dyn Clock>,
    logger: StructuredLogger,
    state_tx: watch::Sender<Option<Arc<SensorState>>>,
    shutdown_tx: mpsc::UnboundedSender<()>,
    shutdown_rx: Option<mpsc::UnboundedReceiver<()>>,
    total_updates: u64,
    last_block: Option<u8>,
}

impl TimeBlockSensor {
    /// Create a sensor reading time from `clock`
    pub fn new(config: Config, clock: Arc<dyn Clock>) -> Self {
        let logger = get_logger_with_context(LogContext::new("sensor").with_entity_id(UNIQUE_ID));
        let (state_tx, _) = watch::channel(None);
        let (shutdown_tx, shutdown_rx) = mpsc::unbounded_channel();

        Self {
            config,
            clock,
            logger,
            state_tx,
            shutdown_tx,
            shutdown_rx: Some(shutdown_rx),
            total_updates: 0,
            last_block: None,
        }
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Subscribe to published states
    pub fn subscribe(&self) -> StateReceiver {
        self.state_tx.subscribe()
    }

    /// Handle that stops [`run`](Self::run) when sent to
    pub fn shutdown_handle(&self) -> mpsc::UnboundedSender<()> {
        self.shutdown_tx.clone()
    }

    /// Most recently published state
    pub fn current_state(&self) -> Option<Arc<SensorState>> {
        self.state_tx.borrow().clone()
    }

    /// Classify the clock's current time and publish the result
    pub fn update(&mut self) -> Arc<SensorState> {
        let now = self.clock.now();
        let reading = classify(now);

        if !reading.is_valid() {
            self.logger.error(&format!(
                "No time band matched at {now}; publishing block 0"
            ));
        }

        match self.last_block {
            Some(prev) if prev != reading.block => self.logger.info(&format!(
                "Time block changed from {prev} to {} at {now}",
                reading.block
            )),
            None => self.logger.info(&format!(
                "Initial time block {} at {now} (workday={}, high_season={}, holiday={})",
                reading.block, reading.is_workday, reading.is_high_season, reading.is_holiday
            )),
            _ => self.logger.trace(&format!("Time block unchanged at {now}")),
        }
        self.last_block = Some(reading.block);
        self.total_updates = self.total_updates.saturating_add(1);

        let state = Arc::new(SensorState::from_reading(
            &self.config,
            now,
            &reading,
            self.total_updates,
        ));
        self.state_tx.send_replace(Some(Arc::clone(&state)));
        state
    }

    /// Run the refresh loop until a shutdown signal arrives
    pub async fn run(&mut self) -> Result<()> {
        let Some(mut shutdown_rx) = self.shutdown_rx.take() else {
            self.logger.warn("Refresh loop already ran; ignoring second start");
            return Ok(());
        };

        self.logger.info(&format!(
            "Starting refresh loop every {} ms",
            self.config.poll_interval_ms
        ));

        let mut poll_interval = interval(Duration::from_millis(self.config.poll_interval_ms));
        poll_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = poll_interval.tick() => {
                    self.update();
                }
                _ = shutdown_rx.recv() => {
                    self.logger.info("Shutdown signal received");
                    break;
                }
            }
        }

        self.logger.info("Sensor shutdown complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn update_publishes_fresh_state() {
        let clock = Arc::new(FixedClock::new(at("2024-07-15 08:30")));
        let mut sensor = TimeBlockSensor::new(Config::default(), clock.clone());
        let rx = sensor.subscribe();
        assert!(rx.borrow().is_none());

        let state = sensor.update();
        assert_eq!(state.native_value, 2);
        assert_eq!(state.unique_id, UNIQUE_ID);
        assert_eq!(state.attributes["is_workday"], true);
        assert_eq!(state.last_updated, "2024-07-15T08:30:00");

        clock.set(at("2024-12-25 10:00"));
        sensor.update();
        let latest = rx.borrow().clone().unwrap();
        assert_eq!(latest.native_value, 2);
        assert_eq!(latest.attributes["is_holiday"], true);
        assert_eq!(latest.total_updates, 2);
    }

    #[test]
    fn system_clock_from_config() {
        let mut cfg = Config::default();
        assert!(SystemClock::from_config(&cfg).is_ok());
        cfg.timezone = "Nowhere/Special".to_string();
        assert!(SystemClock::from_config(&cfg).is_err());
    }
}
