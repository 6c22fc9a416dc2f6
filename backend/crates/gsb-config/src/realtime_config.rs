use crate::{ConfigError, ConfigErrorResult, DEFAULT_CHANNEL_CAPACITY, DEFAULT_COLLECTION};

use serde::Deserialize;

pub const MIN_CHANNEL_CAPACITY: usize = 16;
pub const MAX_CHANNEL_CAPACITY: usize = 65_536;

/// Change feed settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RealtimeConfig {
    /// Collection whose changes the directory watches
    pub collection: String,
    /// Events buffered per subscriber before it is reported as lagging
    pub channel_capacity: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            collection: String::from(DEFAULT_COLLECTION),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl RealtimeConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.collection.trim().is_empty() {
            return Err(ConfigError::realtime("realtime.collection cannot be empty"));
        }

        if self.channel_capacity < MIN_CHANNEL_CAPACITY
            || self.channel_capacity > MAX_CHANNEL_CAPACITY
        {
            return Err(ConfigError::realtime(format!(
                "realtime.channel_capacity must be {}-{}, got {}",
                MIN_CHANNEL_CAPACITY, MAX_CHANNEL_CAPACITY, self.channel_capacity
            )));
        }

        Ok(())
    }
}
