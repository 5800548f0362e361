//! Configuration for the bridge tables and logging.
//!
//! Pairing data is normally loaded from a TOML file by the embedding
//! application. Sections left out of the file fall back to the standard
//! pairing.

use crate::error::BridgeError;
use crate::event::EventTypeId;
use crate::order::{Phase, PriorityBucket};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

fn default_level() -> String {
    "info".to_string()
}

fn default_priorities() -> Vec<PriorityPairing> {
    TableConfig::standard_priorities()
}

/// Top-level configuration file layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Logging configuration settings
    #[serde(default)]
    pub logging: LoggingSettings,
    /// Priority bucket to phase pairings; must form a bijection
    #[serde(default = "default_priorities")]
    pub priorities: Vec<PriorityPairing>,
    /// Internal to external event type pairings
    #[serde(default)]
    pub event_mappings: Vec<EventMapping>,
}

/// Logging system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_level")]
    pub level: String,
    /// Whether to output logs in JSON format
    #[serde(default)]
    pub json_format: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            json_format: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityPairing {
    pub bucket: PriorityBucket,
    pub phase: Phase,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMapping {
    pub internal: EventTypeId,
    pub external: EventTypeId,
}

/// Raw pairing data consumed by [`crate::BridgeTables::build`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    pub priorities: Vec<PriorityPairing>,
    pub event_mappings: Vec<EventMapping>,
}

impl TableConfig {
    /// HIGHEST→FIRST, HIGH→EARLY, NORMAL→DEFAULT, LOW→LATE, LOWEST→LAST
    pub fn standard_priorities() -> Vec<PriorityPairing> {
        [
            (PriorityBucket::Highest, Phase::First),
            (PriorityBucket::High, Phase::Early),
            (PriorityBucket::Normal, Phase::Default),
            (PriorityBucket::Low, Phase::Late),
            (PriorityBucket::Lowest, Phase::Last),
        ]
        .into_iter()
        .map(|(bucket, phase)| PriorityPairing { bucket, phase })
        .collect()
    }

    /// Adds an internal → external event type pairing
    pub fn with_mapping(
        mut self,
        internal: impl Into<EventTypeId>,
        external: impl Into<EventTypeId>,
    ) -> Self {
        self.event_mappings.push(EventMapping {
            internal: internal.into(),
            external: external.into(),
        });
        self
    }

    pub fn with_priorities<I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (PriorityBucket, Phase)>,
    {
        self.priorities = pairs
            .into_iter()
            .map(|(bucket, phase)| PriorityPairing { bucket, phase })
            .collect();
        self
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            priorities: Self::standard_priorities(),
            event_mappings: Vec::new(),
        }
    }
}

impl BridgeConfig {
    /// Loads configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, BridgeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: BridgeConfig = toml::from_str(&content)?;

        info!(
            "📋 Loaded bridge configuration from {} ({} priorities, {} event mappings)",
            path.display(),
            config.priorities.len(),
            config.event_mappings.len()
        );
        Ok(config)
    }

    /// Pairing data for the table builder
    pub fn table_config(&self) -> TableConfig {
        TableConfig {
            priorities: self.priorities.clone(),
            event_mappings: self.event_mappings.clone(),
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            logging: LoggingSettings::default(),
            priorities: default_priorities(),
            event_mappings: Vec::new(),
        }
    }
}
