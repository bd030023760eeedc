//! Gate configuration
//!
//! Supplied by the host page as JSON; every field falls back to the
//! deployment defaults.

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_INTERACTION_THRESHOLD, NOTIFY_DISPLAY_MS, NOTIFY_FADE_MS, STORAGE_KEY,
};
use crate::gates::GateRegistry;
use crate::levels::LevelCatalog;

/// Interaction-driven promotion: at `from_level`, reaching `threshold`
/// interactions promotes to `to_level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRule {
    pub from_level: u32,
    pub threshold: u32,
    pub to_level: u32,
}

impl InteractionRule {
    pub fn fires(&self, level: u32, interactions: u32) -> bool {
        level == self.from_level && interactions >= self.threshold && self.to_level > level
    }
}

/// Toast timings in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyTiming {
    /// Fully visible
    pub display_ms: u32,
    /// Fade out before removal
    pub fade_ms: u32,
}

impl Default for NotifyTiming {
    fn default() -> Self {
        Self {
            display_ms: NOTIFY_DISPLAY_MS,
            fade_ms: NOTIFY_FADE_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Durable store key holding the record
    pub storage_key: String,
    pub levels: LevelCatalog,
    pub rules: Vec<InteractionRule>,
    /// Gates reconciled on the hub page
    pub hub_gates: GateRegistry,
    pub notify: NotifyTiming,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            levels: LevelCatalog::default(),
            // 0->1 and 2->3 stay externally triggered
            rules: vec![InteractionRule {
                from_level: 1,
                threshold: DEFAULT_INTERACTION_THRESHOLD,
                to_level: 2,
            }],
            hub_gates: GateRegistry::hub(),
            notify: NotifyTiming::default(),
        }
    }
}

impl GateConfig {
    /// Parse host JSON, using defaults on malformed input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(config) => {
                log::info!("Loaded gate configuration");
                config
            }
            Err(e) => {
                log::warn!("Invalid gate configuration ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// First rule that fires for this level and interaction count
    pub fn promotion_for(&self, level: u32, interactions: u32) -> Option<u32> {
        self.rules
            .iter()
            .find(|r| r.fires(level, interactions))
            .map(|r| r.to_level)
    }
}
