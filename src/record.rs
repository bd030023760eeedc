//! The persisted progression record

use serde::{Deserialize, Deserializer, Serialize};

/// Clamp a script number to a count.
///
/// NaN and negative values become zero, fractions are truncated, large
/// values saturate at `u32::MAX`.
pub fn clamp_count(raw: f64) -> u32 {
    if raw.is_nan() || raw <= 0.0 {
        0
    } else if raw >= u32::MAX as f64 {
        u32::MAX
    } else {
        raw.trunc() as u32
    }
}

/// Accept any JSON number for a counter field; anything else reads as zero
fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64().map(clamp_count).unwrap_or_default())
}

/// One visitor's advancement. The only entity written to the durable store.
///
/// Missing or out-of-range fields default or clamp individually so one bad
/// counter never costs the stored level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionRecord {
    /// Current level id. Never decreases.
    #[serde(deserialize_with = "lenient_count")]
    pub level: u32,
    /// Reserved, not consumed by any promotion rule yet
    #[serde(deserialize_with = "lenient_count")]
    pub xp: u32,
    /// Count of recorded interaction events
    #[serde(deserialize_with = "lenient_count")]
    pub interactions: u32,
}

impl ProgressionRecord {
    pub fn new(level: u32, xp: u32, interactions: u32) -> Self {
        Self {
            level,
            xp,
            interactions,
        }
    }

    /// Parse a stored payload. `None` unless it is a JSON object.
    pub fn from_json(json: &str) -> Option<Self> {
        let value: serde_json::Value = match serde_json::from_str(json) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Ignoring unparsable progression payload: {}", e);
                return None;
            }
        };
        if !value.is_object() {
            log::warn!("Ignoring progression payload that is not an object");
            return None;
        }
        serde_json::from_value(value).ok()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
