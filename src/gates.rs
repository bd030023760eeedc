//! Navigation gates and the page context they are evaluated in

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A navigable element whose interactivity requires a minimum level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    /// Stable identifier, also used to find the element on the page
    pub name: String,
    pub required_level: u32,
    /// Overlay text while locked
    pub lock_message: String,
    /// Overlay text overrides keyed by the visitor's current level
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub messages_by_level: BTreeMap<u32, String>,
}

impl Gate {
    pub fn new(name: &str, required_level: u32, lock_message: &str) -> Self {
        Self {
            name: name.to_string(),
            required_level,
            lock_message: lock_message.to_string(),
            messages_by_level: BTreeMap::new(),
        }
    }

    /// Show a different lock message while the visitor is at `level`
    pub fn with_message_at(mut self, level: u32, message: &str) -> Self {
        self.messages_by_level.insert(level, message.to_string());
        self
    }

    pub fn is_open_at(&self, level: u32) -> bool {
        level >= self.required_level
    }

    /// Lock message to show for a visitor at `level`
    pub fn message_for(&self, level: u32) -> &str {
        self.messages_by_level
            .get(&level)
            .map(String::as_str)
            .unwrap_or(&self.lock_message)
    }
}

/// Ordered set of gates reconciled together
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GateRegistry {
    gates: Vec<Gate>,
}

impl GateRegistry {
    pub fn new(gates: Vec<Gate>) -> Self {
        Self { gates }
    }

    /// Gates on the hub page of this deployment
    pub fn hub() -> Self {
        Self::new(vec![
            Gate::new("monitor", 1, "COMPLETE 'IF IT WERE YOU' FIRST"),
            Gate::new("timeline", 2, "INSUFFICIENT DATA. ANALYZE MONITOR FIRST.")
                .with_message_at(0, "SYSTEM OFFLINE"),
        ])
    }

    pub fn get(&self, name: &str) -> Option<&Gate> {
        self.gates.iter().find(|g| g.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Gate> {
        self.gates.iter()
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}

/// Which kind of page the host says is showing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageContext {
    /// The navigation hub; its gates are reconciled
    Hub,
    /// Any other page; reconciliation is a no-op
    #[default]
    Other,
}

impl PageContext {
    /// Parse the host's page marker (`"hub"`, case-insensitive). Anything else is `Other`.
    pub fn from_marker(marker: &str) -> Self {
        if marker.trim().eq_ignore_ascii_case("hub") {
            PageContext::Hub
        } else {
            PageContext::Other
        }
    }

    pub fn is_hub(&self) -> bool {
        matches!(self, PageContext::Hub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hub_registry() {
        let registry = GateRegistry::hub();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("monitor").map(|g| g.required_level), Some(1));
        assert_eq!(registry.get("timeline").map(|g| g.required_level), Some(2));
        assert!(registry.get("archive").is_none());
    }

    #[test]
    fn test_message_overrides() {
        let registry = GateRegistry::hub();
        let timeline = registry.get("timeline").unwrap();
        assert_eq!(timeline.message_for(0), "SYSTEM OFFLINE");
        assert_eq!(timeline.message_for(1), "INSUFFICIENT DATA. ANALYZE MONITOR FIRST.");
        assert!(!timeline.is_open_at(1));
        assert!(timeline.is_open_at(2));
        assert!(timeline.is_open_at(3));
    }

    #[test]
    fn test_page_marker() {
        assert_eq!(PageContext::from_marker("hub"), PageContext::Hub);
        assert_eq!(PageContext::from_marker(" HUB "), PageContext::Hub);
        assert_eq!(PageContext::from_marker("monitor"), PageContext::Other);
        assert_eq!(PageContext::from_marker(""), PageContext::Other);
    }

    #[test]
    fn test_registry_json() {
        let json = r#"[{"name":"archive","required_level":3,"lock_message":"SEALED"}]"#;
        let registry: GateRegistry = serde_json::from_str(json).unwrap();
        let gate = registry.get("archive").unwrap();
        assert_eq!(gate.required_level, 3);
        assert_eq!(gate.message_for(0), "SEALED");
    }
}
