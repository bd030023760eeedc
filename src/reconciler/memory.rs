//! In-memory gate surface and notifier
//!
//! Used by native builds and tests in place of the DOM.

use std::collections::BTreeMap;

use super::{GateSurface, Notifier};

/// Visual state of one gate element
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryGate {
    /// Lock marker present
    pub locked: bool,
    /// Accepts pointer input
    pub interactive: bool,
    pub opacity: f32,
    /// Overlay texts attached to the element, in attach order
    pub overlays: Vec<String>,
}

impl Default for MemoryGate {
    fn default() -> Self {
        Self {
            locked: false,
            interactive: true,
            opacity: 1.0,
            overlays: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MemorySurface {
    gates: BTreeMap<String, MemoryGate>,
}

impl MemorySurface {
    /// Surface with unlocked elements for the named gates
    pub fn with_gates(names: &[&str]) -> Self {
        Self {
            gates: names
                .iter()
                .map(|n| (n.to_string(), MemoryGate::default()))
                .collect(),
        }
    }

    pub fn gate(&self, name: &str) -> Option<&MemoryGate> {
        self.gates.get(name)
    }

    /// Set the lock marker only, as static markup would
    pub fn mark_locked(&mut self, name: &str) {
        if let Some(g) = self.gates.get_mut(name) {
            g.locked = true;
        }
    }

    pub fn overlay_count(&self, name: &str) -> usize {
        self.gates.get(name).map_or(0, |g| g.overlays.len())
    }
}

impl GateSurface for MemorySurface {
    fn contains(&self, gate: &str) -> bool {
        self.gates.contains_key(gate)
    }

    fn is_locked(&self, gate: &str) -> bool {
        self.gates.get(gate).is_some_and(|g| g.locked)
    }

    fn lock_message(&self, gate: &str) -> Option<String> {
        self.gates.get(gate)?.overlays.last().cloned()
    }

    fn apply_lock(&mut self, gate: &str, message: &str) {
        if let Some(g) = self.gates.get_mut(gate) {
            g.locked = true;
            g.interactive = false;
            g.opacity = 0.5;
            g.overlays.push(message.to_string());
        }
    }

    fn set_lock_message(&mut self, gate: &str, message: &str) {
        if let Some(overlay) = self.gates.get_mut(gate).and_then(|g| g.overlays.last_mut()) {
            *overlay = message.to_string();
        }
    }

    fn apply_unlock(&mut self, gate: &str) {
        if let Some(g) = self.gates.get_mut(gate) {
            g.locked = false;
            g.interactive = true;
            g.opacity = 1.0;
            g.overlays.clear();
        }
    }
}

/// Notifier that keeps every message it was asked to show
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    pub messages: Vec<String>,
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, text: &str) {
        log::info!("Notification: {}", text);
        self.messages.push(text.to_string());
    }
}
