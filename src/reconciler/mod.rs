//! Gate reconciliation
//!
//! Makes the visible lock state of each gate match the current level.
//! The decision (`plan`) is pure; applying it goes through a [`GateSurface`]
//! so it runs the same against the DOM and against memory.

pub mod memory;

use crate::gates::{GateRegistry, PageContext};
use crate::record::ProgressionRecord;

pub use memory::{MemorySurface, RecordingNotifier};

/// What a gate should look like for the current level
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateIntent {
    Lock { gate: String, message: String },
    Unlock { gate: String },
}

/// Decide lock/unlock for every gate in registry order
pub fn plan(level: u32, registry: &GateRegistry) -> Vec<GateIntent> {
    registry
        .iter()
        .map(|gate| {
            if gate.is_open_at(level) {
                GateIntent::Unlock {
                    gate: gate.name.clone(),
                }
            } else {
                GateIntent::Lock {
                    gate: gate.name.clone(),
                    message: gate.message_for(level).to_string(),
                }
            }
        })
        .collect()
}

/// Where gates live on screen
///
/// The lock marker and overlay text are the only visual state the reconciler
/// reads back, and only to stay idempotent.
pub trait GateSurface {
    /// Whether the gate's element exists on this page
    fn contains(&self, gate: &str) -> bool;

    /// Whether the gate carries the lock marker
    fn is_locked(&self, gate: &str) -> bool;

    /// Text of the lock overlay, if present
    fn lock_message(&self, gate: &str) -> Option<String>;

    /// Add marker, non-interactive treatment and an overlay showing `message`
    fn apply_lock(&mut self, gate: &str, message: &str);

    /// Replace the text of an existing overlay
    fn set_lock_message(&mut self, gate: &str, message: &str);

    /// Remove marker and overlay, restore interactive full-opacity treatment
    fn apply_unlock(&mut self, gate: &str);
}

/// Transient user-facing messages
pub trait Notifier {
    /// Show `text` briefly. Must not block or fail.
    fn notify(&mut self, text: &str);
}

/// Outcome of applying one intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateChange {
    Locked,
    Relabeled,
    Unlocked,
    Unchanged,
    Missing,
}

/// Lock a gate unless it is already locked.
///
/// An already-locked gate showing a different message only has its overlay
/// text replaced. A marker without an overlay (static markup) gets one.
pub fn lock_gate(surface: &mut impl GateSurface, gate: &str, message: &str) -> GateChange {
    if !surface.contains(gate) {
        return GateChange::Missing;
    }
    let current = if surface.is_locked(gate) {
        surface.lock_message(gate)
    } else {
        None
    };
    match current {
        None => {
            surface.apply_lock(gate, message);
            log::debug!("Locked gate '{}': {}", gate, message);
            GateChange::Locked
        }
        Some(shown) if shown != message => {
            surface.set_lock_message(gate, message);
            log::debug!("Relabeled gate '{}': {}", gate, message);
            GateChange::Relabeled
        }
        Some(_) => GateChange::Unchanged,
    }
}

/// Unlock a gate. No-op when it carries no lock marker.
pub fn unlock_gate(surface: &mut impl GateSurface, gate: &str) -> GateChange {
    if !surface.contains(gate) {
        return GateChange::Missing;
    }
    if !surface.is_locked(gate) {
        return GateChange::Unchanged;
    }
    surface.apply_unlock(gate);
    log::debug!("Unlocked gate '{}'", gate);
    GateChange::Unlocked
}

/// Counts of what one reconciliation pass changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    pub locked: usize,
    pub relabeled: usize,
    pub unlocked: usize,
    pub unchanged: usize,
    pub missing: usize,
}

impl ReconcileReport {
    fn count(&mut self, change: GateChange) {
        match change {
            GateChange::Locked => self.locked += 1,
            GateChange::Relabeled => self.relabeled += 1,
            GateChange::Unlocked => self.unlocked += 1,
            GateChange::Unchanged => self.unchanged += 1,
            GateChange::Missing => self.missing += 1,
        }
    }

    /// True if nothing on screen changed
    pub fn is_noop(&self) -> bool {
        self.locked == 0 && self.relabeled == 0 && self.unlocked == 0
    }
}

/// What the progression store drives after each state change
pub trait GateSync {
    /// Bring every gate in line with `record`
    fn reconcile(&mut self, record: &ProgressionRecord);

    /// One-shot level transition message
    fn notify(&mut self, text: &str);
}

/// Applies plans for one page against a surface, and owns the notifier
pub struct Reconciler<S: GateSurface, N: Notifier> {
    surface: S,
    notifier: N,
    registry: GateRegistry,
    page: PageContext,
}

impl<S: GateSurface, N: Notifier> Reconciler<S, N> {
    pub fn new(surface: S, notifier: N, registry: GateRegistry, page: PageContext) -> Self {
        Self {
            surface,
            notifier,
            registry,
            page,
        }
    }

    pub fn set_page(&mut self, page: PageContext) {
        self.page = page;
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Reconcile all gates. Pages other than the hub are left untouched.
    pub fn apply(&mut self, record: &ProgressionRecord) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        if !self.page.is_hub() {
            return report;
        }

        for intent in plan(record.level, &self.registry) {
            let change = match &intent {
                GateIntent::Lock { gate, message } => lock_gate(&mut self.surface, gate, message),
                GateIntent::Unlock { gate } => unlock_gate(&mut self.surface, gate),
            };
            report.count(change);
        }

        if !report.is_noop() {
            log::info!(
                "Reconciled gates at level {}: {} locked, {} unlocked, {} relabeled",
                record.level,
                report.locked,
                report.unlocked,
                report.relabeled
            );
        }
        report
    }
}

impl<S: GateSurface, N: Notifier> GateSync for Reconciler<S, N> {
    fn reconcile(&mut self, record: &ProgressionRecord) {
        self.apply(record);
    }

    fn notify(&mut self, text: &str) {
        self.notifier.notify(text);
    }
}
