//! Progression store
//!
//! Single source of truth for the progression record. Every read and write of
//! durable state goes through here, and every write is followed by a
//! reconciliation pass so callers never sync the UI by hand.

use crate::config::GateConfig;
use crate::levels::LevelDefinition;
use crate::platform::{KeyValueStore, StorageError};
use crate::reconciler::GateSync;
use crate::record::{ProgressionRecord, clamp_count};

/// Interaction amount from script. Negative or NaN counts as zero.
pub fn interaction_amount(raw: f64) -> u32 {
    clamp_count(raw)
}

/// Promotion target from script. Negative or NaN becomes level 0, which
/// never promotes.
pub fn promotion_target(raw: f64) -> u32 {
    clamp_count(raw)
}

/// Notification text for reaching a level
pub fn upgrade_message(label: &str) -> String {
    format!("SYSTEM UPGRADE: {} - ACCESS GRANTED", label)
}

pub struct ProgressionStore<K: KeyValueStore, G: GateSync> {
    store: K,
    sync: G,
    config: GateConfig,
}

impl<K: KeyValueStore, G: GateSync> ProgressionStore<K, G> {
    pub fn new(store: K, sync: G, config: GateConfig) -> Self {
        Self {
            store,
            sync,
            config,
        }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn gate_sync(&self) -> &G {
        &self.sync
    }

    pub fn gate_sync_mut(&mut self) -> &mut G {
        &mut self.sync
    }

    /// Current record, or the default when nothing valid is stored.
    /// Never writes.
    pub fn load(&self) -> ProgressionRecord {
        self.store
            .get(&self.config.storage_key)
            .and_then(|json| ProgressionRecord::from_json(&json))
            .unwrap_or_default()
    }

    /// Write the record, then reconcile against it
    pub fn persist(&mut self, record: &ProgressionRecord) {
        let written = record
            .to_json()
            .map_err(StorageError::from)
            .and_then(|json| self.store.set(&self.config.storage_key, &json));
        if let Err(e) = written {
            log::warn!("Progression not saved: {}", e);
        }
        self.sync.reconcile(record);
    }

    /// Reconcile against the stored record without changing it (page load)
    pub fn sync(&mut self) {
        let record = self.load();
        log::info!(
            "Progression at level {} ({} interactions)",
            record.level,
            record.interactions
        );
        self.sync.reconcile(&record);
    }

    /// Count `amount` interactions and apply any interaction rule that fires
    pub fn record_interaction(&mut self, amount: u32) {
        let mut record = self.load();
        record.interactions = record.interactions.saturating_add(amount);

        match self.config.promotion_for(record.level, record.interactions) {
            Some(target) => self.transition(record, target),
            None => self.persist(&record),
        }
    }

    /// Raise the level to `target`. Ignored unless it is above the current level.
    pub fn promote(&mut self, target: u32) {
        let record = self.load();
        if target <= record.level {
            log::debug!(
                "Ignoring promotion to {} at level {}",
                target,
                record.level
            );
            return;
        }
        self.transition(record, target);
    }

    /// Definition of the stored level, if the catalog knows it
    pub fn current_level(&self) -> Option<&LevelDefinition> {
        self.config.levels.get(self.load().level)
    }

    fn transition(&mut self, mut record: ProgressionRecord, target: u32) {
        debug_assert!(
            self.config.levels.contains(target),
            "promotion to level {} which is not in the catalog",
            target
        );
        if !self.config.levels.contains(target) {
            log::warn!("Promoting to unknown level {}", target);
        }

        let from = record.level;
        record.level = target;
        self.persist(&record);

        let label = self.config.levels.label(target);
        log::info!("Level up: {} -> {} ({})", from, target, label);
        self.sync.notify(&upgrade_message(&label));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gates::{GateRegistry, PageContext};
    use crate::platform::MemoryStore;
    use crate::reconciler::{GateSurface, MemorySurface, Reconciler, RecordingNotifier};
    use proptest::prelude::*;

    type TestStore = ProgressionStore<MemoryStore, Reconciler<MemorySurface, RecordingNotifier>>;

    fn store_with(memory: MemoryStore) -> TestStore {
        let config = GateConfig::default();
        let reconciler = Reconciler::new(
            MemorySurface::with_gates(&["monitor", "timeline"]),
            RecordingNotifier::default(),
            config.hub_gates.clone(),
            PageContext::Hub,
        );
        ProgressionStore::new(memory, reconciler, config)
    }

    fn store_at(record: ProgressionRecord) -> TestStore {
        let json = record.to_json().unwrap();
        store_with(MemoryStore::with_entry(crate::consts::STORAGE_KEY, &json))
    }

    fn notifications(store: &TestStore) -> &[String] {
        &store.gate_sync().notifier().messages
    }

    #[test]
    fn test_load_defaults_when_empty() {
        let store = store_with(MemoryStore::new());
        assert_eq!(store.load(), ProgressionRecord::new(0, 0, 0));
        assert_eq!(store.store().writes, 0);
        assert_eq!(store.store().get(crate::consts::STORAGE_KEY), None);
    }

    #[test]
    fn test_load_defaults_on_malformed_payload() {
        let store = store_with(MemoryStore::with_entry(crate::consts::STORAGE_KEY, "{broken"));
        assert_eq!(store.load(), ProgressionRecord::default());
        assert_eq!(
            store.store().get(crate::consts::STORAGE_KEY).as_deref(),
            Some("{broken")
        );
    }

    #[test]
    fn test_default_record_on_hub() {
        let mut store = store_with(MemoryStore::new());
        store.sync();
        let surface = store.gate_sync().surface();
        assert!(surface.is_locked("monitor"));
        assert!(surface.is_locked("timeline"));
        assert_eq!(
            surface.lock_message("monitor").as_deref(),
            Some("COMPLETE 'IF IT WERE YOU' FIRST")
        );
        assert!(notifications(&store).is_empty());
    }

    #[test]
    fn test_promote_to_first_level() {
        let mut store = store_with(MemoryStore::new());
        store.sync();
        store.promote(1);

        assert_eq!(store.load(), ProgressionRecord::new(1, 0, 0));
        assert_eq!(
            notifications(&store),
            &["SYSTEM UPGRADE: AWARENESS - ACCESS GRANTED".to_string()]
        );
        let surface = store.gate_sync().surface();
        assert!(!surface.is_locked("monitor"));
        assert!(surface.is_locked("timeline"));
    }

    #[test]
    fn test_three_interactions_promote_once() {
        let mut store = store_at(ProgressionRecord::new(1, 0, 0));

        store.record_interaction(1);
        store.record_interaction(1);
        assert_eq!(store.load(), ProgressionRecord::new(1, 0, 2));
        assert!(notifications(&store).is_empty());

        store.record_interaction(1);
        assert_eq!(store.load(), ProgressionRecord::new(2, 0, 3));
        assert_eq!(
            notifications(&store),
            &["SYSTEM UPGRADE: OBSERVER - ACCESS GRANTED".to_string()]
        );
        assert!(!store.gate_sync().surface().is_locked("timeline"));
    }

    #[test]
    fn test_interaction_at_level_zero_does_not_promote() {
        let mut store = store_with(MemoryStore::new());
        store.record_interaction(1);
        assert_eq!(store.load(), ProgressionRecord::new(0, 0, 1));
        assert!(notifications(&store).is_empty());

        store.record_interaction(5);
        assert_eq!(store.load().level, 0);
    }

    #[test]
    fn test_promote_ignores_lower_or_equal() {
        let mut store = store_at(ProgressionRecord::new(2, 0, 3));
        let writes = store.store().writes;
        store.promote(1);
        store.promote(2);
        assert_eq!(store.load(), ProgressionRecord::new(2, 0, 3));
        assert_eq!(store.store().writes, writes);
        assert!(notifications(&store).is_empty());
    }

    #[test]
    fn test_external_promotion_to_terminal_level() {
        let mut store = store_at(ProgressionRecord::new(2, 0, 3));
        store.record_interaction(10);
        assert_eq!(store.load().level, 2);

        store.promote(3);
        assert_eq!(store.load(), ProgressionRecord::new(3, 0, 13));
        assert_eq!(store.current_level().map(|l| l.name.as_str()), Some("SEEKER"));
    }

    #[test]
    fn test_zero_amount_keeps_count() {
        let mut store = store_at(ProgressionRecord::new(1, 0, 2));
        store.record_interaction(interaction_amount(-4.0));
        assert_eq!(store.load(), ProgressionRecord::new(1, 0, 2));
    }

    #[test]
    fn test_interaction_amount_clamps() {
        assert_eq!(interaction_amount(1.0), 1);
        assert_eq!(interaction_amount(2.9), 2);
        assert_eq!(interaction_amount(-1.0), 0);
        assert_eq!(interaction_amount(f64::NAN), 0);
    }

    #[test]
    fn test_negative_promotion_target_is_noop() {
        let mut store = store_at(ProgressionRecord::new(1, 0, 0));
        let writes = store.store().writes;
        store.promote(promotion_target(-1.0));
        store.promote(promotion_target(f64::NAN));
        assert_eq!(store.load(), ProgressionRecord::new(1, 0, 0));
        assert_eq!(store.store().writes, writes);
        assert!(notifications(&store).is_empty());
        assert_eq!(promotion_target(2.0), 2);
    }

    #[test]
    fn test_legacy_fractional_payload_keeps_level() {
        let mut store = store_with(MemoryStore::with_entry(
            crate::consts::STORAGE_KEY,
            r#"{"level":2,"xp":0,"interactions":3.0}"#,
        ));
        assert_eq!(store.load(), ProgressionRecord::new(2, 0, 3));
        store.sync();
        assert!(!store.gate_sync().surface().is_locked("timeline"));
    }

    #[test]
    fn test_interactions_saturate() {
        let mut store = store_at(ProgressionRecord::new(0, 0, u32::MAX - 1));
        store.record_interaction(5);
        assert_eq!(store.load().interactions, u32::MAX);
    }

    #[test]
    fn test_failed_write_still_reconciles() {
        let mut memory = MemoryStore::new();
        memory.read_only = true;
        let mut store = store_with(memory);
        store.sync();
        assert!(store.gate_sync().surface().is_locked("monitor"));
        store.promote(1);

        // Nothing stored, but the page reflects the in-memory transition
        assert_eq!(store.load(), ProgressionRecord::default());
        assert!(!store.gate_sync().surface().is_locked("monitor"));
        assert_eq!(notifications(&store).len(), 1);
    }

    #[test]
    fn test_non_hub_page_only_persists() {
        let config = GateConfig::default();
        let reconciler = Reconciler::new(
            MemorySurface::with_gates(&["monitor", "timeline"]),
            RecordingNotifier::default(),
            GateRegistry::hub(),
            PageContext::Other,
        );
        let mut store = ProgressionStore::new(MemoryStore::new(), reconciler, config);
        store.sync();
        store.record_interaction(1);
        assert_eq!(store.load().interactions, 1);
        assert!(!store.gate_sync().surface().is_locked("monitor"));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "not in the catalog")]
    fn test_unknown_level_fails_loudly_in_debug() {
        let mut store = store_with(MemoryStore::new());
        store.promote(42);
    }

    proptest! {
        #[test]
        fn prop_threshold_promotes_exactly_once(amounts in proptest::collection::vec(0u32..3, 1..20)) {
            let mut store = store_at(ProgressionRecord::new(1, 0, 0));
            let mut total = 0u32;
            for amount in amounts {
                store.record_interaction(amount);
                total += amount;
                let expected = if total >= 3 { 2 } else { 1 };
                prop_assert_eq!(store.load().level, expected);
                prop_assert_eq!(store.load().interactions, total);
            }
            let expected_notes = if total >= 3 { 1 } else { 0 };
            prop_assert_eq!(notifications(&store).len(), expected_notes);
        }

        #[test]
        fn prop_promote_idempotent(start in 0u32..4, target in 0u32..4) {
            let mut once = store_at(ProgressionRecord::new(start, 0, 0));
            once.promote(target);
            let mut twice = store_at(ProgressionRecord::new(start, 0, 0));
            twice.promote(target);
            twice.promote(target);
            prop_assert_eq!(once.load(), twice.load());
            prop_assert_eq!(notifications(&once).len(), notifications(&twice).len());
            prop_assert_eq!(once.load().level, start.max(target));
        }

        #[test]
        fn prop_persist_load_roundtrip(level in 0u32..4, xp in any::<u32>(), interactions in any::<u32>()) {
            let record = ProgressionRecord::new(level, xp, interactions);
            let mut store = store_with(MemoryStore::new());
            store.persist(&record);
            prop_assert_eq!(store.load(), record);
        }
    }
}
