//! Progression Gate entry point
//!
//! On the web the library's start function does the work. Natively this runs
//! a walkthrough of the progression track against in-memory collaborators.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use progression_gate::platform::MemoryStore;
    use progression_gate::reconciler::{MemorySurface, RecordingNotifier};
    use progression_gate::{GateConfig, PageContext, ProgressionStore, Reconciler};

    env_logger::init();
    log::info!("Progression Gate (native) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => GateConfig::from_json(&json),
            Err(e) => {
                log::warn!("Could not read {}: {}", path, e);
                GateConfig::default()
            }
        },
        None => GateConfig::default(),
    };

    let names: Vec<&str> = config.hub_gates.iter().map(|g| g.name.as_str()).collect();
    let reconciler = Reconciler::new(
        MemorySurface::with_gates(&names),
        RecordingNotifier::default(),
        config.hub_gates.clone(),
        PageContext::Hub,
    );
    let mut store = ProgressionStore::new(MemoryStore::new(), reconciler, config);

    store.sync();
    print_state("page load", &store);

    store.promote(1);
    print_state("questionnaire completed", &store);

    for _ in 0..3 {
        store.record_interaction(1);
    }
    print_state("monitor viewed 3 times", &store);

    store.promote(3);
    print_state("prophecy read", &store);

    for message in &store.gate_sync().notifier().messages {
        println!("notification: {}", message);
    }
}

#[cfg(not(target_arch = "wasm32"))]
type DemoStore = progression_gate::ProgressionStore<
    progression_gate::platform::MemoryStore,
    progression_gate::Reconciler<
        progression_gate::reconciler::MemorySurface,
        progression_gate::reconciler::RecordingNotifier,
    >,
>;

#[cfg(not(target_arch = "wasm32"))]
fn print_state(step: &str, store: &DemoStore) {
    use progression_gate::GateSurface;

    let record = store.load();
    let level = store.config().levels.label(record.level);
    println!(
        "{:<26} level={} ({}) interactions={}",
        step, record.level, level, record.interactions
    );
    let surface = store.gate_sync().surface();
    for gate in store.config().hub_gates.iter() {
        let state = match surface.lock_message(&gate.name) {
            Some(message) if surface.is_locked(&gate.name) => format!("locked: {}", message),
            _ => "open".to_string(),
        };
        println!("    {:<10} {}", gate.name, state);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is progression_gate::web::start, this is just to satisfy the compiler
}
