//! Progression Gate - access level tracking for multi-page sites
//!
//! Core modules:
//! - `progression`: Progression store (load/persist, interactions, promotion)
//! - `reconciler`: Lock/unlock planning and application for navigation gates
//! - `levels`: Level catalog
//! - `gates`: Gate definitions and page context
//! - `platform`: Storage and DOM backends
//! - `web`: Browser exports and auto-initialization

pub mod config;
pub mod gates;
pub mod levels;
pub mod platform;
pub mod progression;
pub mod reconciler;
pub mod record;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{GateConfig, InteractionRule, NotifyTiming};
pub use gates::{Gate, GateRegistry, PageContext};
pub use levels::{LevelCatalog, LevelDefinition};
pub use progression::ProgressionStore;
pub use reconciler::{GateSurface, GateSync, Notifier, Reconciler};
pub use record::ProgressionRecord;

/// Deployment constants
pub mod consts {
    /// Durable store key for the progression record
    pub const STORAGE_KEY: &str = "tribulation_progress";

    /// Interactions needed at level 1 to reach level 2
    pub const DEFAULT_INTERACTION_THRESHOLD: u32 = 3;

    /// Toast fully visible (ms)
    pub const NOTIFY_DISPLAY_MS: u32 = 4000;
    /// Toast fade-out before removal (ms)
    pub const NOTIFY_FADE_MS: u32 = 500;

    /// Class marking a locked gate
    pub const LOCK_MARKER_CLASS: &str = "locked";
    pub const LOCK_OVERLAY_CLASS: &str = "lock-overlay";
    pub const LOCK_MESSAGE_CLASS: &str = "lock-message";

    /// `<body>` attribute naming the page kind (`hub`)
    pub const PAGE_ATTRIBUTE: &str = "data-gate-page";
    /// `<body>` attribute holding JSON gate configuration
    pub const CONFIG_ATTRIBUTE: &str = "data-gate-config";
}
