//! Copper clearance design rule check
//!
//! Uses R-tree spatial indexing for candidate pair filtering, exact shape
//! collision from the geometry core, and Rayon for parallel pair testing.
//!
//! # Submodules
//! - `board` - Board items, zones, footprints and the checker's item view
//! - `rules` - Clearance rule resolution (`RuleResolver`, `DesignRules`)
//! - `settings` - Run configuration
//! - `types` - Violations, report sink, progress/cancel, run summary
//! - `spatial` - R-tree candidate index
//! - `checks` - Per-pair clearance protocol
//! - `zones` - Zone smoothing and the zone-to-zone test
//! - `provider` - Sequential phase runner

pub mod board;
pub mod rules;
pub mod settings;
pub mod types;
pub mod spatial;
pub mod checks;
pub mod zones;
pub mod provider;

pub use board::{is_copper_layer, Board, BoardItem, CopperItem, Footprint, ItemId, ItemKind, NetCode, Zone};
pub use rules::{ClearanceRule, DesignRules, NetClass, ResolvedClearance, RuleCondition, RuleResolver};
pub use settings::DrcSettings;
pub use types::{
    format_mm, CancelFlag, NoProgress, Phase, ProgressReporter, ReportSink, RunSummary, VecSink, Violation,
    ViolationKind,
};
pub use zones::ZoneSmoothing;
pub use provider::ClearanceProvider;
