//! DRC data types
//!
//! Violation records, the report sink and progress/cancel interfaces the
//! checker talks to, and the per-run summary.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::geometry::{Coord, Vector2I};

use super::board::ItemId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Two items closer than the required clearance
    Clearance,
    /// Two tracks whose centerlines cross
    TracksCrossing,
    /// Two zones overlapping or one inside the other
    ZonesIntersect,
}

impl ViolationKind {
    pub const ALL: [ViolationKind; 3] = [
        ViolationKind::Clearance,
        ViolationKind::TracksCrossing,
        ViolationKind::ZonesIntersect,
    ];

    fn index(self) -> usize {
        match self {
            ViolationKind::Clearance => 0,
            ViolationKind::TracksCrossing => 1,
            ViolationKind::ZonesIntersect => 2,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ViolationKind::Clearance => "Clearance violation",
            ViolationKind::TracksCrossing => "Tracks crossing",
            ViolationKind::ZonesIntersect => "Copper areas intersect",
        }
    }
}

/// One reported problem. `item_a` is always the smaller id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub item_a: ItemId,
    pub item_b: ItemId,
    pub layer: String,
    pub location: Vector2I,
    pub required: Coord,
    pub actual: Coord,
    pub rule_name: String,
    pub message: String,
}

impl Violation {
    pub fn new(
        kind: ViolationKind,
        items: (ItemId, ItemId),
        layer: &str,
        location: Vector2I,
        required: Coord,
        actual: Coord,
        rule_name: &str,
    ) -> Self {
        let (item_a, item_b) = if items.0 <= items.1 { items } else { (items.1, items.0) };
        let message = match kind {
            ViolationKind::Clearance => format!(
                "{} ({} clearance {}; actual {})",
                kind.title(),
                rule_name,
                format_mm(required),
                format_mm(actual)
            ),
            ViolationKind::TracksCrossing | ViolationKind::ZonesIntersect => kind.title().to_string(),
        };

        Self {
            kind,
            item_a,
            item_b,
            layer: layer.to_string(),
            location,
            required,
            actual,
            rule_name: rule_name.to_string(),
            message,
        }
    }

    /// Deterministic report order
    pub fn sort_key(&self) -> (ItemId, ItemId, ViolationKind, &str, Vector2I) {
        (self.item_a, self.item_b, self.kind, self.layer.as_str(), self.location)
    }
}

/// Native units (nm) as millimetres
pub fn format_mm(value: Coord) -> String {
    format!("{:.4} mm", value as f64 / 1_000_000.0)
}

/// Receives violations as they are found
pub trait ReportSink: Sync {
    fn report(&self, violation: Violation);
}

/// Collects violations in memory
#[derive(Debug, Default)]
pub struct VecSink {
    violations: Mutex<Vec<Violation>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.violations.lock().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ReportSink for VecSink {
    fn report(&self, violation: Violation) {
        let mut guard = self.violations.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.push(violation);
    }
}

/// Progress reports and cooperative cancellation
pub trait ProgressReporter: Sync {
    /// Overall completion in [0, 1]
    fn report_progress(&self, fraction: f64);

    fn is_cancelled(&self) -> bool;
}

/// Ignores progress and never cancels
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report_progress(&self, _fraction: f64) {}

    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Cancel switch that can be flipped from another thread
#[derive(Debug, Default)]
pub struct CancelFlag {
    cancelled: AtomicBool,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

impl ProgressReporter for CancelFlag {
    fn report_progress(&self, _fraction: f64) {}

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Per-kind report budget shared across phases
#[derive(Debug)]
pub struct ErrorCounter {
    limit: Option<usize>,
    counts: [AtomicUsize; 3],
}

impl ErrorCounter {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            limit,
            counts: Default::default(),
        }
    }

    /// Claim a slot for one more violation of `kind`
    pub fn try_take(&self, kind: ViolationKind) -> bool {
        let counter = &self.counts[kind.index()];
        match self.limit {
            None => {
                counter.fetch_add(1, Ordering::Relaxed);
                true
            }
            Some(limit) => counter
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| (n < limit).then_some(n + 1))
                .is_ok(),
        }
    }

    pub fn is_exceeded(&self, kind: ViolationKind) -> bool {
        self.limit
            .map_or(false, |limit| self.count(kind) >= limit)
    }

    pub fn count(&self, kind: ViolationKind) -> usize {
        self.counts[kind.index()].load(Ordering::Relaxed)
    }
}

/// Sequential phases of a run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    PadToPad,
    TrackToPad,
    TrackToTrack,
    TrackToZone,
    GraphicToCopper,
    ZoneToZone,
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::PadToPad,
        Phase::TrackToPad,
        Phase::TrackToTrack,
        Phase::TrackToZone,
        Phase::GraphicToCopper,
        Phase::ZoneToZone,
    ];

    /// Kinds of violation this phase can produce
    pub fn kinds(self) -> &'static [ViolationKind] {
        match self {
            Phase::TrackToTrack => &[ViolationKind::Clearance, ViolationKind::TracksCrossing],
            Phase::ZoneToZone => &[ViolationKind::Clearance, ViolationKind::ZonesIntersect],
            Phase::PadToPad | Phase::TrackToPad | Phase::TrackToZone | Phase::GraphicToCopper => {
                &[ViolationKind::Clearance]
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub phases_run: Vec<Phase>,
    /// Phases that stopped early because every kind they report hit its limit
    pub phases_truncated: Vec<Phase>,
    pub reported: usize,
    /// Violations found but dropped by the per-kind limit
    pub suppressed: usize,
    pub cancelled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_orders_items() {
        let v = Violation::new(
            ViolationKind::Clearance,
            (9, 4),
            "F.Cu",
            Vector2I::new(1, 2),
            200_000,
            150_000,
            "netclass 'Default'",
        );
        assert_eq!((v.item_a, v.item_b), (4, 9));
        assert_eq!(
            v.message,
            "Clearance violation (netclass 'Default' clearance 0.2000 mm; actual 0.1500 mm)"
        );
    }

    #[test]
    fn test_error_counter_limit() {
        let counter = ErrorCounter::new(Some(2));
        assert!(counter.try_take(ViolationKind::Clearance));
        assert!(counter.try_take(ViolationKind::Clearance));
        assert!(!counter.try_take(ViolationKind::Clearance));
        assert!(counter.is_exceeded(ViolationKind::Clearance));
        assert!(!counter.is_exceeded(ViolationKind::TracksCrossing));
        assert_eq!(counter.count(ViolationKind::Clearance), 2);
    }

    #[test]
    fn test_unlimited_counter() {
        let counter = ErrorCounter::new(None);
        for _ in 0..10 {
            assert!(counter.try_take(ViolationKind::ZonesIntersect));
        }
        assert!(!counter.is_exceeded(ViolationKind::ZonesIntersect));
    }

    #[test]
    fn test_vec_sink_collects() {
        let sink = VecSink::new();
        sink.report(Violation::new(
            ViolationKind::TracksCrossing,
            (1, 2),
            "B.Cu",
            Vector2I::new(0, 0),
            0,
            0,
            "",
        ));
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.into_violations()[0].message, "Tracks crossing");
    }
}
