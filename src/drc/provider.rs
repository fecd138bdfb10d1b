//! Copper clearance provider
//!
//! [`ClearanceProvider::run`] validates the inputs, then runs the phases in
//! order: pad-pad, track-pad, track-track, track/pad-zone, copper graphics
//! against tracks and pads, and zone-zone. Inside a phase, items are
//! processed in batches of `progress_interval`; each batch fans out over
//! rayon, its results are sorted by item ids and reported up to the
//! per-kind error limit. Progress and cancellation are checked between
//! batches.

use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::DrcResult;
use crate::geometry::Coord;

use super::board::{Board, CopperItem, ItemKind};
use super::checks::{check_pair, should_check_pair, PairContext};
use super::rules::RuleResolver;
use super::settings::DrcSettings;
use super::spatial::SpatialIndex;
use super::types::{ErrorCounter, Phase, ProgressReporter, ReportSink, RunSummary, Violation};
use super::zones::{check_zone_pair, ZoneOutlineCache};

pub struct ClearanceProvider<'a> {
    board: &'a Board,
    rules: &'a dyn RuleResolver,
    settings: &'a DrcSettings,
}

/// How a phase ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PhaseEnd {
    Completed,
    /// Every kind the phase reports reached its limit
    Truncated,
    Cancelled,
}

/// Run-wide plumbing shared by every phase
struct PhaseRunner<'r> {
    sink: &'r dyn ReportSink,
    progress: &'r dyn ProgressReporter,
    counter: &'r ErrorCounter,
    interval: usize,
    margin: Coord,
    phase_count: usize,
}

impl PhaseRunner<'_> {
    fn limit_reached(&self, phase: Phase) -> bool {
        phase.kinds().iter().all(|k| self.counter.is_exceeded(*k))
    }

    /// Test every `a` in `set_a` against the `set_b` items near it. With
    /// `same_set`, each unordered pair is tested once.
    #[allow(clippy::too_many_arguments)]
    fn run<F>(
        &self,
        phase: Phase,
        index: usize,
        set_a: &[CopperItem<'_>],
        set_b: &[CopperItem<'_>],
        same_set: bool,
        test: F,
        summary: &mut RunSummary,
    ) -> DrcResult<PhaseEnd>
    where
        F: Fn(&CopperItem<'_>, &CopperItem<'_>) -> DrcResult<Vec<Violation>> + Sync,
    {
        let start = Instant::now();
        let targets = SpatialIndex::new(set_b);
        debug!(?phase, items = set_a.len(), targets = targets.len(), "phase started");

        let total = set_a.len().max(1);
        let mut done = 0;
        let mut found_in_phase = 0;

        for batch in set_a.chunks(self.interval) {
            if self.progress.is_cancelled() {
                return Ok(PhaseEnd::Cancelled);
            }

            let per_item: Vec<Vec<Violation>> = batch
                .par_iter()
                .map(|a| {
                    let mut out = Vec::new();
                    for j in targets.candidates(&a.bbox, self.margin) {
                        let b = &set_b[j];
                        if same_set && a.id >= b.id {
                            continue;
                        }
                        out.extend(test(a, b)?);
                    }
                    Ok(out)
                })
                .collect::<DrcResult<_>>()?;

            let mut found: Vec<Violation> = per_item.into_iter().flatten().collect();
            found.sort_by(|x, y| x.sort_key().cmp(&y.sort_key()));
            found_in_phase += found.len();

            for violation in found {
                if self.counter.try_take(violation.kind) {
                    self.sink.report(violation);
                    summary.reported += 1;
                } else {
                    summary.suppressed += 1;
                }
            }

            done += batch.len();
            let fraction = (index as f64 + done as f64 / total as f64) / self.phase_count as f64;
            self.progress.report_progress(fraction);

            if self.limit_reached(phase) {
                warn!(?phase, "error limit reached, ending phase early");
                return Ok(PhaseEnd::Truncated);
            }
        }

        debug!(?phase, violations = found_in_phase, elapsed = ?start.elapsed(), "phase finished");
        Ok(PhaseEnd::Completed)
    }
}

impl<'a> ClearanceProvider<'a> {
    pub fn new(board: &'a Board, rules: &'a dyn RuleResolver, settings: &'a DrcSettings) -> Self {
        Self { board, rules, settings }
    }

    fn phase_enabled(&self, phase: Phase) -> bool {
        let s = self.settings;
        match phase {
            Phase::PadToPad => s.test_pads,
            Phase::TrackToPad => s.test_tracks && s.test_pads,
            Phase::TrackToTrack => s.test_tracks,
            Phase::TrackToZone => s.test_zones && (s.test_tracks || s.test_pads),
            Phase::GraphicToCopper => s.test_copper_graphics,
            Phase::ZoneToZone => s.test_zones,
        }
    }

    /// Run every enabled phase, reporting violations to `sink`.
    ///
    /// Settings, board and rules are validated first; a validation error
    /// aborts the run before anything is reported. Hitting the error limit
    /// or cancelling is not an error: the summary says what happened.
    pub fn run(&self, sink: &dyn ReportSink, progress: &dyn ProgressReporter) -> DrcResult<RunSummary> {
        let start = Instant::now();

        self.settings.validate()?;
        self.board.validate()?;
        self.rules.validate(self.board)?;

        let zone_cache = if self.settings.test_zones {
            ZoneOutlineCache::build(&self.board.zones, self.settings.arc_max_error)
        } else {
            ZoneOutlineCache::default()
        };

        let mut items: Vec<CopperItem> = self
            .board
            .items
            .iter()
            .map(CopperItem::from_item)
            .filter(CopperItem::is_on_copper)
            .collect();
        items.sort_by_key(|i| i.id);

        let mut zones: Vec<CopperItem> = zone_cache
            .items(&self.board.zones)
            .into_iter()
            .filter(CopperItem::is_on_copper)
            .collect();
        zones.sort_by_key(|z| z.id);

        let pads: Vec<CopperItem> = items.iter().filter(|i| i.kind == ItemKind::Pad).copied().collect();
        let tracks: Vec<CopperItem> = items.iter().filter(|i| i.kind.is_track()).copied().collect();
        let graphics: Vec<CopperItem> = items.iter().filter(|i| i.kind.is_copper_graphic()).copied().collect();
        let tracks_and_pads: Vec<CopperItem> = items
            .iter()
            .filter(|i| i.kind.is_track() || i.kind == ItemKind::Pad)
            .copied()
            .collect();
        let zone_probes: Vec<CopperItem> = items
            .iter()
            .filter(|i| {
                (self.settings.test_tracks && i.kind.is_track())
                    || (self.settings.test_pads && i.kind == ItemKind::Pad)
            })
            .copied()
            .collect();

        let footprints = self.board.footprint_map();
        let ctx = PairContext {
            rules: self.rules,
            settings: self.settings,
            footprints: &footprints,
        };
        let counter = ErrorCounter::new(self.settings.max_errors_per_kind);

        let phases: Vec<Phase> = Phase::ALL.into_iter().filter(|p| self.phase_enabled(*p)).collect();
        let runner = PhaseRunner {
            sink,
            progress,
            counter: &counter,
            interval: self.settings.progress_interval,
            margin: self.rules.worst_clearance(),
            phase_count: phases.len().max(1),
        };

        info!(
            items = items.len(),
            zones = zones.len(),
            phases = phases.len(),
            margin = runner.margin,
            "clearance check started"
        );

        let pair_test = |a: &CopperItem<'_>, b: &CopperItem<'_>| check_pair(a, b, &ctx);
        let zone_test = |a: &CopperItem<'_>, b: &CopperItem<'_>| {
            if should_check_pair(a, b, ctx.footprints) {
                check_zone_pair(a, b, ctx.rules, ctx.settings)
            } else {
                Ok(Vec::new())
            }
        };

        let mut summary = RunSummary::default();
        for (index, &phase) in phases.iter().enumerate() {
            if runner.limit_reached(phase) {
                summary.phases_truncated.push(phase);
                continue;
            }

            let end = match phase {
                Phase::PadToPad => runner.run(phase, index, &pads, &pads, true, pair_test, &mut summary)?,
                Phase::TrackToPad => runner.run(phase, index, &tracks, &pads, false, pair_test, &mut summary)?,
                Phase::TrackToTrack => runner.run(phase, index, &tracks, &tracks, true, pair_test, &mut summary)?,
                Phase::TrackToZone => runner.run(phase, index, &zone_probes, &zones, false, pair_test, &mut summary)?,
                Phase::GraphicToCopper => {
                    runner.run(phase, index, &graphics, &tracks_and_pads, false, pair_test, &mut summary)?
                }
                Phase::ZoneToZone => runner.run(phase, index, &zones, &zones, true, zone_test, &mut summary)?,
            };

            summary.phases_run.push(phase);
            match end {
                PhaseEnd::Completed => {}
                PhaseEnd::Truncated => summary.phases_truncated.push(phase),
                PhaseEnd::Cancelled => {
                    info!(?phase, "clearance check cancelled");
                    summary.cancelled = true;
                    break;
                }
            }
        }

        if !summary.cancelled {
            progress.report_progress(1.0);
        }

        info!(
            reported = summary.reported,
            suppressed = summary.suppressed,
            elapsed = ?start.elapsed(),
            "clearance check completed"
        );

        Ok(summary)
    }
}
