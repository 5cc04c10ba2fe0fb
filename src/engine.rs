//! Readiness-gated access to the diff engine.
//!
//! The host owns a [`ReadinessGate`] and flips it once the comparison
//! service is up. [`DiffEngine::compute`] refuses to run unless the gate is
//! `Ready`, and never lets a failure escape as a panic.

use crate::diff::{self, DiffOptions, DiffStats, DisplayUnit, EditSegment};
use std::any::Any;
use std::panic::{self, UnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Pending,
    Ready,
    Unavailable,
}

impl Readiness {
    fn to_u8(self) -> u8 {
        match self {
            Readiness::Pending => 0,
            Readiness::Ready => 1,
            Readiness::Unavailable => 2,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => Readiness::Ready,
            2 => Readiness::Unavailable,
            _ => Readiness::Pending,
        }
    }
}

/// Shared readiness flag, cheap to clone across threads
#[derive(Debug, Clone, Default)]
pub struct ReadinessGate {
    state: Arc<AtomicU8>,
}

impl ReadinessGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Readiness {
        Readiness::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn set(&self, readiness: Readiness) {
        let previous = Readiness::from_u8(self.state.swap(readiness.to_u8(), Ordering::AcqRel));
        if previous != readiness {
            info!("Diff engine readiness: {:?} -> {:?}", previous, readiness);
        }
    }

    pub fn is_ready(&self) -> bool {
        self.get() == Readiness::Ready
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiffError {
    #[error("Diff engine is not ready yet")]
    NotReady,

    #[error("Diff engine unavailable")]
    EngineUnavailable,

    #[error("Diff computation failed: {0}")]
    ComputationFailure(String),
}

/// Segments of one comparison together with their aggregate counts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    segments: Vec<EditSegment>,
    stats: DiffStats,
}

impl DiffResult {
    pub fn from_segments(segments: Vec<EditSegment>) -> Self {
        let stats = diff::summarize(&segments);
        Self { segments, stats }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[EditSegment] {
        &self.segments
    }

    pub fn stats(&self) -> DiffStats {
        self.stats
    }

    pub fn added_count(&self) -> usize {
        self.stats.added_count
    }

    pub fn removed_count(&self) -> usize {
        self.stats.removed_count
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn display_units(&self) -> Vec<DisplayUnit> {
        diff::present(&self.segments)
    }
}

pub struct DiffEngine {
    gate: ReadinessGate,
    options: DiffOptions,
}

impl DiffEngine {
    pub fn new(gate: ReadinessGate, options: DiffOptions) -> Self {
        Self { gate, options }
    }

    pub fn gate(&self) -> &ReadinessGate {
        &self.gate
    }

    pub fn compute(&self, original: &str, candidate: &str) -> Result<DiffResult, DiffError> {
        match self.gate.get() {
            Readiness::Pending => return Err(DiffError::NotReady),
            Readiness::Unavailable => return Err(DiffError::EngineUnavailable),
            Readiness::Ready => {}
        }

        let options = self.options;
        guarded(|| diff::diff_with(original, candidate, options))
    }
}

/// Fall back to an empty result on any failure, so callers render every
/// "no result" case the same way.
pub fn resolve(outcome: Result<DiffResult, DiffError>) -> DiffResult {
    outcome.unwrap_or_else(|e| {
        warn!("No comparison available: {}", e);
        DiffResult::empty()
    })
}

fn guarded<F>(compute: F) -> Result<DiffResult, DiffError>
where
    F: FnOnce() -> Vec<EditSegment> + UnwindSafe,
{
    panic::catch_unwind(compute)
        .map(DiffResult::from_segments)
        .map_err(|payload| DiffError::ComputationFailure(panic_message(payload.as_ref())))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(readiness: Readiness) -> DiffEngine {
        let gate = ReadinessGate::new();
        gate.set(readiness);
        DiffEngine::new(gate, DiffOptions::default())
    }

    #[test]
    fn gate_starts_pending() {
        let gate = ReadinessGate::new();
        assert_eq!(gate.get(), Readiness::Pending);
        assert!(!gate.is_ready());
    }

    #[test]
    fn gate_is_shared_between_clones() {
        let gate = ReadinessGate::new();
        let clone = gate.clone();
        clone.set(Readiness::Ready);
        assert!(gate.is_ready());
        clone.set(Readiness::Unavailable);
        assert_eq!(gate.get(), Readiness::Unavailable);
    }

    #[test]
    fn ready_engine_computes_counts() {
        let result = engine(Readiness::Ready).compute("casa", "caza").unwrap();
        assert_eq!(result.added_count(), 1);
        assert_eq!(result.removed_count(), 1);
        assert_eq!(result.display_units().len(), 4);
    }

    #[test]
    fn pending_engine_refuses() {
        let outcome = engine(Readiness::Pending).compute("a", "b");
        assert_eq!(outcome, Err(DiffError::NotReady));
    }

    #[test]
    fn unavailable_engine_yields_empty_fallback() {
        let outcome = engine(Readiness::Unavailable).compute("texto", "texto revisado");
        assert_eq!(outcome, Err(DiffError::EngineUnavailable));

        let result = resolve(outcome);
        assert!(result.is_empty());
        assert!(result.display_units().is_empty());
        assert_eq!(result.stats(), DiffStats::default());
    }

    #[test]
    fn unavailable_is_distinct_from_identical() {
        let identical = resolve(engine(Readiness::Ready).compute("igual", "igual"));
        assert_eq!(identical.segments().len(), 1);
        assert!(!identical.stats().has_changes());

        let both_empty = engine(Readiness::Ready).compute("", "");
        assert!(both_empty.is_ok_and(|r| r.is_empty()));
    }

    #[test]
    fn panics_become_computation_failures() {
        let outcome = guarded(|| panic!("boom"));
        assert_eq!(
            outcome,
            Err(DiffError::ComputationFailure("boom".to_string()))
        );
        assert!(resolve(outcome).is_empty());
    }

    #[test]
    fn panic_message_from_formatted_string() {
        let outcome = guarded(|| panic!("bad index {}", 3));
        assert_eq!(
            outcome,
            Err(DiffError::ComputationFailure("bad index 3".to_string()))
        );
    }
}
