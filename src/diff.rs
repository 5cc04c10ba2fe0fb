//! Character-level comparison of two texts.
//!
//! Texts are compared as sequences of extended grapheme clusters, so a
//! combining sequence or a `\r\n` pair always lands whole inside a single
//! segment. Lengths reported to the user are counted in `char`s.
//!
//! Matching is deterministic:
//! 1. the common prefix and suffix of every region are matched first;
//! 2. when one side of a region is contained in the other, its earliest
//!    occurrence is matched;
//! 3. otherwise the region is split at the Myers middle snake, searching
//!    forward first and preferring deletions on equal reach;
//! 4. inside a change region, deleted text always precedes inserted text.

mod myers;
pub mod render;

pub use render::{DiffStats, DisplayClass, DisplayUnit, present, summarize};

use unicode_segmentation::UnicodeSegmentation;

/// Default bound on the D-loop of a single middle-snake search.
pub const DEFAULT_MAX_EDIT_COST: usize = 4096;

/// The search bound is raised to one D-step per this many input tokens, so
/// long documents with proportionally many edits still get a minimal script.
const TOKENS_PER_EDIT_STEP: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Unchanged,
    Inserted,
    Deleted,
}

/// A maximal run of text sharing one edit classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSegment {
    pub kind: SegmentKind,
    pub text: String,
}

impl EditSegment {
    pub fn new(kind: SegmentKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Length of the segment in characters
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether this segment is part of the original text
    pub fn on_original_side(&self) -> bool {
        self.kind != SegmentKind::Inserted
    }

    /// Whether this segment is part of the candidate text
    pub fn on_candidate_side(&self) -> bool {
        self.kind != SegmentKind::Deleted
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffOptions {
    /// Regions whose middle snake is not found within this many D-steps are
    /// cut at the furthest point the forward search reached, and both parts
    /// are diffed on their own. Inputs longer than eight tokens per step
    /// raise the bound. It counts work, not time, so output stays reproducible.
    pub max_edit_cost: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            max_edit_cost: DEFAULT_MAX_EDIT_COST,
        }
    }
}

/// Compute the edit segments turning `original` into `candidate`
pub fn diff(original: &str, candidate: &str) -> Vec<EditSegment> {
    diff_with(original, candidate, DiffOptions::default())
}

pub fn diff_with(original: &str, candidate: &str, options: DiffOptions) -> Vec<EditSegment> {
    if original == candidate {
        return if original.is_empty() {
            Vec::new()
        } else {
            vec![EditSegment::new(SegmentKind::Unchanged, original)]
        };
    }

    let old: Vec<&str> = original.graphemes(true).collect();
    let new: Vec<&str> = candidate.graphemes(true).collect();

    let mut builder = SegmentBuilder::default();
    let max_cost = options
        .max_edit_cost
        .max((old.len() + new.len()) / TOKENS_PER_EDIT_STEP);
    myers::diff_tokens(&old, &new, max_cost, &mut builder);
    builder.finish()
}

/// Rebuild the original text from its segments
pub fn original_text(segments: &[EditSegment]) -> String {
    segments
        .iter()
        .filter(|s| s.on_original_side())
        .map(|s| s.text.as_str())
        .collect()
}

/// Rebuild the candidate text from its segments
pub fn candidate_text(segments: &[EditSegment]) -> String {
    segments
        .iter()
        .filter(|s| s.on_candidate_side())
        .map(|s| s.text.as_str())
        .collect()
}

/// Collects token runs into merged segments.
///
/// Deleted and inserted tokens are buffered until the next unchanged run,
/// then emitted deletions first, so a change region yields at most one
/// segment of each kind.
#[derive(Debug, Default)]
pub(crate) struct SegmentBuilder {
    segments: Vec<EditSegment>,
    deleted: String,
    inserted: String,
}

impl SegmentBuilder {
    pub(crate) fn push(&mut self, kind: SegmentKind, tokens: &[&str]) {
        if tokens.is_empty() {
            return;
        }

        match kind {
            SegmentKind::Deleted => self.deleted.extend(tokens.iter().copied()),
            SegmentKind::Inserted => self.inserted.extend(tokens.iter().copied()),
            SegmentKind::Unchanged => {
                self.flush_changes();
                match self.segments.last_mut() {
                    Some(last) if last.kind == SegmentKind::Unchanged => {
                        last.text.extend(tokens.iter().copied())
                    }
                    _ => self
                        .segments
                        .push(EditSegment::new(SegmentKind::Unchanged, tokens.concat())),
                }
            }
        }
    }

    fn flush_changes(&mut self) {
        if !self.deleted.is_empty() {
            let text = std::mem::take(&mut self.deleted);
            self.segments
                .push(EditSegment::new(SegmentKind::Deleted, text));
        }
        if !self.inserted.is_empty() {
            let text = std::mem::take(&mut self.inserted);
            self.segments
                .push(EditSegment::new(SegmentKind::Inserted, text));
        }
    }

    pub(crate) fn finish(mut self) -> Vec<EditSegment> {
        self.flush_changes();
        self.segments
    }
}
