use super::{EditSegment, SegmentKind};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiffStats {
    pub added_count: usize,
    pub removed_count: usize,
}

impl DiffStats {
    pub fn has_changes(&self) -> bool {
        self.added_count > 0 || self.removed_count > 0
    }
}

/// Sum the character length of inserted and deleted segments
pub fn summarize(segments: &[EditSegment]) -> DiffStats {
    segments
        .iter()
        .fold(DiffStats::default(), |mut stats, segment| {
            match segment.kind {
                SegmentKind::Inserted => stats.added_count += segment.char_count(),
                SegmentKind::Deleted => stats.removed_count += segment.char_count(),
                SegmentKind::Unchanged => {}
            }
            stats
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayClass {
    Added,
    Removed,
    Unchanged,
}

impl From<SegmentKind> for DisplayClass {
    fn from(kind: SegmentKind) -> Self {
        match kind {
            SegmentKind::Inserted => DisplayClass::Added,
            SegmentKind::Deleted => DisplayClass::Removed,
            SegmentKind::Unchanged => DisplayClass::Unchanged,
        }
    }
}

/// Text ready for the comparison view, kept verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayUnit {
    pub text: String,
    pub class: DisplayClass,
}

/// Map segments to display units, one per segment and in the same order
pub fn present(segments: &[EditSegment]) -> Vec<DisplayUnit> {
    segments
        .iter()
        .map(|segment| DisplayUnit {
            text: segment.text.clone(),
            class: segment.kind.into(),
        })
        .collect()
}
