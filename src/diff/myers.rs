//! Linear-space Myers diff over grapheme tokens.
//!
//! Regions are narrowed by their common prefix and suffix, then split at the
//! middle snake found by running the forward and reverse D-path searches
//! towards each other. Both halves go back on a work stack, so memory stays
//! proportional to the input length instead of the product of the lengths.

use super::{SegmentBuilder, SegmentKind};

/// Pending work, processed last-in first-out so output stays in text order
enum Task<'s, 't> {
    Diff(&'s [&'t str], &'s [&'t str]),
    Keep(&'s [&'t str]),
}

/// Where a region is cut before both parts are diffed separately
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Split {
    /// An optimal forward path and an optimal reverse path meet here
    Middle(usize, usize),
    /// The cost bound ran out; furthest point the forward search reached
    Frontier(usize, usize),
    /// Nothing usable was found
    Replace,
}

pub(super) fn diff_tokens(old: &[&str], new: &[&str], max_cost: usize, out: &mut SegmentBuilder) {
    let mut tasks = vec![Task::Diff(old, new)];
    while let Some(task) = tasks.pop() {
        match task {
            Task::Keep(tokens) => out.push(SegmentKind::Unchanged, tokens),
            Task::Diff(old, new) => diff_region(old, new, max_cost, out, &mut tasks),
        }
    }
}

fn diff_region<'s, 't>(
    old: &'s [&'t str],
    new: &'s [&'t str],
    max_cost: usize,
    out: &mut SegmentBuilder,
    tasks: &mut Vec<Task<'s, 't>>,
) {
    let prefix = common_prefix(old, new);
    out.push(SegmentKind::Unchanged, &old[..prefix]);
    let (old, new) = (&old[prefix..], &new[prefix..]);

    let suffix = common_suffix(old, new);
    let (old, old_tail) = old.split_at(old.len() - suffix);
    let new = &new[..new.len() - suffix];
    tasks.push(Task::Keep(old_tail));

    if old.is_empty() {
        out.push(SegmentKind::Inserted, new);
        return;
    }
    if new.is_empty() {
        out.push(SegmentKind::Deleted, old);
        return;
    }

    if old.len() < new.len()
        && let Some(at) = find(new, old)
    {
        out.push(SegmentKind::Inserted, &new[..at]);
        out.push(SegmentKind::Unchanged, old);
        out.push(SegmentKind::Inserted, &new[at + old.len()..]);
        return;
    }
    if new.len() < old.len()
        && let Some(at) = find(old, new)
    {
        out.push(SegmentKind::Deleted, &old[..at]);
        out.push(SegmentKind::Unchanged, new);
        out.push(SegmentKind::Deleted, &old[at + new.len()..]);
        return;
    }

    // A single token that is not contained in the other side shares nothing with it
    if old.len() == 1 || new.len() == 1 {
        out.push(SegmentKind::Deleted, old);
        out.push(SegmentKind::Inserted, new);
        return;
    }

    match middle_snake(old, new, max_cost) {
        Split::Middle(x, y) | Split::Frontier(x, y) => {
            tasks.push(Task::Diff(&old[x..], &new[y..]));
            tasks.push(Task::Diff(&old[..x], &new[..y]));
        }
        Split::Replace => {
            out.push(SegmentKind::Deleted, old);
            out.push(SegmentKind::Inserted, new);
        }
    }
}

fn common_prefix(a: &[&str], b: &[&str]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn common_suffix(a: &[&str], b: &[&str]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

/// Earliest position of `needle` inside `haystack`
fn find(haystack: &[&str], needle: &[&str]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Find the point where an optimal forward path and an optimal reverse path
/// meet. When no overlap is found within `max_cost` D-steps, fall back to the
/// furthest point of the forward search so the non-minimal part stays local.
fn middle_snake(old: &[&str], new: &[&str], max_cost: usize) -> Split {
    let n = old.len() as isize;
    let m = new.len() as isize;
    let max_cost = isize::try_from(max_cost).unwrap_or(isize::MAX);
    let max_d = ((n + m + 1) / 2).min(max_cost);
    let offset = max_d;
    let len = 2 * max_d + 2;

    let mut forward = vec![-1isize; len as usize];
    let mut reverse = vec![-1isize; len as usize];
    forward[(offset + 1) as usize] = 0;
    reverse[(offset + 1) as usize] = 0;

    let delta = n - m;
    // With an odd delta the paths meet during the forward pass
    let front = delta % 2 != 0;

    let in_range = |index: isize| index >= 0 && index < len;

    // Diagonals that already ran off the grid are skipped
    let mut k1_start = 0;
    let mut k1_end = 0;
    let mut k2_start = 0;
    let mut k2_end = 0;

    let mut frontier = (0isize, 0isize);

    for d in 0..max_d {
        let mut k1 = -d + k1_start;
        while k1 <= d - k1_end {
            let k1_offset = (offset + k1) as usize;
            let mut x1 = if k1 == -d
                || (k1 != d && forward[k1_offset - 1] < forward[k1_offset + 1])
            {
                forward[k1_offset + 1]
            } else {
                forward[k1_offset - 1] + 1
            };
            let mut y1 = x1 - k1;
            while x1 < n && y1 < m && old[x1 as usize] == new[y1 as usize] {
                x1 += 1;
                y1 += 1;
            }
            forward[k1_offset] = x1;

            if x1 > n {
                k1_end += 2;
            } else if y1 > m {
                k1_start += 2;
            } else if front {
                let k2_offset = offset + delta - k1;
                if in_range(k2_offset) && reverse[k2_offset as usize] != -1 {
                    let x2 = n - reverse[k2_offset as usize];
                    if x1 >= x2 {
                        return Split::Middle(x1 as usize, y1 as usize);
                    }
                }
            }
            // Ties keep the first diagonal visited
            if x1 <= n && y1 <= m && x1 + y1 > frontier.0 + frontier.1 {
                frontier = (x1, y1);
            }
            k1 += 2;
        }

        let mut k2 = -d + k2_start;
        while k2 <= d - k2_end {
            let k2_offset = (offset + k2) as usize;
            let mut x2 = if k2 == -d
                || (k2 != d && reverse[k2_offset - 1] < reverse[k2_offset + 1])
            {
                reverse[k2_offset + 1]
            } else {
                reverse[k2_offset - 1] + 1
            };
            let mut y2 = x2 - k2;
            while x2 < n && y2 < m && old[(n - x2 - 1) as usize] == new[(m - y2 - 1) as usize] {
                x2 += 1;
                y2 += 1;
            }
            reverse[k2_offset] = x2;

            if x2 > n {
                k2_end += 2;
            } else if y2 > m {
                k2_start += 2;
            } else if !front {
                let k1_offset = offset + delta - k2;
                if in_range(k1_offset) && forward[k1_offset as usize] != -1 {
                    let x1 = forward[k1_offset as usize];
                    let y1 = offset + x1 - k1_offset;
                    if x1 >= n - x2 {
                        return Split::Middle(x1 as usize, y1 as usize);
                    }
                }
            }
            k2 += 2;
        }
    }

    let (x, y) = frontier;
    if x + y > 0 && x + y < n + m {
        Split::Frontier(x as usize, y as usize)
    } else {
        Split::Replace
    }
}
