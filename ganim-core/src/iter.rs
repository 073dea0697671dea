//! Line-visit ordering for one modification.
//!
//! [`ModificationIter`] is pull-based and single-pass: the driver asks for
//! the next line only once it has finished animating the previous one.
//!
//! Both policies visit untouched lines in between touched ones; those items
//! carry empty text and must still be processed, since the driver tracks the
//! cursor through every visit.

use std::iter::Chain;
use std::ops::{Range, RangeInclusive};

use crate::config::IterationPolicy;
use crate::types::Modification;

/// One line to visit. Empty strings mean "nothing to type/erase here".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineVisit<'a> {
    pub line: usize,
    pub added: &'a str,
    pub deleted: &'a str,
}

impl LineVisit<'_> {
    /// Produced alone for a modification with no touched lines.
    pub const SENTINEL: LineVisit<'static> = LineVisit { line: 0, added: "", deleted: "" };

    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty()
    }
}

/// Lazy visit order over a modification's lines.
#[derive(Debug, Clone)]
pub struct ModificationIter<'a> {
    modification: &'a Modification,
    lines: Chain<RangeInclusive<usize>, Range<usize>>,
    sentinel: bool,
}

/// Starts iterating `modification` under `policy`, resuming from `start_line`.
///
/// `start_line` only matters for [`IterationPolicy::Nearest`].
pub fn iterate(
    modification: &Modification,
    policy: IterationPolicy,
    start_line: usize,
) -> ModificationIter<'_> {
    let touched = modification.touched_lines();
    let Some(&last) = touched.last() else {
        return ModificationIter {
            modification,
            lines: empty(),
            sentinel: true,
        };
    };

    let lines = match policy {
        // Stops one short of the last touched line.
        IterationPolicy::TopToBottom => (1..=last.saturating_sub(1)).chain(0..0),
        IterationPolicy::Nearest => {
            let nearest = nearest_line(&touched, start_line);
            (nearest..=last).chain(0..nearest)
        }
    };

    ModificationIter { modification, lines, sentinel: false }
}

/// The touched line closest to `start_line`; ties go to the lower line.
///
/// `touched` must be sorted and non-empty.
pub fn nearest_line(touched: &[usize], start_line: usize) -> usize {
    let pos = touched.partition_point(|&l| l < start_line);
    if pos == 0 {
        return touched[0];
    }
    if pos == touched.len() {
        return touched[touched.len() - 1];
    }
    let below = touched[pos - 1];
    let above = touched[pos];
    if start_line - below <= above - start_line {
        below
    } else {
        above
    }
}

fn empty() -> Chain<RangeInclusive<usize>, Range<usize>> {
    #[allow(clippy::reversed_empty_ranges)]
    let none = 1..=0;
    none.chain(0..0)
}

impl<'a> Iterator for ModificationIter<'a> {
    type Item = LineVisit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.sentinel {
            self.sentinel = false;
            return Some(LineVisit::SENTINEL);
        }
        let line = self.lines.next()?;
        let m = self.modification;
        Some(LineVisit {
            line,
            added: m.added.get(&line).map_or("", String::as_str),
            deleted: m.deleted.get(&line).map_or("", String::as_str),
        })
    }
}
