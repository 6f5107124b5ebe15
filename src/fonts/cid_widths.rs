//! CID font width arrays (/W).
//!
//! The /W array mixes two forms:
//!
//! ```text
//! [ c [w1 w2 ... wn]     % widths for c, c+1, ..., c+n-1
//!   c_first c_last w ]   % one width for the whole range
//! ```
//!
//! Ranges can cover tens of thousands of CIDs, so they are kept as segments
//! instead of being expanded per code.

use crate::object::{Object, ObjectResolver};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
enum SegmentWidths {
    Uniform(f64),
    Individual(Vec<f64>),
}

#[derive(Debug, Clone, PartialEq)]
struct Segment {
    first: u32,
    last: u32,
    widths: SegmentWidths,
}

impl Segment {
    fn width(&self, cid: u32) -> f64 {
        match &self.widths {
            SegmentWidths::Uniform(w) => *w,
            SegmentWidths::Individual(ws) => ws[(cid - self.first) as usize],
        }
    }

    /// The part of this segment inside `first..=last`, if any.
    fn slice(&self, first: u32, last: u32) -> Option<Segment> {
        let first = first.max(self.first);
        let last = last.min(self.last);
        if first > last {
            return None;
        }
        let widths = match &self.widths {
            SegmentWidths::Uniform(w) => SegmentWidths::Uniform(*w),
            SegmentWidths::Individual(ws) => {
                let start = (first - self.first) as usize;
                let end = (last - self.first) as usize;
                SegmentWidths::Individual(ws[start..=end].to_vec())
            },
        };
        Some(Segment {
            first,
            last,
            widths,
        })
    }
}

/// Per-CID width overrides of a CID-keyed font.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CidWidths {
    /// Non-overlapping, sorted by first CID
    segments: Vec<Segment>,
    malformed: usize,
}

impl CidWidths {
    /// Parse a /W array. References inside the array are resolved through
    /// `resolver`; unusable items are counted in [`malformed_entries`](Self::malformed_entries).
    pub fn parse<R: ObjectResolver + ?Sized>(items: &[Object], resolver: &R) -> Self {
        let mut widths = Self::default();
        let mut pending: Vec<f64> = Vec::new();
        // In source order; overlaps are resolved once at the end
        let mut entries: Vec<Segment> = Vec::new();

        for item in items {
            let resolved = match resolver.resolve(item) {
                Ok(obj) => obj,
                Err(e) => {
                    log::debug!("Unresolvable /W entry {:?}: {}", item, e);
                    widths.malformed += 1;
                    continue;
                },
            };

            match &resolved {
                Object::Array(list) => {
                    if pending.len() != 1 {
                        widths.malformed += 1;
                        pending.clear();
                        continue;
                    }
                    let first = pending[0];
                    pending.clear();

                    if first < 0.0 {
                        widths.malformed += 1;
                        continue;
                    }
                    widths.malformed += push_individual(&mut entries, first as u32, list, resolver);
                },
                other => match other.as_number() {
                    Some(n) => {
                        pending.push(n);
                        if pending.len() == 3 {
                            let (first, last, w) = (pending[0], pending[1], pending[2]);
                            pending.clear();
                            if first < 0.0 || last < first {
                                widths.malformed += 1;
                                continue;
                            }
                            entries.push(Segment {
                                first: first as u32,
                                last: last as u32,
                                widths: SegmentWidths::Uniform(w),
                            });
                        }
                    },
                    None => widths.malformed += 1,
                },
            }
        }

        if !pending.is_empty() {
            widths.malformed += 1;
        }

        widths.segments = resolve_overlaps(entries);

        log::trace!(
            "Parsed /W array: {} segments, {} malformed",
            widths.segments.len(),
            widths.malformed
        );
        widths
    }

    /// Width override for `cid`, if any.
    pub fn get(&self, cid: u32) -> Option<f64> {
        let pos = self.segments.partition_point(|s| s.first <= cid);
        let segment = &self.segments[pos.checked_sub(1)?];
        (cid <= segment.last).then(|| segment.width(cid))
    }

    /// Number of stored ranges.
    pub fn range_count(&self) -> usize {
        self.segments.len()
    }

    /// True if no override is defined.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of items in the source array that could not be used.
    pub fn malformed_entries(&self) -> usize {
        self.malformed
    }
}

/// Push the widths of one `c [w1 w2 ...]` entry. Items that are not numbers
/// split the list, so every width stays on its own CID and the bad slots fall
/// back to /DW. Returns the number of bad slots.
fn push_individual<R: ObjectResolver + ?Sized>(
    entries: &mut Vec<Segment>,
    first: u32,
    list: &[Object],
    resolver: &R,
) -> usize {
    let mut bad = 0;
    let mut run: Vec<f64> = Vec::new();
    let mut run_first = first;

    let mut flush = |run: &mut Vec<f64>, run_first: u32| {
        if let Some(len) = (run.len() as u32).checked_sub(1) {
            entries.push(Segment {
                first: run_first,
                last: run_first.saturating_add(len),
                widths: SegmentWidths::Individual(std::mem::take(run)),
            });
        }
    };

    for (offset, item) in list.iter().enumerate() {
        let Some(cid) = u32::try_from(offset).ok().and_then(|o| first.checked_add(o)) else {
            bad += list.len() - offset;
            break;
        };
        match resolver.resolve(item).ok().and_then(|w| w.as_number()) {
            Some(w) => {
                if run.is_empty() {
                    run_first = cid;
                }
                run.push(w);
            },
            None => {
                bad += 1;
                flush(&mut run, run_first);
            },
        }
    }
    flush(&mut run, run_first);
    bad
}

/// Turn segments in source order into sorted, non-overlapping segments where
/// later entries win.
///
/// Segments are visited latest first. `covered` holds the merged spans already
/// claimed, so each earlier segment only keeps its uncovered gaps.
fn resolve_overlaps(entries: Vec<Segment>) -> Vec<Segment> {
    let mut covered: BTreeMap<u32, u32> = BTreeMap::new();
    let mut segments = Vec::with_capacity(entries.len());

    for entry in entries.into_iter().rev() {
        let (first, last) = (entry.first, entry.last);
        let mut cursor = first as u64;
        let mut merged = (first, last);

        if let Some((&f, &l)) = covered.range(..first).next_back() {
            if l as u64 + 1 >= first as u64 {
                cursor = cursor.max(l as u64 + 1);
                merged = (f, merged.1.max(l));
                covered.remove(&f);
            }
        }

        let touching: Vec<(u32, u32)> = covered
            .range(first..=last.saturating_add(1))
            .map(|(&f, &l)| (f, l))
            .collect();
        for (f, l) in touching {
            if (f as u64) > cursor {
                let gap_last = (f as u64 - 1).min(last as u64);
                if cursor <= gap_last {
                    segments.extend(entry.slice(cursor as u32, gap_last as u32));
                }
            }
            cursor = cursor.max(l as u64 + 1);
            merged.1 = merged.1.max(l);
            covered.remove(&f);
        }
        if cursor <= last as u64 {
            segments.extend(entry.slice(cursor as u32, last));
        }

        covered.insert(merged.0, merged.1);
    }

    segments.sort_by_key(|s| s.first);
    segments
}
