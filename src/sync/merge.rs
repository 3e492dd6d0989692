/*!
 * Bilingual entry construction from ordered sync groups.
 *
 * Output timing always follows the primary track. When one side of a group
 * has several entries, the primary span is cut into equal consecutive
 * slices, one per entry on the longer side.
 */

use crate::errors::SyncError;
use crate::subtitle_processor::SubtitleEntry;
use crate::sync::resolver::{GroupShape, SyncGroup};

/// Separator placed between the primary and secondary text
pub const DEFAULT_SEPARATOR: &str = "\n";

/// Builds merged entries for one block.
#[derive(Debug, Clone)]
pub struct SequenceMerger {
    separator: String,
}

impl SequenceMerger {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }

    fn stack(&self, primary: &str, secondary: &str) -> String {
        format!("{}{}{}", primary, self.separator, secondary)
    }

    /// Merge the ordered `groups` of a block. `primary` and `secondary` are
    /// the block's slices; group indices are relative to them. Errors carry
    /// block index 0.
    pub fn merge(
        &self,
        primary: &[SubtitleEntry],
        secondary: &[SubtitleEntry],
        groups: &[SyncGroup],
    ) -> Result<Vec<SubtitleEntry>, SyncError> {
        let mut merged = Vec::with_capacity(groups.len());

        for group in groups {
            let violation = || SyncError::InvariantViolation {
                block: 0,
                a_indices: group.primary.clone(),
                b_indices: group.secondary.clone(),
            };
            let primary_entries = lookup(primary, &group.primary).ok_or_else(violation)?;
            let secondary_entries = lookup(secondary, &group.secondary).ok_or_else(violation)?;

            match (group.shape(), primary_entries.as_slice(), secondary_entries.as_slice()) {
                (GroupShape::PrimaryOnly, [a], []) => merged.push((*a).clone()),
                (GroupShape::SecondaryOnly, [], [b]) => merged.push((*b).clone()),
                (GroupShape::OneToOne, [a], [b]) => merged.push(SubtitleEntry::new(
                    a.seq_num,
                    a.start_time_ms,
                    a.end_time_ms,
                    self.stack(&a.text, &b.text),
                )),
                (GroupShape::ManyToOne, many @ [first, .., last], [b]) => {
                    let slices = split_span(first.start_time_ms, last.end_time_ms, many.len());
                    merged.extend(many.iter().zip(slices).map(|(a, (start, end))| {
                        SubtitleEntry::new(a.seq_num, start, end, self.stack(&a.text, &b.text))
                    }));
                }
                (GroupShape::OneToMany, [a], many) => {
                    let slices = split_span(a.start_time_ms, a.end_time_ms, many.len());
                    merged.extend(many.iter().zip(slices).map(|(b, (start, end))| {
                        SubtitleEntry::new(a.seq_num, start, end, self.stack(&a.text, &b.text))
                    }));
                }
                _ => return Err(violation()),
            }
        }

        Ok(merged)
    }
}

impl Default for SequenceMerger {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn lookup<'a>(entries: &'a [SubtitleEntry], indices: &[usize]) -> Option<Vec<&'a SubtitleEntry>> {
    indices.iter().map(|&index| entries.get(index)).collect()
}

/// Cut `[start, end]` into `parts` consecutive slices of equal width; the
/// last slice always ends at `end`.
pub fn split_span(start: u64, end: u64, parts: usize) -> Vec<(u64, u64)> {
    if parts == 0 {
        return Vec::new();
    }
    let span = end.saturating_sub(start) as u128;
    let boundary = |k: usize| start + (span * k as u128 / parts as u128) as u64;

    (0..parts).map(|k| (boundary(k), boundary(k + 1))).collect()
}
