/*!
 * Review flags for alignments that deserve a human look.
 *
 * Anything outside a clean one-to-one pairing is reported with absolute
 * sequence numbers and the time span it covers, so an editor can jump
 * straight to it.
 */

use serde::Serialize;

use crate::errors::SyncError;
use crate::subtitle_processor::SubtitleEntry;
use crate::sync::blocks::BlockPair;
use crate::sync::resolver::{GroupShape, SyncGroup};

/// Why an item was flagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewKind {
    /// Primary entry without any secondary counterpart
    PrimaryOnly,
    /// Secondary entry without any primary counterpart
    SecondaryOnly,
    /// Several primary entries share one secondary entry
    ManyToOne,
    /// One primary entry spans several secondary entries
    OneToMany,
    /// The whole block could not be resolved
    Unresolved,
}

impl ReviewKind {
    fn from_shape(shape: GroupShape) -> Option<Self> {
        match shape {
            GroupShape::PrimaryOnly => Some(Self::PrimaryOnly),
            GroupShape::SecondaryOnly => Some(Self::SecondaryOnly),
            GroupShape::ManyToOne => Some(Self::ManyToOne),
            GroupShape::OneToMany => Some(Self::OneToMany),
            GroupShape::OneToOne | GroupShape::Invalid => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewFlag {
    pub block: usize,
    pub kind: ReviewKind,
    pub primary_seq_nums: Vec<usize>,
    pub secondary_seq_nums: Vec<usize>,
    pub start_ms: u64,
    pub end_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReviewReport {
    pub blocks: usize,
    pub groups: usize,
    pub one_to_one: usize,
    pub flags: Vec<ReviewFlag>,
}

impl ReviewReport {
    pub fn is_clean(&self) -> bool {
        self.flags.is_empty()
    }

    /// Record the groups of one resolved block.
    pub fn add_block(
        &mut self,
        index: usize,
        primary: &[SubtitleEntry],
        secondary: &[SubtitleEntry],
        groups: &[SyncGroup],
    ) {
        self.blocks += 1;
        self.groups += groups.len();

        for group in groups {
            let Some(kind) = ReviewKind::from_shape(group.shape()) else {
                self.one_to_one += 1;
                continue;
            };
            let primary_entries: Vec<&SubtitleEntry> =
                group.primary.iter().filter_map(|&i| primary.get(i)).collect();
            let secondary_entries: Vec<&SubtitleEntry> =
                group.secondary.iter().filter_map(|&i| secondary.get(i)).collect();

            self.flags.push(flag_for(index, kind, &primary_entries, &secondary_entries, None));
        }
    }

    /// Record a block whose resolution failed; every entry in it is flagged
    /// together.
    pub fn add_failed_block(
        &mut self,
        pair: &BlockPair,
        primary: &[SubtitleEntry],
        secondary: &[SubtitleEntry],
        error: &SyncError,
    ) {
        self.blocks += 1;
        let primary_entries: Vec<&SubtitleEntry> = pair.primary.slice(primary).iter().collect();
        let secondary_entries: Vec<&SubtitleEntry> = pair.secondary.slice(secondary).iter().collect();

        self.flags.push(flag_for(
            error.block(),
            ReviewKind::Unresolved,
            &primary_entries,
            &secondary_entries,
            Some(error.to_string()),
        ));
    }
}

fn flag_for(
    block: usize,
    kind: ReviewKind,
    primary: &[&SubtitleEntry],
    secondary: &[&SubtitleEntry],
    reason: Option<String>,
) -> ReviewFlag {
    let all = primary.iter().chain(secondary.iter());
    let start_ms = all.clone().map(|e| e.start_time_ms).min().unwrap_or(0);
    let end_ms = all.map(|e| e.end_time_ms).max().unwrap_or(0);

    ReviewFlag {
        block,
        kind,
        primary_seq_nums: primary.iter().map(|e| e.seq_num).collect(),
        secondary_seq_nums: secondary.iter().map(|e| e.seq_num).collect(),
        start_ms,
        end_ms,
        reason,
    }
}
