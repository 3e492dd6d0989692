/*!
 * Synchronizer façade wiring the block pipeline together.
 *
 * For every paired block: build the overlap matrix, resolve sync groups,
 * order them and merge the entries. Blocks are processed in order and
 * their outputs concatenated; the per-block entry points let callers
 * choose their own failure policy.
 */

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::errors::SyncError;
use crate::subtitle_processor::SubtitleEntry;
use crate::sync::blocks::{Block, BlockPair, BlockSplitter, DEFAULT_PAUSE_LENGTH_MS};
use crate::sync::merge::{SequenceMerger, DEFAULT_SEPARATOR};
use crate::sync::ordering::order_groups;
use crate::sync::overlap::OverlapMatrix;
use crate::sync::resolver::{GroupResolver, Resolution, ResolverConfig, SyncGroup};
use crate::sync::review::ReviewReport;

/// What to do when one block cannot be synchronized
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BlockErrorPolicy {
    /// Fail the whole operation
    #[default]
    Abort,
    /// Report the block and continue; composed output keeps the block's
    /// primary entries unmerged
    Skip,
}

/// Parameters of a synchronizer.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOptions {
    pub pause_length_ms: u64,
    pub resolver: ResolverConfig,
    pub separator: String,
    pub on_block_error: BlockErrorPolicy,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            pause_length_ms: DEFAULT_PAUSE_LENGTH_MS,
            resolver: ResolverConfig::default(),
            separator: DEFAULT_SEPARATOR.to_string(),
            on_block_error: BlockErrorPolicy::default(),
        }
    }
}

/// Result of synchronizing one block.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockSync {
    pub index: usize,
    pub pair: BlockPair,
    /// Ordered groups, indices relative to the block
    pub groups: Vec<SyncGroup>,
    /// Merged entries, still carrying their source sequence numbers
    pub entries: Vec<SubtitleEntry>,
    /// Cutoff at which the block resolved
    pub cutoff: f64,
}

/// Result of composing two whole tracks.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeOutcome {
    /// Merged entries numbered from 1
    pub entries: Vec<SubtitleEntry>,
    pub blocks: usize,
    /// Errors of blocks skipped under [`BlockErrorPolicy::Skip`]
    pub skipped: Vec<SyncError>,
    /// Secondary entries of skipped blocks, absent from `entries`
    pub dropped_secondary: usize,
}

/// Aligns a primary and a secondary subtitle track.
#[derive(Debug, Clone)]
pub struct SubtitleSynchronizer {
    splitter: BlockSplitter,
    resolver: GroupResolver,
    merger: SequenceMerger,
    policy: BlockErrorPolicy,
}

impl SubtitleSynchronizer {
    pub fn new(options: SyncOptions) -> Self {
        Self {
            splitter: BlockSplitter::new(options.pause_length_ms),
            resolver: GroupResolver::new(options.resolver),
            merger: SequenceMerger::new(options.separator),
            policy: options.on_block_error,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(SyncOptions::default())
    }

    pub fn policy(&self) -> BlockErrorPolicy {
        self.policy
    }

    /// Pause blocks of a single track.
    pub fn split_blocks(&self, entries: &[SubtitleEntry]) -> Vec<Block> {
        self.splitter.split(entries)
    }

    /// Pause blocks of both tracks read together.
    pub fn split_paired(&self, primary: &[SubtitleEntry], secondary: &[SubtitleEntry]) -> Vec<BlockPair> {
        self.splitter.split_paired(primary, secondary)
    }

    /// Resolve one block without ordering or merging it.
    pub fn resolve_block(
        &self,
        index: usize,
        primary: &[SubtitleEntry],
        secondary: &[SubtitleEntry],
        pair: &BlockPair,
    ) -> Result<Resolution, SyncError> {
        let matrix = OverlapMatrix::build(pair.primary.slice(primary), pair.secondary.slice(secondary));
        self.resolver.resolve(&matrix).map_err(|e| e.in_block(index))
    }

    /// Fully synchronize one block.
    pub fn sync_block(
        &self,
        index: usize,
        primary: &[SubtitleEntry],
        secondary: &[SubtitleEntry],
        pair: &BlockPair,
    ) -> Result<BlockSync, SyncError> {
        let resolution = self.resolve_block(index, primary, secondary, pair)?;
        let groups = order_groups(resolution.groups).map_err(|e| e.in_block(index))?;
        let entries = self
            .merger
            .merge(pair.primary.slice(primary), pair.secondary.slice(secondary), &groups)
            .map_err(|e| e.in_block(index))?;

        debug!(
            "Block {}: {} primary + {} secondary entries -> {} merged (cutoff {:.2})",
            index,
            pair.primary.len(),
            pair.secondary.len(),
            entries.len(),
            resolution.cutoff
        );

        Ok(BlockSync {
            index,
            pair: *pair,
            groups,
            entries,
            cutoff: resolution.cutoff,
        })
    }

    /// Synchronize every block, keeping each block's outcome.
    pub fn compose_blocks(
        &self,
        primary: &[SubtitleEntry],
        secondary: &[SubtitleEntry],
    ) -> Vec<Result<BlockSync, SyncError>> {
        self.split_paired(primary, secondary)
            .iter()
            .enumerate()
            .map(|(index, pair)| self.sync_block(index, primary, secondary, pair))
            .collect()
    }

    /// Compose both tracks into one bilingual track, applying the configured
    /// block error policy.
    pub fn compose(
        &self,
        primary: &[SubtitleEntry],
        secondary: &[SubtitleEntry],
    ) -> Result<ComposeOutcome, SyncError> {
        let pairs = self.split_paired(primary, secondary);
        let mut entries = Vec::with_capacity(primary.len().max(secondary.len()));
        let mut skipped = Vec::new();
        let mut dropped_secondary = 0;

        for (index, pair) in pairs.iter().enumerate() {
            match self.sync_block(index, primary, secondary, pair) {
                Ok(block) => entries.extend(block.entries),
                Err(e) if self.policy == BlockErrorPolicy::Skip => {
                    warn!(
                        "Skipping block {}: {} ({} secondary entries dropped)",
                        index,
                        e,
                        pair.secondary.len()
                    );
                    entries.extend(pair.primary.slice(primary).iter().cloned());
                    dropped_secondary += pair.secondary.len();
                    skipped.push(e);
                }
                Err(e) => return Err(e),
            }
        }

        for (i, entry) in entries.iter_mut().enumerate() {
            entry.seq_num = i + 1;
        }

        info!(
            "Composed {} entries from {} primary and {} secondary entries in {} blocks",
            entries.len(),
            primary.len(),
            secondary.len(),
            pairs.len()
        );

        Ok(ComposeOutcome {
            entries,
            blocks: pairs.len(),
            skipped,
            dropped_secondary,
        })
    }

    /// Report every item that is not part of a clean one-to-one pairing.
    pub fn review(&self, primary: &[SubtitleEntry], secondary: &[SubtitleEntry]) -> Result<ReviewReport, SyncError> {
        let mut report = ReviewReport::default();

        for (index, pair) in self.split_paired(primary, secondary).iter().enumerate() {
            let primary_block = pair.primary.slice(primary);
            let secondary_block = pair.secondary.slice(secondary);

            match self.resolve_block(index, primary, secondary, pair) {
                Ok(resolution) => report.add_block(index, primary_block, secondary_block, &resolution.groups),
                Err(e) if self.policy == BlockErrorPolicy::Skip => {
                    warn!("Block {} could not be resolved: {}", index, e);
                    report.add_failed_block(pair, primary, secondary, &e);
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Reviewed {} blocks: {} of {} groups flagged",
            report.blocks,
            report.flags.len(),
            report.groups
        );

        Ok(report)
    }
}

impl Default for SubtitleSynchronizer {
    fn default() -> Self {
        Self::with_defaults()
    }
}
