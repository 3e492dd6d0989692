/*!
 * Pause-based block splitting.
 *
 * A long enough silence between subtitles splits a track (or a pair of
 * tracks read side by side) into blocks that can be aligned independently.
 * Blocks are plain index ranges into the caller's entries.
 */

use std::ops::Range;

use crate::subtitle_processor::SubtitleEntry;

/// Default silence (ms) that separates two blocks
pub const DEFAULT_PAUSE_LENGTH_MS: u64 = 3000;

/// Half-open index range `[start, end)` into one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Block {
    pub start: usize,
    pub end: usize,
}

impl Block {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Borrow the entries covered by this block.
    pub fn slice<'a>(&self, entries: &'a [SubtitleEntry]) -> &'a [SubtitleEntry] {
        &entries[self.range()]
    }
}

/// Matching ranges of a primary and a secondary track. Either side may be
/// empty when only one track has subtitles in that stretch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockPair {
    pub primary: Block,
    pub secondary: Block,
}

impl BlockPair {
    pub fn new(primary: Block, secondary: Block) -> Self {
        Self { primary, secondary }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Primary,
    Secondary,
}

/// Splits tracks into blocks at silences of at least `pause_length_ms`.
#[derive(Debug, Clone)]
pub struct BlockSplitter {
    pause_length_ms: u64,
}

impl BlockSplitter {
    pub fn new(pause_length_ms: u64) -> Self {
        Self { pause_length_ms }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_PAUSE_LENGTH_MS)
    }

    pub fn pause_length_ms(&self) -> u64 {
        self.pause_length_ms
    }

    /// Whether an entry starting at `start_ms` still belongs to a block whose
    /// latest end so far is `latest_end_ms`.
    fn continues(&self, latest_end_ms: u64, start_ms: u64) -> bool {
        start_ms < latest_end_ms.saturating_add(self.pause_length_ms)
    }

    /// Split a single track.
    pub fn split(&self, entries: &[SubtitleEntry]) -> Vec<Block> {
        let Some(first) = entries.first() else {
            return Vec::new();
        };

        let mut blocks = Vec::new();
        let mut block_start = 0;
        let mut latest_end = first.end_time_ms;

        for (i, entry) in entries.iter().enumerate().skip(1) {
            if self.continues(latest_end, entry.start_time_ms) {
                latest_end = latest_end.max(entry.end_time_ms);
            } else {
                blocks.push(Block::new(block_start, i));
                block_start = i;
                latest_end = entry.end_time_ms;
            }
        }

        blocks.push(Block::new(block_start, entries.len()));
        blocks
    }

    /// Split two tracks jointly.
    ///
    /// Entries are consumed in start order across both tracks (ties go to
    /// the primary track), so a silence only closes a block when neither
    /// track has anything to say during it.
    pub fn split_paired(&self, primary: &[SubtitleEntry], secondary: &[SubtitleEntry]) -> Vec<BlockPair> {
        let mut blocks = Vec::new();
        let (mut i, mut j) = (0, 0);

        while i < primary.len() || j < secondary.len() {
            let (block_i, block_j) = (i, j);
            let mut latest_end: Option<u64> = None;

            while let Some((side, entry)) = Self::next_pending(primary, secondary, i, j) {
                if let Some(end) = latest_end {
                    if !self.continues(end, entry.start_time_ms) {
                        break;
                    }
                }
                latest_end = Some(latest_end.map_or(entry.end_time_ms, |end| end.max(entry.end_time_ms)));
                match side {
                    Side::Primary => i += 1,
                    Side::Secondary => j += 1,
                }
            }

            blocks.push(BlockPair::new(Block::new(block_i, i), Block::new(block_j, j)));
        }

        blocks
    }

    fn next_pending<'a>(
        primary: &'a [SubtitleEntry],
        secondary: &'a [SubtitleEntry],
        i: usize,
        j: usize,
    ) -> Option<(Side, &'a SubtitleEntry)> {
        match (primary.get(i), secondary.get(j)) {
            (Some(a), Some(b)) if b.start_time_ms < a.start_time_ms => Some((Side::Secondary, b)),
            (Some(a), _) => Some((Side::Primary, a)),
            (None, Some(b)) => Some((Side::Secondary, b)),
            (None, None) => None,
        }
    }
}

impl Default for BlockSplitter {
    fn default() -> Self {
        Self::with_defaults()
    }
}
