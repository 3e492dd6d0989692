/*!
 * Synchronization of two subtitle tracks.
 *
 * The pipeline runs per pause block:
 *
 * - `blocks`: pause-based splitting of one track or a pair of tracks
 * - `overlap`: Gaussian timing overlap matrix
 * - `resolver`: cutoff-relaxation partition into sync groups
 * - `ordering`: partial-order placement of groups
 * - `merge`: bilingual entry construction
 * - `review`: flags for items outside clean one-to-one groups
 * - `engine`: the `SubtitleSynchronizer` façade
 */

pub mod blocks;
pub mod engine;
pub mod merge;
pub mod ordering;
pub mod overlap;
pub mod resolver;
pub mod review;

// Re-export main types
pub use blocks::{Block, BlockPair, BlockSplitter};
pub use engine::{BlockErrorPolicy, BlockSync, ComposeOutcome, SubtitleSynchronizer, SyncOptions};
pub use merge::SequenceMerger;
pub use ordering::{compare_groups, order_groups, GroupOrdering};
pub use overlap::OverlapMatrix;
pub use resolver::{GroupResolver, GroupShape, Resolution, ResolverConfig, SyncGroup};
pub use review::{ReviewFlag, ReviewKind, ReviewReport};
