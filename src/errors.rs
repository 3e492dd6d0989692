/*!
 * Error types for the bisub library.
 *
 * Synchronization failures are typed so that callers processing many blocks
 * can decide whether to abort or isolate a failing block. Collaborator code
 * (SRT I/O, configuration, CLI) uses `anyhow` and converts at the edges.
 */

use thiserror::Error;

/// Errors raised by the synchronization core.
///
/// All index lists are relative to the block named by `block`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    /// The cutoff relaxation loop reached its bound without producing a
    /// consistent partition
    #[error(
        "Unresolvable ambiguity in block {block}: no consistent partition up to cutoff {max_cutoff:.2} (primary {a_index} conflicts with secondary {b_indices:?})"
    )]
    UnresolvableAmbiguity {
        block: usize,
        max_cutoff: f64,
        a_index: usize,
        b_indices: Vec<usize>,
    },

    /// A sync group could not be placed in a temporally consistent position
    #[error(
        "Inconsistent ordering in block {block}: group (primary {a_indices:?}, secondary {b_indices:?}) cannot be placed"
    )]
    InconsistentOrdering {
        block: usize,
        a_indices: Vec<usize>,
        b_indices: Vec<usize>,
    },

    /// A sync group shape outside the five supported ones reached the merger
    #[error(
        "Invariant violation in block {block}: unsupported group shape (primary {a_indices:?}, secondary {b_indices:?})"
    )]
    InvariantViolation {
        block: usize,
        a_indices: Vec<usize>,
        b_indices: Vec<usize>,
    },
}

impl SyncError {
    /// Block the error belongs to
    pub fn block(&self) -> usize {
        match self {
            Self::UnresolvableAmbiguity { block, .. }
            | Self::InconsistentOrdering { block, .. }
            | Self::InvariantViolation { block, .. } => *block,
        }
    }

    /// Re-tag the error with the block it occurred in.
    ///
    /// The resolver, orderer and merger work on a single block and do not
    /// know its position; the synchronizer attaches it.
    pub fn in_block(mut self, index: usize) -> Self {
        match &mut self {
            Self::UnresolvableAmbiguity { block, .. }
            | Self::InconsistentOrdering { block, .. }
            | Self::InvariantViolation { block, .. } => *block = index,
        }
        self
    }
}

/// Errors that can occur while reading subtitle files
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// No valid entry could be parsed
    #[error("No valid subtitle entries found: {0}")]
    Empty(String),

    /// A timestamp could not be parsed
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
