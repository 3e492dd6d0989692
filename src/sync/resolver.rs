/*!
 * Sync group resolution by threshold relaxation.
 *
 * The overlap matrix of a block is pruned row-wise and column-wise at a
 * cutoff, turned into a bipartite adjacency, and every primary and secondary
 * index is assigned to exactly one group. When the adjacency still contains
 * a many-to-many tangle the attempt is discarded and the cutoff is raised,
 * which removes the weakest links first. The loop is bounded by
 * `max_cutoff`.
 */

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::errors::SyncError;
use crate::sync::overlap::OverlapMatrix;

/// Starting cutoff for pruning
pub const DEFAULT_INITIAL_CUTOFF: f64 = 0.16;

/// Cutoff increment between attempts
pub const DEFAULT_CUTOFF_STEP: f64 = 0.01;

/// Last cutoff tried before giving up
pub const DEFAULT_MAX_CUTOFF: f64 = 1.0;

/// Absorbs float drift when stepping towards `max_cutoff`
const CUTOFF_EPSILON: f64 = 1e-9;

/// Block-relative primary and secondary indices aligned with each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncGroup {
    pub primary: Vec<usize>,
    pub secondary: Vec<usize>,
}

/// The five shapes a resolved group can take, plus the invalid remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupShape {
    PrimaryOnly,
    SecondaryOnly,
    OneToOne,
    ManyToOne,
    OneToMany,
    Invalid,
}

impl SyncGroup {
    pub fn new(primary: Vec<usize>, secondary: Vec<usize>) -> Self {
        Self { primary, secondary }
    }

    pub fn shape(&self) -> GroupShape {
        match (self.primary.len(), self.secondary.len()) {
            (1, 0) => GroupShape::PrimaryOnly,
            (0, 1) => GroupShape::SecondaryOnly,
            (1, 1) => GroupShape::OneToOne,
            (n, 1) if n > 1 => GroupShape::ManyToOne,
            (1, m) if m > 1 => GroupShape::OneToMany,
            _ => GroupShape::Invalid,
        }
    }

    pub fn min_primary(&self) -> Option<usize> {
        self.primary.iter().copied().min()
    }

    pub fn min_secondary(&self) -> Option<usize> {
        self.secondary.iter().copied().min()
    }
}

/// Cutoff schedule for the relaxation loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolverConfig {
    pub initial_cutoff: f64,
    pub cutoff_step: f64,
    pub max_cutoff: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            initial_cutoff: DEFAULT_INITIAL_CUTOFF,
            cutoff_step: DEFAULT_CUTOFF_STEP,
            max_cutoff: DEFAULT_MAX_CUTOFF,
        }
    }
}

impl ResolverConfig {
    /// Number of cutoffs tried, always at least one.
    pub fn max_attempts(&self) -> usize {
        if self.cutoff_step <= 0.0 || !self.cutoff_step.is_finite() {
            return 1;
        }
        let span = (self.max_cutoff - self.initial_cutoff).max(0.0);
        (span / self.cutoff_step + CUTOFF_EPSILON).floor() as usize + 1
    }

    /// Cutoff of the given attempt, never above `max_cutoff`.
    pub fn cutoff_for(&self, attempt: usize) -> f64 {
        let cutoff = self.initial_cutoff + self.cutoff_step * attempt as f64;
        if attempt == 0 {
            cutoff
        } else {
            cutoff.min(self.max_cutoff)
        }
    }
}

/// Successful partition of one block.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Groups in discovery order: primary pass first, then leftover secondaries
    pub groups: Vec<SyncGroup>,
    /// Cutoff that produced the partition
    pub cutoff: f64,
    /// Attempts made, including the successful one
    pub attempts: usize,
}

/// Primary index whose neighbourhood could not be split into valid groups.
#[derive(Debug, Clone, PartialEq)]
struct Conflict {
    a_index: usize,
    b_indices: Vec<usize>,
}

/// Bipartite adjacency of a pruned matrix, neighbours in ascending order.
#[derive(Debug)]
struct Adjacency {
    primary: Vec<Vec<usize>>,
    secondary: Vec<Vec<usize>>,
}

impl Adjacency {
    fn from_matrix(matrix: &OverlapMatrix) -> Self {
        let mut primary = vec![Vec::new(); matrix.rows()];
        let mut secondary = vec![Vec::new(); matrix.cols()];

        for (a, neighbours) in primary.iter_mut().enumerate() {
            for (b, &score) in matrix.row(a).iter().enumerate() {
                if score > 0.0 {
                    neighbours.push(b);
                    secondary[b].push(a);
                }
            }
        }

        Self { primary, secondary }
    }
}

/// Resolves overlap matrices into sync groups.
#[derive(Debug, Clone, Default)]
pub struct GroupResolver {
    config: ResolverConfig,
}

impl GroupResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Partition the block described by `matrix`.
    ///
    /// Errors carry block index 0; callers re-tag them with
    /// [`SyncError::in_block`].
    pub fn resolve(&self, matrix: &OverlapMatrix) -> Result<Resolution, SyncError> {
        let max_attempts = self.config.max_attempts();
        let mut last_conflict = None;

        for attempt in 0..max_attempts {
            let cutoff = self.config.cutoff_for(attempt);
            let pruned = prune(matrix, cutoff);
            let adjacency = Adjacency::from_matrix(&pruned);

            match partition(&adjacency) {
                Ok(groups) => {
                    debug!(
                        "Resolved {}x{} block into {} groups at cutoff {:.2} ({} attempts)",
                        matrix.rows(),
                        matrix.cols(),
                        groups.len(),
                        cutoff,
                        attempt + 1
                    );
                    return Ok(Resolution {
                        groups,
                        cutoff,
                        attempts: attempt + 1,
                    });
                }
                Err(conflict) => {
                    trace!(
                        "Cutoff {:.2} left primary {} tangled with {:?}",
                        cutoff, conflict.a_index, conflict.b_indices
                    );
                    last_conflict = Some(conflict);
                }
            }
        }

        let conflict = last_conflict.unwrap_or(Conflict {
            a_index: 0,
            b_indices: Vec::new(),
        });
        Err(SyncError::UnresolvableAmbiguity {
            block: 0,
            max_cutoff: self.config.cutoff_for(max_attempts - 1),
            a_index: conflict.a_index,
            b_indices: conflict.b_indices,
        })
    }
}

/// Normalize rows then columns by their maxima, zeroing cells below `cutoff`.
fn prune(matrix: &OverlapMatrix, cutoff: f64) -> OverlapMatrix {
    let mut pruned = matrix.clone();

    for row in pruned.rows_mut() {
        let max = row.iter().copied().fold(0.0, f64::max);
        if max > 0.0 {
            for cell in row.iter_mut() {
                let normalized = *cell / max;
                *cell = if normalized < cutoff { 0.0 } else { normalized };
            }
        }
    }

    for col in 0..pruned.cols() {
        let max = pruned.column_max(col);
        if max > 0.0 {
            for row in 0..pruned.rows() {
                let normalized = pruned.get(row, col) / max;
                pruned.set(row, col, if normalized < cutoff { 0.0 } else { normalized });
            }
        }
    }

    pruned
}

/// One pass over the primary indices; fails on the first many-to-many tangle.
fn partition(adjacency: &Adjacency) -> Result<Vec<SyncGroup>, Conflict> {
    let mut primary_free = vec![true; adjacency.primary.len()];
    let mut secondary_free = vec![true; adjacency.secondary.len()];
    let mut groups = Vec::new();

    for (a, matches) in adjacency.primary.iter().enumerate() {
        if !primary_free[a] {
            continue;
        }

        let conflict = || Conflict {
            a_index: a,
            b_indices: matches.clone(),
        };

        match matches.as_slice() {
            [] => {
                primary_free[a] = false;
                groups.push(SyncGroup::new(vec![a], Vec::new()));
            }
            &[b] => {
                let owners = &adjacency.secondary[b];
                if !secondary_free[b] || owners.iter().any(|&owner| !primary_free[owner]) {
                    return Err(conflict());
                }
                for &owner in owners {
                    primary_free[owner] = false;
                }
                secondary_free[b] = false;
                groups.push(SyncGroup::new(owners.clone(), vec![b]));
            }
            _ => {
                let exclusive = matches
                    .iter()
                    .all(|&b| secondary_free[b] && adjacency.secondary[b].as_slice() == [a]);
                if !exclusive {
                    return Err(conflict());
                }
                primary_free[a] = false;
                for &b in matches {
                    secondary_free[b] = false;
                }
                groups.push(SyncGroup::new(vec![a], matches.clone()));
            }
        }
    }

    groups.extend(
        secondary_free
            .iter()
            .enumerate()
            .filter(|(_, free)| **free)
            .map(|(b, _)| SyncGroup::new(Vec::new(), vec![b])),
    );

    Ok(groups)
}
