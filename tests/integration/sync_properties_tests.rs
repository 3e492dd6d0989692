/*!
 * Properties of the synchronization pipeline over generated tracks
 */

use anyhow::Result;
use std::collections::BTreeSet;

use bisub::sync::{BlockSplitter, BlockSync, GroupShape, SubtitleSynchronizer, SyncGroup};
use bisub::SyncError;

use crate::common;

const SEEDS: [u64; 5] = [1, 7, 42, 1234, 98765];

/// Every primary and secondary entry lands in exactly one group, and every
/// group has one of the five allowed shapes
#[test]
fn test_sync_block_withGeneratedTracks_shouldPartitionEveryIndex() -> Result<()> {
    let synchronizer = SubtitleSynchronizer::with_defaults();

    for seed in SEEDS {
        let (primary, secondary) = common::generate_uneven_tracks(40, seed, 7);

        for result in synchronizer.compose_blocks(&primary, &secondary) {
            let block = result?;
            let mut seen_primary = Vec::new();
            let mut seen_secondary = Vec::new();

            for group in &block.groups {
                assert_ne!(group.shape(), GroupShape::Invalid, "seed {}: {:?}", seed, group);
                seen_primary.extend(group.primary.iter().copied());
                seen_secondary.extend(group.secondary.iter().copied());
            }

            // Ordered groups list indices strictly increasing on each side
            assert!(seen_primary.windows(2).all(|w| w[0] < w[1]), "seed {}", seed);
            assert!(seen_secondary.windows(2).all(|w| w[0] < w[1]), "seed {}", seed);
            assert_eq!(seen_primary, (0..block.pair.primary.len()).collect::<Vec<_>>());
            assert_eq!(seen_secondary, (0..block.pair.secondary.len()).collect::<Vec<_>>());
        }
    }

    Ok(())
}

/// Merged output keeps every primary line and follows primary timing
#[test]
fn test_compose_withGeneratedTracks_shouldCoverPrimaryTimeline() -> Result<()> {
    let synchronizer = SubtitleSynchronizer::with_defaults();

    for seed in SEEDS {
        let (primary, secondary) = common::generate_uneven_tracks(40, seed, 5);
        let outcome = synchronizer.compose(&primary, &secondary)?;

        for source in &primary {
            assert!(
                outcome.entries.iter().any(|e| e.text.starts_with(&source.text)),
                "seed {}: {} missing",
                seed,
                source.text
            );
        }
        let primary_start = primary.first().map(|e| e.start_time_ms);
        assert_eq!(outcome.entries.first().map(|e| e.start_time_ms), primary_start);
        assert!(outcome.entries.iter().all(|e| e.start_time_ms <= e.end_time_ms));
        assert!(outcome
            .entries
            .iter()
            .enumerate()
            .all(|(i, e)| e.seq_num == i + 1));
    }

    Ok(())
}

/// The same input always yields the same groups and output
#[test]
fn test_compose_withRepeatedRuns_shouldBeDeterministic() -> Result<()> {
    let synchronizer = SubtitleSynchronizer::with_defaults();
    let (primary, secondary) = common::generate_uneven_tracks(60, 3, 4);

    let first = synchronizer.compose(&primary, &secondary)?;
    let second = synchronizer.compose(&primary, &secondary)?;
    assert_eq!(first, second);

    let groups = |results: Vec<Result<BlockSync, SyncError>>| -> Vec<Vec<SyncGroup>> {
        results
            .into_iter()
            .map(|r| r.map(|b| b.groups).unwrap_or_default())
            .collect()
    };
    assert_eq!(
        groups(synchronizer.compose_blocks(&primary, &secondary)),
        groups(synchronizer.compose_blocks(&primary, &secondary))
    );
    Ok(())
}

/// Concatenating the blocks gives back the whole track
#[test]
fn test_split_withGeneratedTracks_shouldConcatenateToInput() {
    for seed in SEEDS {
        let (primary, secondary) = common::generate_uneven_tracks(50, seed, 6);

        for pause in [500, 3000, 10_000] {
            let splitter = BlockSplitter::new(pause);

            let blocks = splitter.split(&primary);
            let joined: Vec<_> = blocks.iter().flat_map(|b| b.slice(&primary).iter().cloned()).collect();
            assert_eq!(joined, primary, "seed {} pause {}", seed, pause);
            assert!(blocks.iter().all(|b| !b.is_empty()));

            let pairs = splitter.split_paired(&primary, &secondary);
            let joined_primary: Vec<_> = pairs.iter().flat_map(|p| p.primary.range()).collect();
            let joined_secondary: Vec<_> = pairs.iter().flat_map(|p| p.secondary.range()).collect();
            assert_eq!(joined_primary, (0..primary.len()).collect::<Vec<_>>());
            assert_eq!(joined_secondary, (0..secondary.len()).collect::<Vec<_>>());
        }
    }
}

/// Jittered tracks separated by long pauses split into blocks of ten
#[test]
fn test_split_paired_withJitteredTracks_shouldFollowPauses() {
    let (primary, secondary) = common::generate_jittered_tracks(35, 5);

    let pairs = BlockSplitter::with_defaults().split_paired(&primary, &secondary);

    let sizes: BTreeSet<(usize, usize)> = pairs.iter().map(|p| (p.primary.len(), p.secondary.len())).collect();
    assert_eq!(pairs.len(), 4);
    assert_eq!(sizes, BTreeSet::from([(10, 10), (5, 5)]));
}
