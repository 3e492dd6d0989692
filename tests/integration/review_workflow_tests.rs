/*!
 * Integration tests for review reports
 */

use anyhow::Result;

use bisub::subtitle_processor::SubtitleCollection;
use bisub::sync::{BlockErrorPolicy, ReviewKind, SubtitleSynchronizer, SyncOptions};

use crate::common::{self, entry};

/// The sample pair has one secondary line covering two primary lines
#[test]
fn test_review_withSamplePair_shouldFlagManyToOneGroup() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let (primary_path, secondary_path) = common::create_sample_pair(temp_dir.path(), "movie")?;
    let primary = SubtitleCollection::read_srt(&primary_path, "zh")?;
    let secondary = SubtitleCollection::read_srt(&secondary_path, "en")?;

    let report = SubtitleSynchronizer::with_defaults().review(&primary.entries, &secondary.entries)?;

    assert_eq!(report.blocks, 2);
    assert_eq!(report.groups, 3);
    assert_eq!(report.one_to_one, 2);
    assert!(!report.is_clean());
    assert_eq!(report.flags.len(), 1);

    let flag = &report.flags[0];
    assert_eq!(flag.block, 0);
    assert_eq!(flag.kind, ReviewKind::ManyToOne);
    assert_eq!(flag.primary_seq_nums, vec![2, 3]);
    assert_eq!(flag.secondary_seq_nums, vec![2]);
    assert_eq!((flag.start_ms, flag.end_ms), (2500, 4000));
    Ok(())
}

/// Clean one-to-one tracks produce no flags
#[test]
fn test_review_withJitteredTracks_shouldBeClean() -> Result<()> {
    let (primary, secondary) = common::generate_jittered_tracks(30, 11);

    let report = SubtitleSynchronizer::with_defaults().review(&primary, &secondary)?;

    assert_eq!(report.blocks, 3);
    assert_eq!(report.groups, 30);
    assert_eq!(report.one_to_one, 30);
    assert!(report.is_clean());
    Ok(())
}

/// Lone lines are flagged with absolute sequence numbers
#[test]
fn test_review_withLoneLines_shouldUseAbsoluteSeqNums() -> Result<()> {
    let primary = vec![
        entry(1, 0, 1000, "甲"),
        entry(2, 10_000, 11_000, "乙"),
        entry(3, 15_000, 16_000, "丙"),
    ];
    let secondary = vec![entry(1, 0, 1000, "A"), entry(2, 10_000, 11_000, "B")];

    let report = SubtitleSynchronizer::with_defaults().review(&primary, &secondary)?;

    assert_eq!(report.blocks, 3);
    assert_eq!(report.flags.len(), 1);
    let flag = &report.flags[0];
    assert_eq!(flag.block, 2);
    assert_eq!(flag.kind, ReviewKind::PrimaryOnly);
    assert_eq!(flag.primary_seq_nums, vec![3]);
    assert!(flag.secondary_seq_nums.is_empty());
    assert_eq!((flag.start_ms, flag.end_ms), (15_000, 16_000));
    Ok(())
}

/// A line within the pause of a translated one joins its group
#[test]
fn test_review_withCloseUntranslatedLine_shouldFlagManyToOne() -> Result<()> {
    let primary = vec![
        entry(1, 0, 1000, "甲"),
        entry(2, 10_000, 11_000, "乙"),
        entry(3, 12_000, 13_000, "丙"),
    ];
    let secondary = vec![entry(1, 0, 1000, "A"), entry(2, 10_000, 11_000, "B")];

    let report = SubtitleSynchronizer::with_defaults().review(&primary, &secondary)?;

    assert_eq!(report.flags.len(), 1);
    let flag = &report.flags[0];
    assert_eq!(flag.block, 1);
    assert_eq!(flag.kind, ReviewKind::ManyToOne);
    assert_eq!(flag.primary_seq_nums, vec![2, 3]);
    assert_eq!(flag.secondary_seq_nums, vec![2]);
    Ok(())
}

/// Instant lines have no spread, so one off its only candidate scores zero
/// and stays alone inside a shared block
#[test]
fn test_review_withInstantLinesApart_shouldFlagPrimaryOnlyInSharedBlock() -> Result<()> {
    let primary = vec![entry(1, 1000, 1000, "甲"), entry(2, 2000, 2000, "乙")];
    let secondary = vec![entry(1, 1000, 1000, "A")];
    let synchronizer = SubtitleSynchronizer::with_defaults();

    let report = synchronizer.review(&primary, &secondary)?;

    assert_eq!(report.blocks, 1);
    assert_eq!(report.one_to_one, 1);
    assert_eq!(report.flags.len(), 1);
    let flag = &report.flags[0];
    assert_eq!(flag.block, 0);
    assert_eq!(flag.kind, ReviewKind::PrimaryOnly);
    assert_eq!(flag.primary_seq_nums, vec![2]);
    assert!(flag.secondary_seq_nums.is_empty());

    let outcome = synchronizer.compose(&primary, &secondary)?;
    assert_eq!(
        outcome.entries,
        vec![entry(1, 1000, 1000, "甲\nA"), entry(2, 2000, 2000, "乙")]
    );
    Ok(())
}

/// With the skip policy an unresolvable block is reported, not fatal
#[test]
fn test_review_withTieAndSkipPolicy_shouldSerializeUnresolvedFlag() -> Result<()> {
    let primary = vec![entry(1, 0, 1000, "甲"), entry(2, 0, 1000, "乙")];
    let secondary = vec![entry(1, 0, 1000, "A"), entry(2, 0, 1000, "B")];

    assert!(SubtitleSynchronizer::with_defaults().review(&primary, &secondary).is_err());

    let synchronizer = SubtitleSynchronizer::new(SyncOptions {
        on_block_error: BlockErrorPolicy::Skip,
        ..Default::default()
    });
    let report = synchronizer.review(&primary, &secondary)?;

    assert_eq!(report.flags.len(), 1);
    assert_eq!(report.flags[0].kind, ReviewKind::Unresolved);

    let json: serde_json::Value = serde_json::to_value(&report)?;
    assert_eq!(json["blocks"], 1);
    assert_eq!(json["flags"][0]["kind"], "unresolved");
    assert_eq!(json["flags"][0]["primary_seq_nums"], serde_json::json!([1, 2]));
    assert!(json["flags"][0]["reason"]
        .as_str()
        .is_some_and(|r| r.contains("Unresolvable ambiguity")));
    Ok(())
}
