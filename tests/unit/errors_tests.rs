/*!
 * Tests for error types and conversions
 */

use bisub::errors::{SubtitleError, SyncError};

/// Test ambiguity error message
#[test]
fn test_sync_error_display_withAmbiguity_shouldNameBlockAndIndices() {
    let error = SyncError::UnresolvableAmbiguity {
        block: 3,
        max_cutoff: 1.0,
        a_index: 1,
        b_indices: vec![0, 1],
    };

    let message = error.to_string();
    assert!(message.contains("Unresolvable ambiguity"));
    assert!(message.contains("block 3"));
    assert!(message.contains("1.00"));
    assert!(message.contains("[0, 1]"));
}

/// Test block re-tagging
#[test]
fn test_sync_error_in_block_withEachVariant_shouldReplaceBlock() {
    let errors = vec![
        SyncError::UnresolvableAmbiguity { block: 0, max_cutoff: 1.0, a_index: 0, b_indices: vec![0] },
        SyncError::InconsistentOrdering { block: 0, a_indices: vec![1], b_indices: vec![0] },
        SyncError::InvariantViolation { block: 0, a_indices: vec![0, 1], b_indices: vec![0, 1] },
    ];

    for error in errors {
        let tagged = error.clone().in_block(7);
        assert_eq!(tagged.block(), 7);
        assert_eq!(error.block(), 0);
    }
}

/// Test subtitle error messages
#[test]
fn test_subtitle_error_display_withInvalidTimestamp_shouldQuoteInput() {
    let error = SubtitleError::InvalidTimestamp("99:99".to_string());
    assert_eq!(error.to_string(), "Invalid timestamp: 99:99");
}
