/*!
 * # bisub - Bilingual subtitle synchronization
 *
 * A Rust library that aligns two subtitle tracks of the same video in
 * different languages and composes them into one bilingual track.
 *
 * ## Features
 *
 * - Pause-based splitting of tracks into independent blocks
 * - Gaussian timing overlap between primary and secondary entries
 * - Cutoff-relaxation grouping into one-to-one, many-to-one, one-to-many
 *   and unmatched groups
 * - Bilingual SRT output timed on the primary track
 * - Review reports for alignments that need a human look
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: SRT reading and writing
 * - `sync`: The synchronization pipeline:
 *   - `sync::blocks`: Pause block splitting
 *   - `sync::overlap`: Overlap matrix
 *   - `sync::resolver`: Sync group resolution
 *   - `sync::ordering`: Sync group ordering
 *   - `sync::merge`: Bilingual entry construction
 *   - `sync::review`: Review flags
 *   - `sync::engine`: The `SubtitleSynchronizer` façade
 * - `file_utils`: File system operations and track pairing
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod subtitle_processor;
pub mod sync;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{SubtitleError, SyncError};
pub use file_utils::{FileManager, SubtitlePair};
pub use language_utils::{get_language_name, language_codes_match, normalize_to_part2t};
pub use subtitle_processor::{SubtitleCollection, SubtitleEntry};
pub use sync::{BlockErrorPolicy, ComposeOutcome, ReviewReport, SubtitleSynchronizer, SyncGroup, SyncOptions};
