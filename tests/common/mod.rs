/*!
 * Common test utilities for the bisub test suite
 */

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use bisub::subtitle_processor::SubtitleEntry;

/// Routes library logs to the test harness; repeated calls are harmless
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Shorthand for a subtitle entry
pub fn entry(seq_num: usize, start: u64, end: u64, text: &str) -> SubtitleEntry {
    SubtitleEntry::new(seq_num, start, end, text.to_string())
}

/// Primary (Chinese) sample track with two pause blocks
pub const PRIMARY_SRT: &str = "1
00:00:01,000 --> 00:00:02,000
你好

2
00:00:02,500 --> 00:00:03,000
我叫小明

3
00:00:03,000 --> 00:00:04,000
很高兴认识你

4
00:00:10,000 --> 00:00:12,000
再见
";

/// Secondary (English) sample track matching [`PRIMARY_SRT`]: the second
/// and third primary lines are covered by a single English line
pub const SECONDARY_SRT: &str = "1
00:00:01,050 --> 00:00:02,000
Hello

2
00:00:02,500 --> 00:00:04,000
My name is Xiaoming, nice to meet you

3
00:00:10,100 --> 00:00:12,000
Goodbye
";

/// Writes the sample pair as `<name>.zh.srt` and `<name>.en.srt`
pub fn create_sample_pair(dir: &Path, name: &str) -> Result<(PathBuf, PathBuf)> {
    let primary = create_test_file(dir, &format!("{}.zh.srt", name), PRIMARY_SRT)?;
    let secondary = create_test_file(dir, &format!("{}.en.srt", name), SECONDARY_SRT)?;
    Ok((primary, secondary))
}

/// Generates a primary track and a secondary track whose entries follow the
/// primary ones with small timing jitter. Every tenth entry is followed by a
/// long pause.
pub fn generate_jittered_tracks(count: usize, seed: u64) -> (Vec<SubtitleEntry>, Vec<SubtitleEntry>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut primary = Vec::with_capacity(count);
    let mut secondary = Vec::with_capacity(count);
    let mut cursor = 0u64;

    for i in 0..count {
        let duration = rng.random_range(1500..2500);
        let start = cursor;
        let end = start + duration;
        primary.push(SubtitleEntry::new(i + 1, start, end, format!("第{}句", i + 1)));

        let start_jitter = rng.random_range(0..150);
        let end_jitter = rng.random_range(0..150);
        secondary.push(SubtitleEntry::new(
            i + 1,
            start + start_jitter,
            end + end_jitter,
            format!("Line {}", i + 1),
        ));

        cursor = end + rng.random_range(300..800);
        if (i + 1) % 10 == 0 {
            cursor += 5000;
        }
    }

    (primary, secondary)
}

/// Like [`generate_jittered_tracks`], but every `merge_every`-th pair of
/// secondary entries is fused into one line, and one secondary line is
/// dropped, so the groups take several shapes.
pub fn generate_uneven_tracks(count: usize, seed: u64, merge_every: usize) -> (Vec<SubtitleEntry>, Vec<SubtitleEntry>) {
    let (primary, jittered) = generate_jittered_tracks(count, seed);
    let mut secondary: Vec<SubtitleEntry> = Vec::with_capacity(jittered.len());
    let mut iter = jittered.into_iter().enumerate().peekable();

    while let Some((i, current)) = iter.next() {
        if i == count / 2 {
            continue;
        }
        if merge_every > 0 && i % merge_every == 0 && (i + 1) % 10 != 0 {
            if let Some((_, next)) = iter.next() {
                let fused = SubtitleEntry::new(
                    0,
                    current.start_time_ms,
                    next.end_time_ms,
                    format!("{} {}", current.text, next.text),
                );
                secondary.push(fused);
                continue;
            }
        }
        secondary.push(current);
    }

    for (i, entry) in secondary.iter_mut().enumerate() {
        entry.seq_num = i + 1;
    }

    (primary, secondary)
}
