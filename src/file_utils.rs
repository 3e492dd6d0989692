use anyhow::{Result, Context};
use log::debug;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::language_utils;

// @module: File and directory utilities

/// Two subtitle files of the same video in different languages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitlePair {
    pub primary: PathBuf,
    pub secondary: PathBuf,
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Split `movie.zh.srt` into (`movie`, `Some("zh")`). The tag is only
    /// recognized when it is a valid ISO 639 code.
    pub fn split_language_tag<P: AsRef<Path>>(path: P) -> (String, Option<String>) {
        let stem = path
            .as_ref()
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        if let Some((base, tag)) = stem.rsplit_once('.') {
            if !base.is_empty() && language_utils::normalize_to_part2t(tag).is_ok() {
                return (base.to_string(), Some(tag.to_string()));
            }
        }

        (stem, None)
    }

    // @generates: Output path for a bilingual subtitle
    // @params: primary_file, output_dir, primary_language, secondary_language
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        primary_file: P1,
        output_dir: P2,
        primary_language: &str,
        secondary_language: &str,
    ) -> PathBuf {
        let (base, _) = Self::split_language_tag(primary_file);
        let output_filename = format!("{}.{}-{}.srt", base, primary_language, secondary_language);
        output_dir.as_ref().join(output_filename)
    }

    /// Find files with a specific extension in a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let wanted = extension.trim_start_matches('.');
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(wanted))
            {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Pair `<base>.<primary>.srt` with `<base>.<secondary>.srt` files found
    /// under `dir`. Language tags are compared as ISO codes, so `zh` pairs
    /// with `chi` or `zho`. Pairs come back sorted by path.
    pub fn find_subtitle_pairs<P: AsRef<Path>>(
        dir: P,
        primary_language: &str,
        secondary_language: &str,
    ) -> Result<Vec<SubtitlePair>> {
        let mut candidates: BTreeMap<(PathBuf, String), (Option<PathBuf>, Option<PathBuf>)> = BTreeMap::new();

        for path in Self::find_files(dir, "srt")? {
            let (base, Some(tag)) = Self::split_language_tag(&path) else {
                continue;
            };
            let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
            let slot = candidates.entry((parent, base)).or_default();

            if language_utils::language_codes_match(&tag, primary_language) {
                slot.0 = Some(path);
            } else if language_utils::language_codes_match(&tag, secondary_language) {
                slot.1 = Some(path);
            }
        }

        let pairs: Vec<SubtitlePair> = candidates
            .into_values()
            .filter_map(|slot| match slot {
                (Some(primary), Some(secondary)) => Some(SubtitlePair { primary, secondary }),
                _ => None,
            })
            .collect();

        debug!("Found {} subtitle pairs", pairs.len());
        Ok(pairs)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))
    }
}
