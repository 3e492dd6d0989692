// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use bisub::app_config::{self, Config};
use bisub::file_utils::FileManager;
use bisub::subtitle_processor::{SubtitleCollection, SubtitleEntry};
use bisub::sync::{BlockErrorPolicy, ReviewReport, SubtitleSynchronizer};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge a primary and a secondary track into one bilingual SRT
    Compose(ComposeArgs),

    /// List alignments that are not clean one-to-one pairings
    Review(ReviewArgs),

    /// Print the pause blocks of a single track
    Blocks {
        /// Subtitle file to split
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },

    /// Compose every `<name>.<primary>.srt` / `<name>.<secondary>.srt` pair in a directory
    Folder {
        /// Directory to scan recursively
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// Generate shell completions for bisub
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct ComposeArgs {
    /// Primary subtitle file (its timing is kept)
    #[arg(value_name = "PRIMARY")]
    primary: PathBuf,

    /// Secondary subtitle file
    #[arg(value_name = "SECONDARY")]
    secondary: PathBuf,

    /// Output file (default: `<name>.<primary>-<secondary>.srt` next to PRIMARY)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,
}

#[derive(Args, Debug)]
struct ReviewArgs {
    /// Primary subtitle file
    #[arg(value_name = "PRIMARY")]
    primary: PathBuf,

    /// Secondary subtitle file
    #[arg(value_name = "SECONDARY")]
    secondary: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

/// Options shared by every subcommand, overriding the configuration file
#[derive(Args, Debug)]
struct GlobalArgs {
    /// Configuration file path
    #[arg(short, long, global = true, visible_alias = "config", default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Silence in milliseconds that separates two blocks
    #[arg(long, global = true)]
    pause_length: Option<u64>,

    /// Initial cutoff of the group resolver
    #[arg(long, global = true)]
    cutoff: Option<f64>,

    /// Primary language code (e.g., 'zh', 'ja', 'fr')
    #[arg(short, long, global = true)]
    primary_language: Option<String>,

    /// Secondary language code (e.g., 'en', 'es', 'de')
    #[arg(short, long, global = true)]
    secondary_language: Option<String>,

    /// Keep going when a block cannot be synchronized
    #[arg(long, global = true)]
    skip_failed_blocks: bool,
}

/// bisub - Bilingual subtitle synchronization
///
/// Aligns two subtitle tracks of the same video and stacks them into a
/// single bilingual track timed on the primary one.
#[derive(Parser, Debug)]
#[command(name = "bisub")]
#[command(version)]
#[command(about = "Bilingual subtitle composer")]
#[command(long_about = "bisub aligns a primary and a secondary subtitle track and composes them into one bilingual SRT file.

EXAMPLES:
    bisub compose movie.zh.srt movie.en.srt        # Writes movie.zh-en.srt
    bisub compose -o out.srt a.srt b.srt           # Explicit output file
    bisub review movie.zh.srt movie.en.srt --json  # Alignments needing a look
    bisub blocks movie.zh.srt                      # Show pause blocks
    bisub folder -p ja -s en /shows/               # Compose every pair in a directory
    bisub completions bash > bisub.bash            # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger::new(level)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI color for log level
    fn decoration_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, color) = Self::decoration_for_level(record.level());

            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, emoji, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set through
    // log::set_max_level once the configuration is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "bisub", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli.global)?;
    let synchronizer = SubtitleSynchronizer::new(config.sync_options());

    match cli.command {
        Commands::Compose(args) => run_compose(&config, &synchronizer, args),
        Commands::Review(args) => run_review(&config, &synchronizer, args),
        Commands::Blocks { input } => run_blocks(&config, &synchronizer, &input),
        Commands::Folder { dir, force_overwrite } => run_folder(&config, &synchronizer, &dir, force_overwrite),
        Commands::Completions { .. } => Ok(()),
    }
}

// @loads: Configuration, applies CLI overrides and the effective log level
fn load_config(options: &GlobalArgs) -> Result<Config> {
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&options.config_path)?;

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Some(pause_length) = options.pause_length {
        config.sync.pause_length_ms = pause_length;
    }
    if let Some(cutoff) = options.cutoff {
        config.sync.initial_cutoff = cutoff;
    }
    if let Some(primary) = &options.primary_language {
        config.output.primary_language = primary.clone();
    }
    if let Some(secondary) = &options.secondary_language {
        config.output.secondary_language = secondary.clone();
    }
    if options.skip_failed_blocks {
        config.sync.on_block_error = BlockErrorPolicy::Skip;
    }

    config.validate().context("Configuration validation failed")?;

    log::set_max_level(config.log_level.to_level_filter());
    debug!("Using configuration: {:?}", config);

    Ok(config)
}

// @reads: Both tracks of a pair
fn read_tracks(config: &Config, primary: &Path, secondary: &Path) -> Result<(SubtitleCollection, SubtitleCollection)> {
    let primary = SubtitleCollection::read_srt(primary, &config.output.primary_language)?;
    let secondary = SubtitleCollection::read_srt(secondary, &config.output.secondary_language)?;
    Ok((primary, secondary))
}

// @composes: One pair of files into a bilingual SRT
fn compose_pair(
    config: &Config,
    synchronizer: &SubtitleSynchronizer,
    primary: &Path,
    secondary: &Path,
    output: &Path,
) -> Result<usize> {
    let (primary_track, secondary_track) = read_tracks(config, primary, secondary)?;

    let outcome = synchronizer
        .compose(&primary_track.entries, &secondary_track.entries)
        .with_context(|| format!("Failed to synchronize {:?} with {:?}", primary, secondary))?;

    if !outcome.skipped.is_empty() {
        warn!(
            "{:?}: {} blocks skipped, {} secondary entries left out",
            output,
            outcome.skipped.len(),
            outcome.dropped_secondary
        );
    }

    let language = format!("{}-{}", config.output.primary_language, config.output.secondary_language);
    let merged = SubtitleCollection::with_entries(output.to_path_buf(), language, outcome.entries);
    merged.write_to_srt(output)?;

    Ok(merged.entries.len())
}

fn run_compose(config: &Config, synchronizer: &SubtitleSynchronizer, args: ComposeArgs) -> Result<()> {
    for input in [&args.primary, &args.secondary] {
        if !FileManager::file_exists(input) {
            return Err(anyhow!("Input file does not exist: {:?}", input));
        }
    }

    let output = match args.output {
        Some(output) => output,
        None => FileManager::generate_output_path(
            &args.primary,
            args.primary.parent().unwrap_or(Path::new(".")),
            &config.output.primary_language,
            &config.output.secondary_language,
        ),
    };

    if output.exists() && !args.force_overwrite {
        warn!("Output file already exists: {:?}. Use -f to force overwrite.", output);
        return Ok(());
    }

    let count = compose_pair(config, synchronizer, &args.primary, &args.secondary, &output)?;
    info!("Success: {:?} ({} entries)", output, count);

    Ok(())
}

fn run_review(config: &Config, synchronizer: &SubtitleSynchronizer, args: ReviewArgs) -> Result<()> {
    let (primary, secondary) = read_tracks(config, &args.primary, &args.secondary)?;
    let report = synchronizer.review(&primary.entries, &secondary.entries)?;

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize review report")?;
        println!("{}", json);
    } else {
        print_review(&report);
    }

    Ok(())
}

// @prints: Human-readable review report
fn print_review(report: &ReviewReport) {
    println!(
        "{} blocks, {} groups, {} one-to-one, {} flagged",
        report.blocks,
        report.groups,
        report.one_to_one,
        report.flags.len()
    );

    for flag in &report.flags {
        println!(
            "block {:>3}  {:<14} {} --> {}  primary {:?}  secondary {:?}{}",
            flag.block,
            format!("{:?}", flag.kind),
            SubtitleEntry::format_timestamp(flag.start_ms),
            SubtitleEntry::format_timestamp(flag.end_ms),
            flag.primary_seq_nums,
            flag.secondary_seq_nums,
            flag.reason.as_deref().map(|r| format!("  ({})", r)).unwrap_or_default()
        );
    }
}

fn run_blocks(config: &Config, synchronizer: &SubtitleSynchronizer, input: &Path) -> Result<()> {
    let track = SubtitleCollection::read_srt(input, &config.output.primary_language)?;
    let blocks = synchronizer.split_blocks(&track.entries);

    println!("{} entries in {} blocks", track.entries.len(), blocks.len());
    for (index, block) in blocks.iter().enumerate() {
        let entries = block.slice(&track.entries);
        let (Some(first), Some(last)) = (entries.first(), entries.last()) else {
            continue;
        };
        let end = entries.iter().map(|e| e.end_time_ms).max().unwrap_or(last.end_time_ms);

        println!(
            "block {:>3}  entries {:>4}..{:<4}  {} --> {}  ({} entries)",
            index,
            first.seq_num,
            last.seq_num,
            SubtitleEntry::format_timestamp(first.start_time_ms),
            SubtitleEntry::format_timestamp(end),
            entries.len()
        );
    }

    Ok(())
}

fn run_folder(config: &Config, synchronizer: &SubtitleSynchronizer, dir: &Path, force_overwrite: bool) -> Result<()> {
    if !dir.is_dir() {
        return Err(anyhow!("Input directory does not exist: {:?}", dir));
    }

    let pairs = FileManager::find_subtitle_pairs(
        dir,
        &config.output.primary_language,
        &config.output.secondary_language,
    )?;

    if pairs.is_empty() {
        warn!(
            "No '{}'/'{}' subtitle pairs found in {:?}",
            config.output.primary_language, config.output.secondary_language, dir
        );
        return Ok(());
    }

    info!("Composing {} subtitle pairs from {:?}", pairs.len(), dir);

    let progress_bar = ProgressBar::new(pairs.len() as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pairs ({percent}%) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(style.progress_chars("█▓▒░"));

    let mut composed = 0;
    let mut failed = 0;

    for pair in &pairs {
        let output = FileManager::generate_output_path(
            &pair.primary,
            pair.primary.parent().unwrap_or(Path::new(".")),
            &config.output.primary_language,
            &config.output.secondary_language,
        );
        progress_bar.set_message(
            pair.primary
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
        );

        if output.exists() && !force_overwrite {
            debug!("Skipping existing output: {:?}", output);
        } else {
            match compose_pair(config, synchronizer, &pair.primary, &pair.secondary, &output) {
                Ok(_) => composed += 1,
                Err(e) => {
                    progress_bar.suspend(|| error!("Error processing {:?}: {:#}", pair.primary, e));
                    failed += 1;
                }
            }
        }

        progress_bar.inc(1);
    }

    progress_bar.finish_and_clear();
    info!("Finished: {} composed, {} failed, {} pairs total", composed, failed, pairs.len());

    Ok(())
}
