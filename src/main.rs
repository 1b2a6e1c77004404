// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

use acolyte::app_config::{self, Config, PreferredPlayer};
use acolyte::app_controller::{Controller, ReviewPaths};
use acolyte::draft::DraftConfigUpdate;
use acolyte::errors::ReviewError;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
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

/// CLI Wrapper for PreferredPlayer to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliPlayer {
    Auto,
    Mpv,
    Ffplay,
}

impl From<CliPlayer> for PreferredPlayer {
    fn from(cli_player: CliPlayer) -> Self {
        match cli_player {
            CliPlayer::Auto => PreferredPlayer::Auto,
            CliPlayer::Mpv => PreferredPlayer::Mpv,
            CliPlayer::Ffplay => PreferredPlayer::Ffplay,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Review a subtitle file interactively (line commands on stdin)
    Review(ReviewArgs),

    /// Create or read the draft for a subtitle file and print it
    Load {
        /// Source subtitle file
        #[arg(value_name = "SRT_FILE")]
        srt_file: PathBuf,
    },

    /// Set the translation of one entry
    Translate {
        /// Draft file (or its source subtitle file)
        #[arg(value_name = "DRAFT")]
        draft: PathBuf,
        /// Subtitle index
        index: usize,
        /// New translation; "\n" is a line break
        text: String,
    },

    /// Correct the original text of one entry
    Fix {
        /// Draft file (or its source subtitle file)
        #[arg(value_name = "DRAFT")]
        draft: PathBuf,
        /// Subtitle index
        index: usize,
        /// Corrected original text; "\n" is a line break
        text: String,
    },

    /// Update draft metadata (languages, audio file)
    Config {
        /// Draft file (or its source subtitle file)
        #[arg(value_name = "DRAFT")]
        draft: PathBuf,
        /// Original language code (e.g. 'en')
        #[arg(long)]
        original_lang: Option<String>,
        /// Target language code (e.g. 'pt-BR')
        #[arg(long)]
        target_lang: Option<String>,
        /// Audio or video file used for playback
        #[arg(long)]
        audio_file: Option<PathBuf>,
    },

    /// Flip verified/unverified for one entry
    StatusToggle {
        /// Draft file (or its source subtitle file)
        #[arg(value_name = "DRAFT")]
        draft: PathBuf,
        /// Subtitle index
        index: usize,
    },

    /// Write original and target subtitle files from a draft
    Export {
        /// Draft file (or its source subtitle file)
        #[arg(value_name = "DRAFT")]
        draft: PathBuf,
    },

    /// Extract (or reuse) the audio clip of one entry
    Play {
        /// Draft file (or its source subtitle file)
        #[arg(value_name = "DRAFT")]
        draft: PathBuf,
        /// Subtitle index
        index: usize,
    },

    /// Generate shell completions for acolyte
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct ReviewArgs {
    /// Original subtitle file
    #[arg(value_name = "ORIGINAL")]
    original: PathBuf,

    /// Translation file (default: <stem>_<suffix>.srt)
    #[arg(short, long)]
    translation: Option<PathBuf>,

    /// Status file (default: <stem>_status.json)
    #[arg(short, long)]
    status: Option<PathBuf>,

    /// Media file for playback
    #[arg(short, long)]
    media: Option<PathBuf>,

    /// Keep all state in one draft document instead of split files
    #[arg(short, long, conflicts_with_all = ["translation", "status"])]
    draft: bool,

    /// Player used by 'play'
    #[arg(long, value_enum)]
    player: Option<CliPlayer>,
}

/// Acolyte - subtitle translation review
///
/// Aligns an original subtitle file with its translation, tracks which
/// entries have been verified and persists the edits.
#[derive(Parser, Debug)]
#[command(name = "acolyte")]
#[command(version)]
#[command(about = "Subtitle translation review tool")]
#[command(long_about = "Acolyte aligns original and translated subtitles for side-by-side review.

EXAMPLES:
    acolyte review movie.srt                      # Review movie.srt against movie_translation.srt
    acolyte review -d movie.srt                   # Review using a single draft document
    acolyte load movie.srt                        # Create movie.srt.draft.json
    acolyte translate movie.srt.draft.json 3 'Olá'
    acolyte config movie.srt.draft.json --target-lang pt-BR --audio-file movie.mkv
    acolyte export movie.srt.draft.json           # Write movie_<orig>.srt and movie_<target>.srt
    acolyte completions bash > acolyte.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
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
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
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
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize command result")?;
    println!("{}", json);
    Ok(())
}

fn load_config(config_path: &Path, log_level: Option<CliLogLevel>) -> Result<Config> {
    let mut config = Config::load_or_create(config_path)?;

    // Command line wins over the config file
    if let Some(log_level) = log_level {
        config.log_level = log_level.into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install the logger once; the effective level is lowered to info
    // until the config has been read
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "acolyte", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli.config_path, cli.log_level)?;

    let result = run_command(cli.command, config).await;
    if let Err(e) = &result {
        match e.downcast_ref::<ReviewError>() {
            Some(review_error) if review_error.is_fatal() => error!("Fatal: {:#}", e),
            _ => error!("{:#}", e),
        }
    }
    result
}

async fn run_command(command: Commands, mut config: Config) -> Result<()> {
    if let Commands::Review(args) = &command {
        if let Some(player) = args.player {
            config.playback.preferred_player = player.into();
        }
    }

    let controller = Controller::with_config(config)?;

    match command {
        Commands::Review(args) => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            if args.draft {
                let mut session = controller.open_draft_session(&args.original)?;
                controller.run_review(&mut session, stdin.lock(), stdout.lock())?;
            } else {
                let paths = ReviewPaths {
                    original: args.original,
                    translation: args.translation,
                    status: args.status,
                    media: args.media,
                };
                let mut session = controller.open_split_session(paths)?;
                controller.run_review(&mut session, stdin.lock(), stdout.lock())?;
            }
        }
        Commands::Load { srt_file } => print_json(&controller.load_draft(&srt_file)?)?,
        Commands::Translate { draft, index, text } => print_json(&controller.translate(&draft, index, &text)?)?,
        Commands::Fix { draft, index, text } => print_json(&controller.fix(&draft, index, &text)?)?,
        Commands::Config {
            draft,
            original_lang,
            target_lang,
            audio_file,
        } => {
            let update = DraftConfigUpdate {
                original_lang,
                target_lang,
                audio_file,
            };
            print_json(&controller.configure(&draft, update)?)?
        }
        Commands::StatusToggle { draft, index } => print_json(&controller.toggle_status(&draft, index)?)?,
        Commands::Export { draft } => print_json(&controller.export(&draft)?)?,
        Commands::Play { draft, index } => print_json(&controller.play(&draft, index).await?)?,
        Commands::Completions { .. } => {}
    }

    Ok(())
}
