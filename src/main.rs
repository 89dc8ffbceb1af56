// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use crate::app_config::{ClipPolicy, Config, VoiceLabel};
use app_controller::Controller;

mod app_config;
mod app_controller;
mod audio;
mod encoder;
mod errors;
mod file_utils;
mod providers;
mod subtitle_processor;
mod timeline;

/// CLI Wrapper for VoiceLabel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliVoice {
    FemaleLike,
    MaleLike,
}

impl From<CliVoice> for VoiceLabel {
    fn from(cli_voice: CliVoice) -> Self {
        match cli_voice {
            CliVoice::FemaleLike => VoiceLabel::FemaleLike,
            CliVoice::MaleLike => VoiceLabel::MaleLike,
        }
    }
}

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
    /// Generate shell completions for subvoice
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// subvoice - narrate SRT subtitle files with AI speech synthesis
///
/// Reads a subtitle file, synthesizes speech for each caption and places
/// every clip at its caption's original timestamp, producing one MP3 track.
#[derive(Parser, Debug)]
#[command(name = "subvoice")]
#[command(version = "0.1.0")]
#[command(about = "Turn SRT subtitles into a narrated MP3 track")]
#[command(long_about = "subvoice reads an SRT subtitle file, synthesizes speech for every caption
through the OpenAI speech API and assembles one MP3 in which each clip sits
at its caption's original timestamp.

EXAMPLES:
    subvoice movie.srt                        # Narrate with the default voice
    subvoice -v male-like movie.srt           # Use the male-like voice
    subvoice --strict movie.srt               # Hard-clip every clip to its caption window
    subvoice --log-level debug movie.srt      # Verbose per-caption diagnostics
    subvoice completions bash > subvoice.bash # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.

CREDENTIALS:
    The OpenAI API key is read from the OPENAI_API_KEY environment variable
    (or the api_key config field). It is never logged or persisted.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input SRT subtitle file
    #[arg(value_name = "SUBTITLE_PATH")]
    subtitle_path: Option<PathBuf>,

    /// Voice to narrate with
    #[arg(short, long, value_enum)]
    voice: Option<CliVoice>,

    /// Hard-clip every synthesized clip to its caption window
    #[arg(long)]
    strict: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
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

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subvoice", &mut std::io::stdout());
            Ok(())
        }
        None => run_narrate(cli).await,
    }
}

async fn run_narrate(options: CommandLineOptions) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let subtitle_path = options.subtitle_path.clone().ok_or_else(|| {
        anyhow::anyhow!("SUBTITLE_PATH is required when no subcommand is specified")
    })?;

    let config = load_config(&options)?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    // Create controller and run the pipeline; every failure mode surfaces
    // here as a single user-facing message
    let result = match Controller::with_config(config) {
        Ok(controller) => controller.run(&subtitle_path).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(_output_path) => Ok(()),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Load the configuration file, creating a default one when absent, and
/// apply command-line overrides
fn load_config(options: &CommandLineOptions) -> Result<Config> {
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if let Some(voice) = &options.voice {
        let voice: VoiceLabel = voice.clone().into();
        config.voice = voice.label().to_string();
    }

    if options.strict {
        config.clip_policy = ClipPolicy::Strict;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    Ok(config)
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}
