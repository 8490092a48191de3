//! clipmark CLI: mark clip boundaries, reconcile them, and cut clips.
//!
//! Usage:
//!   clipmark mark -t <f|d|u|l|r>           Record a mark at the player's position
//!   clipmark mark -t <artwork|distance>    Rotate a selector
//!   clipmark reconcile [--check]           Build the clip manifest from the mark log
//!   clipmark extract --source-dir <DIR>    Cut manifest clips with ffmpeg
//!   clipmark selectors                     Show the current artwork and distance

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};

use clipmark_common::config::AppConfig;
use clipmark_common::error::ClipmarkError;
use clipmark_model::mark::ClipType;
use clipmark_model::selector::SelectorKind;

mod commands;

#[derive(Parser)]
#[command(
    name = "clipmark",
    about = "Mark, reconcile, and cut directional-pan test clips",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/clipmark/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the mark log, manifest, and selector state
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a mark for a clip type, or rotate the artwork/distance selector
    Mark {
        /// Clip type (f, d, u, l, r) to mark, or selector (artwork, distance) to advance
        #[arg(short = 't', long = "type", default_value = "f")]
        action: MarkAction,
    },

    /// Pair raw marks into clip intervals and write the manifest
    Reconcile {
        /// Raw mark log (defaults to the data directory's log)
        #[arg(long)]
        log: Option<PathBuf>,

        /// Manifest output path (defaults to the data directory's manifest)
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Validate and print the clips without writing the manifest
        #[arg(long)]
        check: bool,
    },

    /// Cut every manifest clip out of its source video
    Extract {
        /// Directory holding the source videos
        #[arg(long)]
        source_dir: PathBuf,

        /// Clip manifest (defaults to the data directory's manifest)
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Output directory (defaults to <source-dir>/clips)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Print the ffmpeg invocations without running them
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the current artwork and distance
    Selectors,
}

/// What `mark -t` asks for: a clip boundary or a selector rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkAction {
    Record(ClipType),
    Rotate(SelectorKind),
}

impl FromStr for MarkAction {
    type Err = ClipmarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "artwork" => Ok(MarkAction::Rotate(SelectorKind::Artwork)),
            "distance" => Ok(MarkAction::Rotate(SelectorKind::Distance)),
            code => code.parse().map(MarkAction::Record).map_err(|_| {
                ClipmarkError::usage(format!(
                    "mark type {code:?} is not acceptable, should be one of \
                     [f, d, u, l, r, artwork, distance]"
                ))
            }),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    // Initialize logging
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    clipmark_common::logging::init_logging(&config.logging);

    config.validate()?;

    match cli.command {
        Commands::Mark { action } => match action {
            MarkAction::Record(clip_type) => commands::mark::record(&config, clip_type).await,
            MarkAction::Rotate(kind) => commands::mark::rotate(&config, kind),
        },
        Commands::Reconcile {
            log,
            manifest,
            check,
        } => commands::reconcile::run(&config, log, manifest, check),
        Commands::Extract {
            source_dir,
            manifest,
            output_dir,
            dry_run,
        } => commands::extract::run(&config, source_dir, manifest, output_dir, dry_run),
        Commands::Selectors => commands::selectors::run(&config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark_action(args: &[&str]) -> MarkAction {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Mark { action } => action,
            _ => panic!("expected mark command"),
        }
    }

    #[test]
    fn test_mark_defaults_to_forward() {
        assert_eq!(
            mark_action(&["clipmark", "mark"]),
            MarkAction::Record(ClipType::Forward)
        );
    }

    #[test]
    fn test_mark_accepts_selectors() {
        assert_eq!(
            mark_action(&["clipmark", "mark", "-t", "distance"]),
            MarkAction::Rotate(SelectorKind::Distance)
        );
        assert_eq!(
            mark_action(&["clipmark", "mark", "--type", "artwork"]),
            MarkAction::Rotate(SelectorKind::Artwork)
        );
    }

    #[test]
    fn test_mark_rejects_unknown_type_before_any_work() {
        let err = Cli::try_parse_from(["clipmark", "mark", "-t", "x"])
            .err()
            .unwrap();
        assert!(err.to_string().contains("should be one of"));
    }

    #[test]
    fn test_unknown_type_is_a_usage_error() {
        assert!(matches!(
            "forward".parse::<MarkAction>(),
            Err(ClipmarkError::Usage { .. })
        ));
    }

    #[test]
    fn test_every_clip_code_maps_to_a_clip_type() {
        for (code, expected) in [
            ("f", ClipType::Forward),
            ("d", ClipType::Down),
            ("u", ClipType::Up),
            ("l", ClipType::Left),
            ("r", ClipType::Right),
        ] {
            assert_eq!(
                mark_action(&["clipmark", "mark", "-t", code]),
                MarkAction::Record(expected)
            );
        }
    }
}
