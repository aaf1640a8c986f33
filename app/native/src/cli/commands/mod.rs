//! CLI command definitions using Clap.
//!
//! - `sets` - listing, inspecting and exporting image sets
//! - `play` - terminal playback through the animation engine
//! - `config_cmd` - configuration file management

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::assets::{BundleDir, ResourceProvider};
use crate::config;
use crate::config::schema;
use crate::controller::EngineOptions;
use crate::error::ParrotBarError;
use crate::sets::SetKind;

pub mod config_cmd;
pub mod play;
pub mod sets;

pub use config_cmd::ConfigCommands;

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// ParrotBar CLI - party parrots for your status bar.
#[derive(Parser, Debug)]
#[command(name = "parrotbar")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<String>,

    /// Resource directory to read sets from, overriding the configuration.
    #[arg(long, short, global = true, value_name = "DIR", env = "PARROTBAR_RESOURCES")]
    pub resources: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// List the available image sets.
    ///
    /// GIF sets are listed in menu order: capitalized sets first, then the
    /// "More Sets" group. Static sets are listed by their base name.
    Sets {
        /// Output as JSON.
        #[arg(long, short)]
        json: bool,
    },

    /// Load a set and show how its frames were normalized.
    Inspect {
        /// Set name, without frame index or extension. Defaults to the launch set.
        name: Option<String>,

        /// Treat the name as a GIF set instead of numbered still frames.
        #[arg(long, short)]
        gif: bool,

        /// Output as JSON.
        #[arg(long, short)]
        json: bool,
    },

    /// Write the normalized frames of a set as PNG files.
    #[command(after_long_help = r#"Examples:
  parrotbar export parrot --out ./frames
  parrotbar export FiestaParrot --gif --out ./fiesta"#)]
    Export {
        /// Set name, without frame index or extension. Defaults to the launch set.
        name: Option<String>,

        /// Treat the name as a GIF set instead of numbered still frames.
        #[arg(long, short)]
        gif: bool,

        /// Output directory. Created if missing.
        #[arg(long, short, value_name = "DIR")]
        out: PathBuf,
    },

    /// Play a set in the terminal, printing the frame index on every tick.
    Play {
        /// Set name, without frame index or extension. Defaults to the launch set.
        name: Option<String>,

        /// Treat the name as a GIF set instead of numbered still frames.
        #[arg(long, short)]
        gif: bool,

        /// How long to play, in seconds.
        #[arg(long, short, default_value_t = 3.0)]
        seconds: f64,
    },

    /// Configuration file management commands.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Output the configuration JSON Schema.
    ///
    /// Can be redirected to a file for use with editors that support JSON
    /// Schema validation.
    Schema,

    /// Generate shell completions.
    ///
    /// Usage:
    ///   eval "$(parrotbar completions --shell zsh)"
    ///   parrotbar completions --shell fish > ~/.config/fish/completions/parrotbar.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Returns the custom config path if specified via --config flag.
    #[must_use]
    pub fn config_path(&self) -> Option<PathBuf> { self.config.as_ref().map(PathBuf::from) }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<(), ParrotBarError> {
        if let Some(path) = self.config_path() {
            if !path.exists() {
                return Err(ParrotBarError::ConfigError(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            config::set_custom_config_path(path);
        }

        match &self.command {
            Commands::Sets { json } => sets::list(&self.open_bundle()?, *json),
            Commands::Inspect { name, gif, json } => {
                sets::inspect(self.open_bundle()?, name, kind_of(*gif), *json)
            }
            Commands::Export { name, gif, out } => {
                sets::export(self.open_bundle()?, name, kind_of(*gif), out)
            }
            Commands::Play { name, gif, seconds } => {
                play::execute(
                self.open_bundle()?,
                engine_options(),
                name.as_deref(),
                kind_of(*gif),
                *seconds,
            )
            }
            Commands::Config(cmd) => config_cmd::execute(cmd),
            Commands::Schema => {
                println!("{}", schema::generate_schema_json());
                Ok(())
            }
            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    /// Opens the resource directory chosen by `--resources` or the configuration.
    fn open_bundle(&self) -> Result<Arc<dyn ResourceProvider>, ParrotBarError> {
        let config = config::get_config();
        let config_dir = config::get_config_path()
            .and_then(|path| path.parent())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        let dir = config.resource_dir(self.resources.as_deref(), &config_dir).ok_or_else(|| {
            ParrotBarError::ResourceError(
                "no resource directory found, pass --resources or set \"resources\"".to_string(),
            )
        })?;

        if !dir.is_dir() {
            return Err(ParrotBarError::ResourceError(format!(
                "not a directory: {}",
                dir.display()
            )));
        }

        tracing::debug!(dir = %dir.display(), "using resource directory");
        Ok(Arc::new(BundleDir::new(dir)))
    }

    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, "parrotbar", &mut io::stdout());
    }
}

const fn kind_of(gif: bool) -> SetKind { if gif { SetKind::Animated } else { SetKind::Static } }

/// Engine options derived from the loaded configuration.
pub(crate) fn engine_options() -> EngineOptions { EngineOptions::from(config::get_config()) }
