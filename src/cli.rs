//! CLI command implementations for civlite.

pub(crate) mod describe;
pub(crate) mod reach;
pub(crate) mod run;
pub(crate) mod show;

mod output;

use std::path::Path;

use clap::ValueEnum;
use civlite::render::RenderFormat;
use civlite::{GameState, Scenario, ScenarioError};
use thiserror::Error;

/// Output format for map-printing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Plain glyphs.
    Text,
    /// Glyphs with terminal colors.
    Ansi,
    /// Machine-readable JSON.
    Json,
}

impl OutputFormat {
    /// Map rendering flavor; JSON embeds plain rows.
    pub(crate) const fn render_format(self) -> RenderFormat {
        match self {
            OutputFormat::Ansi => RenderFormat::Ansi,
            OutputFormat::Text | OutputFormat::Json => RenderFormat::Plain,
        }
    }
}

/// CLI error type.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Scenario or action script could not be loaded.
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    /// JSON output could not be produced.
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
    /// A command argument names something that does not exist.
    #[error("{0}")]
    Argument(String),
}

/// Build the starting state from a scenario file, or the reference scenario.
pub(crate) fn load_state(path: Option<&Path>) -> Result<GameState, CliError> {
    let scenario = match path {
        Some(path) => Scenario::load(path)?,
        None => Scenario::reference(),
    };
    Ok(scenario.build()?)
}
