//! Show command implementation.

use std::path::Path;

use civlite::render::{View, render_map, render_summary};

use super::output::JsonMap;
use super::{CliError, OutputFormat, load_state};

/// Execute the show command.
///
/// # Errors
///
/// Returns an error if the scenario cannot be loaded or the viewer is unknown.
pub(crate) fn execute(
    scenario: Option<&Path>,
    viewer: u8,
    format: OutputFormat,
    all: bool,
) -> Result<(), CliError> {
    let state = load_state(scenario)?;
    if state.civ(viewer).is_none() {
        return Err(CliError::Argument(format!("unknown civilization {viewer}")));
    }

    let view = View {
        reveal_all: all,
        format: format.render_format(),
        ..View::new(viewer)
    };

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&JsonMap::new(&state, &view))?);
    } else {
        println!("{}", render_map(&state, &view));
        println!();
        print!("{}", render_summary(&state, &view));
    }
    Ok(())
}
