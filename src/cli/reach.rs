//! Reach command implementation.

use std::path::Path;

use civlite::UnitId;
use civlite::render::{View, render_map};

use super::output::{JsonReach, format_reach_text};
use super::{CliError, OutputFormat, load_state};

/// Execute the reach command.
///
/// # Errors
///
/// Returns an error if the scenario cannot be loaded or the unit does not exist.
pub(crate) fn execute(
    scenario: Option<&Path>,
    unit: u32,
    viewer: u8,
    format: OutputFormat,
) -> Result<(), CliError> {
    let state = load_state(scenario)?;
    let reachable = state
        .compute_reachable(UnitId(unit))
        .map_err(|e| CliError::Argument(e.to_string()))?;

    let view = View {
        reachable: Some(&reachable),
        selected: Some(UnitId(unit)),
        format: format.render_format(),
        ..View::new(viewer)
    };

    if format == OutputFormat::Json {
        let json = JsonReach::new(&state, &reachable, &view);
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!("{}", render_map(&state, &view));
        println!();
        print!("{}", format_reach_text(&reachable));
    }
    Ok(())
}
