//! Describe command implementation.

use std::path::Path;

use civlite::game::{cursor_hint, describe_tile, suggest_action};
use civlite::{Coord, UnitId};

use super::{CliError, load_state};

/// Execute the describe command.
///
/// # Errors
///
/// Returns an error if the scenario cannot be loaded or the selected unit does not exist.
pub(crate) fn execute(
    scenario: Option<&Path>,
    x: u16,
    y: u16,
    viewer: u8,
    selected: Option<u32>,
) -> Result<(), CliError> {
    let state = load_state(scenario)?;
    let coord = Coord::new(x, y);
    let selected = selected.map(UnitId);

    let reachable = selected
        .map(|unit| state.compute_reachable(unit))
        .transpose()
        .map_err(|e| CliError::Argument(e.to_string()))?;
    let selection = selected.zip(reachable.as_ref());

    println!("Info");
    println!("{}", describe_tile(&state, coord, viewer, selected));
    println!();
    println!("{}", cursor_hint(&state, coord, viewer, selected));
    if let Some(hint) = suggest_action(&state, viewer, selection, coord) {
        println!("enter: {}", hint.label());
    }
    Ok(())
}
