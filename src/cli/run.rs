//! Run command implementation.

use std::path::Path;

use civlite::game::assert_invariants;
use civlite::render::{View, render_map, render_summary};
use civlite::scenario::load_actions;
use tracing::info;

use super::output::{JsonMap, JsonRun, JsonStep};
use super::{CliError, OutputFormat, load_state};

/// Execute the run command.
///
/// Rejected actions are reported and skipped; they never abort the script.
///
/// # Errors
///
/// Returns an error if the scenario or the action script cannot be loaded.
pub(crate) fn execute(
    scenario: Option<&Path>,
    actions: &Path,
    viewer: u8,
    format: OutputFormat,
    quiet: bool,
) -> Result<(), CliError> {
    let mut state = load_state(scenario)?;
    let script = load_actions(actions)?;

    let mut steps = Vec::with_capacity(script.len());
    for action in script {
        let step = match state.apply(&action) {
            Ok(outcome) => JsonStep {
                action,
                outcome: Some(outcome),
                rejected: None,
            },
            Err(err) => JsonStep {
                action,
                outcome: None,
                rejected: Some(err.to_string()),
            },
        };
        steps.push(step);
        assert_invariants(&state);
    }

    let applied = steps.iter().filter(|s| s.outcome.is_some()).count();
    let rejected = steps.len() - applied;
    info!(applied, rejected, "action script finished");

    let view = View {
        format: format.render_format(),
        ..View::new(viewer)
    };

    if format == OutputFormat::Json {
        let run = JsonRun {
            steps,
            applied,
            rejected,
            map: JsonMap::new(&state, &view),
        };
        println!("{}", serde_json::to_string_pretty(&run)?);
        return Ok(());
    }

    if !quiet {
        for (i, step) in steps.iter().enumerate() {
            match (&step.outcome, &step.rejected) {
                (Some(outcome), _) => println!("{:>3}. [!] {}", i + 1, outcome.message()),
                (None, Some(reason)) => println!("{:>3}. [x] rejected: {reason}", i + 1),
                (None, None) => {}
            }
        }
        println!("{applied} applied, {rejected} rejected");
        println!();
    }
    println!("{}", render_map(&state, &view));
    if !quiet {
        println!();
        print!("{}", render_summary(&state, &view));
    }
    Ok(())
}
