#![no_main]

//! Scenario parser fuzzer.
//!
//! Feeds arbitrary bytes to the scenario and action-script parsers. Any
//! scenario that validates must build a state that satisfies the invariants.

use civlite::game::check_invariants;
use civlite::scenario::actions_from_json;
use civlite::Scenario;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };

    let _ = actions_from_json(json);

    let Ok(scenario) = Scenario::from_json(json) else {
        return;
    };
    // Skip maps too large to build quickly
    if u32::from(scenario.width) * u32::from(scenario.height) > 1 << 16 {
        return;
    }
    if let Ok(state) = scenario.build() {
        let violations = check_invariants(&state);
        assert!(violations.is_empty(), "built scenario violates invariants: {violations:?}");
    }
});
