mod common;

use common::{load_scenario, run_scenario, stepwise_pathfinder};
use std::fs;

#[test]
fn json_scenario_tests() {
    let test_dir = "./test_data";
    let pathfinder = stepwise_pathfinder();
    let mut passed = 0;

    let mut entries: Vec<_> = fs::read_dir(test_dir)
        .expect("test_data directory should exist")
        .filter_map(Result::ok)
        .collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        let scenario = load_scenario(&path)
            .unwrap_or_else(|e| panic!("failed to load {}: {}", path.display(), e));

        if let Err((variant, reason)) = run_scenario(&pathfinder, &scenario) {
            panic!("Scenario '{}' failed [{}]: {}", scenario.test_name, variant, reason);
        }
        passed += 1;
    }

    assert!(passed > 0, "no scenarios found in {}", test_dir);
    println!("All {} JSON scenarios passed", passed);
}
