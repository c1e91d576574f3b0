//! Wiring test: the full suite runs every registered scenario in its fixed
//! group order and accounts for each result, even when the application is
//! unreachable (every scenario then errors on its first wait).

#![cfg(not(feature = "browser"))]

use moodify_e2e::{ScenarioStatus, Suite, TestConfig};

fn fast_config() -> TestConfig {
    TestConfig::default()
        .with_implicit_wait(100)
        .with_explicit_wait(100)
}

#[tokio::test]
async fn full_suite_runs_every_scenario_in_order() {
    let suite = Suite::moodify(fast_config());
    let report = suite.run().await.expect("mock sessions always launch");

    let names: Vec<&str> = report.results.iter().map(|r| r.name).collect();
    assert_eq!(
        names,
        vec![
            "homepage_loads",
            "login_page_navigation",
            "login_empty_fields",
            "login_invalid_email",
            "login_short_password",
            "login_form_toggle",
            "invalid_credentials_rejected",
            "login_valid_credentials",
            "dashboard_statistics",
            "mood_selection_persistence",
            "calendar_display",
            "logout",
        ]
    );

    let groups: Vec<&str> = report.results.iter().map(|r| r.group).collect();
    assert!(groups.starts_with(&["authentication"; 8]));
    assert!(groups.ends_with(&["dashboard", "dashboard", "dashboard", "navigation"]));

    // Nothing is listening, so every scenario errors on its first wait
    assert!(report
        .results
        .iter()
        .all(|r| r.status == ScenarioStatus::Error));
    assert!(!report.all_passed());

    let summary = report.summary();
    assert!(summary.contains("Total Scenarios Run: 12"));
    assert!(summary.contains("Errors:   12"));
}
