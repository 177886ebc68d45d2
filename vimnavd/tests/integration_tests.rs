//! Integration tests for the vimnavd host runtime

use page_types::ElementId;
use services_key_dispatch::{DispatchOutcome, NavAction};
use services_link_hints::{HintAction, HintExitReason};
use sim_page::{Activation, NavigationEvent};
use vimnavd::{HostRuntime, HostRuntimeConfig, HostRuntimeError, TraceEvent};

const ARTICLE: &str = include_str!("../../demos/article.json");
const SETTINGS: &str = include_str!("../../demos/settings.json");

fn run(script: &str, settings: Option<&str>) -> HostRuntime {
    let config = HostRuntimeConfig {
        page: Some(ARTICLE.to_string()),
        script: Some(script.to_string()),
        settings: settings.map(str::to_string),
        ..HostRuntimeConfig::default()
    };

    let mut runtime = HostRuntime::new(config).unwrap();
    runtime.run();
    runtime
}

fn outcomes(runtime: &HostRuntime) -> Vec<DispatchOutcome> {
    runtime
        .trace()
        .iter()
        .filter_map(|entry| match &entry.event {
            TraceEvent::Key { outcome, .. } => Some(outcome.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_follow_link_demo() {
    let runtime = run(include_str!("../../demos/follow_link.vnkeys"), None);

    assert_eq!(runtime.page().scroll_top(), 120.0);
    // The top links scrolled out of view and the lower one scrolled in, so
    // it is the first link labeled
    assert_eq!(
        runtime.page().activations(),
        &[Activation::Clicked(ElementId::new(6))]
    );
    assert!(runtime.page().badges().is_empty());
    assert!(!runtime.dispatcher().hints().is_active());
}

#[test]
fn test_scroll_and_cancel_demo() {
    let runtime = run(include_str!("../../demos/scroll_and_cancel.vnkeys"), None);

    let outcomes = outcomes(&runtime);
    assert_eq!(outcomes.len(), 8);
    assert_eq!(outcomes[0], DispatchOutcome::Navigated(NavAction::ScrollToBottom));
    assert_eq!(outcomes[2], DispatchOutcome::Navigated(NavAction::ScrollToTop));
    assert_eq!(
        outcomes[5],
        DispatchOutcome::Hint(HintAction::Exited(HintExitReason::Cancelled))
    );
    assert_eq!(outcomes[6], DispatchOutcome::Navigated(NavAction::ScrollDown));

    assert_eq!(
        runtime.page().navigation_log(),
        &[
            NavigationEvent::ScrolledToBottom,
            NavigationEvent::ScrolledToTop,
            NavigationEvent::ScrolledBy(60.0),
            NavigationEvent::ScrolledBy(-60.0),
        ]
    );
    assert!(runtime.page().activations().is_empty());
}

#[test]
fn test_search_box_demo() {
    let runtime = run(include_str!("../../demos/search_box.vnkeys"), None);

    assert_eq!(
        runtime.page().activations(),
        &[Activation::Focused(ElementId::new(4))]
    );

    // Everything typed after focusing belongs to the search box
    let outcomes = outcomes(&runtime);
    assert!(outcomes[3..]
        .iter()
        .all(|outcome| *outcome == DispatchOutcome::Guarded));
    assert!(runtime.page().navigation_log().is_empty());
}

#[test]
fn test_settings_file_changes_codes_and_scrolling() {
    let runtime = run("\"jj\"\nf\n\"as\"", Some(SETTINGS));

    assert_eq!(runtime.page().scroll_top(), 240.0);
    // Codes come from the configured alphabet: "aa", "as", ...
    assert_eq!(
        runtime.page().activations(),
        &[Activation::Clicked(ElementId::new(7))]
    );
}

#[test]
fn test_sequence_timeout_on_script_clock() {
    let runtime = run("g\nwait 1500ms\ng", None);

    let outcomes = outcomes(&runtime);
    assert_eq!(
        outcomes.last(),
        Some(&DispatchOutcome::Pending {
            sequence: "g".to_string()
        })
    );
    assert!(runtime.page().navigation_log().is_empty());
}

#[test]
fn test_detached_target_exits_without_activation() {
    let runtime = run("f\ndetach 2\n\"ab\"", None);

    assert!(matches!(
        runtime.trace()[1].event,
        TraceEvent::Detach { detached: true, .. }
    ));
    assert_eq!(
        outcomes(&runtime).last(),
        Some(&DispatchOutcome::Hint(HintAction::Exited(
            HintExitReason::StaleTarget
        )))
    );
    assert!(runtime.page().activations().is_empty());
    assert!(runtime.page().badges().is_empty());
}

#[test]
fn test_scrolling_changes_which_elements_get_hints() {
    let runtime = run("\"jj\"\nf", None);

    let session = runtime.dispatcher().hints().session().unwrap();
    let targets: Vec<ElementId> = session.candidates().iter().map(|c| c.target).collect();
    assert_eq!(
        targets,
        vec![ElementId::new(6), ElementId::new(7), ElementId::new(8)]
    );
}

#[test]
fn test_huge_wait_does_not_overflow_clock() {
    let runtime = run("wait 18446744073709551615ms\nj\nj", None);

    assert_eq!(runtime.clock_ms(), u64::MAX);
    assert_eq!(runtime.trace().len(), 3);
    assert_eq!(runtime.page().scroll_top(), 120.0);
}

#[test]
fn test_overflowing_wait_is_rejected() {
    let config = HostRuntimeConfig {
        page: Some(ARTICLE.to_string()),
        script: Some("wait 18446744073709552s".to_string()),
        ..HostRuntimeConfig::default()
    };

    assert!(matches!(
        HostRuntime::new(config),
        Err(HostRuntimeError::Script(_))
    ));
}

#[test]
fn test_summary_while_hints_are_showing() {
    let runtime = run("f\na", None);

    let summary = runtime.render_summary();
    assert!(summary.contains("hint mode:   active (typed \"a\", 6 candidates)"));
    assert!(summary.contains("activations: (none)"));
}
