//! # Host Runtime
//!
//! The scripted event loop: one scripted input per step, dispatched
//! against a simulated page on a simulated clock.

use crate::input_script::{InputScript, ScriptedInput};
use input_types::KeyEvent;
use page_types::{ElementId, Viewport};
use services_key_dispatch::{DispatchOutcome, KeyDispatcher};
use services_link_hints::HintError;
use services_settings::persistence::{deserialize_settings, PersistenceError};
use services_settings::NavigatorSettings;
use sim_page::fixture::{FixtureError, PageFixture};
use sim_page::{Activation, SimulatedPage};
use std::fmt;
use thiserror::Error;

/// Host runtime error types
#[derive(Debug, Error)]
pub enum HostRuntimeError {
    #[error("Page error: {0}")]
    Fixture(#[from] FixtureError),

    #[error("Script error: {0}")]
    Script(#[from] crate::input_script::InputScriptError),

    #[error("Settings error: {0}")]
    Settings(#[from] PersistenceError),

    #[error("Hint service error: {0}")]
    Hints(#[from] HintError),
}

/// Host runtime configuration
#[derive(Debug, Clone)]
pub struct HostRuntimeConfig {
    /// Page fixture (JSON); an empty page when absent
    pub page: Option<String>,
    /// Input script
    pub script: Option<String>,
    /// Settings file contents (versioned JSON)
    pub settings: Option<String>,
    /// Simulated time between consecutive key presses
    pub key_interval_ms: u64,
    /// Maximum steps to run (0 = unlimited)
    pub max_steps: usize,
    /// Print each trace entry as it happens
    pub echo: bool,
}

impl Default for HostRuntimeConfig {
    fn default() -> Self {
        Self {
            page: None,
            script: None,
            settings: None,
            key_interval_ms: 50,
            max_steps: 0,
            echo: false,
        }
    }
}

/// What happened in one step
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    Key {
        event: KeyEvent,
        outcome: DispatchOutcome,
    },
    Wait(u64),
    Detach {
        element: ElementId,
        detached: bool,
    },
}

/// One line of the host trace
#[derive(Debug, Clone, PartialEq)]
pub struct TraceEntry {
    /// Simulated clock when the step ran
    pub at_ms: u64,
    pub event: TraceEvent,
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:>6}ms] ", self.at_ms)?;
        match &self.event {
            TraceEvent::Key { event, outcome } => {
                let suppressed = if outcome.suppresses_default() {
                    " (default suppressed)"
                } else {
                    ""
                };
                write!(f, "{:<16} -> {}{}", event.to_string(), outcome, suppressed)
            }
            TraceEvent::Wait(millis) => write!(f, "wait {}ms", millis),
            TraceEvent::Detach { element, detached } => {
                if *detached {
                    write!(f, "detached {}", element)
                } else {
                    write!(f, "detach {}: not attached", element)
                }
            }
        }
    }
}

/// Host runtime
pub struct HostRuntime {
    /// Configuration
    config: HostRuntimeConfig,
    /// Simulated page
    page: SimulatedPage,
    /// Key dispatcher (owns the hint controller)
    dispatcher: KeyDispatcher,
    /// Input script
    script: Option<InputScript>,
    /// Simulated clock
    clock_ms: u64,
    /// Step counter
    steps: usize,
    /// Everything that happened so far
    trace: Vec<TraceEntry>,
    /// Hint audit events drained from the controller
    audit_events: usize,
}

impl HostRuntime {
    /// Creates a new host runtime
    pub fn new(config: HostRuntimeConfig) -> Result<Self, HostRuntimeError> {
        let page = match &config.page {
            Some(text) => PageFixture::from_json(text)?.build(),
            None => SimulatedPage::new(Viewport::new(1280.0, 800.0)),
        };

        let settings = match &config.settings {
            Some(text) => deserialize_settings(text.as_bytes())?.settings,
            None => NavigatorSettings::default(),
        };

        let dispatcher = KeyDispatcher::new(&settings)?;

        let script = match &config.script {
            Some(text) => Some(InputScript::from_text(text)?),
            None => None,
        };

        tracing::info!(
            "Host runtime ready: {} scripted inputs",
            script.as_ref().map(InputScript::remaining).unwrap_or(0)
        );

        Ok(Self {
            config,
            page,
            dispatcher,
            script,
            clock_ms: 0,
            steps: 0,
            trace: Vec::new(),
            audit_events: 0,
        })
    }

    /// Runs until the script is exhausted or max steps is reached
    pub fn run(&mut self) {
        loop {
            if self.config.max_steps > 0 && self.steps >= self.config.max_steps {
                break;
            }

            if !self.script.as_ref().map(InputScript::has_more).unwrap_or(false) {
                break;
            }

            self.step();
            self.steps += 1;
        }
    }

    /// Executes one scripted input
    pub fn step(&mut self) {
        let Some(input) = self.script.as_mut().and_then(InputScript::next_input) else {
            return;
        };

        let at_ms = self.clock_ms;
        let event = match input {
            ScriptedInput::Key(..) => {
                let Some(event) = InputScript::to_key_event(&input) else {
                    return;
                };
                let outcome = self.dispatcher.dispatch(&mut self.page, &event, at_ms);
                for audit in self.dispatcher.hints_mut().take_audit_trail() {
                    tracing::debug!("audit: {:?}", audit);
                    self.audit_events += 1;
                }
                self.clock_ms = self.clock_ms.saturating_add(self.config.key_interval_ms);
                TraceEvent::Key { event, outcome }
            }
            ScriptedInput::Wait(millis) => {
                self.clock_ms = self.clock_ms.saturating_add(millis);
                TraceEvent::Wait(millis)
            }
            ScriptedInput::Detach(element) => TraceEvent::Detach {
                element,
                detached: self.page.detach(element),
            },
        };

        let entry = TraceEntry { at_ms, event };
        tracing::debug!("{}", entry);
        if self.config.echo {
            // Host can print (it's a host, not a service)
            println!("{}", entry);
        }
        self.trace.push(entry);
    }

    /// Renders the final page state
    pub fn render_summary(&self) -> String {
        let mut lines = Vec::new();

        let mode = match self.dispatcher.hints().session() {
            Some(session) => format!(
                "active (typed \"{}\", {} candidates)",
                session.typed(),
                session.candidates().len()
            ),
            None => "inactive".to_string(),
        };
        lines.push(format!("hint mode:   {}", mode));
        lines.push(format!("scroll top:  {}", self.page.scroll_top()));

        let badges = self.page.visible_badge_texts();
        lines.push(if badges.is_empty() {
            "badges:      (none)".to_string()
        } else {
            format!("badges:      {}", badges.join(" "))
        });

        let activations: Vec<String> = self
            .page
            .activations()
            .iter()
            .map(|activation| match activation {
                Activation::Clicked(element) => format!("clicked {}", element),
                Activation::Focused(element) => format!("focused {}", element),
            })
            .collect();
        lines.push(if activations.is_empty() {
            "activations: (none)".to_string()
        } else {
            format!("activations: {}", activations.join(", "))
        });

        lines.join("\n")
    }

    /// Returns the trace so far
    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    /// Returns the step count
    pub fn step_count(&self) -> usize {
        self.steps
    }

    /// Returns how many hint audit events have been drained
    pub fn audit_event_count(&self) -> usize {
        self.audit_events
    }

    /// Returns the simulated clock
    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    /// Returns the simulated page (for testing)
    pub fn page(&self) -> &SimulatedPage {
        &self.page
    }

    /// Returns the dispatcher (for testing)
    pub fn dispatcher(&self) -> &KeyDispatcher {
        &self.dispatcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{
        "viewport": { "width": 800, "height": 600 },
        "document_height": 2000,
        "elements": [
            { "tag": "a", "rect": { "top": 10, "left": 10, "width": 80, "height": 16 } },
            { "tag": "a", "rect": { "top": 40, "left": 10, "width": 80, "height": 16 } }
        ]
    }"#;

    fn config(script: &str) -> HostRuntimeConfig {
        HostRuntimeConfig {
            page: Some(PAGE.to_string()),
            script: Some(script.to_string()),
            ..HostRuntimeConfig::default()
        }
    }

    #[test]
    fn test_runtime_creation() {
        let runtime = HostRuntime::new(HostRuntimeConfig::default()).unwrap();
        assert_eq!(runtime.step_count(), 0);
        assert!(runtime.trace().is_empty());
    }

    #[test]
    fn test_runtime_runs_script() {
        let mut runtime = HostRuntime::new(config("\"jj\"\nwait 500ms\nf")).unwrap();
        runtime.run();

        assert_eq!(runtime.step_count(), 4);
        assert_eq!(runtime.page().scroll_top(), 120.0);
        assert!(runtime.dispatcher().hints().is_active());
        assert_eq!(runtime.clock_ms(), 50 + 50 + 500 + 50);
    }

    #[test]
    fn test_runtime_drains_audit_trail() {
        let mut runtime = HostRuntime::new(config("f\n\"ab\"")).unwrap();
        runtime.run();

        // started, narrowed, activated, exited
        assert_eq!(runtime.audit_event_count(), 4);
        assert!(runtime.dispatcher().hints().audit_trail().is_empty());
    }

    #[test]
    fn test_runtime_max_steps() {
        let mut runtime = HostRuntime::new(HostRuntimeConfig {
            max_steps: 2,
            ..config("\"jjjj\"")
        })
        .unwrap();
        runtime.run();

        assert_eq!(runtime.step_count(), 2);
        assert_eq!(runtime.page().scroll_top(), 120.0);
    }

    #[test]
    fn test_runtime_detach() {
        let mut runtime = HostRuntime::new(config("f\ndetach 1\n\"aa\"")).unwrap();
        runtime.run();

        assert!(matches!(
            runtime.trace()[1].event,
            TraceEvent::Detach { detached: true, .. }
        ));
        assert!(runtime.page().activations().is_empty());
        assert!(!runtime.dispatcher().hints().is_active());
    }

    #[test]
    fn test_runtime_rejects_bad_inputs() {
        assert!(matches!(
            HostRuntime::new(HostRuntimeConfig {
                page: Some("{".to_string()),
                ..HostRuntimeConfig::default()
            }),
            Err(HostRuntimeError::Fixture(_))
        ));
        assert!(matches!(
            HostRuntime::new(config("Bogus+x")),
            Err(HostRuntimeError::Script(_))
        ));
        assert!(matches!(
            HostRuntime::new(HostRuntimeConfig {
                settings: Some(r#"{ "version": 7 }"#.to_string()),
                ..HostRuntimeConfig::default()
            }),
            Err(HostRuntimeError::Settings(_))
        ));
        assert!(matches!(
            HostRuntime::new(HostRuntimeConfig {
                settings: Some(r#"{ "version": 1, "settings": { "alphabet": "jk" } }"#.to_string()),
                ..HostRuntimeConfig::default()
            }),
            Err(HostRuntimeError::Hints(_))
        ));
    }

    #[test]
    fn test_summary() {
        let mut runtime = HostRuntime::new(config("f\n\"ab\"")).unwrap();
        runtime.run();

        let summary = runtime.render_summary();
        assert!(summary.contains("hint mode:   inactive"));
        assert!(summary.contains("badges:      (none)"));
        assert!(summary.contains("activations: clicked element:2"));
    }

    #[test]
    fn test_trace_entry_display() {
        let entry = TraceEntry {
            at_ms: 150,
            event: TraceEvent::Wait(100),
        };
        assert_eq!(entry.to_string(), "[   150ms] wait 100ms");
    }
}
