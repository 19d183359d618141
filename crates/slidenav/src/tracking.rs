//! Bridges task statements into progress-bar state.
//!
//! Statements from subscribed elements pass through [`relabel`], a pure stage that rewrites
//! `completed` to `answered`, stamps the slide the learner is on, and tells the caller when the
//! current slide's answered state must be rechecked.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::session::{ElementRef, Session};
use crate::xapi::Statement;

/// Context extension carrying the 1-based slide the statement was produced on.
pub const ENDING_POINT_EXTENSION: &str = "http://id.tincanapi.com/extension/ending-point";

#[derive(Debug, Clone, PartialEq)]
pub struct Relabeled {
    pub statement: Statement,
    /// Slide whose answered state should be recomputed.
    pub recheck: Option<usize>,
}

pub fn relabel(statement: Statement, current_slide: usize) -> Relabeled {
    let verb = statement.short_verb().to_string();
    let (statement, recheck) = match verb.as_str() {
        "interacted" => (statement, Some(current_slide)),
        "completed" => (statement.with_verb("answered"), None),
        _ => (statement, None),
    };
    let statement =
        statement.with_extension(ENDING_POINT_EXTENSION, Value::from(current_slide + 1));
    Relabeled { statement, recheck }
}

/// The set of elements whose statements are intercepted.
#[derive(Debug, Clone, Default)]
pub struct AnswerTracker {
    subscriptions: BTreeSet<ElementRef>,
}

impl AnswerTracker {
    /// Subscribe to every element the session reports as an event source.
    pub fn subscribe(session: &dyn Session) -> Self {
        let subscriptions: BTreeSet<ElementRef> = session.event_sources().into_iter().collect();
        tracing::debug!(sources = subscriptions.len(), "answer tracking subscribed");
        Self { subscriptions }
    }

    pub fn is_subscribed(&self, origin: ElementRef) -> bool {
        self.subscriptions.contains(&origin)
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Relabel a statement from `origin`; unsubscribed origins pass through untouched.
    pub fn intercept(
        &self,
        origin: ElementRef,
        statement: Statement,
        current_slide: usize,
    ) -> Relabeled {
        if !self.is_subscribed(origin) {
            return Relabeled {
                statement,
                recheck: None,
            };
        }
        tracing::trace!(
            slide = origin.slide,
            element = origin.element,
            verb = statement.short_verb(),
            "intercepted statement"
        );
        relabel(statement, current_slide)
    }
}
