//! The surface the navigation chrome needs from the presentation that hosts it.
//!
//! The chrome never owns slide data. It reads everything through [`Session`] and triggers
//! navigation through [`Host`], so any presentation model (the deck-backed
//! [`Presentation`](crate::presentation::Presentation), a test fake, an editor preview) can
//! drive it.

use crate::l10n::L10n;

/// An element that can report whether the learner has answered it.
pub trait Gradable {
    /// `None` when the element has no answer query at all; such elements are ignored when
    /// deciding whether a slide is answered.
    fn answer_given(&self) -> Option<bool>;
}

/// Identifies one element on one slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementRef {
    pub slide: usize,
    pub element: usize,
}

/// Mode and feature flags read from the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionFlags {
    /// Authoring context: no summary slide, no exit-solution/print/fullscreen buttons.
    pub editor: bool,
    /// Reviewing previous answers.
    pub solution: bool,
    pub keyword_list_always_show: bool,
    /// Whether a keyword list exists at all.
    pub keyword_list_present: bool,
    /// The last slide is a summary slide.
    pub summary_slide: bool,
    pub print_enabled: bool,
}

/// Read access to the presentation state.
pub trait Session {
    fn slide_count(&self) -> usize;

    /// First keyword of the slide, if it has any.
    fn slide_keyword(&self, index: usize) -> Option<&str>;

    /// Whether the slide carries any elements at all.
    fn slide_has_elements(&self, index: usize) -> bool;

    /// Elements on the slide that have a recorded solution.
    fn solvable_tasks(&self, index: usize) -> Vec<&dyn Gradable>;

    fn current_index(&self) -> usize;

    fn l10n(&self) -> &L10n;

    fn flags(&self) -> SessionFlags;

    /// Text of the keyword currently highlighted in the keyword list.
    fn displayed_keyword(&self) -> Option<&str>;

    /// Per-slide answered map restored from a previous session.
    fn previous_answers(&self) -> Option<&[bool]> {
        None
    }

    /// Elements that publish interaction statements.
    fn event_sources(&self) -> Vec<ElementRef> {
        Vec::new()
    }
}

/// Navigation commands the chrome may trigger on its host.
pub trait Host: Session {
    fn jump_to_slide(&mut self, index: usize);
    fn previous_slide(&mut self);
    fn next_slide(&mut self);
    fn toggle_keywords(&mut self);
    fn toggle_fullscreen(&mut self);
    /// `all_slides` is false when only the current slide should be printed.
    fn print(&mut self, all_slides: bool);
}

/// Runtime capabilities, decided once when the chrome is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Pointer hover is available (false on touch-only devices).
    pub hover: bool,
    pub fullscreen: bool,
    pub print: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            hover: true,
            fullscreen: true,
            print: true,
        }
    }
}
