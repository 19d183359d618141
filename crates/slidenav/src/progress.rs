//! Progress bar: one segment per slide, tracking traversal and answered tasks.

use serde::Serialize;

use crate::popup::{self, Popup, SegmentSpan};
use crate::session::Session;

/// Above this many slides no segment gets a task indicator.
pub const MAX_SLIDES_WITH_TASK_INDICATORS: usize = 60;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub index: usize,
    /// Tooltip text.
    pub title: String,
    pub shown: bool,
    pub selected: bool,
    /// Present when the slide is task-bearing.
    pub task: Option<TaskIndicator>,
    /// The segment stands for the summary slide.
    pub summary: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskIndicator {
    pub answered: bool,
}

impl Segment {
    pub fn has_task(&self) -> bool {
        self.task.is_some()
    }

    pub fn answered(&self) -> bool {
        self.task.is_some_and(|t| t.answered)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProgressBar {
    segments: Vec<Segment>,
    hover: bool,
    popup: Option<Popup>,
}

impl ProgressBar {
    pub fn new(hover: bool) -> Self {
        Self {
            segments: Vec::new(),
            hover,
            popup: None,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn hover_enabled(&self) -> bool {
        self.hover
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    pub fn selected(&self) -> Option<usize> {
        self.segments.iter().position(|s| s.selected)
    }

    /// Replace all segments with a fresh set built from the session.
    ///
    /// `answered` is the per-slide map persisted by a previous session; slides marked there
    /// start with their task indicator answered.
    pub fn build(&mut self, session: &dyn Session, answered: Option<&[bool]>) {
        let count = session.slide_count();
        let flags = session.flags();
        let l10n = session.l10n();
        let summary_enabled = flags.summary_slide && !flags.editor;

        self.popup = None;
        self.segments = (0..count)
            .map(|i| {
                let is_last = i + 1 == count;
                let title = match session.slide_keyword(i) {
                    Some(keyword) => keyword.to_string(),
                    None if summary_enabled && is_last => l10n.summary.clone(),
                    None => l10n.slide_label(i),
                };

                let task = (count <= MAX_SLIDES_WITH_TASK_INDICATORS
                    && session.slide_has_elements(i)
                    && !session.solvable_tasks(i).is_empty())
                .then(|| TaskIndicator {
                    answered: answered.and_then(|a| a.get(i)).copied().unwrap_or(false),
                });

                Segment {
                    index: i,
                    title,
                    shown: i == 0,
                    selected: i == 0,
                    task,
                    summary: summary_enabled && is_last,
                }
            })
            .collect();

        tracing::debug!(
            segments = count,
            with_tasks = self.segments.iter().filter(|s| s.has_task()).count(),
            "built progress bar"
        );
    }

    /// Move the selection to `index`.
    ///
    /// With no `previous` index (cold start or resume) every task indicator is reset to
    /// unanswered, except in solution or editor mode where answers are frozen.
    pub fn set_current(
        &mut self,
        index: usize,
        previous: Option<usize>,
        solution_mode: bool,
        editor_mode: bool,
    ) {
        let Some(last) = self.segments.len().checked_sub(1) else {
            return;
        };
        let index = index.min(last);

        for segment in &mut self.segments {
            segment.shown = segment.index <= index;
            segment.selected = segment.index == index;
        }

        if previous.is_none() && !solution_mode && !editor_mode {
            for task in self.segments.iter_mut().filter_map(|s| s.task.as_mut()) {
                task.answered = false;
            }
        }
    }

    /// Mark the slide's indicator answered once every gradable task on it reports an answer.
    ///
    /// Never clears a set indicator.
    pub fn mark_answered(&mut self, session: &dyn Session, index: usize) {
        let Some(task) = self.segments.get_mut(index).and_then(|s| s.task.as_mut()) else {
            return;
        };
        let all_answered = session
            .solvable_tasks(index)
            .iter()
            .all(|t| t.answer_given().unwrap_or(true));
        if all_answered && !task.answered {
            tracing::debug!(slide = index, "slide answered");
            task.answered = true;
        }
    }

    /// Show the shared popup over `index`.
    ///
    /// `span` is the segment geometry and `popup_width` the measured width of the
    /// popup text; the result is clamped inside `container_width`.
    pub fn show_tooltip(
        &mut self,
        index: usize,
        span: SegmentSpan,
        popup_width: f32,
        container_width: f32,
    ) {
        if !self.hover {
            return;
        }
        let Some(segment) = self.segments.get(index) else {
            return;
        };
        let left = popup::place(span, popup_width, container_width);
        match &mut self.popup {
            Some(popup) => {
                popup.segment = index;
                popup.text.clone_from(&segment.title);
                popup.left = left;
            }
            None => {
                self.popup = Some(Popup {
                    segment: index,
                    text: segment.title.clone(),
                    left,
                });
            }
        }
    }

    pub fn hide_tooltip(&mut self, index: usize) {
        if self.popup.as_ref().is_some_and(|p| p.segment == index) {
            self.popup = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeSession;
    use rstest::rstest;

    fn built(session: &FakeSession) -> ProgressBar {
        let mut bar = ProgressBar::new(true);
        bar.build(session, session.previous_answers());
        bar
    }

    #[test]
    fn test_build_titles() {
        let mut session = FakeSession::new(3);
        session.keywords[1] = Some("Intro".to_string());
        let bar = built(&session);
        let titles: Vec<&str> = bar.segments().iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["Slide 1", "Intro", "Slide 3"]);
    }

    #[test]
    fn test_summary_title_on_last_slide() {
        let mut session = FakeSession::new(3);
        session.flags.summary_slide = true;
        let bar = built(&session);
        assert_eq!(bar.segments()[2].title, "Summary");
        assert!(bar.segments()[2].summary);
        assert!(!bar.segments()[1].summary);
    }

    #[test]
    fn test_keyword_wins_over_summary_title() {
        let mut session = FakeSession::new(2);
        session.flags.summary_slide = true;
        session.keywords[1] = Some("Wrap-up".to_string());
        let bar = built(&session);
        assert_eq!(bar.segments()[1].title, "Wrap-up");
    }

    #[test]
    fn test_no_summary_title_in_editor() {
        let mut session = FakeSession::new(2);
        session.flags.summary_slide = true;
        session.flags.editor = true;
        let bar = built(&session);
        assert_eq!(bar.segments()[1].title, "Slide 2");
        assert!(!bar.segments()[1].summary);
    }

    #[test]
    fn test_first_segment_starts_selected() {
        let bar = built(&FakeSession::new(4));
        assert_eq!(bar.selected(), Some(0));
        assert!(bar.segments()[0].shown);
        assert!(!bar.segments()[1].shown);
    }

    #[test]
    fn test_task_indicator_requires_solution() {
        let mut session = FakeSession::new(3);
        session.add_task(1, Some(false));
        session.add_plain_element(2);
        let bar = built(&session);
        assert!(!bar.segments()[0].has_task());
        assert!(bar.segments()[1].has_task());
        assert!(!bar.segments()[2].has_task());
    }

    #[rstest]
    #[case(60, true)]
    #[case(61, false)]
    #[case(200, false)]
    fn test_task_indicators_suppressed_above_threshold(
        #[case] slides: usize,
        #[case] expected: bool,
    ) {
        let mut session = FakeSession::new(slides);
        for i in 0..slides {
            session.add_task(i, Some(true));
        }
        let bar = built(&session);
        assert!(bar.segments().iter().all(|s| s.has_task() == expected));
    }

    #[test]
    fn test_build_applies_persisted_answers() {
        let mut session = FakeSession::new(3);
        session.add_task(0, Some(true));
        session.add_task(2, Some(true));
        session.previous = Some(vec![true, true, false]);
        let bar = built(&session);
        assert!(bar.segments()[0].answered());
        assert!(!bar.segments()[1].answered());
        assert!(!bar.segments()[2].answered());
    }

    #[test]
    fn test_rebuild_replaces_segments() {
        let mut bar = built(&FakeSession::new(5));
        bar.set_current(3, Some(2), false, false);
        bar.build(&FakeSession::new(2), None);
        assert_eq!(bar.len(), 2);
        assert_eq!(bar.selected(), Some(0));
    }

    #[rstest]
    #[case(0)]
    #[case(3)]
    #[case(6)]
    fn test_set_current_selects_exactly_one(#[case] index: usize) {
        let mut bar = built(&FakeSession::new(7));
        bar.set_current(index, Some(0), false, false);
        let selected: Vec<usize> = bar
            .segments()
            .iter()
            .filter(|s| s.selected)
            .map(|s| s.index)
            .collect();
        assert_eq!(selected, [index]);
        for s in bar.segments() {
            assert_eq!(s.shown, s.index <= index);
        }
    }

    #[test]
    fn test_set_current_going_back_hides_later_segments() {
        let mut bar = built(&FakeSession::new(5));
        bar.set_current(4, Some(3), false, false);
        bar.set_current(1, Some(4), false, false);
        let shown: Vec<bool> = bar.segments().iter().map(|s| s.shown).collect();
        assert_eq!(shown, [true, true, false, false, false]);
    }

    #[test]
    fn test_set_current_clamps_out_of_range() {
        let mut bar = built(&FakeSession::new(3));
        bar.set_current(10, Some(0), false, false);
        assert_eq!(bar.selected(), Some(2));
    }

    #[test]
    fn test_set_current_on_empty_bar_is_noop() {
        let mut bar = ProgressBar::new(true);
        bar.set_current(0, None, false, false);
        assert!(bar.is_empty());
    }

    #[test]
    fn test_cold_start_clears_answers() {
        let mut session = FakeSession::new(3);
        session.add_task(0, Some(true));
        session.add_task(1, Some(true));
        session.previous = Some(vec![true, true, false]);
        let mut bar = built(&session);
        bar.set_current(1, None, false, false);
        assert!(bar.segments().iter().all(|s| !s.answered()));
    }

    #[test]
    fn test_navigation_keeps_answers() {
        let mut session = FakeSession::new(3);
        session.add_task(0, Some(true));
        let mut bar = built(&session);
        bar.mark_answered(&session, 0);
        bar.set_current(2, Some(0), false, false);
        assert!(bar.segments()[0].answered());
    }

    #[rstest]
    #[case(true, false)]
    #[case(false, true)]
    fn test_answers_frozen_in_review_modes(#[case] solution: bool, #[case] editor: bool) {
        let mut session = FakeSession::new(2);
        session.add_task(1, Some(true));
        session.previous = Some(vec![false, true]);
        let mut bar = built(&session);
        bar.set_current(1, None, solution, editor);
        assert!(bar.segments()[1].answered());
        assert_eq!(bar.selected(), Some(1));
    }

    #[test]
    fn test_mark_answered_requires_every_task() {
        let mut session = FakeSession::new(2);
        session.add_task(1, Some(true));
        session.add_task(1, Some(false));
        let mut bar = built(&session);
        bar.mark_answered(&session, 1);
        assert!(!bar.segments()[1].answered());

        session.answer(1, 1);
        bar.mark_answered(&session, 1);
        assert!(bar.segments()[1].answered());
    }

    #[test]
    fn test_mark_answered_ignores_tasks_without_answer_query() {
        let mut session = FakeSession::new(1);
        session.add_task(0, Some(true));
        session.add_task(0, None);
        let mut bar = built(&session);
        bar.mark_answered(&session, 0);
        assert!(bar.segments()[0].answered());
    }

    #[test]
    fn test_mark_answered_is_monotonic() {
        let mut session = FakeSession::new(1);
        session.add_task(0, Some(true));
        let mut bar = built(&session);
        bar.mark_answered(&session, 0);
        session.tasks[0][0] = Some(false);
        bar.mark_answered(&session, 0);
        assert!(bar.segments()[0].answered());
    }

    #[test]
    fn test_mark_answered_tolerates_unknown_slides() {
        let session = FakeSession::new(2);
        let mut bar = built(&session);
        bar.mark_answered(&session, 0);
        bar.mark_answered(&session, 9);
        assert!(bar.segments().iter().all(|s| !s.answered()));
    }

    #[test]
    fn test_tooltip_reuses_single_popup() {
        let mut session = FakeSession::new(3);
        session.keywords[2] = Some("End".to_string());
        let mut bar = built(&session);
        let span = |i: usize| SegmentSpan {
            left: i as f32 * 100.0,
            width: 100.0,
        };
        bar.show_tooltip(0, span(0), 80.0, 300.0);
        assert_eq!(bar.popup().map(|p| p.left), Some(10.0));
        bar.show_tooltip(2, span(2), 140.0, 300.0);
        let popup = bar.popup().unwrap();
        assert_eq!(popup.segment, 2);
        assert_eq!(popup.text, "End");
        assert_eq!(popup.left, 160.0);

        bar.hide_tooltip(0);
        assert!(bar.popup().is_some());
        bar.hide_tooltip(2);
        assert!(bar.popup().is_none());
    }

    #[test]
    fn test_no_tooltip_without_hover() {
        let session = FakeSession::new(2);
        let mut bar = ProgressBar::new(false);
        bar.build(&session, None);
        bar.show_tooltip(
            0,
            SegmentSpan {
                left: 0.0,
                width: 10.0,
            },
            40.0,
            100.0,
        );
        assert!(bar.popup().is_none());
    }
}
