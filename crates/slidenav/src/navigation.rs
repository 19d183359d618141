//! [`NavigationLine`]: the progress bar, the footer and answer tracking as one component.

use crate::footer::{Control, Footer};
use crate::popup::SegmentSpan;
use crate::progress::ProgressBar;
use crate::session::{Capabilities, ElementRef, Host, Session};
use crate::tracking::AnswerTracker;
use crate::xapi::Statement;

#[derive(Debug, Clone)]
pub struct NavigationLine {
    progress: ProgressBar,
    footer: Footer,
    tracker: AnswerTracker,
    capabilities: Capabilities,
}

impl NavigationLine {
    pub fn new(session: &dyn Session, capabilities: Capabilities) -> Self {
        let mut progress = ProgressBar::new(capabilities.hover);
        progress.build(session, session.previous_answers());
        Self {
            progress,
            footer: Footer::build(session, capabilities),
            tracker: AnswerTracker::subscribe(session),
            capabilities,
        }
    }

    /// Tear down and rebuild the progress bar, e.g. after the slide list changed.
    ///
    /// Footer controls are kept; only their text follows the new session.
    pub fn rebuild(&mut self, session: &dyn Session) {
        self.progress.build(session, session.previous_answers());
        self.tracker = AnswerTracker::subscribe(session);
        self.footer.update(session, session.current_index());
    }

    pub fn progress(&self) -> &ProgressBar {
        &self.progress
    }

    pub fn footer(&self) -> &Footer {
        &self.footer
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Progress-bar half of a slide transition.
    pub fn set_current(
        &mut self,
        session: &dyn Session,
        index: usize,
        previous: Option<usize>,
        solution_mode: bool,
    ) {
        self.progress
            .set_current(index, previous, solution_mode, session.flags().editor);
    }

    /// Footer half of a slide transition.
    pub fn update(&mut self, session: &dyn Session, index: usize) {
        self.footer.update(session, index);
    }

    /// Both halves of a slide transition, in the order the host calls them.
    pub fn slide_changed(&mut self, session: &dyn Session, previous: Option<usize>) {
        let index = session.current_index();
        tracing::debug!(slide = index, ?previous, "slide changed");
        self.set_current(session, index, previous, session.flags().solution);
        self.update(session, index);
    }

    pub fn mark_answered(&mut self, session: &dyn Session, index: usize) {
        self.progress.mark_answered(session, index);
    }

    /// Pass a task statement through answer tracking and return the statement to publish.
    pub fn handle_task_event(
        &mut self,
        session: &dyn Session,
        origin: ElementRef,
        statement: Statement,
    ) -> Statement {
        let relabeled = self
            .tracker
            .intercept(origin, statement, session.current_index());
        if let Some(slide) = relabeled.recheck {
            self.progress.mark_answered(session, slide);
        }
        relabeled.statement
    }

    /// An element on `slide` was answered. Pass what it published through answer tracking,
    /// then re-check the slide, since silent tasks publish nothing.
    pub fn task_answered(
        &mut self,
        session: &dyn Session,
        slide: usize,
        published: Vec<(ElementRef, Statement)>,
    ) -> Vec<Statement> {
        let out = published
            .into_iter()
            .map(|(origin, statement)| self.handle_task_event(session, origin, statement))
            .collect();
        self.progress.mark_answered(session, slide);
        out
    }

    /// A segment was clicked.
    pub fn segment_clicked(&self, index: usize, host: &mut dyn Host) {
        if self.progress.segment(index).is_some() {
            host.jump_to_slide(index);
        }
    }

    pub fn show_tooltip(
        &mut self,
        index: usize,
        span: SegmentSpan,
        popup_width: f32,
        container_width: f32,
    ) {
        self.progress
            .show_tooltip(index, span, popup_width, container_width);
    }

    pub fn hide_tooltip(&mut self, index: usize) {
        self.progress.hide_tooltip(index);
    }

    pub fn activate(&self, control: Control, host: &mut dyn Host) {
        self.footer.activate(control, host);
    }

    pub fn print_current_slide(&self, host: &mut dyn Host) {
        self.footer.print(false, host);
    }
}
