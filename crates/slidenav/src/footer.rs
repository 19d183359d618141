//! Footer: keyword label, previous/next controls, slide counter and mode-dependent actions.
//!
//! Controls are created once by [`Footer::build`]; afterwards only text and visibility change.

use serde::Serialize;

use crate::session::{Capabilities, Host, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Control {
    ToggleKeywords,
    PreviousSlide,
    NextSlide,
    ExitSolutionMode,
    Print,
    ToggleFullscreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FooterButton {
    pub control: Control,
    pub region: Region,
    pub title: String,
    pub hidden: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Footer {
    buttons: Vec<FooterButton>,
    current: usize,
    total: usize,
    keyword: String,
    summary: bool,
    exit_solution_text: String,
    keywords_always_show: bool,
    current_title: String,
    last_title: String,
}

impl Footer {
    pub fn build(session: &dyn Session, capabilities: Capabilities) -> Self {
        let flags = session.flags();
        let l10n = session.l10n();

        let mut buttons = vec![
            FooterButton {
                control: Control::ToggleKeywords,
                region: Region::Left,
                title: l10n.show_keywords.clone(),
                hidden: flags.keyword_list_always_show || !flags.keyword_list_present,
            },
            FooterButton {
                control: Control::PreviousSlide,
                region: Region::Center,
                title: l10n.prev_slide.clone(),
                hidden: false,
            },
            FooterButton {
                control: Control::NextSlide,
                region: Region::Center,
                title: l10n.next_slide.clone(),
                hidden: false,
            },
        ];

        if !flags.editor {
            buttons.push(FooterButton {
                control: Control::ExitSolutionMode,
                region: Region::Right,
                title: l10n.solution_mode_title.clone(),
                hidden: !flags.solution,
            });
            if flags.print_enabled && capabilities.print {
                buttons.push(FooterButton {
                    control: Control::Print,
                    region: Region::Right,
                    title: l10n.print_title.clone(),
                    hidden: false,
                });
            }
            if capabilities.fullscreen {
                buttons.push(FooterButton {
                    control: Control::ToggleFullscreen,
                    region: Region::Right,
                    title: l10n.fullscreen.clone(),
                    hidden: false,
                });
            }
        }

        let mut footer = Self {
            buttons,
            current: 1,
            total: session.slide_count(),
            keyword: String::new(),
            summary: false,
            exit_solution_text: String::new(),
            keywords_always_show: flags.keyword_list_always_show,
            current_title: l10n.current_slide.clone(),
            last_title: l10n.last_slide.clone(),
        };
        footer.update_keyword(session, 0);
        footer
    }

    /// Refresh counter, summary styling and keyword for the slide at `index`.
    pub fn update(&mut self, session: &dyn Session, index: usize) {
        let flags = session.flags();
        self.current = index + 1;
        self.total = session.slide_count();
        self.summary = flags.solution && index + 1 == self.total;
        self.exit_solution_text = if flags.solution {
            session.l10n().solution_mode_text.clone()
        } else {
            String::new()
        };
        let exit_hidden = !flags.solution || self.summary;
        if let Some(exit) = self.button_mut(Control::ExitSolutionMode) {
            exit.hidden = exit_hidden;
        }
        self.update_keyword(session, index);
    }

    pub fn update_keyword(&mut self, session: &dyn Session, index: usize) {
        let flags = session.flags();
        let count = session.slide_count();
        let mut keyword = session.displayed_keyword().unwrap_or_default().to_string();
        if !flags.editor && flags.summary_slide && index + 1 >= count {
            keyword.clone_from(&session.l10n().summary);
        }
        self.keyword = keyword;
    }

    /// Run the host command behind `control`.
    pub fn activate(&self, control: Control, host: &mut dyn Host) {
        if self.button(control).is_none() {
            return;
        }
        tracing::debug!(?control, "footer control activated");
        match control {
            Control::ToggleKeywords => {
                if !self.keywords_always_show {
                    host.toggle_keywords();
                }
            }
            Control::PreviousSlide => host.previous_slide(),
            Control::NextSlide => host.next_slide(),
            Control::ExitSolutionMode => {
                let last = host.slide_count().saturating_sub(1);
                host.jump_to_slide(last);
            }
            Control::Print => host.print(true),
            Control::ToggleFullscreen => host.toggle_fullscreen(),
        }
    }

    /// Print button with a scope: the whole deck, or only the current slide.
    pub fn print(&self, all_slides: bool, host: &mut dyn Host) {
        if self.button(Control::Print).is_none() {
            return;
        }
        tracing::debug!(all_slides, "print requested");
        host.print(all_slides);
    }

    pub fn buttons(&self) -> &[FooterButton] {
        &self.buttons
    }

    pub fn button(&self, control: Control) -> Option<&FooterButton> {
        self.buttons.iter().find(|b| b.control == control)
    }

    fn button_mut(&mut self, control: Control) -> Option<&mut FooterButton> {
        self.buttons.iter_mut().find(|b| b.control == control)
    }

    pub fn buttons_in(&self, region: Region) -> impl Iterator<Item = &FooterButton> {
        self.buttons.iter().filter(move |b| b.region == region)
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Counter as "current/total".
    pub fn counter_text(&self) -> String {
        format!("{}/{}", self.current(), self.total)
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn summary(&self) -> bool {
        self.summary
    }

    pub fn exit_solution_text(&self) -> &str {
        &self.exit_solution_text
    }

    pub fn current_title(&self) -> &str {
        &self.current_title
    }

    pub fn last_title(&self) -> &str {
        &self.last_title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Command, FakeSession};
    use rstest::rstest;

    fn controls(footer: &Footer) -> Vec<Control> {
        footer.buttons().iter().map(|b| b.control).collect()
    }

    #[test]
    fn test_build_order_outside_editor() {
        let mut session = FakeSession::new(3);
        session.flags.print_enabled = true;
        let footer = Footer::build(&session, Capabilities::default());
        assert_eq!(
            controls(&footer),
            [
                Control::ToggleKeywords,
                Control::PreviousSlide,
                Control::NextSlide,
                Control::ExitSolutionMode,
                Control::Print,
                Control::ToggleFullscreen,
            ]
        );
        assert_eq!(footer.counter_text(), "1/3");
    }

    #[test]
    fn test_editor_has_no_right_region() {
        let mut session = FakeSession::new(3);
        session.flags.editor = true;
        session.flags.print_enabled = true;
        let footer = Footer::build(&session, Capabilities::default());
        assert_eq!(footer.buttons_in(Region::Right).count(), 0);
    }

    #[rstest]
    #[case(false, true, false)]
    #[case(true, false, false)]
    #[case(true, true, true)]
    fn test_print_needs_setting_and_runtime(
        #[case] enabled: bool,
        #[case] supported: bool,
        #[case] expected: bool,
    ) {
        let mut session = FakeSession::new(2);
        session.flags.print_enabled = enabled;
        let caps = Capabilities {
            print: supported,
            ..Capabilities::default()
        };
        let footer = Footer::build(&session, caps);
        assert_eq!(footer.button(Control::Print).is_some(), expected);
    }

    #[test]
    fn test_fullscreen_needs_runtime_support() {
        let session = FakeSession::new(2);
        let caps = Capabilities {
            fullscreen: false,
            ..Capabilities::default()
        };
        let footer = Footer::build(&session, caps);
        assert!(footer.button(Control::ToggleFullscreen).is_none());
    }

    #[rstest]
    #[case(false, false, true)]
    #[case(true, true, true)]
    #[case(false, true, false)]
    fn test_keyword_button_visibility(
        #[case] always_show: bool,
        #[case] present: bool,
        #[case] hidden: bool,
    ) {
        let mut session = FakeSession::new(2);
        session.flags.keyword_list_always_show = always_show;
        session.flags.keyword_list_present = present;
        let footer = Footer::build(&session, Capabilities::default());
        assert_eq!(footer.button(Control::ToggleKeywords).unwrap().hidden, hidden);
    }

    #[rstest]
    #[case(0, "1/7")]
    #[case(3, "4/7")]
    #[case(6, "7/7")]
    fn test_counter_text(#[case] index: usize, #[case] expected: &str) {
        let session = FakeSession::new(7);
        let mut footer = Footer::build(&session, Capabilities::default());
        footer.update(&session, index);
        assert_eq!(footer.counter_text(), expected);
    }

    #[test]
    fn test_summary_styling_in_solution_mode_on_last_slide() {
        let mut session = FakeSession::new(4);
        session.flags.solution = true;
        session.flags.summary_slide = true;
        let mut footer = Footer::build(&session, Capabilities::default());

        footer.update(&session, 2);
        assert!(!footer.summary());
        assert!(!footer.button(Control::ExitSolutionMode).unwrap().hidden);
        assert_eq!(footer.exit_solution_text(), "Solution Mode");

        footer.update(&session, 3);
        assert!(footer.summary());
        assert!(footer.button(Control::ExitSolutionMode).unwrap().hidden);
    }

    #[test]
    fn test_no_summary_styling_outside_solution_mode() {
        let session = FakeSession::new(4);
        let mut footer = Footer::build(&session, Capabilities::default());
        footer.update(&session, 3);
        assert!(!footer.summary());
        assert!(footer.button(Control::ExitSolutionMode).unwrap().hidden);
        assert_eq!(footer.exit_solution_text(), "");
    }

    #[test]
    fn test_keyword_label() {
        let mut session = FakeSession::new(3);
        session.displayed = Some("Photosynthesis".to_string());
        let mut footer = Footer::build(&session, Capabilities::default());
        assert_eq!(footer.keyword(), "Photosynthesis");

        session.displayed = None;
        footer.update_keyword(&session, 1);
        assert_eq!(footer.keyword(), "");
    }

    #[test]
    fn test_keyword_label_on_summary_slide() {
        let mut session = FakeSession::new(3);
        session.flags.summary_slide = true;
        session.displayed = Some("Photosynthesis".to_string());
        let mut footer = Footer::build(&session, Capabilities::default());
        footer.update_keyword(&session, 2);
        assert_eq!(footer.keyword(), "Summary");

        session.flags.editor = true;
        footer.update_keyword(&session, 2);
        assert_eq!(footer.keyword(), "Photosynthesis");
    }

    #[test]
    fn test_activate_dispatches_to_host() {
        let mut session = FakeSession::new(5);
        session.flags.keyword_list_present = true;
        session.flags.print_enabled = true;
        let footer = Footer::build(&session, Capabilities::default());
        for control in [
            Control::ToggleKeywords,
            Control::PreviousSlide,
            Control::NextSlide,
            Control::ExitSolutionMode,
            Control::Print,
            Control::ToggleFullscreen,
        ] {
            footer.activate(control, &mut session);
        }
        assert_eq!(
            session.commands,
            [
                Command::ToggleKeywords,
                Command::Previous,
                Command::Next,
                Command::Jump(4),
                Command::Print(true),
                Command::ToggleFullscreen,
            ]
        );
    }

    #[test]
    fn test_print_current_slide_only() {
        let mut session = FakeSession::new(3);
        session.flags.print_enabled = true;
        let footer = Footer::build(&session, Capabilities::default());
        footer.print(false, &mut session);
        assert_eq!(session.commands, [Command::Print(false)]);
    }

    #[test]
    fn test_print_scope_needs_print_button() {
        let mut session = FakeSession::new(3);
        let footer = Footer::build(&session, Capabilities::default());
        footer.print(false, &mut session);
        assert!(session.commands.is_empty());
    }

    #[test]
    fn test_keyword_toggle_ignored_when_always_shown() {
        let mut session = FakeSession::new(2);
        session.flags.keyword_list_always_show = true;
        let footer = Footer::build(&session, Capabilities::default());
        footer.activate(Control::ToggleKeywords, &mut session);
        assert!(session.commands.is_empty());
    }

    #[test]
    fn test_absent_controls_do_nothing() {
        let mut session = FakeSession::new(2);
        session.flags.editor = true;
        let footer = Footer::build(&session, Capabilities::default());
        footer.activate(Control::ToggleFullscreen, &mut session);
        assert!(session.commands.is_empty());
    }
}
