//! A deck-backed presentation session: the host the navigation chrome runs against.

use serde_json::json;

use crate::deck::{Deck, ElementSpec, PreviousState, plain_text};
use crate::l10n::L10n;
use crate::session::{ElementRef, Gradable, Host, Session, SessionFlags};
use crate::xapi::{Activity, Statement};

#[derive(Debug, Clone)]
pub struct Element {
    pub spec: ElementSpec,
    pub answered: bool,
}

impl Gradable for Element {
    fn answer_given(&self) -> Option<bool> {
        self.spec.has_answer_query().then_some(self.answered)
    }
}

#[derive(Debug, Clone)]
pub struct Slide {
    pub keywords: Vec<String>,
    pub elements: Vec<Element>,
    pub summary: bool,
}

/// Requests the chrome made that the windowing layer has to carry out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRequest {
    ToggleFullscreen,
    Print { all_slides: bool },
}

#[derive(Debug, Clone)]
pub struct Presentation {
    title: String,
    activity_base: String,
    slides: Vec<Slide>,
    current: usize,
    l10n: L10n,
    flags: SessionFlags,
    keywords_visible: bool,
    previous_answers: Option<Vec<bool>>,
    requests: Vec<HostRequest>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    pub editor: bool,
    pub solution: bool,
}

impl Presentation {
    pub fn new(deck: &Deck, l10n: L10n, options: SessionOptions) -> Self {
        let l10n = match &deck.l10n {
            Some(overrides) => l10n.merged(overrides),
            None => l10n,
        };
        let title = deck.title.clone().unwrap_or_else(|| "Untitled".to_string());
        let activity_base = format!(
            "slidenav://{}",
            title
                .to_lowercase()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("-")
        );
        let previous = deck.previous_state.as_ref();

        let mut slides: Vec<Slide> = deck
            .slides
            .iter()
            .enumerate()
            .map(|(i, spec)| Slide {
                keywords: spec
                    .keywords
                    .iter()
                    .map(|k| plain_text(k))
                    .filter(|k| !k.is_empty())
                    .collect(),
                elements: spec
                    .elements
                    .iter()
                    .enumerate()
                    .map(|(j, e)| Element {
                        spec: e.clone(),
                        answered: e.answered
                            || previous
                                .and_then(|p| p.answers.get(i))
                                .and_then(|a| a.get(j))
                                .copied()
                                .unwrap_or(false),
                    })
                    .collect(),
                summary: false,
            })
            .collect();

        let summary_slide = deck.summary && !options.editor && deck.has_tasks();
        if summary_slide {
            slides.push(Slide {
                keywords: Vec::new(),
                elements: Vec::new(),
                summary: true,
            });
        }

        let keyword_list_present = deck.keyword_list.enabled && deck.has_keywords();
        let flags = SessionFlags {
            editor: options.editor,
            solution: options.solution,
            keyword_list_always_show: deck.keyword_list.always_show,
            keyword_list_present,
            summary_slide,
            print_enabled: deck.print,
        };
        let current = previous
            .and_then(|p| p.progress)
            .unwrap_or(0)
            .min(slides.len().saturating_sub(1));

        Self {
            title,
            activity_base,
            slides,
            current,
            l10n,
            flags,
            keywords_visible: keyword_list_present && deck.keyword_list.always_show,
            previous_answers: previous.map(|p| p.answered.clone()),
            requests: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn keywords_visible(&self) -> bool {
        self.keywords_visible
    }

    pub fn solution_mode(&self) -> bool {
        self.flags.solution
    }

    /// Review answers from the first slide.
    pub fn enter_solution_mode(&mut self) {
        if self.flags.editor {
            return;
        }
        self.flags.solution = true;
        self.current = 0;
    }

    pub fn leave_solution_mode(&mut self) {
        self.flags.solution = false;
    }

    /// Take the requests issued since the last call.
    pub fn drain_requests(&mut self) -> Vec<HostRequest> {
        std::mem::take(&mut self.requests)
    }

    /// Record an answer and return the statements the element publishes.
    ///
    /// Answers are frozen in solution and editor mode; nothing is published then.
    pub fn answer(&mut self, slide: usize, element: usize) -> Vec<(ElementRef, Statement)> {
        if self.flags.solution || self.flags.editor {
            return Vec::new();
        }
        let activity_base = &self.activity_base;
        let Some(target) = self
            .slides
            .get_mut(slide)
            .and_then(|s| s.elements.get_mut(element))
        else {
            return Vec::new();
        };
        if !target.spec.is_task() {
            return Vec::new();
        }
        target.answered = true;
        if !target.spec.emits_events() {
            return Vec::new();
        }

        let origin = ElementRef { slide, element };
        let object = Activity {
            id: format!("{activity_base}/{slide}/{element}"),
            name: Some(target.spec.title.clone()),
        };
        vec![
            (origin, Statement::new("interacted", object.clone())),
            (
                origin,
                Statement::new("completed", object).with_result(json!({ "completion": true })),
            ),
        ]
    }

    /// Answered and total counts over all tasks with a solution.
    pub fn score(&self) -> (usize, usize) {
        let tasks = self
            .slides
            .iter()
            .flat_map(|s| &s.elements)
            .filter(|e| e.spec.has_solution());
        tasks.fold((0, 0), |(answered, total), e| {
            (answered + usize::from(e.answered), total + 1)
        })
    }

    /// First keyword, else "Summary" for the summary slide, else "Slide N".
    pub fn slide_heading(&self, index: usize) -> String {
        match self.slide_keyword(index) {
            Some(keyword) => keyword.to_string(),
            None if self.slides.get(index).is_some_and(|s| s.summary) => self.l10n.summary.clone(),
            None => self.l10n.slide_label(index),
        }
    }

    /// Plain-text handout of the current slide, or of every slide.
    pub fn handout(&self, all_slides: bool) -> String {
        let mut out = format!("{}\n", self.title);
        let range = if all_slides {
            0..self.slides.len()
        } else {
            self.current..self.current + 1
        };
        for (i, slide) in self.slides.iter().enumerate().skip(range.start).take(range.len()) {
            out.push_str(&format!("\n{}. {}\n", i + 1, self.slide_heading(i)));
            if slide.summary {
                let (answered, total) = self.score();
                out.push_str(&format!("   {answered}/{total}\n"));
            }
            for element in &slide.elements {
                let marker = match (element.spec.is_task(), element.answered) {
                    (false, _) => "-",
                    (true, true) => "[x]",
                    (true, false) => "[ ]",
                };
                out.push_str(&format!("   {marker} {}\n", element.spec.title));
            }
        }
        out
    }

    /// State to persist so the learner can resume later.
    pub fn snapshot(&self) -> PreviousState {
        let content = self.slides.iter().filter(|s| !s.summary);
        PreviousState {
            progress: Some(self.current.min(content.clone().count().saturating_sub(1))),
            answered: content
                .clone()
                .map(|s| {
                    let tasks: Vec<&Element> =
                        s.elements.iter().filter(|e| e.spec.has_solution()).collect();
                    !tasks.is_empty() && tasks.iter().all(|e| e.answered)
                })
                .collect(),
            answers: content
                .map(|s| s.elements.iter().map(|e| e.answered).collect())
                .collect(),
        }
    }
}

impl Session for Presentation {
    fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn slide_keyword(&self, index: usize) -> Option<&str> {
        self.slides.get(index)?.keywords.first().map(String::as_str)
    }

    fn slide_has_elements(&self, index: usize) -> bool {
        self.slides.get(index).is_some_and(|s| !s.elements.is_empty())
    }

    fn solvable_tasks(&self, index: usize) -> Vec<&dyn Gradable> {
        self.slides
            .get(index)
            .map(|s| {
                s.elements
                    .iter()
                    .filter(|e| e.spec.has_solution())
                    .map(|e| e as &dyn Gradable)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn current_index(&self) -> usize {
        self.current
    }

    fn l10n(&self) -> &L10n {
        &self.l10n
    }

    fn flags(&self) -> SessionFlags {
        self.flags
    }

    fn displayed_keyword(&self) -> Option<&str> {
        self.slide_keyword(self.current)
    }

    fn previous_answers(&self) -> Option<&[bool]> {
        self.previous_answers.as_deref()
    }

    fn event_sources(&self) -> Vec<ElementRef> {
        self.slides
            .iter()
            .enumerate()
            .flat_map(|(slide, s)| {
                s.elements
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| e.spec.emits_events())
                    .map(move |(element, _)| ElementRef { slide, element })
            })
            .collect()
    }
}

impl Host for Presentation {
    fn jump_to_slide(&mut self, index: usize) {
        if index < self.slides.len() {
            self.current = index;
        }
    }

    fn previous_slide(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    fn next_slide(&mut self) {
        if self.current + 1 < self.slides.len() {
            self.current += 1;
        }
    }

    fn toggle_keywords(&mut self) {
        if self.flags.keyword_list_present && !self.flags.keyword_list_always_show {
            self.keywords_visible = !self.keywords_visible;
        }
    }

    fn toggle_fullscreen(&mut self) {
        self.requests.push(HostRequest::ToggleFullscreen);
    }

    fn print(&mut self, all_slides: bool) {
        self.requests.push(HostRequest::Print { all_slides });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::NavigationLine;
    use crate::session::Capabilities;

    const DECK: &str = r#"
title: Cell Biology
slides:
  - keywords: ["<b>Intro</b>"]
    elements:
      - title: Welcome
  - elements:
      - title: Quiz A
        kind: task
      - title: Quiz B
        kind: task
  - keywords: [Membranes]
    elements:
      - title: Drag and drop
        kind: task
        events: false
"#;

    fn presentation(options: SessionOptions) -> Presentation {
        Presentation::new(&Deck::parse(DECK).unwrap(), L10n::default(), options)
    }

    #[test]
    fn test_summary_slide_appended() {
        let p = presentation(SessionOptions::default());
        assert_eq!(p.slide_count(), 4);
        assert!(p.slides()[3].summary);
        assert!(p.flags().summary_slide);
    }

    #[test]
    fn test_no_summary_slide_in_editor() {
        let p = presentation(SessionOptions {
            editor: true,
            solution: false,
        });
        assert_eq!(p.slide_count(), 3);
        assert!(!p.flags().summary_slide);
    }

    #[test]
    fn test_keywords_are_plain_text() {
        let p = presentation(SessionOptions::default());
        assert_eq!(p.slide_keyword(0), Some("Intro"));
        assert_eq!(p.slide_keyword(1), None);
        assert_eq!(p.displayed_keyword(), Some("Intro"));
    }

    #[test]
    fn test_event_sources_skip_silent_elements() {
        let p = presentation(SessionOptions::default());
        assert_eq!(
            p.event_sources(),
            [
                ElementRef {
                    slide: 1,
                    element: 0
                },
                ElementRef {
                    slide: 1,
                    element: 1
                },
            ]
        );
    }

    #[test]
    fn test_answer_publishes_statements() {
        let mut p = presentation(SessionOptions::default());
        let published = p.answer(1, 0);
        let verbs: Vec<&str> = published.iter().map(|(_, s)| s.short_verb()).collect();
        assert_eq!(verbs, ["interacted", "completed"]);
        assert_eq!(published[0].1.object.id, "slidenav://cell-biology/1/0");
        assert_eq!(p.score(), (1, 3));
    }

    #[test]
    fn test_answer_ignored_for_text_and_solution_mode() {
        let mut p = presentation(SessionOptions::default());
        assert!(p.answer(0, 0).is_empty());
        p.enter_solution_mode();
        assert!(p.answer(1, 0).is_empty());
        assert_eq!(p.score(), (0, 3));
    }

    #[test]
    fn test_silent_task_still_records_answer() {
        let mut p = presentation(SessionOptions::default());
        assert!(p.answer(2, 0).is_empty());
        assert_eq!(p.score(), (1, 3));
    }

    #[test]
    fn test_silent_task_answer_reaches_progress_bar() {
        let deck = Deck::parse(
            "slides:\n  - elements:\n      - title: Sort the cells\n        kind: task\n        events: false\n",
        )
        .unwrap();
        let mut p = Presentation::new(&deck, L10n::default(), SessionOptions::default());
        let mut nav = NavigationLine::new(&p, Capabilities::default());
        nav.slide_changed(&p, None);

        let published = p.answer(0, 0);
        assert!(published.is_empty());
        nav.task_answered(&p, 0, published);
        nav.slide_changed(&p, Some(0));

        assert_eq!(p.score(), (1, 1));
        assert!(nav.progress().segments()[0].answered());
    }

    #[test]
    fn test_navigation_bounds() {
        let mut p = presentation(SessionOptions::default());
        p.previous_slide();
        assert_eq!(p.current_index(), 0);
        p.jump_to_slide(9);
        assert_eq!(p.current_index(), 0);
        p.jump_to_slide(3);
        p.next_slide();
        assert_eq!(p.current_index(), 3);
    }

    #[test]
    fn test_requests_are_drained() {
        let mut p = presentation(SessionOptions::default());
        p.toggle_fullscreen();
        p.print(false);
        assert_eq!(
            p.drain_requests(),
            [
                HostRequest::ToggleFullscreen,
                HostRequest::Print { all_slides: false }
            ]
        );
        assert!(p.drain_requests().is_empty());
    }

    #[test]
    fn test_handout() {
        let mut p = presentation(SessionOptions::default());
        p.answer(1, 1);
        p.jump_to_slide(1);
        assert_eq!(
            p.handout(false),
            "Cell Biology\n\n2. Slide 2\n   [ ] Quiz A\n   [x] Quiz B\n"
        );
        let all = p.handout(true);
        assert!(all.contains("1. Intro\n   - Welcome\n"));
        assert!(all.ends_with("4. Summary\n   1/3\n"));
    }

    #[test]
    fn test_snapshot_round_trips_through_resume() {
        let mut p = presentation(SessionOptions::default());
        p.answer(1, 0);
        p.answer(1, 1);
        p.jump_to_slide(2);
        let state = p.snapshot();
        assert_eq!(state.progress, Some(2));
        assert_eq!(state.answered, [false, true, false]);

        let mut deck = Deck::parse(DECK).unwrap();
        deck.previous_state = Some(state);
        let resumed = Presentation::new(&deck, L10n::default(), SessionOptions::default());
        assert_eq!(resumed.current_index(), 2);
        assert_eq!(resumed.score(), (2, 3));
        assert_eq!(resumed.previous_answers(), Some(&[false, true, false][..]));
    }

    #[test]
    fn test_resumed_chrome_rechecks_after_cold_start() {
        let mut deck = Deck::parse(DECK).unwrap();
        deck.previous_state = Some(PreviousState {
            progress: Some(1),
            answered: vec![false, true, false],
            answers: vec![vec![false], vec![true, true], vec![false]],
        });
        let p = Presentation::new(&deck, L10n::default(), SessionOptions::default());
        let mut nav = NavigationLine::new(&p, Capabilities::default());
        assert!(nav.progress().segments()[1].answered());

        nav.slide_changed(&p, None);
        assert!(!nav.progress().segments()[1].answered());

        for i in 0..p.slide_count() {
            nav.mark_answered(&p, i);
        }
        assert!(nav.progress().segments()[1].answered());
        assert!(!nav.progress().segments()[2].answered());
    }
}
