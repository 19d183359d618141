//! In-memory session used by the unit tests.

use std::hash::Hash;

use eframe::egui;

use crate::l10n::L10n;
use crate::session::{ElementRef, Gradable, Host, Session, SessionFlags};

impl Gradable for Option<bool> {
    fn answer_given(&self) -> Option<bool> {
        *self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Jump(usize),
    Previous,
    Next,
    ToggleKeywords,
    ToggleFullscreen,
    Print(bool),
}

#[derive(Debug, Clone, Default)]
pub struct FakeSession {
    pub keywords: Vec<Option<String>>,
    pub plain_elements: Vec<usize>,
    pub tasks: Vec<Vec<Option<bool>>>,
    pub current: usize,
    pub l10n: L10n,
    pub flags: SessionFlags,
    pub displayed: Option<String>,
    pub previous: Option<Vec<bool>>,
    pub sources: Vec<ElementRef>,
    pub commands: Vec<Command>,
}

impl FakeSession {
    pub fn new(slides: usize) -> Self {
        Self {
            keywords: vec![None; slides],
            plain_elements: vec![0; slides],
            tasks: vec![Vec::new(); slides],
            ..Default::default()
        }
    }

    pub fn add_task(&mut self, slide: usize, answered: Option<bool>) {
        self.tasks[slide].push(answered);
    }

    pub fn add_plain_element(&mut self, slide: usize) {
        self.plain_elements[slide] += 1;
    }

    pub fn answer(&mut self, slide: usize, task: usize) {
        self.tasks[slide][task] = Some(true);
    }
}

impl Session for FakeSession {
    fn slide_count(&self) -> usize {
        self.keywords.len()
    }

    fn slide_keyword(&self, index: usize) -> Option<&str> {
        self.keywords.get(index)?.as_deref()
    }

    fn slide_has_elements(&self, index: usize) -> bool {
        self.plain_elements.get(index).is_some_and(|n| *n > 0)
            || self.tasks.get(index).is_some_and(|t| !t.is_empty())
    }

    fn solvable_tasks(&self, index: usize) -> Vec<&dyn Gradable> {
        self.tasks
            .get(index)
            .map(|tasks| tasks.iter().map(|t| t as &dyn Gradable).collect())
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
        self.displayed.as_deref()
    }

    fn previous_answers(&self) -> Option<&[bool]> {
        self.previous.as_deref()
    }

    fn event_sources(&self) -> Vec<ElementRef> {
        self.sources.clone()
    }
}

impl Host for FakeSession {
    fn jump_to_slide(&mut self, index: usize) {
        self.commands.push(Command::Jump(index));
    }

    fn previous_slide(&mut self) {
        self.commands.push(Command::Previous);
    }

    fn next_slide(&mut self) {
        self.commands.push(Command::Next);
    }

    fn toggle_keywords(&mut self) {
        self.commands.push(Command::ToggleKeywords);
    }

    fn toggle_fullscreen(&mut self) {
        self.commands.push(Command::ToggleFullscreen);
    }

    fn print(&mut self, all_slides: bool) {
        self.commands.push(Command::Print(all_slides));
    }
}

pub fn screen() -> egui::Rect {
    egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(1280.0, 720.0))
}

pub fn key_press(key: egui::Key) -> egui::Event {
    egui::Event::Key {
        key,
        physical_key: None,
        pressed: true,
        repeat: false,
        modifiers: egui::Modifiers::NONE,
    }
}

pub fn frame_input(events: Vec<egui::Event>, modifiers: egui::Modifiers) -> egui::RawInput {
    egui::RawInput {
        screen_rect: Some(screen()),
        events,
        modifiers,
        ..Default::default()
    }
}

/// Focus the widget `focus` (an id salt under the panel's ui) in one frame, press `key` in
/// the next, and return what `draw` produced in the second frame.
pub fn press_on_focused<T>(
    focus: impl Hash,
    key: egui::Key,
    modifiers: egui::Modifiers,
    mut draw: impl FnMut(&egui::Ui) -> T,
) -> Option<T> {
    let ctx = egui::Context::default();
    let mut last = None;
    for pressing in [false, true] {
        let input = if pressing {
            frame_input(vec![key_press(key)], modifiers)
        } else {
            frame_input(Vec::new(), egui::Modifiers::NONE)
        };
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                if !pressing {
                    let id = ui.id().with(&focus);
                    ui.memory_mut(|m| m.request_focus(id));
                }
                let out = draw(ui);
                if pressing {
                    last = Some(out);
                }
            });
        });
    }
    last
}
