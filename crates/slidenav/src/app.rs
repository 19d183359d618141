use eframe::egui;
use notify_debouncer_mini::notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use crate::cli::SessionArgs;
use crate::commands;
use crate::config::Config;
use crate::deck::Deck;
use crate::footer::Control;
use crate::navigation::NavigationLine;
use crate::presentation::{HostRequest, Presentation};
use crate::render::{self, Interaction};
use crate::session::{Host, Session};
use crate::state;
use crate::theme::Theme;
use crate::view;
use crate::xapi::StatementLog;

const FOOTER_HEIGHT: f32 = 56.0;
const PROGRESS_HEIGHT: f32 = 14.0;
const KEYWORD_PANEL_WIDTH: f32 = 360.0;
const RELOAD_DEBOUNCE: Duration = Duration::from_millis(250);

pub struct Options {
    pub file: PathBuf,
    pub windowed: bool,
    pub fresh: bool,
    pub statements: Option<PathBuf>,
    pub session: SessionArgs,
}

struct Toast {
    message: String,
    start: Instant,
}

impl Toast {
    fn new(message: String) -> Self {
        Self {
            message,
            start: Instant::now(),
        }
    }

    fn opacity(&self) -> f32 {
        let elapsed = self.start.elapsed().as_secs_f32();
        let duration = 2.5;
        let fade_start = 2.0;
        if elapsed < fade_start {
            1.0
        } else if elapsed < duration {
            1.0 - (elapsed - fade_start) / (duration - fade_start)
        } else {
            0.0
        }
    }

    fn is_expired(&self) -> bool {
        self.start.elapsed().as_secs_f32() >= 2.5
    }
}

/// Watches the deck's directory; editors often replace the file instead of writing in place.
struct DeckWatcher {
    _debouncer: Debouncer<RecommendedWatcher>,
    events: Receiver<DebounceEventResult>,
    file_name: std::ffi::OsString,
}

impl DeckWatcher {
    fn new(file: &Path, ctx: egui::Context) -> anyhow::Result<Self> {
        let target = file.canonicalize()?;
        let dir = target
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Deck has no parent directory"))?;
        let file_name = target
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("Deck path has no file name"))?
            .to_os_string();

        let (tx, rx) = mpsc::channel();
        let mut debouncer = new_debouncer(RELOAD_DEBOUNCE, move |result: DebounceEventResult| {
            if tx.send(result).is_ok() {
                ctx.request_repaint();
            }
        })?;
        debouncer
            .watcher()
            .watch(dir, RecursiveMode::NonRecursive)?;

        Ok(Self {
            _debouncer: debouncer,
            events: rx,
            file_name,
        })
    }

    /// Whether the deck changed since the last poll.
    fn changed(&self) -> bool {
        let mut changed = false;
        while let Ok(result) = self.events.try_recv() {
            match result {
                Ok(events) => {
                    changed |= events
                        .iter()
                        .any(|e| e.path.file_name() == Some(self.file_name.as_os_str()));
                }
                Err(e) => tracing::warn!("file watcher error: {e:?}"),
            }
        }
        changed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyCommand {
    Quit,
    ToggleFullscreen,
    ToggleTheme,
    ToggleKeywords,
    ToggleSolutionMode,
    Next,
    Previous,
    First,
    Last,
}

/// Global shortcuts for this frame. A mode key wins over navigation keys.
///
/// With a widget `focused`, Space belongs to that widget and does not advance the slide.
fn key_commands(i: &egui::InputState, focused: bool) -> Vec<KeyCommand> {
    let modes = [
        (egui::Key::Q, KeyCommand::Quit),
        (egui::Key::F, KeyCommand::ToggleFullscreen),
        (egui::Key::D, KeyCommand::ToggleTheme),
        (egui::Key::K, KeyCommand::ToggleKeywords),
        (egui::Key::S, KeyCommand::ToggleSolutionMode),
    ];
    if let Some((_, command)) = modes.iter().find(|(key, _)| i.key_pressed(*key)) {
        return vec![*command];
    }

    let mut out = Vec::new();
    if i.key_pressed(egui::Key::ArrowRight)
        || i.key_pressed(egui::Key::N)
        || (!focused && i.key_pressed(egui::Key::Space))
    {
        out.push(KeyCommand::Next);
    }
    if i.key_pressed(egui::Key::ArrowLeft) || i.key_pressed(egui::Key::P) {
        out.push(KeyCommand::Previous);
    }
    if i.key_pressed(egui::Key::Home) {
        out.push(KeyCommand::First);
    }
    if i.key_pressed(egui::Key::End) {
        out.push(KeyCommand::Last);
    }
    out
}

struct PlayerApp {
    file: PathBuf,
    config: Config,
    args: SessionArgs,
    presentation: Presentation,
    nav: NavigationLine,
    theme: Theme,
    hovered: Option<usize>,
    statements: Option<StatementLog<std::fs::File>>,
    watcher: Option<DeckWatcher>,
    toast: Option<Toast>,
    state_dirty: bool,
}

impl PlayerApp {
    fn new(
        file: PathBuf,
        config: Config,
        args: SessionArgs,
        presentation: Presentation,
        nav: NavigationLine,
        statements: Option<StatementLog<std::fs::File>>,
        watcher: Option<DeckWatcher>,
    ) -> Self {
        let theme = Theme::from_name(config.theme());
        Self {
            file,
            config,
            args,
            presentation,
            nav,
            theme,
            hovered: None,
            statements,
            watcher,
            toast: None,
            state_dirty: false,
        }
    }

    fn compute_scale(rect: egui::Rect) -> f32 {
        let ref_w = 1920.0;
        let ref_h = 1080.0;
        (rect.width() / ref_w).min(rect.height() / ref_h)
    }

    fn toggle_solution_mode(&mut self) {
        if self.presentation.solution_mode() {
            self.presentation.leave_solution_mode();
        } else {
            self.presentation.enter_solution_mode();
        }
    }

    /// Record an answer and publish what the task emits, after answer tracking rewrote it.
    fn answer(&mut self, slide: usize, element: usize) {
        let published = self.presentation.answer(slide, element);
        self.state_dirty = true;
        let statements = self
            .nav
            .task_answered(&self.presentation, slide, published);
        for statement in statements {
            if let Some(log) = &mut self.statements {
                if let Err(e) = log.write(&statement) {
                    tracing::warn!("failed to log statement: {e:#}");
                    self.toast = Some(Toast::new(format!("Statement log failed: {e}")));
                }
            }
        }
    }

    fn apply(&mut self, interactions: Vec<Interaction>) {
        for interaction in interactions {
            match interaction {
                Interaction::JumpToSlide(index) => {
                    self.nav.segment_clicked(index, &mut self.presentation);
                }
                Interaction::Activate(control) => {
                    self.nav.activate(control, &mut self.presentation);
                }
                Interaction::PrintCurrentSlide => {
                    self.nav.print_current_slide(&mut self.presentation);
                }
                Interaction::Hover {
                    segment,
                    span,
                    popup_width,
                    container_width,
                } => {
                    self.nav
                        .show_tooltip(segment, span, popup_width, container_width);
                    self.hovered = Some(segment);
                }
                Interaction::Unhover(segment) => {
                    self.nav.hide_tooltip(segment);
                    if self.hovered == Some(segment) {
                        self.hovered = None;
                    }
                }
            }
        }
    }

    fn handle_requests(&mut self, ctx: &egui::Context) {
        for request in self.presentation.drain_requests() {
            match request {
                HostRequest::ToggleFullscreen => {
                    let fullscreen = ctx.input(|i| i.viewport().fullscreen.unwrap_or(false));
                    ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(!fullscreen));
                }
                HostRequest::Print { all_slides } => {
                    let message = match self.print(all_slides) {
                        Ok(path) => format!("Handout written to {}", path.display()),
                        Err(e) => {
                            tracing::warn!("print failed: {e:#}");
                            format!("Print failed: {e}")
                        }
                    };
                    self.toast = Some(Toast::new(message));
                }
            }
        }
    }

    fn print(&self, all_slides: bool) -> anyhow::Result<PathBuf> {
        let stem = self
            .file
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let path = self.file.with_file_name(format!("{stem}-handout.txt"));
        std::fs::write(&path, self.presentation.handout(all_slides))?;
        tracing::info!(path = %path.display(), all_slides, "wrote handout");
        Ok(path)
    }

    fn reload(&mut self) -> anyhow::Result<()> {
        let before = self.presentation.current_index();
        let mut deck = Deck::load(&self.file)?;

        let mut snapshot = self.presentation.snapshot();
        snapshot.progress = snapshot
            .progress
            .map(|p| p.min(deck.slides.len().saturating_sub(1)));
        deck.previous_state = Some(snapshot);

        let args = SessionArgs {
            solution: self.presentation.solution_mode(),
            ..self.args.clone()
        };
        self.presentation = commands::build_presentation(deck, &self.config, &args);
        self.hovered = None;

        self.nav.rebuild(&self.presentation);
        self.nav.slide_changed(&self.presentation, Some(before));
        for i in 0..self.presentation.slide_count() {
            self.nav.mark_answered(&self.presentation, i);
        }
        tracing::info!(slides = self.presentation.slide_count(), "deck reloaded");
        Ok(())
    }

    fn persist(&mut self) {
        if !self.state_dirty || self.presentation.flags().editor {
            return;
        }
        self.state_dirty = false;
        if let Err(e) = state::save(&self.file, &self.presentation.snapshot()) {
            tracing::warn!("failed to save resume state: {e:#}");
        }
    }

    fn draw_slide(&self, ui: &egui::Ui, rect: egui::Rect, scale: f32) -> Vec<(usize, usize)> {
        let mut clicked = Vec::new();
        let index = self.presentation.current_index();
        let Some(slide) = self.presentation.slide(index) else {
            return clicked;
        };
        let painter = ui.painter();
        let margin = 96.0 * scale;
        let width = rect.width() - margin * 2.0;
        let mut y = rect.top() + margin;

        let heading = painter.layout(
            self.presentation.slide_heading(index),
            egui::FontId::proportional(self.theme.heading_size * scale),
            self.theme.heading_color,
            width,
        );
        let heading_height = heading.rect.height();
        painter.galley(
            egui::pos2(rect.left() + margin, y),
            heading,
            self.theme.heading_color,
        );
        y += heading_height + 48.0 * scale;

        let body_font = egui::FontId::proportional(self.theme.body_size * scale);

        if slide.summary {
            let (answered, total) = self.presentation.score();
            let mut lines = vec![format!("{answered} / {total}")];
            if !self.presentation.solution_mode() {
                lines.push("Press S to review the solutions".to_string());
            }
            for line in lines {
                let galley =
                    painter.layout(line, body_font.clone(), self.theme.foreground, width);
                let height = galley.rect.height();
                painter.galley(
                    egui::pos2(rect.left() + margin, y),
                    galley,
                    self.theme.foreground,
                );
                y += height + 24.0 * scale;
            }
            return clicked;
        }

        let marker_size = self.theme.body_size * 0.5 * scale;
        for (j, element) in slide.elements.iter().enumerate() {
            let is_task = element.spec.is_task();
            let indent = if is_task { marker_size * 2.0 } else { 0.0 };
            let galley = painter.layout(
                element.spec.title.clone(),
                body_font.clone(),
                self.theme.foreground,
                width - indent,
            );
            let row = egui::Rect::from_min_size(
                egui::pos2(rect.left() + margin, y),
                egui::vec2(width, galley.rect.height()),
            );

            if is_task {
                let response = ui.interact(
                    row,
                    ui.id().with(("slidenav-element", index, j)),
                    egui::Sense::click(),
                );
                if response.hovered() {
                    painter.rect_filled(
                        row.expand(6.0 * scale),
                        4.0 * scale,
                        Theme::with_opacity(self.theme.accent, 0.08),
                    );
                }
                let center = egui::pos2(row.left() + marker_size * 0.5, row.center().y);
                if element.answered {
                    painter.circle_filled(center, marker_size * 0.5, self.theme.answered);
                } else {
                    painter.circle_stroke(
                        center,
                        marker_size * 0.5,
                        egui::Stroke::new(2.0 * scale, self.theme.task),
                    );
                }
                if response.clicked() {
                    clicked.push((index, j));
                }
            }

            let height = galley.rect.height();
            painter.galley(
                egui::pos2(row.left() + indent, y),
                galley,
                self.theme.foreground,
            );
            y += height + 24.0 * scale;
        }
        clicked
    }

    fn draw_keyword_list(&self, ui: &egui::Ui, rect: egui::Rect, scale: f32) -> Vec<Interaction> {
        let mut out = Vec::new();
        let painter = ui.painter();
        painter.rect_filled(rect, 0.0, self.theme.footer_background);

        let font = egui::FontId::proportional(self.theme.chrome_size * scale);
        let padding = 16.0 * scale;
        let mut y = rect.top() + padding;
        let current = self.presentation.current_index();
        for i in 0..self.presentation.slide_count() {
            let Some(keyword) = self.presentation.slide_keyword(i) else {
                continue;
            };
            let color = if i == current {
                self.theme.accent
            } else {
                self.theme.foreground
            };
            let galley =
                painter.layout(keyword.to_string(), font.clone(), color, rect.width() - padding * 2.0);
            let row = egui::Rect::from_min_size(
                egui::pos2(rect.left() + padding, y),
                egui::vec2(rect.width() - padding * 2.0, galley.rect.height()),
            );
            let response = ui.interact(
                row,
                ui.id().with(("slidenav-keyword", i)),
                egui::Sense::click(),
            );
            if response.clicked() {
                out.push(Interaction::JumpToSlide(i));
            }
            y += galley.rect.height() + 10.0 * scale;
            painter.galley(row.min, galley, color);
        }
        out
    }

    fn draw_toast(&self, ui: &egui::Ui, rect: egui::Rect, scale: f32) -> bool {
        let Some(ref toast) = self.toast else {
            return false;
        };
        let opacity = toast.opacity();
        if opacity <= 0.0 {
            return false;
        }
        let color = Theme::with_opacity(self.theme.popup_foreground, opacity);
        let background = Theme::with_opacity(self.theme.popup_background, opacity * 0.9);
        let galley = ui.painter().layout_no_wrap(
            toast.message.clone(),
            egui::FontId::proportional(20.0 * scale),
            color,
        );
        let padding = 16.0 * scale;
        let toast_rect = egui::Rect::from_min_size(
            egui::pos2(
                rect.center().x - galley.rect.width() / 2.0 - padding,
                rect.top() + 40.0 * scale,
            ),
            egui::vec2(
                galley.rect.width() + padding * 2.0,
                galley.rect.height() + padding * 2.0,
            ),
        );
        ui.painter().rect_filled(toast_rect, 8.0 * scale, background);
        ui.painter().galley(
            egui::pos2(toast_rect.left() + padding, toast_rect.top() + padding),
            galley,
            color,
        );
        true
    }
}

impl eframe::App for PlayerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.watcher.as_ref().is_some_and(DeckWatcher::changed) {
            if let Err(e) = self.reload() {
                tracing::warn!("reload failed: {e:#}");
                self.toast = Some(Toast::new(format!("Reload failed: {e}")));
            }
        }

        let before = self.presentation.current_index();
        let was_solution = self.presentation.solution_mode();
        let focused = ctx.memory(|m| m.focused().is_some());

        // Collect commands inside the input closure and apply them after it
        // (sending viewport commands inside ctx.input() causes RwLock deadlock)
        let commands = ctx.input(|i| key_commands(i, focused));
        for command in commands {
            match command {
                KeyCommand::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
                KeyCommand::ToggleFullscreen => {
                    let fullscreen = ctx.input(|i| i.viewport().fullscreen.unwrap_or(false));
                    ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(!fullscreen));
                }
                KeyCommand::ToggleTheme => self.theme = self.theme.toggled(),
                KeyCommand::ToggleKeywords => {
                    self.nav
                        .activate(Control::ToggleKeywords, &mut self.presentation);
                }
                KeyCommand::ToggleSolutionMode => self.toggle_solution_mode(),
                KeyCommand::Next => self.presentation.next_slide(),
                KeyCommand::Previous => self.presentation.previous_slide(),
                KeyCommand::First => self.presentation.jump_to_slide(0),
                KeyCommand::Last => {
                    let last = self.presentation.slide_count().saturating_sub(1);
                    self.presentation.jump_to_slide(last);
                }
            }
        }

        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }

        let bg = self.theme.background;
        let mut interactions = Vec::new();
        let mut answers = Vec::new();
        let mut animating = false;

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                ui.painter().rect_filled(rect, 0.0, bg);
                let scale = Self::compute_scale(rect);

                let footer_rect = egui::Rect::from_min_max(
                    egui::pos2(rect.left(), rect.bottom() - FOOTER_HEIGHT * scale),
                    rect.max,
                );
                let bar_rect = egui::Rect::from_min_max(
                    egui::pos2(rect.left(), footer_rect.top() - PROGRESS_HEIGHT * scale),
                    egui::pos2(rect.right(), footer_rect.top()),
                );
                let mut content = egui::Rect::from_min_max(
                    rect.min,
                    egui::pos2(rect.right(), bar_rect.top()),
                );

                if self.presentation.keywords_visible() {
                    let panel = egui::Rect::from_min_size(
                        content.min,
                        egui::vec2(KEYWORD_PANEL_WIDTH * scale, content.height()),
                    );
                    interactions.extend(self.draw_keyword_list(ui, panel, scale));
                    content.min.x = panel.right();
                }

                answers.extend(self.draw_slide(ui, content, scale));

                let tree = view::navigation_view(&self.nav);
                if let Some(bar) = tree.find("progressbar") {
                    interactions.extend(render::render_progress_bar(
                        ui,
                        bar,
                        &self.theme,
                        bar_rect,
                        scale,
                        self.hovered,
                    ));
                }
                if let Some(footer) = tree.find("footer") {
                    interactions.extend(render::render_footer(
                        ui,
                        footer,
                        &self.theme,
                        footer_rect,
                        scale,
                    ));
                }

                animating = self.draw_toast(ui, rect, scale);
            });

        self.apply(interactions);
        for (slide, element) in answers {
            self.answer(slide, element);
        }
        self.handle_requests(ctx);

        if self.presentation.current_index() != before
            || self.presentation.solution_mode() != was_solution
        {
            self.nav.slide_changed(&self.presentation, Some(before));
            self.state_dirty = true;
            ctx.request_repaint();
        }
        self.persist();

        if animating {
            ctx.request_repaint();
        }
    }
}

pub fn run(options: Options) -> anyhow::Result<()> {
    let Options {
        file,
        windowed,
        fresh,
        statements,
        session,
    } = options;

    let config = Config::load_or_default();
    let mut deck = Deck::load(&file)?;
    if !fresh {
        match state::load(&file) {
            Ok(Some(saved)) => {
                if let Some(saved) = state::fit(saved, deck.slides.len()) {
                    deck.previous_state = Some(saved);
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("ignoring resume state: {e:#}"),
        }
    }

    let (presentation, nav) = commands::open_presentation(deck, &config, &session);
    let statements = statements
        .map(|path| StatementLog::append_to(&path))
        .transpose()?;

    let title = format!("slidenav: {}", presentation.title());
    tracing::info!(
        slides = presentation.slide_count(),
        file = %file.display(),
        "starting player"
    );

    let viewport = if windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            let watcher = match DeckWatcher::new(&file, cc.egui_ctx.clone()) {
                Ok(watcher) => Some(watcher),
                Err(e) => {
                    tracing::warn!("live reload disabled: {e:#}");
                    None
                }
            };
            Ok(Box::new(PlayerApp::new(
                file,
                config,
                session,
                presentation,
                nav,
                statements,
                watcher,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
