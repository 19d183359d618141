//! Attach a [`ViewNode`] description of the navigation chrome to an egui frame.
//!
//! Rendering never mutates navigation state. Pointer and keyboard input is reported back as
//! [`Interaction`]s for the host to apply.

use eframe::egui;

use crate::footer::Control;
use crate::popup::SegmentSpan;
use crate::theme::Theme;
use crate::view::{Action, ViewNode};

#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    JumpToSlide(usize),
    Activate(Control),
    /// Shift-activated print button: only the current slide.
    PrintCurrentSlide,
    Hover {
        segment: usize,
        span: SegmentSpan,
        popup_width: f32,
        container_width: f32,
    },
    Unhover(usize),
}

/// Keys that activate a focused control in addition to a pointer click.
pub fn is_activation_key(key: egui::Key) -> bool {
    matches!(key, egui::Key::Space | egui::Key::Enter)
}

fn activated(ui: &egui::Ui, response: &egui::Response) -> bool {
    response.clicked()
        || (response.has_focus()
            && ui.input(|i| {
                i.events.iter().any(|e| {
                    matches!(e, egui::Event::Key { key, pressed: true, .. } if is_activation_key(*key))
                })
            }))
}

fn popup_font(theme: &Theme, scale: f32) -> egui::FontId {
    egui::FontId::proportional(theme.chrome_size * 0.8 * scale)
}

/// Draw the progress bar into `rect`, one equal-width segment per child of `view`.
pub fn render_progress_bar(
    ui: &egui::Ui,
    view: &ViewNode,
    theme: &Theme,
    rect: egui::Rect,
    scale: f32,
    hovered_last_frame: Option<usize>,
) -> Vec<Interaction> {
    let mut out = Vec::new();
    let count = view.children.len();
    if count == 0 {
        return out;
    }

    let painter = ui.painter();
    painter.rect_filled(rect, 0.0, theme.track);

    let width = rect.width() / count as f32;
    let mut hovered_now = None;
    let mut popup = None;

    for (i, part) in view.children.iter().enumerate() {
        let part_rect = egui::Rect::from_min_size(
            egui::pos2(rect.left() + i as f32 * width, rect.top()),
            egui::vec2(width, rect.height()),
        );

        let fill = if part.has_class("selected") {
            Some(theme.accent)
        } else if part.has_class("show") {
            Some(Theme::with_opacity(theme.accent, 0.6))
        } else if part.has_class("summary-slide") {
            Some(Theme::with_opacity(theme.summary, 0.35))
        } else {
            None
        };
        if let Some(fill) = fill {
            painter.rect_filled(part_rect, 0.0, fill);
        }
        if i > 0 {
            painter.line_segment(
                [part_rect.left_top(), part_rect.left_bottom()],
                egui::Stroke::new(1.0, theme.background),
            );
        }

        if let Some(task) = part.find("has-task") {
            let radius = (rect.height() * 0.3).min(width * 0.3);
            let center = part_rect.center();
            if task.has_class("answered") {
                painter.circle_filled(center, radius, theme.answered);
            } else {
                painter.circle_stroke(center, radius, egui::Stroke::new(1.5 * scale, theme.task));
            }
        }

        let mut response = ui.interact(
            part_rect,
            ui.id().with(("slidenav-segment", i)),
            egui::Sense::click(),
        );

        if part.hover.is_some() {
            if response.hovered() {
                hovered_now = Some(i);
                if hovered_last_frame != Some(i) {
                    let text = part.title.clone().unwrap_or_default();
                    let galley = painter.layout_no_wrap(
                        text,
                        popup_font(theme, scale),
                        theme.popup_foreground,
                    );
                    let padding = 8.0 * scale;
                    out.push(Interaction::Hover {
                        segment: i,
                        span: SegmentSpan {
                            left: part_rect.left() - rect.left(),
                            width,
                        },
                        popup_width: galley.rect.width() + padding * 2.0,
                        container_width: rect.width(),
                    });
                }
            }
        } else if let Some(title) = &part.title {
            response = response.on_hover_text(title.as_str());
        }

        if activated(ui, &response) {
            if let Some(Action::JumpToSlide(target)) = part.action {
                out.push(Interaction::JumpToSlide(target));
            }
        }

        if let Some(node) = part.find("progressbar-popup") {
            popup = Some((node.text.clone().unwrap_or_default(), node.left.unwrap_or(0.0)));
        }
    }

    if let Some(last) = hovered_last_frame {
        if hovered_now != Some(last) {
            out.push(Interaction::Unhover(last));
        }
    }

    if let Some((text, left)) = popup {
        draw_popup(ui, theme, rect, scale, &text, left);
    }

    out
}

fn draw_popup(ui: &egui::Ui, theme: &Theme, bar: egui::Rect, scale: f32, text: &str, left: f32) {
    let painter = ui.painter();
    let galley = painter.layout_no_wrap(
        text.to_string(),
        popup_font(theme, scale),
        theme.popup_foreground,
    );
    let padding = 8.0 * scale;
    let size = galley.rect.size() + egui::vec2(padding * 2.0, padding);
    let popup_rect = egui::Rect::from_min_size(
        egui::pos2(bar.left() + left, bar.top() - size.y - 4.0 * scale),
        size,
    );
    painter.rect_filled(popup_rect, 4.0 * scale, theme.popup_background);
    painter.galley(
        popup_rect.min + egui::vec2(padding, padding / 2.0),
        galley,
        theme.popup_foreground,
    );
}

fn control_label(node: &ViewNode) -> String {
    if node.has_class("previous-slide") {
        "\u{25C0}".to_string()
    } else if node.has_class("next-slide") {
        "\u{25B6}".to_string()
    } else if node.has_class("exit-solution-mode") {
        node.find("exit-solution-mode-text")
            .and_then(|t| t.text.clone())
            .filter(|t| !t.is_empty())
            .or_else(|| node.title.clone())
            .unwrap_or_default()
    } else {
        node.text
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| node.title.clone())
            .unwrap_or_default()
    }
}

fn draw_button(
    ui: &egui::Ui,
    node: &ViewNode,
    theme: &Theme,
    origin: egui::Pos2,
    height: f32,
    scale: f32,
    out: &mut Vec<Interaction>,
) -> f32 {
    let painter = ui.painter();
    let color = theme.foreground;
    let galley = painter.layout_no_wrap(
        control_label(node),
        egui::FontId::proportional(theme.chrome_size * scale),
        color,
    );
    let padding = 10.0 * scale;
    let button_rect = egui::Rect::from_min_size(
        origin,
        egui::vec2(galley.rect.width() + padding * 2.0, height),
    );

    let id_salt = node.class.get(1).copied().unwrap_or("footer-button");
    let mut response = ui.interact(
        button_rect,
        ui.id().with(("slidenav-control", id_salt)),
        egui::Sense::click(),
    );
    if response.hovered() || response.has_focus() {
        painter.rect_filled(button_rect, 4.0 * scale, Theme::with_opacity(theme.accent, 0.15));
    }
    if response.has_focus() {
        painter.rect_stroke(
            button_rect,
            4.0 * scale,
            egui::Stroke::new(1.5 * scale, theme.accent),
            egui::StrokeKind::Inside,
        );
    }
    painter.galley(
        egui::pos2(
            button_rect.left() + padding,
            button_rect.center().y - galley.rect.height() / 2.0,
        ),
        galley,
        color,
    );
    if let Some(title) = &node.title {
        response = response.on_hover_text(title.as_str());
    }
    if activated(ui, &response) {
        match node.action {
            Some(Action::Control(Control::Print)) if ui.input(|i| i.modifiers.shift) => {
                out.push(Interaction::PrintCurrentSlide);
            }
            Some(Action::Control(control)) => out.push(Interaction::Activate(control)),
            _ => {}
        }
    }
    button_rect.width()
}

fn measure_button(ui: &egui::Ui, node: &ViewNode, theme: &Theme, scale: f32) -> f32 {
    let galley = ui.painter().layout_no_wrap(
        control_label(node),
        egui::FontId::proportional(theme.chrome_size * scale),
        theme.foreground,
    );
    galley.rect.width() + 20.0 * scale
}

/// Draw the footer into `rect`: left, center and right regions.
pub fn render_footer(
    ui: &egui::Ui,
    view: &ViewNode,
    theme: &Theme,
    rect: egui::Rect,
    scale: f32,
) -> Vec<Interaction> {
    let mut out = Vec::new();
    let painter = ui.painter();
    let background = if view.has_class("summary-slide") {
        Theme::with_opacity(theme.summary, 0.2)
    } else {
        theme.footer_background
    };
    painter.rect_filled(rect, 0.0, background);

    let gap = 8.0 * scale;
    let height = rect.height();

    if let Some(left) = view.find("footer-left") {
        let mut x = rect.left() + gap;
        for node in left.children.iter().filter(|n| !n.hidden) {
            x += draw_button(ui, node, theme, egui::pos2(x, rect.top()), height, scale, &mut out)
                + gap;
        }
    }

    if let Some(right) = view.find("footer-right") {
        let mut x = rect.right() - gap;
        for node in right.children.iter().rev().filter(|n| !n.hidden) {
            x -= measure_button(ui, node, theme, scale);
            draw_button(ui, node, theme, egui::pos2(x, rect.top()), height, scale, &mut out);
            x -= gap;
        }
    }

    if let Some(center) = view.find("footer-center") {
        let counter = format!(
            "{} / {}",
            center
                .find("slide-count-current")
                .and_then(|n| n.text.as_deref())
                .unwrap_or("1"),
            center
                .find("slide-count-max")
                .and_then(|n| n.text.as_deref())
                .unwrap_or("1"),
        );
        let counter_galley = painter.layout_no_wrap(
            counter,
            egui::FontId::monospace(theme.chrome_size * scale),
            theme.foreground,
        );
        let buttons: Vec<&ViewNode> = center
            .children
            .iter()
            .filter(|n| n.focusable && !n.hidden)
            .collect();
        let buttons_width: f32 = buttons
            .iter()
            .map(|n| measure_button(ui, n, theme, scale))
            .sum();
        let total = buttons_width + counter_galley.rect.width() + gap * 2.0;
        let mut x = rect.center().x - total / 2.0;

        if let Some(prev) = buttons.iter().find(|n| n.has_class("previous-slide")) {
            x += draw_button(ui, prev, theme, egui::pos2(x, rect.top()), height, scale, &mut out)
                + gap;
        }
        let counter_width = counter_galley.rect.width();
        painter.galley(
            egui::pos2(x, rect.center().y - counter_galley.rect.height() / 2.0),
            counter_galley,
            theme.foreground,
        );
        x += counter_width + gap;
        if let Some(next) = buttons.iter().find(|n| n.has_class("next-slide")) {
            draw_button(ui, next, theme, egui::pos2(x, rect.top()), height, scale, &mut out);
        }
    }

    out
}
