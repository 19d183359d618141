//! Declarative description of the navigation chrome.
//!
//! The functions here only describe what to show; [`crate::render`] attaches the description
//! to an egui frame, and `slidenav inspect` prints it as JSON.

use serde::Serialize;

use crate::footer::{Control, Footer, FooterButton, Region};
use crate::navigation::NavigationLine;
use crate::progress::{ProgressBar, Segment};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewNode {
    pub class: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Horizontal offset in container coordinates, for absolutely placed nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub focusable: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ViewNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "kebab-case")]
pub enum Action {
    JumpToSlide(usize),
    Control(Control),
}

impl ViewNode {
    pub fn new(class: &'static str) -> Self {
        Self {
            class: vec![class],
            role: None,
            title: None,
            text: None,
            left: None,
            focusable: false,
            hidden: false,
            action: None,
            hover: None,
            children: Vec::new(),
        }
    }

    pub fn with_class_if(mut self, class: &'static str, on: bool) -> Self {
        if on {
            self.class.push(class);
        }
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Accessible button: focusable, activated by click or Space/Enter.
    pub fn button(mut self, action: Action) -> Self {
        self.role = Some("button");
        self.focusable = true;
        self.action = Some(action);
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn child(mut self, child: ViewNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class.iter().any(|c| *c == class)
    }

    /// Depth-first search for the first node carrying `class`.
    pub fn find(&self, class: &str) -> Option<&ViewNode> {
        if self.has_class(class) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(class))
    }

    pub fn find_all<'a>(&'a self, class: &str, out: &mut Vec<&'a ViewNode>) {
        if self.has_class(class) {
            out.push(self);
        }
        for c in &self.children {
            c.find_all(class, out);
        }
    }
}

pub fn segment_view(segment: &Segment, hover: bool) -> ViewNode {
    let mut node = ViewNode::new("progressbar-part")
        .with_class_if("show", segment.shown)
        .with_class_if("selected", segment.selected)
        .with_class_if("summary-slide", segment.summary)
        .with_title(segment.title.clone())
        .with_action(Action::JumpToSlide(segment.index));
    node.hover = hover.then_some(segment.index);
    if let Some(task) = segment.task {
        node = node.child(ViewNode::new("has-task").with_class_if("answered", task.answered));
    }
    node
}

pub fn progress_bar_view(bar: &ProgressBar) -> ViewNode {
    let mut root = ViewNode::new("progressbar");
    root.children = bar
        .segments()
        .iter()
        .map(|s| segment_view(s, bar.hover_enabled()))
        .collect();
    if let Some(popup) = bar.popup() {
        if let Some(part) = root.children.get_mut(popup.segment) {
            let mut node = ViewNode::new("progressbar-popup").with_text(popup.text.clone());
            node.left = Some(popup.left);
            part.children.push(node);
        }
    }
    root
}

fn button_view(button: &FooterButton, class: &'static str) -> ViewNode {
    ViewNode::new("footer-button")
        .with_class_if(class, true)
        .with_title(button.title.clone())
        .button(Action::Control(button.control))
        .hidden(button.hidden)
}

pub fn footer_view(footer: &Footer) -> ViewNode {
    let mut left = ViewNode::new("footer-left");
    let mut center = ViewNode::new("footer-center");
    let mut right = ViewNode::new("footer-right");

    if let Some(button) = footer.button(Control::ToggleKeywords) {
        left = left.child(button_view(button, "toggle-keywords").with_text(footer.keyword()));
    }

    if let Some(button) = footer.button(Control::PreviousSlide) {
        center = center.child(button_view(button, "previous-slide"));
    }
    center = center
        .child(
            ViewNode::new("slide-count-current")
                .with_text(footer.current().to_string())
                .with_title(footer.current_title()),
        )
        .child(ViewNode::new("slide-count-delimiter").with_text("/"))
        .child(
            ViewNode::new("slide-count-max")
                .with_text(footer.total().to_string())
                .with_title(footer.last_title()),
        );
    if let Some(button) = footer.button(Control::NextSlide) {
        center = center.child(button_view(button, "next-slide"));
    }

    for button in footer.buttons_in(Region::Right) {
        let node = match button.control {
            Control::ExitSolutionMode => button_view(button, "exit-solution-mode").child(
                ViewNode::new("exit-solution-mode-text").with_text(footer.exit_solution_text()),
            ),
            Control::Print => button_view(button, "print"),
            Control::ToggleFullscreen => button_view(button, "toggle-full-screen"),
            _ => continue,
        };
        right = right.child(node);
    }

    ViewNode::new("footer")
        .with_class_if("summary-slide", footer.summary())
        .child(left)
        .child(right)
        .child(center)
}

pub fn navigation_view(nav: &NavigationLine) -> ViewNode {
    ViewNode::new("navigation-line")
        .child(progress_bar_view(nav.progress()))
        .child(footer_view(nav.footer()))
}
