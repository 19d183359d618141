//! Deck files: the YAML description of a presentation.
//!
//! ```yaml
//! title: Cells
//! keyword_list: { enabled: true, always_show: false }
//! print: true
//! slides:
//!   - keywords: [Introduction]
//!     elements:
//!       - title: Welcome text
//!   - keywords: ["<p>The <em>nucleus</em></p>"]
//!     elements:
//!       - title: Where is the DNA?
//!         kind: task
//! ```

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::l10n::L10nOverrides;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default)]
    pub slides: Vec<SlideSpec>,

    #[serde(default)]
    pub keyword_list: KeywordListSettings,

    /// Append a summary slide when the deck has tasks.
    #[serde(default = "default_true")]
    pub summary: bool,

    /// Offer a print button.
    #[serde(default)]
    pub print: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l10n: Option<L10nOverrides>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_state: Option<PreviousState>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlideSpec {
    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub elements: Vec<ElementSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSpec {
    pub title: String,

    #[serde(default)]
    pub kind: ElementKind,

    /// Whether the task has a recorded solution. Defaults to true for tasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<bool>,

    /// Whether the element publishes interaction statements. Defaults to true for tasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<bool>,

    /// Whether the element can report if it was answered. Defaults to true for tasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_query: Option<bool>,

    /// Pre-answered, e.g. when authoring a worked example.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub answered: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    #[default]
    Text,
    Task,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordListSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub always_show: bool,
}

impl Default for KeywordListSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            always_show: false,
        }
    }
}

/// Where a learner left off.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviousState {
    /// 0-based slide index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<usize>,

    /// Per-slide answered flags.
    #[serde(default)]
    pub answered: Vec<bool>,

    /// Per-slide, per-element answers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub answers: Vec<Vec<bool>>,
}

fn default_true() -> bool {
    true
}

impl ElementSpec {
    pub fn is_task(&self) -> bool {
        self.kind == ElementKind::Task
    }

    pub fn has_solution(&self) -> bool {
        self.solution.unwrap_or(self.is_task())
    }

    pub fn emits_events(&self) -> bool {
        self.events.unwrap_or(self.is_task())
    }

    pub fn has_answer_query(&self) -> bool {
        self.answer_query.unwrap_or(self.is_task())
    }
}

impl Deck {
    pub fn parse(content: &str) -> Result<Self> {
        let deck: Deck = serde_yaml::from_str(content).context("Invalid deck file")?;
        deck.validate()?;
        Ok(deck)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("In {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.slides.is_empty() {
            anyhow::bail!("The deck has no slides. Add at least one entry under `slides:`.");
        }
        if let Some(progress) = self.previous_state.as_ref().and_then(|s| s.progress) {
            if progress >= self.slides.len() {
                anyhow::bail!(
                    "previous_state.progress is {progress} but the deck only has {} slides",
                    self.slides.len()
                );
            }
        }
        for (i, slide) in self.slides.iter().enumerate() {
            if let Some(element) = slide.elements.iter().find(|e| e.title.trim().is_empty()) {
                anyhow::bail!(
                    "Slide {} has an element without a title ({:?})",
                    i + 1,
                    element.kind
                );
            }
        }
        Ok(())
    }

    pub fn has_tasks(&self) -> bool {
        self.slides
            .iter()
            .flat_map(|s| &s.elements)
            .any(ElementSpec::has_solution)
    }

    pub fn has_keywords(&self) -> bool {
        self.slides.iter().any(|s| !s.keywords.is_empty())
    }
}

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Keywords may carry inline HTML; reduce them to display text.
pub fn plain_text(markup: &str) -> String {
    let stripped = TAG.replace_all(markup, "");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    SPACE.replace_all(decoded.trim(), " ").into_owned()
}
