use serde::{Deserialize, Serialize};

/// Localized strings used by the navigation chrome.
///
/// Every field has an English default so partial overrides (from the deck file or the user
/// config) can be merged on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct L10n {
    pub slide: String,
    pub summary: String,
    pub show_keywords: String,
    pub prev_slide: String,
    pub next_slide: String,
    pub current_slide: String,
    pub last_slide: String,
    pub solution_mode_title: String,
    pub solution_mode_text: String,
    pub print_title: String,
    pub fullscreen: String,
}

impl Default for L10n {
    fn default() -> Self {
        Self {
            slide: "Slide".to_string(),
            summary: "Summary".to_string(),
            show_keywords: "Show keywords".to_string(),
            prev_slide: "Previous slide".to_string(),
            next_slide: "Next slide".to_string(),
            current_slide: "Current slide".to_string(),
            last_slide: "Last slide".to_string(),
            solution_mode_title: "Return to the summary page".to_string(),
            solution_mode_text: "Solution Mode".to_string(),
            print_title: "Print".to_string(),
            fullscreen: "Fullscreen".to_string(),
        }
    }
}

/// Sparse set of overrides; only the keys present replace the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct L10nOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slide: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_keywords: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_slide: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_slide: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_slide: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_slide: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution_mode_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution_mode_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullscreen: Option<String>,
}

impl L10n {
    /// Return a copy with every present override applied.
    pub fn merged(&self, overrides: &L10nOverrides) -> Self {
        let pick = |base: &String, over: &Option<String>| over.clone().unwrap_or_else(|| base.clone());
        Self {
            slide: pick(&self.slide, &overrides.slide),
            summary: pick(&self.summary, &overrides.summary),
            show_keywords: pick(&self.show_keywords, &overrides.show_keywords),
            prev_slide: pick(&self.prev_slide, &overrides.prev_slide),
            next_slide: pick(&self.next_slide, &overrides.next_slide),
            current_slide: pick(&self.current_slide, &overrides.current_slide),
            last_slide: pick(&self.last_slide, &overrides.last_slide),
            solution_mode_title: pick(&self.solution_mode_title, &overrides.solution_mode_title),
            solution_mode_text: pick(&self.solution_mode_text, &overrides.solution_mode_text),
            print_title: pick(&self.print_title, &overrides.print_title),
            fullscreen: pick(&self.fullscreen, &overrides.fullscreen),
        }
    }

    /// Fallback tooltip text for a slide without keywords, e.g. "Slide 3".
    pub fn slide_label(&self, index: usize) -> String {
        format!("{} {}", self.slide, index + 1)
    }
}

impl L10nOverrides {
    /// Set one label by its key. Returns false for an unknown key.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        let slot = match key {
            "slide" => &mut self.slide,
            "summary" => &mut self.summary,
            "show_keywords" => &mut self.show_keywords,
            "prev_slide" => &mut self.prev_slide,
            "next_slide" => &mut self.next_slide,
            "current_slide" => &mut self.current_slide,
            "last_slide" => &mut self.last_slide,
            "solution_mode_title" => &mut self.solution_mode_title,
            "solution_mode_text" => &mut self.solution_mode_text,
            "print_title" => &mut self.print_title,
            "fullscreen" => &mut self.fullscreen,
            _ => return false,
        };
        *slot = Some(value.to_string());
        true
    }
}
