use eframe::egui::Color32;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    pub foreground: Color32,
    pub heading_color: Color32,
    pub accent: Color32,
    /// Unvisited progress-bar track.
    pub track: Color32,
    pub task: Color32,
    pub answered: Color32,
    pub summary: Color32,
    pub footer_background: Color32,
    pub popup_background: Color32,
    pub popup_foreground: Color32,
    pub heading_size: f32,
    pub body_size: f32,
    pub chrome_size: f32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color32::from_rgb(0x1E, 0x1E, 0x1E),
            foreground: Color32::from_rgb(0xC8, 0xC8, 0xC8),
            heading_color: Color32::WHITE,
            accent: Color32::from_rgb(0x52, 0x94, 0xE2),
            track: Color32::from_rgb(0x3A, 0x3A, 0x3A),
            task: Color32::from_rgb(0xE8, 0xA8, 0x38),
            answered: Color32::from_rgb(0x5C, 0xDB, 0x95),
            summary: Color32::from_rgb(0xC0, 0x7E, 0xF1),
            footer_background: Color32::from_rgb(0x2D, 0x2D, 0x2D),
            popup_background: Color32::from_rgb(0xD4, 0xD4, 0xD4),
            popup_foreground: Color32::from_rgb(0x1E, 0x1E, 0x1E),
            heading_size: 72.0,
            body_size: 40.0,
            chrome_size: 18.0,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Color32::WHITE,
            foreground: Color32::from_rgb(0x1A, 0x1A, 0x2E),
            heading_color: Color32::from_rgb(0x16, 0x21, 0x3E),
            accent: Color32::from_rgb(0x0F, 0x34, 0x60),
            track: Color32::from_rgb(0xDD, 0xDD, 0xDD),
            task: Color32::from_rgb(0xB8, 0x7B, 0x0A),
            answered: Color32::from_rgb(0x1E, 0x8A, 0x5A),
            summary: Color32::from_rgb(0x7B, 0x3F, 0xA0),
            footer_background: Color32::from_rgb(0xF5, 0xF5, 0xF5),
            popup_background: Color32::from_rgb(0x33, 0x33, 0x33),
            popup_foreground: Color32::WHITE,
            heading_size: 72.0,
            body_size: 40.0,
            chrome_size: 18.0,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "dark" => Self::dark(),
            _ => Self::light(),
        }
    }

    pub fn toggled(&self) -> Self {
        if self.name == "dark" {
            Self::light()
        } else {
            Self::dark()
        }
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), (opacity * 255.0) as u8)
    }
}
