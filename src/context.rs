use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Read-only presentation settings shared by every render call.
///
/// Built once in `main` and passed down by reference.
#[derive(Debug, Clone)]
pub struct ViewContext {
    pub title: String,
    pub theme: Theme,
    pub max_column_width: usize,
}

impl ViewContext {
    pub fn new(title: impl Into<String>, theme: Theme, max_column_width: usize) -> Self {
        Self {
            title: title.into(),
            theme,
            max_column_width,
        }
    }

    pub fn accent(&self) -> Style {
        match self.theme {
            Theme::Dark => Style::default().fg(Color::LightMagenta),
            Theme::Light => Style::default().fg(Color::Magenta),
        }
    }

    pub fn text(&self) -> Style {
        match self.theme {
            Theme::Dark => Style::default().fg(Color::Gray),
            Theme::Light => Style::default().fg(Color::Black),
        }
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn header(&self) -> Style {
        self.text().add_modifier(Modifier::BOLD)
    }

    pub fn cursor(&self) -> Style {
        match self.theme {
            Theme::Dark => Style::default().bg(Color::Indexed(238)).fg(Color::White),
            Theme::Light => Style::default().bg(Color::Indexed(252)).fg(Color::Black),
        }
    }

    pub fn selected(&self) -> Style {
        self.accent().add_modifier(Modifier::BOLD)
    }
}
