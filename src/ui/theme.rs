use crate::media::MediaKind;
use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Terminal styles by role
#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub error: Style,
    pub warn: Style,
    pub info: Style,
    pub accent: Style,
    pub dim: Style,
    pub muted: Style,
    visual: Style,
    audio: Style,
    text: Style,
}

impl Theme {
    pub fn detect() -> Self {
        let no_color = std::env::var("NO_COLOR").ok();
        if use_color(no_color.as_deref(), console::Term::stdout().is_term()) {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    pub fn plain() -> Self {
        Self {
            header: Style::new(),
            success: Style::new(),
            error: Style::new(),
            warn: Style::new(),
            info: Style::new(),
            accent: Style::new(),
            dim: Style::new(),
            muted: Style::new(),
            visual: Style::new(),
            audio: Style::new(),
            text: Style::new(),
        }
    }

    pub fn colored() -> Self {
        Self {
            header: Style::new().cyan().bold(),
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warn: Style::new().yellow().bold(),
            info: Style::new().magenta(),
            accent: Style::new().blue().bold(),
            dim: Style::new().white().dimmed(),
            muted: Style::new().bright_black(),
            visual: Style::new().bright_cyan(),
            audio: Style::new().bright_magenta(),
            text: Style::new().bright_green(),
        }
    }

    /// Style for a preview kind label
    pub fn kind(&self, kind: MediaKind) -> Style {
        match kind {
            MediaKind::Image | MediaKind::Video => self.visual.clone(),
            MediaKind::Audio => self.audio.clone(),
            MediaKind::Text => self.text.clone(),
            MediaKind::Other => self.muted.clone(),
        }
    }
}

/// Color only on a terminal, and not when `NO_COLOR` is non-empty
fn use_color(no_color: Option<&str>, is_term: bool) -> bool {
    is_term && no_color.is_none_or(str::is_empty)
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}
