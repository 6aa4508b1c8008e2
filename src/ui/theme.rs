use crate::entry::JobStatus;
use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub error: Style,
    pub warn: Style,
    pub info: Style,
    pub dim: Style,
    pub muted: Style,
    pub pending: Style,
}

impl Theme {
    pub fn detect() -> Self {
        if !console::Term::stdout().is_term() {
            return Self::plain();
        }
        Self::colored()
    }

    pub fn colored() -> Self {
        Self {
            header: Style::new().cyan().bold(),
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warn: Style::new().yellow().bold(),
            info: Style::new().magenta(),
            dim: Style::new().white().dimmed(),
            muted: Style::new().bright_black(),
            pending: Style::new().blue(),
        }
    }

    pub fn plain() -> Self {
        Self {
            header: Style::new(),
            success: Style::new(),
            error: Style::new(),
            warn: Style::new(),
            info: Style::new(),
            dim: Style::new(),
            muted: Style::new(),
            pending: Style::new(),
        }
    }

    /// Style used to print a job status.
    pub fn job_status(&self, status: JobStatus) -> Style {
        match status {
            JobStatus::Completed => self.success.clone(),
            JobStatus::Queued | JobStatus::InProgress => self.pending.clone(),
            JobStatus::Missing => self.warn.clone(),
            JobStatus::Failed | JobStatus::FailedInvalidSourceNameExceedsMaxLimit => self.error.clone(),
            JobStatus::Any => self.muted.clone(),
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}
