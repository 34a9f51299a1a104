//! CLI theme and styling.

use colored::Colorize;
use velocity_playback::{PlaybackPhase, PlaybackSnapshot};

/// CLI theme configuration.
pub(crate) struct Theme;

impl Theme {
    /// Format a header.
    pub(crate) fn header(text: &str) -> String {
        format!("{}", text.bold().cyan())
    }

    /// Format a success message.
    pub(crate) fn success(text: &str) -> String {
        format!("{} {}", "✓".green(), text)
    }

    /// Format an error message.
    pub(crate) fn error(text: &str) -> String {
        format!("{} {}", "✗".red(), text.red())
    }

    /// Format a warning message.
    pub(crate) fn warning(text: &str) -> String {
        format!("{} {}", "!".yellow(), text.yellow())
    }

    /// Format an info message.
    pub(crate) fn info(text: &str) -> String {
        format!("{} {}", "i".blue(), text)
    }

    /// Format a dimmed message.
    pub(crate) fn dimmed(text: &str) -> String {
        format!("{}", text.dimmed())
    }

    /// Format a separator line.
    pub(crate) fn separator() -> String {
        "━".repeat(50).dimmed().to_string()
    }

    /// Status glyph for the current step.
    pub(crate) fn step_marker(snapshot: &PlaybackSnapshot) -> String {
        match snapshot.phase {
            PlaybackPhase::NotStarted => "·".dimmed().to_string(),
            PlaybackPhase::Complete => "✓".green().to_string(),
            PlaybackPhase::Held => "◆".yellow().to_string(),
            PlaybackPhase::AutoAdvancePending => "→".cyan().to_string(),
            PlaybackPhase::InProgress if snapshot.is_playing => "▶".green().to_string(),
            PlaybackPhase::InProgress => "‖".yellow().to_string(),
        }
    }

    /// Progress bar coloured by completion.
    pub(crate) fn progress_bar(percent: f64, width: usize) -> String {
        let bar = progress_cells(percent, width);
        if percent >= 100.0 {
            bar.green().to_string()
        } else {
            bar.cyan().to_string()
        }
    }
}

/// Uncoloured bar of `width` cells.
pub(crate) fn progress_cells(percent: f64, width: usize) -> String {
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(width.saturating_sub(filled))
    )
}

/// `mm:ss`, or `h:mm:ss` past an hour.
pub(crate) fn format_elapsed(seconds: u64) -> String {
    let (hours, rest) = (seconds / 3_600, seconds % 3_600);
    let (minutes, secs) = (rest / 60, rest % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}
