//! Display model handed to the host for painting

use crate::geometry::format_time;
use crate::state::{ControlState, StatusSnapshot};
use crate::types::Poem;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TonearmView {
    /// Rotation in degrees
    pub angle: f64,
    /// Off while dragging so the arm tracks the pointer without easing
    pub transition_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtView {
    pub src: String,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressView {
    /// Bar width, `[0, 100]`
    pub percent: f64,
    pub current_text: String,
    pub duration_text: String,
    pub aria_now: u64,
    pub aria_max: u64,
    pub aria_text: String,
}

impl Default for ProgressView {
    fn default() -> Self {
        Self {
            percent: 0.0,
            current_text: "0:00".to_string(),
            duration_text: "0:00".to_string(),
            aria_now: 0,
            aria_max: 100,
            aria_text: "0:00 of 0:00".to_string(),
        }
    }
}

impl ProgressView {
    /// Refresh texts from the transport position
    ///
    /// The bar width is left alone while `keep_bar` is set (a scrub owns it).
    pub fn refresh(&mut self, current_time: f64, duration: Option<f64>, keep_bar: bool) {
        let current_time = if current_time.is_finite() { current_time.max(0.0) } else { 0.0 };
        if !keep_bar {
            let percent = duration.map_or(0.0, |d| (current_time / d).clamp(0.0, 1.0) * 100.0);
            if (self.percent - percent).abs() > 0.1 {
                self.percent = percent;
            }
        }
        self.current_text = format_time(current_time);
        self.duration_text = duration.map_or_else(|| "0:00".to_string(), format_time);
        self.aria_now = duration.map_or(0, |_| current_time.round() as u64);
        self.aria_max = duration.map_or(100, |d| d.round() as u64);
        self.aria_text = format!("{} of {}", self.current_text, self.duration_text);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoemView {
    pub title: String,
    pub author: String,
    pub content: String,
    pub date: String,
    pub location: String,
    pub tags: Vec<String>,
    /// Divider between date and location, only when both are present
    pub show_meta_divider: bool,
}

impl From<&Poem> for PoemView {
    fn from(poem: &Poem) -> Self {
        Self {
            title: if poem.title.is_empty() {
                "Untitled".to_string()
            } else {
                poem.title.clone()
            },
            author: poem.author.clone(),
            content: poem.content.clone(),
            date: poem.date.clone(),
            location: poem.location.clone(),
            tags: poem.tags.clone(),
            show_meta_divider: !poem.date.is_empty() && !poem.location.is_empty(),
        }
    }
}

/// Everything the host paints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetView {
    pub title: String,
    pub artist: String,
    pub art: ArtView,
    pub poem: PoemView,
    pub tonearm: TonearmView,
    /// Record spin animation
    pub record_spinning: bool,
    /// Play button shows the pause icon
    pub play_button_playing: bool,
    pub progress: ProgressView,
    pub status: StatusSnapshot,
    pub controls: ControlState,
    /// Error or empty-playlist text
    pub message: Option<String>,
    /// Short-lived notice (e.g. unreadable tags)
    pub notice: Option<String>,
    pub text_selection_enabled: bool,
}

impl WidgetView {
    pub fn new(resting_angle: f64, art_src: String) -> Self {
        Self {
            title: String::new(),
            artist: String::new(),
            art: ArtView {
                src: art_src,
                alt: String::new(),
            },
            poem: PoemView::from(&Poem::default()),
            tonearm: TonearmView {
                angle: resting_angle,
                transition_enabled: true,
            },
            record_spinning: false,
            play_button_playing: false,
            progress: ProgressView::default(),
            status: StatusSnapshot::default(),
            controls: ControlState::default(),
            message: None,
            notice: None,
            text_selection_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_refresh_formats_times() {
        let mut progress = ProgressView::default();
        progress.refresh(65.4, Some(200.0), false);
        assert!((progress.percent - 32.7).abs() < 1e-9);
        assert_eq!(progress.current_text, "1:05");
        assert_eq!(progress.duration_text, "3:20");
        assert_eq!(progress.aria_now, 65);
        assert_eq!(progress.aria_max, 200);
        assert_eq!(progress.aria_text, "1:05 of 3:20");
    }

    #[test]
    fn unknown_duration_shows_zero() {
        let mut progress = ProgressView::default();
        progress.refresh(12.0, None, false);
        assert_eq!(progress.percent, 0.0);
        assert_eq!(progress.duration_text, "0:00");
        assert_eq!(progress.aria_now, 0);
        assert_eq!(progress.aria_max, 100);
    }

    #[test]
    fn scrub_keeps_bar_width() {
        let mut progress = ProgressView::default();
        progress.percent = 80.0;
        progress.refresh(10.0, Some(100.0), true);
        assert_eq!(progress.percent, 80.0);
        assert_eq!(progress.current_text, "0:10");
    }

    #[test]
    fn poem_view_defaults() {
        let view = PoemView::from(&Poem {
            date: "Spring 2023".to_string(),
            ..Poem::default()
        });
        assert_eq!(view.title, "Untitled");
        assert!(!view.show_meta_divider);
    }
}
