//! Pointer geometry and display helpers

use serde::{Deserialize, Serialize};

/// A point in client coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Normalised pointer position
pub type PointerSample = Point;

/// Bounding box of an element in client coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Horizontal position of `x` inside the rect, clamped to `[0, 1]`
    pub fn fraction_at(&self, x: f64) -> f64 {
        if self.width <= 0.0 || !self.width.is_finite() {
            return 0.0;
        }
        ((x - self.left) / self.width).clamp(0.0, 1.0)
    }
}

/// Which mouse button was pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    Primary,
    Middle,
    Secondary,
    Other(i16),
}

impl MouseButton {
    /// Map a DOM `MouseEvent.button` value
    pub fn from_dom(button: i16) -> Self {
        match button {
            0 => Self::Primary,
            1 => Self::Middle,
            2 => Self::Secondary,
            other => Self::Other(other),
        }
    }
}

/// Raw pointer input from mouse or touch events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerInput {
    Mouse {
        position: Point,
        button: MouseButton,
    },
    Touch {
        /// Touches still on the surface
        touches: Vec<Point>,
        /// Touches that changed in this event (the lifted ones on touchend)
        changed_touches: Vec<Point>,
    },
}

impl PointerInput {
    pub fn mouse(x: f64, y: f64) -> Self {
        Self::Mouse {
            position: Point::new(x, y),
            button: MouseButton::Primary,
        }
    }

    pub fn touch(x: f64, y: f64) -> Self {
        Self::Touch {
            touches: vec![Point::new(x, y)],
            changed_touches: vec![Point::new(x, y)],
        }
    }

    /// Touch that has just been lifted
    pub fn touch_end(x: f64, y: f64) -> Self {
        Self::Touch {
            touches: Vec::new(),
            changed_touches: vec![Point::new(x, y)],
        }
    }

    /// Single position for this input
    ///
    /// Prefers the first active touch, then the first changed touch.
    pub fn sample(&self) -> Option<PointerSample> {
        match self {
            Self::Mouse { position, .. } => Some(*position),
            Self::Touch {
                touches,
                changed_touches,
            } => touches.first().or_else(|| changed_touches.first()).copied(),
        }
    }

    /// Touches and left clicks start gestures; other buttons do not
    pub fn is_primary(&self) -> bool {
        match self {
            Self::Mouse { button, .. } => *button == MouseButton::Primary,
            Self::Touch { .. } => true,
        }
    }
}

/// Angle in degrees of `pointer` around `pivot` (`atan2` convention, y down)
pub fn pointer_angle(pivot: Point, pointer: Point) -> f64 {
    (pointer.y - pivot.y).atan2(pointer.x - pivot.x).to_degrees()
}

/// Format seconds as `m:ss`
///
/// Negative and non-finite input renders as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let time = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let minutes = (time / 60.0).floor() as u64;
    let secs = (time % 60.0).floor() as u64;
    format!("{minutes}:{secs:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_around_pivot() {
        let pivot = Point::new(100.0, 100.0);
        assert!((pointer_angle(pivot, Point::new(200.0, 100.0)) - 0.0).abs() < 1e-9);
        assert!((pointer_angle(pivot, Point::new(100.0, 200.0)) - 90.0).abs() < 1e-9);
        assert!((pointer_angle(pivot, Point::new(0.0, 100.0)) - 180.0).abs() < 1e-9);
        assert!((pointer_angle(pivot, Point::new(100.0, 0.0)) + 90.0).abs() < 1e-9);
    }

    #[test]
    fn time_formatting() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(9.9), "0:09");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(600.0), "10:00");
        assert_eq!(format_time(-4.0), "0:00");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(f64::INFINITY), "0:00");
    }

    #[test]
    fn fraction_is_clamped() {
        let rect = Rect::new(10.0, 0.0, 200.0, 8.0);
        assert_eq!(rect.fraction_at(110.0), 0.5);
        assert_eq!(rect.fraction_at(-50.0), 0.0);
        assert_eq!(rect.fraction_at(500.0), 1.0);
        assert_eq!(Rect::new(0.0, 0.0, 0.0, 0.0).fraction_at(5.0), 0.0);
    }

    #[test]
    fn touch_prefers_active_then_changed() {
        let input = PointerInput::Touch {
            touches: vec![Point::new(1.0, 2.0)],
            changed_touches: vec![Point::new(3.0, 4.0)],
        };
        assert_eq!(input.sample(), Some(Point::new(1.0, 2.0)));

        let lifted = PointerInput::touch_end(3.0, 4.0);
        assert_eq!(lifted.sample(), Some(Point::new(3.0, 4.0)));

        let empty = PointerInput::Touch {
            touches: vec![],
            changed_touches: vec![],
        };
        assert_eq!(empty.sample(), None);
    }

    #[test]
    fn only_primary_button_starts_gestures() {
        assert!(PointerInput::mouse(0.0, 0.0).is_primary());
        assert!(PointerInput::touch(0.0, 0.0).is_primary());
        let right = PointerInput::Mouse {
            position: Point::new(0.0, 0.0),
            button: MouseButton::from_dom(2),
        };
        assert!(!right.is_primary());
    }
}
