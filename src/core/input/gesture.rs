//=========================================================================
// Gesture Recognizer
//=========================================================================
//
// Engine-side swipe detection from raw touch codes.
//
//   Press   → remember origin
//   Move    → ignored
//   Release → swipe along the dominant axis of (release - origin)
//
// The latest gesture is held until the update thread takes it.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use super::touch::{TouchCode, TouchKind};

//=== Gesture =============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    SwipeLeft,
    SwipeRight,
    SwipeUp,
    SwipeDown,
}

//=== GestureRecognizer ===================================================

#[derive(Debug, Default)]
pub struct GestureRecognizer {
    origin: Option<(f32, f32)>,
    pending: Option<Gesture>,
}

impl GestureRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one touch event. Returns false for codes outside the
    /// protocol, which are otherwise ignored.
    pub fn push(&mut self, code: TouchCode, x: f32, y: f32) -> bool {
        let Some(kind) = TouchKind::from_code(code) else {
            trace!(target: "game", "Ignoring touch code {}", code);
            return false;
        };

        match kind {
            TouchKind::Press => self.origin = Some((x, y)),
            TouchKind::Release => {
                if let Some(origin) = self.origin.take() {
                    if let Some(gesture) = Self::resolve(origin, (x, y)) {
                        trace!(target: "game", "Gesture {:?}", gesture);
                        self.pending = Some(gesture);
                    }
                }
            }
            TouchKind::Move | TouchKind::Other => {}
        }

        true
    }

    /// Takes the pending gesture, leaving none.
    pub fn take(&mut self) -> Option<Gesture> {
        self.pending.take()
    }

    /// Screen y grows downwards. Ties go to the vertical axis; a release
    /// on the press point is a tap, not a swipe.
    fn resolve(begin: (f32, f32), end: (f32, f32)) -> Option<Gesture> {
        let dx = end.0 - begin.0;
        let dy = end.1 - begin.1;

        if dx == 0.0 && dy == 0.0 {
            return None;
        }

        let gesture = if dx.abs() > dy.abs() {
            if dx > 0.0 {
                Gesture::SwipeRight
            } else {
                Gesture::SwipeLeft
            }
        } else if dy > 0.0 {
            Gesture::SwipeDown
        } else {
            Gesture::SwipeUp
        };

        Some(gesture)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::touch::{TOUCH_MOVE, TOUCH_PRESS, TOUCH_RELEASE, TOUCH_UNHANDLED};

    fn swipe(from: (f32, f32), to: (f32, f32)) -> Option<Gesture> {
        let mut recognizer = GestureRecognizer::new();
        recognizer.push(TOUCH_PRESS, from.0, from.1);
        recognizer.push(TOUCH_MOVE, (from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0);
        recognizer.push(TOUCH_RELEASE, to.0, to.1);
        recognizer.take()
    }

    #[test]
    fn dominant_axis_wins() {
        assert_eq!(swipe((100.0, 100.0), (200.0, 120.0)), Some(Gesture::SwipeRight));
        assert_eq!(swipe((100.0, 100.0), (10.0, 80.0)), Some(Gesture::SwipeLeft));
        assert_eq!(swipe((100.0, 100.0), (90.0, 300.0)), Some(Gesture::SwipeDown));
        assert_eq!(swipe((100.0, 100.0), (120.0, 0.0)), Some(Gesture::SwipeUp));
    }

    #[test]
    fn diagonal_tie_is_vertical() {
        assert_eq!(swipe((0.0, 0.0), (50.0, 50.0)), Some(Gesture::SwipeDown));
    }

    #[test]
    fn tap_is_not_a_swipe() {
        assert_eq!(swipe((40.0, 40.0), (40.0, 40.0)), None);
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut recognizer = GestureRecognizer::new();
        recognizer.push(TOUCH_RELEASE, 300.0, 10.0);
        assert_eq!(recognizer.take(), None);
    }

    #[test]
    fn take_clears_pending() {
        let mut recognizer = GestureRecognizer::new();
        recognizer.push(TOUCH_PRESS, 0.0, 0.0);
        recognizer.push(TOUCH_RELEASE, 10.0, 0.0);

        assert_eq!(recognizer.take(), Some(Gesture::SwipeRight));
        assert_eq!(recognizer.take(), None);
    }

    #[test]
    fn latest_gesture_replaces_older() {
        let mut recognizer = GestureRecognizer::new();
        recognizer.push(TOUCH_PRESS, 0.0, 0.0);
        recognizer.push(TOUCH_RELEASE, 10.0, 0.0);
        recognizer.push(TOUCH_PRESS, 0.0, 0.0);
        recognizer.push(TOUCH_RELEASE, 0.0, -10.0);

        assert_eq!(recognizer.take(), Some(Gesture::SwipeUp));
    }

    #[test]
    fn unknown_codes_are_rejected() {
        let mut recognizer = GestureRecognizer::new();
        assert!(!recognizer.push(TOUCH_UNHANDLED, 0.0, 0.0));
        assert!(!recognizer.push(7, 0.0, 0.0));
        assert!(recognizer.push(TOUCH_MOVE, 0.0, 0.0));
    }
}
