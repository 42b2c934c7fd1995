//=========================================================================
// Input Processor
//=========================================================================
//
// Converts Winit pointer events into host touch events.
//
// Architecture:
//   Winit Events → InputProcessor → PointerEvent → InputForwarder
//
// The left mouse button stands in for a finger: cursor motion only counts
// while it is held. Of several fingers only the first one down is
// tracked; a cancelled touch is passed on as `TouchKind::Other`.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::event::{ElementState, MouseButton, TouchPhase};

//=== Internal Dependencies ===============================================

use crate::core::input::TouchKind;

//=== PointerEvent ========================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PointerEvent {
    pub kind: TouchKind,
    pub x: f32,
    pub y: f32,
}

impl PointerEvent {
    fn new(kind: TouchKind, (x, y): (f32, f32)) -> Self {
        Self { kind, x, y }
    }
}

//=== InputProcessor ======================================================

/// Stateful pointer tracking for one window.
#[derive(Debug, Default)]
pub(crate) struct InputProcessor {
    cursor: (f32, f32),
    mouse_down: bool,
    finger: Option<u64>,
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self::default()
    }

    //--- Mouse ------------------------------------------------------------

    /// Records the cursor; a move event only while the button is held.
    pub(crate) fn process_mouse_move(&mut self, x: f32, y: f32) -> Option<PointerEvent> {
        self.cursor = (x, y);
        self.mouse_down.then(|| PointerEvent::new(TouchKind::Move, self.cursor))
    }

    /// Left button press/release at the last cursor position.
    pub(crate) fn process_mouse_button(
        &mut self,
        button: MouseButton,
        state: ElementState,
    ) -> Option<PointerEvent> {
        if button != MouseButton::Left {
            return None;
        }

        match state {
            ElementState::Pressed if !self.mouse_down => {
                self.mouse_down = true;
                Some(PointerEvent::new(TouchKind::Press, self.cursor))
            }
            ElementState::Released if self.mouse_down => {
                self.mouse_down = false;
                Some(PointerEvent::new(TouchKind::Release, self.cursor))
            }
            _ => None,
        }
    }

    //--- Touch ------------------------------------------------------------

    pub(crate) fn process_touch(
        &mut self,
        id: u64,
        phase: TouchPhase,
        x: f32,
        y: f32,
    ) -> Option<PointerEvent> {
        let position = (x, y);

        match phase {
            TouchPhase::Started if self.finger.is_none() => {
                self.finger = Some(id);
                Some(PointerEvent::new(TouchKind::Press, position))
            }
            TouchPhase::Moved if self.finger == Some(id) => {
                Some(PointerEvent::new(TouchKind::Move, position))
            }
            TouchPhase::Ended if self.finger == Some(id) => {
                self.finger = None;
                Some(PointerEvent::new(TouchKind::Release, position))
            }
            TouchPhase::Cancelled if self.finger == Some(id) => {
                self.finger = None;
                Some(PointerEvent::new(TouchKind::Other, position))
            }
            _ => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //=====================================================================
    // Mouse
    //=====================================================================

    #[test]
    fn cursor_motion_without_button_is_silent() {
        let mut processor = InputProcessor::new();
        assert_eq!(processor.process_mouse_move(10.0, 20.0), None);
    }

    #[test]
    fn left_button_drag_is_press_move_release() {
        let mut processor = InputProcessor::new();
        processor.process_mouse_move(10.0, 20.0);

        let press = processor.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert_eq!(press, Some(PointerEvent::new(TouchKind::Press, (10.0, 20.0))));

        let drag = processor.process_mouse_move(30.0, 20.0);
        assert_eq!(drag, Some(PointerEvent::new(TouchKind::Move, (30.0, 20.0))));

        let release = processor.process_mouse_button(MouseButton::Left, ElementState::Released);
        assert_eq!(release, Some(PointerEvent::new(TouchKind::Release, (30.0, 20.0))));

        assert_eq!(processor.process_mouse_move(40.0, 20.0), None);
    }

    #[test]
    fn other_buttons_are_ignored() {
        let mut processor = InputProcessor::new();
        assert_eq!(processor.process_mouse_button(MouseButton::Right, ElementState::Pressed), None);
        assert_eq!(processor.process_mouse_move(1.0, 1.0), None);
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut processor = InputProcessor::new();
        assert_eq!(processor.process_mouse_button(MouseButton::Left, ElementState::Released), None);
    }

    //=====================================================================
    // Touch
    //=====================================================================

    #[test]
    fn first_finger_is_tracked() {
        let mut processor = InputProcessor::new();

        assert_eq!(
            processor.process_touch(7, TouchPhase::Started, 1.0, 2.0).map(|e| e.kind),
            Some(TouchKind::Press)
        );
        assert_eq!(processor.process_touch(8, TouchPhase::Started, 5.0, 5.0), None);
        assert_eq!(processor.process_touch(8, TouchPhase::Moved, 6.0, 5.0), None);
        assert_eq!(
            processor.process_touch(7, TouchPhase::Moved, 3.0, 2.0).map(|e| e.kind),
            Some(TouchKind::Move)
        );
        assert_eq!(
            processor.process_touch(7, TouchPhase::Ended, 4.0, 2.0),
            Some(PointerEvent::new(TouchKind::Release, (4.0, 2.0)))
        );
    }

    #[test]
    fn cancelled_touch_is_other() {
        let mut processor = InputProcessor::new();
        processor.process_touch(1, TouchPhase::Started, 0.0, 0.0);

        let cancel = processor.process_touch(1, TouchPhase::Cancelled, 0.0, 0.0);
        assert_eq!(cancel.map(|e| e.kind), Some(TouchKind::Other));

        // A new finger may start afterwards.
        assert!(processor.process_touch(2, TouchPhase::Started, 0.0, 0.0).is_some());
    }
}
