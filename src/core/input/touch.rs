//=========================================================================
// Touch Events
//=========================================================================
//
// Pointer event kinds and their integer codes on the engine boundary.
//
// | kind    | code |
// |---------|------|
// | Release |  0   |
// | Press   |  1   |
// | Move    |  2   |
// | other   | -1   |
//
// The codes are a protocol shared with the engine; changing them means
// bumping `TOUCH_PROTOCOL_VERSION` on both sides.
//
//=========================================================================

/// Version of the touch code mapping.
pub const TOUCH_PROTOCOL_VERSION: u32 = 1;

pub type TouchCode = i32;

pub const TOUCH_RELEASE: TouchCode = 0;
pub const TOUCH_PRESS: TouchCode = 1;
pub const TOUCH_MOVE: TouchCode = 2;
pub const TOUCH_UNHANDLED: TouchCode = -1;

//=== TouchKind ===========================================================

/// Host pointer event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchKind {
    Press,
    Move,
    Release,
    /// Anything else the host reports (cancel, hover, ...).
    Other,
}

impl TouchKind {
    pub fn code(self) -> TouchCode {
        match self {
            Self::Release => TOUCH_RELEASE,
            Self::Press => TOUCH_PRESS,
            Self::Move => TOUCH_MOVE,
            Self::Other => TOUCH_UNHANDLED,
        }
    }

    /// Decodes a code; `None` for the sentinel and unknown values.
    pub fn from_code(code: TouchCode) -> Option<Self> {
        match code {
            TOUCH_RELEASE => Some(Self::Release),
            TOUCH_PRESS => Some(Self::Press),
            TOUCH_MOVE => Some(Self::Move),
            _ => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
