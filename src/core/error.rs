//=========================================================================
// Engine Errors
//=========================================================================
//
// Closed error taxonomy shared by the host shell and the game engine.
//
// Every fallible operation returns `Result<_, EngineError>`. Fatal errors
// are funnelled into `FaultReporter::terminate_application`, which turns
// the rendered message into the text of the fatal dialog.
//
//=========================================================================

//=== ErrorCode ===========================================================

/// Error category with a fixed human-readable description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidResult,
    InvalidState,
    BadArgument,
    BadFormat,
    WrongThread,
    NoMatchingConfig,
    ContextCreation,
    AssetNotFound,
    UnsupportedScreen,
    ThreadFailed,
}

impl ErrorCode {
    /// Returns the fixed description of the code.
    pub fn description(self) -> &'static str {
        match self {
            Self::InvalidResult => "Invalid result",
            Self::InvalidState => "Invalid state",
            Self::BadArgument => "Bad argument",
            Self::BadFormat => "Bad format",
            Self::WrongThread => "Called from the wrong thread",
            Self::NoMatchingConfig => "No surface configuration matches the request",
            Self::ContextCreation => "Rendering context creation failed",
            Self::AssetNotFound => "Asset not found",
            Self::UnsupportedScreen => "Unsupported screen",
            Self::ThreadFailed => "Thread operation failed",
        }
    }
}

//=== EngineError =========================================================

/// Error raised by host or engine code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    code: ErrorCode,
    message: String,
}

impl EngineError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.code.description())
        } else {
            write!(f, "{}: {}", self.code.description(), self.message)
        }
    }
}

impl std::error::Error for EngineError {}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(ErrorCode::BadFormat, e.to_string())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_description_and_message() {
        let err = EngineError::new(ErrorCode::BadArgument, "touch code 7");
        assert_eq!(err.to_string(), "Bad argument: touch code 7");
    }

    #[test]
    fn display_without_message_is_description_only() {
        let err = EngineError::new(ErrorCode::InvalidState, "");
        assert_eq!(err.to_string(), "Invalid state");
    }

    #[test]
    fn json_errors_convert_to_bad_format() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: EngineError = parse.unwrap_err().into();
        assert_eq!(err.code(), ErrorCode::BadFormat);
    }

    #[test]
    fn engine_error_is_error_trait() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }
}
