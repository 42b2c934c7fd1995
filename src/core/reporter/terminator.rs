//=========================================================================
// Process Termination
//=========================================================================

//=== External Dependencies ===============================================

use log::error;

//=== ProcessTerminator ===================================================

/// Ends the process after a terminating dialog outcome.
pub trait ProcessTerminator: Send + Sync {
    fn terminate(&self, exit_code: i32);
}

/// Exits the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExitProcess;

impl ExitProcess {
    pub const FATAL_EXIT_CODE: i32 = 1;
}

impl ProcessTerminator for ExitProcess {
    fn terminate(&self, exit_code: i32) {
        error!(target: "reporter", "Terminating process (exit code {})", exit_code);
        log::logger().flush();
        std::process::exit(exit_code);
    }
}
