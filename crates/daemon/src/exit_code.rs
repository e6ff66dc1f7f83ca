// Process exit codes.
//
//   0 = graceful shutdown
//   1 = fatal git failure (preflight or commit)
//   2 = usage/config error

use std::process;

use crate::config::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    Error = 1,
    Usage = 2,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Map an anyhow error to an exit code by inspecting the error chain.
    pub fn from_error(err: &anyhow::Error) -> Self {
        if err.chain().any(|cause| cause.downcast_ref::<ConfigError>().is_some()) {
            return Self::Usage;
        }
        Self::Error
    }
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code.code() as u8)
    }
}
