//! Exit codes for CLI failures.
//!
//! - 0: success
//! - 1: sampling, provider or configuration failure
//! - 2: usage or precondition error

use prime_tape_core::SamplerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum CliExitCode {
    Success = 0,
    Failure = 1,
    Usage = 2,
}

impl From<CliExitCode> for i32 {
    fn from(code: CliExitCode) -> Self {
        code as i32
    }
}

pub fn exit_code_for_error(err: &SamplerError) -> CliExitCode {
    match err {
        SamplerError::ModelNotInitialized { .. } | SamplerError::EmptyTape => CliExitCode::Usage,
        _ => CliExitCode::Failure,
    }
}
