//! CLI command handlers
//!
//! # Modules
//!
//! - `registry`: Print the intrinsic prime table
//! - `tokenize`: Hash-tokenize a tape
//! - `sample`: Run the full sampling pipeline for one model
//! - `variance`: Sample several models and compare their universal anchors
//! - `godel_raw`: Raw prime product of a tape

pub mod godel_raw;
pub mod registry;
pub mod sample;
pub mod tokenize;
pub mod variance;

use clap::Args;
use prime_tape_core::{SamplerResult, Tape};
use serde::Serialize;
use tracing::error;

use crate::error::{exit_code_for_error, CliExitCode};

/// Tape selection shared by several commands.
#[derive(Args, Debug, Clone)]
pub struct TapeArgs {
    /// Tape to sample (defaults to the configured tape)
    #[arg(long)]
    pub tape: Option<String>,
}

impl TapeArgs {
    pub fn tape(&self) -> SamplerResult<Option<Tape>> {
        self.tape.clone().map(Tape::new).transpose()
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> SamplerResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> i32 {
    match to_json(value) {
        Ok(text) => {
            println!("{}", text);
            CliExitCode::Success.into()
        }
        Err(e) => report("output serialization", &e),
    }
}

/// Log `err` and map it to an exit code.
pub fn report(context: &str, err: &prime_tape_core::SamplerError) -> i32 {
    error!("{} failed: {}", context, err);
    exit_code_for_error(err).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use prime_tape_core::SamplerError;
    use std::collections::HashMap;

    #[test]
    fn test_unserializable_output_is_serialization_error() {
        let mut value = HashMap::new();
        value.insert((1u8, 2u8), 3u8);
        let err = to_json(&value).expect_err("tuple keys are not JSON");
        assert!(matches!(err, SamplerError::SerializationError { .. }));
        assert_eq!(print_json(&value), 1);
    }

    #[test]
    fn test_empty_tape_flag_rejected() {
        let args = TapeArgs {
            tape: Some(String::new()),
        };
        assert!(matches!(args.tape(), Err(SamplerError::EmptyTape)));
    }
}
