//! Raw prime product of a tape (exponent 1, separators stripped).

use clap::Args;
use prime_tape_core::{glyph_prime_product, TapeSampler};

use super::{report, TapeArgs};

#[derive(Args, Debug)]
pub struct GodelRawArgs {
    #[command(flatten)]
    pub tape: TapeArgs,
}

pub fn handle_godel_raw(sampler: &TapeSampler, args: GodelRawArgs) -> i32 {
    match args.tape.tape() {
        Ok(tape) => {
            let tape = tape.unwrap_or_else(|| sampler.default_tape().clone());
            println!("{}", glyph_prime_product(&tape));
            0
        }
        Err(e) => report("godel-raw", &e),
    }
}
