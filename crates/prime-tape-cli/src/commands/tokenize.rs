//! Tokenize a tape with an initialized model.

use clap::Args;
use prime_tape_core::TapeSampler;
use tracing::info;

use super::{print_json, report, TapeArgs};

#[derive(Args, Debug)]
pub struct TokenizeArgs {
    /// Model identifier (defaults to the configured model)
    #[arg(long)]
    pub model: Option<String>,

    #[command(flatten)]
    pub tape: TapeArgs,
}

pub async fn handle_tokenize(sampler: &TapeSampler, args: TokenizeArgs) -> i32 {
    let model = args
        .model
        .unwrap_or_else(|| sampler.default_model().to_string());

    let tape = match args.tape.tape() {
        Ok(t) => t,
        Err(e) => return report("tokenize", &e),
    };

    if let Err(e) = sampler.initialize_model(&model).await {
        return report("model initialization", &e);
    }

    match sampler.tokenize_tape(&model, tape.as_ref()) {
        Ok(result) => {
            info!(model = %model, tokens = result.sequence_length, "tokenized");
            print_json(&result)
        }
        Err(e) => report("tokenize", &e),
    }
}
