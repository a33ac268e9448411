//! Run the full sampling pipeline for one model.

use clap::Args;
use prime_tape_core::{GodelEncoding, SamplingResult, TapeSampler};
use serde::Serialize;
use tracing::info;

use super::{print_json, report, TapeArgs};

#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Model identifier (defaults to the configured model)
    #[arg(long)]
    pub model: Option<String>,

    #[command(flatten)]
    pub tape: TapeArgs,

    /// Also encode every segment with the whole-tape activations
    #[arg(long)]
    pub segments: bool,

    /// Emit the full result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct SampleOutput<'a> {
    result: &'a SamplingResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    segments: Option<Vec<GodelEncoding>>,
}

pub async fn handle_sample(sampler: &TapeSampler, args: SampleArgs) -> i32 {
    let model = args
        .model
        .unwrap_or_else(|| sampler.default_model().to_string());

    let tape = match args.tape.tape() {
        Ok(t) => t,
        Err(e) => return report("sample", &e),
    };

    info!(model = %model, "sampling tape");
    let result = match sampler.sample_tape(&model, tape.as_ref()).await {
        Ok(r) => r,
        Err(e) => return report("sample", &e),
    };

    let segments = args
        .segments
        .then(|| sampler.encode_segments(Some(&result.tape), &result.prime_activations));

    if args.json {
        return print_json(&SampleOutput {
            result: &result,
            segments,
        });
    }

    print_summary(&result, segments.as_deref());
    0
}

fn print_summary(result: &SamplingResult, segments: Option<&[GodelEncoding]>) {
    println!("model:        {}", result.model_id());
    println!("tape:         {}", result.tape);
    println!("tokens:       {}", result.tokenization.sequence_length);
    println!(
        "embedding:    {} dims, {} layers, {:.2} ms",
        result.embedding.hidden_size,
        result.embedding.layers.len(),
        result.embedding.processing_time_ms
    );
    println!("activations:");
    for a in result.prime_activations.ranked() {
        println!(
            "  #{:<2} {} {:>3}  raw {:>+.6}  tanh {:>+.6}",
            a.rank, a.glyph, a.prime, a.activation, a.normalized_activation
        );
    }
    println!("godel:        {}", result.godel.godel_number);
    println!(
        "anchor:       prime2 {:+.6}, consistency {:.6}",
        result.universal_anchor.prime2_activation, result.universal_anchor.consistency_score
    );
    if let Some(segments) = segments {
        for (i, s) in segments.iter().enumerate() {
            println!("segment {}:    {} -> {}", i, s.segment_text, s.godel_number);
        }
    }
}
