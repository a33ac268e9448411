//! Sample several models concurrently and compare their universal anchors.

use std::sync::Arc;

use clap::Args;
use prime_tape_core::{CrossModelSummary, SamplingResult, TapeSampler};
use tokio::task::JoinSet;
use tracing::{error, info};

use super::{print_json, report, TapeArgs};

#[derive(Args, Debug)]
pub struct VarianceArgs {
    /// Model identifiers to compare (repeat the flag)
    #[arg(long = "model", required = true)]
    pub models: Vec<String>,

    #[command(flatten)]
    pub tape: TapeArgs,
}

pub async fn handle_variance(sampler: Arc<TapeSampler>, args: VarianceArgs) -> i32 {
    let tape = match args.tape.tape() {
        Ok(t) => t,
        Err(e) => return report("variance", &e),
    };

    let mut tasks = JoinSet::new();
    for (index, model) in args.models.iter().cloned().enumerate() {
        let sampler = Arc::clone(&sampler);
        let tape = tape.clone();
        tasks.spawn(async move {
            let result = sampler.sample_tape(&model, tape.as_ref()).await;
            (index, result)
        });
    }

    let mut slots: Vec<Option<SamplingResult>> = vec![None; args.models.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, Ok(result))) => slots[index] = Some(result),
            Ok((_, Err(e))) => return report("variance sampling", &e),
            Err(e) => {
                error!("Sampling task panicked or was cancelled: {}", e);
                return 1;
            }
        }
    }

    // Keep command-line order regardless of completion order.
    let results: Vec<SamplingResult> = slots.into_iter().flatten().collect();

    match CrossModelSummary::from_results(&results) {
        Ok(summary) => {
            info!(
                models = results.len(),
                variance = summary.variance,
                "cross-model variance computed"
            );
            print_json(&summary)
        }
        Err(e) => report("variance", &e),
    }
}
