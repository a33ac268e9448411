//! Print the intrinsic prime registry.

use clap::Args;
use prime_tape_core::PrimeRegistry;

use super::print_json;

#[derive(Args, Debug)]
pub struct RegistryArgs {
    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn handle_registry(args: RegistryArgs) -> i32 {
    if args.json {
        return print_json(PrimeRegistry::entries());
    }

    println!("{:<6} {:>5}  {:<18} {}", "glyph", "prime", "meaning", "vibe");
    for entry in PrimeRegistry::entries() {
        println!(
            "{:<6} {:>5}  {:<18} {}",
            entry.glyph, entry.prime, entry.meaning, entry.vibe
        );
    }
    0
}
