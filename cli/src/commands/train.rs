//! Train command implementation.

use clap::Parser;

/// Train command arguments.
#[derive(Parser)]
pub struct TrainCommand {
    /// Path to the training corpus (read as raw bytes)
    #[arg(short, long)]
    pub input: String,

    /// Output directory for the trained model
    #[arg(short, long)]
    pub output: String,

    /// Target vocabulary size, 256 byte symbols included
    #[arg(short, long, default_value_t = 30_000)]
    pub vocab_size: usize,

    /// Minimum pair frequency for a merge
    #[arg(short, long, default_value_t = 1)]
    pub min_frequency: u64,

    /// Disable parallel initial pair counting
    #[arg(long, default_value_t = false)]
    pub sequential: bool,

    /// Also write the plain-text merges.txt rule list
    #[arg(long, default_value_t = false)]
    pub merges_txt: bool,
}

use anyhow::Result as AnyhowResult;
use bytepair_tokenizer::{StopReason, Tokenizer, TrainingConfig};
use std::fs;
use std::path::Path;
use std::time::Instant;

pub fn run(cmd: TrainCommand) -> AnyhowResult<()> {
    println!("Training tokenizer...");
    println!("  Input: {}", cmd.input);
    println!("  Output: {}", cmd.output);
    println!("  Vocab size: {}", cmd.vocab_size);
    println!("  Min frequency: {}", cmd.min_frequency);
    println!();

    // Read training data as raw bytes
    let start = Instant::now();
    let data = fs::read(&cmd.input)?;
    println!(
        "Read {} bytes in {:.2}s",
        data.len(),
        start.elapsed().as_secs_f64()
    );
    println!();

    let config = TrainingConfig {
        target_vocab_size: cmd.vocab_size,
        min_frequency: cmd.min_frequency,
        parallel: !cmd.sequential,
        reject_empty_input: false,
    };

    // Train
    let start = Instant::now();
    let (tokenizer, stop) = Tokenizer::train(&data, config)?;
    println!(
        "Training completed in {:.2}s",
        start.elapsed().as_secs_f64()
    );
    println!("Final vocab size: {}", tokenizer.vocab_size());
    println!("Learned merges: {}", tokenizer.merges().len());
    match stop {
        StopReason::TargetReached => {}
        StopReason::ExhaustedPairs => {
            println!("Stopped early: no adjacent pair remained");
        }
        StopReason::BelowMinFrequency => {
            println!("Stopped early: best pair fell below the minimum frequency");
        }
        StopReason::Cancelled => println!("Stopped early: cancelled"),
    }
    println!();

    // Save model
    let output_path = Path::new(&cmd.output);
    let start = Instant::now();
    tokenizer.save(output_path)?;
    if cmd.merges_txt {
        tokenizer.save_merges_txt(output_path)?;
    }
    println!(
        "Model saved to {} in {:.2}s",
        cmd.output,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}
