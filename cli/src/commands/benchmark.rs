//! Benchmark command implementation.

use clap::Parser;

/// Benchmark command arguments.
#[derive(Parser)]
pub struct BenchmarkCommand {
    /// Path to the trained tokenizer model directory
    #[arg(short, long)]
    pub tokenizer: String,

    /// Path to input text file for benchmarking
    #[arg(short, long)]
    pub input: String,

    /// Number of iterations to run
    #[arg(short = 'n', long, default_value_t = 100)]
    pub iterations: usize,
}

use anyhow::Result as AnyhowResult;
use bytepair_tokenizer::Tokenizer;
use std::fs;
use std::path::Path;
use std::time::Instant;

pub fn run(cmd: BenchmarkCommand) -> AnyhowResult<()> {
    // Load tokenizer
    let tokenizer_path = Path::new(&cmd.tokenizer);
    let tokenizer = Tokenizer::load(tokenizer_path)?;

    // Read input text
    let text = fs::read_to_string(&cmd.input)?;

    println!("Benchmarking encoding...");
    println!("  Text length: {} bytes", text.len());
    println!("  Iterations: {}", cmd.iterations);
    println!();

    // Warmup
    let token_count = tokenizer.encode(&text)?.len();

    // Benchmark
    let start = Instant::now();
    for _ in 0..cmd.iterations {
        let _ = tokenizer.encode(&text)?;
    }
    let elapsed = start.elapsed();

    let avg_time_s = elapsed.as_secs_f64() / cmd.iterations as f64;

    println!("Results:");
    println!("  Total time: {:.2}s", elapsed.as_secs_f64());
    println!("  Average time: {:.3}ms", avg_time_s * 1000.0);
    println!("  Tokens: {}", token_count);
    println!(
        "  Throughput: {:.0} bytes/s",
        text.len() as f64 / avg_time_s
    );

    Ok(())
}
