// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `benchimage validate` command - Validate a request file.

use benchimage_core::ConfigLoader;

pub async fn execute(file: &str) -> anyhow::Result<()> {
    tracing::info!(file = %file, "Validating request");

    match ConfigLoader::load_file(file) {
        Ok(config) => {
            println!("✓ Request is valid");
            println!();
            println!("  Image:          {}", config.image);
            println!("  Filter:         {}", config.filter);
            println!("  Size:           {}", config.size);
            println!("  Mode:           {}", config.mode);
            println!("  Strategy key:   {}", config.strategy_key);
            if let Some(endpoint) = &config.remote {
                println!("  Cloudlet:       {}", endpoint);
            }
            println!("  Benchmark:      {}", config.is_benchmark());
            if config.is_benchmark() {
                let sizes: Vec<String> =
                    config.sweep_sizes().iter().map(|s| s.to_string()).collect();
                println!("  Sweep sizes:    {}", sizes.join(", "));
                println!("  Iterations:     {}", config.iterations.get());
                println!("  Failure policy: {:?}", config.sweep_policy);
            }
            println!(
                "  JPEG quality:   source {}, output {}",
                config.source_quality.get(),
                config.output_quality.get()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Request validation failed:");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}
