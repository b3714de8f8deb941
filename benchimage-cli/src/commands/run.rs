// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `benchimage run` command - one filter pass.

use std::path::Path;

use anyhow::Context;
use benchimage_core::{Codec, FilterName, JpegCodec, SizeLabel};

use super::request::{run_with_progress, RequestArgs};

pub async fn execute(request: &RequestArgs, output: Option<&Path>) -> anyhow::Result<()> {
    let config = request
        .configuration(FilterName::Cartoonizer, SizeLabel::Mp8)?
        .benchmark(false);
    let quality = config.output_quality;

    tracing::info!(
        image = %config.image,
        filter = %config.filter,
        size = %config.size,
        strategy = %config.strategy_key,
        "Running filter"
    );

    let result = run_with_progress(config, request.asset_source()).await?.record;

    println!("Image:        {}", result.config.image);
    println!("Filter:       {}", result.config.filter);
    println!(
        "Size:         {} ({}x{})",
        result.config.size,
        result.image.width(),
        result.image.height()
    );
    println!("Method:       {}", result.config.strategy_key);
    println!("Total time:   {}ms", result.total_time_ms);
    println!("Offload time: {}ms", result.offload_time_ms);

    if let Some(path) = output {
        let bytes = JpegCodec.encode(&result.image, quality)?;
        std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
        println!("Saved:        {}", path.display());
    }

    Ok(())
}
