// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Request options shared by `run` and `bench`, and the progress loop.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use benchimage_core::{
    AssetSource, ChannelSink, ConfigLoader, DirAssetSource, FilterConfiguration, FilterName,
    FilterTask, ImageId, JpegCodec, ProgressSink, RemoteEndpoint, SizeLabel,
    SyntheticAssetSource, TaskEvent, TaskOutput,
};

#[derive(clap::Args, Debug, Clone)]
pub struct RequestArgs {
    /// Request YAML file; flags below override its fields
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Image identifier
    #[arg(long)]
    pub image: Option<String>,

    /// Filter name (Original, GreyScale, Sepia, Blur, Sharpen, Cartoonizer)
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Size label (All, 0.3MP, 1MP, 2MP, 4MP, 8MP)
    #[arg(short, long)]
    pub size: Option<String>,

    /// Cloudlet address as host[:port]; selects the cloudlet strategy
    #[arg(long)]
    pub cloudlet: Option<String>,

    /// Strategy factory key
    #[arg(long)]
    pub strategy_key: Option<String>,

    /// Directory with 0_3mp/1mp/2mp/4mp/8mp subdirectories.
    /// Synthetic test images are used when omitted.
    #[arg(long)]
    pub assets: Option<PathBuf>,
}

impl RequestArgs {
    /// Build the request from the file (if any) and the flags.
    pub fn configuration(
        &self,
        default_filter: FilterName,
        default_size: SizeLabel,
    ) -> anyhow::Result<FilterConfiguration> {
        let mut config = match &self.config {
            Some(path) => ConfigLoader::load_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => FilterConfiguration::new(
                ImageId::new("img5.jpg")?,
                default_filter,
                default_size,
            ),
        };

        if let Some(image) = &self.image {
            config.image = ImageId::new(image.as_str())?;
        }
        if let Some(filter) = &self.filter {
            config.filter = filter.parse()?;
        }
        if let Some(size) = &self.size {
            config.size = size.parse()?;
        }
        if let Some(cloudlet) = &self.cloudlet {
            let endpoint: RemoteEndpoint = cloudlet.parse()?;
            config = config.remote(endpoint);
        }
        if let Some(key) = &self.strategy_key {
            config = config.strategy_key(key.as_str());
        }
        Ok(config)
    }

    pub fn asset_source(&self) -> Arc<dyn AssetSource> {
        match &self.assets {
            Some(root) => Arc::new(DirAssetSource::new(root)),
            None => Arc::new(SyntheticAssetSource::new(Arc::new(JpegCodec))),
        }
    }
}

/// Run `config` to completion, printing progress to stderr as it arrives.
/// Ctrl-C cancels the task at its next checkpoint.
pub async fn run_with_progress(
    config: FilterConfiguration,
    assets: Arc<dyn AssetSource>,
) -> anyhow::Result<TaskOutput> {
    let (sink, mut events) = ChannelSink::new();
    let sink: Arc<dyn ProgressSink> = sink;

    let handle = FilterTask::new(config, assets, Arc::new(JpegCodec))
        .progress(&sink)
        .run();
    let mut state = handle.subscribe();
    tracing::debug!(task_id = %handle.id(), "Task spawned");

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(TaskEvent::Progress(p)) => print_progress(&p),
                Some(TaskEvent::Completed(_)) | None => break,
            },
            changed = state.changed() => {
                // Sender gone: the task ended without a terminal event.
                if changed.is_err() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                eprintln!("Cancelling...");
                handle.cancel();
            }
        }
    }
    while let Ok(TaskEvent::Progress(p)) = events.try_recv() {
        print_progress(&p);
    }

    let output = handle.join_output().await?;
    Ok(output)
}

fn print_progress(event: &benchimage_core::ProgressEvent) {
    match &event.timing {
        Some(timing) => eprintln!("[{:>3}%] {} ({})", event.percent, event.status, timing),
        None => eprintln!("[{:>3}%] {}", event.percent, event.status),
    }
}
