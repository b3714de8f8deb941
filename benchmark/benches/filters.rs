// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Filter algorithm microbenchmarks.
//!
//! Runs each algorithm over a synthetic image at every sweep size, so the
//! numbers line up with the rows of a benchmark sweep.

use std::sync::Arc;
use std::time::Duration;

use benchimage_core::filters::{cartoonize, convolve, grayscale, sepia, Kernel};
use benchimage_core::{PixelBuffer, RawCodec, SizeLabel, SyntheticAssetSource};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn source(size: SizeLabel) -> PixelBuffer {
    SyntheticAssetSource::new(Arc::new(RawCodec))
        .render(size)
        .expect("Failed to render source image")
}

fn pixels(size: SizeLabel) -> u64 {
    let (w, h) = size.dimensions();
    w as u64 * h as u64
}

/// Benchmark the per-pixel colour transforms.
fn bench_color_transforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("color_transforms");
    group.measurement_time(Duration::from_secs(5));

    for size in SizeLabel::SWEEP {
        let image = source(size);
        group.throughput(Throughput::Elements(pixels(size)));

        group.bench_with_input(BenchmarkId::new("grayscale", size), &image, |b, image| {
            b.iter(|| black_box(grayscale(image.clone())));
        });
        group.bench_with_input(BenchmarkId::new("sepia", size), &image, |b, image| {
            b.iter(|| black_box(sepia(image.clone())));
        });
    }

    group.finish();
}

/// Benchmark 3x3 convolution with wrap-around edges.
fn bench_convolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("convolution_3x3");
    group.sample_size(20);

    let kernel = Kernel::gaussian_3x3();
    for size in SizeLabel::SWEEP {
        let image = source(size);
        group.throughput(Throughput::Elements(pixels(size)));

        group.bench_with_input(BenchmarkId::from_parameter(size), &image, |b, image| {
            b.iter(|| black_box(convolve(image.clone(), &kernel, 1.0 / 16.0, 0.0)));
        });
    }

    group.finish();
}

/// Benchmark the full cartoonizer pipeline.
fn bench_cartoonizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("cartoonizer");
    group.sample_size(10); // Fewer samples, 8MP takes a while

    for size in SizeLabel::SWEEP {
        let image = source(size);
        group.throughput(Throughput::Elements(pixels(size)));

        group.bench_with_input(BenchmarkId::from_parameter(size), &image, |b, image| {
            b.iter(|| black_box(cartoonize(image.clone())));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_color_transforms,
    bench_convolution,
    bench_cartoonizer
);
criterion_main!(benches);
