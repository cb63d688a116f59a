// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the tankobon-pages crate. Covers spread planning
// (grayscale check, channel reduction, crop) and level cleanup on synthetic
// scans sized like a real double page (1292x1061).

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{GrayImage, Luma};

use tankobon_core::ReadingDirection;
use tankobon_core::config::{CROP_RATIO, CleanConfig};
use tankobon_pages::LevelCleaner;
use tankobon_pages::Raster;
use tankobon_pages::split::plan_pages;

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Gray spread stored as RGB, so every pixel goes through the lossless check
/// and the channel mean before the crop.
fn bench_plan_spread(c: &mut Criterion) {
    let (width, height) = (1292u32, 1061u32);
    let data: Vec<u8> = (0..height)
        .flat_map(|y| (0..width).flat_map(move |x| [((x ^ y) % 256) as u8; 3]))
        .collect();
    let raster = Raster::from_raw(width, height, 3, data).expect("valid shape");

    c.bench_function("plan_pages spread (1292x1061 rgb)", |b| {
        b.iter(|| {
            let pages = plan_pages(
                black_box(raster.clone()),
                false,
                ReadingDirection::RightToLeft,
                CROP_RATIO,
            );
            black_box(pages);
        });
    });
}

fn bench_auto_clean(c: &mut Criterion) {
    let gray = GrayImage::from_fn(650, 1063, |x, y| Luma([(30 + (x * 7 + y * 3) % 190) as u8]));
    let config = CleanConfig::default();

    c.bench_function("auto_clean (650x1063)", |b| {
        b.iter(|| {
            let cleaned = LevelCleaner::from_gray(black_box(gray.clone()))
                .auto_clean(&config)
                .into_gray();
            black_box(cleaned);
        });
    });
}

criterion_group!(benches, bench_plan_spread, bench_auto_clean);
criterion_main!(benches);
