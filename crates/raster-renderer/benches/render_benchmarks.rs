//! Benchmarks for the raster-renderer crate: palette lookup, column and
//! polar field rasterization, and PNG encoding.
//!
//! Run with: cargo bench --package raster-renderer --bench render_benchmarks
//! Or: cargo bench --package raster-renderer -- polar

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use raster_common::{Color, ColorAxis, Palette, PngCompression};
use raster_renderer::{
    png, CategoricalColumnRasterizer, LithologyRegistry, PolarDomain, PolarFieldRasterizer,
    RangeColorAxis, RasterMode, Sample, ScalarField,
};
use test_utils::{
    create_irregular_log, create_lobed_field, AxisMap, CartesianTransform, ColorCycle, GrayAxis,
    DEFAULT_CYCLE,
};

/// Polar field with a lobed pattern plus noise, values roughly in [0, 1].
fn generate_noisy_field(rows: usize, cols: usize) -> ScalarField {
    let mut rng = rand::thread_rng();
    let data = create_lobed_field(rows, cols, 4)
        .into_iter()
        .map(|v| v + rng.gen_range(-0.05..0.05))
        .collect();
    ScalarField::new(rows, cols, data).unwrap()
}

fn generate_axis(ranges: usize, slots: usize) -> RangeColorAxis {
    let palette = Palette::interpolate(
        &[Color::rgb(0, 0, 128), Color::rgb(0, 200, 0), Color::rgb(255, 0, 0)],
        slots,
    )
    .unwrap();
    let mut axis = RangeColorAxis::new();
    for i in 0..ranges {
        axis.add_range(i as f64, i as f64 + 1.0, palette.clone()).unwrap();
    }
    axis.set_low_color(Color::BLACK);
    axis.set_high_color(Color::WHITE);
    axis
}

// =============================================================================
// PALETTE LOOKUP BENCHMARKS
// =============================================================================

fn bench_palette_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("palette_lookup");

    let mut rng = rand::thread_rng();
    let values: Vec<f64> = (0..10_000).map(|_| rng.gen_range(-1.0..17.0)).collect();
    group.throughput(Throughput::Elements(values.len() as u64));

    for ranges in [1, 4, 16] {
        let axis = generate_axis(ranges, 64);
        group.bench_with_input(BenchmarkId::new("color", ranges), &values, |b, values| {
            b.iter(|| {
                for &v in values {
                    black_box(axis.color(v));
                }
            });
        });
        group.bench_with_input(BenchmarkId::new("packed", ranges), &values, |b, values| {
            b.iter(|| {
                for &v in values {
                    black_box(axis.packed_palette_index(v).ok());
                }
            });
        });
    }

    group.finish();
}

// =============================================================================
// CATEGORICAL COLUMN BENCHMARKS
// =============================================================================

fn bench_column(c: &mut Criterion) {
    let mut group = c.benchmark_group("categorical_column");

    for n in [1_000, 10_000, 100_000] {
        let samples: Vec<Sample> = create_irregular_log(n, 8, 42)
            .into_iter()
            .map(|(c, p)| Sample::new(c, p))
            .collect();

        for parallel in [false, true] {
            let name = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(name, n), &samples, |b, samples| {
                let mut column = CategoricalColumnRasterizer::new(LithologyRegistry::new());
                column.set_parallel(parallel);
                let mut defaults = ColorCycle::new(&DEFAULT_CYCLE);
                b.iter(|| {
                    column.set_samples(samples.clone());
                    black_box(column.rasterize(&mut defaults).ok());
                });
            });
        }
    }

    group.finish();
}

// =============================================================================
// POLAR FIELD BENCHMARKS
// =============================================================================

fn bench_polar_dynamic(c: &mut Criterion) {
    let mut group = c.benchmark_group("polar_dynamic");

    let field = generate_noisy_field(64, 360);
    let axes = AxisMap::with_default(GrayAxis::new(0.0, 1.0));
    let domain = PolarDomain::new(0.0, 360.0, 0.0, 10.0).unwrap();

    for size in [256.0, 512.0, 1024.0] {
        let transform = CartesianTransform::centered(size, 10.0);
        group.throughput(Throughput::Elements((size * size) as u64));

        for (name, parallel, interpolate) in [
            ("nearest", false, false),
            ("bilinear", false, true),
            ("bilinear_parallel", true, true),
        ] {
            let mut rasterizer = PolarFieldRasterizer::new(field.clone(), domain);
            rasterizer.set_parallel(parallel);
            rasterizer.set_interpolate(interpolate);
            group.bench_function(BenchmarkId::new(name, size as usize), |b| {
                b.iter(|| black_box(rasterizer.image(&transform, &axes).ok()));
            });
        }
    }

    group.finish();
}

fn bench_polar_fixed_cached(c: &mut Criterion) {
    let mut group = c.benchmark_group("polar_fixed");

    let field = generate_noisy_field(64, 360);
    let axes = AxisMap::with_default(GrayAxis::new(0.0, 1.0));
    let domain = PolarDomain::new(0.0, 360.0, 0.0, 10.0).unwrap();
    let mut rasterizer = PolarFieldRasterizer::new(field, domain);
    rasterizer.set_mode(RasterMode::Fixed {
        width: 512,
        height: 512,
    });

    let transforms: Vec<CartesianTransform> = [200.0, 400.0, 800.0]
        .iter()
        .map(|&s| CartesianTransform::centered(s, 10.0))
        .collect();

    // Zooming only rescales the cached image
    group.bench_function("rescale_only", |b| {
        b.iter(|| {
            for t in &transforms {
                black_box(rasterizer.image(t, &axes).ok());
            }
        });
    });

    group.bench_function("regenerate", |b| {
        b.iter(|| {
            rasterizer.invalidate();
            black_box(rasterizer.image(&transforms[0], &axes).ok());
        });
    });

    group.finish();
}

// =============================================================================
// PNG ENCODING BENCHMARKS
// =============================================================================

fn bench_png_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("png_encoding");

    let field = generate_noisy_field(32, 180);
    let axis = generate_axis(1, 32);
    let mut axes = AxisMap::with_default(axis);
    if let Some(a) = axes.get_mut(None) {
        a.set_actual_range(0.0, 1.0);
    }
    let domain = PolarDomain::new(0.0, 360.0, 0.0, 10.0).unwrap();

    for size in [256.0, 512.0] {
        let mut rasterizer = PolarFieldRasterizer::new(field.clone(), domain);
        rasterizer.set_interpolate(false);
        let image = rasterizer
            .image(&CartesianTransform::centered(size, 10.0), &axes)
            .unwrap()
            .unwrap();
        let buffer = image.buffer().clone();
        group.throughput(Throughput::Bytes(buffer.as_bytes().len() as u64));

        for compression in [PngCompression::Fast, PngCompression::Best] {
            group.bench_with_input(
                BenchmarkId::new(format!("auto_{:?}", compression), size as usize),
                &buffer,
                |b, buffer| b.iter(|| png::encode_buffer(black_box(buffer), compression)),
            );
        }

        // Force RGBA for comparison
        group.bench_with_input(
            BenchmarkId::new("rgba", size as usize),
            &buffer,
            |b, buffer| {
                b.iter(|| {
                    png::create_png(
                        black_box(buffer.as_bytes()),
                        buffer.width(),
                        buffer.height(),
                        PngCompression::Fast,
                    )
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_palette_lookup,
    bench_column,
    bench_polar_dynamic,
    bench_polar_fixed_cached,
    bench_png_encoding,
);

criterion_main!(benches);
