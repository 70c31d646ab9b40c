//! Saturating Q15 axpy benchmarks.
//!
//! Compares the scalar reference, the probed vector kernel and the rayon
//! parallel variant across sizes that move from L1-resident to memory-bound.
//! Each element is an `i16`, so 4096 elements occupy 8 KiB per signal.

use std::hint::black_box;
use std::time::Instant;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use q15axpy::simd::VectorKernel;
use q15axpy::{SimdAxpy, PARALLEL_SIMD_THRESHOLD};

// ================================================================================================
// BENCHMARK CONFIGURATION
// ================================================================================================

const VECTOR_SIZES: &[usize] = &[
    256,        // 512 B
    4_096,      // 8 KiB - L1 cache
    32_768,     // 64 KiB - L1→L2 transition
    262_144,    // 512 KiB - L2 cache
    1_048_576,  // 2 MiB - L2→L3 transition
    16_777_216, // 32 MiB - main memory
];

const ALPHA: i16 = 3;

// ================================================================================================
// TEST DATA GENERATION
// ================================================================================================

/// Full-range Q15 signals from a fixed seed.
fn generate_test_data(len: usize) -> (Vec<i16>, Vec<i16>) {
    let mut rng = StdRng::seed_from_u64(42);

    let a: Vec<i16> = (0..len).map(|_| rng.random::<i16>()).collect();
    let b: Vec<i16> = (0..len).map(|_| rng.random::<i16>()).collect();

    (a, b)
}

// ================================================================================================
// BENCHMARK IMPLEMENTATIONS
// ================================================================================================

fn benchmark_axpy_implementations(c: &mut Criterion) {
    for &size in VECTOR_SIZES {
        let mut group = c.benchmark_group(format!("Q15Axpy_{}", format_size(size)));

        // Two input signals read per call.
        group.throughput(Throughput::Bytes(
            (size * std::mem::size_of::<i16>() * 2) as u64,
        ));

        let (a_vec, b_vec) = generate_test_data(size);
        let a_slice = a_vec.as_slice();
        let b_slice = b_vec.as_slice();

        group.bench_with_input(
            BenchmarkId::new("simd", size),
            &(a_slice, b_slice),
            |b, (a, b_data)| b.iter(|| black_box(a.simd_axpy(black_box(*b_data), ALPHA))),
        );

        group.bench_with_input(
            BenchmarkId::new("scalar", size),
            &(a_slice, b_slice),
            |b, (a, b_data)| b.iter(|| black_box(a.scalar_axpy(black_box(*b_data), ALPHA))),
        );

        if size > PARALLEL_SIMD_THRESHOLD {
            group.bench_with_input(
                BenchmarkId::new("parallel_simd", size),
                &(a_slice, b_slice),
                |b, (a, b_data)| b.iter(|| black_box(a.par_simd_axpy(black_box(*b_data), ALPHA))),
            );
        }

        // In-place kernel call on a preallocated output, as the harness times it.
        let kernel = VectorKernel::probe();
        let mut y = vec![0i16; size];
        group.bench_function(BenchmarkId::new("kernel_in_place", size), |bench| {
            bench.iter(|| kernel.compute(a_slice, b_slice, black_box(&mut y), size, ALPHA))
        });

        group.finish();
    }
}

// ================================================================================================
// UTILITY FUNCTIONS
// ================================================================================================

fn format_size(elements: usize) -> String {
    let bytes = elements * std::mem::size_of::<i16>();

    if bytes >= 1_048_576 {
        format!("{:.1}_MiB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.1}_KiB", bytes as f64 / 1024.0)
    } else {
        format!("{}_B", bytes)
    }
}

fn all_benchmarks(c: &mut Criterion) {
    println!(
        "Q15 axpy benchmarks: {} sizes, vector kernel = {}",
        VECTOR_SIZES.len(),
        VectorKernel::probe()
    );

    let start_time = Instant::now();

    benchmark_axpy_implementations(c);

    println!(
        "Benchmark suite completed in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );
}

// ================================================================================================
// CRITERION INTEGRATION
// ================================================================================================

criterion_group!(benches, all_benchmarks);
criterion_main!(benches);
