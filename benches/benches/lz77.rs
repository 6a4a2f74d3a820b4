//! Benchmark suite for the LZ77 glyph codec
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml --bench lz77

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fnt4_benches::{generate_glyph_plane, sizes};
use fnt4_types::file::lz77::{Layout, compress, decompress};
use std::hint::black_box;

/// Benchmark compression of glyph-like planes
fn bench_compress(c: &mut Criterion) {
	let mut group = c.benchmark_group("lz77_compress");

	for size in [sizes::SMALL_GLYPH, sizes::GLYPH, sizes::LARGE_GLYPH] {
		let plane = generate_glyph_plane(u32::from(size), 3);
		group.throughput(Throughput::Bytes(plane.len() as u64));

		for (name, layout) in [("v0", Layout::FNT4_V0), ("v1", Layout::FNT4_V1)] {
			group.bench_with_input(BenchmarkId::new(name, size), &plane, |b, plane| {
				b.iter(|| black_box(compress(black_box(plane), layout)));
			});
		}
	}

	group.finish();
}

/// Benchmark decompression of glyph-like planes
fn bench_decompress(c: &mut Criterion) {
	let mut group = c.benchmark_group("lz77_decompress");

	for size in [sizes::SMALL_GLYPH, sizes::GLYPH, sizes::LARGE_GLYPH] {
		let plane = generate_glyph_plane(u32::from(size), 3);
		group.throughput(Throughput::Bytes(plane.len() as u64));

		for (name, layout) in [("v0", Layout::FNT4_V0), ("v1", Layout::FNT4_V1)] {
			let Ok(packed) = compress(&plane, layout) else {
				eprintln!("Warning: could not compress {size}x{size} plane");
				continue;
			};
			group.bench_with_input(BenchmarkId::new(name, size), &packed, |b, packed| {
				b.iter(|| black_box(decompress(black_box(packed), layout)));
			});
		}
	}

	group.finish();
}

/// Benchmark the worst case for the matcher: a long run with maximal overlap
fn bench_runs(c: &mut Criterion) {
	let mut group = c.benchmark_group("lz77_runs");
	let run = vec![0u8; 64 * 1024];
	group.throughput(Throughput::Bytes(run.len() as u64));

	group.bench_function("compress_zero_run", |b| {
		b.iter(|| black_box(compress(black_box(&run), Layout::FNT4_V1)));
	});

	group.finish();
}

criterion_group!(benches, bench_compress, bench_decompress, bench_runs);

criterion_main!(benches);
