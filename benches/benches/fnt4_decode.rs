//! Benchmark suite for FNT4 font parsing and glyph decoding
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml --bench fnt4_decode

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fnt4_benches::{generate_test_font, sizes};
use fnt4_types::file::fnt4::{File, Header};
use std::hint::black_box;

/// Benchmark parsing: header, character table and glyph catalog
fn bench_parse(c: &mut Criterion) {
	let mut group = c.benchmark_group("fnt4_parse");

	for glyphs in [sizes::ASCII_FONT, sizes::CJK_FONT] {
		let data = generate_test_font(glyphs, sizes::GLYPH);
		group.throughput(Throughput::Bytes(data.len() as u64));
		group.bench_with_input(BenchmarkId::new("from_bytes", glyphs), &data, |b, data| {
			b.iter(|| black_box(File::from_bytes(black_box(data))));
		});
	}

	let data = generate_test_font(sizes::ASCII_FONT, sizes::GLYPH);
	group.bench_function("parse_header", |b| {
		b.iter(|| black_box(Header::from_bytes(black_box(&data))));
	});

	group.finish();
}

/// Benchmark decoding every glyph of a font, sequentially and on scoped threads
fn bench_decode_all(c: &mut Criterion) {
	let mut group = c.benchmark_group("fnt4_decode_all");
	group.sample_size(20);

	let data = generate_test_font(sizes::CJK_FONT, sizes::GLYPH);
	let Ok(font) = File::from_bytes(&data) else {
		eprintln!("Warning: could not parse generated font");
		return;
	};
	group.throughput(Throughput::Elements(font.glyph_count() as u64));

	group.bench_function("sequential", |b| {
		b.iter(|| {
			for (_, glyph) in font.glyphs() {
				let _ = black_box(glyph.decompress());
			}
		});
	});

	let threads = std::thread::available_parallelism().map_or(4, usize::from);
	group.bench_function("scoped_threads", |b| {
		b.iter(|| {
			let glyphs: Vec<_> = font.glyphs().map(|(_, glyph)| glyph).collect();
			std::thread::scope(|scope| {
				for chunk in glyphs.chunks(glyphs.len().div_ceil(threads)) {
					scope.spawn(move || {
						for glyph in chunk {
							let _ = black_box(glyph.decompress());
						}
					});
				}
			});
		});
	});

	group.finish();
}

criterion_group!(benches, bench_parse, bench_decode_all);

criterion_main!(benches);
