//! Filename resolution throughput.

use std::hint::black_box;
use std::path::PathBuf;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use media_shelf::resolve::tags::DEFAULT_TAGS;
use media_shelf::resolve::{Resolver, TagDictionary, parse_movie};

const FILE_NAMES: [(&str, &str); 5] = [
    ("scene", "The.Matrix.1999.1080p.BluRay.x264-GROUP.mkv"),
    ("plain", "Some Random Rip.mkv"),
    ("bracketed", "[Group] Movie Title [2005] {Extended}.mp4"),
    ("episode", "Breaking.Bad.S05E14.1080p.WEB-DL.DDP5.1.H.264-NTb.mkv"),
    ("unknown", "1080p.x264.mkv"),
];

fn bench_parse_movie(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_movie");
    for (name, file_name) in FILE_NAMES {
        group.bench_with_input(BenchmarkId::from_parameter(name), file_name, |b, file_name| {
            b.iter(|| parse_movie(black_box(file_name), &DEFAULT_TAGS));
        });
    }
    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let resolver = Resolver::new(PathBuf::from("/library"), TagDictionary::default());
    let mut group = c.benchmark_group("resolve");
    for (name, file_name) in FILE_NAMES {
        group.bench_with_input(BenchmarkId::from_parameter(name), file_name, |b, file_name| {
            b.iter(|| resolver.resolve(black_box(file_name)));
        });
    }
    group.finish();
}

fn bench_tag_dictionary(c: &mut Criterion) {
    let extra: Vec<String> = (0..50).map(|i| format!("GRP{i}")).collect();
    c.bench_function("tag_dictionary_build", |b| {
        b.iter(|| TagDictionary::with_extra_tags(black_box(&extra)));
    });
}

criterion_group!(benches, bench_parse_movie, bench_resolve, bench_tag_dictionary);
criterion_main!(benches);
