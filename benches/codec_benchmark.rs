// SPDX-License-Identifier: MIT
//! Benchmark comparing JSON, XML and Protobuf encode/decode over the sample
//! dataset and a larger synthetic one

use codec_compare::{default_codecs, Codec, Dataset, Record, Schema};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

fn codecs() -> Vec<Box<dyn Codec>> {
    let schema = Schema::parse(include_str!("../proto/employee.proto")).unwrap();
    default_codecs(&schema).unwrap()
}

fn create_test_data() -> Vec<(&'static str, Dataset)> {
    let large = (0..1_000)
        .map(|i| Record::new(i, format!("employee-{i}"), 1_000.0 + i as f64 * 12.5))
        .collect();

    vec![("sample", Dataset::sample()), ("1k_records", large)]
}

fn benchmark_encode(c: &mut Criterion) {
    let codecs = codecs();
    let mut group = c.benchmark_group("encode");

    for (label, dataset) in create_test_data() {
        group.throughput(Throughput::Elements(dataset.len() as u64));
        for codec in &codecs {
            group.bench_with_input(BenchmarkId::new(codec.name(), label), &dataset, |b, d| {
                b.iter(|| codec.encode(black_box(d)).unwrap())
            });
        }
    }
    group.finish();
}

fn benchmark_decode(c: &mut Criterion) {
    let codecs = codecs();
    let mut group = c.benchmark_group("decode");

    for (label, dataset) in create_test_data() {
        group.throughput(Throughput::Elements(dataset.len() as u64));
        for codec in &codecs {
            let bytes = codec.encode(&dataset).unwrap();
            group.bench_with_input(BenchmarkId::new(codec.name(), label), &bytes, |b, bytes| {
                b.iter(|| codec.decode(black_box(bytes)).unwrap())
            });
        }
    }
    group.finish();
}

criterion_group!(benches, benchmark_encode, benchmark_decode);
criterion_main!(benches);
