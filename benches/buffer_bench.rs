use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use duet::buffer::LineBuffer;

fn sample_bytes(lines: usize) -> Vec<u8> {
    let mut out = Vec::new();
    for i in 0..lines {
        out.extend_from_slice(format!("line {i} with some text\n").as_bytes());
    }
    out
}

fn buffer_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_parse");

    let bytes = sample_bytes(500);
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("from_bytes_500_lines", |b| {
        b.iter(|| LineBuffer::from_bytes(black_box(&bytes)))
    });

    let buf = LineBuffer::from_bytes(&bytes);
    group.bench_function("to_bytes_500_lines", |b| b.iter(|| black_box(&buf).to_bytes()));

    group.finish();
}

fn buffer_mutation(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_mutation");

    let setup = || LineBuffer::from_bytes(&sample_bytes(500));

    group.bench_function("insert_after_middle", |b| {
        b.iter_batched(
            setup,
            |mut buf| {
                for _ in 0..50 {
                    buf.insert_after(black_box(250), b"inserted line");
                }
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.bench_function("delete_line_middle", |b| {
        b.iter_batched(
            setup,
            |mut buf| {
                for _ in 0..50 {
                    buf.delete_line(black_box(250));
                }
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.bench_function("replace_line", |b| {
        b.iter_batched(
            setup,
            |mut buf| {
                for _ in 0..50 {
                    buf.replace_line(black_box(250), b"replacement text");
                }
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, buffer_parse, buffer_mutation);
criterion_main!(benches);
