//! Benchmarks for gzstream.
//!
//! Run with:
//!     cargo bench

use std::io::Write;

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

use gzstream::{Reader, ReaderConfig, Writer, WriterConfig, compress_bytes};

fn sample(size: usize) -> Vec<u8> {
    // Deterministic text-like data with some repetition
    (0..size).map(|i| b"abcdefghij klmnop "[(i * 7 + i / 13) % 18]).collect()
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress");

    for size in [64 * 1024, 1024 * 1024, 10 * 1024 * 1024] {
        let data = sample(size);
        group.throughput(Throughput::Bytes(size as u64));

        for level in [1, 6, 9] {
            group.bench_with_input(
                format!("level{}_{}kb", level, size / 1024),
                &data,
                |b, data| {
                    b.iter(|| {
                        let mut writer =
                            Writer::with_level(Vec::with_capacity(size / 2), level, 64 * 1024)
                                .unwrap();
                        writer.write_all(black_box(data)).unwrap();
                        black_box(writer.finish().unwrap().len())
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompress");
    let size = 1024 * 1024; // 1 MB
    let data = sample(size);
    let packed = compress_bytes(&data, &WriterConfig::default()).unwrap();

    group.throughput(Throughput::Bytes(size as u64));
    for buffer_size in [4 * 1024, 64 * 1024, 512 * 1024] {
        group.bench_function(format!("staging_{}kb", buffer_size / 1024), |b| {
            b.iter(|| {
                let config = ReaderConfig::default().with_buffer_size(buffer_size);
                let mut reader = Reader::with_config(black_box(&packed[..]), config).unwrap();
                let mut buf = vec![0u8; 64 * 1024];
                let mut total = 0usize;
                loop {
                    let progress = reader.read_stream(&mut buf).unwrap();
                    total += progress.written;
                    if progress.finished {
                        break;
                    }
                }
                black_box(total)
            });
        });
    }

    group.finish();
}

fn bench_sync(c: &mut Criterion) {
    let mut group = c.benchmark_group("sync");
    let data = sample(1024 * 1024);

    // Cost of frequent flush points on a record-oriented stream
    for record in [256, 4 * 1024, 64 * 1024] {
        group.bench_function(format!("every_{}b", record), |b| {
            b.iter(|| {
                let mut writer = Writer::new(Vec::new()).unwrap();
                for piece in data.chunks(record) {
                    writer.compress(black_box(piece)).unwrap();
                    writer.sync().unwrap();
                }
                black_box(writer.finish().unwrap().len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compress, bench_decompress, bench_sync);
criterion_main!(benches);
