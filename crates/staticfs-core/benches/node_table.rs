use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use staticfs_core::{FilesystemOps, NodeTable, NodeTableBuilder};
use std::hint::black_box;

/// Benchmark path resolution across different table sizes
fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    for size in [10, 100, 1000, 10000] {
        let table = create_table_with_files(size);
        let path = format!("/data/file_{}.txt", size / 2);

        group.bench_with_input(BenchmarkId::new("hit", size), &path, |b, path| {
            b.iter(|| table.resolve(black_box(path)));
        });

        group.bench_with_input(BenchmarkId::new("miss", size), &size, |b, _| {
            b.iter(|| table.resolve(black_box("/data/missing.txt")));
        });
    }

    group.finish();
}

/// Benchmark reads of different window sizes
fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("read");
    let table = NodeTableBuilder::new()
        .add_file("/large.bin", vec![0xAB_u8; 1024 * 1024])
        .build()
        .unwrap();

    for size in [4096, 65536, 131_072] {
        group.bench_with_input(BenchmarkId::new("window", size), &size, |b, &size| {
            b.iter(|| table.read(black_box("/large.bin"), size, black_box(8192)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark directory listing
fn bench_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("list");

    for size in [10, 100, 1000] {
        let table = create_table_with_files(size);

        group.bench_with_input(BenchmarkId::new("list", size), &size, |b, _| {
            b.iter(|| table.list(black_box("/data")).unwrap());
        });
    }

    group.finish();
}

fn create_table_with_files(count: usize) -> NodeTable {
    let mut builder = NodeTableBuilder::new();
    for i in 0..count {
        builder = builder.add_file(format!("/data/file_{i}.txt"), format!("content of file {i}"));
    }
    builder.build().unwrap()
}

criterion_group!(benches, bench_resolve, bench_read, bench_list);
criterion_main!(benches);
