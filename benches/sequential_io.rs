//! Sequential transfer throughput over the in-memory device.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use oxidirect::buffer::BufferPool;
use oxidirect::device::MemDevice;
use oxidirect::transfer::{drive_read, drive_write};

const PAYLOAD: usize = 4 << 20;

fn bench_drive_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("drive_write");
    group.throughput(Throughput::Bytes(PAYLOAD as u64));

    for buf_size in [4096usize, 65536] {
        group.bench_with_input(
            BenchmarkId::from_parameter(buf_size),
            &buf_size,
            |b, &buf_size| {
                let content = vec![0xA5u8; PAYLOAD];
                let pool = BufferPool::new(buf_size, 4096, 4, 8).unwrap();
                b.iter(|| {
                    let dev = MemDevice::new();
                    let outcome = drive_write(&dev, &pool, 0, black_box(&content)).unwrap();
                    black_box(outcome)
                });
            },
        );
    }
    group.finish();
}

fn bench_drive_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("drive_read");
    group.throughput(Throughput::Bytes(PAYLOAD as u64));

    for buf_size in [4096usize, 65536] {
        group.bench_with_input(
            BenchmarkId::from_parameter(buf_size),
            &buf_size,
            |b, &buf_size| {
                let content = vec![0x5Au8; PAYLOAD];
                let dev = MemDevice::with_content(&content);
                let pool = BufferPool::new(buf_size, 4096, 4, 8).unwrap();
                b.iter(|| {
                    let mut total = 0u64;
                    drive_read(&dev, &pool, 0, |chunk| total += chunk.len() as u64).unwrap();
                    black_box(total)
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_drive_write, bench_drive_read);
criterion_main!(benches);
