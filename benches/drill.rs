use std::num::NonZeroUsize;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use drill::testing::*;
use drill::{default_window_size, drill};

pub fn drill_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("drill");
    group.sample_size(10);
    for size_power in [16, 20, 24] {
        let len: u64 = 1 << size_power;
        let size_id = bytesize::ByteSize(len).to_string_as(true);
        group.throughput(Throughput::Bytes(len));
        // Nothing to punch, so this is all reading and comparing.
        let data_file = write_random_tempfile(len).unwrap();
        group.bench_with_input(BenchmarkId::new("data", &size_id), &data_file, |b, file| {
            b.iter(|| drill(file.as_file(), default_window_size()).unwrap())
        });
        // Every window is punched. After the first iteration they're punched again over holes.
        let zeros_file = write_segments_tempfile(&[Segment::Zeros(len)]).unwrap();
        group.bench_with_input(BenchmarkId::new("zeros", &size_id), &zeros_file, |b, file| {
            b.iter(|| match drill(file.as_file(), default_window_size()) {
                Err(err) if err.is_unsupported() => Default::default(),
                res => res.unwrap(),
            })
        });
        // Window size against an in-memory target, without any syscalls.
        let target = FakeTarget::new(vec![0; len as usize]);
        for window_kib in [4, 32, 1024] {
            let window_size = NonZeroUsize::new(window_kib * 1024).unwrap();
            group.bench_with_input(
                BenchmarkId::new(format!("in_memory_{}KiB", window_kib), &size_id),
                &target,
                |b, target| b.iter(|| drill(target, window_size).unwrap()),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, drill_benchmark);
criterion_main!(benches);
