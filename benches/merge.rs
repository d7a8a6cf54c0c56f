use std::hint::black_box;

use bounded_merge::presort::presort_blocks;
use bounded_merge::{BlockSorter, Merger, SortOrder};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

const BASE_BLOCK: usize = 32;

fn random_data(len: usize) -> Vec<f32> {
    let mut rng = fastrand::Rng::with_seed(0);
    (0..len).map(|_| rng.f32()).collect()
}

fn sorted_runs(count: usize, len: usize) -> Vec<Vec<f32>> {
    (0..count)
        .map(|_| {
            let mut run = random_data(len);
            run.sort_unstable_by(|a, b| b.total_cmp(a));
            run
        })
        .collect()
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    let merger = Merger::new(SortOrder::Descending);

    for arity in [2usize, 3, 4] {
        let runs = sorted_runs(arity, 4096);
        let slices: Vec<&[f32]> = runs.iter().map(Vec::as_slice).collect();
        let capacity = arity * 4096;
        group.throughput(Throughput::Elements(capacity as u64));
        group.bench_with_input(BenchmarkId::new("tracked", arity), &slices, |b, slices| {
            b.iter(|| black_box(merger.merge(slices, capacity, true)))
        });
        group.bench_with_input(BenchmarkId::new("into", arity), &slices, |b, slices| {
            let mut dst = vec![0.0f32; capacity];
            b.iter(|| black_box(merger.merge_into(slices, &mut dst, false)))
        });
    }
    group.finish();
}

fn bench_top_k(c: &mut Criterion) {
    let mut group = c.benchmark_group("top_k");
    let sorter = BlockSorter::new(Merger::new(SortOrder::Descending));

    for lg_len in [12u32, 16, 20] {
        let len = 1usize << lg_len;
        let mut data = random_data(len);
        presort_blocks(&mut data, BASE_BLOCK, &SortOrder::Descending).unwrap();
        group.throughput(Throughput::Elements(len as u64));

        for k in [16usize, 1000] {
            group.bench_with_input(BenchmarkId::new(format!("k{k}"), len), &data, |b, data| {
                b.iter(|| {
                    let mut buf = data.clone();
                    black_box(sorter.top_k(&mut buf, BASE_BLOCK, len, k))
                })
            });
        }
        group.bench_with_input(BenchmarkId::new("full_sort", len), &data, |b, data| {
            b.iter(|| {
                let mut buf = data.clone();
                black_box(sorter.sort_blocks(&mut buf, BASE_BLOCK, len))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_merge, bench_top_k);
criterion_main!(benches);
