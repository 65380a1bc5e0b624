use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use slp_matrix::GfMatrix;
use slp_solvers::{boyar, paar, slp_heuristic, RunControl};

fn circulant(n: usize, taps: usize) -> GfMatrix {
    let rows: Vec<Vec<u8>> = (0..n)
        .map(|i| (0..n).map(|j| u8::from((0..taps).any(|t| (i + t) % n == j))).collect())
        .collect();
    GfMatrix::from_bits(&rows).unwrap()
}

fn bench_solvers(c: &mut Criterion) {
    let mut group = c.benchmark_group("diffusion_circulant");
    let ctl = RunControl::new();

    for &n in &[4usize, 8, 12] {
        let m = circulant(n, 3);
        group.bench_with_input(BenchmarkId::new("slp_heuristic", n), &m, |b, m| {
            b.iter(|| slp_heuristic(m, &ctl).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("boyar", n), &m, |b, m| {
            b.iter(|| boyar(m, 10, &ctl).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("paar", n), &m, |b, m| {
            b.iter(|| paar(m, &ctl).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_solvers);
criterion_main!(benches);
