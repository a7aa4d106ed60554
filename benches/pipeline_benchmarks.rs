/// Performance benchmarks for writhe-map construction and plectoneme detection
///
/// Run with: cargo bench
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndarray::Array2;
use plecfinder::geometry::Point3;
use plecfinder::{FinderConfig, PlecFinder, SegmentWritheMapper, WritheMapper, WritheMatrix};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

/// Random walk of unit steps
fn random_walk(num_points: usize, seed: u64) -> Vec<Point3> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut p = [0.0; 3];
    let mut pts = Vec::with_capacity(num_points);
    pts.push(p);
    for _ in 1..num_points {
        let phi: f64 = rng.gen_range(0.0..2.0 * PI);
        let cos_theta: f64 = rng.gen_range(-1.0..1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
        p = [
            p[0] + sin_theta * phi.cos(),
            p[1] + sin_theta * phi.sin(),
            p[2] + cos_theta,
        ];
        pts.push(p);
    }
    pts
}

/// Writhe map with `loops` side by side antidiagonal loop signatures
fn banded_map(n: usize, loops: usize) -> WritheMatrix {
    let mut data = Array2::zeros((n, n));
    let width = n / loops;
    for l in 0..loops {
        let (lo, hi) = (l * width + 2, (l + 1) * width - 3);
        for i in lo..=hi {
            let j = lo + hi - i;
            if i != j {
                data[[i, j]] = 0.1;
            }
        }
    }
    WritheMatrix::from_array(data).unwrap()
}

fn bench_writhe_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("writhe_map");
    group.sample_size(10);

    let mapper = SegmentWritheMapper::new();
    for size in [100, 250, 500].iter() {
        let conf = random_walk(*size, 42);
        group.throughput(Throughput::Elements((*size * *size) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &conf, |b, conf| {
            b.iter(|| mapper.writhe_map(black_box(conf)).unwrap())
        });
    }
    group.finish();
}

fn bench_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("detection");

    let finder = PlecFinder::new(FinderConfig::new(0.05, 0.5));
    for (size, loops) in [(200, 2), (1000, 8), (2000, 16)].iter() {
        let wm = banded_map(*size, *loops);
        group.bench_with_input(
            BenchmarkId::new("banded", format!("{size}x{loops}")),
            &wm,
            |b, wm| b.iter(|| finder.find_in_matrix(black_box(wm), 1.0).unwrap()),
        );
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let finder = PlecFinder::new(FinderConfig::new(0.05, 0.5));
    let frames: Vec<Vec<Point3>> = (0..8).map(|seed| random_walk(200, seed)).collect();

    c.bench_function("batch_8x200", |b| {
        b.iter(|| finder.find_plecs_batch(black_box(&frames)).unwrap())
    });
}

criterion_group!(benches, bench_writhe_map, bench_detection, bench_end_to_end);
criterion_main!(benches);
