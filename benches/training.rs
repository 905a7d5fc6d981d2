use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use molino::RandomForestRegressor;
use ndarray::{Array1, Array2};
use rand::prelude::*;

fn regression_data(n_rows: usize, n_features: usize) -> (Array2<f64>, Array1<f64>) {
    let mut rng = StdRng::seed_from_u64(42);

    let x = Array2::from_shape_fn((n_rows, n_features), |_| rng.gen::<f64>() * 10.0);
    let y = Array1::from_shape_fn(n_rows, |i| {
        x.row(i).sum() + rng.gen::<f64>() * 0.1
    });

    (x, y)
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit");
    group.sample_size(10); // fewer samples for training benchmarks

    for n_rows in [500, 2000].iter() {
        let (x, y) = regression_data(*n_rows, 8);

        group.bench_with_input(BenchmarkId::new("forest", n_rows), &(x, y), |b, (x, y)| {
            b.iter(|| {
                let mut rf = RandomForestRegressor::new(50).with_random_state(42);
                rf.fit(black_box(x), black_box(y)).unwrap();
                rf.n_trees()
            })
        });
    }

    group.finish();
}

fn bench_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict");

    let (x, y) = regression_data(2000, 8);
    let mut rf = RandomForestRegressor::new(50).with_random_state(42);
    rf.fit(&x, &y).unwrap();

    for n_rows in [1, 100, 1000].iter() {
        let (batch, _) = regression_data(*n_rows, 8);

        group.bench_with_input(BenchmarkId::new("forest", n_rows), &batch, |b, batch| {
            b.iter(|| rf.predict(black_box(batch)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fit, bench_predict);
criterion_main!(benches);
