//! Benchmarks for Gram matrix construction and LS-SVM training

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lssvm::kernel::{gram_matrix, KernelSpec};
use lssvm::model::{BinaryModel, MulticlassModel, Strategy};
use lssvm::SolverConfig;
use ndarray::{Array1, Array2};

fn dataset(n_samples: usize, n_features: usize) -> Array2<f64> {
    Array2::from_shape_fn((n_samples, n_features), |(i, j)| {
        ((i * 31 + j * 17) as f64 * 0.37).sin()
    })
}

fn bench_gram_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("gram_matrix");

    let kernels = [
        KernelSpec::linear(),
        KernelSpec::rbf(1.0).unwrap(),
        KernelSpec::polynomial(3, 1.0).unwrap(),
    ];

    for size in [64, 256, 512].iter() {
        let x = dataset(*size, 10);
        for kernel in &kernels {
            group.bench_with_input(BenchmarkId::new(kernel.name(), size), size, |b, _| {
                b.iter(|| gram_matrix(black_box(kernel), black_box(x.view())).unwrap());
            });
        }
    }

    group.finish();
}

fn bench_binary_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("binary_fit");

    for size in [50, 200, 500].iter() {
        let x = dataset(*size, 5);
        let y = Array1::from_iter((0..*size).map(|i| if x[[i, 0]] >= 0.0 { 1.0 } else { -1.0 }));

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut model = BinaryModel::new(KernelSpec::rbf(1.0).unwrap(), 10.0).unwrap();
                model.fit(black_box(x.view()), black_box(y.view())).unwrap();
            });
        });
    }

    group.finish();
}

fn bench_multiclass_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiclass_fit");

    let x = dataset(300, 4);
    let labels: Vec<usize> = (0..300).map(|i| i % 5).collect();

    for strategy in [Strategy::OneVsOne, Strategy::OneVsRest] {
        group.bench_function(strategy.name(), |b| {
            b.iter(|| {
                MulticlassModel::fit(
                    black_box(x.view()),
                    &labels,
                    KernelSpec::rbf(1.0).unwrap(),
                    1.0,
                    SolverConfig::default(),
                    strategy,
                )
                .unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_gram_matrix, bench_binary_fit, bench_multiclass_fit);
criterion_main!(benches);
