//! Criterion benchmarks for the annealing engine and schedule estimator.
//!
//! Uses the sphere function (minimize sum(x_i^2)) to measure pure engine
//! overhead independent of any domain.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use sim_anneal::{
    AnnealConfig, AnnealModel, AnnealRunner, EstimatorConfig, MemoryStore, NullProgress, Schedule,
    ScheduleEstimator,
};

struct Sphere {
    dim: usize,
}

impl AnnealModel for Sphere {
    type State = Vec<f64>;

    fn apply_move<R: Rng>(&self, state: &mut Vec<f64>, rng: &mut R) -> f64 {
        let i = rng.random_range(0..self.dim);
        let old = state[i];
        state[i] += rng.random_range(-0.5..0.5);
        state[i] * state[i] - old * old
    }

    fn energy(&self, state: &Vec<f64>) -> f64 {
        state.iter().map(|x| x * x).sum()
    }
}

fn initial_state(dim: usize) -> Vec<f64> {
    (0..dim).map(|i| (i % 10) as f64 - 5.0).collect()
}

fn bench_runner_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("runner_sphere");
    group.sample_size(10);

    for &dim in &[10, 50, 100] {
        let model = Sphere { dim };
        let config = AnnealConfig::default()
            .with_schedule(Schedule {
                tmax: 10.0,
                tmin: 0.01,
                steps_per_temperature: 100,
            })
            .with_cooling_steps(20)
            .with_seed(42);

        group.bench_with_input(BenchmarkId::from_parameter(dim), &(model, config), |b, (m, c)| {
            b.iter(|| {
                let result = AnnealRunner::run_with::<_, _, MemoryStore<Vec<f64>>>(
                    black_box(m),
                    black_box(initial_state(m.dim)),
                    black_box(c),
                    &mut NullProgress,
                    None,
                );
                black_box(result)
            })
        });
    }
    group.finish();
}

fn bench_estimator_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimator_sphere");
    group.sample_size(10);

    for &dim in &[10, 50] {
        let model = Sphere { dim };
        let config = EstimatorConfig::default()
            .with_steps_per_probe(100)
            .with_seed(42);

        group.bench_with_input(BenchmarkId::from_parameter(dim), &(model, config), |b, (m, c)| {
            b.iter(|| {
                let outcome = ScheduleEstimator::estimate_with(
                    black_box(m),
                    black_box(initial_state(m.dim)),
                    black_box(c),
                    &mut NullProgress,
                );
                black_box(outcome)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_runner_sphere, bench_estimator_sphere);
criterion_main!(benches);
