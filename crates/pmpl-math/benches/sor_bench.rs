use criterion::{criterion_group, criterion_main, Criterion};
use pmpl_math::analytic::laplace_reference;
use pmpl_math::percolation::PorousGrid;
use pmpl_math::random_walk::{estimate_potential, Lattice};
use pmpl_math::rng::seeded;
use pmpl_math::sor::{sor_solve, sor_sweep, LaplaceProblem, SorConfig};
use std::hint::black_box;

fn bench_sor_sweep(c: &mut Criterion) {
    for nodes in [65usize, 201] {
        let problem = LaplaceProblem::dirichlet(nodes, laplace_reference).unwrap();
        let mut phi = problem.phi.clone();
        c.bench_function(&format!("sor_sweep_{nodes}x{nodes}"), |b| {
            b.iter(|| sor_sweep(&mut phi, &problem.rhs, problem.step, 1.84))
        });
    }
}

fn bench_sor_solve_vs_gauss_seidel(c: &mut Criterion) {
    let problem = LaplaceProblem::dirichlet(41, laplace_reference).unwrap();

    let mut group = c.benchmark_group("sor_solve_41x41");
    group.sample_size(10);
    for omega in [1.0, 1.5, 1.84] {
        group.bench_function(format!("omega_{omega}"), |b| {
            b.iter(|| {
                let solution = sor_solve(
                    &problem,
                    SorConfig {
                        omega,
                        ..SorConfig::default()
                    },
                )
                .unwrap();
                black_box(solution.steps);
            })
        });
    }
    group.finish();
}

fn bench_random_walk(c: &mut Criterion) {
    let lattice = Lattice::unit(101).unwrap();
    let mut rng = seeded(Some(42), 0);
    c.bench_function("random_walk_101_x100_walkers", |b| {
        b.iter(|| {
            estimate_potential(&lattice, lattice.centre(), 100, laplace_reference, &mut rng)
                .unwrap()
        })
    });
}

fn bench_percolation(c: &mut Criterion) {
    let mut grid = PorousGrid::new(50, 50).unwrap();
    let mut rng = seeded(Some(42), 1);
    c.bench_function("percolation_50x50_bfs", |b| {
        b.iter(|| {
            grid.fill_randomly(0.4, &mut rng);
            black_box(grid.path_exists())
        })
    });
}

criterion_group!(
    benches,
    bench_sor_sweep,
    bench_sor_solve_vs_gauss_seidel,
    bench_random_walk,
    bench_percolation
);
criterion_main!(benches);
