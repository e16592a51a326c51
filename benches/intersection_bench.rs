use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use hier_mesh::prelude::*;

fn refined_grid(n: usize) -> Mesh {
    let mut mesh = triangle_grid(n, n, [0.0, 0.0], [1.0, 1.0]).expect("grid");
    // refine every other coarse triangle to get non-conforming interfaces
    let coarse: Vec<ElementId> = mesh.level(0).expect("level 0").elements().to_vec();
    for e in coarse.into_iter().step_by(2) {
        mesh.mark(e, MarkState::Refine).expect("mark");
    }
    mesh.adapt().expect("adapt");
    mesh.update_indices().expect("indices");
    mesh
}

fn bench_intersections(c: &mut Criterion) {
    let mut group = c.benchmark_group("intersections");

    for &n in &[16usize, 64usize] {
        let mesh = refined_grid(n);
        let leaves: Vec<ElementId> = mesh.leaf_elements().collect();
        let coarse: Vec<ElementId> = mesh.level(0).expect("level 0").elements().to_vec();

        group.bench_with_input(BenchmarkId::new("leaf", n), &n, |b, _| {
            b.iter(|| {
                let mut count = 0usize;
                for &e in &leaves {
                    count += mesh.leaf_intersections(e).expect("leaf").count();
                }
                black_box(count)
            })
        });

        group.bench_with_input(BenchmarkId::new("level0", n), &n, |b, _| {
            b.iter(|| {
                let mut count = 0usize;
                for &e in &coarse {
                    count += mesh.level_intersections(e).expect("level").count();
                }
                black_box(count)
            })
        });

        group.bench_with_input(BenchmarkId::new("leaf_normals", n), &n, |b, _| {
            b.iter(|| {
                let mut acc = 0.0;
                for &e in &leaves {
                    for is in mesh.leaf_intersections(e).expect("leaf") {
                        acc += is.integration_outer_normal(0.5).expect("normal")[0];
                    }
                }
                black_box(acc)
            })
        });
    }

    group.finish();
}

fn bench_update_indices(c: &mut Criterion) {
    let mesh = refined_grid(64);
    c.bench_function("update_indices/64", |b| {
        b.iter(|| {
            let mut m = mesh.clone();
            m.update_indices().expect("indices");
            black_box(m.leaf_size(0).expect("size"))
        })
    });
}

criterion_group!(benches, bench_intersections, bench_update_indices);
criterion_main!(benches);
