use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use visual_hull_carve::{carve, CarveParams, LatticeParams, VoxelLattice};
use visual_hull_core::{ImageSize, MaskImage, ProjectionMatrix};

const IMAGE_SIDE: usize = 256;

/// Ring of pinhole cameras around the z axis, all looking at the origin.
fn ring_cameras(count: usize) -> Vec<ProjectionMatrix> {
    let f = 400.0;
    let c = IMAGE_SIDE as f64 / 2.0;
    let d = 2.0;
    (0..count)
        .map(|n| {
            let a = n as f64 / count as f64 * std::f64::consts::TAU;
            let (s, co) = a.sin_cos();
            // rows of K [R | t] with the camera on the xy circle of radius d
            ProjectionMatrix::from_array([
                [f * -s + c * -co, f * co + c * -s, 0.0, c * d],
                [c * -co, c * -s, -f, c * d],
                [-co, -s, 0.0, d],
            ])
        })
        .collect()
}

fn disc(side: usize, radius: f64) -> MaskImage {
    let mut mask = MaskImage::zeros(side, side).expect("mask");
    let c = side as f64 / 2.0;
    for y in 0..side {
        for x in 0..side {
            let (dx, dy) = (x as f64 - c, y as f64 - c);
            mask.set(x, y, dx * dx + dy * dy <= radius * radius);
        }
    }
    mask
}

fn bench_carve(c: &mut Criterion) {
    let size = ImageSize::new(IMAGE_SIDE, IMAGE_SIDE);
    let cameras = ring_cameras(12);
    let silhouettes = vec![disc(IMAGE_SIDE, 70.0); cameras.len()];
    let params = CarveParams::default();

    let mut group = c.benchmark_group("carve");
    for resolution in [32usize, 64] {
        let lattice = VoxelLattice::new(&LatticeParams {
            resolution,
            scale_divisor: 2.0,
            offset: [0.0; 3],
            ..LatticeParams::default()
        })
        .expect("lattice");
        group.bench_with_input(
            BenchmarkId::from_parameter(resolution),
            &lattice,
            |b, lattice| {
                b.iter(|| {
                    carve(
                        black_box(&cameras),
                        black_box(&silhouettes),
                        lattice,
                        size,
                        &params,
                    )
                    .expect("carve")
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_carve);
criterion_main!(benches);
