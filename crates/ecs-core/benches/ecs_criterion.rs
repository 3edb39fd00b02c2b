//! Entity registry and storage benchmarks using criterion.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use ecs_core::prelude::*;

#[derive(Clone, Copy)]
struct Position {
    x: f32,
    y: f32,
    z: f32,
}

#[derive(Clone, Copy)]
struct Velocity {
    x: f32,
    y: f32,
    z: f32,
}

fn create_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("create");

    for count in [100, 1000, 10000] {
        group.throughput(Throughput::Elements(count));

        group.bench_with_input(BenchmarkId::new("fresh", count), &count, |b, &count| {
            b.iter(|| {
                let mut entities = Entities::new();
                for _ in 0..count {
                    black_box(entities.create(true));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("recycled", count), &count, |b, &count| {
            let mut entities = Entities::with_capacity(count as usize);
            let handles: Vec<Entity> = (0..count).map(|_| entities.create(true)).collect();
            for &e in &handles {
                entities.kill(e);
            }

            b.iter(|| {
                let reused: Vec<Entity> = (0..count).map(|_| entities.create(true)).collect();
                for e in reused {
                    black_box(entities.kill(e));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("builder", count), &count, |b, &count| {
            b.iter(|| {
                let mut entities = Entities::new();
                let mut positions = VectorStorage::with_capacity(count as usize);
                let mut velocities = VectorStorage::with_capacity(count as usize);
                for i in 0..count {
                    let mut builder = entities.builder();
                    builder
                        .with(&mut positions, Position {
                            x: i as f32,
                            y: 0.0,
                            z: 0.0,
                        })
                        .and_then(|staged| {
                            staged.with(&mut velocities, Velocity {
                                x: 1.0,
                                y: 0.0,
                                z: 0.0,
                            })
                        })
                        .expect("fresh builder");
                    black_box(builder.build().expect("first build"));
                }
            });
        });
    }

    group.finish();
}

fn access_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("access");

    for count in [1000u32, 10000] {
        group.throughput(Throughput::Elements(u64::from(count)));

        let mut positions = VectorStorage::new();
        let mut sparse = MapStorage::new();
        for i in 0..count {
            let position = Position {
                x: i as f32,
                y: 0.0,
                z: 0.0,
            };
            positions.insert(i, position);
            sparse.emplace(i, position);
        }

        group.bench_with_input(BenchmarkId::new("vector_at", count), &count, |b, &count| {
            b.iter(|| {
                for i in 0..count {
                    black_box(positions.at(i).map(|p| p.x).ok());
                }
            });
        });

        group.bench_with_input(
            BenchmarkId::new("vector_unchecked", count),
            &count,
            |b, &count| {
                b.iter(|| {
                    for i in 0..count {
                        black_box(positions[i].x);
                    }
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("map_at", count), &count, |b, &count| {
            b.iter(|| {
                for i in 0..count {
                    black_box(sparse.at(i).map(|p| p.x).ok());
                }
            });
        });
    }

    group.finish();
}

fn erase_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("erase");

    for count in [1000u32, 10000] {
        group.throughput(Throughput::Elements(u64::from(count)));

        group.bench_with_input(BenchmarkId::new("bulk", count), &count, |b, &count| {
            b.iter_batched(
                || {
                    let mut entities = Entities::new();
                    let mut positions = VectorStorage::new();
                    let handles: Vec<Entity> = (0..count)
                        .map(|i| {
                            let e = entities.create(true);
                            positions.insert(e.index(), Position {
                                x: i as f32,
                                y: 0.0,
                                z: 0.0,
                            });
                            e
                        })
                        .collect();
                    (positions, handles)
                },
                |(mut positions, handles)| {
                    positions.erase(&handles);
                    black_box(positions.len());
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    create_benchmarks,
    access_benchmarks,
    erase_benchmarks
);
criterion_main!(benches);
