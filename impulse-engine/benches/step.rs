// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Benchmarks for the world step
//!
//! These benchmarks measure:
//! - Full step cost for pyramids of increasing size
//! - Broadphase cost on its own, including arbiter merging

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use impulse_engine::math::Vec2;
use impulse_engine::{Body, BodySet, JointSet, SolverConfig, World};

// Pyramid of unit boxes on a static ground, as in the classic demo
fn setup_pyramid(rows: usize) -> (BodySet, World) {
    let mut bodies = BodySet::new();
    let config = SolverConfig::new().with_warm_starting(true);
    let mut world = World::with_config(Vec2::new(0.0, -10.0), config);

    let mut ground = Body::with_box(Vec2::new(100.0, 20.0), f32::MAX);
    ground.set_position(Vec2::new(0.0, -10.0));
    world.add_body(bodies.insert(ground));

    let mut x = Vec2::new(-6.0, 0.75);
    for row in 0..rows {
        let mut y = x;
        for _ in row..rows {
            let mut body = Body::with_box(Vec2::new(1.0, 1.0), 10.0);
            body.set_position(y);
            world.add_body(bodies.insert(body));
            y += Vec2::new(1.125, 0.0);
        }
        x += Vec2::new(0.5625, 2.0);
    }

    (bodies, world)
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_step");

    for rows in [5, 10, 20].iter() {
        let (mut bodies, mut world) = setup_pyramid(*rows);
        let mut joints = JointSet::new();
        // Settle into resting contact so the benchmark sees a steady state
        for _ in 0..60 {
            world.step(&mut bodies, &mut joints, 1.0 / 60.0);
        }

        group.throughput(Throughput::Elements(world.body_count() as u64));
        group.bench_with_input(BenchmarkId::new("pyramid", rows), rows, |b, _| {
            b.iter(|| {
                world.step(&mut bodies, &mut joints, black_box(1.0 / 60.0));
            });
        });
    }

    group.finish();
}

fn bench_broadphase(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadphase");

    for rows in [10, 20].iter() {
        let (bodies, mut world) = setup_pyramid(*rows);
        group.throughput(Throughput::Elements(world.body_count() as u64));
        group.bench_with_input(BenchmarkId::new("pyramid", rows), rows, |b, _| {
            b.iter(|| {
                world.broadphase(black_box(&bodies));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_step, bench_broadphase);
criterion_main!(benches);
