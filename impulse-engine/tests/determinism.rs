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
//! Determinism tests
//!
//! Two identical worlds must evolve bit for bit identically. The pyramid
//! is large enough to take the parallel narrow-phase path when the
//! `parallel` feature is enabled.

use impulse_engine::math::Vec2;
use impulse_engine::{Body, BodyHandle, BodySet, JointSet, SolverConfig, World};

fn pyramid(rows: usize) -> (BodySet, World, Vec<BodyHandle>) {
    let mut bodies = BodySet::new();
    let config = SolverConfig::new().with_warm_starting(true);
    let mut world = World::with_config(Vec2::new(0.0, -10.0), config);
    let mut handles = Vec::new();

    let mut ground = Body::with_box(Vec2::new(100.0, 20.0), f32::MAX);
    ground.set_position(Vec2::new(0.0, -10.0));
    handles.push(bodies.insert(ground));

    let mut x = Vec2::new(-6.0, 0.75);
    for row in 0..rows {
        let mut y = x;
        for _ in row..rows {
            let mut body = Body::with_box(Vec2::new(1.0, 1.0), 10.0);
            body.set_position(y);
            handles.push(bodies.insert(body));
            y += Vec2::new(1.125, 0.0);
        }
        x += Vec2::new(0.5625, 2.0);
    }

    for &h in &handles {
        world.add_body(h);
    }
    (bodies, world, handles)
}

fn snapshot(bodies: &BodySet, handles: &[BodyHandle]) -> Vec<(Vec2, f32, Vec2, f32)> {
    handles
        .iter()
        .map(|&h| {
            let b = bodies.get(h).unwrap();
            (b.position(), b.rotation(), b.velocity(), b.angular_velocity())
        })
        .collect()
}

#[test]
fn test_identical_worlds_stay_identical() {
    let (mut bodies_a, mut world_a, handles) = pyramid(12);
    let (mut bodies_b, mut world_b, _) = pyramid(12);
    let mut joints = JointSet::new();
    assert!(handles.len() > 64);

    for _ in 0..60 {
        world_a.step(&mut bodies_a, &mut joints, 1.0 / 60.0);
        world_b.step(&mut bodies_b, &mut joints, 1.0 / 60.0);
    }

    assert_eq!(snapshot(&bodies_a, &handles), snapshot(&bodies_b, &handles));
    assert_eq!(world_a.arbiters(), world_b.arbiters());
}

#[test]
fn test_pyramid_does_not_explode() {
    let (mut bodies, mut world, handles) = pyramid(6);
    let mut joints = JointSet::new();

    for _ in 0..180 {
        world.step(&mut bodies, &mut joints, 1.0 / 60.0);
    }

    for (position, _, velocity, _) in snapshot(&bodies, &handles) {
        assert!(position.is_finite());
        assert!(position.y > -0.5);
        assert!(velocity.length() < 5.0);
    }
}
