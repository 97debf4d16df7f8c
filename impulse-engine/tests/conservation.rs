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
//! Conservation tests for contact impulses
//!
//! Contact impulses are applied in equal and opposite pairs, so without
//! gravity or external forces the total linear momentum of a world must
//! not change, whatever the solver settings.

use impulse_engine::math::Vec2;
use impulse_engine::{Body, BodyHandle, BodySet, Joint, JointSet, SolverConfig, World};

fn momentum(bodies: &BodySet, handles: &[BodyHandle]) -> Vec2 {
    handles.iter().fold(Vec2::ZERO, |acc, &h| {
        let b = bodies.get(h).unwrap();
        acc + b.velocity() * b.mass()
    })
}

fn head_on(config: SolverConfig) -> (BodySet, World, Vec<BodyHandle>) {
    let mut bodies = BodySet::new();
    let mut world = World::with_config(Vec2::ZERO, config);

    let mut light = Body::with_box(Vec2::new(1.0, 1.0), 1.0);
    light.set_position(Vec2::new(-1.0, 0.0));
    light.set_velocity(Vec2::new(4.0, 0.0));
    let mut heavy = Body::with_box(Vec2::new(1.0, 1.0), 3.0);
    heavy.set_position(Vec2::new(1.0, 0.1));
    heavy.set_velocity(Vec2::new(-2.0, 0.0));

    let handles = vec![bodies.insert(light), bodies.insert(heavy)];
    for &h in &handles {
        world.add_body(h);
    }
    (bodies, world, handles)
}

#[test]
fn test_linear_momentum_conserved_through_collision() {
    let configs = [
        SolverConfig::new(),
        SolverConfig::new().with_warm_starting(true),
        SolverConfig::new().with_accumulate_impulses(false),
        SolverConfig::new().with_position_correction(false),
    ];

    for config in configs {
        let (mut bodies, mut world, handles) = head_on(config.clone());
        let mut joints = JointSet::new();
        let initial = momentum(&bodies, &handles);

        let mut touched = false;
        for _ in 0..120 {
            world.step(&mut bodies, &mut joints, 1.0 / 60.0);
            touched |= world.arbiter_count() > 0;
            let p = momentum(&bodies, &handles);
            assert!((p - initial).length() < 1e-3, "{:?}: {:?} vs {:?}", config, p, initial);
        }
        assert!(touched, "{:?}: boxes never collided", config);
    }
}

#[test]
fn test_collision_is_inelastic() {
    let (mut bodies, mut world, handles) = head_on(SolverConfig::new());
    let mut joints = JointSet::new();
    let kinetic = |bodies: &BodySet| -> f32 {
        handles
            .iter()
            .map(|&h| {
                let b = bodies.get(h).unwrap();
                0.5 * b.mass() * b.velocity().dot(b.velocity())
                    + 0.5 * b.inertia() * b.angular_velocity() * b.angular_velocity()
            })
            .sum()
    };

    let before = kinetic(&bodies);
    for _ in 0..120 {
        world.step(&mut bodies, &mut joints, 1.0 / 60.0);
    }
    assert!(kinetic(&bodies) < before);
}

#[test]
fn test_joint_conserves_momentum() {
    let mut bodies = BodySet::new();
    let mut joints = JointSet::new();
    let mut world = World::new(Vec2::ZERO, 10);

    let mut a = Body::with_box(Vec2::new(0.5, 0.5), 2.0);
    a.set_velocity(Vec2::new(0.0, 3.0));
    let mut b = Body::with_box(Vec2::new(0.5, 0.5), 1.0);
    b.set_position(Vec2::new(2.0, 0.0));
    b.set_velocity(Vec2::new(-1.0, 0.0));
    let handles = vec![bodies.insert(a), bodies.insert(b)];
    for &h in &handles {
        world.add_body(h);
    }
    let joint = Joint::attach(&bodies, handles[0], handles[1], Vec2::new(1.0, 0.0)).unwrap();
    world.add_joint(joints.insert(joint));

    let initial = momentum(&bodies, &handles);
    for _ in 0..120 {
        world.step(&mut bodies, &mut joints, 1.0 / 60.0);
    }
    assert!((momentum(&bodies, &handles) - initial).length() < 1e-3);
}
