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
//! Edge case tests for stepping
//!
//! Tests degenerate time steps, stale handles and unusual membership

use impulse_engine::math::Vec2;
use impulse_engine::{Body, BodyHandle, BodySet, Joint, JointSet, SolverConfig, World};

fn falling_box(bodies: &mut BodySet, world: &mut World) -> BodyHandle {
    let mut body = Body::with_box(Vec2::new(1.0, 1.0), 1.0);
    body.set_position(Vec2::new(0.0, 5.0));
    let handle = bodies.insert(body);
    world.add_body(handle);
    handle
}

#[test]
fn test_empty_world_step() {
    let mut bodies = BodySet::new();
    let mut joints = JointSet::new();
    let mut world = World::new(Vec2::new(0.0, -10.0), 10);
    world.step(&mut bodies, &mut joints, 1.0 / 60.0);
    assert_eq!(world.arbiter_count(), 0);
}

#[test]
fn test_zero_timestep_is_a_no_op_for_free_bodies() {
    let mut bodies = BodySet::new();
    let mut joints = JointSet::new();
    let mut world = World::new(Vec2::new(0.0, -10.0), 10);
    let body = falling_box(&mut bodies, &mut world);

    world.step(&mut bodies, &mut joints, 0.0);

    let b = bodies.get(body).unwrap();
    assert_eq!(b.position(), Vec2::new(0.0, 5.0));
    assert_eq!(b.velocity(), Vec2::ZERO);
}

#[test]
fn test_negative_timestep_does_not_panic() {
    let mut bodies = BodySet::new();
    let mut joints = JointSet::new();
    let mut world = World::new(Vec2::new(0.0, -10.0), 10);
    let body = falling_box(&mut bodies, &mut world);

    world.step(&mut bodies, &mut joints, -0.1);

    // Integration runs backwards; no correction bias is applied
    let b = bodies.get(body).unwrap();
    assert!((b.velocity().y - 1.0).abs() < 1e-6);
    assert!(b.position().is_finite());
}

#[test]
fn test_zero_iterations_skip_contact_solve() {
    let mut bodies = BodySet::new();
    let mut joints = JointSet::new();
    let mut world = World::new(Vec2::new(0.0, -10.0), 0);
    let mut ground = Body::with_box(Vec2::new(10.0, 1.0), f32::MAX);
    ground.set_position(Vec2::new(0.0, -0.5));
    let ground = bodies.insert(ground);
    world.add_body(ground);
    let mut block = Body::with_box(Vec2::new(1.0, 1.0), 1.0);
    block.set_position(Vec2::new(0.0, 0.49));
    let block = bodies.insert(block);
    world.add_body(block);

    world.step(&mut bodies, &mut joints, 0.1);

    assert_eq!(world.arbiter_count(), 1);
    assert!((bodies.get(block).unwrap().velocity().y + 1.0).abs() < 1e-6);
}

#[test]
fn test_stale_body_in_world_is_skipped() {
    let mut bodies = BodySet::new();
    let mut joints = JointSet::new();
    let mut world = World::new(Vec2::new(0.0, -10.0), 10);
    let gone = falling_box(&mut bodies, &mut world);
    let kept = falling_box(&mut bodies, &mut world);

    // Removed behind the world's back
    bodies.remove(gone);
    world.step(&mut bodies, &mut joints, 0.1);

    assert_eq!(world.body_count(), 2);
    assert!((bodies.get(kept).unwrap().velocity().y + 1.0).abs() < 1e-6);
}

#[test]
fn test_stale_joint_is_skipped() {
    let mut bodies = BodySet::new();
    let mut joints = JointSet::new();
    let mut world = World::new(Vec2::ZERO, 10);
    let a = falling_box(&mut bodies, &mut world);
    let b = falling_box(&mut bodies, &mut world);
    bodies.get_mut(b).unwrap().set_position(Vec2::new(3.0, 5.0));

    let joint = joints.insert(Joint::attach(&bodies, a, b, Vec2::new(1.5, 5.0)).unwrap());
    world.add_joint(joint);
    joints.remove(joint);
    bodies.remove(b);

    world.step(&mut bodies, &mut joints, 0.1);
    assert_eq!(bodies.get(a).unwrap().position(), Vec2::new(0.0, 5.0));
}

#[test]
fn test_static_only_world_creates_no_arbiters() {
    let mut bodies = BodySet::new();
    let mut joints = JointSet::new();
    let mut world = World::new(Vec2::new(0.0, -10.0), 10);
    for x in [0.0, 0.5, 1.0] {
        let mut body = Body::new();
        body.set_position(Vec2::new(x, 0.0));
        world.add_body(bodies.insert(body));
    }
    world.step(&mut bodies, &mut joints, 0.1);
    assert_eq!(world.arbiter_count(), 0);
}

#[test]
fn test_static_body_moved_by_velocity() {
    // Static bodies still integrate a velocity set by the host
    let mut bodies = BodySet::new();
    let mut joints = JointSet::new();
    let mut world = World::new(Vec2::new(0.0, -10.0), 10);
    let mut platform = Body::new();
    platform.set_velocity(Vec2::new(1.0, 0.0));
    let platform = bodies.insert(platform);
    world.add_body(platform);

    world.step(&mut bodies, &mut joints, 0.5);

    let p = bodies.get(platform).unwrap();
    assert_eq!(p.position(), Vec2::new(0.5, 0.0));
    assert_eq!(p.velocity(), Vec2::new(1.0, 0.0));
}

#[test]
fn test_remove_unknown_members() {
    let mut bodies = BodySet::new();
    let mut joints = JointSet::new();
    let mut world = World::with_config(Vec2::ZERO, SolverConfig::default());
    let a = bodies.insert(Body::new());
    let b = bodies.insert(Body::with_box(Vec2::new(1.0, 1.0), 1.0));
    let joint = joints.insert(Joint::attach(&bodies, a, b, Vec2::ZERO).unwrap());

    assert!(world.remove_body(a, &joints).is_none());
    assert!(!world.remove_joint(joint));
}

#[test]
fn test_contact_between_bodies_made_static_stays_finite() {
    let mut bodies = BodySet::new();
    let mut joints = JointSet::new();
    let mut world = World::new(Vec2::new(0.0, -10.0), 10);
    let mut ground = Body::with_box(Vec2::new(10.0, 1.0), f32::MAX);
    ground.set_position(Vec2::new(0.0, -0.5));
    let ground = bodies.insert(ground);
    let mut block = Body::with_box(Vec2::new(1.0, 1.0), 1.0);
    block.set_position(Vec2::new(0.0, 0.49));
    let block = bodies.insert(block);
    world.add_body(ground);
    world.add_body(block);

    world.step(&mut bodies, &mut joints, 1.0 / 60.0);
    assert_eq!(world.arbiter_count(), 1);

    let b = bodies.get_mut(block).unwrap();
    b.set_mass(0.0);
    b.set_inertia(0.0);
    b.set_velocity(Vec2::new(0.0, -1.0));

    world.step(&mut bodies, &mut joints, 1.0 / 60.0);

    // The pair is no longer evaluated but its arbiter is kept
    assert_eq!(world.arbiter_count(), 1);
    let b = bodies.get(block).unwrap();
    assert_eq!(b.velocity(), Vec2::new(0.0, -1.0));
    assert!(b.position().is_finite());
    assert_eq!(bodies.get(ground).unwrap().velocity(), Vec2::ZERO);
}
