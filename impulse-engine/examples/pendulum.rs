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
//! Pendulum demo
//!
//! Hangs a box from a static pivot with a point joint and prints the
//! swing. Compares a rigid joint against a soft one.

use impulse_engine::math::Vec2;
use impulse_engine::{Body, BodySet, Joint, JointSet, SolverConfig, World};
use tracing::info;

fn swing(softness: f32) -> (f32, f32) {
    let mut bodies = BodySet::new();
    let mut joints = JointSet::new();
    let config = SolverConfig::new().with_warm_starting(true);
    let mut world = World::with_config(Vec2::new(0.0, -10.0), config);

    let mut pivot = Body::with_box(Vec2::new(0.5, 0.5), f32::MAX);
    pivot.set_position(Vec2::new(0.0, 10.0));
    let pivot = bodies.insert(pivot);

    let mut bob = Body::with_box(Vec2::new(1.0, 1.0), 100.0);
    bob.set_position(Vec2::new(9.0, 11.0));
    let bob = bodies.insert(bob);

    world.add_body(pivot);
    world.add_body(bob);

    let Some(mut joint) = Joint::attach(&bodies, pivot, bob, Vec2::new(0.0, 11.0)) else {
        return (0.0, 0.0);
    };
    joint.set_softness(softness);
    let joint = joints.insert(joint);
    world.add_joint(joint);

    let mut lowest = f32::MAX;
    let mut max_stretch: f32 = 0.0;
    for _ in 0..600 {
        world.step(&mut bodies, &mut joints, 1.0 / 60.0);

        let (Some(j), Some(b)) = (joints.get(joint), bodies.get(bob)) else {
            break;
        };
        if let Some(points) = j.world_points(&bodies) {
            max_stretch = max_stretch.max((points[1] - points[3]).length());
        }
        lowest = lowest.min(b.position().y);
    }

    info!(softness, lowest, max_stretch, "swing finished");
    (lowest, max_stretch)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("pendulum=info,impulse_engine=warn")
        .init();

    println!("=== Pendulum Demo ===\n");

    for softness in [0.0, 0.01, 0.05] {
        let (lowest, stretch) = swing(softness);
        println!(
            "softness {:5.2}: lowest point {:7.3}, max anchor drift {:.4}",
            softness, lowest, stretch
        );
    }

    println!("\n=== Demo Complete ===");
}
