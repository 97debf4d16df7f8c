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
//! # Impulse Engine
//!
//! A small 2D rigid-body engine for oriented boxes, built to sit behind a
//! scripted game runtime.
//!
//! ## Features
//!
//! - **Box Collision**: Separating-axis test with reference-face clipping,
//!   up to two contact points per pair
//! - **Persistent Contacts**: Feature-tagged contacts carried across steps
//!   for warm starting
//! - **Sequential Impulses**: Contact, friction and point-joint constraints
//!   solved by one iterative loop
//! - **Handles**: Bodies, joints and worlds live in generation-checked
//!   arenas
//! - **Parallelization**: Optional Rayon narrow phase for large worlds
//!
//! ## Example
//!
//! ```rust
//! use impulse_engine::{Body, BodySet, JointSet, World, math::Vec2};
//!
//! let mut bodies = BodySet::new();
//! let mut joints = JointSet::new();
//! let mut world = World::new(Vec2::new(0.0, -10.0), 10);
//!
//! let mut ground = Body::with_box(Vec2::new(100.0, 20.0), f32::MAX);
//! ground.set_position(Vec2::new(0.0, -10.0));
//! let ground = bodies.insert(ground);
//!
//! let mut block = Body::with_box(Vec2::new(1.0, 1.0), 200.0);
//! block.set_position(Vec2::new(0.0, 4.0));
//! let block = bodies.insert(block);
//!
//! world.add_body(ground);
//! world.add_body(block);
//! for _ in 0..120 {
//!     world.step(&mut bodies, &mut joints, 1.0 / 60.0);
//! }
//! assert_eq!(world.arbiter_count(), 1);
//! ```

#![warn(missing_docs)]

/// Generational arena storage
pub mod arena;

/// Rigid box bodies
pub mod body;

/// Narrow-phase box collision
pub mod collision;

/// Handle-based binding surface
pub mod context;

/// Error types
pub mod error;

/// 2D vector and matrix math
pub mod math;

/// Contact and joint solver
pub mod solver;

/// World membership and stepping
pub mod world;

pub use arena::{Arena, Handle};
pub use body::{Body, BodyHandle, BodyId, BodySet};
pub use context::{check_binding_compatibility, PhysicsContext, BINDING_API_VERSION};
pub use error::{PhysicsError, Result};
pub use solver::{Arbiter, Joint, JointHandle, JointSet, SolverConfig};
pub use world::World;

/// Handle to a world stored in a [`PhysicsContext`]
pub type WorldHandle = Handle<World>;
