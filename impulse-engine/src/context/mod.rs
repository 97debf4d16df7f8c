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
//! Handle-based surface for scripting bindings
//!
//! [`PhysicsContext`] owns every body, joint and world and exposes them
//! through plain handles and scalars, the shape a script binding layer
//! wants. Every precondition violation comes back as a [`PhysicsError`]
//! and is logged with `tracing::warn!`; nothing on this surface panics.
//!
//! # Example
//!
//! ```
//! use impulse_engine::PhysicsContext;
//!
//! # fn main() -> impulse_engine::Result<()> {
//! let mut ctx = PhysicsContext::new();
//! let world = ctx.create_world(0.0, -10.0, 10);
//!
//! let ground = ctx.create_body(100.0, 20.0, 0.0)?;
//! ctx.set_center(ground, 0.0, -10.0)?;
//! let crate_box = ctx.create_body(1.0, 1.0, 200.0)?;
//! ctx.set_center(crate_box, 0.0, 4.0)?;
//!
//! ctx.add_body(world, ground)?;
//! ctx.add_body(world, crate_box)?;
//! for _ in 0..60 {
//!     ctx.step(world, 1.0 / 60.0)?;
//! }
//! assert!(ctx.center(crate_box)?.y < 4.0);
//! # Ok(())
//! # }
//! ```

mod version;

pub use version::{check_binding_compatibility, BINDING_API_VERSION};

use crate::arena::Arena;
use crate::body::{Body, BodyHandle, BodySet};
use crate::error::{PhysicsError, Result};
use crate::math::Vec2;
use crate::solver::{Joint, JointHandle, JointSet, SolverConfig};
use crate::world::{World, DEFAULT_PIXEL_SCALE};
use crate::WorldHandle;
use tracing::{debug, warn};

/// Owner of all bodies, joints and worlds behind the binding surface
#[derive(Default)]
pub struct PhysicsContext {
    bodies: BodySet,
    joints: JointSet,
    worlds: Arena<World>,
}

/// Log a rejected operation and hand the error back
fn rejected(err: PhysicsError) -> PhysicsError {
    warn!(error = %err, "physics operation rejected");
    err
}

fn validate_dimensions(width: f32, height: f32) -> Result<Vec2> {
    let valid = |d: f32| d.is_finite() && d > 0.0;
    if valid(width) && valid(height) {
        Ok(Vec2::new(width, height))
    } else {
        Err(rejected(PhysicsError::InvalidDimensions { width, height }))
    }
}

/// Map a binding-level mass to the engine convention, zero meaning static
fn validate_mass(mass: f32) -> Result<f32> {
    if !mass.is_finite() || mass < 0.0 {
        Err(rejected(PhysicsError::InvalidMass(mass)))
    } else if mass == 0.0 {
        Ok(f32::MAX)
    } else {
        Ok(mass)
    }
}

fn validate_inertia(inertia: f32) -> Result<f32> {
    if !inertia.is_finite() || inertia < 0.0 {
        Err(rejected(PhysicsError::InvalidInertia(inertia)))
    } else if inertia == 0.0 {
        Ok(f32::MAX)
    } else {
        Ok(inertia)
    }
}

impl PhysicsContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty context for a host binding built against `host_version`
    ///
    /// Fails with [`PhysicsError::IncompatibleVersion`] if the binding
    /// expects a different API than [`BINDING_API_VERSION`].
    pub fn for_binding(host_version: &str) -> Result<Self> {
        check_binding_compatibility(host_version).map_err(rejected)?;
        debug!(host_version, engine_version = BINDING_API_VERSION, "binding context created");
        Ok(Self::default())
    }

    /// Bodies owned by this context
    pub fn bodies(&self) -> &BodySet {
        &self.bodies
    }

    /// Joints owned by this context
    pub fn joints(&self) -> &JointSet {
        &self.joints
    }

    // ---- lookups ----

    /// Shared access to a body
    pub fn body(&self, handle: BodyHandle) -> Result<&Body> {
        self.bodies
            .get(handle)
            .ok_or_else(|| rejected(PhysicsError::UnknownBody(handle)))
    }

    /// Exclusive access to a body
    pub fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut Body> {
        self.bodies
            .get_mut(handle)
            .ok_or_else(|| rejected(PhysicsError::UnknownBody(handle)))
    }

    /// Shared access to a joint
    pub fn joint(&self, handle: JointHandle) -> Result<&Joint> {
        self.joints
            .get(handle)
            .ok_or_else(|| rejected(PhysicsError::UnknownJoint(handle)))
    }

    /// Exclusive access to a joint
    pub fn joint_mut(&mut self, handle: JointHandle) -> Result<&mut Joint> {
        self.joints
            .get_mut(handle)
            .ok_or_else(|| rejected(PhysicsError::UnknownJoint(handle)))
    }

    /// Shared access to a world
    pub fn world(&self, handle: WorldHandle) -> Result<&World> {
        self.worlds
            .get(handle)
            .ok_or_else(|| rejected(PhysicsError::UnknownWorld(handle)))
    }

    /// Exclusive access to a world
    pub fn world_mut(&mut self, handle: WorldHandle) -> Result<&mut World> {
        self.worlds
            .get_mut(handle)
            .ok_or_else(|| rejected(PhysicsError::UnknownWorld(handle)))
    }

    fn pixel_scale_of(&self, world: Option<WorldHandle>) -> f32 {
        world
            .and_then(|w| self.worlds.get(w))
            .map_or(DEFAULT_PIXEL_SCALE, World::pixel_scale)
    }

    // ---- bodies ----

    /// Create a box body
    ///
    /// A mass of zero makes the body static.
    pub fn create_body(&mut self, width: f32, height: f32, mass: f32) -> Result<BodyHandle> {
        let size = validate_dimensions(width, height)?;
        let mass = validate_mass(mass)?;
        let handle = self.bodies.insert(Body::with_box(size, mass));
        debug!(body = %handle, width, height, mass, "body created");
        Ok(handle)
    }

    /// Destroy a body, removing it from its world first
    ///
    /// Joints in the same world that reference the body are removed from
    /// the world as well. Joints outside any world keep the stale handle
    /// and report it as [`PhysicsError::UnknownBody`] afterwards.
    pub fn destroy_body(&mut self, handle: BodyHandle) -> Result<()> {
        let world = self.body(handle)?.world;
        if let Some(world) = world {
            self.remove_body(world, handle)?;
        }
        self.bodies.remove(handle);
        debug!(body = %handle, "body destroyed");
        Ok(())
    }

    /// Accumulate a force for the next step
    pub fn add_force(&mut self, handle: BodyHandle, fx: f32, fy: f32) -> Result<()> {
        self.body_mut(handle)?.add_force(Vec2::new(fx, fy));
        Ok(())
    }

    /// Center of a body
    pub fn center(&self, handle: BodyHandle) -> Result<Vec2> {
        Ok(self.body(handle)?.position())
    }

    /// Move the center of a body
    pub fn set_center(&mut self, handle: BodyHandle, x: f32, y: f32) -> Result<()> {
        self.body_mut(handle)?.set_position(Vec2::new(x, y));
        Ok(())
    }

    /// Rotation of a body in radians
    pub fn rotation(&self, handle: BodyHandle) -> Result<f32> {
        Ok(self.body(handle)?.rotation())
    }

    /// Set the rotation of a body in radians
    pub fn set_rotation(&mut self, handle: BodyHandle, rotation: f32) -> Result<()> {
        self.body_mut(handle)?.set_rotation(rotation);
        Ok(())
    }

    /// Linear velocity of a body
    pub fn velocity(&self, handle: BodyHandle) -> Result<Vec2> {
        Ok(self.body(handle)?.velocity())
    }

    /// Set the linear velocity of a body
    pub fn set_velocity(&mut self, handle: BodyHandle, vx: f32, vy: f32) -> Result<()> {
        self.body_mut(handle)?.set_velocity(Vec2::new(vx, vy));
        Ok(())
    }

    /// Angular velocity of a body
    pub fn angular_velocity(&self, handle: BodyHandle) -> Result<f32> {
        Ok(self.body(handle)?.angular_velocity())
    }

    /// Set the angular velocity of a body
    pub fn set_angular_velocity(&mut self, handle: BodyHandle, w: f32) -> Result<()> {
        self.body_mut(handle)?.set_angular_velocity(w);
        Ok(())
    }

    /// Force accumulated on a body
    pub fn force(&self, handle: BodyHandle) -> Result<Vec2> {
        Ok(self.body(handle)?.force())
    }

    /// Replace the force accumulated on a body
    pub fn set_force(&mut self, handle: BodyHandle, fx: f32, fy: f32) -> Result<()> {
        self.body_mut(handle)?.set_force(Vec2::new(fx, fy));
        Ok(())
    }

    /// Replace the torque accumulated on a body
    pub fn set_torque(&mut self, handle: BodyHandle, torque: f32) -> Result<()> {
        self.body_mut(handle)?.set_torque(torque);
        Ok(())
    }

    /// Full box dimensions of a body
    pub fn size(&self, handle: BodyHandle) -> Result<Vec2> {
        Ok(self.body(handle)?.width())
    }

    /// Resize a body's box, keeping its mass properties
    pub fn set_size(&mut self, handle: BodyHandle, width: f32, height: f32) -> Result<()> {
        let size = validate_dimensions(width, height)?;
        self.body_mut(handle)?.set_width(size);
        Ok(())
    }

    /// Set a body's friction coefficient
    pub fn set_friction(&mut self, handle: BodyHandle, friction: f32) -> Result<()> {
        self.body_mut(handle)?.set_friction(friction);
        Ok(())
    }

    /// Mass of a body, `f32::MAX` when static
    pub fn mass(&self, handle: BodyHandle) -> Result<f32> {
        Ok(self.body(handle)?.mass())
    }

    /// Set a body's mass, zero meaning infinite
    pub fn set_mass(&mut self, handle: BodyHandle, mass: f32) -> Result<()> {
        let mass = validate_mass(mass)?;
        self.body_mut(handle)?.set_mass(mass);
        Ok(())
    }

    /// Moment of inertia of a body, `f32::MAX` when static
    pub fn inertia(&self, handle: BodyHandle) -> Result<f32> {
        Ok(self.body(handle)?.inertia())
    }

    /// Set a body's moment of inertia, zero meaning infinite
    pub fn set_inertia(&mut self, handle: BodyHandle, inertia: f32) -> Result<()> {
        let inertia = validate_inertia(inertia)?;
        self.body_mut(handle)?.set_inertia(inertia);
        Ok(())
    }

    /// Corners of a body scaled by its world's pixel scale
    ///
    /// Detached bodies use a scale of 1.0.
    pub fn body_polygon(&self, handle: BodyHandle) -> Result<[Vec2; 4]> {
        let body = self.body(handle)?;
        let scale = self.pixel_scale_of(body.world);
        Ok(body.polygon().map(|corner| corner * scale))
    }

    // ---- joints ----

    /// Pin two bodies together at a world-space anchor
    pub fn create_joint(
        &mut self,
        body_a: BodyHandle,
        body_b: BodyHandle,
        anchor_x: f32,
        anchor_y: f32,
    ) -> Result<JointHandle> {
        if body_a == body_b {
            return Err(rejected(PhysicsError::SameBody(body_a)));
        }
        let b1 = self.body(body_a)?;
        let b2 = self.body(body_b)?;
        let joint = Joint::new(body_a, b1, body_b, b2, Vec2::new(anchor_x, anchor_y))
            .ok_or_else(|| rejected(PhysicsError::SameBody(body_a)))?;

        let handle = self.joints.insert(joint);
        debug!(joint = %handle, %body_a, %body_b, "joint created");
        Ok(handle)
    }

    /// Destroy a joint, removing it from its world first
    pub fn destroy_joint(&mut self, handle: JointHandle) -> Result<()> {
        let world = self.joint(handle)?.world;
        if let Some(world) = world {
            self.remove_joint(world, handle)?;
        }
        self.joints.remove(handle);
        debug!(joint = %handle, "joint destroyed");
        Ok(())
    }

    /// Body centers and anchors of a joint, scaled by its world's pixel scale
    ///
    /// Order: body 1 center, anchor on body 1, body 2 center, anchor on
    /// body 2.
    pub fn joint_points(&self, handle: JointHandle) -> Result<[Vec2; 4]> {
        let joint = self.joint(handle)?;
        let points = match joint.world_points(&self.bodies) {
            Some(points) => points,
            None => {
                let missing = if self.bodies.contains(joint.body1()) {
                    joint.body2()
                } else {
                    joint.body1()
                };
                return Err(rejected(PhysicsError::UnknownBody(missing)));
            }
        };
        let scale = self.pixel_scale_of(joint.world);
        Ok(points.map(|p| p * scale))
    }

    /// Set a joint's softness
    pub fn set_joint_softness(&mut self, handle: JointHandle, softness: f32) -> Result<()> {
        self.joint_mut(handle)?.set_softness(softness);
        Ok(())
    }

    /// Set a joint's drift correction factor
    pub fn set_joint_bias_factor(&mut self, handle: JointHandle, bias_factor: f32) -> Result<()> {
        self.joint_mut(handle)?.set_bias_factor(bias_factor);
        Ok(())
    }

    // ---- worlds ----

    /// Create a world with default solver toggles
    pub fn create_world(&mut self, gravity_x: f32, gravity_y: f32, iterations: usize) -> WorldHandle {
        self.create_world_with_config(
            Vec2::new(gravity_x, gravity_y),
            SolverConfig::new().with_iterations(iterations),
        )
    }

    /// Create a world with an explicit solver configuration
    pub fn create_world_with_config(&mut self, gravity: Vec2, config: SolverConfig) -> WorldHandle {
        let iterations = config.iterations;
        let handle = self.worlds.insert(World::with_config(gravity, config));
        debug!(world = %handle, gravity_x = gravity.x, gravity_y = gravity.y, iterations, "world created");
        handle
    }

    /// Destroy a world, detaching all of its members
    pub fn destroy_world(&mut self, handle: WorldHandle) -> Result<()> {
        self.clear(handle)?;
        self.worlds.remove(handle);
        debug!(world = %handle, "world destroyed");
        Ok(())
    }

    /// Add a body to a world
    pub fn add_body(&mut self, world: WorldHandle, body: BodyHandle) -> Result<()> {
        self.world(world)?;
        if let Some(current) = self.body(body)?.world {
            return Err(rejected(PhysicsError::BodyAlreadyAttached { body, world: current }));
        }

        self.world_mut(world)?.add_body(body);
        self.body_mut(body)?.world = Some(world);
        Ok(())
    }

    /// Remove a body from a world, along with its joints and arbiters
    pub fn remove_body(&mut self, world: WorldHandle, body: BodyHandle) -> Result<()> {
        if self.body(body)?.world != Some(world) {
            self.world(world)?;
            return Err(rejected(PhysicsError::BodyNotInWorld { body, world }));
        }

        let w = self
            .worlds
            .get_mut(world)
            .ok_or_else(|| rejected(PhysicsError::UnknownWorld(world)))?;
        let removed = w
            .remove_body(body, &self.joints)
            .ok_or_else(|| rejected(PhysicsError::BodyNotInWorld { body, world }))?;

        for joint in removed {
            if let Some(joint) = self.joints.get_mut(joint) {
                joint.world = None;
            }
        }
        self.body_mut(body)?.world = None;
        Ok(())
    }

    /// Add a joint to a world
    ///
    /// Both connected bodies must already be members of that world.
    pub fn add_joint(&mut self, world: WorldHandle, joint: JointHandle) -> Result<()> {
        self.world(world)?;
        let j = self.joint(joint)?;
        if let Some(current) = j.world {
            return Err(rejected(PhysicsError::JointAlreadyAttached { joint, world: current }));
        }
        for body in [j.body1(), j.body2()] {
            if self.body(body)?.world != Some(world) {
                return Err(rejected(PhysicsError::BodyNotInWorld { body, world }));
            }
        }

        self.world_mut(world)?.add_joint(joint);
        self.joint_mut(joint)?.world = Some(world);
        Ok(())
    }

    /// Remove a joint from a world
    pub fn remove_joint(&mut self, world: WorldHandle, joint: JointHandle) -> Result<()> {
        if self.joint(joint)?.world != Some(world) || !self.world_mut(world)?.remove_joint(joint) {
            return Err(rejected(PhysicsError::JointNotInWorld { joint, world }));
        }
        self.joint_mut(joint)?.world = None;
        Ok(())
    }

    /// Detach every body and joint from a world and drop its arbiters
    pub fn clear(&mut self, world: WorldHandle) -> Result<()> {
        let (bodies, joints) = self.world_mut(world)?.clear();
        for body in bodies {
            if let Some(body) = self.bodies.get_mut(body) {
                body.world = None;
            }
        }
        for joint in joints {
            if let Some(joint) = self.joints.get_mut(joint) {
                joint.world = None;
            }
        }
        Ok(())
    }

    /// Advance a world by `dt` seconds
    pub fn step(&mut self, world: WorldHandle, dt: f32) -> Result<()> {
        let w = self
            .worlds
            .get_mut(world)
            .ok_or_else(|| rejected(PhysicsError::UnknownWorld(world)))?;
        w.step(&mut self.bodies, &mut self.joints, dt);
        Ok(())
    }

    /// Number of live arbiters in a world
    pub fn arbiter_count(&self, world: WorldHandle) -> Result<usize> {
        Ok(self.world(world)?.arbiter_count())
    }

    /// Contact positions of one arbiter, flattened as `x0, y0, x1, y1`
    ///
    /// `index` is 0-based. Positions are in simulation units.
    pub fn arbiter_positions(&self, world: WorldHandle, index: usize) -> Result<Vec<f32>> {
        let arbiters = self.world(world)?.arbiters();
        let arbiter = arbiters.get(index).ok_or_else(|| {
            rejected(PhysicsError::ArbiterOutOfBounds {
                index,
                count: arbiters.len(),
            })
        })?;
        Ok(arbiter
            .contacts()
            .iter()
            .flat_map(|c| [c.position.x, c.position.y])
            .collect())
    }

    /// Set a world's pixels per simulation unit
    pub fn set_pixel_scale(&mut self, world: WorldHandle, pixel_scale: f32) -> Result<()> {
        self.world_mut(world)?.set_pixel_scale(pixel_scale);
        Ok(())
    }

    /// Number of contact points between two bodies in a world
    pub fn contact_count_between(&self, world: WorldHandle, a: BodyHandle, b: BodyHandle) -> Result<usize> {
        let w = self.world(world)?;
        self.body(a)?;
        self.body(b)?;
        Ok(w.contact_count_between(a, b))
    }
}
