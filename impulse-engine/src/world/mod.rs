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
//! Simulation world and the step pipeline
//!
//! A [`World`] does not own bodies or joints. It keeps ordered
//! membership lists of handles into a [`BodySet`] and a [`JointSet`]
//! that the caller owns, and it owns the [`Arbiter`]s created for
//! touching pairs of its members.
//!
//! # Example
//!
//! ```
//! use impulse_engine::{Body, BodySet, JointSet, World, math::Vec2};
//!
//! let mut bodies = BodySet::new();
//! let mut joints = JointSet::new();
//! let mut world = World::new(Vec2::new(0.0, -10.0), 10);
//!
//! let body = bodies.insert(Body::with_box(Vec2::new(1.0, 1.0), 1.0));
//! world.add_body(body);
//! world.step(&mut bodies, &mut joints, 0.1);
//!
//! let velocity = bodies.get(body).unwrap().velocity();
//! assert!((velocity.y + 1.0).abs() < 1e-6);
//! ```

mod broadphase;

#[cfg(feature = "parallel")]
pub use broadphase::PARALLEL_THRESHOLD;

use crate::body::{BodyHandle, BodySet};
use crate::math::Vec2;
use crate::solver::{self, Arbiter, ArbiterKey, JointHandle, JointSet, SolverConfig};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// Default pixels per simulation unit
pub const DEFAULT_PIXEL_SCALE: f32 = 1.0;

/// Physics world: membership, contact persistence and stepping
#[derive(Debug, Clone)]
pub struct World {
    gravity: Vec2,
    config: SolverConfig,
    pixel_scale: f32,

    bodies: Vec<BodyHandle>,
    joints: Vec<JointHandle>,
    arbiters: Vec<Arbiter>,

    /// Candidate arbiters, reused between steps
    pair_scratch: Vec<Arbiter>,
    /// Keys of this step's touching pairs
    touching_scratch: HashSet<ArbiterKey>,
    /// Arbiter position by pair key
    index_scratch: HashMap<ArbiterKey, usize>,
}

impl World {
    /// Create a world with default solver toggles and `iterations` passes
    pub fn new(gravity: Vec2, iterations: usize) -> Self {
        Self::with_config(gravity, SolverConfig::new().with_iterations(iterations))
    }

    /// Create a world with an explicit solver configuration
    pub fn with_config(gravity: Vec2, config: SolverConfig) -> Self {
        World {
            gravity,
            config,
            pixel_scale: DEFAULT_PIXEL_SCALE,
            bodies: Vec::new(),
            joints: Vec::new(),
            arbiters: Vec::new(),
            pair_scratch: Vec::new(),
            touching_scratch: HashSet::new(),
            index_scratch: HashMap::new(),
        }
    }

    /// Gravity applied to every dynamic body
    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// Set gravity
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    /// Solver configuration
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Mutable solver configuration
    pub fn config_mut(&mut self) -> &mut SolverConfig {
        &mut self.config
    }

    /// Impulse iterations per step
    pub fn iterations(&self) -> usize {
        self.config.iterations
    }

    /// Pixels per simulation unit, used when reporting geometry to a renderer
    pub fn pixel_scale(&self) -> f32 {
        self.pixel_scale
    }

    /// Set pixels per simulation unit
    pub fn set_pixel_scale(&mut self, pixel_scale: f32) {
        self.pixel_scale = pixel_scale;
    }

    /// Member bodies in insertion order
    pub fn bodies(&self) -> &[BodyHandle] {
        &self.bodies
    }

    /// Member joints in insertion order
    pub fn joints(&self) -> &[JointHandle] {
        &self.joints
    }

    /// Live arbiters
    pub fn arbiters(&self) -> &[Arbiter] {
        &self.arbiters
    }

    /// Number of member bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of member joints
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Number of live arbiters
    pub fn arbiter_count(&self) -> usize {
        self.arbiters.len()
    }

    /// Check if `body` is a member
    pub fn contains_body(&self, body: BodyHandle) -> bool {
        self.bodies.contains(&body)
    }

    /// Check if `joint` is a member
    pub fn contains_joint(&self, joint: JointHandle) -> bool {
        self.joints.contains(&joint)
    }

    /// Append a body to the membership list
    ///
    /// Returns `false` if it is already a member.
    pub fn add_body(&mut self, body: BodyHandle) -> bool {
        if self.contains_body(body) {
            return false;
        }
        self.bodies.push(body);
        debug!(%body, count = self.bodies.len(), "body added to world");
        true
    }

    /// Remove a body, its arbiters and every member joint attached to it
    ///
    /// Returns the joints that were removed along with it, or `None` if
    /// the body was not a member. Joint handles that no longer resolve in
    /// `joints` are left in place.
    pub fn remove_body(&mut self, body: BodyHandle, joints: &JointSet) -> Option<Vec<JointHandle>> {
        let index = self.bodies.iter().position(|&b| b == body)?;
        self.bodies.remove(index);

        let before = self.arbiters.len();
        self.arbiters
            .retain(|arbiter| arbiter.body1() != body && arbiter.body2() != body);

        let mut removed = Vec::new();
        self.joints.retain(|&handle| match joints.get(handle) {
            Some(joint) if joint.connects(body) => {
                removed.push(handle);
                false
            }
            _ => true,
        });

        debug!(
            %body,
            arbiters = before - self.arbiters.len(),
            joints = removed.len(),
            "body removed from world"
        );
        Some(removed)
    }

    /// Append a joint to the membership list
    ///
    /// Returns `false` if it is already a member.
    pub fn add_joint(&mut self, joint: JointHandle) -> bool {
        if self.contains_joint(joint) {
            return false;
        }
        self.joints.push(joint);
        debug!(%joint, count = self.joints.len(), "joint added to world");
        true
    }

    /// Remove a joint from the membership list
    pub fn remove_joint(&mut self, joint: JointHandle) -> bool {
        match self.joints.iter().position(|&j| j == joint) {
            Some(index) => {
                self.joints.remove(index);
                debug!(%joint, "joint removed from world");
                true
            }
            None => false,
        }
    }

    /// Drop every member and every arbiter
    ///
    /// Returns the former body and joint members so the caller can unlink
    /// them.
    pub fn clear(&mut self) -> (Vec<BodyHandle>, Vec<JointHandle>) {
        self.arbiters.clear();
        self.pair_scratch.clear();
        self.touching_scratch.clear();
        self.index_scratch.clear();
        let bodies = std::mem::take(&mut self.bodies);
        let joints = std::mem::take(&mut self.joints);
        debug!(bodies = bodies.len(), joints = joints.len(), "world cleared");
        (bodies, joints)
    }

    /// Arbiter of the pair `(a, b)`, in either order
    pub fn arbiter_between(&self, a: BodyHandle, b: BodyHandle) -> Option<&Arbiter> {
        self.arbiters.iter().find(|arbiter| {
            (arbiter.body1() == a && arbiter.body2() == b)
                || (arbiter.body1() == b && arbiter.body2() == a)
        })
    }

    /// Number of contact points between `a` and `b`, zero if none
    pub fn contact_count_between(&self, a: BodyHandle, b: BodyHandle) -> usize {
        self.arbiter_between(a, b).map_or(0, Arbiter::len)
    }

    /// Refresh the arbiter list from the current body placement
    ///
    /// Touching pairs update their existing arbiter (merging contacts by
    /// feature) or append a new one. An arbiter whose pair was evaluated
    /// and no longer touches is removed; surviving arbiters keep their
    /// relative order.
    ///
    /// Scratch storage keeps its capacity, so once the contact set has
    /// stopped growing the serial path does not allocate.
    pub fn broadphase(&mut self, bodies: &BodySet) {
        let mut scratch = std::mem::take(&mut self.pair_scratch);
        scratch.clear();
        broadphase::collect_candidates(&self.bodies, bodies, &mut scratch);

        let touching = &mut self.touching_scratch;
        touching.clear();
        touching.extend(scratch.iter().map(Arbiter::key));
        self.arbiters.retain(|arbiter| {
            match (bodies.get(arbiter.body1()), bodies.get(arbiter.body2())) {
                // Pairs of two static bodies are never evaluated
                (Some(b1), Some(b2)) if b1.is_static() && b2.is_static() => true,
                (Some(_), Some(_)) => touching.contains(&arbiter.key()),
                _ => false,
            }
        });

        let index = &mut self.index_scratch;
        index.clear();
        index.extend(self.arbiters.iter().enumerate().map(|(i, arbiter)| (arbiter.key(), i)));

        for candidate in scratch.drain(..) {
            match index.get(&candidate.key()) {
                Some(&i) => {
                    let existing = &mut self.arbiters[i];
                    existing.update(candidate.manifold(), &self.config);
                    existing.set_friction(candidate.friction());
                }
                None => {
                    index.insert(candidate.key(), self.arbiters.len());
                    self.arbiters.push(candidate);
                }
            }
        }

        self.pair_scratch = scratch;
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// Runs the broadphase, integrates forces, solves contacts and joints
    /// and integrates velocities. A non-positive `dt` disables position
    /// correction for the step. Handles that no longer resolve are
    /// skipped.
    pub fn step(&mut self, bodies: &mut BodySet, joints: &mut JointSet, dt: f32) {
        let inv_dt = if dt > 0.0 { 1.0 / dt } else { 0.0 };

        self.broadphase(bodies);

        // Integrate forces
        for &handle in &self.bodies {
            let Some(body) = bodies.get_mut(handle) else {
                continue;
            };
            if body.inv_mass == 0.0 {
                continue;
            }
            body.velocity += (self.gravity + body.force * body.inv_mass) * dt;
            body.angular_velocity += dt * body.inv_inertia * body.torque;
        }

        // Perform pre-steps
        for arbiter in &mut self.arbiters {
            solver::pre_step(arbiter, bodies, inv_dt, &self.config);
        }
        for &handle in &self.joints {
            if let Some(joint) = joints.get_mut(handle) {
                solver::pre_step(joint, bodies, inv_dt, &self.config);
            }
        }

        // Perform iterations
        for _ in 0..self.config.iterations {
            for arbiter in &mut self.arbiters {
                solver::apply_impulse(arbiter, bodies, &self.config);
            }
            for &handle in &self.joints {
                if let Some(joint) = joints.get_mut(handle) {
                    solver::apply_impulse(joint, bodies, &self.config);
                }
            }
        }

        // Integrate velocities
        for &handle in &self.bodies {
            let Some(body) = bodies.get_mut(handle) else {
                continue;
            };
            body.position += body.velocity * dt;
            body.rotation += dt * body.angular_velocity;
            body.force = Vec2::ZERO;
            body.torque = 0.0;
        }

        trace!(
            bodies = self.bodies.len(),
            arbiters = self.arbiters.len(),
            joints = self.joints.len(),
            dt,
            "world step"
        );
    }
}
