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
//! Rigid box bodies
//!
//! A body is an oriented box with linear and angular state plus mass
//! properties derived from its dimensions. Bodies with infinite mass
//! (`f32::MAX`) are static: their inverse mass and inverse inertia are
//! exactly zero and the solver never moves them.

use crate::arena::{Arena, Handle};
use crate::math::{Mat22, Vec2};
use crate::WorldHandle;
use std::fmt;

/// Default Coulomb friction coefficient of a new body
pub const DEFAULT_FRICTION: f32 = 0.2;

/// Handle to a body stored in a [`BodySet`]
pub type BodyHandle = Handle<Body>;

/// Stable body identity, assigned in creation order
///
/// Contact pairs are canonicalized by this id so that the ordering of a
/// pair never depends on memory layout or slot reuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BodyId(u64);

impl BodyId {
    /// Create a BodyId from a raw value
    pub fn new(id: u64) -> Self {
        BodyId(id)
    }

    /// Get the raw value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Body({})", self.0)
    }
}

/// Rigid box body
///
/// # Examples
///
/// ```
/// use impulse_engine::{Body, math::Vec2};
///
/// let body = Body::with_box(Vec2::new(1.0, 1.0), 1.0);
/// assert_eq!(body.inv_mass(), 1.0);
/// assert!(!body.is_static());
///
/// let ground = Body::new();
/// assert!(ground.is_static());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub(crate) id: BodyId,

    pub(crate) position: Vec2,
    pub(crate) rotation: f32,
    pub(crate) velocity: Vec2,
    pub(crate) angular_velocity: f32,

    pub(crate) width: Vec2,
    pub(crate) aabb_half_size: f32,
    pub(crate) friction: f32,
    mass: f32,
    pub(crate) inv_mass: f32,
    inertia: f32,
    pub(crate) inv_inertia: f32,

    pub(crate) force: Vec2,
    pub(crate) torque: f32,

    pub(crate) world: Option<WorldHandle>,
}

impl Body {
    /// Create a static 1x1 box at the origin
    pub fn new() -> Self {
        let width = Vec2::new(1.0, 1.0);
        Body {
            id: BodyId::default(),
            position: Vec2::ZERO,
            rotation: 0.0,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            width,
            aabb_half_size: width.length() * 0.5,
            friction: DEFAULT_FRICTION,
            mass: f32::MAX,
            inv_mass: 0.0,
            inertia: f32::MAX,
            inv_inertia: 0.0,
            force: Vec2::ZERO,
            torque: 0.0,
            world: None,
        }
    }

    /// Create a box of the given full dimensions and mass
    ///
    /// A mass of `f32::MAX` (or any non-positive mass) makes the body static.
    pub fn with_box(width: Vec2, mass: f32) -> Self {
        let mut body = Body::new();
        body.set(width, mass);
        body
    }

    /// Reset the body to rest and derive mass properties from a box
    ///
    /// Position, rotation, velocities, force, torque and friction are
    /// reset. For a finite positive mass the moment of inertia is that of
    /// a solid rectangle, `m (w² + h²) / 12`.
    pub fn set(&mut self, width: Vec2, mass: f32) {
        self.position = Vec2::ZERO;
        self.rotation = 0.0;
        self.velocity = Vec2::ZERO;
        self.angular_velocity = 0.0;
        self.force = Vec2::ZERO;
        self.torque = 0.0;
        self.friction = DEFAULT_FRICTION;

        self.width = width;
        self.aabb_half_size = width.length() * 0.5;

        if is_finite_mass(mass) {
            self.mass = mass;
            self.inv_mass = 1.0 / mass;
            self.inertia = mass * (width.x * width.x + width.y * width.y) / 12.0;
            self.inv_inertia = 1.0 / self.inertia;
        } else {
            self.make_static();
        }
    }

    fn make_static(&mut self) {
        self.mass = f32::MAX;
        self.inv_mass = 0.0;
        self.inertia = f32::MAX;
        self.inv_inertia = 0.0;
    }

    /// Stable identity assigned by the owning [`BodySet`]
    pub fn id(&self) -> BodyId {
        self.id
    }

    /// Check if the body is immovable (`inv_mass == 0`)
    pub fn is_static(&self) -> bool {
        self.inv_mass == 0.0
    }

    /// Center of the box in world space
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Move the center of the box
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Rotation in radians
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Set the rotation in radians
    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    /// Rotation matrix of the box frame
    pub fn rotation_matrix(&self) -> Mat22 {
        Mat22::from_angle(self.rotation)
    }

    /// Linear velocity
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Set the linear velocity
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Angular velocity in radians per second
    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    /// Set the angular velocity
    pub fn set_angular_velocity(&mut self, angular_velocity: f32) {
        self.angular_velocity = angular_velocity;
    }

    /// Force accumulated for the current step
    pub fn force(&self) -> Vec2 {
        self.force
    }

    /// Replace the accumulated force
    pub fn set_force(&mut self, force: Vec2) {
        self.force = force;
    }

    /// Accumulate an external force for the current step
    pub fn add_force(&mut self, force: Vec2) {
        self.force += force;
    }

    /// Torque accumulated for the current step
    pub fn torque(&self) -> f32 {
        self.torque
    }

    /// Replace the accumulated torque
    pub fn set_torque(&mut self, torque: f32) {
        self.torque = torque;
    }

    /// Full box dimensions
    pub fn width(&self) -> Vec2 {
        self.width
    }

    /// Change the box dimensions
    ///
    /// Mass properties are left untouched; use [`Body::set`] to rederive them.
    pub fn set_width(&mut self, width: Vec2) {
        self.width = width;
        self.aabb_half_size = width.length() * 0.5;
    }

    /// Radius of the circle enclosing the box
    pub fn aabb_half_size(&self) -> f32 {
        self.aabb_half_size
    }

    /// Coulomb friction coefficient
    pub fn friction(&self) -> f32 {
        self.friction
    }

    /// Set the friction coefficient
    pub fn set_friction(&mut self, friction: f32) {
        self.friction = friction;
    }

    /// Mass, `f32::MAX` for static bodies
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Inverse mass, zero for static bodies
    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    /// Override the mass without touching the moment of inertia
    ///
    /// A non-positive or non-finite mass pins the body linearly
    /// (`mass = f32::MAX`, `inv_mass = 0`).
    pub fn set_mass(&mut self, mass: f32) {
        if is_finite_mass(mass) {
            self.mass = mass;
            self.inv_mass = 1.0 / mass;
        } else {
            self.mass = f32::MAX;
            self.inv_mass = 0.0;
        }
    }

    /// Moment of inertia, `f32::MAX` for static bodies
    pub fn inertia(&self) -> f32 {
        self.inertia
    }

    /// Inverse moment of inertia, zero for static bodies
    pub fn inv_inertia(&self) -> f32 {
        self.inv_inertia
    }

    /// Override the moment of inertia
    ///
    /// Follows the same convention as [`Body::set_mass`].
    pub fn set_inertia(&mut self, inertia: f32) {
        if is_finite_mass(inertia) {
            self.inertia = inertia;
            self.inv_inertia = 1.0 / inertia;
        } else {
            self.inertia = f32::MAX;
            self.inv_inertia = 0.0;
        }
    }

    /// World this body is currently registered with
    pub fn world(&self) -> Option<WorldHandle> {
        self.world
    }

    /// Corners of the box in world space
    ///
    /// Order: bottom-left, bottom-right, top-right, top-left in the
    /// body's local frame.
    pub fn polygon(&self) -> [Vec2; 4] {
        let r = self.rotation_matrix();
        let x = self.position;
        let h = self.width * 0.5;
        [
            x + r * Vec2::new(-h.x, -h.y),
            x + r * Vec2::new(h.x, -h.y),
            x + r * Vec2::new(h.x, h.y),
            x + r * Vec2::new(-h.x, h.y),
        ]
    }

    /// Velocity of the material point at offset `r` from the center
    pub(crate) fn velocity_at(&self, r: Vec2) -> Vec2 {
        self.velocity + Vec2::scalar_cross(self.angular_velocity, r)
    }

    /// Apply `impulse` at offset `r` from the center
    pub(crate) fn apply_impulse(&mut self, impulse: Vec2, r: Vec2) {
        self.velocity += impulse * self.inv_mass;
        self.angular_velocity += self.inv_inertia * r.cross(impulse);
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::new()
    }
}

fn is_finite_mass(mass: f32) -> bool {
    mass > 0.0 && mass < f32::MAX
}

/// Arena of bodies that assigns each new body a monotonically increasing id
pub struct BodySet {
    bodies: Arena<Body>,
    next_id: u64,
}

impl BodySet {
    /// Create an empty set
    pub fn new() -> Self {
        BodySet {
            bodies: Arena::new(),
            next_id: 0,
        }
    }

    /// Take ownership of `body`, stamping it with a fresh id
    pub fn insert(&mut self, mut body: Body) -> BodyHandle {
        body.id = BodyId::new(self.next_id);
        self.next_id += 1;
        self.bodies.insert(body)
    }

    /// Remove a body, returning it
    pub fn remove(&mut self, handle: BodyHandle) -> Option<Body> {
        self.bodies.remove(handle)
    }

    /// Check if `handle` resolves
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(handle)
    }

    /// Shared access to a body
    pub fn get(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle)
    }

    /// Exclusive access to a body
    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle)
    }

    /// Exclusive access to two distinct bodies
    pub fn pair_mut(&mut self, a: BodyHandle, b: BodyHandle) -> Option<(&mut Body, &mut Body)> {
        self.bodies.get2_mut(a, b)
    }

    /// Number of bodies
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Iterate over all bodies
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.bodies.iter()
    }
}

impl Default for BodySet {
    fn default() -> Self {
        Self::new()
    }
}
