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
//! Point-to-point joints

use super::{apply_pair_impulse, relative_velocity, Constraint, SolverConfig, DEFAULT_BIAS_FACTOR};
use crate::arena::{Arena, Handle};
use crate::body::{Body, BodyHandle, BodySet};
use crate::math::{Mat22, Vec2};
use crate::WorldHandle;

/// Handle to a joint stored in a [`JointSet`]
pub type JointHandle = Handle<Joint>;

/// Arena of joints
pub type JointSet = Arena<Joint>;

/// Pins a point of one body to a point of another
///
/// The anchor is captured in each body's local frame at creation, so the
/// joint keeps the two material points together as the bodies move.
///
/// # Examples
///
/// ```
/// use impulse_engine::{Body, BodySet, Joint, math::Vec2};
///
/// let mut bodies = BodySet::new();
/// let a = bodies.insert(Body::new());
/// let b = bodies.insert(Body::with_box(Vec2::new(1.0, 1.0), 1.0));
///
/// let joint = Joint::attach(&bodies, a, b, Vec2::new(0.0, 1.0)).unwrap();
/// assert_eq!(joint.softness(), 0.0);
/// assert_eq!(joint.bias_factor(), 0.2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    body1: BodyHandle,
    body2: BodyHandle,

    local_anchor1: Vec2,
    local_anchor2: Vec2,
    r1: Vec2,
    r2: Vec2,

    m: Mat22,
    bias: Vec2,
    bias_factor: f32,
    softness: f32,
    p: Vec2,

    pub(crate) world: Option<WorldHandle>,
}

impl Joint {
    /// Create a joint between two bodies at a world-space anchor
    ///
    /// Returns `None` if both handles are the same body.
    pub fn new(h1: BodyHandle, b1: &Body, h2: BodyHandle, b2: &Body, anchor: Vec2) -> Option<Self> {
        if h1 == h2 {
            return None;
        }

        let local_anchor1 = b1.rotation_matrix().transpose() * (anchor - b1.position);
        let local_anchor2 = b2.rotation_matrix().transpose() * (anchor - b2.position);

        Some(Joint {
            body1: h1,
            body2: h2,
            local_anchor1,
            local_anchor2,
            r1: Vec2::ZERO,
            r2: Vec2::ZERO,
            m: Mat22::ZERO,
            bias: Vec2::ZERO,
            bias_factor: DEFAULT_BIAS_FACTOR,
            softness: 0.0,
            p: Vec2::ZERO,
            world: None,
        })
    }

    /// Look both bodies up and create a joint between them
    ///
    /// Returns `None` if either handle is stale or they are equal.
    pub fn attach(bodies: &BodySet, h1: BodyHandle, h2: BodyHandle, anchor: Vec2) -> Option<Self> {
        let b1 = bodies.get(h1)?;
        let b2 = bodies.get(h2)?;
        Joint::new(h1, b1, h2, b2, anchor)
    }

    /// First body
    pub fn body1(&self) -> BodyHandle {
        self.body1
    }

    /// Second body
    pub fn body2(&self) -> BodyHandle {
        self.body2
    }

    /// Check if the joint references `body`
    pub fn connects(&self, body: BodyHandle) -> bool {
        self.body1 == body || self.body2 == body
    }

    /// Anchor in the first body's frame
    pub fn local_anchor1(&self) -> Vec2 {
        self.local_anchor1
    }

    /// Anchor in the second body's frame
    pub fn local_anchor2(&self) -> Vec2 {
        self.local_anchor2
    }

    /// Constraint softness, zero for a rigid pin
    pub fn softness(&self) -> f32 {
        self.softness
    }

    /// Set the constraint softness
    pub fn set_softness(&mut self, softness: f32) {
        self.softness = softness;
    }

    /// Fraction of the anchor drift corrected per step
    pub fn bias_factor(&self) -> f32 {
        self.bias_factor
    }

    /// Set the drift correction factor
    pub fn set_bias_factor(&mut self, bias_factor: f32) {
        self.bias_factor = bias_factor;
    }

    /// Accumulated impulse
    pub fn impulse(&self) -> Vec2 {
        self.p
    }

    /// World this joint is currently registered with
    pub fn world(&self) -> Option<WorldHandle> {
        self.world
    }

    /// Body centers and anchors in world space
    ///
    /// Order: body 1 center, anchor on body 1, body 2 center, anchor on
    /// body 2. `None` if either body is gone.
    pub fn world_points(&self, bodies: &BodySet) -> Option<[Vec2; 4]> {
        let b1 = bodies.get(self.body1)?;
        let b2 = bodies.get(self.body2)?;
        let x1 = b1.position;
        let x2 = b2.position;
        Some([
            x1,
            x1 + b1.rotation_matrix() * self.local_anchor1,
            x2,
            x2 + b2.rotation_matrix() * self.local_anchor2,
        ])
    }
}

impl Constraint for Joint {
    fn bodies(&self) -> (BodyHandle, BodyHandle) {
        (self.body1, self.body2)
    }

    fn pre_step(&mut self, b1: &mut Body, b2: &mut Body, inv_dt: f32, config: &SolverConfig) {
        self.r1 = b1.rotation_matrix() * self.local_anchor1;
        self.r2 = b2.rotation_matrix() * self.local_anchor2;
        let (r1, r2) = (self.r1, self.r2);

        // K = [(1/m1 + 1/m2) * I] + invI1 * [r1] + invI2 * [r2] + softness * I
        let inv_mass_sum = b1.inv_mass + b2.inv_mass;
        let k1 = Mat22::new(Vec2::new(inv_mass_sum, 0.0), Vec2::new(0.0, inv_mass_sum));
        let k2 = point_mass_matrix(b1.inv_inertia, r1);
        let k3 = point_mass_matrix(b2.inv_inertia, r2);
        let soft = Mat22::new(Vec2::new(self.softness, 0.0), Vec2::new(0.0, self.softness));

        // Singular K means neither body can move along the constraint
        let m = (k1 + k2 + k3 + soft).invert();
        self.m = if m.col1.is_finite() && m.col2.is_finite() { m } else { Mat22::ZERO };

        let p1 = b1.position + r1;
        let p2 = b2.position + r2;
        self.bias = if config.position_correction {
            (p2 - p1) * (-self.bias_factor * inv_dt)
        } else {
            Vec2::ZERO
        };

        if config.warm_starting {
            apply_pair_impulse(b1, b2, r1, r2, self.p);
        } else {
            self.p = Vec2::ZERO;
        }
    }

    fn apply_impulse(&mut self, b1: &mut Body, b2: &mut Body, _config: &SolverConfig) {
        let dv = relative_velocity(b1, b2, self.r1, self.r2);
        let impulse = self.m * (self.bias - dv - self.p * self.softness);

        apply_pair_impulse(b1, b2, self.r1, self.r2, impulse);
        self.p += impulse;
    }
}

/// Rotational contribution of one body to the joint mass matrix
fn point_mass_matrix(inv_inertia: f32, r: Vec2) -> Mat22 {
    Mat22::new(
        Vec2::new(inv_inertia * r.y * r.y, -inv_inertia * r.x * r.y),
        Vec2::new(-inv_inertia * r.x * r.y, inv_inertia * r.x * r.x),
    )
}
