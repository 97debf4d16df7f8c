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
//! Persistent contact state for one body pair

use super::{apply_pair_impulse, relative_velocity, Constraint, SolverConfig};
use crate::body::{Body, BodyHandle, BodyId};
use crate::collision::{collide, Contact, Manifold};
use crate::math::clamp;

/// Canonical key of an unordered body pair, lower id first
pub type ArbiterKey = (BodyId, BodyId);

/// Contact record between two bodies that persists across steps
///
/// The pair is canonicalised so that `body1` always has the lower
/// [`BodyId`]; a given pair of bodies therefore maps to exactly one
/// arbiter regardless of the order it was discovered in.
#[derive(Debug, Clone, PartialEq)]
pub struct Arbiter {
    body1: BodyHandle,
    body2: BodyHandle,
    key: ArbiterKey,
    friction: f32,
    manifold: Manifold,
}

impl Arbiter {
    /// Collide two bodies and wrap the result in an arbiter
    ///
    /// Returns `None` when both handles name the same body. The manifold
    /// may be empty; callers decide whether an empty arbiter is kept.
    pub fn new(h1: BodyHandle, b1: &Body, h2: BodyHandle, b2: &Body) -> Option<Self> {
        if h1 == h2 || b1.id() == b2.id() {
            return None;
        }

        let ((body1, first), (body2, second)) = if b1.id() < b2.id() {
            ((h1, b1), (h2, b2))
        } else {
            ((h2, b2), (h1, b1))
        };

        Some(Arbiter {
            body1,
            body2,
            key: (first.id(), second.id()),
            friction: combined_friction(first, second),
            manifold: collide(first, second),
        })
    }

    /// Canonical pair key
    pub fn key(&self) -> ArbiterKey {
        self.key
    }

    /// Body with the lower id
    pub fn body1(&self) -> BodyHandle {
        self.body1
    }

    /// Body with the higher id
    pub fn body2(&self) -> BodyHandle {
        self.body2
    }

    /// Combined friction coefficient of the pair
    pub fn friction(&self) -> f32 {
        self.friction
    }

    /// Set the combined friction coefficient
    pub fn set_friction(&mut self, friction: f32) {
        self.friction = friction;
    }

    /// Contact manifold
    pub fn manifold(&self) -> &Manifold {
        &self.manifold
    }

    /// Live contacts
    pub fn contacts(&self) -> &[Contact] {
        self.manifold.contacts()
    }

    /// Number of live contacts
    pub fn len(&self) -> usize {
        self.manifold.len()
    }

    /// Check if the arbiter holds no contacts
    pub fn is_empty(&self) -> bool {
        self.manifold.is_empty()
    }

    /// Replace the contacts with a fresh manifold for the same pair
    ///
    /// A new contact whose feature matches an old one inherits the old
    /// accumulated impulses when warm starting is on; every other contact
    /// starts from zero.
    pub fn update(&mut self, new_contacts: &Manifold, config: &SolverConfig) {
        let mut merged = *new_contacts;

        for contact in merged.contacts_mut() {
            match self.manifold.find(contact.feature) {
                Some(old) if config.warm_starting => {
                    contact.pn = old.pn;
                    contact.pt = old.pt;
                    contact.pnb = old.pnb;
                }
                _ => contact.reset_impulses(),
            }
        }

        self.manifold = merged;
    }
}

impl Constraint for Arbiter {
    fn bodies(&self) -> (BodyHandle, BodyHandle) {
        (self.body1, self.body2)
    }

    fn pre_step(&mut self, b1: &mut Body, b2: &mut Body, inv_dt: f32, config: &SolverConfig) {
        let bias_factor = config.contact_bias_factor();
        let inv_mass_sum = b1.inv_mass + b2.inv_mass;

        for c in self.manifold.contacts_mut() {
            let r1 = c.position - b1.position;
            let r2 = c.position - b2.position;

            // Effective mass along the normal
            let rn1 = r1.dot(c.normal);
            let rn2 = r2.dot(c.normal);
            let k_normal = inv_mass_sum
                + b1.inv_inertia * (r1.dot(r1) - rn1 * rn1)
                + b2.inv_inertia * (r2.dot(r2) - rn2 * rn2);
            c.mass_normal = effective_mass(k_normal);

            let tangent = c.normal.cross_scalar(1.0);
            let rt1 = r1.dot(tangent);
            let rt2 = r2.dot(tangent);
            let k_tangent = inv_mass_sum
                + b1.inv_inertia * (r1.dot(r1) - rt1 * rt1)
                + b2.inv_inertia * (r2.dot(r2) - rt2 * rt2);
            c.mass_tangent = effective_mass(k_tangent);

            c.bias = -bias_factor * inv_dt * (c.separation + config.allowed_penetration).min(0.0);
            c.r1 = r1;
            c.r2 = r2;

            if config.warm_starting {
                let p = c.normal * c.pn + tangent * c.pt;
                apply_pair_impulse(b1, b2, r1, r2, p);
            }
        }
    }

    fn apply_impulse(&mut self, b1: &mut Body, b2: &mut Body, config: &SolverConfig) {
        let friction = self.friction;

        for c in self.manifold.contacts_mut() {
            c.r1 = c.position - b1.position;
            c.r2 = c.position - b2.position;

            // Normal impulse
            let dv = relative_velocity(b1, b2, c.r1, c.r2);
            let vn = dv.dot(c.normal);
            let mut d_pn = c.mass_normal * (-vn + c.bias);

            if config.accumulate_impulses {
                let pn0 = c.pn;
                c.pn = (pn0 + d_pn).max(0.0);
                d_pn = c.pn - pn0;
            } else {
                d_pn = d_pn.max(0.0);
            }

            apply_pair_impulse(b1, b2, c.r1, c.r2, c.normal * d_pn);

            // Friction impulse, from the velocity after the normal impulse
            let dv = relative_velocity(b1, b2, c.r1, c.r2);
            let tangent = c.normal.cross_scalar(1.0);
            let vt = dv.dot(tangent);
            let mut d_pt = c.mass_tangent * -vt;

            if config.accumulate_impulses {
                let max_pt = friction * c.pn;
                let old_tangent_impulse = c.pt;
                c.pt = clamp(old_tangent_impulse + d_pt, -max_pt, max_pt);
                d_pt = c.pt - old_tangent_impulse;
            } else {
                let max_pt = friction * d_pn;
                d_pt = clamp(d_pt, -max_pt, max_pt);
            }

            apply_pair_impulse(b1, b2, c.r1, c.r2, tangent * d_pt);
        }
    }
}

/// Geometric mean of the two friction coefficients
pub(crate) fn combined_friction(b1: &Body, b2: &Body) -> f32 {
    (b1.friction * b2.friction).sqrt()
}

/// Inverse of a constraint-space mass, zero when neither body can respond
fn effective_mass(k: f32) -> f32 {
    if k > 0.0 {
        1.0 / k
    } else {
        0.0
    }
}
