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
//! Sequential-impulse constraint solver
//!
//! Contacts ([`Arbiter`]) and point joints ([`Joint`]) share one solving
//! shape: a pre-step that precomputes effective masses and bias (and
//! optionally re-applies last step's impulse), followed by repeated
//! impulse applications that accumulate toward the solution. Both
//! implement [`Constraint`] so the world drives them with one loop.

mod arbiter;
mod config;
mod joint;

pub use arbiter::{Arbiter, ArbiterKey};
pub use config::{SolverConfig, DEFAULT_ALLOWED_PENETRATION, DEFAULT_BIAS_FACTOR, DEFAULT_ITERATIONS};
pub use joint::{Joint, JointHandle, JointSet};

use crate::body::{Body, BodyHandle, BodySet};
use crate::math::Vec2;

/// Two-body velocity constraint solved by sequential impulses
pub trait Constraint {
    /// The constrained bodies, in solver order
    fn bodies(&self) -> (BodyHandle, BodyHandle);

    /// Precompute effective masses and bias for this step
    fn pre_step(&mut self, b1: &mut Body, b2: &mut Body, inv_dt: f32, config: &SolverConfig);

    /// Apply one corrective impulse
    fn apply_impulse(&mut self, b1: &mut Body, b2: &mut Body, config: &SolverConfig);
}

/// Run the pre-step of `constraint` against its bodies
///
/// Returns `false` without touching anything if either body handle is
/// stale.
pub fn pre_step<C: Constraint + ?Sized>(
    constraint: &mut C,
    bodies: &mut BodySet,
    inv_dt: f32,
    config: &SolverConfig,
) -> bool {
    let (h1, h2) = constraint.bodies();
    match bodies.pair_mut(h1, h2) {
        Some((b1, b2)) => {
            constraint.pre_step(b1, b2, inv_dt, config);
            true
        }
        None => false,
    }
}

/// Apply one impulse of `constraint` against its bodies
///
/// Returns `false` without touching anything if either body handle is
/// stale.
pub fn apply_impulse<C: Constraint + ?Sized>(
    constraint: &mut C,
    bodies: &mut BodySet,
    config: &SolverConfig,
) -> bool {
    let (h1, h2) = constraint.bodies();
    match bodies.pair_mut(h1, h2) {
        Some((b1, b2)) => {
            constraint.apply_impulse(b1, b2, config);
            true
        }
        None => false,
    }
}

/// Relative velocity of body 2 with respect to body 1 at the offsets
pub(crate) fn relative_velocity(b1: &Body, b2: &Body, r1: Vec2, r2: Vec2) -> Vec2 {
    b2.velocity_at(r2) - b1.velocity_at(r1)
}

/// Apply an equal and opposite impulse pair: `-p` on body 1, `+p` on body 2
pub(crate) fn apply_pair_impulse(
    b1: &mut Body,
    b2: &mut Body,
    r1: Vec2,
    r2: Vec2,
    p: Vec2,
) {
    b1.apply_impulse(-p, r1);
    b2.apply_impulse(p, r2);
}
