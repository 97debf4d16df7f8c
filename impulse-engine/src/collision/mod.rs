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
//! Narrow-phase collision between oriented boxes
//!
//! [`collide`] produces a [`Manifold`] of at most two contact points.
//! Every point carries a [`FeaturePair`] naming the box edges that
//! produced it, which lets the solver recognise the same contact on the
//! next step and carry its accumulated impulses forward.
//!
//! Box vertex and edge numbering:
//!
//! ```text
//!        ^ y
//!        |
//!        e1
//!   v2 ------ v1
//!    |        |
//! e2 |        | e4  --> x
//!    |        |
//!   v3 ------ v4
//!        e3
//! ```

mod box_box;
mod clip;

pub use box_box::{collide, Axis};

use crate::math::Vec2;

/// Maximum number of contact points between two boxes
pub const MAX_CONTACTS: usize = 2;

/// Edge of a box, numbered as in the module diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum EdgeNumber {
    /// No edge (synthesized clip point)
    #[default]
    NoEdge = 0,
    /// Top edge
    Edge1 = 1,
    /// Left edge
    Edge2 = 2,
    /// Bottom edge
    Edge3 = 3,
    /// Right edge
    Edge4 = 4,
}

/// Identity of the geometric features that produced a contact point
///
/// Only compared for equality; the edge numbers carry no geometric
/// meaning outside of collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FeaturePair {
    /// Edge of the first box entering the contact
    pub in_edge1: EdgeNumber,
    /// Edge of the first box leaving the contact
    pub out_edge1: EdgeNumber,
    /// Edge of the second box entering the contact
    pub in_edge2: EdgeNumber,
    /// Edge of the second box leaving the contact
    pub out_edge2: EdgeNumber,
}

impl FeaturePair {
    /// Pack the four edge numbers into one key
    pub fn value(&self) -> u32 {
        u32::from_le_bytes([
            self.in_edge1 as u8,
            self.out_edge1 as u8,
            self.in_edge2 as u8,
            self.out_edge2 as u8,
        ])
    }

    /// Exchange the roles of the two boxes
    pub fn swapped(self) -> Self {
        FeaturePair {
            in_edge1: self.in_edge2,
            out_edge1: self.out_edge2,
            in_edge2: self.in_edge1,
            out_edge2: self.out_edge1,
        }
    }
}

/// One point of a contact manifold plus its solver state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Contact {
    /// Contact point on the reference face, world space
    pub position: Vec2,
    /// Unit normal pointing from the first body to the second
    pub normal: Vec2,
    /// Offset of the point from the first body's center
    pub r1: Vec2,
    /// Offset of the point from the second body's center
    pub r2: Vec2,
    /// Signed distance along the normal, negative when penetrating
    pub separation: f32,
    /// Accumulated normal impulse
    pub pn: f32,
    /// Accumulated tangent (friction) impulse
    pub pt: f32,
    /// Accumulated normal impulse for position bias
    pub pnb: f32,
    /// Effective mass along the normal
    pub mass_normal: f32,
    /// Effective mass along the tangent
    pub mass_tangent: f32,
    /// Velocity bias for position correction
    pub bias: f32,
    /// Identity used to match contacts between steps
    pub feature: FeaturePair,
}

impl Contact {
    /// Zero the accumulated impulses
    pub fn reset_impulses(&mut self) {
        self.pn = 0.0;
        self.pt = 0.0;
        self.pnb = 0.0;
    }
}

/// Fixed-capacity set of contact points between two boxes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Manifold {
    contacts: [Contact; MAX_CONTACTS],
    len: usize,
}

impl Manifold {
    /// Empty manifold
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a contact, ignoring it when the manifold is full
    pub fn push(&mut self, contact: Contact) -> bool {
        if self.len == MAX_CONTACTS {
            return false;
        }
        self.contacts[self.len] = contact;
        self.len += 1;
        true
    }

    /// Number of contact points
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if there are no contact points
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Live contact points
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts[..self.len]
    }

    /// Live contact points, mutable
    pub fn contacts_mut(&mut self) -> &mut [Contact] {
        &mut self.contacts[..self.len]
    }

    /// Find the contact carrying `feature`
    pub fn find(&self, feature: FeaturePair) -> Option<&Contact> {
        self.contacts().iter().find(|c| c.feature.value() == feature.value())
    }
}
