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
//! Errors reported at the binding surface

use crate::body::BodyHandle;
use crate::solver::JointHandle;
use crate::WorldHandle;
use thiserror::Error;

/// Precondition violations rejected by [`PhysicsContext`](crate::PhysicsContext)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// Body handle does not resolve
    #[error("unknown body {0}")]
    UnknownBody(BodyHandle),

    /// Joint handle does not resolve
    #[error("unknown joint {0}")]
    UnknownJoint(JointHandle),

    /// World handle does not resolve
    #[error("unknown world {0}")]
    UnknownWorld(WorldHandle),

    /// A joint was requested between a body and itself
    #[error("joint needs two distinct bodies, got {0} twice")]
    SameBody(BodyHandle),

    /// Body is already a member of a world
    #[error("body {body} already belongs to world {world}")]
    BodyAlreadyAttached {
        /// Offending body
        body: BodyHandle,
        /// World it belongs to
        world: WorldHandle,
    },

    /// Joint is already a member of a world
    #[error("joint {joint} already belongs to world {world}")]
    JointAlreadyAttached {
        /// Offending joint
        joint: JointHandle,
        /// World it belongs to
        world: WorldHandle,
    },

    /// Body is not a member of the given world
    #[error("body {body} is not in world {world}")]
    BodyNotInWorld {
        /// Offending body
        body: BodyHandle,
        /// World that was asked
        world: WorldHandle,
    },

    /// Joint is not a member of the given world
    #[error("joint {joint} is not in world {world}")]
    JointNotInWorld {
        /// Offending joint
        joint: JointHandle,
        /// World that was asked
        world: WorldHandle,
    },

    /// Arbiter index past the end of the arbiter list
    #[error("arbiter index {index} out of range ({count} arbiters)")]
    ArbiterOutOfBounds {
        /// Requested index
        index: usize,
        /// Number of live arbiters
        count: usize,
    },

    /// Box dimensions must be finite and positive
    #[error("invalid box dimensions {width} x {height}")]
    InvalidDimensions {
        /// Requested width
        width: f32,
        /// Requested height
        height: f32,
    },

    /// Mass must be zero (static) or positive
    #[error("invalid mass {0}")]
    InvalidMass(f32),

    /// Moment of inertia must be zero (static) or positive
    #[error("invalid moment of inertia {0}")]
    InvalidInertia(f32),

    /// Host binding version is not compatible with this engine
    #[error("binding version {host} is incompatible with engine API {engine}")]
    IncompatibleVersion {
        /// Version requested by the host
        host: String,
        /// Version this engine implements
        engine: String,
    },

    /// Host binding version could not be parsed
    #[error("invalid binding version '{0}'")]
    InvalidVersion(String),
}

/// Result alias for binding-surface operations
pub type Result<T> = std::result::Result<T, PhysicsError>;
