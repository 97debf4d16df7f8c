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
//! Binding API versioning

use crate::error::{PhysicsError, Result};
use semver::Version;

/// Version of the binding surface exposed by [`PhysicsContext`](crate::PhysicsContext)
///
/// Format: MAJOR.MINOR.PATCH following semantic versioning.
pub const BINDING_API_VERSION: &str = "0.1.0";

/// Check that a host binding built against `host_version` can drive this engine
///
/// Uses semantic versioning rules:
/// - Major version must match
/// - For major version 0.x.y, minor versions must match
/// - For major version >= 1, the host minor must not exceed the engine's
/// - Patch version is ignored
pub fn check_binding_compatibility(host_version: &str) -> Result<()> {
    let host = Version::parse(host_version)
        .map_err(|_| PhysicsError::InvalidVersion(host_version.to_string()))?;
    let engine = Version::parse(BINDING_API_VERSION)
        .map_err(|_| PhysicsError::InvalidVersion(BINDING_API_VERSION.to_string()))?;

    if is_compatible(&host, &engine) {
        Ok(())
    } else {
        Err(PhysicsError::IncompatibleVersion {
            host: host.to_string(),
            engine: engine.to_string(),
        })
    }
}

fn is_compatible(host: &Version, engine: &Version) -> bool {
    if host.major != engine.major {
        return false;
    }

    if host.major != 0 {
        host.minor <= engine.minor
    } else {
        // 0.x minors are breaking
        host.minor == engine.minor
    }
}
