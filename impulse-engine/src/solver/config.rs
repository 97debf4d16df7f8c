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
//! Solver configuration

/// Default number of impulse iterations per step
pub const DEFAULT_ITERATIONS: usize = 10;

/// Default penetration slop that position correction leaves alone
pub const DEFAULT_ALLOWED_PENETRATION: f32 = 0.01;

/// Default fraction of the positional error corrected per step
pub const DEFAULT_BIAS_FACTOR: f32 = 0.2;

/// Configuration for the sequential-impulse solver
///
/// A world is built with one `SolverConfig` and passes it down to every
/// arbiter and joint operation; there is no global solver state.
///
/// # Builder Pattern
///
/// ```
/// use impulse_engine::SolverConfig;
///
/// let config = SolverConfig::new()
///     .with_iterations(20)
///     .with_warm_starting(true)
///     .with_position_correction(false);
/// assert_eq!(config.iterations, 20);
/// assert!(config.warm_starting);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Impulse iterations per step. Default: 10.
    pub iterations: usize,
    /// Feed positional error back into the velocity solve. Default: on.
    pub position_correction: bool,
    /// Seed each step with the previous step's impulses. Default: off.
    pub warm_starting: bool,
    /// Clamp accumulated rather than incremental impulses. Default: on.
    pub accumulate_impulses: bool,
    /// Contact bias factor used when position correction is on. Default: 0.2.
    pub bias_factor: f32,
    /// Penetration tolerated without correction. Default: 0.01.
    pub allowed_penetration: f32,
}

impl SolverConfig {
    /// Create a config with default values
    pub fn new() -> Self {
        SolverConfig {
            iterations: DEFAULT_ITERATIONS,
            position_correction: true,
            warm_starting: false,
            accumulate_impulses: true,
            bias_factor: DEFAULT_BIAS_FACTOR,
            allowed_penetration: DEFAULT_ALLOWED_PENETRATION,
        }
    }

    /// Set the number of solver iterations
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Toggle position correction
    pub fn with_position_correction(mut self, enabled: bool) -> Self {
        self.position_correction = enabled;
        self
    }

    /// Toggle warm starting
    pub fn with_warm_starting(mut self, enabled: bool) -> Self {
        self.warm_starting = enabled;
        self
    }

    /// Toggle accumulated impulse clamping
    pub fn with_accumulate_impulses(mut self, enabled: bool) -> Self {
        self.accumulate_impulses = enabled;
        self
    }

    /// Set the contact bias factor
    pub fn with_bias_factor(mut self, bias_factor: f32) -> Self {
        self.bias_factor = bias_factor;
        self
    }

    /// Set the allowed penetration
    pub fn with_allowed_penetration(mut self, allowed_penetration: f32) -> Self {
        self.allowed_penetration = allowed_penetration;
        self
    }

    /// Bias factor actually applied to contacts
    ///
    /// Zero when position correction is disabled.
    pub fn contact_bias_factor(&self) -> f32 {
        if self.position_correction {
            self.bias_factor
        } else {
            0.0
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SolverConfig::default();
        assert_eq!(config.iterations, DEFAULT_ITERATIONS);
        assert!(config.position_correction);
        assert!(!config.warm_starting);
        assert!(config.accumulate_impulses);
        assert_eq!(config.contact_bias_factor(), 0.2);
    }

    #[test]
    fn test_position_correction_off_zeroes_bias() {
        let config = SolverConfig::new().with_position_correction(false);
        assert_eq!(config.contact_bias_factor(), 0.0);
    }
}
