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
//! Vector and matrix primitives
//!
//! Plain value types with no state. Everything here is `f32`.

mod mat22;
mod vec2;

pub use mat22::Mat22;
pub use vec2::Vec2;

/// Sign of `a`, treating zero as positive
pub fn sign(a: f32) -> f32 {
    if a < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Clamp `a` into `[low, high]`
///
/// Unlike `f32::clamp` this never panics when `low > high`; the result
/// is then `low`.
pub fn clamp(a: f32, low: f32, high: f32) -> f32 {
    low.max(a.min(high))
}
