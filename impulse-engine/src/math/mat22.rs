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
//! Column-major 2x2 matrix

use crate::math::Vec2;
use std::ops::{Add, Mul};

/// 2x2 matrix stored as two columns
///
/// `Mat22::from_angle` builds the rotation used for every box frame;
/// its transpose maps world vectors into the box's local frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Mat22 {
    /// First column
    pub col1: Vec2,
    /// Second column
    pub col2: Vec2,
}

impl Mat22 {
    /// The zero matrix
    pub const ZERO: Mat22 = Mat22 { col1: Vec2::ZERO, col2: Vec2::ZERO };

    /// The identity matrix
    pub const IDENTITY: Mat22 = Mat22 {
        col1: Vec2::new(1.0, 0.0),
        col2: Vec2::new(0.0, 1.0),
    };

    /// Create a matrix from its columns
    pub const fn new(col1: Vec2, col2: Vec2) -> Self {
        Mat22 { col1, col2 }
    }

    /// Pure rotation by `angle` radians (counter-clockwise)
    pub fn from_angle(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat22::new(Vec2::new(c, s), Vec2::new(-s, c))
    }

    /// Transposed matrix
    pub fn transpose(self) -> Self {
        Mat22::new(
            Vec2::new(self.col1.x, self.col2.x),
            Vec2::new(self.col1.y, self.col2.y),
        )
    }

    /// Inverse matrix
    ///
    /// The determinant is not checked: a singular matrix yields
    /// non-finite entries. Effective-mass matrices built from valid
    /// mass properties are never singular.
    pub fn invert(self) -> Self {
        let (a, b, c, d) = (self.col1.x, self.col2.x, self.col1.y, self.col2.y);
        let det = 1.0 / (a * d - b * c);
        Mat22::new(Vec2::new(det * d, -det * c), Vec2::new(-det * b, det * a))
    }

    /// Element-wise absolute value
    pub fn abs(self) -> Self {
        Mat22::new(self.col1.abs(), self.col2.abs())
    }
}

impl Mul<Vec2> for Mat22 {
    type Output = Vec2;

    fn mul(self, v: Vec2) -> Vec2 {
        Vec2::new(
            self.col1.x * v.x + self.col2.x * v.y,
            self.col1.y * v.x + self.col2.y * v.y,
        )
    }
}

impl Mul for Mat22 {
    type Output = Mat22;

    fn mul(self, rhs: Mat22) -> Mat22 {
        Mat22::new(self * rhs.col1, self * rhs.col2)
    }
}

impl Add for Mat22 {
    type Output = Mat22;

    fn add(self, rhs: Mat22) -> Mat22 {
        Mat22::new(self.col1 + rhs.col1, self.col2 + rhs.col2)
    }
}
