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
//! Box vs. box separating-axis test with reference-face clipping

use super::clip::{clip_segment_to_line, incident_edge};
use super::{Contact, EdgeNumber, Manifold};
use crate::body::Body;
use crate::math::Vec2;

/// Candidate separating axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Local x axis of box A
    FaceAX,
    /// Local y axis of box A
    FaceAY,
    /// Local x axis of box B
    FaceBX,
    /// Local y axis of box B
    FaceBY,
}

impl Axis {
    /// Check if the reference face belongs to box B
    pub fn is_face_b(self) -> bool {
        matches!(self, Axis::FaceBX | Axis::FaceBY)
    }
}

// Hysteresis for axis selection: a later axis must beat the current one
// by a margin, which keeps the manifold from flickering between
// near-equal axes.
const RELATIVE_TOL: f32 = 0.95;
const ABSOLUTE_TOL: f32 = 0.01;

/// Reference face and side planes for the selected axis
struct ReferenceFace {
    front_normal: Vec2,
    front: f32,
    side_normal: Vec2,
    neg_side: f32,
    pos_side: f32,
    neg_edge: EdgeNumber,
    pos_edge: EdgeNumber,
}

/// Compute the contact manifold between two boxes
///
/// Returns an empty manifold when the boxes are separated on any face
/// axis. Exactly touching boxes (`separation == 0`) do produce contacts.
/// Contact normals point from `a` to `b`.
///
/// # Examples
///
/// ```
/// use impulse_engine::{Body, collision::collide, math::Vec2};
///
/// let a = Body::with_box(Vec2::new(1.0, 1.0), 1.0);
/// let mut b = Body::with_box(Vec2::new(1.0, 1.0), 1.0);
/// b.set_position(Vec2::new(1.0, 0.0));
///
/// let manifold = collide(&a, &b);
/// assert_eq!(manifold.len(), 2);
/// assert!(manifold.contacts().iter().all(|c| c.separation == 0.0));
/// ```
pub fn collide(a: &Body, b: &Body) -> Manifold {
    let mut manifold = Manifold::new();

    let h_a = a.width * 0.5;
    let h_b = b.width * 0.5;

    let pos_a = a.position;
    let pos_b = b.position;

    let rot_a = a.rotation_matrix();
    let rot_b = b.rotation_matrix();
    let rot_a_t = rot_a.transpose();
    let rot_b_t = rot_b.transpose();

    let dp = pos_b - pos_a;
    let d_a = rot_a_t * dp;
    let d_b = rot_b_t * dp;

    let c = rot_a_t * rot_b;
    let abs_c = c.abs();
    let abs_c_t = abs_c.transpose();

    let face_a = d_a.abs() - h_a - abs_c * h_b;
    if face_a.x > 0.0 || face_a.y > 0.0 {
        return manifold;
    }

    let face_b = d_b.abs() - abs_c_t * h_a - h_b;
    if face_b.x > 0.0 || face_b.y > 0.0 {
        return manifold;
    }

    let mut axis = Axis::FaceAX;
    let mut separation = face_a.x;
    let mut normal = if d_a.x > 0.0 { rot_a.col1 } else { -rot_a.col1 };

    if face_a.y > RELATIVE_TOL * separation + ABSOLUTE_TOL * h_a.y {
        axis = Axis::FaceAY;
        separation = face_a.y;
        normal = if d_a.y > 0.0 { rot_a.col2 } else { -rot_a.col2 };
    }

    if face_b.x > RELATIVE_TOL * separation + ABSOLUTE_TOL * h_b.x {
        axis = Axis::FaceBX;
        separation = face_b.x;
        normal = if d_b.x > 0.0 { rot_b.col1 } else { -rot_b.col1 };
    }

    if face_b.y > RELATIVE_TOL * separation + ABSOLUTE_TOL * h_b.y {
        axis = Axis::FaceBY;
        normal = if d_b.y > 0.0 { rot_b.col2 } else { -rot_b.col2 };
    }

    let (face, incident) = match axis {
        Axis::FaceAX => {
            let side_normal = rot_a.col2;
            let side = pos_a.dot(side_normal);
            (
                ReferenceFace {
                    front_normal: normal,
                    front: pos_a.dot(normal) + h_a.x,
                    side_normal,
                    neg_side: -side + h_a.y,
                    pos_side: side + h_a.y,
                    neg_edge: EdgeNumber::Edge3,
                    pos_edge: EdgeNumber::Edge1,
                },
                incident_edge(h_b, pos_b, rot_b, normal),
            )
        }
        Axis::FaceAY => {
            let side_normal = rot_a.col1;
            let side = pos_a.dot(side_normal);
            (
                ReferenceFace {
                    front_normal: normal,
                    front: pos_a.dot(normal) + h_a.y,
                    side_normal,
                    neg_side: -side + h_a.x,
                    pos_side: side + h_a.x,
                    neg_edge: EdgeNumber::Edge2,
                    pos_edge: EdgeNumber::Edge4,
                },
                incident_edge(h_b, pos_b, rot_b, normal),
            )
        }
        Axis::FaceBX => {
            let front_normal = -normal;
            let side_normal = rot_b.col2;
            let side = pos_b.dot(side_normal);
            (
                ReferenceFace {
                    front_normal,
                    front: pos_b.dot(front_normal) + h_b.x,
                    side_normal,
                    neg_side: -side + h_b.y,
                    pos_side: side + h_b.y,
                    neg_edge: EdgeNumber::Edge3,
                    pos_edge: EdgeNumber::Edge1,
                },
                incident_edge(h_a, pos_a, rot_a, front_normal),
            )
        }
        Axis::FaceBY => {
            let front_normal = -normal;
            let side_normal = rot_b.col1;
            let side = pos_b.dot(side_normal);
            (
                ReferenceFace {
                    front_normal,
                    front: pos_b.dot(front_normal) + h_b.y,
                    side_normal,
                    neg_side: -side + h_b.x,
                    pos_side: side + h_b.x,
                    neg_edge: EdgeNumber::Edge2,
                    pos_edge: EdgeNumber::Edge4,
                },
                incident_edge(h_a, pos_a, rot_a, front_normal),
            )
        }
    };

    // Clip the incident edge against both side planes of the reference face
    let (clip_points1, np) =
        clip_segment_to_line(&incident, -face.side_normal, face.neg_side, face.neg_edge);
    if np < 2 {
        return manifold;
    }

    let (clip_points2, np) =
        clip_segment_to_line(&clip_points1, face.side_normal, face.pos_side, face.pos_edge);
    if np < 2 {
        return manifold;
    }

    // Roundoff can still cull both points here
    for point in &clip_points2 {
        let separation = face.front_normal.dot(point.v) - face.front;
        if separation <= 0.0 {
            let feature = if axis.is_face_b() {
                point.fp.swapped()
            } else {
                point.fp
            };
            manifold.push(Contact {
                separation,
                normal,
                // Slide the point onto the reference face
                position: point.v - face.front_normal * separation,
                feature,
                ..Contact::default()
            });
        }
    }

    manifold
}
