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
//! Segment clipping and incident-edge selection

use super::{EdgeNumber, FeaturePair};
use crate::math::{sign, Mat22, Vec2};

/// Segment endpoint tagged with the features that produced it
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct ClipVertex {
    pub v: Vec2,
    pub fp: FeaturePair,
}

/// Clip a segment against the half-plane `normal . x <= offset`
///
/// Returns the surviving points and how many of them are valid. An
/// endpoint on the plane survives. When the segment crosses the plane
/// the intersection is emitted with `clip_edge` stamped into the
/// feature of the endpoint that was cut away.
pub(crate) fn clip_segment_to_line(
    v_in: &[ClipVertex; 2],
    normal: Vec2,
    offset: f32,
    clip_edge: EdgeNumber,
) -> ([ClipVertex; 2], usize) {
    let mut v_out = [ClipVertex::default(); 2];
    let mut num_out = 0;

    let distance0 = normal.dot(v_in[0].v) - offset;
    let distance1 = normal.dot(v_in[1].v) - offset;

    if distance0 <= 0.0 {
        v_out[num_out] = v_in[0];
        num_out += 1;
    }
    if distance1 <= 0.0 {
        v_out[num_out] = v_in[1];
        num_out += 1;
    }

    // Both distances are non-zero here, so at most one point was kept
    if distance0 * distance1 < 0.0 {
        let interp = distance0 / (distance0 - distance1);
        let mut vertex = ClipVertex {
            v: v_in[0].v + (v_in[1].v - v_in[0].v) * interp,
            fp: FeaturePair::default(),
        };
        if distance0 > 0.0 {
            vertex.fp = v_in[0].fp;
            vertex.fp.in_edge1 = clip_edge;
            vertex.fp.in_edge2 = EdgeNumber::NoEdge;
        } else {
            vertex.fp = v_in[1].fp;
            vertex.fp.out_edge1 = clip_edge;
            vertex.fp.out_edge2 = EdgeNumber::NoEdge;
        }
        v_out[num_out] = vertex;
        num_out += 1;
    }

    (v_out, num_out)
}

/// Edge of the incident box most anti-parallel to the reference normal
///
/// `h` is the incident box's half extent, `pos` and `rot` its placement.
/// Endpoints are returned in world space, tagged with the incident
/// box's edge numbers in the second slot of the feature pair.
pub(crate) fn incident_edge(h: Vec2, pos: Vec2, rot: Mat22, normal: Vec2) -> [ClipVertex; 2] {
    // Reference normal in the incident frame, flipped
    let n = -(rot.transpose() * normal);
    let n_abs = n.abs();

    let corners = if n_abs.x > n_abs.y {
        if sign(n.x) > 0.0 {
            [
                (Vec2::new(h.x, -h.y), EdgeNumber::Edge3, EdgeNumber::Edge4),
                (Vec2::new(h.x, h.y), EdgeNumber::Edge4, EdgeNumber::Edge1),
            ]
        } else {
            [
                (Vec2::new(-h.x, h.y), EdgeNumber::Edge1, EdgeNumber::Edge2),
                (Vec2::new(-h.x, -h.y), EdgeNumber::Edge2, EdgeNumber::Edge3),
            ]
        }
    } else if sign(n.y) > 0.0 {
        [
            (Vec2::new(h.x, h.y), EdgeNumber::Edge4, EdgeNumber::Edge1),
            (Vec2::new(-h.x, h.y), EdgeNumber::Edge1, EdgeNumber::Edge2),
        ]
    } else {
        [
            (Vec2::new(-h.x, -h.y), EdgeNumber::Edge2, EdgeNumber::Edge3),
            (Vec2::new(h.x, -h.y), EdgeNumber::Edge3, EdgeNumber::Edge4),
        ]
    };

    corners.map(|(local, in_edge2, out_edge2)| ClipVertex {
        v: pos + rot * local,
        fp: FeaturePair {
            in_edge2,
            out_edge2,
            ..FeaturePair::default()
        },
    })
}
