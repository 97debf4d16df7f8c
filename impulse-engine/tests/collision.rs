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
//! Narrow-phase tests through the public collision API

use impulse_engine::collision::{collide, EdgeNumber, MAX_CONTACTS};
use impulse_engine::math::Vec2;
use impulse_engine::Body;
use std::f32::consts::FRAC_PI_4;

fn placed(width: Vec2, mass: f32, x: f32, y: f32, rotation: f32) -> Body {
    let mut body = Body::with_box(width, mass);
    body.set_position(Vec2::new(x, y));
    body.set_rotation(rotation);
    body
}

#[test]
fn test_no_overlap_is_empty_on_every_axis() {
    let a = placed(Vec2::new(1.0, 1.0), 1.0, 0.0, 0.0, 0.0);
    for (x, y) in [(1.2, 0.0), (-1.2, 0.0), (0.0, 1.2), (0.0, -1.2)] {
        let b = placed(Vec2::new(1.0, 1.0), 1.0, x, y, 0.0);
        assert!(collide(&a, &b).is_empty(), "({}, {})", x, y);
    }
}

#[test]
fn test_exact_touch_is_included() {
    let a = placed(Vec2::new(1.0, 1.0), 1.0, 0.0, 0.0, 0.0);
    let b = placed(Vec2::new(1.0, 1.0), 1.0, 1.0, 0.0, 0.0);
    let manifold = collide(&a, &b);
    assert_eq!(manifold.len(), MAX_CONTACTS);
    assert!(manifold.contacts().iter().all(|c| c.separation == 0.0));
}

#[test]
fn test_contact_points_span_overlap() {
    // Small box half hanging off the ground's right end
    let ground = placed(Vec2::new(4.0, 1.0), f32::MAX, 0.0, -0.5, 0.0);
    let top = placed(Vec2::new(1.0, 1.0), 1.0, 2.0, 0.45, 0.0);
    let manifold = collide(&ground, &top);
    assert_eq!(manifold.len(), 2);

    let mut xs: Vec<f32> = manifold.contacts().iter().map(|c| c.position.x).collect();
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert!((xs[0] - 1.5).abs() < 1e-5);
    // Clipped against the ground's right side
    assert!((xs[1] - 2.0).abs() < 1e-5);
}

#[test]
fn test_clipped_point_carries_clip_edge() {
    let ground = placed(Vec2::new(4.0, 1.0), f32::MAX, 0.0, -0.5, 0.0);
    let top = placed(Vec2::new(1.0, 1.0), 1.0, 2.0, 0.45, 0.0);
    let manifold = collide(&ground, &top);
    let clipped = manifold
        .contacts()
        .iter()
        .find(|c| (c.position.x - 2.0).abs() < 1e-5)
        .unwrap();
    let fp = clipped.feature;
    assert!(fp.in_edge1 == EdgeNumber::Edge4 || fp.out_edge1 == EdgeNumber::Edge4);
}

#[test]
fn test_features_stable_under_small_motion() {
    let ground = placed(Vec2::new(10.0, 1.0), f32::MAX, 0.0, -0.5, 0.0);
    let before = collide(&ground, &placed(Vec2::new(1.0, 1.0), 1.0, 0.0, 0.48, 0.0));
    let after = collide(&ground, &placed(Vec2::new(1.0, 1.0), 1.0, 0.01, 0.47, 0.0));

    assert_eq!(before.len(), after.len());
    for contact in before.contacts() {
        assert!(after.find(contact.feature).is_some());
    }
}

#[test]
fn test_corner_contact_on_rotated_box() {
    let ground = placed(Vec2::new(10.0, 1.0), f32::MAX, 0.0, -0.5, 0.0);
    let diamond = placed(Vec2::new(1.0, 1.0), 1.0, 0.0, 0.69, FRAC_PI_4);
    let manifold = collide(&ground, &diamond);
    assert_eq!(manifold.len(), 1);
    let c = manifold.contacts()[0];
    assert!((c.separation - (0.69 - 0.5_f32.sqrt())).abs() < 1e-5);
    assert_eq!(c.normal, Vec2::new(0.0, 1.0));
}
