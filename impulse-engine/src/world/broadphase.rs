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
//! All-pairs candidate generation
//!
//! Every pair `i < j` of world members is collided in insertion order.
//! Pairs where both bodies are static are skipped, as are pairs whose
//! manifold comes back empty. With the `parallel` feature the pairs are
//! evaluated on the rayon pool; the output order is identical to the
//! serial path.

use crate::body::{BodyHandle, BodySet};
use crate::solver::Arbiter;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Below this many bodies the pair loop stays on the calling thread
#[cfg(feature = "parallel")]
pub const PARALLEL_THRESHOLD: usize = 64;

/// Collide one pair, returning an arbiter only if they touch
fn pair_candidate(bodies: &BodySet, h1: BodyHandle, h2: BodyHandle) -> Option<Arbiter> {
    let b1 = bodies.get(h1)?;
    let b2 = bodies.get(h2)?;
    if b1.is_static() && b2.is_static() {
        return None;
    }
    Arbiter::new(h1, b1, h2, b2).filter(|arbiter| !arbiter.is_empty())
}

fn collect_serial(members: &[BodyHandle], bodies: &BodySet, out: &mut Vec<Arbiter>) {
    for (i, &h1) in members.iter().enumerate() {
        for &h2 in &members[i + 1..] {
            if let Some(arbiter) = pair_candidate(bodies, h1, h2) {
                out.push(arbiter);
            }
        }
    }
}

/// Append the touching pairs of `members` to `out`, in pair order
#[cfg(feature = "parallel")]
pub(crate) fn collect_candidates(members: &[BodyHandle], bodies: &BodySet, out: &mut Vec<Arbiter>) {
    if members.len() < PARALLEL_THRESHOLD {
        collect_serial(members, bodies, out);
        return;
    }

    let n = members.len();
    out.par_extend((0..n).into_par_iter().flat_map_iter(move |i| {
        let h1 = members[i];
        members[i + 1..]
            .iter()
            .filter_map(move |&h2| pair_candidate(bodies, h1, h2))
    }));
}

/// Append the touching pairs of `members` to `out`, in pair order
#[cfg(not(feature = "parallel"))]
pub(crate) fn collect_candidates(members: &[BodyHandle], bodies: &BodySet, out: &mut Vec<Arbiter>) {
    collect_serial(members, bodies, out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Body;
    use crate::math::Vec2;

    fn stack(bodies: &mut BodySet, count: usize) -> Vec<BodyHandle> {
        let mut members = Vec::new();
        let mut ground = Body::with_box(Vec2::new(40.0, 1.0), f32::MAX);
        ground.set_position(Vec2::new(0.0, -0.5));
        members.push(bodies.insert(ground));
        for i in 0..count {
            let mut body = Body::with_box(Vec2::new(1.0, 1.0), 1.0);
            body.set_position(Vec2::new(0.0, 0.48 + 0.98 * i as f32));
            members.push(bodies.insert(body));
        }
        members
    }

    #[test]
    fn test_static_pairs_are_skipped() {
        let mut bodies = BodySet::new();
        let a = bodies.insert(Body::new());
        let b = bodies.insert(Body::new());
        let mut out = Vec::new();
        collect_candidates(&[a, b], &bodies, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_stack_produces_adjacent_pairs_in_order() {
        let mut bodies = BodySet::new();
        let members = stack(&mut bodies, 3);
        let mut out = Vec::new();
        collect_candidates(&members, &bodies, &mut out);

        let pairs: Vec<_> = out.iter().map(|a| (a.body1(), a.body2())).collect();
        assert_eq!(
            pairs,
            vec![
                (members[0], members[1]),
                (members[1], members[2]),
                (members[2], members[3]),
            ]
        );
    }

    #[test]
    fn test_stale_members_are_ignored() {
        let mut bodies = BodySet::new();
        let members = stack(&mut bodies, 2);
        bodies.remove(members[1]);
        let mut out = Vec::new();
        collect_candidates(&members, &bodies, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_large_set_matches_serial_order() {
        let mut bodies = BodySet::new();
        let members = stack(&mut bodies, 100);

        let mut serial = Vec::new();
        collect_serial(&members, &bodies, &mut serial);
        let mut candidates = Vec::new();
        collect_candidates(&members, &bodies, &mut candidates);

        assert_eq!(serial.len(), 100);
        assert_eq!(serial, candidates);
    }
}
