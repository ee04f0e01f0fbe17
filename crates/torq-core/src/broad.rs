// SPDX-License-Identifier: Apache-2.0
//! Broad phase: candidate pair enumeration.
//!
//! Pairs are always emitted in canonical `(min_id, max_id)` form and the
//! final list is sorted ascending, so the narrow phase visits pairs in the
//! same order on every run regardless of how candidates were discovered.

use rustc_hash::FxHashMap;
use torq_math::{Aabb, Vec2};

use crate::body::BodyId;
use crate::grid::SpatialGrid;

/// Per-body snapshot taken before pairing, so pairing is pure.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Proxy {
    pub id: BodyId,
    pub position: Vec2,
    pub aabb: Aabb,
    pub is_static: bool,
    pub solid: bool,
}

fn admissible(a: &Proxy, b: &Proxy) -> bool {
    if a.is_static && b.is_static {
        return false;
    }
    if !a.solid || !b.solid {
        return false;
    }
    a.aabb.overlaps(&b.aabb)
}

/// Enumerates candidate pairs, either through the grid neighborhood or by
/// exhaustive O(n^2) scan when no grid is configured.
pub(crate) fn candidate_pairs(
    proxies: &[Proxy],
    index_of: &FxHashMap<BodyId, usize>,
    grid: Option<&SpatialGrid>,
    scratch: &mut Vec<BodyId>,
) -> Vec<(BodyId, BodyId)> {
    let mut pairs = Vec::new();
    if let Some(grid) = grid {
        for proxy in proxies {
            scratch.clear();
            grid.potential_colliders(proxy.position, scratch);
            for &candidate in scratch.iter() {
                // Each unordered pair is claimed by its lower id.
                if candidate <= proxy.id {
                    continue;
                }
                let Some(&j) = index_of.get(&candidate) else {
                    continue;
                };
                if admissible(proxy, &proxies[j]) {
                    pairs.push((proxy.id, candidate));
                }
            }
        }
    } else {
        for (i, a) in proxies.iter().enumerate() {
            for b in &proxies[i + 1..] {
                if admissible(a, b) {
                    let (lo, hi) = if a.id < b.id { (a.id, b.id) } else { (b.id, a.id) };
                    pairs.push((lo, hi));
                }
            }
        }
    }
    pairs.sort_unstable();
    pairs.dedup();
    pairs
}
