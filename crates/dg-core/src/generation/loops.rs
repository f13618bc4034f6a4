//! Loop augmentation
//!
//! Adds non-tree edges so the average degree reaches about 3. Pairs that are
//! far apart in the tree are preferred, which turns long dead branches into
//! loops instead of adding short-cut triangles.

use std::collections::VecDeque;

use hashbrown::HashSet;
use tracing::debug;

use crate::consts::{LOOP_BUFFER_MAX, LOOP_BUFFER_MIN};
use crate::rng::RegionRng;

/// Extra edges needed for an average degree of 3 over `n` nodes
///
/// With N-1 tree edges, E extra edges give 2(N-1+E)/N >= 3 once
/// E >= (N+2)/2.
pub fn base_extra_edges(n: usize) -> usize {
    (n + 2).div_ceil(2).max(1)
}

/// Number of extra edges to aim for
pub fn target_extra_edges(n: usize, loop_frequency: f64, buffer: f64) -> usize {
    let freq = loop_frequency.clamp(0.0, 1.0);
    let base = base_extra_edges(n) as f64;
    (base * (1.0 + buffer) * (1.0 + freq)).ceil() as usize
}

/// Hop distances between all node pairs over the tree
fn tree_distances(n: usize, tree: &[(usize, usize)]) -> Vec<Vec<usize>> {
    let mut adjacency = vec![Vec::new(); n];
    for &(a, b) in tree {
        adjacency[a].push(b);
        adjacency[b].push(a);
    }
    (0..n)
        .map(|start| {
            let mut dist = vec![usize::MAX; n];
            dist[start] = 0;
            let mut queue = VecDeque::from([start]);
            while let Some(i) = queue.pop_front() {
                for &j in &adjacency[i] {
                    if dist[j] == usize::MAX {
                        dist[j] = dist[i] + 1;
                        queue.push_back(j);
                    }
                }
            }
            dist
        })
        .collect()
}

/// Choose extra edges for a spanning tree, as `(i, j)` pairs with `i < j`
pub fn augment_loops(
    n: usize,
    tree: &[(usize, usize)],
    loop_frequency: f64,
    rng: &mut RegionRng,
) -> Vec<(usize, usize)> {
    let buffer = rng.range_f64(LOOP_BUFFER_MIN, LOOP_BUFFER_MAX);
    if n < 3 {
        return Vec::new();
    }
    let target = target_extra_edges(n, loop_frequency, buffer);

    let existing: HashSet<(usize, usize)> =
        tree.iter().map(|&(a, b)| (a.min(b), a.max(b))).collect();
    let dist = tree_distances(n, tree);

    let mut far = Vec::new();
    let mut near = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if existing.contains(&(i, j)) {
                continue;
            }
            if dist[i][j] > 2 {
                far.push((i, j));
            } else {
                near.push((i, j));
            }
        }
    }

    let mut chosen = rng.sample(&far, target);
    if chosen.len() < target {
        let missing = target - chosen.len();
        chosen.extend(rng.sample(&near, missing));
    }

    debug!(
        nodes = n,
        target,
        added = chosen.len(),
        far_candidates = far.len(),
        "loop edges chosen"
    );
    chosen
}
