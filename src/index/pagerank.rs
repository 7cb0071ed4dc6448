//! Component G: PageRank via power iteration over the teleport-smoothed
//! transition matrix described in §4.G.
//!
//! The spec frames the transition matrix M as a dense N×N array with
//! `M[i][j] = alpha/N + (1-alpha) * A[i][j] / row_sum[i]` (or `1/N`
//! uniformly for a dangling row). Materialising that matrix costs O(N^2)
//! memory for no benefit — every row's teleport term is identical and the
//! link term is zero except at the handful of columns a page actually
//! links to. This computes the algebraically identical row-vector update
//! sparsely: for a rank vector `r`,
//!
//!   r_next[j] = alpha/N * (sum of r[i] over non-dangling i)
//!             + 1/N     * (sum of r[i] over dangling i)
//!             + (1-alpha) * (sum over i that link to j of r[i]/outdeg(i))
//!
//! which is exactly `r . M` column j, derived by distributing the per-row
//! teleport and link terms of M over the dot product.

use std::collections::HashMap;

use crate::url_normalizer::NormalUrl;

/// Computes PageRank for the pages in `pages_order` (the index's
/// first-fetch enumeration order), given each page's outlinks restricted to
/// other indexed pages. Returns ranks in the same order as `pages_order`.
pub fn compute(
    pages_order: &[NormalUrl],
    outlinks_of: impl Fn(&NormalUrl) -> Vec<NormalUrl>,
    alpha: f64,
    epsilon: f64,
) -> Vec<f64> {
    let n = pages_order.len();
    if n == 0 {
        return Vec::new();
    }

    let id_of: HashMap<&NormalUrl, usize> =
        pages_order.iter().enumerate().map(|(i, u)| (u, i)).collect();

    let adjacency: Vec<Vec<usize>> = pages_order
        .iter()
        .map(|u| {
            outlinks_of(u)
                .iter()
                .filter_map(|v| id_of.get(v).copied())
                .collect()
        })
        .collect();

    let n_f = n as f64;
    let mut r = vec![1.0 / n_f; n];

    loop {
        let non_dangling_mass: f64 = (0..n)
            .filter(|&i| !adjacency[i].is_empty())
            .map(|i| r[i])
            .sum();
        let dangling_mass: f64 = (0..n)
            .filter(|&i| adjacency[i].is_empty())
            .map(|i| r[i])
            .sum();

        let mut r_next = vec![alpha / n_f * non_dangling_mass + dangling_mass / n_f; n];

        for (i, out) in adjacency.iter().enumerate() {
            if out.is_empty() {
                continue;
            }
            let share = (1.0 - alpha) * r[i] / out.len() as f64;
            for &j in out {
                r_next[j] += share;
            }
        }

        let delta: f64 = r
            .iter()
            .zip(r_next.iter())
            .map(|(a, b)| (b - a).powi(2))
            .sum::<f64>()
            .sqrt();

        r = r_next;

        if delta <= epsilon {
            break;
        }
    }

    r
}
