//! Pivot selection.
//!
//! Given a frontier `S` and a distance bound `B`, picks a small set of
//! pivot vertices `P` that dominate the bounded-relaxation neighbourhood of
//! `S`, plus the full set of vertices `W` discovered while walking that
//! neighbourhood. Recursing on `P` instead of all of `S` is what keeps the
//! recursion's branching factor bounded.

use std::cmp::Ordering;
use std::collections::HashSet;

use num_traits::Float;

use crate::csr::CsrGraph;
use crate::instrumentation::Instrumentation;
use crate::params::BmsspParams;

pub struct PivotFinder;

impl PivotFinder {
    /// Select pivots `P` and the discovered set `W` for frontier `s` bounded
    /// by `b`.
    ///
    /// `dist` holds the current best known distance for every vertex and is
    /// only ever read here, never advanced past what the caller already
    /// committed. Returns `(P, W)`; `P` is never empty unless `s` is.
    pub fn find_pivots<T>(
        graph: &CsrGraph,
        weights: &[T],
        dist: &[T],
        s: &[usize],
        b: T,
        params: &BmsspParams,
        mut instrumentation: Option<&mut Instrumentation>,
    ) -> (Vec<usize>, Vec<usize>)
    where
        T: Float,
    {
        let mut s_filtered: Vec<usize> = s.iter().copied().filter(|&v| dist[v] < b).collect();

        let p_limit = params.p_limit.max(1);
        let mut p: Vec<usize> = Vec::new();

        if s_filtered.is_empty() {
            let limit = 1.max(s.len().min(p_limit));
            p.extend(s.iter().copied().take(limit));
        } else {
            s_filtered.sort_by(|&a, &b2| {
                dist[a].partial_cmp(&dist[b2]).unwrap_or(Ordering::Equal)
            });
            let limit = 1.max(s_filtered.len().min(p_limit));
            p.extend(s_filtered.into_iter().take(limit));
        }

        let source_frontier: Vec<usize> = if p.is_empty() { s.to_vec() } else { p.clone() };
        let mut discovered: HashSet<usize> = source_frontier.iter().copied().collect();
        let mut discovered_order: Vec<usize> = source_frontier.clone();
        let mut frontier = source_frontier;

        for _ in 0..params.k_steps.max(1) {
            if frontier.is_empty() {
                break;
            }
            let mut next_front = Vec::new();
            for &u in &frontier {
                let du = dist[u];
                if du >= b {
                    continue;
                }
                let (start, _) = graph.edge_range(u);
                for (eid, &v) in graph.neighbors(u).iter().enumerate() {
                    if let Some(instr) = instrumentation.as_mut() {
                        instr.record_relaxation();
                    }
                    let w = weights[start + eid];
                    let nd = du + w;
                    if nd < b && discovered.insert(v) {
                        discovered_order.push(v);
                        next_front.push(v);
                    }
                }
            }
            frontier = next_front;
        }

        if p.is_empty() && !s.is_empty() {
            // Deterministic fallback: the smallest vertex id in S, rather
            // than an arbitrary iteration-order element.
            p.push(*s.iter().min().unwrap());
        }

        (p, discovered_order)
    }
}
