//! Basecase and BMSSP recursion, plus the top-level driver.
//!
//! `BMSSP` recurses on ever-smaller pivot-derived frontiers until it hits
//! level 0, where `Basecase` takes over with a `k`-limited Dijkstra variant.
//! Both feed a shared `dist`/`pred` pair that only ever improves across the
//! whole recursion.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};

use num_traits::Float;

#[cfg(feature = "simd")]
use std::any::TypeId;
#[cfg(feature = "simd")]
use wide::{f32x4, f64x2};

use crate::block_heap::BlockD;
use crate::csr::CsrGraph;
use crate::error::Result;
use crate::instrumentation::Instrumentation;
use crate::ordered_float::OrderedFloat;
use crate::params::{recursion_level, BmsspParams};
use crate::pivot::PivotFinder;
use crate::validation::{validate_source, validate_weights, validate_weights_len};

/// Safety valve on `BMSSP`'s main loop: if it runs this many iterations
/// without draining `D` or reaching its target set size, the loop is
/// abandoned (not the whole query) and the frame returns whatever it has.
const BMSSP_LOOP_GUARD: usize = 20_000;

fn relax_bounded<T>(
    graph: &CsrGraph,
    weights: &[T],
    u: usize,
    dist: &mut [T],
    pred: &mut [usize],
    heap: &mut BinaryHeap<Reverse<(OrderedFloat<T>, usize)>>,
    bound: T,
    mut instrumentation: Option<&mut Instrumentation>,
) where
    T: Float + 'static,
{
    #[cfg(feature = "simd")]
    if try_relax_bounded_simd(
        graph,
        weights,
        u,
        dist,
        pred,
        heap,
        bound,
        instrumentation.as_deref_mut(),
    ) {
        return;
    }

    let (start, _end) = graph.edge_range(u);
    for (eid, &v) in graph.neighbors(u).iter().enumerate() {
        if let Some(instr) = instrumentation.as_mut() {
            instr.record_relaxation();
        }
        let w = weights[start + eid];
        let new_dist = dist[u] + w;
        if new_dist < dist[v] && new_dist < bound {
            dist[v] = new_dist;
            pred[v] = u;
            heap.push(Reverse((OrderedFloat(new_dist), v)));
            if let Some(instr) = instrumentation.as_mut() {
                instr.record_heap_op();
            }
        }
    }
}

#[cfg(feature = "simd")]
fn try_relax_bounded_simd<T>(
    graph: &CsrGraph,
    weights: &[T],
    u: usize,
    dist: &mut [T],
    pred: &mut [usize],
    heap: &mut BinaryHeap<Reverse<(OrderedFloat<T>, usize)>>,
    bound: T,
    mut instrumentation: Option<&mut Instrumentation>,
) -> bool
where
    T: Float + 'static,
{
    if TypeId::of::<T>() == TypeId::of::<f32>() {
        // SAFETY: verified T is f32 for this branch.
        let weights_f32 = unsafe { &*(weights as *const [T] as *const [f32]) };
        let dist_f32 = unsafe { &mut *(dist as *mut [T] as *mut [f32]) };
        let bound_f32 = bound.to_f32().unwrap_or(f32::INFINITY);
        relax_bounded_simd_f32(
            graph,
            weights_f32,
            u,
            dist_f32,
            pred,
            bound_f32,
            |v, new_dist| heap.push(Reverse((OrderedFloat(T::from(new_dist).unwrap()), v))),
            instrumentation.as_deref_mut(),
        );
        return true;
    }

    if TypeId::of::<T>() == TypeId::of::<f64>() {
        // SAFETY: verified T is f64 for this branch.
        let weights_f64 = unsafe { &*(weights as *const [T] as *const [f64]) };
        let dist_f64 = unsafe { &mut *(dist as *mut [T] as *mut [f64]) };
        let bound_f64 = bound.to_f64().unwrap_or(f64::INFINITY);
        relax_bounded_simd_f64(
            graph,
            weights_f64,
            u,
            dist_f64,
            pred,
            bound_f64,
            |v, new_dist| heap.push(Reverse((OrderedFloat(T::from(new_dist).unwrap()), v))),
            instrumentation.as_deref_mut(),
        );
        return true;
    }

    false
}

#[cfg(feature = "simd")]
#[allow(clippy::too_many_arguments)]
fn relax_bounded_simd_f32(
    graph: &CsrGraph,
    weights: &[f32],
    u: usize,
    dist: &mut [f32],
    pred: &mut [usize],
    bound: f32,
    mut push: impl FnMut(usize, f32),
    mut instrumentation: Option<&mut Instrumentation>,
) {
    let neighbors = graph.neighbors(u);
    let (start, _end) = graph.edge_range(u);
    let dist_u = dist[u];
    let mut idx = 0;

    while idx + 4 <= neighbors.len() {
        let edge_idx = start + idx;
        let w = f32x4::new([
            weights[edge_idx],
            weights[edge_idx + 1],
            weights[edge_idx + 2],
            weights[edge_idx + 3],
        ]);
        let new_dist = w + f32x4::splat(dist_u);
        let new_vals = new_dist.to_array();
        if let Some(instr) = instrumentation.as_mut() {
            for _ in 0..4 {
                instr.record_relaxation();
            }
        }

        for lane in 0..4 {
            let v = neighbors[idx + lane];
            let candidate = new_vals[lane];
            if candidate < dist[v] && candidate < bound {
                dist[v] = candidate;
                pred[v] = u;
                push(v, candidate);
                if let Some(instr) = instrumentation.as_mut() {
                    instr.record_heap_op();
                }
            }
        }

        idx += 4;
    }

    for (eid, &v) in neighbors[idx..].iter().enumerate() {
        let edge_idx = start + idx + eid;
        if let Some(instr) = instrumentation.as_mut() {
            instr.record_relaxation();
        }
        let new_dist = dist_u + weights[edge_idx];
        if new_dist < dist[v] && new_dist < bound {
            dist[v] = new_dist;
            pred[v] = u;
            push(v, new_dist);
            if let Some(instr) = instrumentation.as_mut() {
                instr.record_heap_op();
            }
        }
    }
}

#[cfg(feature = "simd")]
#[allow(clippy::too_many_arguments)]
fn relax_bounded_simd_f64(
    graph: &CsrGraph,
    weights: &[f64],
    u: usize,
    dist: &mut [f64],
    pred: &mut [usize],
    bound: f64,
    mut push: impl FnMut(usize, f64),
    mut instrumentation: Option<&mut Instrumentation>,
) {
    let neighbors = graph.neighbors(u);
    let (start, _end) = graph.edge_range(u);
    let dist_u = dist[u];
    let mut idx = 0;

    while idx + 2 <= neighbors.len() {
        let edge_idx = start + idx;
        let w = f64x2::new([weights[edge_idx], weights[edge_idx + 1]]);
        let new_dist = w + f64x2::splat(dist_u);
        let new_vals = new_dist.to_array();
        if let Some(instr) = instrumentation.as_mut() {
            for _ in 0..2 {
                instr.record_relaxation();
            }
        }

        for lane in 0..2 {
            let v = neighbors[idx + lane];
            let candidate = new_vals[lane];
            if candidate < dist[v] && candidate < bound {
                dist[v] = candidate;
                pred[v] = u;
                push(v, candidate);
                if let Some(instr) = instrumentation.as_mut() {
                    instr.record_heap_op();
                }
            }
        }

        idx += 2;
    }

    for (eid, &v) in neighbors[idx..].iter().enumerate() {
        let edge_idx = start + idx + eid;
        if let Some(instr) = instrumentation.as_mut() {
            instr.record_relaxation();
        }
        let new_dist = dist_u + weights[edge_idx];
        if new_dist < dist[v] && new_dist < bound {
            dist[v] = new_dist;
            pred[v] = u;
            push(v, new_dist);
            if let Some(instr) = instrumentation.as_mut() {
                instr.record_heap_op();
            }
        }
    }
}

/// The `k`-limited Dijkstra variant run at recursion level 0.
///
/// Grows `U0` by standard Dijkstra expansion from the least-distance
/// vertex in `s`, bounded by `b`, until either `|U0| = k+1` or the heap
/// drains. If it stopped early (drained), the whole frontier is returned
/// unfiltered with bound `b`. Otherwise the `k+1`-th distance becomes the
/// new bound and only the strictly-closer vertices survive.
fn basecase<T>(
    graph: &CsrGraph,
    weights: &[T],
    dist: &mut [T],
    pred: &mut [usize],
    b: T,
    s: &[usize],
    k: usize,
    mut instrumentation: Option<&mut Instrumentation>,
) -> (T, Vec<usize>)
where
    T: Float + 'static,
{
    if s.is_empty() {
        return (b, Vec::new());
    }

    let x = *s
        .iter()
        .min_by(|&&a, &&b2| dist[a].partial_cmp(&dist[b2]).unwrap_or(Ordering::Equal))
        .unwrap();

    let mut heap = BinaryHeap::new();
    heap.push(Reverse((OrderedFloat(dist[x]), x)));
    if let Some(instr) = instrumentation.as_mut() {
        instr.record_heap_op();
    }

    let mut u0 = Vec::new();

    while !heap.is_empty() && u0.len() < k + 1 {
        let Reverse((OrderedFloat(d_u), u)) = heap.pop().unwrap();
        if let Some(instr) = instrumentation.as_mut() {
            instr.record_heap_op();
        }
        if d_u > dist[u] {
            continue;
        }
        u0.push(u);

        relax_bounded(
            graph,
            weights,
            u,
            dist,
            pred,
            &mut heap,
            b,
            instrumentation.as_deref_mut(),
        );
    }

    if u0.len() <= k {
        (b, u0)
    } else {
        let finite_max = u0
            .iter()
            .map(|&v| dist[v])
            .filter(|d| d.is_finite())
            .fold(None, |acc: Option<T>, d| {
                Some(match acc {
                    Some(m) if m > d => m,
                    _ => d,
                })
            });

        match finite_max {
            None => (b, Vec::new()),
            Some(max_d) => {
                let filtered: Vec<usize> = u0.iter().copied().filter(|&v| dist[v] < max_d).collect();
                (max_d, filtered)
            }
        }
    }
}

/// `BMSSP`: bounded multi-source shortest paths, recursing from level `l`
/// down to the basecase.
///
/// `dist`/`pred` are shared mutable state across the whole recursion tree;
/// every frame only ever tightens them, never loosens. Returns `(B', U)`:
/// the achieved bound and the set of vertices settled strictly below it.
#[allow(clippy::too_many_arguments)]
pub fn bmssp<T>(
    graph: &CsrGraph,
    weights: &[T],
    dist: &mut [T],
    pred: &mut [usize],
    l: usize,
    b: T,
    s: &[usize],
    params: &BmsspParams,
    mut instrumentation: Option<&mut Instrumentation>,
) -> (T, Vec<usize>)
where
    T: Float + 'static,
{
    if l == 0 {
        if s.is_empty() {
            return (b, Vec::new());
        }
        return basecase(graph, weights, dist, pred, b, s, params.k, instrumentation);
    }

    log::trace!("bmssp enter: level={} frontier={}", l, s.len());

    let (p, w) = PivotFinder::find_pivots(
        graph,
        weights,
        dist,
        s,
        b,
        params,
        instrumentation.as_deref_mut(),
    );

    let shift = ((l - 1) * params.t).min(62);
    let m = 1usize << shift;
    let block_size = 1usize.max(p.len().min(64));
    let mut d = BlockD::new(m, b, Some(block_size));

    for &x in &p {
        d.insert(x, dist[x]);
    }

    let mut b_prime_initial = b;
    if !p.is_empty() {
        b_prime_initial = p
            .iter()
            .map(|&x| dist[x])
            .fold(T::infinity(), |acc, d| if d < acc { d } else { acc });
    }

    let mut u: HashSet<usize> = HashSet::new();
    let mut b_prime_sub_values: Vec<T> = Vec::new();

    let step_shift = ((l as u32).saturating_mul(params.t.max(1) as u32)).min(62);
    let limit = params.k.saturating_mul(1usize << step_shift);

    let mut loop_guard = 0usize;
    while u.len() < limit && !d.is_empty() {
        loop_guard += 1;
        if loop_guard > BMSSP_LOOP_GUARD {
            log::warn!("bmssp loop guard exhausted: level={} frontier={}", l, s.len());
            break;
        }

        let (b_i, s_i) = match d.pull() {
            Ok(pulled) => pulled,
            Err(_) => break,
        };

        let (b_prime_sub, u_i) = bmssp(
            graph,
            weights,
            dist,
            pred,
            l - 1,
            b_i,
            &s_i,
            params,
            instrumentation.as_deref_mut(),
        );
        b_prime_sub_values.push(b_prime_sub);
        u.extend(u_i.iter().copied());

        let mut k_for_batch: Vec<(usize, T)> = Vec::new();
        for &u_vert in &u_i {
            let du = dist[u_vert];
            if !du.is_finite() {
                continue;
            }
            let (start, _end) = graph.edge_range(u_vert);
            for (eid, &v) in graph.neighbors(u_vert).iter().enumerate() {
                if let Some(instr) = instrumentation.as_mut() {
                    instr.record_relaxation();
                }
                let w_uv = weights[start + eid];
                let new_dist = du + w_uv;
                if new_dist <= dist[v] {
                    dist[v] = new_dist;
                    pred[v] = u_vert;
                    if b_i <= new_dist && new_dist < b {
                        d.insert(v, new_dist);
                    } else if b_prime_sub <= new_dist && new_dist < b_i {
                        k_for_batch.push((v, new_dist));
                    }
                }
            }
        }

        for &x in &s_i {
            let dx = dist[x];
            if b_prime_sub <= dx && dx < b_i {
                k_for_batch.push((x, dx));
            }
        }

        if !k_for_batch.is_empty() {
            d.batch_prepend(k_for_batch);
        }
    }

    let mut b_prime_final = b_prime_initial;
    if let Some(min_sub) = b_prime_sub_values
        .into_iter()
        .fold(None, |acc: Option<T>, v| {
            Some(match acc {
                Some(a) if a < v => a,
                _ => v,
            })
        })
    {
        if min_sub < b_prime_final {
            b_prime_final = min_sub;
        }
    }

    let mut u_final: Vec<usize> = u.into_iter().collect();
    for &x in &w {
        if dist[x] < b_prime_final {
            u_final.push(x);
        }
    }
    u_final.sort_unstable();
    u_final.dedup();

    log::trace!(
        "bmssp exit: level={} settled={}",
        l,
        u_final.len()
    );

    (b_prime_final, u_final)
}

/// Single-source shortest paths over the whole graph.
pub fn shortest_paths<T>(graph: &CsrGraph, weights: &[T], source: usize) -> Result<Vec<T>>
where
    T: Float + 'static,
{
    let (dist, _) = shortest_paths_with_preds(graph, weights, source)?;
    Ok(dist)
}

/// Single-source shortest paths with predecessor tracking.
pub fn shortest_paths_with_preds<T>(
    graph: &CsrGraph,
    weights: &[T],
    source: usize,
) -> Result<(Vec<T>, Vec<usize>)>
where
    T: Float + 'static,
{
    shortest_paths_instrumented(graph, weights, source, None).map(|(d, p, _)| (d, p))
}

/// Single-source shortest paths, optionally threading an
/// [`Instrumentation`] counter through the whole recursion.
pub fn shortest_paths_instrumented<T>(
    graph: &CsrGraph,
    weights: &[T],
    source: usize,
    instrumentation: Option<&mut Instrumentation>,
) -> Result<(Vec<T>, Vec<usize>, Instrumentation)>
where
    T: Float + 'static,
{
    validate_weights_len(graph, weights.len())?;
    validate_weights(weights)?;
    validate_source(graph, source)?;

    let n = graph.num_vertices();
    let mut dist = vec![T::infinity(); n];
    let mut pred = vec![usize::MAX; n];
    dist[source] = T::zero();
    pred[source] = source;

    let params = BmsspParams::from_n(n);
    let l = recursion_level(n);

    let mut owned_instr = Instrumentation::new();
    let instr_slot = instrumentation.unwrap_or(&mut owned_instr);

    bmssp(
        graph,
        weights,
        &mut dist,
        &mut pred,
        l,
        T::infinity(),
        &[source],
        &params,
        Some(&mut *instr_slot),
    );

    let reported = *instr_slot;
    Ok((dist, pred, reported))
}
