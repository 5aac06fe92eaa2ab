use std::cmp::Reverse;
use std::collections::BinaryHeap;

use num_traits::Float;

use crate::csr::CsrGraph;
use crate::error::Result;

/// Run Dijkstra's algorithm to compute single-source shortest paths.
///
/// Used internally as the correctness oracle in tests and benchmarks, and
/// exposed publicly since a binary heap Dijkstra is the obvious baseline
/// a caller reaches for before trying `bmssp_sssp`.
pub fn dijkstra_sssp<T>(graph: &CsrGraph, weights: &[T], source: usize) -> Result<Vec<T>>
where
    T: Float,
{
    let (dist, _) = dijkstra_sssp_with_preds(graph, weights, source)?;
    Ok(dist)
}

/// Run Dijkstra's algorithm with predecessor tracking.
///
/// Returns `(distances, predecessors)` where `predecessors[v] = u` if
/// `u -> v` lies on a shortest path, and `predecessors[v] = usize::MAX` if
/// `v` is unreachable or is the source itself.
pub fn dijkstra_sssp_with_preds<T>(
    graph: &CsrGraph,
    weights: &[T],
    source: usize,
) -> Result<(Vec<T>, Vec<usize>)>
where
    T: Float,
{
    let n = graph.num_vertices();
    let mut dist = vec![T::infinity(); n];
    let mut pred = vec![usize::MAX; n];
    dist[source] = T::zero();
    pred[source] = source;

    let mut heap = BinaryHeap::new();
    heap.push(Reverse((crate::ordered_float::OrderedFloat(T::zero()), source)));

    while let Some(Reverse((crate::ordered_float::OrderedFloat(d), u))) = heap.pop() {
        if d > dist[u] {
            continue;
        }

        let (start, _end) = graph.edge_range(u);
        for (eid, &v) in graph.neighbors(u).iter().enumerate() {
            let edge_idx = start + eid;
            let w = weights[edge_idx];
            let new_dist = dist[u] + w;

            if new_dist < dist[v] {
                dist[v] = new_dist;
                pred[v] = u;
                heap.push(Reverse((crate::ordered_float::OrderedFloat(new_dist), v)));
            }
        }
    }

    Ok((dist, pred))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csr::CsrGraph;

    #[test]
    fn test_dijkstra_simple() {
        let indptr = vec![0, 1, 1];
        let indices = vec![1];
        let graph = CsrGraph::new(2, indptr, indices).unwrap();
        let weights = vec![1.0f32];
        let dist = dijkstra_sssp(&graph, &weights, 0).unwrap();
        assert_eq!(dist[0], 0.0);
        assert_eq!(dist[1], 1.0);
    }

    #[test]
    fn test_dijkstra_chain() {
        let indptr = vec![0, 1, 2, 2];
        let indices = vec![1, 2];
        let graph = CsrGraph::new(3, indptr, indices).unwrap();
        let weights = vec![1.0f32, 2.0f32];
        let dist = dijkstra_sssp(&graph, &weights, 0).unwrap();
        assert_eq!(dist[0], 0.0);
        assert_eq!(dist[1], 1.0);
        assert_eq!(dist[2], 3.0);
    }

    #[test]
    fn test_dijkstra_disconnected() {
        let indptr = vec![0, 1, 1, 1];
        let indices = vec![1];
        let graph = CsrGraph::new(3, indptr, indices).unwrap();
        let weights = vec![1.0f32];
        let dist = dijkstra_sssp(&graph, &weights, 0).unwrap();
        assert_eq!(dist[0], 0.0);
        assert_eq!(dist[1], 1.0);
        assert!(dist[2].is_infinite());
    }

    #[test]
    fn test_dijkstra_tracks_predecessors() {
        let indptr = vec![0, 1, 2, 2];
        let indices = vec![1, 2];
        let graph = CsrGraph::new(3, indptr, indices).unwrap();
        let weights = vec![1.0f32, 1.0f32];
        let (_, pred) = dijkstra_sssp_with_preds(&graph, &weights, 0).unwrap();
        assert_eq!(pred[0], 0);
        assert_eq!(pred[1], 0);
        assert_eq!(pred[2], 1);
    }
}
