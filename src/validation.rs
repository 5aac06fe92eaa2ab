use crate::csr::CsrGraph;
use crate::error::{BmsspError, Result};

/// Validate that the weights array matches the graph's edge count.
pub fn validate_weights_len(graph: &CsrGraph, weights_len: usize) -> Result<()> {
    let num_edges = graph.num_edges();
    if weights_len != num_edges {
        return Err(BmsspError::InvalidWeights(format!(
            "expected {} weights (number of edges), got {}",
            num_edges, weights_len
        )));
    }
    Ok(())
}

/// Validate that all weights are finite and non-negative.
///
/// Weights must be non-negative finite reals; `+∞` is reserved as the
/// "no known path" sentinel in `dist`, never a supplied edge weight.
/// Rejecting negative or non-finite weights here keeps them from
/// corrupting the recursion downstream.
pub fn validate_weights<T>(weights: &[T]) -> Result<()>
where
    T: Copy + PartialOrd + num_traits::Float,
{
    for &w in weights {
        if !w.is_finite() {
            return Err(BmsspError::NonFiniteWeight);
        }
        if w < T::zero() {
            return Err(BmsspError::NegativeWeight);
        }
    }
    Ok(())
}

/// Validate that the source vertex is in range.
pub fn validate_source(graph: &CsrGraph, source: usize) -> Result<()> {
    if source >= graph.num_vertices() {
        return Err(BmsspError::InvalidSource {
            source,
            num_vertices: graph.num_vertices(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_weights_len_mismatch() {
        let graph = CsrGraph::new(2, vec![0, 1, 1], vec![1]).unwrap();
        assert!(validate_weights_len(&graph, 2).is_err());
        assert!(validate_weights_len(&graph, 1).is_ok());
    }

    #[test]
    fn test_validate_weights_rejects_negative() {
        let weights = [1.0f32, -0.5];
        assert!(matches!(
            validate_weights(&weights),
            Err(BmsspError::NegativeWeight)
        ));
    }

    #[test]
    fn test_validate_weights_rejects_non_finite() {
        let weights = [1.0f32, f32::NAN];
        assert!(matches!(
            validate_weights(&weights),
            Err(BmsspError::NonFiniteWeight)
        ));
    }

    #[test]
    fn test_validate_source_out_of_range() {
        let graph = CsrGraph::new(2, vec![0, 1, 1], vec![1]).unwrap();
        assert!(validate_source(&graph, 2).is_err());
        assert!(validate_source(&graph, 0).is_ok());
    }
}
