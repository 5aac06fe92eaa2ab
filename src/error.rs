use std::fmt;

#[derive(Debug, Clone)]
pub enum BmsspError {
    InvalidGraph(String),
    InvalidWeights(String),
    InvalidSource { source: usize, num_vertices: usize },
    NonFiniteWeight,
    NegativeWeight,
    /// `D::pull` was called while the structure held no live entries.
    /// Every caller handles this locally by breaking out of its main loop;
    /// it never propagates up to `shortest_paths`.
    EmptyPull,
}

impl fmt::Display for BmsspError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BmsspError::InvalidGraph(msg) => write!(f, "invalid graph: {}", msg),
            BmsspError::InvalidWeights(msg) => write!(f, "invalid weights: {}", msg),
            BmsspError::InvalidSource { source, num_vertices } => {
                write!(
                    f,
                    "invalid source vertex {} (graph has {} vertices)",
                    source, num_vertices
                )
            }
            BmsspError::NonFiniteWeight => write!(f, "non-finite weight encountered"),
            BmsspError::NegativeWeight => write!(f, "negative weight encountered"),
            BmsspError::EmptyPull => write!(f, "pull from empty block priority structure"),
        }
    }
}

impl std::error::Error for BmsspError {}

pub type Result<T> = std::result::Result<T, BmsspError>;
