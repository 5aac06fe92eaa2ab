//! Algorithm parameter derivation.
//!
//! `t` and `k` are derived once per `bmssp` call from the vertex count `n`;
//! everything else (`p_limit`, `k_steps`) follows deterministically from
//! them. `recursion_level` is the driver's one-time choice of how many
//! levels of recursion to allocate for the whole query.

/// Per-call BMSSP parameters, derived from the graph's vertex count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmsspParams {
    /// Threshold parameter; scales `D`'s capacity hint across levels and
    /// bounds the pivot cap.
    pub t: usize,
    /// Controls `FindPivots`'s exploration depth and `Basecase`'s cutoff.
    pub k: usize,
    /// Pivot cap: at most this many pivots are selected per `FindPivots`
    /// call.
    pub p_limit: usize,
    /// Number of bounded-relaxation rounds `FindPivots` performs.
    pub k_steps: usize,
}

impl BmsspParams {
    /// Compute `t` and `k` from the vertex count `n`.
    ///
    /// Uses `round(ln(n)^(2/3))` for `t` and `round(ln(n)^(1/3))` for `k`,
    /// each floored at a safe minimum so tiny graphs never degenerate to a
    /// zero-sized threshold or step count.
    pub fn from_n(n: usize) -> Self {
        let (t, k) = if n <= 2 {
            (1usize, 2usize)
        } else {
            let log_n = (n.max(3) as f64).ln();
            let t = (log_n.powf(2.0 / 3.0)).round().max(1.0) as usize;
            let k = (log_n.powf(1.0 / 3.0)).round().max(2.0) as usize;
            (t.max(1), k.max(2))
        };

        let p_limit = 1usize.max(1usize << t.min(10));
        let k_steps = k.max(1);

        Self { t, k, p_limit, k_steps }
    }
}

/// Driver-level recursion depth `l` for a query over `n` vertices.
pub fn recursion_level(n: usize) -> usize {
    if n <= 2 {
        return 1;
    }
    let t_guess = BmsspParams::from_n(n).t;
    let log_n = (n.max(3) as f64).ln();
    (log_n / t_guess as f64).round().max(1.0) as usize
}
