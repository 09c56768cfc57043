use std::fmt;

use super::filter::NumericSubset;

/// Lower bound (inclusive) of |r| for a pair to count as strongly correlated.
pub const STRONG_CORRELATION_MIN: f64 = 0.7;

// ---------------------------------------------------------------------------
// Method selector
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CorrelationMethod {
    #[default]
    Pearson,
    Spearman,
}

impl CorrelationMethod {
    pub const ALL: [CorrelationMethod; 2] = [CorrelationMethod::Pearson, CorrelationMethod::Spearman];

    pub fn label(self) -> &'static str {
        match self {
            CorrelationMethod::Pearson => "pearson",
            CorrelationMethod::Spearman => "spearman",
        }
    }
}

// ---------------------------------------------------------------------------
// Correlation matrix
// ---------------------------------------------------------------------------

/// Square matrix of coefficients indexed by column name on both axes.
/// `None` marks an undefined coefficient (too few observations, zero
/// variance) or an entry masked out by a threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major, `columns.len()²` entries.
    values: Vec<Option<f64>>,
}

impl CorrelationMatrix {
    pub fn size(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values[row * self.size() + col]
    }

    #[cfg(test)]
    pub fn get_by_name(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.get(i, j)
    }

    /// Replace every entry with |r| below `threshold` by `None`. The threshold
    /// is clamped to `[0, 1]`; `0.0` keeps every defined entry.
    pub fn masked(&self, threshold: f64) -> CorrelationMatrix {
        let threshold = threshold.clamp(0.0, 1.0);
        CorrelationMatrix {
            columns: self.columns.clone(),
            values: self
                .values
                .iter()
                .map(|v| v.filter(|r| r.abs() >= threshold))
                .collect(),
        }
    }

    /// Number of defined (non-masked) entries.
    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

/// Pairwise correlation of every column in `subset` under `method`, using
/// pairwise-complete observations for each pair.
pub fn correlation_matrix(subset: &NumericSubset, method: CorrelationMethod) -> CorrelationMatrix {
    let n = subset.column_count();
    let mut values = vec![None; n * n];

    for i in 0..n {
        for j in i..n {
            let pairs = subset.paired(i, j);
            let r = match method {
                CorrelationMethod::Pearson => pearson(&pairs),
                CorrelationMethod::Spearman => spearman(&pairs),
            };
            // Self-correlation is exactly 1 whenever it is defined at all.
            let r = if i == j { r.map(|_| 1.0) } else { r };
            values[i * n + j] = r;
            values[j * n + i] = r;
        }
    }

    log::debug!(
        "Computed {} correlation matrix over {n} columns",
        method.label()
    );

    CorrelationMatrix {
        columns: subset.columns.clone(),
        values,
    }
}

/// Product-moment correlation of paired observations. `None` with fewer than
/// two pairs, with a non-finite value, or when either side has zero variance.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    let (first_x, first_y) = *pairs.first()?;
    if pairs.len() < 2 || pairs.iter().any(|p| !p.0.is_finite() || !p.1.is_finite()) {
        return None;
    }
    // Exact check: a rounded mean would leave a tiny nonzero variance.
    if pairs.iter().all(|p| p.0 == first_x) || pairs.iter().all(|p| p.1 == first_y) {
        return None;
    }
    // Scale each side into [-1, 1] so the sums cannot overflow.
    let scale_x = pairs.iter().fold(0.0_f64, |m, p| m.max(p.0.abs()));
    let scale_y = pairs.iter().fold(0.0_f64, |m, p| m.max(p.1.abs()));
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0 / scale_x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1 / scale_y).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for &(x, y) in pairs {
        let (dx, dy) = (x / scale_x - mean_x, y / scale_y - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    Some((cov / denom).clamp(-1.0, 1.0))
}

/// Pearson correlation of the ranks of each side of the pairs.
pub fn spearman(pairs: &[(f64, f64)]) -> Option<f64> {
    let xs: Vec<f64> = pairs.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = pairs.iter().map(|p| p.1).collect();
    let ranked: Vec<(f64, f64)> = average_ranks(&xs)
        .into_iter()
        .zip(average_ranks(&ys))
        .collect();
    pearson(&ranked)
}

/// 1-based ranks; tied values share the mean of the ranks they span.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // Positions start..end hold ranks start+1 ..= end.
        let rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        start = end;
    }
    ranks
}

// ---------------------------------------------------------------------------
// Strong pairs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct StrongPair {
    pub column_a: String,
    pub column_b: String,
    pub coefficient: f64,
}

impl fmt::Display for StrongPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = if self.coefficient > 0.0 {
            "positive"
        } else {
            "negative"
        };
        write!(
            f,
            "{} and {} have a strong {direction} correlation (r = {:.2})",
            self.column_a, self.column_b, self.coefficient
        )
    }
}

/// Pairs of distinct columns with |r| in `[0.7, 1.0)`.
///
/// Only the upper triangle is scanned, so each unordered pair appears once
/// as `(earlier column, later column)`. A coefficient of exactly ±1.0 is
/// excluded along with the diagonal.
pub fn strong_pairs(matrix: &CorrelationMatrix) -> Vec<StrongPair> {
    let n = matrix.size();
    let mut pairs = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            let Some(r) = matrix.get(i, j) else {
                continue;
            };
            if (STRONG_CORRELATION_MIN..1.0).contains(&r.abs()) {
                pairs.push(StrongPair {
                    column_a: matrix.columns[i].clone(),
                    column_b: matrix.columns[j].clone(),
                    coefficient: r,
                });
            }
        }
    }
    pairs
}
