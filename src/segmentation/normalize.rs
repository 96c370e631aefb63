pub const DIMENSIONS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBatch {
    pub mins: [f64; DIMENSIONS],
    pub maxs: [f64; DIMENSIONS],
    pub vectors: Vec<[f64; DIMENSIONS]>,
}

/// Global min-max scaling per dimension. A dimension with no spread maps
/// every point to 0.0.
pub fn normalize(vectors: &[[f64; DIMENSIONS]]) -> NormalizedBatch {
    if vectors.is_empty() {
        return NormalizedBatch {
            mins: [0.0; DIMENSIONS],
            maxs: [0.0; DIMENSIONS],
            vectors: Vec::new(),
        };
    }

    let mut mins = [f64::INFINITY; DIMENSIONS];
    let mut maxs = [f64::NEG_INFINITY; DIMENSIONS];
    for v in vectors {
        for d in 0..DIMENSIONS {
            mins[d] = mins[d].min(v[d]);
            maxs[d] = maxs[d].max(v[d]);
        }
    }

    let scaled = vectors
        .iter()
        .map(|v| {
            let mut out = [0.0; DIMENSIONS];
            for d in 0..DIMENSIONS {
                let span = maxs[d] - mins[d];
                out[d] = if span == 0.0 { 0.0 } else { (v[d] - mins[d]) / span };
            }
            out
        })
        .collect();

    NormalizedBatch {
        mins,
        maxs,
        vectors: scaled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_dimension_spans_zero_to_one() {
        let batch = normalize(&[[10.0, 1.0, 500.0], [0.0, 4.0, 100.0], [5.0, 2.0, 300.0]]);
        for d in 0..DIMENSIONS {
            let col: Vec<f64> = batch.vectors.iter().map(|v| v[d]).collect();
            assert_eq!(col.iter().cloned().fold(f64::INFINITY, f64::min), 0.0);
            assert_eq!(col.iter().cloned().fold(f64::NEG_INFINITY, f64::max), 1.0);
        }
        assert_eq!(batch.vectors[2][0], 0.5);
        assert_eq!(batch.mins, [0.0, 1.0, 100.0]);
        assert_eq!(batch.maxs, [10.0, 4.0, 500.0]);
    }

    #[test]
    fn constant_dimension_is_zero() {
        let batch = normalize(&[[3.0, 2.0, 1.0], [3.0, 5.0, 1.0]]);
        assert!(batch.vectors.iter().all(|v| v[0] == 0.0 && v[2] == 0.0));
        assert_eq!(batch.vectors[1][1], 1.0);
    }

    #[test]
    fn single_point_is_all_zero() {
        let batch = normalize(&[[4.0, 1.0, 9.0]]);
        assert_eq!(batch.vectors, vec![[0.0, 0.0, 0.0]]);
    }
}
