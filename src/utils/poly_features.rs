use itertools::Itertools;

/// Expands `x` into every monomial of degree 1..=`degree` (no bias column).
/// Column order matches scikit-learn's `PolynomialFeatures(include_bias=False)`:
/// grouped by degree, and within a degree the index combinations are lexicographic.
pub fn polynomial_features(x: &[f64], degree: usize) -> Vec<f64> {
    (1..=degree)
        .flat_map(|d| {
            (0..x.len())
                .combinations_with_replacement(d)
                .map(|idx| idx.iter().map(|&i| x[i]).product::<f64>())
                .collect::<Vec<f64>>()
        })
        .collect()
}

/// Number of columns `polynomial_features` produces for `n_inputs` at `degree`.
pub fn polynomial_feature_count(n_inputs: usize, degree: usize) -> usize {
    // C(n + d, d) - 1
    (1..=degree).fold(1usize, |acc, d| acc * (n_inputs + d) / d) - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degree_two_order() {
        let out = polynomial_features(&[2.0, 3.0], 2);
        // x0, x1, x0^2, x0*x1, x1^2
        assert_eq!(out, vec![2.0, 3.0, 4.0, 6.0, 9.0]);
    }

    #[test]
    fn test_degree_three_tail() {
        let out = polynomial_features(&[2.0, 3.0], 3);
        assert_eq!(out.len(), 9);
        // x0^3, x0^2*x1, x0*x1^2, x1^3
        assert_eq!(&out[5..], &[8.0, 12.0, 18.0, 27.0]);
    }

    #[test]
    fn test_feature_count_for_planting_vector() {
        assert_eq!(polynomial_feature_count(7, 3), 119);
        assert_eq!(polynomial_features(&[1.0; 7], 3).len(), 119);
        assert_eq!(polynomial_feature_count(2, 2), 5);
    }
}
