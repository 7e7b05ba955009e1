//! Vector math shared by the embedder and the retriever.

use sha2::{Digest, Sha256};

/// Added to each norm before dividing so zero vectors score 0.0 instead of NaN.
const NORM_EPSILON: f32 = 1e-8;

/// Euclidean (L2) norm of a vector.
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Scale a vector to unit length in place.
///
/// A zero vector is left untouched.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = l2_norm(v);
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Compute cosine similarity between two vectors, clamped to `[0, 1]`.
///
/// Both vectors are L2-normalized (with a small epsilon added to each norm)
/// before the dot product. Negative correlation is floored to 0.0, and a zero
/// vector on either side yields 0.0. Vectors of different length are compared
/// over their common prefix.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let norm_a = l2_norm(a) + NORM_EPSILON;
    let norm_b = l2_norm(b) + NORM_EPSILON;
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| (x / norm_a) * (y / norm_b)).sum();
    if dot.is_nan() {
        return 0.0;
    }
    dot.clamp(0.0, 1.0)
}

/// Stable 64-bit digest of a vector's exact values.
///
/// Used to key cached similarities by query vector; two vectors share a
/// digest only if their bit patterns are identical (modulo hash collisions).
pub(crate) fn vector_digest(v: &[f32]) -> u64 {
    let mut hasher = Sha256::new();
    for x in v {
        hasher.update(x.to_bits().to_le_bytes());
    }
    let digest = hasher.finalize();
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_score_one() {
        let v = [0.6, 0.8, 0.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn orthogonal_vectors_score_zero() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
    }

    #[test]
    fn opposite_vectors_are_clamped_to_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]), 0.0);
    }

    #[test]
    fn zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]), 0.0);
    }

    #[test]
    fn unnormalized_inputs_are_normalized() {
        assert!((cosine_similarity(&[3.0, 4.0], &[6.0, 8.0]) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn normalize_leaves_zero_vector_alone() {
        let mut v = vec![0.0; 4];
        l2_normalize(&mut v);
        assert_eq!(v, vec![0.0; 4]);

        let mut w = vec![3.0, 4.0];
        l2_normalize(&mut w);
        assert!((l2_norm(&w) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn digest_is_stable_and_value_sensitive() {
        let a = [0.1, 0.2, 0.3];
        assert_eq!(vector_digest(&a), vector_digest(&[0.1, 0.2, 0.3]));
        assert_ne!(vector_digest(&a), vector_digest(&[0.1, 0.2, 0.30001]));
    }
}
