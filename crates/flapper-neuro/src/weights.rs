//! Real-valued gene operators shared by initialization, crossover and mutation.
//!
//! All weights live in a symmetric range `[-range, range]`; every operator
//! clamps its result back into it.

use rand::Rng;
use rand_distr::Normal;

/// Creates a vector by applying `f` to each index.
///
/// ```
/// use flapper_neuro::weights;
///
/// let values = weights::from_fn(|i| i as f32 * 0.5, 3);
/// assert_eq!(values, vec![0.0, 0.5, 1.0]);
/// ```
pub fn from_fn<F>(f: F, len: usize) -> Vec<f32>
where
    F: FnMut(usize) -> f32,
{
    (0..len).map(f).collect()
}

/// Uniform sample from `[-range, range]`.
pub fn random_weight<R>(rng: &mut R, range: f32) -> f32
where
    R: Rng + ?Sized,
{
    rng.random_range(-range..=range)
}

pub fn random<R>(rng: &mut R, range: f32, len: usize) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    from_fn(|_| random_weight(rng, range), len)
}

/// BLX-α blend of a single gene pair.
///
/// The child is drawn uniformly from `[min - α·d, max + α·d]` where `d` is the
/// distance between the parents, then clamped to `[-range, range]`.
pub fn blend<R>(x1: f32, x2: f32, alpha: f32, range: f32, rng: &mut R) -> f32
where
    R: Rng + ?Sized,
{
    let min = f32::min(x1, x2);
    let max = f32::max(x1, x2);
    let d = max - min;
    let lower = min - alpha * d;
    let upper = max + alpha * d;
    rng.random_range(lower..=upper).clamp(-range, range)
}

/// BLX-α crossover of two equally long gene vectors.
///
/// # Panics
///
/// Panics if the parents have different lengths.
pub fn blx_alpha<R>(p1: &[f32], p2: &[f32], alpha: f32, range: f32, rng: &mut R) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    assert_eq!(p1.len(), p2.len());
    from_fn(|i| blend(p1[i], p2[i], alpha, range, rng), p1.len())
}

/// Adds Gaussian noise to each gene with probability `rate`.
pub fn mutate<'a, I, R>(genes: I, noise: &Normal<f32>, range: f32, rate: f32, rng: &mut R)
where
    I: IntoIterator<Item = &'a mut f32>,
    R: Rng + ?Sized,
{
    let rate = f64::from(rate.clamp(0.0, 1.0));
    for gene in genes {
        if rng.random_bool(rate) {
            *gene = (*gene + rng.sample(noise)).clamp(-range, range);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(17)
    }

    #[test]
    fn test_random_stays_in_range() {
        let values = random(&mut rng(), 2.0, 200);
        assert_eq!(values.len(), 200);
        assert!(values.iter().all(|v| (-2.0..=2.0).contains(v)));
    }

    #[test]
    fn test_blend_of_equal_parents_is_the_parent() {
        let mut rng = rng();
        for _ in 0..20 {
            assert_eq!(blend(0.75, 0.75, 0.5, 1.0, &mut rng), 0.75);
        }
    }

    #[test]
    fn test_blx_alpha_zero_stays_between_parents() {
        let p1 = [-1.0, 0.0, 2.0];
        let p2 = [1.0, 0.5, 3.0];
        let child = blx_alpha(&p1, &p2, 0.0, 10.0, &mut rng());
        for ((c, a), b) in child.iter().zip(p1).zip(p2) {
            assert!((a..=b).contains(c));
        }
    }

    #[test]
    fn test_blx_alpha_clamps() {
        let child = blx_alpha(&[-5.0; 8], &[5.0; 8], 1.0, 3.0, &mut rng());
        assert!(child.iter().all(|v| (-3.0..=3.0).contains(v)));
    }

    #[test]
    fn test_mutate_respects_rate() {
        let noise = Normal::new(0.0, 1.0).unwrap();
        let mut genes = vec![0.25; 16];
        mutate(&mut genes, &noise, 1.0, 0.0, &mut rng());
        assert_eq!(genes, vec![0.25; 16]);

        mutate(&mut genes, &noise, 1.0, 1.0, &mut rng());
        assert!(genes.iter().any(|&g| g != 0.25));
        assert!(genes.iter().all(|g| (-1.0..=1.0).contains(g)));
    }
}
