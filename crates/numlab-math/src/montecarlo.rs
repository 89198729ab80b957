// ─────────────────────────────────────────────────────────────────────
// Numlab — Monte Carlo Integration
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Hit-or-miss Monte Carlo integration over a hyper-ellipsoid.
//!
//! Domain V: Σ (x_i / a_i)² ≤ 1. Points are drawn uniformly in the box
//! [-a, a] of volume W = Π 2a_i; with M of N points inside,
//!   I ≈ W (M/N) mean_{inside} ρ,   vol(V) ≈ W (M/N).

use numlab_types::error::{NumlabError, NumlabResult};
use rand::Rng;
use rand_distr::{Distribution, Uniform};

/// Axis-aligned hyper-ellipsoid centred at the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct HyperEllipsoid {
    semi_axes: Vec<f64>,
}

impl HyperEllipsoid {
    pub fn new(semi_axes: Vec<f64>) -> NumlabResult<Self> {
        if semi_axes.is_empty() {
            return Err(NumlabError::ConfigError(
                "hyper-ellipsoid needs at least one dimension".to_string(),
            ));
        }
        if let Some((i, a)) = semi_axes
            .iter()
            .enumerate()
            .find(|(_, a)| !(a.is_finite() && **a > 0.0))
        {
            return Err(NumlabError::ConfigError(format!(
                "semi-axis {i} must be finite and > 0, got {a}"
            )));
        }
        let domain = HyperEllipsoid { semi_axes };
        // an infinite box also means some side 2a overflowed
        if !domain.bounding_volume().is_finite() {
            return Err(NumlabError::ConfigError(format!(
                "bounding box of {:?} overflows f64",
                domain.semi_axes
            )));
        }
        Ok(domain)
    }

    pub fn dim(&self) -> usize {
        self.semi_axes.len()
    }

    pub fn semi_axes(&self) -> &[f64] {
        &self.semi_axes
    }

    pub fn contains(&self, x: &[f64]) -> bool {
        x.iter()
            .zip(&self.semi_axes)
            .map(|(xi, ai)| (xi / ai).powi(2))
            .sum::<f64>()
            <= 1.0
    }

    /// Volume of the bounding box [-a, a].
    pub fn bounding_volume(&self) -> f64 {
        self.semi_axes.iter().map(|a| 2.0 * a).product()
    }

    /// Closed-form volume: unit n-ball volume times Π a_i.
    pub fn exact_volume(&self) -> f64 {
        unit_ball_volume(self.dim()) * self.semi_axes.iter().product::<f64>()
    }
}

/// V_0 = 1, V_1 = 2, V_n = V_{n-2} · 2π / n.
fn unit_ball_volume(n: usize) -> f64 {
    let mut v = [1.0, 2.0];
    for k in 2..=n {
        v[k % 2] *= 2.0 * std::f64::consts::PI / k as f64;
    }
    v[n % 2]
}

/// ρ(x) = Σ_i |x_i - α_i|^β_i over the first len(α) coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerWeight {
    pub alpha: Vec<f64>,
    pub beta: Vec<f64>,
}

impl PowerWeight {
    pub fn new(alpha: Vec<f64>, beta: Vec<f64>) -> NumlabResult<Self> {
        if alpha.len() != beta.len() {
            return Err(NumlabError::DimensionMismatch(format!(
                "weight has {} centres but {} exponents",
                alpha.len(),
                beta.len()
            )));
        }
        Ok(PowerWeight { alpha, beta })
    }

    /// Number of coordinates the weight reads.
    pub fn dims(&self) -> usize {
        self.alpha.len()
    }

    pub fn eval(&self, x: &[f64]) -> f64 {
        x.iter()
            .zip(self.alpha.iter().zip(&self.beta))
            .map(|(xi, (a, b))| (xi - a).abs().powf(*b))
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonteCarloEstimate {
    /// N: total trials.
    pub samples: usize,
    /// M: trials inside the domain.
    pub inside: usize,
    /// M / N.
    pub hit_ratio: f64,
    /// Mean weight over inside points (0 when M = 0).
    pub mean_weight: f64,
    pub integral: f64,
    pub volume: f64,
    /// One-sigma standard error of `integral`.
    pub std_error: f64,
}

/// Estimate ∫_V weight(x) dx from `samples` uniform draws.
pub fn estimate<W, R>(
    domain: &HyperEllipsoid,
    weight: W,
    samples: usize,
    rng: &mut R,
) -> NumlabResult<MonteCarloEstimate>
where
    W: Fn(&[f64]) -> f64,
    R: Rng + ?Sized,
{
    if samples == 0 {
        return Err(NumlabError::ConfigError("sample count must be > 0".to_string()));
    }

    let axes: Vec<Uniform<f64>> = domain
        .semi_axes()
        .iter()
        .map(|&a| Uniform::new_inclusive(-a, a))
        .collect();

    let mut point = vec![0.0; domain.dim()];
    let mut inside = 0usize;
    let mut sum = 0.0;
    let mut sum_sq = 0.0;

    for _ in 0..samples {
        for (xi, dist) in point.iter_mut().zip(&axes) {
            *xi = dist.sample(rng);
        }
        if domain.contains(&point) {
            let w = weight(&point);
            if !w.is_finite() {
                return Err(NumlabError::ConfigError(format!(
                    "weight is not finite at {point:?}"
                )));
            }
            inside += 1;
            sum += w;
            sum_sq += w * w;
        }
    }

    let n = samples as f64;
    let big_w = domain.bounding_volume();
    let hit_ratio = inside as f64 / n;
    let mean_weight = if inside > 0 { sum / inside as f64 } else { 0.0 };
    // Per-sample g = weight · 1_inside
    let mean_g = sum / n;
    let var_g = (sum_sq / n - mean_g * mean_g).max(0.0);

    let result = MonteCarloEstimate {
        samples,
        inside,
        hit_ratio,
        mean_weight,
        integral: big_w * hit_ratio * mean_weight,
        volume: big_w * hit_ratio,
        std_error: big_w * (var_g / n).sqrt(),
    };
    if inside == 0 {
        tracing::warn!(samples, "no Monte Carlo samples fell inside the domain");
    } else {
        tracing::debug!(samples, inside, integral = result.integral, "Monte Carlo estimate");
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_unit_disc_area() {
        let disc = HyperEllipsoid::new(vec![1.0, 1.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let est = estimate(&disc, |_| 1.0, 200_000, &mut rng).unwrap();
        let pi = std::f64::consts::PI;
        assert!((est.volume - pi).abs() < 0.02, "area {}", est.volume);
        assert!((est.hit_ratio - pi / 4.0).abs() < 0.005);
    }

    #[test]
    fn test_ellipsoid_volume_3d() {
        let e = HyperEllipsoid::new(vec![1.0, 2.0, 3.0]).unwrap();
        let exact = 4.0 / 3.0 * std::f64::consts::PI * 6.0;
        assert!((e.exact_volume() - exact).abs() < 1e-12);

        let mut rng = StdRng::seed_from_u64(3);
        let est = estimate(&e, |_| 1.0, 200_000, &mut rng).unwrap();
        assert!((est.volume - exact).abs() < 0.3, "volume {}", est.volume);
    }

    #[test]
    fn test_unit_weight_integral_equals_volume() {
        let e = HyperEllipsoid::new(vec![2.0, 3.0, 1.5, 2.5, 1.0, 4.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let est = estimate(&e, |_| 1.0, 100_000, &mut rng).unwrap();
        assert_eq!(est.integral, est.volume);
        assert!((est.volume - e.exact_volume()).abs() < 25.0, "6D volume {}", est.volume);
    }

    #[test]
    fn test_seeded_estimates_reproducible() {
        let e = HyperEllipsoid::new(vec![2.0, 3.0, 1.5, 2.5, 1.0, 4.0]).unwrap();
        let w = PowerWeight::new(
            vec![-0.11668255, -1.90093714, -2.28172284],
            vec![3.74736003, 2.88284760, 1.59672290],
        )
        .unwrap();
        let a = estimate(&e, |x| w.eval(x), 10_000, &mut StdRng::seed_from_u64(5)).unwrap();
        let b = estimate(&e, |x| w.eval(x), 10_000, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);
        assert!(a.inside > 0);
        assert!(a.integral > 0.0 && a.std_error > 0.0);
    }

    #[test]
    fn test_power_weight_eval() {
        let w = PowerWeight::new(vec![1.0, -1.0], vec![2.0, 3.0]).unwrap();
        // |3-1|^2 + |1+1|^3 = 4 + 8; trailing coordinates are ignored
        assert!((w.eval(&[3.0, 1.0, 100.0]) - 12.0).abs() < 1e-12);
        assert!(PowerWeight::new(vec![1.0], vec![]).is_err());
    }

    #[test]
    fn test_linear_weight_symmetry() {
        // ∫ over a centred disc of x is 0; of |x|^2 is π/4 on the unit disc
        let disc = HyperEllipsoid::new(vec![1.0, 1.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(99);
        let est = estimate(&disc, |x| x[0] * x[0], 400_000, &mut rng).unwrap();
        let exact = std::f64::consts::PI / 4.0;
        assert!((est.integral - exact).abs() < 5.0 * est.std_error + 1e-3);
    }

    #[test]
    fn test_no_hits_reports_zero() {
        // 20-ball fills ~2.5e-8 of its box
        let e = HyperEllipsoid::new(vec![1.0; 20]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let est = estimate(&e, |_| 1.0, 10, &mut rng).unwrap();
        assert_eq!(est.inside, 0);
        assert_eq!(est.mean_weight, 0.0);
        assert_eq!(est.integral, 0.0);
        assert_eq!(est.volume, 0.0);
    }

    #[test]
    fn test_invalid_input() {
        assert!(HyperEllipsoid::new(vec![]).is_err());
        assert!(HyperEllipsoid::new(vec![1.0, 0.0]).is_err());
        assert!(HyperEllipsoid::new(vec![1.0, f64::INFINITY]).is_err());
        let e = HyperEllipsoid::new(vec![1.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(estimate(&e, |_| 1.0, 0, &mut rng).is_err());
    }

    #[test]
    fn test_rejects_overflowing_box() {
        let err = HyperEllipsoid::new(vec![1e308]).unwrap_err();
        assert!(matches!(err, NumlabError::ConfigError(_)));
        // each side fits but the product does not
        assert!(HyperEllipsoid::new(vec![1e200, 1e200]).is_err());
        let e = HyperEllipsoid::new(vec![1e100, 1e100]).unwrap();
        assert!(e.bounding_volume().is_finite());
        let est = estimate(&e, |_| 1.0, 1_000, &mut StdRng::seed_from_u64(8)).unwrap();
        assert!(est.volume.is_finite());
    }

    #[test]
    fn test_unit_ball_volumes() {
        let pi = std::f64::consts::PI;
        assert!((unit_ball_volume(1) - 2.0).abs() < 1e-15);
        assert!((unit_ball_volume(2) - pi).abs() < 1e-15);
        assert!((unit_ball_volume(3) - 4.0 / 3.0 * pi).abs() < 1e-14);
        assert!((unit_ball_volume(6) - pi.powi(3) / 6.0).abs() < 1e-13);
    }
}
