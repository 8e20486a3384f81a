/// Burr Type XII demand-variation distribution
/// Draws invert the survival function S(x) = (1 + x^c)^(-d) on a uniform from (0, 1]

use rand::Rng;
use rand_distr::{Distribution, OpenClosed01};

use crate::error::{PlanError, PlanResult};

/// Burr XII sampler with shape parameters `c` and `d`, plus location and scale
#[derive(Clone, Copy, Debug)]
pub struct Burr12 {
    c: f64,
    d: f64,
    loc: f64,
    scale: f64,
}

impl Burr12 {
    /// Validate the parameters and build a sampler
    pub fn new(c: f64, d: f64, loc: f64, scale: f64) -> PlanResult<Self> {
        if !c.is_finite() || c <= 0.0 || !d.is_finite() || d <= 0.0 {
            return Err(PlanError::Sampling(format!(
                "Burr XII shapes must be positive and finite, got c={}, d={}",
                c, d
            )));
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(PlanError::Sampling(format!(
                "Burr XII scale must be positive and finite, got {}",
                scale
            )));
        }
        if !loc.is_finite() {
            return Err(PlanError::Sampling(format!(
                "Burr XII location must be finite, got {}",
                loc
            )));
        }
        Ok(Burr12 { c, d, loc, scale })
    }

    /// Analytic median: loc + scale * (2^(1/d) - 1)^(1/c)
    pub fn median(&self) -> f64 {
        self.loc + self.scale * (2f64.powf(1.0 / self.d) - 1.0).powf(1.0 / self.c)
    }
}

impl Distribution<f64> for Burr12 {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        // u = 1 maps to the support minimum, u -> 0 to the upper tail
        let u: f64 = rng.sample(OpenClosed01);
        self.loc + self.scale * (u.powf(-1.0 / self.d) - 1.0).powf(1.0 / self.c)
    }
}
