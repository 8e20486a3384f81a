/// Scenario generation module
/// Draws per-product demand multipliers through an explicitly passed generator

use std::collections::HashMap;

use log::debug;
use rand::Rng;

use crate::distribution::Burr12;
use crate::error::{PlanError, PlanResult};
use crate::models::{DistributionParams, ScenarioMatrix};
use crate::params::ModelParams;

/// Generate `ns` clipped multiplier draws per product
/// Products are visited in ascending ID order, so a fixed seed fixes the matrix
pub fn generate_scenarios<R: Rng>(
    params: &ModelParams,
    distributions: &[DistributionParams],
    ns: usize,
    rng: &mut R,
) -> PlanResult<ScenarioMatrix> {
    let table: HashMap<u32, &DistributionParams> = distributions
        .iter()
        .map(|d| (d.variance_id, d))
        .collect();

    // One sampler per referenced distribution, built on first use
    let mut samplers: HashMap<u32, Burr12> = HashMap::new();

    let mut matrix = Vec::with_capacity(params.products.len());
    for product in &params.products {
        if !samplers.contains_key(&product.variance_id) {
            let raw = table.get(&product.variance_id).ok_or_else(|| {
                PlanError::Input(format!(
                    "product {} references unknown distribution {}",
                    product.id, product.variance_id
                ))
            })?;
            let sampler = Burr12::new(raw.c, raw.d, raw.loc, raw.scale)?;
            debug!(
                "distribution {}: median multiplier {:.3}",
                product.variance_id,
                sampler.median()
            );
            samplers.insert(product.variance_id, sampler);
        }
        let sampler = samplers[&product.variance_id];
        let draws: Vec<f64> = (0..ns).map(|_| rng.sample(sampler).max(0.0)).collect();
        matrix.push(draws);
    }

    Ok(matrix)
}
