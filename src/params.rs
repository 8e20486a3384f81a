/// Parameter assembly module
/// Derives the canonical optimization parameters from the loaded tables

use std::collections::{BTreeMap, HashSet};

use crate::error::{PlanError, PlanResult};
use crate::models::{DistributionParams, Product, ScenarioMatrix};

/// Optimization parameters for one product
#[derive(Clone, Debug)]
pub struct ProductParams {
    pub id: u32,
    /// Baseline demand
    pub demand: f64,
    /// Unit production cost
    pub cost: f64,
    /// Unit selling price, margin plus cost
    pub price: f64,
    /// Surplus bound as a multiple of demand, absent when unconstrained
    pub capacity: Option<f64>,
    pub group_id: u32,
    pub variance_id: u32,
}

/// Substitutability group holding positions into the product vector
#[derive(Clone, Debug)]
pub struct Group {
    pub id: u32,
    pub members: Vec<usize>,
}

/// Canonical parameter set handed to the scenario generator and model builder
#[derive(Clone, Debug)]
pub struct ModelParams {
    /// Products in ascending ID order
    pub products: Vec<ProductParams>,
    /// Groups in ascending group ID order
    pub groups: Vec<Group>,
}

impl ModelParams {
    /// Assemble and cross-check the parameter set
    pub fn assemble(
        products: &[Product],
        distributions: &[DistributionParams],
    ) -> PlanResult<Self> {
        if products.is_empty() {
            return Err(PlanError::Input("product table is empty".to_string()));
        }

        let known: HashSet<u32> = distributions.iter().map(|d| d.variance_id).collect();
        for product in products {
            if !known.contains(&product.variance_id) {
                return Err(PlanError::Input(format!(
                    "product {} references unknown distribution {}",
                    product.product_id, product.variance_id
                )));
            }
        }

        let mut assembled: Vec<ProductParams> = products
            .iter()
            .map(|p| ProductParams {
                id: p.product_id,
                demand: p.demand,
                cost: p.cogs,
                price: p.margin + p.cogs,
                capacity: p.capacity,
                group_id: p.substitutability_id,
                variance_id: p.variance_id,
            })
            .collect();
        assembled.sort_by_key(|p| p.id);

        // Group membership maps to positions in the sorted product vector
        let mut members: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for (pos, product) in assembled.iter().enumerate() {
            members.entry(product.group_id).or_default().push(pos);
        }
        let groups = members
            .into_iter()
            .map(|(id, members)| Group { id, members })
            .collect();

        Ok(ModelParams {
            products: assembled,
            groups,
        })
    }

    /// Total baseline demand over all products
    pub fn total_demand(&self) -> f64 {
        self.products.iter().map(|p| p.demand).sum()
    }
}

/// Realized demand per product and scenario: baseline times the sampled multiplier
pub fn realized_demand(params: &ModelParams, scenarios: &ScenarioMatrix) -> Vec<Vec<f64>> {
    params
        .products
        .iter()
        .zip(scenarios)
        .map(|(product, draws)| draws.iter().map(|m| product.demand * m).collect())
        .collect()
}
