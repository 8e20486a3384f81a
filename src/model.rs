/// Surplus model construction module
/// Builds the two-stage recourse program as explicit coefficient data

use crate::params::ModelParams;

/// Constraint sense of a single linear row
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sense {
    LessEq,
    GreaterEq,
}

/// One linear row: sparse (column, coefficient) terms against a right-hand side
#[derive(Clone, Debug)]
pub struct LinearConstraint {
    pub terms: Vec<(usize, f64)>,
    pub sense: Sense,
    pub rhs: f64,
}

/// The two-stage surplus program in explicit form
///
/// Columns `0..num_products` hold the surplus variables in ascending product
/// ID order; the shortfall variable for product `pos` in scenario `s` sits at
/// `num_products + pos * num_scenarios + s`. All variables are continuous and
/// bounded below by zero.
#[derive(Clone, Debug)]
pub struct SurplusModel {
    pub num_products: usize,
    pub num_scenarios: usize,
    pub num_vars: usize,
    /// Dense objective coefficients, one per column, for maximization
    pub objective: Vec<f64>,
    /// Decision-independent objective part: expected full-service revenue
    /// minus the baseline production cost
    pub objective_offset: f64,
    pub constraints: Vec<LinearConstraint>,
}

impl SurplusModel {
    /// Column of the surplus variable for the product at `pos`
    pub fn surplus_col(&self, pos: usize) -> usize {
        pos
    }

    /// Column of the shortfall variable for product `pos` in scenario `s`
    pub fn shortfall_col(&self, pos: usize, s: usize) -> usize {
        self.num_products + pos * self.num_scenarios + s
    }

    /// Objective value at the given assignment, offset included
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        let linear: f64 = self
            .objective
            .iter()
            .zip(values)
            .map(|(coeff, value)| coeff * value)
            .sum();
        self.objective_offset + linear
    }
}

/// Build the recourse program for the assembled parameters
///
/// Maximizes expected profit: scenario-averaged revenue on served demand minus
/// production cost on baseline plus surplus. Rows are the per-product capacity
/// limits, the single aggregate surplus limit, and one substitutability
/// coverage row per group and scenario.
pub fn build_model(
    params: &ModelParams,
    realized: &[Vec<f64>],
    mu: f64,
    ns: usize,
) -> SurplusModel {
    let np = params.products.len();
    let weight = 1.0 / ns as f64;

    let mut model = SurplusModel {
        num_products: np,
        num_scenarios: ns,
        num_vars: np * (1 + ns),
        objective: vec![0.0; np * (1 + ns)],
        objective_offset: 0.0,
        constraints: Vec::with_capacity(np + 1 + params.groups.len() * ns),
    };

    // Objective: -cost on surplus, -price/ns on shortfall, constant offset
    for (pos, product) in params.products.iter().enumerate() {
        let col = model.surplus_col(pos);
        model.objective[col] = -product.cost;
        model.objective_offset -= product.cost * product.demand;
        for s in 0..ns {
            let col = model.shortfall_col(pos, s);
            model.objective[col] = -product.price * weight;
            model.objective_offset += product.price * realized[pos][s] * weight;
        }
    }

    // Capacity rows, only for products with a defined bound
    for (pos, product) in params.products.iter().enumerate() {
        if let Some(cap) = product.capacity {
            model.constraints.push(LinearConstraint {
                terms: vec![(model.surplus_col(pos), 1.0)],
                sense: Sense::LessEq,
                rhs: product.demand * cap,
            });
        }
    }

    // Aggregate surplus limit over all products
    model.constraints.push(LinearConstraint {
        terms: (0..np).map(|pos| (model.surplus_col(pos), 1.0)).collect(),
        sense: Sense::LessEq,
        rhs: mu * params.total_demand(),
    });

    // Substitutability coverage per group and scenario:
    // sum(x + d) >= sum(realized - y), with the variables moved left
    for group in &params.groups {
        for s in 0..ns {
            let mut terms = Vec::with_capacity(group.members.len() * 2);
            let mut rhs = 0.0;
            for &pos in &group.members {
                terms.push((model.surplus_col(pos), 1.0));
                terms.push((model.shortfall_col(pos, s), 1.0));
                rhs += realized[pos][s] - params.products[pos].demand;
            }
            model.constraints.push(LinearConstraint {
                terms,
                sense: Sense::GreaterEq,
                rhs,
            });
        }
    }

    model
}
