/// Solver adapter module
/// Translates the explicit model into good_lp and runs the selected backend

use good_lp::solvers::highs::highs;
use good_lp::solvers::microlp::microlp;
use good_lp::{
    constraint, variable, variables, Expression, ResolutionError, Solution, SolverModel, Variable,
};
use log::{debug, info};

use crate::error::{PlanError, PlanResult};
use crate::model::{Sense, SurplusModel};
use crate::options::SolverBackend;

/// Optimal assignment returned by a successful solve
#[derive(Clone, Debug)]
pub struct SolvedModel {
    /// One value per model column
    pub values: Vec<f64>,
    /// Objective at the optimum, constant offset included
    pub objective: f64,
}

/// Solve the model with the selected backend, blocking until termination
pub fn solve(model: &SurplusModel, backend: SolverBackend) -> PlanResult<SolvedModel> {
    info!(
        "solving {} variables, {} constraints with {:?}",
        model.num_vars,
        model.constraints.len(),
        backend
    );

    let mut vars = variables!();
    let columns: Vec<Variable> = (0..model.num_vars)
        .map(|_| vars.add(variable().min(0.0)))
        .collect();

    let mut objective = Expression::with_capacity(model.num_vars);
    for (col, coeff) in model.objective.iter().enumerate() {
        if *coeff != 0.0 {
            objective.add_mul(*coeff, columns[col]);
        }
    }

    let unsolved = vars.maximise(&objective);
    match backend {
        SolverBackend::Highs => finish(model, &columns, unsolved.using(highs)),
        SolverBackend::Microlp => finish(model, &columns, unsolved.using(microlp)),
    }
}

fn finish<M: SolverModel<Error = ResolutionError>>(
    model: &SurplusModel,
    columns: &[Variable],
    mut problem: M,
) -> PlanResult<SolvedModel> {
    for row in &model.constraints {
        let mut lhs = Expression::with_capacity(row.terms.len());
        for (col, coeff) in &row.terms {
            lhs.add_mul(*coeff, columns[*col]);
        }
        problem = match row.sense {
            Sense::LessEq => problem.with(constraint!(lhs <= row.rhs)),
            Sense::GreaterEq => problem.with(constraint!(lhs >= row.rhs)),
        };
    }

    let solution = match problem.solve() {
        Ok(solution) => solution,
        Err(ResolutionError::Infeasible) => return Err(PlanError::Infeasible),
        Err(ResolutionError::Unbounded) => return Err(PlanError::Unbounded),
        Err(other) => return Err(PlanError::Solver(other.to_string())),
    };

    let values: Vec<f64> = columns.iter().map(|v| solution.value(*v)).collect();
    // Re-evaluate from the raw values so the constant offset is included
    let objective = model.objective_value(&values);
    debug!("optimal objective {:.6}", objective);

    Ok(SolvedModel { values, objective })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{load_distributions, load_products};
    use crate::model::{build_model, LinearConstraint};
    use crate::models::{DistributionParams, Product};
    use crate::params::{realized_demand, ModelParams};
    use crate::scenarios::generate_scenarios;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;
    use std::path::Path;

    const TOL: f64 = 1e-6;

    fn assemble(products: &[Product]) -> ModelParams {
        let distributions = [DistributionParams {
            variance_id: 1,
            c: 2.5,
            d: 1.6,
            loc: 0.4,
            scale: 0.8,
        }];
        ModelParams::assemble(products, &distributions).unwrap()
    }

    fn assert_feasible(model: &SurplusModel, values: &[f64]) {
        for row in &model.constraints {
            let lhs: f64 = row.terms.iter().map(|(col, coeff)| coeff * values[*col]).sum();
            match row.sense {
                Sense::LessEq => assert!(lhs <= row.rhs + TOL, "{} > {}", lhs, row.rhs),
                Sense::GreaterEq => assert!(lhs >= row.rhs - TOL, "{} < {}", lhs, row.rhs),
            }
        }
        for value in values {
            assert!(*value >= -TOL);
        }
    }

    #[test]
    fn test_reference_two_product_plan() {
        // Flat demand needs no surplus: profit is margin on baseline sales
        let products = vec![
            Product {
                product_id: 1,
                demand: 100.0,
                variance_id: 1,
                margin: 5.0,
                cogs: 2.0,
                capacity: None,
                substitutability_id: 0,
            },
            Product {
                product_id: 2,
                demand: 50.0,
                variance_id: 1,
                margin: 4.0,
                cogs: 3.0,
                capacity: None,
                substitutability_id: 0,
            },
        ];
        let params = assemble(&products);
        let realized = realized_demand(&params, &vec![vec![1.0], vec![1.0]]);
        let model = build_model(&params, &realized, 0.2, 1);
        let solved = solve(&model, SolverBackend::Microlp).unwrap();

        assert!((solved.objective - 700.0).abs() < TOL);
        for value in &solved.values {
            assert!(value.abs() < TOL);
        }
        assert_feasible(&model, &solved.values);
    }

    fn spike_params() -> ModelParams {
        assemble(&[Product {
            product_id: 1,
            demand: 100.0,
            variance_id: 1,
            margin: 9.0,
            cogs: 1.0,
            capacity: None,
            substitutability_id: 0,
        }])
    }

    #[test]
    fn test_surplus_covers_demand_spike() {
        // 30% spike, surplus is cheaper than lost sales
        let params = spike_params();
        let realized = realized_demand(&params, &vec![vec![1.3]]);
        let model = build_model(&params, &realized, 0.5, 1);
        let solved = solve(&model, SolverBackend::Microlp).unwrap();

        assert!((solved.values[model.surplus_col(0)] - 30.0).abs() < TOL);
        assert!((solved.objective - 1170.0).abs() < TOL);
        assert_feasible(&model, &solved.values);
    }

    #[test]
    fn test_aggregate_limit_binds() {
        // mu = 0.1 caps surplus at 10, the rest of the spike goes short
        let params = spike_params();
        let realized = realized_demand(&params, &vec![vec![1.3]]);
        let model = build_model(&params, &realized, 0.1, 1);
        let solved = solve(&model, SolverBackend::Microlp).unwrap();

        assert!((solved.values[model.surplus_col(0)] - 10.0).abs() < TOL);
        assert!((solved.values[model.shortfall_col(0, 0)] - 20.0).abs() < TOL);
        assert!((solved.objective - 990.0).abs() < TOL);
        assert_feasible(&model, &solved.values);
    }

    #[test]
    fn test_capacity_limits_surplus() {
        let products = vec![Product {
            product_id: 1,
            demand: 100.0,
            variance_id: 1,
            margin: 9.0,
            cogs: 1.0,
            capacity: Some(0.05),
            substitutability_id: 0,
        }];
        let params = assemble(&products);
        let realized = realized_demand(&params, &vec![vec![1.3]]);
        let model = build_model(&params, &realized, 0.5, 1);
        let solved = solve(&model, SolverBackend::Microlp).unwrap();

        assert!((solved.values[model.surplus_col(0)] - 5.0).abs() < TOL);
        assert!((solved.values[model.shortfall_col(0, 0)] - 25.0).abs() < TOL);
        assert!((solved.objective - 945.0).abs() < TOL);
        assert_feasible(&model, &solved.values);
    }

    #[test]
    fn test_infeasible_model_reported() {
        let model = SurplusModel {
            num_products: 1,
            num_scenarios: 0,
            num_vars: 1,
            objective: vec![-1.0],
            objective_offset: 0.0,
            constraints: vec![
                LinearConstraint {
                    terms: vec![(0, 1.0)],
                    sense: Sense::LessEq,
                    rhs: 1.0,
                },
                LinearConstraint {
                    terms: vec![(0, 1.0)],
                    sense: Sense::GreaterEq,
                    rhs: 2.0,
                },
            ],
        };
        for backend in [SolverBackend::Microlp, SolverBackend::Highs] {
            let err = solve(&model, backend).unwrap_err();
            assert!(matches!(err, PlanError::Infeasible));
        }
    }

    #[test]
    fn test_unbounded_model_reported() {
        let model = SurplusModel {
            num_products: 1,
            num_scenarios: 0,
            num_vars: 1,
            objective: vec![1.0],
            objective_offset: 0.0,
            constraints: vec![LinearConstraint {
                terms: vec![(0, 1.0)],
                sense: Sense::GreaterEq,
                rhs: 1.0,
            }],
        };
        let err = solve(&model, SolverBackend::Microlp).unwrap_err();
        assert!(matches!(err, PlanError::Unbounded));
    }

    #[test]
    fn test_backends_agree_on_objective() {
        let params = spike_params();
        let realized = realized_demand(&params, &vec![vec![1.3]]);
        let model = build_model(&params, &realized, 0.1, 1);

        let with_highs = solve(&model, SolverBackend::Highs).unwrap();
        let with_microlp = solve(&model, SolverBackend::Microlp).unwrap();

        assert!((with_highs.objective - with_microlp.objective).abs() < TOL);
        for (a, b) in with_highs.values.iter().zip(&with_microlp.values) {
            assert!((a - b).abs() < TOL);
        }
    }

    #[test]
    fn test_fixed_seed_reproduces_plan() {
        let products = vec![
            Product {
                product_id: 1,
                demand: 100.0,
                variance_id: 1,
                margin: 5.0,
                cogs: 2.0,
                capacity: Some(0.3),
                substitutability_id: 0,
            },
            Product {
                product_id: 2,
                demand: 60.0,
                variance_id: 1,
                margin: 6.0,
                cogs: 2.5,
                capacity: None,
                substitutability_id: 0,
            },
        ];
        let params = assemble(&products);
        let distributions = [DistributionParams {
            variance_id: 1,
            c: 2.5,
            d: 1.6,
            loc: 0.4,
            scale: 0.8,
        }];

        let mut plans = Vec::new();
        for _ in 0..2 {
            let mut rng = Pcg64Mcg::seed_from_u64(1001);
            let scenarios = generate_scenarios(&params, &distributions, 20, &mut rng).unwrap();
            let realized = realized_demand(&params, &scenarios);
            let model = build_model(&params, &realized, 0.2, 20);
            plans.push(solve(&model, SolverBackend::Microlp).unwrap());
        }

        assert_eq!(plans[0].values, plans[1].values);
        assert_eq!(plans[0].objective, plans[1].objective);
    }

    #[test]
    fn test_shipped_tables_solve_to_a_feasible_plan() {
        let products = load_products(Path::new("data/products.csv")).unwrap();
        let distributions = load_distributions(Path::new("data/distributions.csv")).unwrap();
        let params = ModelParams::assemble(&products, &distributions).unwrap();

        let mut rng = Pcg64Mcg::seed_from_u64(1001);
        let scenarios = generate_scenarios(&params, &distributions, 25, &mut rng).unwrap();
        let realized = realized_demand(&params, &scenarios);
        let model = build_model(&params, &realized, 0.2, 25);

        let solved = solve(&model, SolverBackend::Microlp).unwrap();
        assert_feasible(&model, &solved.values);

        let surplus: f64 = (0..model.num_products)
            .map(|pos| solved.values[model.surplus_col(pos)])
            .sum();
        assert!(surplus <= 0.2 * params.total_demand() + TOL);
        assert!(solved.objective.is_finite());
        assert!(solved.objective > 0.0);
    }
}
