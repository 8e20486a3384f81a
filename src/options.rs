/// Run configuration module
/// Parses the command line and rejects out-of-range parameters before any work

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::error::{PlanError, PlanResult};

/// Allowed range for the aggregate surplus ratio
pub const MU_MIN: f64 = 0.1;
pub const MU_MAX: f64 = 0.5;

/// LP back-ends the solver adapter can run
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SolverBackend {
    /// HiGHS, the default native solver
    Highs,
    /// Pure-Rust simplex, no native dependencies
    Microlp,
}

/// Command line options for a planning run
#[derive(Debug, Parser)]
#[command(name = "surplus-opt", about = "Two-stage stochastic surplus production planner")]
pub struct Options {
    /// Aggregate surplus ratio: fraction of total demand producible as surplus
    #[arg(long, default_value_t = 0.1)]
    pub mu: f64,

    /// Number of demand scenarios to sample
    #[arg(long, default_value_t = 100)]
    pub ns: usize,

    /// LP solver backend
    #[arg(long, value_enum, default_value_t = SolverBackend::Highs)]
    pub solver: SolverBackend,

    /// Seed for the scenario generator
    #[arg(long, default_value_t = 1001)]
    pub seed: u64,

    /// Product table path
    #[arg(long, default_value = "data/products.csv")]
    pub products: PathBuf,

    /// Distribution table path
    #[arg(long, default_value = "data/distributions.csv")]
    pub distributions: PathBuf,

    /// Output table path
    #[arg(short, long, default_value = "output.csv")]
    pub output: PathBuf,
}

impl Options {
    /// Check parameter ranges; a NaN mu fails the range comparison as well
    pub fn validate(&self) -> PlanResult<()> {
        if !(self.mu >= MU_MIN && self.mu <= MU_MAX) {
            return Err(PlanError::Config(format!(
                "mu must lie in [{}, {}], got {}",
                MU_MIN, MU_MAX, self.mu
            )));
        }
        if self.ns == 0 {
            return Err(PlanError::Config("ns must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options_with(mu: f64, ns: usize) -> Options {
        Options {
            mu,
            ns,
            solver: SolverBackend::Microlp,
            seed: 1001,
            products: PathBuf::from("data/products.csv"),
            distributions: PathBuf::from("data/distributions.csv"),
            output: PathBuf::from("output.csv"),
        }
    }

    #[test]
    fn test_mu_range_is_enforced() {
        assert!(options_with(0.05, 10).validate().is_err());
        assert!(options_with(0.1, 10).validate().is_ok());
        assert!(options_with(0.5, 10).validate().is_ok());
        assert!(options_with(0.51, 10).validate().is_err());
        assert!(options_with(f64::NAN, 10).validate().is_err());
    }

    #[test]
    fn test_zero_scenarios_rejected() {
        let err = options_with(0.2, 0).validate().unwrap_err();
        assert!(matches!(err, PlanError::Config(_)));
    }

    #[test]
    fn test_defaults_match_reference_run() {
        let options = Options::try_parse_from(["surplus-opt"]).unwrap();
        assert_eq!(options.mu, 0.1);
        assert_eq!(options.ns, 100);
        assert_eq!(options.solver, SolverBackend::Highs);
        assert_eq!(options.seed, 1001);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_solver_names_parse() {
        let options = Options::try_parse_from(["surplus-opt", "--solver", "microlp"]).unwrap();
        assert_eq!(options.solver, SolverBackend::Microlp);
        assert!(Options::try_parse_from(["surplus-opt", "--solver", "glpk"]).is_err());
    }
}
