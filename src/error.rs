/// Failure taxonomy for the planning pipeline
/// Every variant is fatal to the run; nothing is retried

use thiserror::Error;

/// Errors surfaced by the planning stages
#[derive(Error, Debug)]
pub enum PlanError {
    /// Run configuration rejected before any computation
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Input table unreadable, malformed, or inconsistent
    #[error("invalid input: {0}")]
    Input(String),

    /// A referenced demand-variation distribution could not be instantiated
    #[error("scenario sampling failed: {0}")]
    Sampling(String),

    /// The recourse program has no feasible point
    #[error("model is infeasible")]
    Infeasible,

    /// The recourse program is unbounded
    #[error("model is unbounded")]
    Unbounded,

    /// The backend terminated without an optimal solution
    #[error("solver failure: {0}")]
    Solver(String),

    /// The surplus table could not be written
    #[error("could not write output: {0}")]
    Output(String),
}

/// Result alias used across the pipeline
pub type PlanResult<T> = Result<T, PlanError>;
