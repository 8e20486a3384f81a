/// Core data types for the surplus planning pipeline

use serde::{Deserialize, Serialize};

/// One row of the product table
#[derive(Clone, Debug, Deserialize)]
pub struct Product {
    pub product_id: u32,
    /// Baseline demand for the planning period
    pub demand: f64,
    /// Demand-variation distribution assigned to this product
    pub variance_id: u32,
    /// Unit margin on top of cost
    pub margin: f64,
    /// Unit cost of goods sold
    pub cogs: f64,
    /// Surplus bound as a multiple of demand, absent when unconstrained
    pub capacity: Option<f64>,
    /// Substitutability group the product belongs to
    pub substitutability_id: u32,
}

/// One row of the distribution table: Burr XII parameters
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct DistributionParams {
    pub variance_id: u32,
    pub c: f64,
    pub d: f64,
    pub loc: f64,
    pub scale: f64,
}

/// One line of the surplus plan written to the output table
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SurplusRecord {
    #[serde(rename = "Product ID")]
    pub product_id: u32,
    #[serde(rename = "Surplus")]
    pub surplus: f64,
}

/// Sampled demand multipliers indexed by product position, then scenario
pub type ScenarioMatrix = Vec<Vec<f64>>;
