/// Result extraction and output module
/// Turns a solved model into the surplus table and the console summary

use std::path::Path;

use crate::error::{PlanError, PlanResult};
use crate::model::SurplusModel;
use crate::models::SurplusRecord;
use crate::params::ModelParams;
use crate::solver::SolvedModel;

/// Read the optimal surplus per product, in ascending product ID order
pub fn extract_surplus(
    params: &ModelParams,
    model: &SurplusModel,
    solved: &SolvedModel,
) -> Vec<SurplusRecord> {
    params
        .products
        .iter()
        .enumerate()
        .map(|(pos, product)| SurplusRecord {
            product_id: product.id,
            surplus: solved.values[model.surplus_col(pos)],
        })
        .collect()
}

/// Write the surplus table as CSV
pub fn write_surplus_csv(path: &Path, records: &[SurplusRecord]) -> PlanResult<()> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| PlanError::Output(format!("{}: {}", path.display(), e)))?;
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| PlanError::Output(format!("{}: {}", path.display(), e)))?;
    }
    writer
        .flush()
        .map_err(|e| PlanError::Output(format!("{}: {}", path.display(), e)))?;
    Ok(())
}

/// Print the surplus plan and the expected profit at the optimum
pub fn display_summary(records: &[SurplusRecord], objective: f64) {
    let total: f64 = records.iter().map(|r| r.surplus).sum();

    println!("\nSurplus plan ({} products):", records.len());
    for record in records {
        println!("  Product {}: {:.2} units", record.product_id, record.surplus);
    }
    println!("  Total surplus:   {:.2} units", total);
    println!("  Expected profit: {:.2}", objective);
}
