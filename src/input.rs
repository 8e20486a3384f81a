/// Input table loading module
/// Reads the product and distribution tables from CSV and checks them row by row

use std::collections::HashSet;
use std::path::Path;

use crate::error::{PlanError, PlanResult};
use crate::models::{DistributionParams, Product};

/// Load the product table
/// A NaN capacity cell is normalized to "no capacity limit"
pub fn load_products(path: &Path) -> PlanResult<Vec<Product>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| PlanError::Input(format!("{}: {}", path.display(), e)))?;

    let mut products = Vec::new();
    for record in reader.deserialize() {
        let mut product: Product =
            record.map_err(|e| PlanError::Input(format!("{}: {}", path.display(), e)))?;
        if product.capacity.map_or(false, f64::is_nan) {
            product.capacity = None;
        }
        validate_product(&product, path)?;
        products.push(product);
    }

    if products.is_empty() {
        return Err(PlanError::Input(format!(
            "{}: no product records",
            path.display()
        )));
    }

    let mut seen = HashSet::new();
    for product in &products {
        if !seen.insert(product.product_id) {
            return Err(PlanError::Input(format!(
                "{}: duplicate product id {}",
                path.display(),
                product.product_id
            )));
        }
    }

    Ok(products)
}

fn validate_product(product: &Product, path: &Path) -> PlanResult<()> {
    if !product.demand.is_finite() || product.demand < 0.0 {
        return Err(PlanError::Input(format!(
            "{}: product {} has invalid demand {}",
            path.display(),
            product.product_id,
            product.demand
        )));
    }
    if !product.margin.is_finite() {
        return Err(PlanError::Input(format!(
            "{}: product {} has invalid margin {}",
            path.display(),
            product.product_id,
            product.margin
        )));
    }
    if !product.cogs.is_finite() {
        return Err(PlanError::Input(format!(
            "{}: product {} has invalid cogs {}",
            path.display(),
            product.product_id,
            product.cogs
        )));
    }
    if let Some(cap) = product.capacity {
        if !cap.is_finite() || cap < 0.0 {
            return Err(PlanError::Input(format!(
                "{}: product {} has invalid capacity {}",
                path.display(),
                product.product_id,
                cap
            )));
        }
    }
    Ok(())
}

/// Load the distribution table
/// Parameter positivity is checked later, when a referenced sampler is built
pub fn load_distributions(path: &Path) -> PlanResult<Vec<DistributionParams>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| PlanError::Input(format!("{}: {}", path.display(), e)))?;

    let mut distributions = Vec::new();
    let mut seen = HashSet::new();
    for record in reader.deserialize() {
        let params: DistributionParams =
            record.map_err(|e| PlanError::Input(format!("{}: {}", path.display(), e)))?;
        if !seen.insert(params.variance_id) {
            return Err(PlanError::Input(format!(
                "{}: duplicate distribution id {}",
                path.display(),
                params.variance_id
            )));
        }
        distributions.push(params);
    }

    Ok(distributions)
}
