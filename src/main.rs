mod distribution;
mod error;
mod input;
mod model;
mod models;
mod options;
mod params;
mod reporting;
mod scenarios;
mod solver;

use anyhow::Result;
use clap::Parser;
use log::{debug, info};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

use model::build_model;
use options::Options;
use params::{realized_demand, ModelParams};
use reporting::{display_summary, extract_surplus, write_surplus_csv};
use scenarios::generate_scenarios;
use solver::solve;

fn main() -> Result<()> {
    env_logger::init();

    let options = Options::parse();
    options.validate()?;

    println!("╔══════════════════════════════════════════════╗");
    println!("║   SURPLUS PRODUCTION PLANNING UNDER RISK     ║");
    println!("╚══════════════════════════════════════════════╝\n");
    println!("Run configuration:");
    println!("  mu:     {}", options.mu);
    println!("  ns:     {}", options.ns);
    println!("  solver: {:?}", options.solver);
    println!("  seed:   {}", options.seed);

    // Load the tables and assemble the optimization parameters
    let products = input::load_products(&options.products)?;
    let distributions = input::load_distributions(&options.distributions)?;
    let params = ModelParams::assemble(&products, &distributions)?;
    info!(
        "{} products in {} substitutability groups",
        params.products.len(),
        params.groups.len()
    );
    for group in &params.groups {
        debug!("group {}: {} products", group.id, group.members.len());
    }

    // Sample the demand-variation scenarios with a fixed-seed generator
    let mut rng = Pcg64Mcg::seed_from_u64(options.seed);
    let scenarios = generate_scenarios(&params, &distributions, options.ns, &mut rng)?;
    let realized = realized_demand(&params, &scenarios);

    // Build and solve the recourse program
    let model = build_model(&params, &realized, options.mu, options.ns);
    let solved = solve(&model, options.solver)?;

    // Extract the plan, write it, and summarize
    let records = extract_surplus(&params, &model, &solved);
    write_surplus_csv(&options.output, &records)?;
    display_summary(&records, solved.objective);
    println!("\nSurplus plan written to {}", options.output.display());

    Ok(())
}
