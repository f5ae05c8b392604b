// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use critic_mi::estimators::approaches::MineBuffer;
use critic_mi::estimators::critics::{GaussianOracleCritic, SeparableCritic};
use critic_mi::estimators::utils::gaussian::{mi_to_rho, rho_to_mi, sample_correlated_gaussian};
use critic_mi::estimators::{estimate_mutual_information, Estimator, MineOptions, MiError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

const DIM: usize = 5;
const BATCH_SIZE: usize = 128;

fn main() -> Result<(), MiError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut rng = StdRng::seed_from_u64(42);

    // Optimal critic: every bound evaluated at the true log density ratio
    println!("Oracle critic, dim = {DIM}, batch = {BATCH_SIZE}");
    let header: Vec<String> = Estimator::TAGS.iter().map(|t| format!("{t:>10}")).collect();
    println!("{:>8} {}", "true MI", header.join(" "));
    for target_mi in [0.5, 2.0, 4.0, 6.0] {
        let rho = mi_to_rho(DIM, target_mi);
        let critic = GaussianOracleCritic::new(rho)?;
        let (x, y) = sample_correlated_gaussian(rho, DIM, BATCH_SIZE, &mut rng)?;

        let mut row = Vec::new();
        for tag in Estimator::TAGS {
            let estimator: Estimator = tag.parse()?;
            let estimate = estimate_mutual_information(&estimator, &x, &y, &critic, None)?;
            row.push(format!("{:>10.4}", estimate.value()));
        }
        println!("{:>8.4} {}", rho_to_mi(DIM, rho), row.join(" "));
    }
    println!("InfoNCE is capped at log N = {:.4}", (BATCH_SIZE as f64).ln());

    // Learned critic: a separable critic trained by gradient ascent on MINE
    let rho = mi_to_rho(DIM, 2.0);
    let mut critic = SeparableCritic::random(DIM, DIM, 16, 0.1, &mut rng)?;
    let mut options = MineOptions::default();
    let learning_rate = 0.05;

    for step in 0..=500 {
        let (x, y) = sample_correlated_gaussian(rho, DIM, BATCH_SIZE, &mut rng)?;
        let estimator = Estimator::Mine(options.clone());
        let estimate = estimate_mutual_information(&estimator, &x, &y, &critic, None)?;
        critic.ascend(&x, &y, estimate.bound.score_grad(), learning_rate);

        let buffer: MineBuffer = estimate.mine.map(|s| s.buffer).unwrap_or_default();
        options.buffer = Some(buffer);

        if step % 100 == 0 {
            tracing::info!(
                step,
                mine = estimate.value(),
                buffer = buffer.value(),
                true_mi = rho_to_mi(DIM, rho),
                "Training separable critic"
            );
        }
    }

    let (x, y) = sample_correlated_gaussian(rho, DIM, 1024, &mut rng)?;
    for tag in ["nwj", "infonce", "dv"] {
        let estimator: Estimator = tag.parse()?;
        let estimate = estimate_mutual_information(&estimator, &x, &y, &critic, None)?;
        println!("Trained critic, {tag}: {:.4}", estimate.value());
    }
    Ok(())
}
