//! Runtime state for one trial run, mutated as vaccines are simulated

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::PipelineConfig;
use crate::limiter::ApprovalLimiter;
use crate::model::{PerPlatform, Platform};

/// Mutable state shared by every vaccine within one run.
///
/// Holds the run's seeded generator, the shared per-platform latent draws
/// that correlate same-platform success outcomes, and the approval limiter
/// that meters completions across the whole registry.
#[derive(Debug)]
pub struct TrialState {
    pub rng: SmallRng,
    /// One uniform draw per platform, fixed for the whole run
    pub platform_latents: PerPlatform<f64>,
    pub limiter: ApprovalLimiter,
    /// Whether the Phase III slowdown applies to this run
    pub slowdown: bool,
}

impl TrialState {
    pub fn from_config(config: &PipelineConfig, slowdown: bool, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        // Drawn up front, in platform order, so the stream layout does not
        // depend on which platforms the registry happens to contain
        let mut latents = [0.0; Platform::COUNT];
        for latent in &mut latents {
            *latent = rng.random();
        }

        Self {
            rng,
            platform_latents: PerPlatform(latents),
            limiter: ApprovalLimiter::new(config.approval_limit, config.months),
            slowdown,
        }
    }
}
