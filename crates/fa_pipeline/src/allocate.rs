//! ALLOCATE stage: seed the tie RNG and run the draft.
//!
//! The draft itself is pure (`fa_algo::assign`); this stage only decides
//! which seed to use. A configured `tie_seed` is taken as is; otherwise a
//! fresh seed is drawn from OS entropy and reported back so the run record
//! can echo it.

use fa_algo::{assign, AllocError, AllocOutcome};
use fa_core::{rng::fresh_seed, variables::Params, RawPreference, TieRng};
use log::info;

/// Where the seed of a run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedSource {
    Params,
    Entropy,
}

/// The seed actually used by a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSeed {
    pub seed: u64,
    pub source: SeedSource,
}

pub fn resolve_seed(params: &Params) -> ResolvedSeed {
    match params.tie_seed {
        Some(seed) => ResolvedSeed { seed, source: SeedSource::Params },
        None => {
            let seed = fresh_seed();
            info!("no tie seed configured; drew {seed:#018x} from OS entropy");
            ResolvedSeed { seed, source: SeedSource::Entropy }
        }
    }
}

/// Run the draft with a `TieRng` built from `seed`.
pub fn allocate_with_seed(
    rows: &[RawPreference],
    params: &Params,
    seed: u64,
) -> Result<AllocOutcome, AllocError> {
    let mut rng = TieRng::from_seed_u64(seed);
    assign(rows, params.max_players, &mut rng)
}
