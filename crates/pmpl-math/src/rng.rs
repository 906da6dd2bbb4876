//! Seeded random number streams.
//!
//! Every consumer asks for its own stream id so that parallel sweeps stay
//! reproducible regardless of scheduling order.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Golden-ratio increment used to decorrelate derived seeds.
const STREAM_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// `StdRng` for `stream`, derived from `seed`; OS entropy when `seed` is `None`.
pub fn seeded(seed: Option<u64>, stream: u64) -> StdRng {
    match seed {
        Some(base) => StdRng::seed_from_u64(splitmix(base ^ stream.wrapping_mul(STREAM_MIX))),
        None => StdRng::from_entropy(),
    }
}

fn splitmix(mut z: u64) -> u64 {
    z = z.wrapping_add(STREAM_MIX);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
