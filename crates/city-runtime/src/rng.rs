//! Serde support for the city's `ChaCha8Rng`.
//!
//! The generator is stored as seed, stream and word position so a restored
//! city continues the exact random sequence it was saved with.

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Serialize, Deserialize)]
struct RngSnapshot {
    seed: [u8; 32],
    stream: u64,
    // u128 word position split for formats without 128-bit integers.
    word_pos_hi: u64,
    word_pos_lo: u64,
}

pub fn serialize<S: Serializer>(rng: &ChaCha8Rng, serializer: S) -> Result<S::Ok, S::Error> {
    let word_pos = rng.get_word_pos();
    RngSnapshot {
        seed: rng.get_seed(),
        stream: rng.get_stream(),
        word_pos_hi: (word_pos >> 64) as u64,
        word_pos_lo: word_pos as u64,
    }
    .serialize(serializer)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ChaCha8Rng, D::Error> {
    use rand::SeedableRng;

    let snap = RngSnapshot::deserialize(deserializer)?;
    let mut rng = ChaCha8Rng::from_seed(snap.seed);
    rng.set_stream(snap.stream);
    rng.set_word_pos((u128::from(snap.word_pos_hi) << 64) | u128::from(snap.word_pos_lo));
    Ok(rng)
}
