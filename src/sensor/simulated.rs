use rand::Rng as _;

use crate::reading::RawSample;

/// Generates a plausible indoor-air sample for mock mode.
pub fn synthetic_sample() -> RawSample {
    let mut rng = rand::thread_rng();

    RawSample {
        pm1_0: rng.gen_range(0.0..=10.0),
        pm2_5: rng.gen_range(5.0..=35.0),
        pm4_0: rng.gen_range(5.0..=40.0),
        pm10: rng.gen_range(10.0..=50.0),
        voc_index: rng.gen_range(50..=150) as f32,
        temperature: rng.gen_range(20.0..=30.0),
        humidity: rng.gen_range(40.0..=60.0),
    }
}
