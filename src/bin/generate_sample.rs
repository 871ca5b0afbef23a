//! Writes a deterministic sample `data/Sheet1.csv` so the dashboard has
//! something to render out of the box. The file is WINDOWS-1252 encoded,
//! like the real exports the fallback loader expects.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use encoding_rs::WINDOWS_1252;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    // Non-ASCII region names exercise the WINDOWS-1252 decode path.
    let regions = ["North", "South", "Qu\u{e9}bec", "M\u{fc}nchen"];
    let models = ["baseline", "gradient_boost", "neural"];

    let n_rows = 240;
    let mut out = String::from("id,region,model,prediction,actual,abs_error\r\n");
    for id in 0..n_rows {
        let region = regions[(rng.next_u64() % regions.len() as u64) as usize];
        let model = models[(rng.next_u64() % models.len() as u64) as usize];

        let actual = 50.0 + 20.0 * (id as f64 / 24.0).sin() + rng.gauss(0.0, 4.0);
        let prediction = actual + rng.gauss(0.0, 6.0);
        let abs_error = (prediction - actual).abs();

        out.push_str(&format!(
            "{id},{region},{model},{prediction:.3},{actual:.3},{abs_error:.3}\r\n"
        ));
    }

    let dir = Path::new("data");
    fs::create_dir_all(dir).context("creating data/ directory")?;

    let path = dir.join("Sheet1.csv");
    let (encoded, _, _) = WINDOWS_1252.encode(&out);
    fs::write(&path, encoded).with_context(|| format!("writing {}", path.display()))?;

    println!("Wrote {n_rows} rows to {}", path.display());
    Ok(())
}
