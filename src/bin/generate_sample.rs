use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chart_viewer::data::model::MAX_SERIES;
use chart_viewer::data::parser;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

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

/// y value of series `k` at time `t`: sines for even slots, peaks for odd ones.
fn curve(k: usize, t: f64, phase: f64) -> f64 {
    let k_f = k as f64;
    if k % 2 == 0 {
        (1.0 + k_f * 0.5) * (t * (0.5 + 0.25 * k_f) + phase).sin() + k_f
    } else {
        gaussian(t, 10.0 + 5.0 * k_f + phase, 2.0 + k_f * 0.3, 3.0 + k_f) + k_f
    }
}

fn render_file(name: &str, visibility: &[u8; MAX_SERIES], points: usize, seed: u64) -> String {
    let mut rng = SimpleRng::new(seed);
    let phase = seed as f64 * 0.7;
    let mut out = String::new();

    let _ = writeln!(out, "#standard#{name}");
    let mask: Vec<String> = visibility.iter().map(|v| v.to_string()).collect();
    let _ = writeln!(out, "#visibility#{}", mask.join("#"));
    let _ = writeln!(out, "#generated by generate_sample, seed {seed}");

    for i in 0..points {
        let t = i as f64 * 0.05;
        let segments: Vec<String> = (0..MAX_SERIES)
            .map(|k| {
                // A few broken segments so the parser's drop rule shows up.
                if k == MAX_SERIES - 1 && i % 97 == 13 {
                    return "n/a;?".to_string();
                }
                let y = curve(k, t, phase) + rng.gauss(0.0, 0.05);
                format!("{t:.3};{y:.5}")
            })
            .collect();
        let _ = writeln!(out, "{}", segments.join("|"));
    }
    out
}

fn write_sample(
    dir: &Path,
    name: &str,
    visibility: &[u8; MAX_SERIES],
    points: usize,
    seed: u64,
) -> Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, render_file(name, visibility, points, seed))
        .with_context(|| format!("writing {}", path.display()))?;

    let dataset = parser::load_chart_file(&path)
        .with_context(|| format!("re-reading {}", path.display()))?;
    println!(
        "Wrote {} ({} series, {} points, mask {})",
        path.display(),
        dataset.populated_series(),
        dataset.total_points(),
        dataset.visibility()
    );
    Ok(path)
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| ".".to_string()));
    let points: usize = match args.next() {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("POINTS must be a positive integer, got '{raw}'"))?,
        None => 5000,
    };
    if points == 0 {
        bail!("POINTS must be at least 1");
    }

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    write_sample(&out_dir, "sample_1.txt", &[1, 1, 1, 1, 0, 0, 1, 1], points, 1)?;
    write_sample(&out_dir, "sample_2.txt", &[1, 0, 1, 0, 1, 0, 1, 0], points / 2 + 1, 2)?;
    Ok(())
}
