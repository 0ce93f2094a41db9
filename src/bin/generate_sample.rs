use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Output interval of the synthetic runs, in minutes.
const TIME_DELTA: f64 = 60.0;
const N_STEPS: usize = 96;

/// Storm response shape: rises to `peak` at `t_peak` and recedes over `recession`.
fn hydrograph(t: f64, t_peak: f64, peak: f64, recession: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    let k = t_peak / recession;
    let shape = (t / t_peak).powf(k) * (k * (1.0 - t / t_peak)).exp();
    peak * shape
}

/// Minimal deterministic PRNG (xoshiro256**). Seeded with a constant so every
/// run of the generator writes the same sample ensemble.
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

/// One CAESAR-Lisflood timeseries file: 14 columns per output step.
fn render_run(m: f64, variant_scale: f64, rng: &mut SimpleRng) -> String {
    let mut out = String::new();
    // Larger m gives a slower, flatter response.
    let t_peak = 30.0 + 400.0 * m;
    let peak = 25.0 * variant_scale / (1.0 + 20.0 * m);

    for step in 0..N_STEPS {
        let hours = step as f64 * TIME_DELTA / 60.0;
        let q_lisflood = (hydrograph(hours, t_peak, peak, 12.0) + rng.gauss(0.0, 0.05)).max(0.0);
        let q_topmodel = 0.8 * q_lisflood;
        let elevation_change = 0.0;
        let sed_tot = 1e-3 * q_lisflood.powf(1.5);

        // Nine grain-size fractions summing to one.
        let raw: Vec<f64> = (0..9)
            .map(|d| (1.0 / (1.0 + d as f64)) * (1.0 + 0.05 * rng.gauss(0.0, 1.0)).max(0.1))
            .collect();
        let total: f64 = raw.iter().sum();

        out.push_str(&format!(
            "{step} {q_lisflood:.4} {q_topmodel:.4} {elevation_change} {sed_tot:.6}"
        ));
        for f in &raw {
            out.push_str(&format!(" {:.5}", f / total));
        }
        out.push('\n');
    }
    out
}

fn main() -> Result<()> {
    env_logger::init();

    let output_dir: PathBuf = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_data".to_string())
        .into();
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let mut rng = SimpleRng::new(42);

    // <param>_<run>_<variant>.dat, param = TOPMODEL m × 1000
    let params = [5u32, 10, 20, 40];
    let variants = [("lumped", 1.0), ("detachlim", 0.8)];

    let mut n_files = 0;
    for (run, &param) in params.iter().enumerate() {
        for &(variant, scale) in &variants {
            let name = format!("{param}_run{:02}_{variant}.dat", run + 1);
            let body = render_run(param as f64 / 1000.0, scale, &mut rng);
            write(&output_dir.join(&name), &body)?;
            log::info!("wrote {name}");
            n_files += 1;
        }
    }

    // Gauge record close to the m = 0.010 run.
    let mut measured = String::new();
    for step in 0..N_STEPS {
        let q = hydrograph(step as f64, 34.0, 20.0, 12.0) + rng.gauss(0.0, 0.3);
        measured.push_str(&format!("{step},{:.3}\n", q.max(0.0)));
    }
    write(&output_dir.join("measured.csv"), &measured)?;

    let config = serde_json::json!({
        "data_dir": output_dir.to_string_lossy(),
        "pattern": "*_lumped.dat",
        "metric": "q_lisflood",
        "time_delta": TIME_DELTA,
        "time_unit": "hours",
        "label_strategy": "model_parameter",
        "measured_data": "measured.csv",
    });
    let config_text = serde_json::to_string_pretty(&config).context("serializing config")?;
    write(&output_dir.join("ensemble.json"), &config_text)?;

    println!(
        "Wrote {n_files} runs ({N_STEPS} steps each), measured.csv and ensemble.json to {}",
        output_dir.display()
    );
    Ok(())
}

fn write(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}
