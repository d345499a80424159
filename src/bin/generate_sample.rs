use csv::WriterBuilder;

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

/// Gaussian read count, rounded and clamped at zero.
fn count(rng: &mut SimpleRng, mean: f64, std_dev: f64) -> i64 {
    rng.gauss(mean, std_dev).round().max(0.0) as i64
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let n_samples = 24;
    let output_path = "sample_data.tsv";

    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(output_path)
        .expect("Failed to create output file");

    writer
        .write_record([
            "Sample_ID",
            "Reads_total",
            "Classified_insects",
            "Classified_mammals",
            "Classified_other",
        ])
        .expect("Failed to write header");

    for i in 0..n_samples {
        let sample_id = format!("sample{:02}", i + 1);
        let insects = count(&mut rng, 12_000.0, 4_000.0);
        let mammals = count(&mut rng, 3_000.0, 1_500.0);
        let other = count(&mut rng, 1_500.0, 800.0);
        let unclassified = count(&mut rng, 6_000.0, 2_000.0);
        let total = insects + mammals + other + unclassified;

        writer
            .write_record([
                sample_id,
                total.to_string(),
                insects.to_string(),
                mammals.to_string(),
                other.to_string(),
            ])
            .expect("Failed to write row");
    }

    writer.flush().expect("Failed to flush output");

    println!("Wrote {n_samples} samples to {output_path}");
}
