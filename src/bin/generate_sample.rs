//! Writes `sample_data.csv`: a small table with correlated, anti-correlated,
//! monotonic-but-nonlinear, noisy, constant, partially missing and text
//! columns for exercising the correlation views.

use std::error::Error;

/// Minimal deterministic PRNG (SplitMix64).
struct SplitMix64(u64);

impl SplitMix64 {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
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

fn main() -> Result<(), Box<dyn Error>> {
    let mut rng = SplitMix64(42);
    let stations = ["north", "south", "east"];
    let rows = 120;

    let output_path = "sample_data.csv";
    let mut writer = csv::Writer::from_path(output_path)?;
    writer.write_record([
        "id",
        "station",
        "temperature",
        "ice_cream_sales",
        "heating_cost",
        "growth_index",
        "rainfall",
        "humidity",
        "sensor_version",
    ])?;

    for i in 0..rows {
        let temperature = rng.gauss(18.0, 7.0);
        let sales = 40.0 + 6.5 * temperature + rng.gauss(0.0, 12.0);
        let heating = 300.0 - 9.0 * temperature + rng.gauss(0.0, 25.0);
        let growth = (temperature / 10.0).exp() + rng.gauss(0.0, 0.2);
        let rainfall = rng.gauss(60.0, 20.0).max(0.0);
        // Every seventh humidity reading is missing.
        let humidity = if i % 7 == 3 {
            String::new()
        } else {
            format!("{:.1}", 55.0 + 0.8 * rainfall / 2.0 + rng.gauss(0.0, 8.0))
        };

        writer.write_record([
            format!("S{:03}", i + 1),
            stations[i % stations.len()].to_string(),
            format!("{temperature:.2}"),
            format!("{sales:.1}"),
            format!("{heating:.1}"),
            format!("{growth:.3}"),
            format!("{rainfall:.1}"),
            humidity,
            "2".to_string(),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {rows} rows to {output_path}");
    Ok(())
}
