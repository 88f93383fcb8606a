//! Write a small, deterministic set of bus route CSV files for trying the
//! dashboard without scraped data.
//!
//! Usage: `generate_sample [OUTPUT_DIR]` (default `Redbus_data`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use encoding_rs::WINDOWS_1252;

const HEADER: [&str; 9] = [
    "Route Name",
    "Route Link",
    "Bus Name",
    "Bus Type",
    "Departing Time",
    "Duration",
    "Star Rating",
    "Price",
    "Seat Availability",
];

const OPERATORS: [&str; 5] = [
    "KSRTC Airavat",
    "SRS Travels",
    "Orange Tours",
    "VRL Travels",
    "Kallada Travels",
];

const BUS_TYPES: [&str; 5] = [
    "A/C Sleeper (2+1)",
    "NON A/C Seater (2+2)",
    "Volvo Multi-Axle A/C Semi Sleeper (2+2)",
    "A/C Seater / Sleeper (2+1)",
    "NON A/C Sleeper (2+1)",
];

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

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len() as u64) as usize]
    }
}

struct RouteFile {
    name: &'static str,
    routes: &'static [&'static str],
    /// Written as Windows-1252 instead of UTF-8.
    legacy_encoding: bool,
}

const FILES: [RouteFile; 3] = [
    RouteFile {
        name: "ksrtc_kerala.csv",
        routes: &["Bangalore to Kozhikode", "Ernakulam to Bangalore", "Trivandrum to Kochi"],
        legacy_encoding: false,
    },
    RouteFile {
        name: "tsrtc_telangana.csv",
        routes: &["Hyderabad to Vijayawada", "Hyderabad to Bangalore"],
        legacy_encoding: false,
    },
    RouteFile {
        name: "goa_ktcl.CSV",
        routes: &["Panaji to Margão", "Mapusa to Panaji"],
        legacy_encoding: true,
    },
];

fn route_slug(route: &str) -> String {
    route
        .to_ascii_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

fn build_rows(file: &RouteFile, rng: &mut SimpleRng) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for route in file.routes {
        let link = format!("https://www.redbus.in/bus-tickets/{}", route_slug(route));
        let buses = 4 + rng.below(6);
        for _ in 0..buses {
            let hour = rng.below(24);
            let minute = rng.below(4) * 15;
            let hours = 5 + rng.below(10);
            let rating = 2.0 + rng.below(30) as f64 / 10.0;
            // A few unparsable prices, as the scraper sometimes produces.
            let price = match rng.below(20) {
                0 => "Sold out".to_string(),
                1 => String::new(),
                _ => (300 + rng.below(40) * 25).to_string(),
            };
            rows.push(vec![
                route.to_string(),
                link.clone(),
                rng.pick(&OPERATORS).to_string(),
                rng.pick(&BUS_TYPES).to_string(),
                format!("{hour:02}:{minute:02}"),
                format!("{hours}h {:02}m", rng.below(60)),
                format!("{rating:.1}"),
                price,
                format!("{} Seats available", rng.below(40)),
            ]);
        }
    }
    rows
}

fn write_file(dir: &Path, file: &RouteFile, rows: &[Vec<String>]) -> Result<PathBuf> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;
    for row in rows {
        writer.write_record(row)?;
    }
    let utf8 = writer.into_inner().map_err(|e| e.into_error())?;

    let bytes = if file.legacy_encoding {
        let text = String::from_utf8(utf8)?;
        let (encoded, _, _) = WINDOWS_1252.encode(&text);
        encoded.into_owned()
    } else {
        utf8
    };

    let path = dir.join(file.name);
    fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn main() -> Result<()> {
    let dir = PathBuf::from(
        std::env::args()
            .nth(1)
            .unwrap_or_else(|| "Redbus_data".to_string()),
    );
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let mut total = 0;
    for file in &FILES {
        let rows = build_rows(file, &mut rng);
        let path = write_file(&dir, file, &rows)?;
        println!("Wrote {} rows to {}", rows.len(), path.display());
        total += rows.len();
    }
    println!("{total} rows across {} files in {}", FILES.len(), dir.display());
    Ok(())
}
