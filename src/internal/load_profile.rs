#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::cast_precision_loss)]

use plotters::prelude::*;
use quadmap::{
    BucketTable, ChainedHashMap, CodePointSum, HashFunction, OpenAddressingMap,
    WeightedCodePointSum,
};
use rand::distr::{Alphanumeric, SampleString};
use rand::Rng;

// Same starting size as the classic put examples
const INITIAL_CAPACITY: usize = 50;
const NUM_KEYS: usize = 2_000;
const SAMPLE_EVERY: usize = 20;
const MAX_KEY_LEN: usize = 12;

const SCENARIOS: [&str; 4] = [
    "Open addressing / code point sum",
    "Open addressing / weighted sum",
    "Chaining / code point sum",
    "Chaining / weighted sum",
];

#[derive(Debug, Default)]
struct Profile {
    loads: Vec<f64>,
    empty_ratios: Vec<f64>,
    capacities: Vec<usize>,
    failed_puts: usize,
}

impl Profile {
    fn sample<T: BucketTable<String>>(&mut self, table: &T) {
        self.loads.push(table.table_load());
        self.empty_ratios.push(table.empty_buckets() as f64 / table.capacity() as f64);
        self.capacities.push(table.capacity());
    }
}

fn profile_open<H: HashFunction<String>>(keys: &[String], hasher: H) -> Profile {
    let mut map = OpenAddressingMap::with_hasher(INITIAL_CAPACITY, hasher);
    let mut profile = Profile::default();

    for (i, key) in keys.iter().enumerate() {
        if map.put(key.clone(), i).is_err() {
            profile.failed_puts += 1;
        }
        if i % SAMPLE_EVERY == 0 {
            profile.sample(&map);
        }
    }

    profile
}

fn profile_chained<H: HashFunction<String>>(keys: &[String], hasher: H) -> Profile {
    let mut map = ChainedHashMap::with_hasher(INITIAL_CAPACITY, hasher);
    let mut profile = Profile::default();

    for (i, key) in keys.iter().enumerate() {
        map.put(key.clone(), i);
        // chained tables only grow when asked to
        if map.table_load() >= 1.0 {
            map.resize_table(map.capacity() * 2);
        }
        if i % SAMPLE_EVERY == 0 {
            profile.sample(&map);
        }
    }

    profile
}

fn draw_curves(
    path: &str,
    profiles: &[Profile],
    values: impl Fn(&Profile) -> &[f64],
) -> Result<(), Box<dyn std::error::Error>> {
    let colors = [
        RGBColor(220, 50, 50),  // Bright red
        RGBColor(50, 90, 220),  // Bright blue
        RGBColor(50, 180, 50),  // Bright green
        RGBColor(180, 50, 180), // Bright magenta
    ];

    let samples = profiles.iter().map(|p| values(p).len()).max().unwrap_or(0);
    let max_value = profiles
        .iter()
        .flat_map(|p| values(p).iter())
        .fold(0.0, |max: f64, &x| max.max(x)) *
        1.1; // Add 10% margin

    let root = SVGBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart =
        ChartBuilder::on(&root).margin(20).build_cartesian_2d(0..samples, 0.0..max_value.max(1e-9))?;

    for (idx, profile) in profiles.iter().enumerate() {
        let style = ShapeStyle::from(&colors[idx % colors.len()]).stroke_width(2);
        chart.draw_series(LineSeries::new(
            values(profile).iter().enumerate().map(|(i, &v)| (i, v)),
            style,
        ))?;
    }

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = rand::rng();
    let keys: Vec<String> = (0..NUM_KEYS)
        .map(|_| {
            let len = rng.random_range(1..=MAX_KEY_LEN);
            Alphanumeric.sample_string(&mut rng, len)
        })
        .collect();

    let profiles = [
        profile_open(&keys, CodePointSum),
        profile_open(&keys, WeightedCodePointSum),
        profile_chained(&keys, CodePointSum),
        profile_chained(&keys, WeightedCodePointSum),
    ];

    for (scenario, profile) in SCENARIOS.iter().zip(&profiles) {
        println!(
            "{}: final load = {:.3}, final capacity = {}, empty buckets = {:.1}%, failed puts = {}",
            scenario,
            profile.loads.last().copied().unwrap_or(0.0),
            profile.capacities.last().copied().unwrap_or(0),
            profile.empty_ratios.last().copied().unwrap_or(0.0) * 100.0,
            profile.failed_puts,
        );
    }

    draw_curves("table_load.svg", &profiles, |p| p.loads.as_slice())?;
    draw_curves("empty_buckets.svg", &profiles, |p| p.empty_ratios.as_slice())?;

    println!("Curves (red, blue, green, magenta follow the order above): table_load.svg, empty_buckets.svg");

    Ok(())
}
