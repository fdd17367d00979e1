#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::pedantic)]

use std::{
    error::Error,
    fs::File,
    hint::black_box,
    io::{self, BufWriter, Write},
    time::Instant,
};

use chainmap::{ChainedHashMap, hashes};
use plotters::prelude::*;
use rand::{Rng, SeedableRng, rngs::StdRng};

// Table populations to measure, smallest first
const SIZES: [usize; 14] =
    [100, 200, 400, 800, 1000, 1500, 2000, 3000, 4000, 5500, 8000, 11_000, 15_000, 20_000];

const SEED: u64 = 0x5EED;

const FIRST_NAMES: [&str; 16] = [
    "Lindsay", "Annis", "Keiko", "Sylvie", "Ed", "Vernetta", "Abram", "Soraya", "Clorinda",
    "Lorina", "Milly", "Jarrod", "Tamara", "Otis", "Priya", "Bruno",
];

const LAST_NAMES: [&str; 16] = [
    "Sandoval", "Pollard", "Kelly", "Nieves", "Porter", "Diaz", "Mcintyre", "Sharpe", "Briggs",
    "Blackburn", "Sampson", "Bishop", "Okafor", "Lindqvist", "Moreau", "Tanaka",
];

// Looked up after every fill; the generator never produces a name without a numeric suffix
const ABSENT_NAMES: [&str; 12] = [
    "Lindsay Sandoval",
    "Annis Pollard",
    "Keiko Kelly",
    "Sylvie Nieves",
    "Ed Porter",
    "Vernetta Diaz",
    "Abram Mcintyre",
    "Soraya Sharpe",
    "Clorinda Briggs",
    "Lorina Blackburn",
    "Milly Sampson",
    "Jarrod Bishop",
];

// Names from the pool looked up after every fill alongside ABSENT_NAMES
const PRESENT_PROBES: usize = 6;

const COLORS: [RGBColor; 5] = [
    RGBColor(220, 50, 50),
    RGBColor(50, 90, 220),
    RGBColor(50, 180, 50),
    RGBColor(180, 50, 180),
    RGBColor(230, 140, 20),
];

// Synthetic names, repeated names included, so keys end up with several values
fn generate_names(count: usize) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(SEED);
    (0..count)
        .map(|_| {
            let first = FIRST_NAMES[rng.random_range(0..FIRST_NAMES.len())];
            let last = LAST_NAMES[rng.random_range(0..LAST_NAMES.len())];
            let suffix: u16 = rng.random_range(0..1000);
            format!("{first} {last} {suffix}")
        })
        .collect()
}

// Mean nanoseconds per lookup for a table filled with the first `size` names
fn search_timing(names: &[String], size: usize, hasher: hashes::StrHasher) -> f64 {
    let mut map = ChainedHashMap::new(|name: &String| hasher(name));
    for (index, name) in names.iter().take(size).enumerate() {
        map.emplace(name.clone(), index);
    }

    let probes: Vec<String> = names
        .iter()
        .take(size.min(PRESENT_PROBES))
        .cloned()
        .chain(ABSENT_NAMES.iter().map(ToString::to_string))
        .collect();

    let mut total_nanos: u128 = 0;
    for key in &probes {
        let start = Instant::now();
        let _found = black_box(map.equal_range(key).count());
        total_nanos += start.elapsed().as_nanos();
    }

    total_nanos as f64 / probes.len() as f64
}

// Collision percentage over `name + index` strings, which are all distinct
fn collision_count(names: &[String], size: usize, hasher: hashes::StrHasher) -> f64 {
    let keys = names.iter().take(size).enumerate().map(|(index, name)| format!("{name}{index}"));
    hashes::collision_rate(keys, hasher)
}

// One row per (size, hash) pair, in the order produced
type Rows = Vec<(usize, &'static str, f64)>;

fn run_all(
    names: &[String],
    measure: fn(&[String], usize, hashes::StrHasher) -> f64,
) -> io::Result<Rows> {
    let mut rows = Vec::with_capacity(SIZES.len() * hashes::ALL.len());
    for size in SIZES {
        println!("-----Size: {size}------");
        for (hash_name, hasher) in hashes::ALL {
            print!("Running {hash_name}...");
            io::stdout().flush()?;
            let value = measure(names, size, hasher);
            rows.push((size, hash_name, value));
            println!("Done.");
        }
    }
    Ok(rows)
}

fn write_csv(path: &str, rows: &Rows) -> Result<(), Box<dyn Error>> {
    let mut out = BufWriter::new(File::create(path)?);
    for (size, hash_name, value) in rows {
        writeln!(out, "{size},{hash_name},{value}")?;
    }
    out.flush()?;
    Ok(())
}

fn plot(path: &str, caption: &str, y_desc: &str, rows: &Rows) -> Result<(), Box<dyn Error>> {
    let font_family = "sans-serif";
    let line_width = 2;
    let marker_size = 4;

    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_value = rows.iter().fold(0.0, |max: f64, row| max.max(row.2)) * 1.1;
    let max_value = if max_value > 0.0 { max_value } else { 1.0 };

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, (font_family, 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .right_y_label_area_size(10)
        .build_cartesian_2d(0..(SIZES.len() - 1), 0.0..max_value)?;

    chart
        .configure_mesh()
        .x_labels(SIZES.len())
        .x_label_formatter(&|x| SIZES.get(*x).map_or_else(String::new, ToString::to_string))
        .x_desc("Number of Records")
        .y_desc(y_desc)
        .axis_desc_style((font_family, 16))
        .draw()?;

    for (hash_idx, (hash_name, _)) in hashes::ALL.iter().enumerate() {
        let color = &COLORS[hash_idx % COLORS.len()];
        let line_style = ShapeStyle::from(color).stroke_width(line_width);
        let points: Vec<(usize, f64)> = rows
            .iter()
            .filter(|row| row.1 == *hash_name)
            .enumerate()
            .map(|(i, row)| (i, row.2))
            .collect();

        chart
            .draw_series(LineSeries::new(points.clone(), line_style))?
            .label(*hash_name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        chart.draw_series(
            points.into_iter().map(|point| Circle::new(point, marker_size, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let max_size = SIZES.iter().copied().max().unwrap_or_default();
    let names = generate_names(max_size);

    println!("Start timing of searches...");
    let timings = run_all(&names, search_timing)?;
    write_csv("hash_timings.csv", &timings)?;
    plot("hash_timings.png", "Lookup Time by Hash Function", "Mean Lookup Time (ns)", &timings)?;

    println!("\nStart timing of counting collisions...");
    let collisions = run_all(&names, collision_count)?;
    write_csv("hash_collisions.csv", &collisions)?;
    plot("hash_collisions.png", "Collisions by Hash Function", "Collisions (%)", &collisions)?;

    println!(
        "Generated hash_timings.csv, hash_collisions.csv, hash_timings.png, hash_collisions.png"
    );

    Ok(())
}
