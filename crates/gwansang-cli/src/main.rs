mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{Config, OutputFormat};
use gwansang_core::{analyze_landmarks, AnimalMatch, FaceReader, FaceReading, FacialFeatures, Point};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gwansang", about = "Korean face reading from 68-point landmarks")]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a landmark file into categorical features
    Features {
        /// JSON array of {"x", "y"} points ("-" for stdin)
        file: PathBuf,
    },
    /// Produce a face reading
    Read {
        /// JSON array of {"x", "y"} points ("-" for stdin)
        file: PathBuf,
        /// Seed for phrase selection (overrides GWANSANG_SEED)
        #[arg(long)]
        seed: Option<u64>,
        /// Always use each record's base meaning
        #[arg(long)]
        no_variants: bool,
    },
    /// Match the face against the eight animal types
    Animal {
        /// JSON array of {"x", "y"} points ("-" for stdin)
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    let output = if cli.json {
        OutputFormat::Json
    } else {
        config.output
    };

    match cli.command {
        Commands::Features { file } => {
            let features = load_features(&file)?;
            match output {
                OutputFormat::Json => print_json(&features)?,
                OutputFormat::Text => print_features(&features),
            }
        }
        Commands::Read {
            file,
            seed,
            no_variants,
        } => {
            let features = load_features(&file)?;
            let reader = FaceReader::new().phrase_variants(config.phrase_variants && !no_variants);
            let reading = match seed.or(config.seed) {
                Some(seed) => reader.read(&features, &mut StdRng::seed_from_u64(seed)),
                None => reader.read(&features, &mut rand::thread_rng()),
            };
            match output {
                OutputFormat::Json => print_json(&reading)?,
                OutputFormat::Text => print_reading(&reading),
            }
        }
        Commands::Animal { file } => {
            let features = load_features(&file)?;
            let result = AnimalMatch::from_features(&features);
            match output {
                OutputFormat::Json => print_json(&result)?,
                OutputFormat::Text => print_animal(&result),
            }
        }
    }

    Ok(())
}

fn load_features(path: &Path) -> Result<FacialFeatures> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read landmarks from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    let points: Vec<Point> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of points", path.display()))?;
    tracing::debug!(points = points.len(), file = %path.display(), "landmarks loaded");

    let features = analyze_landmarks(points)?;
    Ok(features)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_features(f: &FacialFeatures) {
    println!(
        "face shape: {} ({})",
        f.face_shape.kind, f.face_shape.symmetry
    );
    println!(
        "forehead:   width {}, height {}, {}",
        f.forehead.width, f.forehead.height, f.forehead.shape
    );
    println!(
        "eyebrows:   {} {}, {}",
        f.eyebrows.thickness, f.eyebrows.shape, f.eyebrows.length
    );
    println!(
        "eyes:       {} {}, spacing {}",
        f.eyes.size, f.eyes.shape, f.eyes.spacing
    );
    println!(
        "nose:       {}, bridge {}, tip {}, nostrils {}",
        f.nose.size, f.nose.bridge, f.nose.tip, f.nose.nostril
    );
    println!(
        "mouth:      {}, lips {}, corners {}",
        f.mouth.size, f.mouth.shape, f.mouth.corners
    );
    println!(
        "cheekbones: prominence {}, width {}",
        f.cheekbones.prominence, f.cheekbones.width
    );
    println!(
        "chin:       {}, length {}, width {}",
        f.chin.shape, f.chin.length, f.chin.width
    );
}

fn print_reading(r: &FaceReading) {
    println!("{} (overall {:.1})", r.face_type, r.overall);
    println!("{}", r.type_description);
    println!();
    println!(
        "wealth {:.1}  love {:.1}  career {:.1}  health {:.1}  relationships {:.1}",
        r.scores.wealth, r.scores.love, r.scores.career, r.scores.health, r.scores.relationships
    );
    println!();
    for zone in &r.zones {
        match &zone.interpretation {
            Some(text) => println!("[{}] {}: {}", zone.zone, zone.key, text),
            None => println!("[{}] {}", zone.zone, zone.key),
        }
    }
    println!();
    for stage in [&r.life_stages.early, &r.life_stages.middle, &r.life_stages.late] {
        println!(
            "{} ({}) {:.1}: {}",
            stage.label, stage.period, stage.score, stage.description
        );
    }
    println!();
    println!("career:   {}", r.career);
    if !r.personality.is_empty() {
        println!("traits:   {}", r.personality.join(", "));
    }
    if !r.cautions.is_empty() {
        println!("cautions: {}", r.cautions.join(", "));
    }
    println!("lucky:    {} / {}", r.lucky_number, r.lucky_color);
    println!();
    println!("{}", r.summary);
}

fn print_animal(m: &AnimalMatch) {
    match m.profile {
        Some(profile) => {
            println!("{} ({}%)", profile.name, m.match_percent);
            println!("{}", profile.description);
            if !profile.traits.is_empty() {
                println!("traits: {}", profile.traits.join(", "));
            }
        }
        None => println!("{} ({}%)", m.primary, m.match_percent),
    }
    let secondary = m
        .secondary
        .profile()
        .map_or_else(|| m.secondary.to_string(), |p| p.name.clone());
    println!("runner-up: {secondary}");
    println!();
    println!("eyes: {}", m.features.eyes);
    println!("face: {}", m.features.face_shape);
    println!("chin: {}", m.features.chin);
    println!("nose: {}", m.features.nose);
}
