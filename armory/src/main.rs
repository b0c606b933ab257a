//! armory - inspect item catalogs and roll dice

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use armory::items::format_amount;
use armory::{parse_dice, ArmoryConfig, Catalog, CharacterClass, Item, ItemType, LoadReport};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Item catalog checker and dice roller
#[derive(Parser, Debug)]
#[command(name = "armory", version, about = "Load item catalogs and roll dice")]
struct Args {
    /// Configuration file (defaults to ./armory.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a catalog and report every diagnostic
    Check {
        file: PathBuf,
        /// Print diagnostics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a single item
    Show {
        file: PathBuf,
        key: String,
        #[arg(long)]
        json: bool,
    },
    /// List items, optionally filtered
    List {
        file: PathBuf,
        /// Only items of this type (weapon, armor, potion, ...)
        #[arg(long = "type")]
        item_type: Option<String>,
        /// Only items this class may use
        #[arg(long)]
        class: Option<String>,
    },
    /// Roll a dice expression such as 2d6+3
    Roll {
        expression: String,
        #[arg(short = 'n', long, default_value_t = 1)]
        times: u32,
        /// Seed for reproducible rolls
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.config {
        if !path.exists() {
            bail!("Config file not found: {}", path.display());
        }
    }
    let config =
        ArmoryConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.log_filter.clone().into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    match args.command {
        Command::Check { file, json } => check(&config, file, json),
        Command::Show { file, key, json } => show(&config, file, &key, json),
        Command::List {
            file,
            item_type,
            class,
        } => list(&config, file, item_type, class),
        Command::Roll {
            expression,
            times,
            seed,
        } => roll(&expression, times, seed.or(config.seed)),
    }
}

fn load(config: &ArmoryConfig, file: &Path) -> Result<LoadReport> {
    let report = Catalog::load_path(file, &config.loader)?;
    info!(
        "Loaded {} items from {} ({} diagnostics)",
        report.catalog.len(),
        file.display(),
        report.diagnostics.len()
    );
    Ok(report)
}

fn check(config: &ArmoryConfig, file: PathBuf, json: bool) -> Result<()> {
    let report = load(config, &file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report.diagnostics)?);
    } else {
        println!("{}: {} items", file.display(), report.catalog.len());
        for diagnostic in &report.diagnostics {
            println!("  {}", diagnostic);
        }
    }

    let failed = report.failed_records().count();
    if failed > 0 {
        bail!("{} record(s) could not be built", failed);
    }
    Ok(())
}

fn show(config: &ArmoryConfig, file: PathBuf, key: &str, json: bool) -> Result<()> {
    let report = load(config, &file)?;
    let item = report.catalog.get(key)?;

    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
        return Ok(());
    }

    println!("{} ({})", item.title(), item.key());
    println!("  type:        {}", item.item_type());
    if let Some(damage) = item.damage() {
        println!("  damage:      {}", damage);
    }
    if let Some(bonus) = item.attack_bonus() {
        println!("  attack:      {:+}", bonus);
    }
    if let Some(bonus) = item.armor_bonus() {
        println!("  armor:       +{}", bonus);
    }
    if let Some(hp) = item.hit_points_recovered() {
        println!("  heals hp:    {}", hp);
    }
    if let Some(mp) = item.mana_points_recovered() {
        println!("  heals mp:    {}", mp);
    }
    println!("  value:       {}", format_amount(item.value()));
    println!("  weight:      {}", format_amount(item.weight()));
    println!("  usable by:   {}", usable_by(item));
    println!("  {}", item.description());
    Ok(())
}

fn list(
    config: &ArmoryConfig,
    file: PathBuf,
    item_type: Option<String>,
    class: Option<String>,
) -> Result<()> {
    let item_type = item_type
        .map(|t| t.parse::<ItemType>().map_err(|_| anyhow::anyhow!("Unknown item type: {}", t)))
        .transpose()?;
    let class = class
        .map(|c| {
            c.parse::<CharacterClass>()
                .map_err(|_| anyhow::anyhow!("Unknown character class: {}", c))
        })
        .transpose()?;

    let report = load(config, &file)?;
    let matching = report.catalog.filter(|item| {
        item_type.map_or(true, |t| item.item_type() == t)
            && class.map_or(true, |c| item.can_use(c))
    });

    for item in matching {
        println!(
            "{:<24} {:<8} {:>8} {}",
            item.key(),
            item.item_type(),
            format_amount(item.value()),
            item.title()
        );
    }
    Ok(())
}

fn roll(expression: &str, times: u32, seed: Option<u64>) -> Result<()> {
    let dice = parse_dice(expression)?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    for _ in 0..times {
        let (rolls, total) = dice.roll_detailed(&mut rng);
        println!("{} = {} {:?}", dice, total, rolls);
    }
    Ok(())
}

fn usable_by(item: &Item) -> String {
    if item.usable_by().is_empty() {
        return "-".to_string();
    }
    item.usable_by()
        .iter()
        .map(CharacterClass::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
