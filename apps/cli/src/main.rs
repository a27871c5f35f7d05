#![deny(warnings)]

//! Headless CLI for creating, inspecting and converting factory profiles.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use factory_core::{
    convert, to_per_second, validation_report, Decimal, GameProfile, Rate, UnitRate,
    DEFAULT_GAME_NAME,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "factory-cli",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_SHA"), ")"),
    about = "Create, inspect and convert factory game profiles"
)]
struct Cli {
    /// Profile document to operate on [default: ./profiles/profile.json]
    #[arg(long, global = true, env = "FACTORY_PROFILE")]
    profile: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a fresh profile unless one already exists
    Init {
        #[arg(long, default_value = DEFAULT_GAME_NAME)]
        name: String,
        #[arg(long, default_value = "PerMinute")]
        unit: UnitRate,
        /// Overwrite an existing profile
        #[arg(long)]
        force: bool,
    },
    /// Summarize the stored profile
    Show,
    /// Convert a rate between time bases
    Convert {
        quantity: Decimal,
        from: UnitRate,
        to: UnitRate,
    },
    /// Check ids, kinds, references and signs
    Validate,
    /// Convert every stored quantity to another time base and save
    Rescale { unit: UnitRate },
    /// Print the JSON document (defaults if nothing is stored)
    Preview,
}

impl Cli {
    fn profile_path(&self) -> PathBuf {
        self.profile
            .clone()
            .unwrap_or_else(persistence::default_profile_path)
    }
}

fn require(path: &Path) -> Result<GameProfile> {
    match persistence::load(path).with_context(|| format!("loading {}", path.display()))? {
        Some(profile) => Ok(profile),
        None => bail!("no profile at {}; run `init` first", path.display()),
    }
}

fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let path = cli.profile_path();
    match cli.command {
        Command::Init { name, unit, force } => {
            if !force && persistence::load(&path)?.is_some() {
                writeln!(out, "profile already exists at {}", path.display())?;
                return Ok(());
            }
            let profile = GameProfile::new(name).with_unit_rate(unit);
            persistence::save(&profile, &path)
                .with_context(|| format!("saving {}", path.display()))?;
            info!(path = %path.display(), game = %profile.game_name, "profile initialized");
            writeln!(out, "wrote {}", path.display())?;
        }
        Command::Show => match persistence::load(&path)? {
            None => writeln!(out, "no profile at {}", path.display())?,
            Some(p) => {
                writeln!(out, "{} (v{}) | unit: {}", p.game_name, p.version, p.unit_rate)?;
                writeln!(
                    out,
                    "items: {} | machines: {} | recipes: {} | transports: {} | targets: {}",
                    p.items.len(),
                    p.machines.len(),
                    p.recipes.len(),
                    p.transports.len(),
                    p.desired_outputs.len()
                )?;
                for target in &p.desired_outputs {
                    let name = p
                        .item(&target.item_id)
                        .map(|i| i.name.as_str())
                        .unwrap_or("<unknown item>");
                    let per_second = to_per_second(target.quantity, p.unit_rate)?;
                    writeln!(
                        out,
                        "  target {name}: {} ({}/s)",
                        Rate::new(target.quantity, p.unit_rate),
                        per_second.normalize()
                    )?;
                }
            }
        },
        Command::Convert { quantity, from, to } => {
            let converted = convert(quantity, from, to)?;
            writeln!(
                out,
                "{} = {}",
                Rate::new(quantity, from),
                Rate::new(converted, to)
            )?;
        }
        Command::Validate => {
            let profile = require(&path)?;
            let report = validation_report(&profile);
            if report.is_empty() {
                writeln!(out, "ok: {}", profile.game_name)?;
            } else {
                for violation in &report {
                    writeln!(out, "- {violation}")?;
                }
                bail!("{} violation(s) in {}", report.len(), path.display());
            }
        }
        Command::Rescale { unit } => {
            let profile = require(&path)?;
            let from = profile.unit_rate;
            let rescaled = profile
                .rescaled_to(unit)
                .with_context(|| format!("rescaling {from} to {unit}"))?;
            persistence::save(&rescaled, &path)
                .with_context(|| format!("saving {}", path.display()))?;
            info!(%from, to = %unit, "profile rescaled");
            writeln!(out, "rescaled {from} -> {unit}")?;
        }
        Command::Preview => {
            let profile = persistence::load_or_default(&path, GameProfile::default)?;
            writeln!(out, "{}", persistence::serialize(&profile)?)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Logging setup; stdout is reserved for command output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!(command = ?cli.command, "starting CLI");
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)
}
