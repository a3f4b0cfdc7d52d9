//! L-System Walker
//!
//! CLI commands:
//! - generate: Print the generated string
//! - geometry: Export turtle geometry as JSON
//! - list: List built-in and configured presets
//! - check: Validate a rule file
//! - replay: Apply a sequence of configurations through one session

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use lsystem_walker::config::{self, Config, Settings};
use lsystem_walker::lsystem::{pad, parse_rules};
use lsystem_walker::{log_error, logging, Preset, Session, TurtleConfig};

#[derive(Parser)]
#[command(name = "lsystem_walker")]
#[command(about = "Parametric L-systems rendered as 3D turtle walks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to lsystems.yaml config
    #[arg(short, long, default_value = "lsystems.yaml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the generated string
    Generate {
        #[command(flatten)]
        system: SystemArgs,

        /// Print every generation, not just the last
        #[arg(long)]
        all: bool,
    },

    /// Export turtle geometry as JSON
    Geometry {
        #[command(flatten)]
        system: SystemArgs,

        /// Output file (default: <output dir>/geometry.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write JSON to stdout instead of a file
        #[arg(long)]
        stdout: bool,

        /// Length of one forward step
        #[arg(long, default_value = "1.0")]
        step_length: f32,
    },

    /// List built-in and configured presets
    List,

    /// Validate a rule file (one 'predecessor => successor' per line)
    Check {
        file: PathBuf,
    },

    /// Apply a YAML list of configurations in order
    Replay {
        script: PathBuf,
    },
}

/// Which L-system to run; explicit options override the preset
#[derive(Args)]
struct SystemArgs {
    /// Built-in or configured preset name
    #[arg(short, long)]
    preset: Option<String>,

    /// Generation-0 string
    #[arg(long)]
    axiom: Option<String>,

    /// Rule as 'predecessor => successor' (repeatable)
    #[arg(short, long = "rule")]
    rules: Vec<String>,

    /// File with one rule per line
    #[arg(long)]
    rules_file: Option<PathBuf>,

    /// Turn angle in degrees
    #[arg(long)]
    angle: Option<f64>,

    /// Number of rewrite steps
    #[arg(short, long)]
    steps: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let settings = Settings::load();

    // Initialize logging first
    logging::init_logging(&settings.log_dir)?;
    tracing::info!("L-System Walker starting up");

    let cli = Cli::parse();
    tracing::debug!("CLI args parsed: config={:?}", cli.config);

    let config = if cli.config.exists() {
        tracing::info!("Loading config from {:?}", cli.config);
        Config::load(&cli.config)?
    } else {
        tracing::warn!("Config file not found: {:?}, using defaults", cli.config);
        Config::default()
    };
    tracing::info!(
        "Config loaded: {} presets, max step count {}",
        config.presets.len(),
        config.max_step_count
    );

    match cli.command {
        Commands::Generate { system, all } => {
            let session = build_session(&config, &system, TurtleConfig::default())?;
            print_generations(&session, all);
        }

        Commands::Geometry {
            system,
            output,
            stdout,
            step_length,
        } => {
            let turtle = TurtleConfig::default().with_step_length(step_length);
            let session = build_session(&config, &system, turtle)?;
            let output = output.unwrap_or_else(|| Path::new(&settings.output_dir).join("geometry.json"));
            export_geometry(&session, (!stdout).then_some(output.as_path()))?;
        }

        Commands::List => {
            list_presets(&config);
        }

        Commands::Check { file } => {
            check_rules(&file)?;
        }

        Commands::Replay { script } => {
            replay(&config, &script)?;
        }
    }

    Ok(())
}

/// Resolve the requested system and apply it to a fresh session
fn build_session(config: &Config, args: &SystemArgs, turtle: TurtleConfig) -> anyhow::Result<Session> {
    let mut session = Session::from_config(config).with_turtle(turtle);

    if let Some(name) = &args.preset {
        session.load_preset(config, name).map_err(|e| {
            log_error!(e, preset = %name);
            e
        })?;
    }

    if let Some(axiom) = &args.axiom {
        session.set_axiom(axiom);
    }

    if !args.rules.is_empty() || args.rules_file.is_some() {
        let mut lines = args.rules.clone();
        if let Some(path) = &args.rules_file {
            lines.push(std::fs::read_to_string(path)?);
        }
        session.set_rules_text(&lines.join("\n"));
    }

    if let Some(angle) = args.angle {
        session.set_angle(angle);
    }

    if let Some(steps) = args.steps {
        session.set_step_count(steps);
    }

    session.apply().map_err(|e| {
        log_error!(e);
        e
    })?;

    Ok(session)
}

fn print_generations(session: &Session, all: bool) {
    let system = session.system();
    if all {
        for (i, generation) in system.results().iter().enumerate() {
            println!("{}: {}", i, generation);
        }
    } else {
        println!("{}", system.result());
    }
}

/// Write geometry JSON to `output`, or stdout when `None`
fn export_geometry(session: &Session, output: Option<&Path>) -> anyhow::Result<()> {
    let system = session.system();
    let geometry = session.geometry();

    let data = serde_json::json!({
        "axiom": system.axiom(),
        "rules": system.rules(),
        "angle": system.angle(),
        "step_count": system.step_count(),
        "generated": chrono::Local::now().to_rfc3339(),
        "max_y": geometry.max_y(),
        "vertex_count": geometry.vertex_count(),
        "unmatched_pops": geometry.unmatched_pops,
        "bounds": geometry.bounds,
        "segments": geometry.segments,
    });

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, serde_json::to_string_pretty(&data)?)?;
            println!(
                "{} segments ({} symbols) -> {:?}",
                geometry.segments.len(),
                system.result().len(),
                path
            );
        }
        None => println!("{}", serde_json::to_string_pretty(&data)?),
    }

    Ok(())
}

fn list_presets(config: &Config) {
    let width = Preset::ALL
        .iter()
        .map(|p| p.name().len())
        .chain(config.presets.iter().map(|p| p.name.len()))
        .max()
        .unwrap_or(0)
        + 2;

    println!("## Built-in ({})", Preset::ALL.len());
    for preset in Preset::ALL {
        println!("  {}{}", pad(preset.name(), width), preset.description());
    }

    if !config.presets.is_empty() {
        println!();
        println!("## Configured ({})", config.presets.len());
        for preset in &config.presets {
            println!("  {}{}", pad(&preset.name, width), preset.description);
        }
    }
}

fn check_rules(file: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)?;
    match parse_rules(&text) {
        Ok(rules) => {
            println!("{:?}: {} rules OK", file, rules.len());
            for rule in &rules {
                println!("  {}", rule);
            }
            Ok(())
        }
        Err(e) => {
            log_error!(e, file = ?file);
            Err(e.into())
        }
    }
}

fn replay(config: &Config, script: &Path) -> anyhow::Result<()> {
    let states = config::load_script(script)?;
    let mut session = Session::from_config(config);
    println!(
        "Replaying {} configurations from {:?} (max step count {})",
        states.len(),
        script,
        session.max_step_count()
    );

    for (i, (state, outcome)) in states.iter().zip(session.replay(&states)).enumerate() {
        match outcome {
            Ok(outcome) => println!("  [{}] {} x{}: {:?}", i + 1, state.axiom, state.step_count, outcome),
            Err(e) => println!("  [{}] rejected: {}", i + 1, e),
        }
    }

    let system = session.system();
    println!("Final: step {} ({} symbols)", system.step_count(), system.result().len());
    Ok(())
}
