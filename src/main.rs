mod colors;
mod config;
mod globe;
mod help;
mod hud;
mod motion;
mod settings;
mod terminal;

use clap::{Parser, Subcommand, ValueEnum};
use config::GlobeConfig;
use motion::MotionStore;
use settings::Settings;
use std::io;
use terminal::Terminal;

#[derive(Parser)]
#[command(name = "threatmap")]
#[command(author = "Securology")]
#[command(version = "0.1.0")]
#[command(about = "Terminal threat map: a rotating globe with live attack arcs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the interactive globe
    Globe {
        /// Animation speed (seconds per frame)
        #[arg(short, long, default_value = "0.033")]
        time: f32,

        /// Random seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,

        /// Maximum arcs kept on screen (1-64)
        #[arg(short = 'n', long)]
        max_arcs: Option<usize>,

        /// Start with the static backdrop (not saved)
        #[arg(short, long, conflicts_with = "animated")]
        reduced_motion: bool,

        /// Start animated even if reduced motion is preferred (not saved)
        #[arg(short, long)]
        animated: bool,
    },

    /// Print the scene at a point in time as JSON
    Frame {
        /// Scene time in seconds
        #[arg(long, default_value = "3.0", value_parser = parse_scene_time)]
        at: f64,

        /// Random seed for reproducibility
        #[arg(short, long, default_value = "1")]
        seed: u64,

        /// Maximum arcs kept on screen (1-64)
        #[arg(short = 'n', long)]
        max_arcs: Option<usize>,

        /// Indent the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Inspect or change the saved reduced-motion preference
    Motion {
        #[command(subcommand)]
        action: MotionAction,
    },
}

#[derive(Subcommand)]
enum MotionAction {
    /// Print the current preference
    Show,
    /// Flip the preference
    Toggle,
    /// Set the preference explicitly
    Set { value: Switch },
}

#[derive(Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
}

fn base_config(max_arcs: Option<usize>, seed: Option<u64>) -> GlobeConfig {
    let mut config = GlobeConfig::from_settings(&Settings::load().globe);
    if let Some(n) = max_arcs {
        config.max_arcs = n;
    }
    config.seed = seed;
    config.clamped()
}

fn parse_scene_time(s: &str) -> Result<f64, String> {
    let at: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if !(0.0..=globe::MAX_SCENE_TIME).contains(&at) {
        return Err(format!("must be between 0 and {} seconds", globe::MAX_SCENE_TIME));
    }
    Ok(at)
}

fn print_motion(store: &MotionStore) {
    let state = if store.reduced_motion() { "on" } else { "off" };
    println!("reduced-motion: {} ({})", state, store.path().display());
}

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Globe {
            time,
            seed,
            max_arcs,
            reduced_motion,
            animated,
        } => {
            let mut config = base_config(max_arcs, seed);
            config.time_step = time;
            let config = config.clamped();

            let mut store = MotionStore::open();
            let reduced = match (reduced_motion, animated) {
                (true, _) => true,
                (_, true) => false,
                _ => store.reduced_motion(),
            };

            let mut term = Terminal::new()?;
            globe::run(&mut term, config, &mut store, reduced)?;
        }
        Commands::Frame {
            at,
            seed,
            max_arcs,
            pretty,
        } => {
            let config = base_config(max_arcs, Some(seed));
            if let Some(frame) = globe::frame_at(config, at) {
                let json = if pretty {
                    serde_json::to_string_pretty(&frame)?
                } else {
                    serde_json::to_string(&frame)?
                };
                println!("{json}");
            }
        }
        Commands::Motion { action } => {
            let mut store = MotionStore::open();
            match action {
                MotionAction::Show => {}
                MotionAction::Toggle => {
                    store.toggle();
                }
                MotionAction::Set { value } => {
                    store.set(matches!(value, Switch::On));
                }
            }
            print_motion(&store);
        }
    }

    Ok(())
}
