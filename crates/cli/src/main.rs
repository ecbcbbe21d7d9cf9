//! gambitctl - operator CLI for the Gambit chess arm.
//!
//! The interesting machinery (mapping, encoding, choreography) lives in the
//! library crates; this binary opens the two serial links, wires Ctrl-C to
//! the cancellation token, and shovels operator input at the sequencer.

#![deny(clippy::unwrap_used)]

mod output;
mod repl;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

use gambit_board::PieceMove;
use gambit_config::GambitConfig;
use gambit_engine::MotionSequencer;
use gambit_link::{CancelToken, SerialChannel};

#[derive(Parser)]
#[command(name = "gambitctl")]
#[command(about = "Drive the Gambit chess arm: map squares, sequence piece transfers")]
#[command(version)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(
        long,
        global = true,
        env = "GAMBIT_CONFIG",
        default_value = "gambit.yaml"
    )]
    config: PathBuf,

    /// Print transfer reports as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive prompt: one move per line, q to quit
    Play,

    /// Execute a single move and exit
    Move {
        /// Move in square-pair notation, e.g. e2e4
        notation: String,
    },

    /// Parse and validate the configuration, then print a summary
    CheckConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = gambit_config::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    match cli.command {
        Commands::CheckConfig => {
            print_summary(&config);
            Ok(())
        }
        Commands::Move { notation } => {
            let mv: PieceMove = notation.parse()?;
            let cancel = install_cancel_handler()?;
            let mut seq = open_sequencer(&config, cancel)?;
            let report = seq.transfer(&mv)?;
            output::emit(&mut io::stdout(), &report, cli.json)
        }
        Commands::Play => {
            let cancel = install_cancel_handler()?;
            let mut seq = open_sequencer(&config, cancel.clone())?;
            let stdin = io::stdin();
            repl::run(
                stdin.lock(),
                &mut io::stdout(),
                &mut seq,
                &cancel,
                cli.json,
            )
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

/// Ctrl-C asks the sequencer to stop between steps instead of killing the
/// process mid-choreography.
fn install_cancel_handler() -> Result<CancelToken> {
    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        eprintln!("cancel requested, stopping after the current step");
        handler_token.cancel();
    })
    .context("installing Ctrl-C handler")?;
    Ok(cancel)
}

fn open_sequencer(
    config: &GambitConfig,
    cancel: CancelToken,
) -> Result<MotionSequencer<SerialChannel, SerialChannel>> {
    let arm = SerialChannel::open("arm", &config.arm.port, config.arm.baud)?;
    let gripper = SerialChannel::open("gripper", &config.gripper.port, config.gripper.baud)?;
    Ok(MotionSequencer::new(arm, gripper, config, cancel)?)
}

fn print_summary(config: &GambitConfig) {
    println!("arm:     {} @ {} baud", config.arm.port, config.arm.baud);
    println!(
        "gripper: {} @ {} baud (open {}, close {})",
        config.gripper.port,
        config.gripper.baud,
        config.gripper_drive.open_duty,
        config.gripper_drive.close_duty
    );
    println!(
        "board:   files {}-{}, rank-1 edge ({:.1}, {:.1}) to ({:.1}, {:.1})",
        config.board.file_min,
        config.board.file_max,
        config.board.min_file_edge.rank1.x,
        config.board.min_file_edge.rank1.y,
        config.board.max_file_edge.rank1.x,
        config.board.max_file_edge.rank1.y
    );
    println!(
        "motion:  travel {:.0} mm / Sp{}, contact {:.0} mm / Sp{}, lift Sp{}",
        config.motion.travel_height,
        config.motion.travel_speed,
        config.motion.contact_height,
        config.motion.approach_speed,
        config.motion.lift_speed
    );
    println!(
        "pacing:  {} ms ack window, {} ms poll, {} ms gripper settle",
        config.response.ack_timeout_ms,
        config.response.poll_interval_ms,
        config.response.gripper_settle_ms
    );
}
