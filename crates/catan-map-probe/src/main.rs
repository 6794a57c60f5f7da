//! Headless driver for the Kopiatan map engine.
//!
//! Reads newline-delimited JSON commands from stdin and answers each with one
//! JSON report on stdout. Logs go to stderr.

use anyhow::Context;
use catan_map::config::DEFAULT_HEX_RADIUS;
use catan_map::layout::MIN_HEX_RADIUS;
use catan_map::{Board, BoardLayout, MapConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, BufRead, Write};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod rules;
mod script;
mod session;

use script::{ProbeCommand, ProbeReport};
use session::Session;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    // Board file from the first argument or env, otherwise a seeded standard board
    let board_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("PROBE_BOARD").ok());
    let layout: BoardLayout = match board_path {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading board file {}", path))?;
            serde_json::from_str(&json).with_context(|| format!("parsing board file {}", path))?
        }
        None => {
            let seed: u64 = std::env::var("PROBE_SEED")
                .unwrap_or_else(|_| "0".into())
                .parse()?;
            let mut rng = StdRng::seed_from_u64(seed);
            BoardLayout::standard_with_rng(&mut rng)
        }
    };
    let board = Board::from_layout(&layout)?;

    let hex_radius: i32 = std::env::var("PROBE_HEX_RADIUS")
        .unwrap_or_else(|_| DEFAULT_HEX_RADIUS.to_string())
        .parse()?;
    anyhow::ensure!(
        hex_radius > MIN_HEX_RADIUS,
        "PROBE_HEX_RADIUS must exceed {}",
        MIN_HEX_RADIUS
    );
    let config = MapConfig {
        hex_radius,
        ..MapConfig::default()
    };

    info!(
        hexes = board.hexes().count(),
        edges = board.edges().count(),
        nodes = board.nodes().count(),
        hex_radius,
        "Starting map probe..."
    );
    let mut session = Session::new(board, config);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (index, line) in stdin.lock().lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let report = match ProbeCommand::parse(&line, index + 1).and_then(|command| session.run(command)) {
            Ok(report) => report,
            Err(e) => {
                warn!("{}", e);
                ProbeReport::Error {
                    message: e.to_string(),
                }
            }
        };
        serde_json::to_writer(&mut out, &report)?;
        writeln!(out)?;
    }

    let built = session
        .board()
        .nodes()
        .filter(|node| node.building.owner().is_some())
        .count();
    info!(built, mode = ?session.map().mode(), "Probe input finished");
    Ok(())
}
