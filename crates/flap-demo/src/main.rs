#![forbid(unsafe_code)]

//! Terminal front-end for the flapboard engine.
//!
//! Wires a content source through the background worker into a board and
//! runs a fixed-rate frame loop: tick the board with measured `dt`, draw
//! the cell views, spend the rest of the frame budget waiting for input.
//! Flip cues stand in for the mechanical clack sounds as a counter on the
//! status line.

mod cli;
mod render;
mod session;

use std::env;
use std::error::Error;
use std::fs::File;
use std::io;
use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use flap_core::{Board, BoardConfig};
use flap_sources::{ClockSource, PageSource, SourceWorker, StaticPages, WeatherSource};
use tracing_subscriber::EnvFilter;

fn main() {
    let opts = cli::Opts::parse();
    init_logging();
    if let Err(err) = run(&opts) {
        eprintln!("flap-demo: {err}");
        process::exit(1);
    }
}

/// Install a file-backed tracing subscriber when `FLAP_DEMO_LOG` is set.
///
/// Stderr shares the terminal with the alternate screen, so logging is
/// off unless a file is given.
fn init_logging() {
    let Ok(path) = env::var("FLAP_DEMO_LOG") else {
        return;
    };
    match File::create(&path) {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .init();
        }
        Err(err) => eprintln!("flap-demo: cannot open log file {path}: {err}"),
    }
}

fn run(opts: &cli::Opts) -> Result<(), Box<dyn Error>> {
    let config = BoardConfig {
        seed: opts.seed,
        ..Default::default()
    };
    let mut board = Board::new(config)?;

    let mut source: Box<dyn PageSource> = match opts.source {
        cli::SourceKind::Static => Box::new(StaticPages::departures_demo()),
        cli::SourceKind::Clock => Box::new(ClockSource::new()),
        cli::SourceKind::Weather => Box::new(WeatherSource::new()),
    };
    // One synchronous fetch so startup is not a blank wall; failures fall
    // back to blanks until the worker delivers.
    if let Ok(pages) = source.next_pages() {
        board.set_pages_immediate(&pages);
    }
    let worker = SourceWorker::spawn(source, opts.fetch_period)?;
    board.set_feed(Box::new(worker.feed()));
    tracing::info!(source = ?opts.source, fps = opts.fps, "flapboard demo starting");

    let _session = session::TerminalGuard::enter()?;
    let mut out = io::stdout();
    let frame = Duration::from_secs_f64(1.0 / f64::from(opts.fps.max(1)));
    let mut last = Instant::now();
    let mut clacks: u64 = 0;

    loop {
        let frame_start = Instant::now();
        let dt = frame_start - last;
        last = frame_start;

        board.tick(dt);
        clacks += board.drain_flip_events().len() as u64;
        render::draw(&mut out, &board, clacks)?;

        // Burn the remaining frame budget on input.
        loop {
            let budget = frame.saturating_sub(frame_start.elapsed());
            if !event::poll(budget)? {
                break;
            }
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
                    KeyCode::Esc | KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(());
                    }
                    KeyCode::Char(' ') => board.toggle_now(),
                    KeyCode::Char('r') => board.refresh_now(),
                    _ => {}
                },
                _ => {}
            }
        }
    }
}
