mod display;

use std::fs::OpenOptions;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};

use car_destroyer::config::Tuning;
use car_destroyer::game::{Game, Input, Key, SpecialKey};
use car_destroyer::scene::Canvas;

#[derive(Parser)]
#[command(name = "car_destroyer")]
#[command(about = "Two-way highway shooter for the terminal")]
struct Args {
    /// TOML file overriding gameplay tuning
    #[arg(long)]
    config: Option<PathBuf>,

    /// Append logs to this file (the terminal itself is in use)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Seed the RNG for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Start with multiplayer selected in the menu
    #[arg(long)]
    multiplayer: bool,
}

fn init_tracing(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed opening log file {}", path.display()))?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
    Ok(())
}

// ── Input mapping ─────────────────────────────────────────────────────────────

enum Command {
    Game(Input),
    Quit,
}

fn map_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Command> {
    let input = match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            return Some(Command::Quit);
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Some(Command::Quit),
        KeyCode::Enter => Input::Key(Key::Enter),
        KeyCode::Char(c) => Input::Key(Key::Char(c)),
        KeyCode::Left => Input::Special(SpecialKey::Left),
        KeyCode::Right => Input::Special(SpecialKey::Right),
        KeyCode::Up => Input::Special(SpecialKey::Up),
        KeyCode::Down => Input::Special(SpecialKey::Down),
        KeyCode::End => Input::Special(SpecialKey::End),
        _ => return None,
    };
    Some(Command::Game(input))
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Every press or repeat is handed to the game as soon as it is drained
/// from the channel, in arrival order; releases are ignored. One tick and
/// one render happen per frame, with Δt measured from the previous frame.
fn game_loop<W: Write>(out: &mut W, game: &mut Game, rx: &mpsc::Receiver<Event>) -> Result<()> {
    let frame = Duration::from_secs_f64(1.0 / game.tuning().tick_rate as f64);
    let mut canvas = Canvas::new(0, 0);
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            if kind == KeyEventKind::Release {
                continue;
            }
            match map_key(code, modifiers) {
                Some(Command::Quit) => return Ok(()),
                Some(Command::Game(input)) => game.handle(input),
                None => {}
            }
        }

        let dt = frame_start.duration_since(last).as_secs_f32();
        last = frame_start;
        game.tick(dt);

        let (width, height) = terminal::size().context("failed reading terminal size")?;
        display::render(out, game, &mut canvas, width, height).context("failed drawing frame")?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_tracing(path)?;
    }

    let tuning = match &args.config {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("failed loading tuning {}", path.display()))?,
        None => Tuning::default(),
    };
    let mut game = match args.seed {
        Some(seed) => Game::with_seed(tuning, seed),
        None => Game::new(tuning),
    };
    if args.multiplayer {
        game.menu_selected = 1;
    }
    tracing::info!(?tuning, seed = ?args.seed, "starting");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Ask for press/repeat/release kinds; terminals without support still
    // deliver presses.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = game_loop(&mut out, &mut game, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        tracing::error!(error = %e, "exiting on error");
    }
    result
}
