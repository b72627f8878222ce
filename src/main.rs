mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use env_logger::{Builder, Env, Target};
use glam::Vec2;
use log::{info, warn};
use rand::thread_rng;

use wave_survival::compute::{init_state, move_player, player_shoot, tick, upgrade_stat};
use wave_survival::config::SimConfig;
use wave_survival::entities::{GameState, GameStatus};
use wave_survival::geometry::BlockLevel;
use wave_survival::stats::StatKind;

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

/// Side of one wall tile in world units.
const TILE: f32 = 50.0;

/// Built-in 1000×500 arena.
const ARENA: [&str; 10] = [
    "####################",
    "#..................#",
    "#...##........##...#",
    "#...##........##...#",
    "#........P.........#",
    "#..................#",
    "#...##........##...#",
    "#...##........##...#",
    "#..................#",
    "####################",
];

// ── Held-key input ────────────────────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events.
const HOLD_WINDOW: u64 = 8;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

/// Movement direction from the held keys, y up.
fn input_axis(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> Vec2 {
    let left = any_held(
        key_frame,
        &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
        frame,
    );
    let right = any_held(
        key_frame,
        &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
        frame,
    );
    let up = any_held(
        key_frame,
        &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')],
        frame,
    );
    let down = any_held(
        key_frame,
        &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')],
        frame,
    );
    Vec2::new(
        f32::from(u8::from(right)) - f32::from(u8::from(left)),
        f32::from(u8::from(up)) - f32::from(u8::from(down)),
    )
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum LoopExit {
    Quit,
    Restart,
}

/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key.  Each frame we check which keys are
/// still fresh and apply all their effects together, so movement and Space
/// can be held at the same time.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    level: &BlockLevel,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<LoopExit> {
    let mut rng = thread_rng();
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut panel_open = false;
    let mut frame: u64 = 0;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        let dt = frame_start.duration_since(last).as_secs_f32().min(0.1);
        last = frame_start;
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent {
            code,
            kind,
            modifiers,
            ..
        })) = rx.try_recv()
        {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(LoopExit::Quit);
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(LoopExit::Quit);
                        }
                        KeyCode::Char('r') | KeyCode::Char('R')
                            if state.status == GameStatus::GameOver =>
                        {
                            return Ok(LoopExit::Restart);
                        }
                        KeyCode::Tab => panel_open = !panel_open,
                        KeyCode::Char(c @ '1'..='7') if panel_open => {
                            let idx = c as usize - '1' as usize;
                            let name = StatKind::ALL[idx].name();
                            match upgrade_stat(state, name) {
                                Ok(next) => *state = next,
                                Err(e) => info!("upgrade declined: {}", e),
                            }
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Apply held-key actions every frame ────────────────────────────────
        if state.status != GameStatus::GameOver {
            let axis = input_axis(&key_frame, frame);
            if axis != Vec2::ZERO {
                *state = move_player(state, axis, dt, level);
            }
            if is_held(&key_frame, &KeyCode::Char(' '), frame) {
                *state = player_shoot(state);
            }
        }

        *state = tick(state, level, dt, &mut rng);

        display::render(out, state, level, panel_open)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Log to a file so records don't tear up the alternate screen.
fn init_logging() -> Result<PathBuf> {
    let path = std::env::temp_dir().join("wave_survival.log");
    let file = File::create(&path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(path)
}

fn load_config() -> Result<SimConfig> {
    match std::env::args_os().nth(1) {
        Some(arg) => {
            let path = PathBuf::from(arg);
            let cfg = SimConfig::load(&path)
                .with_context(|| format!("loading tuning file {}", path.display()))?;
            info!("tuning loaded from {}", path.display());
            Ok(cfg)
        }
        None => Ok(SimConfig::default()),
    }
}

fn main() -> Result<()> {
    let log_path = init_logging()?;
    let config = load_config()?;
    let level = BlockLevel::from_rows(&ARENA, TILE).context("building arena")?;
    info!("logging to {}", log_path.display());

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Terminals without the kitty protocol fall back to held-key expiry.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();
    if !keyboard_enhanced {
        warn!("terminal reports no key releases; using hold window");
    }

    // Dedicate a thread exclusively to blocking event reads.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &config, &level, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.context("terminal I/O failed")
}

fn run<W: Write>(
    out: &mut W,
    config: &SimConfig,
    level: &BlockLevel,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut rng = thread_rng();
    loop {
        let mut state = init_state(config.clone(), level, level.player_start(), &mut rng);
        match game_loop(out, &mut state, level, rx)? {
            LoopExit::Quit => break,
            LoopExit::Restart => info!("restarting"),
        }
    }
    Ok(())
}
