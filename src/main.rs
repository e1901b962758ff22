//! Hippo Catch entry point
//!
//! Sets up the terminal, feeds key events into the app and drives it at a
//! fixed frame rate.

use std::io::{BufWriter, Stdout, stdout};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crossterm::{
    ExecutableCommand, cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal,
};

use hippo_catch::app::Input;
use hippo_catch::audio::AudioManager;
use hippo_catch::renderer::TerminalRenderer;
use hippo_catch::{App, Screen, Settings};

const FRAME: Duration = Duration::from_millis(33);

/// Terminals without key-release events: treat movement as released after
/// this much silence (longer than the OS key-repeat interval)
const IDLE_RELEASE: Duration = Duration::from_millis(150);

const DEFAULT_SETTINGS_PATH: &str = "hippo-catch.json";

type GameApp = App<AudioManager, TerminalRenderer<BufWriter<Stdout>>>;

/// What the loop should do after an event
enum Flow {
    Continue,
    Quit,
}

fn main() -> std::io::Result<()> {
    env_logger::init();
    log::info!("Hippo Catch starting...");

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SETTINGS_PATH.to_string());
    let settings = Settings::load(&path);
    let seed = settings.seed.unwrap_or_else(clock_seed);

    let mut audio = AudioManager::new();
    audio.set_sfx_enabled(settings.sound_effects);
    audio.set_music_enabled(settings.music);
    audio.set_muted(settings.muted);
    audio.set_master_volume(settings.master_volume);

    let mut out = stdout();
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release events; terminals without support fall back to IDLE_RELEASE
    let keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false)
        && out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();

    // Blocking event reads live on their own thread
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped, program exiting
            }
        }
    });

    let result = terminal::size().and_then(|(cols, rows)| {
        let renderer = TerminalRenderer::new(BufWriter::new(stdout()), cols, rows);
        let mut app = App::new(settings, seed, audio, renderer);
        run(&mut app, &rx, keyboard_enhanced)
    });

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    log::info!("Hippo Catch exiting");
    result
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn run(
    app: &mut GameApp,
    rx: &mpsc::Receiver<Event>,
    keyboard_enhanced: bool,
) -> std::io::Result<()> {
    let mut last_frame = Instant::now();
    let mut last_move: Option<Instant> = None;

    loop {
        let frame_start = Instant::now();

        while let Ok(ev) = rx.try_recv() {
            if let Flow::Quit = on_event(app, ev, &mut last_move) {
                return Ok(());
            }
        }

        if !keyboard_enhanced && last_move.is_some_and(|t| t.elapsed() >= IDLE_RELEASE) {
            app.handle(Input::ReleaseMovement);
            last_move = None;
        }

        let elapsed = last_frame.elapsed();
        last_frame = Instant::now();
        app.update(elapsed.as_millis().min(u128::from(u32::MAX)) as u32);

        let spent = frame_start.elapsed();
        if spent < FRAME {
            thread::sleep(FRAME - spent);
        }
    }
}

fn on_event(app: &mut GameApp, ev: Event, last_move: &mut Option<Instant>) -> Flow {
    let KeyEvent {
        code,
        kind,
        modifiers,
        ..
    } = match ev {
        Event::Key(key) => key,
        Event::Resize(cols, rows) => {
            app.renderer_mut().set_size(cols, rows);
            app.render();
            return Flow::Continue;
        }
        _ => return Flow::Continue,
    };

    let movement = match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Input::MoveLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Input::MoveRight),
        _ => None,
    };

    if kind == KeyEventKind::Release {
        if movement.is_some() {
            app.handle(Input::ReleaseMovement);
            *last_move = None;
        }
        return Flow::Continue;
    }

    if let Some(input) = movement {
        app.handle(input);
        *last_move = Some(Instant::now());
        return Flow::Continue;
    }

    // One-shot keys act on press only
    if kind != KeyEventKind::Press {
        return Flow::Continue;
    }
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Flow::Quit,
        KeyCode::Char('q') | KeyCode::Char('Q') => return Flow::Quit,
        KeyCode::Esc => match app.screen() {
            Screen::Home => return Flow::Quit,
            _ => app.handle(Input::ShowHome),
        },
        KeyCode::Enter | KeyCode::Char(' ') => app.handle(Input::StartGame),
        KeyCode::Char('h') | KeyCode::Char('H') => app.handle(Input::ShowHowToPlay),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('r') | KeyCode::Char('R') => {
            if app.is_finished() {
                app.handle(Input::StartGame);
            } else {
                app.handle(Input::RestartGame);
            }
        }
        _ => {}
    }
    Flow::Continue
}
