//! App driver
//!
//! Owns the current session and the outer collaborators. Turns real elapsed
//! time into fixed simulation ticks and input into commands; renders after
//! every tick and after every screen change.

use crate::audio::{AudioSink, Track};
use crate::consts::MAX_SUBSTEPS;
use crate::renderer::{Renderer, Snapshot, View};
use crate::settings::Settings;
use crate::sim::{Command, Session, tick};

/// Longest real-time step accepted per update (ms)
const MAX_FRAME_MS: u32 = 250;

/// Which screen is up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    HowToPlay,
    Playing,
}

/// Everything the front end can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    MoveLeft,
    MoveRight,
    ReleaseMovement,
    StartGame,
    RestartGame,
    ShowHowToPlay,
    ShowHome,
}

/// Game instance holding all state
pub struct App<A: AudioSink, R: Renderer> {
    settings: Settings,
    screen: Screen,
    session: Option<Session>,
    accumulator_ms: u32,
    /// Seed for the next session
    next_seed: u64,
    audio: A,
    renderer: R,
}

impl<A: AudioSink, R: Renderer> App<A, R> {
    pub fn new(settings: Settings, seed: u64, audio: A, renderer: R) -> Self {
        let mut app = Self {
            settings,
            screen: Screen::Home,
            session: None,
            accumulator_ms: 0,
            next_seed: seed,
            audio,
            renderer,
        };
        app.render();
        app
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// True while a finished session is on screen
    pub fn is_finished(&self) -> bool {
        self.screen == Screen::Playing && self.session.as_ref().is_some_and(Session::is_terminal)
    }

    /// Handle one input event
    pub fn handle(&mut self, input: Input) {
        match input {
            Input::MoveLeft => self.steer(Command::MoveLeft),
            Input::MoveRight => self.steer(Command::MoveRight),
            Input::ReleaseMovement => self.steer(Command::ReleaseMovement),
            Input::StartGame => {
                // Start from the menus, or a new game from the end screen
                if self.screen != Screen::Playing || self.is_finished() {
                    self.start_session();
                }
            }
            Input::RestartGame => {
                if self.screen == Screen::Playing {
                    self.start_session();
                }
            }
            Input::ShowHowToPlay => {
                if self.screen == Screen::Home {
                    self.screen = Screen::HowToPlay;
                }
            }
            Input::ShowHome => {
                if self.screen == Screen::HowToPlay || self.is_finished() {
                    self.session = None;
                    self.screen = Screen::Home;
                }
            }
        }
        self.render();
    }

    /// Advance by real elapsed time, running as many fixed ticks as are due.
    /// Returns the number of ticks run.
    pub fn update(&mut self, elapsed_ms: u32) -> u32 {
        let tick_ms = self.settings.tick_ms.max(1);
        let Some(session) = self.session.as_mut() else {
            return 0;
        };
        if self.screen != Screen::Playing || session.is_terminal() {
            self.accumulator_ms = 0;
            return 0;
        }

        self.accumulator_ms += elapsed_ms.min(MAX_FRAME_MS);
        let mut substeps = 0;
        while self.accumulator_ms >= tick_ms && substeps < MAX_SUBSTEPS {
            let Some(session) = self.session.as_mut() else {
                break;
            };
            tick(session, tick_ms, &mut self.audio);
            self.accumulator_ms -= tick_ms;
            substeps += 1;
            let finished = session.is_terminal();
            self.render();
            if finished {
                self.accumulator_ms = 0;
                break;
            }
        }
        // Capped: drop the backlog instead of carrying it into later frames
        if substeps == MAX_SUBSTEPS {
            self.accumulator_ms %= tick_ms;
        }
        substeps
    }

    fn steer(&mut self, command: Command) {
        if self.screen != Screen::Playing {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.command(command);
        }
    }

    /// Discard any current session and start a fresh one
    fn start_session(&mut self) {
        self.audio.stop_background();
        let seed = self.next_seed;
        self.next_seed = self.next_seed.wrapping_add(1);
        self.session = Some(Session::new(self.settings.session_config(), seed));
        self.accumulator_ms = 0;
        self.screen = Screen::Playing;
        self.audio.play_background(Track::Background);
    }

    /// Render the current frame
    pub fn render(&mut self) {
        let snapshot = match (&self.screen, &self.session) {
            (Screen::Playing, Some(session)) => Some(Snapshot::of(session)),
            _ => None,
        };
        let view = match (&self.screen, &snapshot) {
            (Screen::HowToPlay, _) => View::HowToPlay,
            (Screen::Playing, Some(snapshot)) => View::Game(snapshot),
            _ => View::Home,
        };
        if let Err(e) = self.renderer.render(view) {
            log::warn!("Render error: {:?}", e);
        }
    }
}
