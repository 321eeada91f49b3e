/// Game state machine.
///
/// `Game` owns the `World`, the RNG and the menu selections, decides which
/// inputs are accepted in which state, and only lets the world tick while a
/// match is being played.

use std::fmt;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::compute::{self, Mode, World};
use crate::config::Tuning;
use crate::entities::PlayerId;

pub const MENU_OPTIONS: [&str; 2] = ["Single Player", "Multiplayer"];
pub const PAUSE_OPTIONS: [&str; 3] = ["Resume", "Restart", "Exit to Menu"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Menu,
    SinglePlayer,
    Multiplayer,
    Paused,
    GameOver,
}

impl GameState {
    pub fn is_playing(self) -> bool {
        matches!(self, GameState::SinglePlayer | GameState::Multiplayer)
    }

    fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Single => GameState::SinglePlayer,
            Mode::Multi => GameState::Multiplayer,
        }
    }
}

/// Regular keys: player one's controls plus menu navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
}

/// Player two's dedicated keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpecialKey {
    Left,
    Right,
    Up,
    Down,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    Key(Key),
    Special(SpecialKey),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Winner {
    Red,
    Blue,
    Tie,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Winner::Red => "Red",
            Winner::Blue => "Blue",
            Winner::Tie => "Tie",
        };
        f.write_str(s)
    }
}

pub struct Game {
    pub state: GameState,
    pub world: World,
    pub winner: Option<Winner>,
    pub menu_selected: usize,
    pub pause_selected: usize,
    pub show_controls: bool,
    pub controls_timer: u32,
    tuning: Tuning,
    rng: StdRng,
}

impl Game {
    pub fn new(tuning: Tuning) -> Self {
        Self::with_rng(tuning, StdRng::from_entropy())
    }

    /// Deterministic game, for replays and tests.
    pub fn with_seed(tuning: Tuning, seed: u64) -> Self {
        Self::with_rng(tuning, StdRng::seed_from_u64(seed))
    }

    fn with_rng(tuning: Tuning, rng: StdRng) -> Self {
        Game {
            state: GameState::Menu,
            world: World::new(Mode::Single, tuning),
            winner: None,
            menu_selected: 0,
            pause_selected: 0,
            show_controls: false,
            controls_timer: 0,
            tuning,
            rng,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Start a fresh match, discarding whatever world was there.
    pub fn start(&mut self, mode: Mode) {
        let world = World::new(mode, self.tuning);
        self.world = compute::seed_initial_traffic(&world, &mut self.rng);
        self.state = GameState::for_mode(mode);
        self.winner = None;
        self.pause_selected = 0;
        self.show_controls = true;
        self.controls_timer = self.tuning.controls_overlay_ticks;
        info!(?mode, "game started");
    }

    /// One fixed-rate step. Does nothing outside a running match.
    pub fn tick(&mut self, dt: f32) {
        if !self.state.is_playing() {
            return;
        }
        if self.show_controls {
            self.controls_timer = self.controls_timer.saturating_sub(1);
            if self.controls_timer == 0 {
                self.show_controls = false;
            }
        }
        if self.check_game_over() {
            return;
        }
        self.world = compute::tick(&self.world, dt, &mut self.rng);
    }

    /// Moves to `GameOver` once the match is lost. In multiplayer both
    /// players have to be down; the higher score then wins.
    pub fn check_game_over(&mut self) -> bool {
        let over = match self.state {
            GameState::SinglePlayer => self.world.player.health == 0,
            GameState::Multiplayer => self.world.all_players_down(),
            _ => false,
        };
        if !over {
            return false;
        }

        if self.state == GameState::Multiplayer {
            let red = self.world.player.score;
            let blue = self.world.player2.as_ref().map_or(0, |p| p.score);
            let winner = match red.cmp(&blue) {
                std::cmp::Ordering::Greater => Winner::Red,
                std::cmp::Ordering::Less => Winner::Blue,
                std::cmp::Ordering::Equal => Winner::Tie,
            };
            self.winner = Some(winner);
            info!(red, blue, %winner, "game over");
        } else {
            info!(score = self.world.player.score, "game over");
        }
        self.state = GameState::GameOver;
        true
    }

    pub fn handle(&mut self, input: Input) {
        match input {
            Input::Key(key) => self.on_key(key),
            Input::Special(key) => self.on_special_key(key),
        }
    }

    pub fn on_key(&mut self, key: Key) {
        let key = match key {
            Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
            other => other,
        };
        match self.state {
            GameState::Menu => self.menu_key(key),
            GameState::Paused => self.pause_key(key),
            GameState::GameOver => {
                if key == Key::Enter {
                    self.state = GameState::Menu;
                }
            }
            GameState::SinglePlayer | GameState::Multiplayer => self.play_key(key),
        }
    }

    /// Player two's controls; ignored unless a multiplayer match is running.
    pub fn on_special_key(&mut self, key: SpecialKey) {
        if self.state != GameState::Multiplayer {
            return;
        }
        if self.dismiss_controls() {
            return;
        }
        let id = PlayerId::Two;
        self.world = match key {
            SpecialKey::Left => compute::move_player_lane(&self.world, id, -1),
            SpecialKey::Right => compute::move_player_lane(&self.world, id, 1),
            SpecialKey::Up => compute::move_player_up(&self.world, id),
            SpecialKey::Down => compute::move_player_down(&self.world, id),
            SpecialKey::End => compute::player_shoot(&self.world, id),
        };
    }

    fn menu_key(&mut self, key: Key) {
        match key {
            Key::Enter => {
                let mode = if self.menu_selected == 1 { Mode::Multi } else { Mode::Single };
                self.start(mode);
            }
            Key::Char('w') => self.menu_selected = step_back(self.menu_selected, MENU_OPTIONS.len()),
            Key::Char('s') => self.menu_selected = (self.menu_selected + 1) % MENU_OPTIONS.len(),
            _ => {}
        }
    }

    fn pause_key(&mut self, key: Key) {
        match key {
            Key::Char('p') => self.resume(),
            Key::Enter => match self.pause_selected {
                0 => self.resume(),
                1 => {
                    info!("restart");
                    self.start(self.world.mode);
                }
                _ => {
                    info!("exit to menu");
                    self.state = GameState::Menu;
                }
            },
            Key::Char('w') => {
                self.pause_selected = step_back(self.pause_selected, PAUSE_OPTIONS.len())
            }
            Key::Char('s') => self.pause_selected = (self.pause_selected + 1) % PAUSE_OPTIONS.len(),
            _ => {}
        }
    }

    /// The first key after a start only clears the controls overlay.
    fn dismiss_controls(&mut self) -> bool {
        if !self.show_controls {
            return false;
        }
        self.show_controls = false;
        self.controls_timer = 0;
        true
    }

    fn resume(&mut self) {
        self.state = GameState::for_mode(self.world.mode);
        info!("resumed");
    }

    fn play_key(&mut self, key: Key) {
        if self.dismiss_controls() {
            return;
        }
        let id = PlayerId::One;
        match key {
            Key::Char('p') => {
                self.state = GameState::Paused;
                self.pause_selected = 0;
                info!("paused");
            }
            Key::Char('a') => self.world = compute::move_player_lane(&self.world, id, -1),
            Key::Char('d') => self.world = compute::move_player_lane(&self.world, id, 1),
            Key::Char('w') => self.world = compute::move_player_up(&self.world, id),
            Key::Char('s') => self.world = compute::move_player_down(&self.world, id),
            Key::Char(' ') => self.world = compute::player_shoot(&self.world, id),
            _ => {}
        }
    }
}

fn step_back(selected: usize, len: usize) -> usize {
    (selected + len - 1) % len
}
