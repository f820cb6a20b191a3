//! Screen flow: intro, play, game over, and the `GameState` that mirrors it.
//!
//! ## States
//!
//! | State      | Description                                        |
//! |------------|----------------------------------------------------|
//! | `Intro`    | Title, instructions and difficulty picker          |
//! | `Playing`  | A session is running; all gameplay systems active  |
//! | `GameOver` | Final score and the ten best scores on record      |
//!
//! Every screen change goes through [`MenuFlow::advance`], a pure function
//! that can be tested without an `App`.  [`sync_game_state`] then copies the
//! flow's screen into Bevy's [`GameState`], so `OnEnter`/`OnExit` schedules
//! and `in_state` run conditions work as usual.
//!
//! ## Systems (registered by `MenuPlugin`)
//!
//! | System                     | Schedule                   | Purpose                          |
//! |----------------------------|----------------------------|----------------------------------|
//! | `setup_intro`              | `OnEnter(Intro)`           | Spawn the intro screen           |
//! | `intro_button_system`      | `Update / in Intro`        | Difficulty, Play, Quit           |
//! | `highlight_difficulty`     | `Update / in Intro`        | Mark the selected difficulty     |
//! | `record_high_score`        | `OnEnter(GameOver)`        | Append the final score to disk   |
//! | `setup_game_over`          | `OnEnter(GameOver)`        | Spawn the end screen             |
//! | `game_over_button_system`  | `Update / in GameOver`     | Play again, Quit                 |
//! | `quit_on_escape`           | `Update`                   | Escape exits from any screen     |
//! | `sync_game_state`          | `Update`                   | Mirror `MenuFlow` into the state |

use bevy::prelude::*;

use crate::config::Difficulty;
use crate::constants::HIGH_SCORE_ROWS;
use crate::highscores::{HighScore, HighScoreStore};

mod common;
mod game_over;
mod intro;

use common::*;

// ── Game state ────────────────────────────────────────────────────────────────

/// Top-level application state machine.
///
/// Gameplay systems in [`crate::game::GamePlugin`] run under
/// `.run_if(in_state(GameState::Playing))`, so they are fully inactive while
/// a menu screen is displayed.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Title screen; shown on startup.
    #[default]
    Intro,
    /// A session is running.
    Playing,
    /// Final score and high-score table.
    GameOver,
}

// ── Menu flow ─────────────────────────────────────────────────────────────────

/// Input to [`MenuFlow::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    SelectDifficulty(Difficulty),
    Play,
    SessionFinished { score: i64 },
    PlayAgain,
    Quit,
}

/// Where the player is between sessions.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuFlow {
    pub screen: GameState,
    pub difficulty: Difficulty,
    /// Score of the last finished session.
    pub final_score: Option<i64>,
    pub exit_requested: bool,
}

impl MenuFlow {
    /// Apply `event`.  Events that make no sense on the current screen are
    /// ignored.
    pub fn advance(self, event: MenuEvent) -> MenuFlow {
        let mut next = self;
        match (self.screen, event) {
            (_, MenuEvent::Quit) => next.exit_requested = true,
            (GameState::Intro, MenuEvent::SelectDifficulty(difficulty)) => {
                next.difficulty = difficulty;
            }
            (GameState::Intro, MenuEvent::Play) => next.screen = GameState::Playing,
            (GameState::Playing, MenuEvent::SessionFinished { score }) => {
                next.screen = GameState::GameOver;
                next.final_score = Some(score);
            }
            (GameState::GameOver, MenuEvent::PlayAgain) => next.screen = GameState::Intro,
            _ => {}
        }
        next
    }
}

// ── Resources ─────────────────────────────────────────────────────────────────

/// The score store and the rows shown on the end screen.
#[derive(Resource, Debug, Clone, Default)]
pub struct HighScoreBoard {
    pub store: HighScoreStore,
    /// Best entries after the last recorded session.
    pub top: Vec<HighScore>,
}

// ── Component markers ─────────────────────────────────────────────────────────

/// Root node of the intro screen; despawned on `OnExit(Intro)`.
#[derive(Component)]
pub struct IntroRoot;

/// One of the three mutually exclusive difficulty toggles.
#[derive(Component)]
pub struct DifficultyButton(pub Difficulty);

/// Tags the "Play" button.
#[derive(Component)]
pub struct PlayButton;

/// Tags a "Quit" button on either screen.
#[derive(Component)]
pub struct QuitButton;

/// Root node of the end screen; despawned on `OnExit(GameOver)`.
#[derive(Component)]
pub struct GameOverRoot;

/// Tags the "Play again" button.
#[derive(Component)]
pub struct PlayAgainButton;

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Registers `GameState`, `MenuFlow`, both menu screens and the quit key.
///
/// This plugin must be added to the app **before** any plugin that calls
/// `.run_if(in_state(GameState::Playing))`, so the state is always registered
/// first.
pub struct MenuPlugin;

impl Plugin for MenuPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .init_resource::<MenuFlow>()
            .init_resource::<HighScoreBoard>()
            .add_systems(OnEnter(GameState::Intro), intro::setup_intro)
            .add_systems(OnExit(GameState::Intro), despawn_all::<IntroRoot>)
            .add_systems(
                Update,
                (intro::intro_button_system, intro::highlight_difficulty)
                    .chain()
                    .run_if(in_state(GameState::Intro)),
            )
            .add_systems(
                OnEnter(GameState::GameOver),
                (game_over::record_high_score, game_over::setup_game_over).chain(),
            )
            .add_systems(OnExit(GameState::GameOver), despawn_all::<GameOverRoot>)
            .add_systems(
                Update,
                game_over::game_over_button_system.run_if(in_state(GameState::GameOver)),
            )
            .add_systems(Update, (quit_on_escape, sync_game_state).chain());
    }
}

// ── Shared systems ────────────────────────────────────────────────────────────

/// Escape quits from any screen.
pub fn quit_on_escape(keys: Res<ButtonInput<KeyCode>>, mut flow: ResMut<MenuFlow>) {
    if keys.just_pressed(KeyCode::Escape) {
        *flow = flow.advance(MenuEvent::Quit);
    }
}

/// Copy the flow's screen into `GameState` and honour exit requests.
pub fn sync_game_state(
    flow: Res<MenuFlow>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: MessageWriter<AppExit>,
) {
    if flow.exit_requested {
        info!("Quit requested");
        exit.write(AppExit::Success);
        return;
    }
    if flow.screen != *state.get() {
        next_state.set(flow.screen);
    }
}

/// Recursively despawn every entity tagged `T`.
pub fn despawn_all<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flow_is_intro_on_medium() {
        let flow = MenuFlow::default();
        assert_eq!(flow.screen, GameState::Intro);
        assert_eq!(flow.difficulty, Difficulty::Medium);
        assert_eq!(flow.final_score, None);
        assert!(!flow.exit_requested);
    }

    #[test]
    fn difficulty_is_exclusive_and_last_choice_wins() {
        let flow = MenuFlow::default()
            .advance(MenuEvent::SelectDifficulty(Difficulty::Hard))
            .advance(MenuEvent::SelectDifficulty(Difficulty::Easy));
        assert_eq!(flow.difficulty, Difficulty::Easy);
        assert_eq!(flow.screen, GameState::Intro);
    }

    #[test]
    fn full_round_trip() {
        let flow = MenuFlow::default()
            .advance(MenuEvent::SelectDifficulty(Difficulty::Hard))
            .advance(MenuEvent::Play);
        assert_eq!(flow.screen, GameState::Playing);

        let flow = flow.advance(MenuEvent::SessionFinished { score: 1_250 });
        assert_eq!(flow.screen, GameState::GameOver);
        assert_eq!(flow.final_score, Some(1_250));

        let flow = flow.advance(MenuEvent::PlayAgain);
        assert_eq!(flow.screen, GameState::Intro);
        // The choice carries over to the next round.
        assert_eq!(flow.difficulty, Difficulty::Hard);
    }

    #[test]
    fn difficulty_cannot_change_mid_session() {
        let flow = MenuFlow::default()
            .advance(MenuEvent::Play)
            .advance(MenuEvent::SelectDifficulty(Difficulty::Easy));
        assert_eq!(flow.difficulty, Difficulty::Medium);
    }

    #[test]
    fn out_of_place_events_are_ignored() {
        let intro = MenuFlow::default();
        assert_eq!(intro.advance(MenuEvent::PlayAgain), intro);
        assert_eq!(intro.advance(MenuEvent::SessionFinished { score: 9 }), intro);

        let playing = intro.advance(MenuEvent::Play);
        assert_eq!(playing.advance(MenuEvent::Play), playing);
    }

    #[test]
    fn quit_is_honoured_everywhere() {
        let intro = MenuFlow::default();
        let playing = intro.advance(MenuEvent::Play);
        let over = playing.advance(MenuEvent::SessionFinished { score: 0 });
        for flow in [intro, playing, over] {
            let quit = flow.advance(MenuEvent::Quit);
            assert!(quit.exit_requested);
            assert_eq!(quit.screen, flow.screen);
        }
    }
}
