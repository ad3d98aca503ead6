use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::*;

/// What a plain tap does.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    #[default]
    Reveal,
    Mark,
}

impl InteractionMode {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Reveal => Self::Mark,
            Self::Mark => Self::Reveal,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TapOutcome {
    Reveal(RevealOutcome),
    Mark(MarkOutcome),
}

impl TapOutcome {
    pub fn has_update(&self) -> bool {
        match self {
            Self::Reveal(outcome) => outcome.has_update(),
            Self::Mark(outcome) => outcome.has_update(),
        }
    }
}

/// One player's game: the current board plus the input mode, the command
/// surface a front end talks to.
#[derive(Clone, Debug)]
pub struct Session {
    board: Board,
    config: GameConfig,
    mode: InteractionMode,
    seed: u64,
}

impl Session {
    /// Starts a game. Without a seed one is drawn from the thread rng; it is
    /// logged and kept so the board can be recreated.
    pub fn new(config: GameConfig, seed: Option<u64>) -> Result<Self> {
        let (board, seed) = Self::build_board(config, seed)?;
        Ok(Self {
            board,
            config,
            mode: InteractionMode::default(),
            seed,
        })
    }

    fn build_board(config: GameConfig, seed: Option<u64>) -> Result<(Board, u64)> {
        config.validate()?;
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        log::debug!(
            "New {}x{} {} board, seed: {}",
            config.size,
            config.size,
            config.difficulty,
            seed
        );

        let mut rng = StdRng::seed_from_u64(seed);
        let board = Board::generate(config.size, config.mine_count(), &mut rng)?;
        Ok((board, seed))
    }

    /// Replaces the board, with `config` if given or the current one otherwise.
    /// The interaction mode carries over. On error nothing changes.
    pub fn reset(&mut self, config: Option<GameConfig>, seed: Option<u64>) -> Result<()> {
        let config = config.unwrap_or(self.config);
        let (board, seed) = Self::build_board(config, seed)?;
        self.board = board;
        self.config = config;
        self.seed = seed;
        Ok(())
    }

    /// Same configuration, new random board.
    pub fn restart(&mut self) -> Result<()> {
        self.reset(None, None)
    }

    pub fn tap(&mut self, coords: Coord2) -> Result<TapOutcome> {
        match self.mode {
            InteractionMode::Reveal => self.reveal(coords).map(TapOutcome::Reveal),
            InteractionMode::Mark => self.toggle_mark(coords).map(TapOutcome::Mark),
        }
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        self.board.reveal(coords)
    }

    pub fn toggle_mark(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        self.board.toggle_mark(coords)
    }

    pub fn query_cell(&self, coords: Coord2) -> Result<CellView> {
        self.board.cell(coords)
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: InteractionMode) {
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) -> InteractionMode {
        self.mode = self.mode.toggled();
        log::debug!("Interaction mode: {:?}", self.mode);
        self.mode
    }

    pub fn state(&self) -> GameState {
        self.board.state()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::from_board(&self.board)
    }
}
