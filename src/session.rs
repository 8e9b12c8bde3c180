//! Player-versus-AI match: two boards, the turn cycle and the counters used
//! for records at game over.

use std::collections::HashSet;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::board::Board;
use crate::common::{AttackOutcome, BoardError};
use crate::position::Position;
use crate::protocol::{
    AttackResult, Attacker, ErrorMessage, GameOver, GameStarted, ServerMessage, ShipPlacement,
    ShotResult, TurnMessage, REASON_ALL_SHIPS_SUNK,
};
use crate::records::PveOutcome;
use crate::settings::GameSettings;

/// Counters for the player's side of the match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PveStats {
    pub player_shots: u32,
    pub player_hits: u32,
    pub player_turns: u32,
}

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the player's next attack.
    AwaitingAttack,
    /// Terminal; no more attacks are accepted.
    GameOver { winner: Attacker },
}

/// One outgoing message produced by [`PveSession::player_attack`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    AttackResult(AttackResult),
    GameOver(GameOver),
    Turn(TurnMessage),
    Error(ErrorMessage),
}

impl From<SessionEvent> for ServerMessage {
    fn from(event: SessionEvent) -> Self {
        match event {
            SessionEvent::AttackResult(m) => ServerMessage::AttackResult(m),
            SessionEvent::GameOver(m) => ServerMessage::GameOver(m),
            SessionEvent::Turn(m) => ServerMessage::Turn(m),
            SessionEvent::Error(m) => ServerMessage::Error(m),
        }
    }
}

fn attack_result(by: Attacker, pos: Position, outcome: AttackOutcome) -> AttackResult {
    AttackResult {
        by,
        position: pos.to_string(),
        result: if outcome.hit {
            ShotResult::Hit
        } else {
            ShotResult::Miss
        },
        sunk: outcome.sunk,
        sunk_ship: outcome.sunk_ship,
    }
}

fn all_sunk(winner: Attacker) -> SessionEvent {
    SessionEvent::GameOver(GameOver {
        winner,
        reason: REASON_ALL_SHIPS_SUNK.to_string(),
    })
}

pub struct PveSession {
    settings: GameSettings,
    player_board: Board,
    opponent_board: Board,
    /// Cells the opponent has fired at.
    opponent_tried: HashSet<Position>,
    /// Cells of the player's board the opponent has not fired at yet.
    opponent_untried: Vec<Position>,
    rng: SmallRng,
    stats: PveStats,
    state: SessionState,
}

impl PveSession {
    /// Start a match with random fleets for both sides.
    pub fn new(settings: GameSettings) -> Result<Self, BoardError> {
        let mut seed_rng = rand::rng();
        Self::with_rng(settings, SmallRng::from_rng(&mut seed_rng))
    }

    /// Start a match driven by `rng`, for reproducible games.
    pub fn with_rng(settings: GameSettings, mut rng: SmallRng) -> Result<Self, BoardError> {
        settings.validate()?;
        let player_board = Board::random(settings.board_size, &mut rng)?;
        let opponent_board = Board::random(settings.board_size, &mut rng)?;
        let mut session = Self::from_boards(player_board, opponent_board, rng);
        session.settings = settings;
        Ok(session)
    }

    /// Start a match on prepared boards.
    pub fn from_boards(player_board: Board, opponent_board: Board, rng: SmallRng) -> Self {
        let size = player_board.size();
        let opponent_untried = (0..size)
            .flat_map(|r| (0..size).map(move |c| Position::new(r, c)))
            .collect();
        Self {
            settings: GameSettings::with_board_size(size),
            player_board,
            opponent_board,
            opponent_tried: HashSet::new(),
            opponent_untried,
            rng,
            stats: PveStats::default(),
            state: SessionState::AwaitingAttack,
        }
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn size(&self) -> usize {
        self.player_board.size()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        matches!(self.state, SessionState::GameOver { .. })
    }

    pub fn player_board(&self) -> &Board {
        &self.player_board
    }

    pub fn opponent_board(&self) -> &Board {
        &self.opponent_board
    }

    /// Cells the opponent has already fired at.
    pub fn opponent_tried(&self) -> &HashSet<Position> {
        &self.opponent_tried
    }

    pub fn stats_snapshot(&self) -> PveStats {
        self.stats
    }

    /// Final result for the records, once the match is over.
    pub fn outcome(&self) -> Option<PveOutcome> {
        match self.state {
            SessionState::AwaitingAttack => None,
            SessionState::GameOver { winner } => Some(PveOutcome {
                won: winner == Attacker::Player,
                shots: self.stats.player_shots,
                hits: self.stats.player_hits,
                turns: self.stats.player_turns,
            }),
        }
    }

    /// The player's own fleet, announced when the match starts.
    pub fn game_started(&self) -> GameStarted {
        let my_ships = self
            .player_board
            .placements()
            .into_iter()
            .map(|(ship, cells)| ShipPlacement {
                ship,
                positions: cells.iter().map(Position::to_string).collect(),
            })
            .collect();
        GameStarted {
            board_size: self.size(),
            my_ships,
        }
    }

    /// Run one turn from the player's attack at `position`.
    ///
    /// The events come in wire order: the player's result, then the
    /// opponent's result if the game is still on, then exactly one of
    /// game over or turn. A bad position yields a single error and does not
    /// use up the turn. The winning shot itself is not added to the
    /// counters.
    pub fn player_attack(&mut self, position: &str) -> Vec<SessionEvent> {
        if self.is_over() {
            return vec![SessionEvent::Error(ErrorMessage::new("The game is already over"))];
        }
        let pos = match Position::parse(position, self.opponent_board.size()) {
            Ok(pos) => pos,
            Err(e) => return vec![SessionEvent::Error(ErrorMessage::new(e.to_string()))],
        };
        let outcome = match self.opponent_board.attack(pos) {
            Ok(outcome) => outcome,
            Err(e) => return vec![SessionEvent::Error(ErrorMessage::new(e.to_string()))],
        };

        let mut events = Vec::with_capacity(3);
        events.push(SessionEvent::AttackResult(attack_result(
            Attacker::Player,
            pos,
            outcome,
        )));

        if self.opponent_board.all_defeated() {
            self.state = SessionState::GameOver {
                winner: Attacker::Player,
            };
            events.push(all_sunk(Attacker::Player));
            return events;
        }

        self.stats.player_shots += 1;
        self.stats.player_turns += 1;
        if outcome.hit {
            self.stats.player_hits += 1;
        }

        if let Some(result) = self.opponent_attack() {
            events.push(SessionEvent::AttackResult(result));
        }

        if self.player_board.all_defeated() {
            self.state = SessionState::GameOver {
                winner: Attacker::Opponent,
            };
            events.push(all_sunk(Attacker::Opponent));
            return events;
        }

        events.push(SessionEvent::Turn(TurnMessage {
            who: Attacker::Player,
        }));
        events
    }

    /// Fire at a uniformly chosen cell the opponent has not tried yet.
    fn opponent_attack(&mut self) -> Option<AttackResult> {
        if self.opponent_untried.is_empty() {
            return None;
        }
        let idx = self.rng.random_range(0..self.opponent_untried.len());
        let pos = self.opponent_untried.swap_remove(idx);
        self.opponent_tried.insert(pos);
        let outcome = self.player_board.attack(pos).ok()?;
        Some(attack_result(Attacker::Opponent, pos, outcome))
    }
}
