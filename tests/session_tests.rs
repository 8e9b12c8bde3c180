use battleship_server::protocol::{Attacker, ShotResult};
use battleship_server::{
    Board, GameSettings, Position, PveOutcome, PveSession, SessionEvent, SessionState, ShipType,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn board_with_destroyer(row: usize) -> Board {
    let mut board = Board::new(10);
    board
        .place_ship(
            ShipType::Destroyer,
            &[Position::new(row, 0), Position::new(row, 1)],
        )
        .unwrap();
    board
}

fn small_session(seed: u64) -> PveSession {
    PveSession::from_boards(
        board_with_destroyer(0),
        board_with_destroyer(9),
        SmallRng::seed_from_u64(seed),
    )
}

#[test]
fn test_turn_order_hit_then_opponent_then_turn() {
    let mut session = small_session(1);
    let events = session.player_attack("A10");
    assert_eq!(events.len(), 3);

    let SessionEvent::AttackResult(mine) = &events[0] else {
        panic!("expected player's result first, got {:?}", events[0]);
    };
    assert_eq!(mine.by, Attacker::Player);
    assert_eq!(mine.position, "A10");
    assert_eq!(mine.result, ShotResult::Hit);
    assert!(!mine.sunk);

    let SessionEvent::AttackResult(theirs) = &events[1] else {
        panic!("expected opponent's result second, got {:?}", events[1]);
    };
    assert_eq!(theirs.by, Attacker::Opponent);

    match &events[2] {
        SessionEvent::Turn(turn) => assert_eq!(turn.who, Attacker::Player),
        other => panic!("expected TURN, got {:?}", other),
    }
    assert_eq!(session.state(), SessionState::AwaitingAttack);
    assert_eq!(session.opponent_tried().len(), 1);
}

#[test]
fn test_sinking_last_ship_ends_game_immediately() {
    let mut session = small_session(2);
    session.player_attack("A10");
    let tried_before = session.opponent_tried().len();

    let events = session.player_attack("B10");
    assert_eq!(events.len(), 2);
    let SessionEvent::AttackResult(mine) = &events[0] else {
        panic!("expected attack result, got {:?}", events[0]);
    };
    assert!(mine.sunk);
    assert_eq!(mine.sunk_ship, Some(ShipType::Destroyer));
    let SessionEvent::GameOver(over) = &events[1] else {
        panic!("expected game over, got {:?}", events[1]);
    };
    assert_eq!(over.winner, Attacker::Player);
    assert_eq!(over.reason, "ALL_SHIPS_SUNK");

    // the opponent did not get a reply shot
    assert_eq!(session.opponent_tried().len(), tried_before);
    assert_eq!(
        session.state(),
        SessionState::GameOver {
            winner: Attacker::Player
        }
    );
}

#[test]
fn test_winning_shot_is_not_counted() {
    let mut session = small_session(3);
    session.player_attack("J1");
    session.player_attack("A10");
    session.player_attack("B10");
    assert_eq!(
        session.outcome(),
        Some(PveOutcome {
            won: true,
            shots: 2,
            hits: 1,
            turns: 2,
        })
    );
}

#[test]
fn test_invalid_position_keeps_turn() {
    let mut session = small_session(4);
    for bad in ["Z99", "hello", ""] {
        let events = session.player_attack(bad);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], SessionEvent::Error(_)));
    }
    assert!(session.opponent_tried().is_empty());
    assert_eq!(session.stats_snapshot().player_shots, 0);
    assert_eq!(session.state(), SessionState::AwaitingAttack);
}

#[test]
fn test_attack_after_game_over_is_error() {
    let mut session = small_session(5);
    session.player_attack("A10");
    session.player_attack("B10");
    let events = session.player_attack("C10");
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], SessionEvent::Error(_)));
}

#[test]
fn test_opponent_never_repeats_and_eventually_wins() {
    // The player keeps firing at the same water cell.
    let mut session = PveSession::from_boards(
        board_with_destroyer(0),
        board_with_destroyer(9),
        SmallRng::seed_from_u64(6),
    );
    let mut opponent_shots = Vec::new();
    let mut rounds = 0;
    while !session.is_over() {
        rounds += 1;
        assert!(rounds <= 100, "opponent needs at most N*N moves");
        for event in session.player_attack("J5") {
            if let SessionEvent::AttackResult(r) = event {
                if r.by == Attacker::Opponent {
                    opponent_shots.push(r.position);
                }
            }
        }
    }
    let mut unique = opponent_shots.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), opponent_shots.len());
    assert_eq!(
        session.state(),
        SessionState::GameOver {
            winner: Attacker::Opponent
        }
    );
    let outcome = session.outcome().unwrap();
    assert!(!outcome.won);
    assert_eq!(outcome.turns, rounds);
}

#[test]
fn test_full_random_game_finishes() {
    let settings = GameSettings::default();
    let mut session = PveSession::with_rng(settings, SmallRng::seed_from_u64(99)).unwrap();
    let started = session.game_started();
    assert_eq!(started.board_size, 10);
    assert_eq!(started.my_ships.len(), 10);

    let mut turns = 0;
    'outer: for r in 1..=10 {
        for c in 'A'..='J' {
            if session.is_over() {
                break 'outer;
            }
            turns += 1;
            session.player_attack(&format!("{}{}", c, r));
        }
    }
    assert!(session.is_over());
    assert!(turns <= 100);
}

#[test]
fn test_smallest_board_starts_and_finishes() {
    let settings = GameSettings::with_board_size(7);
    for seed in 0..50 {
        let mut session = PveSession::with_rng(settings.clone(), SmallRng::seed_from_u64(seed))
            .expect("7x7 fleet layout");
        assert_eq!(session.size(), 7);
        assert_eq!(session.game_started().my_ships.len(), 10);

        'sweep: for r in 1..=7 {
            for c in 'A'..='G' {
                if session.is_over() {
                    break 'sweep;
                }
                session.player_attack(&format!("{}{}", c, r));
            }
        }
        assert!(session.is_over());
    }
}

#[test]
fn test_rejects_unsupported_board_size() {
    let settings = GameSettings::with_board_size(5);
    assert!(PveSession::with_rng(settings, SmallRng::seed_from_u64(0)).is_err());
}
