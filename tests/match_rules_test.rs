//! Tests for the match state machine: turns, scoring, draws and resets.

use tiktag::{Cell, Line, Match, MoveOutcome, OccupiedPolicy, Phase, Player};

fn playing() -> Match {
    let mut m = Match::new();
    m.submit_name("Ada").expect("name A");
    m.submit_name("Bo").expect("name B");
    m
}

/// Plays `moves` alternately starting with A; returns the last outcome.
fn play(m: &mut Match, moves: &[(usize, usize)]) -> MoveOutcome {
    let mut last = MoveOutcome::Ignored;
    for &(r, c) in moves {
        last = m.apply_move(m.turn(), r, c).expect("valid move");
    }
    last
}

/// Two cells of `line` for the winner, interleaved with loser moves that
/// complete nothing, then the winning third cell.
fn winning_sequence(line: Line) -> Vec<(usize, usize)> {
    let cells = line.cells();
    let filler: Vec<(usize, usize)> = (0..3)
        .flat_map(|r| (0..3).map(move |c| (r, c)))
        .filter(|p| !cells.contains(p))
        .collect();
    // Pick two loser cells that do not share a line with each other and a
    // third empty cell.
    let loser = filler
        .iter()
        .copied()
        .flat_map(|a| filler.iter().copied().map(move |b| (a, b)))
        .find(|&(a, b)| a < b && !Line::ALL.iter().any(|l| {
            let lc = l.cells();
            lc.contains(&a) && lc.contains(&b)
        }))
        .expect("two unrelated cells");
    vec![cells[0], loser.0, cells[1], loser.1, cells[2]]
}

#[test]
fn test_turns_alternate_without_scoring() {
    let mut m = playing();
    let moves = [(0, 0), (0, 1), (0, 2), (1, 1), (1, 0), (1, 2)];
    let mut expected = Player::A;
    for (r, c) in moves {
        assert_eq!(m.turn(), expected);
        let outcome = m.apply_move(expected, r, c).unwrap();
        expected = expected.opponent();
        assert_eq!(outcome, MoveOutcome::Continued { next: expected });
        assert_eq!(m.seat(Player::A).score(), 0);
        assert_eq!(m.seat(Player::B).score(), 0);
    }
}

#[test]
fn test_every_line_scores_for_the_mover() {
    for line in Line::ALL {
        let mut m = playing();
        let outcome = play(&mut m, &winning_sequence(line));
        assert_eq!(
            outcome,
            MoveOutcome::Won {
                line,
                winner: Player::A
            },
            "{line}"
        );
        assert_eq!(m.phase(), Phase::RoundOver);
        assert_eq!(m.seat(Player::A).score(), 1, "{line}");
        assert_eq!(m.seat(Player::B).score(), 0, "{line}");
        // Turn is not flipped past the winner.
        assert_eq!(m.turn(), Player::A);
    }
}

#[test]
fn test_second_player_win_credits_second_player() {
    let mut m = playing();
    // A scatters; B completes row 1 on the sixth move.
    let outcome = play(&mut m, &[(0, 0), (1, 0), (0, 1), (1, 1), (2, 2), (1, 2)]);
    assert_eq!(
        outcome,
        MoveOutcome::Won {
            line: Line::Row(1),
            winner: Player::B
        }
    );
    assert_eq!(m.seat(Player::B).score(), 1);
    assert_eq!(m.seat(Player::A).score(), 0);
}

#[test]
fn test_full_board_without_line_is_draw() {
    let mut m = playing();
    // A B A / A B B / B A A
    let outcome = play(
        &mut m,
        &[(0, 0), (0, 1), (0, 2), (1, 1), (1, 0), (1, 2), (2, 1), (2, 0), (2, 2)],
    );
    assert_eq!(outcome, MoveOutcome::Drawn);
    assert_eq!(m.phase(), Phase::RoundOver);
    assert_eq!(m.seat(Player::A).score(), 0);
    assert_eq!(m.seat(Player::B).score(), 0);
}

#[test]
fn test_out_of_turn_move_changes_nothing() {
    let mut m = playing();
    m.apply_move(Player::A, 1, 1).unwrap();
    let before = m.clone();
    assert_eq!(m.apply_move(Player::A, 0, 0).unwrap(), MoveOutcome::Ignored);
    assert_eq!(m, before);
}

#[test]
fn test_reset_round_clears_board_and_keeps_scores() {
    let mut m = playing();
    play(&mut m, &winning_sequence(Line::MainDiagonal));
    let turn = m.turn();
    m.reset_round().unwrap();
    assert!(m.board().is_clear());
    assert_eq!(m.phase(), Phase::Playing);
    assert_eq!(m.turn(), turn);
    assert_eq!(m.round(), 2);
    assert_eq!(m.seat(Player::A).score(), 1);
    assert_eq!(m.seat(Player::B).score(), 0);
}

#[test]
fn test_moves_after_round_over_are_rejected() {
    let mut m = playing();
    play(&mut m, &winning_sequence(Line::Row(2)));
    let before = m.clone();
    assert!(m.apply_move(m.turn(), 0, 0).is_err());
    assert!(m.apply_move(m.turn().opponent(), 0, 0).is_err());
    assert_eq!(m, before);
}

#[test]
fn test_toggle_flips_mark_and_keeps_turn() {
    let mut m = playing();
    m.apply_move(Player::A, 1, 1).unwrap();
    let outcome = m.apply_move(Player::B, 1, 1).unwrap();
    assert_eq!(m.board().cell(1, 1), Some(Cell::Marked(Player::B)));
    assert_eq!(outcome, MoveOutcome::Continued { next: Player::B });
    assert_eq!(m.turn(), Player::B);

    // Toggling again flips the cell back; B still holds the turn.
    m.apply_move(Player::B, 1, 1).unwrap();
    assert_eq!(m.board().cell(1, 1), Some(Cell::Marked(Player::A)));
    assert_eq!(m.turn(), Player::B);
    m.apply_move(Player::B, 0, 0).unwrap();
    assert_eq!(m.turn(), Player::A);
}

#[test]
fn test_toggle_into_opponent_line_credits_mover() {
    let mut m = playing();
    play(&mut m, &[(1, 2), (1, 0), (0, 0), (1, 1)]);
    assert_eq!(m.turn(), Player::A);

    // A flips its own (1,2) to B, completing row 1 with B's marks.
    let outcome = m.apply_move(Player::A, 1, 2).unwrap();
    assert_eq!(
        outcome,
        MoveOutcome::Won {
            line: Line::Row(1),
            winner: Player::A
        }
    );
    assert_eq!(m.phase(), Phase::RoundOver);
    assert_eq!(m.seat(Player::A).score(), 1);
    assert_eq!(m.seat(Player::B).score(), 0);
}

#[test]
fn test_reject_policy_keeps_turn() {
    let mut m = Match::with_rules(OccupiedPolicy::Reject, 20);
    m.submit_name("Ada").unwrap();
    m.submit_name("Bo").unwrap();
    m.apply_move(Player::A, 1, 1).unwrap();
    assert!(m.apply_move(Player::B, 1, 1).is_err());
    assert_eq!(m.turn(), Player::B);
    assert_eq!(m.board().cell(1, 1), Some(Cell::Marked(Player::A)));
}
