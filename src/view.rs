//! Text rendering of a [`RenderState`].
//!
//! Pure formatting; the game never reads anything back from here.

use crate::input::View;
use tiktag_rules::{Cell, LineRole, Phase, Player, RenderState};

/// Title card text.
pub const TITLE: &str = "Tik-Tag";

/// Glyph drawn for a cell.
pub fn glyph(cell: Cell) -> char {
    match cell {
        Cell::Empty => ' ',
        Cell::Marked(Player::A) => '○',
        Cell::Marked(Player::B) => '×',
        Cell::Struck(LineRole::Row) => '-',
        Cell::Struck(LineRole::Column) => '|',
        Cell::Struck(LineRole::MainDiagonal) => '\\',
        Cell::Struck(LineRole::AntiDiagonal) => '/',
    }
}

/// Renders the screen for one session.
///
/// While a name is being collected every session sees the prompt; `draft`
/// is shown only to the seat being named.
pub fn render(state: &RenderState, view: View, draft: Option<&str>) -> String {
    match (state.phase, view) {
        (Phase::NamingA | Phase::NamingB, _) | (_, View::Prompt) => prompt(state, draft),
        (_, View::Board) => board(state),
        (_, View::Title) => TITLE.to_string(),
    }
}

fn prompt(state: &RenderState, draft: Option<&str>) -> String {
    match state.phase {
        Phase::NamingA => format!("Player 1 name? {}", draft.unwrap_or("")),
        Phase::NamingB => format!("Player 2 name? {}", draft.unwrap_or("")),
        Phase::Playing | Phase::RoundOver => format!(
            "{} vs {}",
            state.seat(Player::A).name,
            state.seat(Player::B).name
        ),
    }
}

fn board(state: &RenderState) -> String {
    let g = |r, c| glyph(state.cell(r, c));
    let a = state.seat(Player::A);
    let b = state.seat(Player::B);
    let status = match state.phase {
        Phase::RoundOver => match state.outcome.winner() {
            Some(p) => format!("{} wins round {}! esc for next round", state.seat(p).name, state.round),
            None => format!("Round {} drawn. esc for next round", state.round),
        },
        _ => format!("{} to move", state.seat(state.turn).name),
    };
    format!(
        "{}: {}\n{}: {}\n┏━┳━┳━┓\n┃{}┃{}┃{}┃\n┣━╋━╋━┫\n┃{}┃{}┃{}┃\n┣━╋━╋━┫\n┃{}┃{}┃{}┃\n┗━┻━┻━┛\n{}",
        a.name,
        a.score,
        b.name,
        b.score,
        g(0, 0),
        g(0, 1),
        g(0, 2),
        g(1, 0),
        g(1, 1),
        g(1, 2),
        g(2, 0),
        g(2, 1),
        g(2, 2),
        status
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiktag_rules::Match;

    #[test]
    fn test_prompt_during_naming() {
        let m = Match::new();
        let text = render(&m.snapshot(), View::Board, Some("Ad"));
        assert_eq!(text, "Player 1 name? Ad");
    }

    #[test]
    fn test_board_shows_scores_and_marks() {
        let mut m = Match::new();
        m.submit_name("Ada").unwrap();
        m.submit_name("Bo").unwrap();
        m.apply_move(Player::A, 1, 1).unwrap();
        let text = render(&m.snapshot(), View::Board, None);
        assert!(text.starts_with("Ada: 0\nBo: 0\n"));
        assert!(text.contains("┃ ┃○┃ ┃"));
        assert!(text.ends_with("Bo to move"));
    }

    #[test]
    fn test_struck_glyphs() {
        assert_eq!(glyph(Cell::Struck(LineRole::AntiDiagonal)), '/');
        assert_eq!(glyph(Cell::Marked(Player::B)), '×');
    }
}
