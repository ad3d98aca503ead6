use mineboard_core::{BoardSnapshot, CellView, Coord2, GameState, InteractionMode, Session};

fn cell_char(cell: CellView, is_hit: bool) -> char {
    match cell {
        CellView { marked: true, .. } => 'F',
        CellView { revealed: false, .. } => '#',
        _ if is_hit => 'X',
        CellView {
            mined: Some(true), ..
        } => '*',
        CellView {
            adjacent_mines: Some(0),
            ..
        } => '.',
        CellView {
            adjacent_mines: Some(count),
            ..
        } => char::from_digit(u32::from(count), 10).unwrap_or('?'),
        _ => '?',
    }
}

/// Plain text grid with column and row numbers along the edges.
pub fn board(snapshot: &BoardSnapshot) -> String {
    let hit = match snapshot.state {
        GameState::Lost(at) => Some(at),
        _ => None,
    };

    let mut out = String::from("   ");
    for x in 0..snapshot.size {
        out.push_str(&format!("{:>2}", x % 100));
    }
    out.push('\n');

    for y in 0..snapshot.size {
        out.push_str(&format!("{:>2} ", y % 100));
        for x in 0..snapshot.size {
            let coords = Coord2::new(x, y);
            let cell = snapshot.cell(coords).unwrap_or_default();
            out.push(' ');
            out.push(cell_char(cell, hit == Some(coords)));
        }
        out.push('\n');
    }
    out
}

pub fn status(session: &Session) -> String {
    let board = session.board();
    let state = match board.state() {
        GameState::InProgress => "in progress".to_string(),
        GameState::Won => "won".to_string(),
        GameState::Lost(at) => format!("lost at {at}"),
    };
    let mode = match session.mode() {
        InteractionMode::Reveal => "reveal",
        InteractionMode::Mark => "mark",
    };
    format!(
        "{}x{} {} | mines left: {} | mode: {} | {}",
        board.size(),
        board.size(),
        session.config().difficulty,
        board.mines_left(),
        mode,
        state
    )
}

#[cfg(test)]
mod tests {
    use mineboard_core::Board;

    use super::*;

    #[test]
    fn draws_hidden_marked_and_open_cells() {
        let mut game = Board::from_mines(3, &[Coord2::new(0, 0), Coord2::new(2, 2)]).unwrap();
        game.reveal(Coord2::new(1, 1)).unwrap();
        game.toggle_mark(Coord2::new(2, 2)).unwrap();

        let text = board(&BoardSnapshot::from_board(&game));

        assert_eq!(text, "    0 1 2\n 0  # # #\n 1  # 2 #\n 2  # # F\n");
    }

    #[test]
    fn draws_hit_mine_after_loss() {
        let mut game = Board::from_mines(2, &[Coord2::new(1, 0)]).unwrap();
        game.toggle_mark(Coord2::new(0, 1)).unwrap();
        game.reveal(Coord2::new(1, 0)).unwrap();

        let text = board(&BoardSnapshot::from_board(&game));

        assert_eq!(text, "    0 1\n 0  1 X\n 1  1 1\n");
    }
}
