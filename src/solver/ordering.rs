use indexmap::IndexSet;
use itertools::Itertools;

use crate::{
    board::{Board, Position},
    solver::strategy::{ValueOrdering, VariableOrdering},
    threats::ThreatMatrix,
};

/// Picks the next row to fill, or `None` once every row holds a queen.
///
/// MRV counts free columns from the threat matrix when there is one and falls back to the board's
/// safety check otherwise. The two agree on empty rows.
pub fn select_row(
    ordering: VariableOrdering,
    board: &Board,
    threats: Option<&ThreatMatrix>,
    used_rows: &IndexSet<usize>,
) -> Option<usize> {
    let mut open = (0..board.n()).filter(|row| !used_rows.contains(row));
    match ordering {
        VariableOrdering::Natural => open.next(),
        // `min_by_key` keeps the first of equal minimums, so ties go to the lowest row.
        VariableOrdering::Mrv => open.min_by_key(|&row| match threats {
            Some(threats) => threats.free_count(row),
            None => board.safe_count_in_row(row),
        }),
    }
}

/// Number of cells on the board that would still pass the safety check with a queen on `loc`.
pub fn count_safe_spots_for_board(board: &Board, loc: Position) -> usize {
    board.with_queen(loc).safe_count()
}

/// Orders the candidate columns of `row`.
///
/// LCV sorts ascending, so the column leaving the fewest safe spots goes first. Equal counts keep
/// their column order.
pub fn order_values(
    ordering: ValueOrdering,
    board: &Board,
    row: usize,
    candidates: Vec<usize>,
) -> Vec<usize> {
    match ordering {
        ValueOrdering::Natural => candidates,
        ValueOrdering::Lcv => candidates
            .into_iter()
            .map(|col| (col, count_safe_spots_for_board(board, (row, col))))
            .sorted_by_key(|&(_, remaining)| remaining)
            .map(|(col, _)| col)
            .collect(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn board_with(n: usize, queens: &[Position]) -> Board {
        let mut board = Board::new(n).unwrap();
        for &queen in queens {
            board.place(queen);
        }
        board
    }

    fn rows(used: &[usize]) -> IndexSet<usize> {
        used.iter().cloned().collect()
    }

    #[test]
    fn natural_takes_lowest_open_row() {
        let board = board_with(5, &[(0, 0), (2, 3)]);
        let row = select_row(VariableOrdering::Natural, &board, None, &rows(&[0, 2]));
        assert_eq!(row, Some(1));
        let full = select_row(VariableOrdering::Natural, &board, None, &rows(&[0, 1, 2, 3, 4]));
        assert_eq!(full, None);
    }

    #[test]
    fn mrv_breaks_ties_on_lowest_row() {
        let empty = Board::new(4).unwrap();
        assert_eq!(
            select_row(VariableOrdering::Mrv, &empty, None, &rows(&[])),
            Some(0)
        );

        // Rows 1, 2 and 3 all have two safe columns.
        let board = board_with(4, &[(0, 0)]);
        let threats = ThreatMatrix::from_positions(4, &[(0, 0)]);
        assert_eq!(
            select_row(VariableOrdering::Mrv, &board, Some(&threats), &rows(&[0])),
            Some(1)
        );

        // Rows 0 and 2 have one safe column each, row 3 has two.
        let board = board_with(4, &[(1, 1)]);
        let threats = ThreatMatrix::from_positions(4, &[(1, 1)]);
        for threats in [None, Some(&threats)].iter() {
            assert_eq!(
                select_row(VariableOrdering::Mrv, &board, *threats, &rows(&[1])),
                Some(0)
            );
        }
    }

    #[test]
    fn mrv_prefers_most_constrained_row() {
        // Rows 2 and 3 keep one safe column each, row 4 keeps two.
        let queens = [(0, 0), (1, 2)];
        let board = board_with(5, &queens);
        let threats = ThreatMatrix::from_positions(5, &queens);
        let used = rows(&[0, 1]);
        assert_eq!(
            (2..5).map(|row| threats.free_count(row)).collect::<Vec<_>>(),
            vec![1, 1, 2]
        );
        assert_eq!(
            select_row(VariableOrdering::Mrv, &board, Some(&threats), &used),
            Some(2)
        );
        assert_eq!(select_row(VariableOrdering::Mrv, &board, None, &used), Some(2));
    }

    #[test]
    fn safe_spot_counts() {
        let empty = Board::new(4).unwrap();
        for col in 0..4 {
            assert_eq!(count_safe_spots_for_board(&empty, (0, col)), 9);
        }
        let board = board_with(4, &[(0, 0)]);
        assert_eq!(count_safe_spots_for_board(&board, (1, 2)), 2);
        assert_eq!(count_safe_spots_for_board(&board, (1, 3)), 4);
    }

    #[test]
    fn lcv_sorts_ascending_and_stable() {
        let board = board_with(4, &[(0, 3)]);
        assert_eq!(
            order_values(ValueOrdering::Lcv, &board, 1, vec![0, 1]),
            vec![1, 0]
        );
        assert_eq!(
            order_values(ValueOrdering::Natural, &board, 1, vec![0, 1]),
            vec![0, 1]
        );

        let empty = Board::new(4).unwrap();
        assert_eq!(
            order_values(ValueOrdering::Lcv, &empty, 0, vec![0, 1, 2, 3]),
            vec![0, 1, 2, 3]
        );
    }
}
