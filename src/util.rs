use crate::board::Position;

/// Unit steps along a queen's row and column.
pub static ORTHOGONAL: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Unit steps along a queen's two diagonals.
pub static DIAGONAL: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Every cell reached by stepping from `from` in direction `(d_row, d_col)` until the edge of an
/// `n`-by-`n` board. `from` itself is not included.
pub fn ray(n: usize, from: Position, (d_row, d_col): (isize, isize)) -> impl Iterator<Item = Position> {
    let n = n as isize;
    let (row, col) = (from.0 as isize, from.1 as isize);
    (1..)
        .map(move |k| (row + d_row * k, col + d_col * k))
        .take_while(move |&(r, c)| (0..n).contains(&r) && (0..n).contains(&c))
        .map(|(r, c)| (r as usize, c as usize))
}

/// All cells sharing a row, column or diagonal with `from`, each exactly once, excluding `from`.
pub fn lines_through(n: usize, from: Position) -> impl Iterator<Item = Position> {
    ORTHOGONAL
        .iter()
        .chain(DIAGONAL.iter())
        .flat_map(move |&dir| ray(n, from, dir))
}

/// Whether a queen on `a` attacks `b`. A queen counts as attacking its own cell.
pub fn attacks(a: Position, b: Position) -> bool {
    let d_row = if a.0 > b.0 { a.0 - b.0 } else { b.0 - a.0 };
    let d_col = if a.1 > b.1 { a.1 - b.1 } else { b.1 - a.1 };
    d_row == 0 || d_col == 0 || d_row == d_col
}

#[cfg(test)]
mod test {
    use indexmap::IndexSet;

    use super::*;

    #[test]
    fn ray_stops_at_edge() {
        let down_right: Vec<_> = ray(4, (1, 1), (1, 1)).collect();
        assert_eq!(down_right, vec![(2, 2), (3, 3)]);
        assert_eq!(ray(4, (0, 0), (-1, 0)).count(), 0);
    }

    #[test]
    fn lines_through_visit_each_cell_once() {
        let n = 5;
        for row in 0..n {
            for col in 0..n {
                let cells: Vec<_> = lines_through(n, (row, col)).collect();
                let unique: IndexSet<_> = cells.iter().cloned().collect();
                assert_eq!(cells.len(), unique.len());
                assert!(!unique.contains(&(row, col)));
                for &cell in &cells {
                    assert!(attacks((row, col), cell));
                }
                // Everything not on a line is left alone.
                let attacked = (0..n)
                    .flat_map(|r| (0..n).map(move |c| (r, c)))
                    .filter(|&cell| cell != (row, col) && attacks((row, col), cell))
                    .count();
                assert_eq!(attacked, cells.len());
            }
        }
    }

    #[test]
    fn attacks_is_symmetric() {
        assert!(attacks((0, 0), (3, 3)));
        assert!(attacks((3, 3), (0, 0)));
        assert!(attacks((2, 0), (0, 2)));
        assert!(attacks((1, 1), (1, 1)));
        assert!(!attacks((0, 1), (2, 0)));
    }
}
