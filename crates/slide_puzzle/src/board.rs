use std::fmt::{self, Display, Formatter};

use bevy::prelude::*;

/// Number of random single-step moves used to scramble a fresh board.
pub const SHUFFLE_MOVES: usize = 1000;

// Up, right, down, left.
const NEIGHBOUR_DELTAS: [(i32, i32); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Cell {
    Empty,
    Tile(u8),
}

/// The logical puzzle grid. Cells are stored row-major; `empty` indexes the
/// single vacant cell and is re-seated on every slide.
#[derive(Resource, Debug, Clone)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
    empty: (usize, usize),
}

impl Board {
    /// The solved configuration: 1..N²-1 in row-major order with the empty
    /// slot in the last cell.
    pub fn solved(size: usize) -> Self {
        let cells = (0..size * size)
            .map(|i| {
                if i < size * size - 1 {
                    Cell::Tile((i + 1) as u8)
                } else {
                    Cell::Empty
                }
            })
            .collect();
        Self {
            size,
            cells,
            empty: (size - 1, size - 1),
        }
    }

    /// Builds a board from explicit row-major cells, rejecting anything that
    /// breaks the grid invariant: exactly one empty cell and every value in
    /// 1..N²-1 present exactly once.
    pub fn from_cells(size: usize, cells: Vec<Cell>) -> Option<Self> {
        if size < 2 || cells.len() != size * size {
            return None;
        }
        let mut empty = None;
        let mut seen = vec![false; size * size - 1];
        for (index, cell) in cells.iter().enumerate() {
            match *cell {
                Cell::Empty => {
                    if empty.is_some() {
                        return None;
                    }
                    empty = Some((index / size, index % size));
                }
                Cell::Tile(value) => {
                    let Some(slot) = (value as usize)
                        .checked_sub(1)
                        .and_then(|slot| seen.get_mut(slot))
                    else {
                        return None;
                    };
                    if *slot {
                        return None;
                    }
                    *slot = true;
                }
            }
        }
        let empty = empty?;
        Some(Self { size, cells, empty })
    }

    pub const fn size(&self) -> usize {
        self.size
    }

    /// Grid coordinates of the vacant cell.
    pub const fn empty_pos(&self) -> (usize, usize) {
        self.empty
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        if row >= self.size || col >= self.size {
            return None;
        }
        self.cells.get(self.index(row, col)).copied()
    }

    const fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// In-bounds orthogonal neighbours of a cell, in up/right/down/left
    /// order. Corner cells get two, edge cells three, inner cells four.
    pub fn neighbours(&self, row: usize, col: usize) -> Vec<(usize, usize)> {
        NEIGHBOUR_DELTAS
            .iter()
            .filter_map(|&(delta_row, delta_col)| {
                let row = row as i32 + delta_row;
                let col = col as i32 + delta_col;
                (row >= 0 && col >= 0 && (row as usize) < self.size && (col as usize) < self.size)
                    .then(|| (row as usize, col as usize))
            })
            .collect()
    }

    /// Whether the tile at (row, col) may slide into the empty slot.
    pub fn is_adjacent_to_empty(&self, row: usize, col: usize) -> bool {
        self.neighbours(self.empty.0, self.empty.1)
            .contains(&(row, col))
    }

    /// Slides the tile at (row, col) into the empty slot and re-seats the
    /// empty index at the vacated cell. Returns false and leaves the board
    /// untouched if the tile is not adjacent to the empty slot.
    pub fn slide(&mut self, row: usize, col: usize) -> bool {
        if !self.is_adjacent_to_empty(row, col) {
            return false;
        }
        let from = self.index(row, col);
        let to = self.index(self.empty.0, self.empty.1);
        self.cells.swap(from, to);
        self.empty = (row, col);
        true
    }

    /// Scrambles the board with a random walk of legal single-step moves of
    /// the empty slot. Because every step is a legal slide, the result is
    /// always reachable from the solved configuration.
    pub fn shuffle(&mut self, moves: usize, rng: &mut fastrand::Rng) {
        for _ in 0..moves {
            let neighbours = self.neighbours(self.empty.0, self.empty.1);
            let Some(&(row, col)) = neighbours.get(rng.usize(..neighbours.len())) else {
                continue;
            };
            self.slide(row, col);
        }
    }

    /// Row-major scan: solved iff every tile sits at its home cell
    /// `row * N + col + 1`, which leaves the empty slot in the last cell.
    pub fn is_solved(&self) -> bool {
        self.cells
            .iter()
            .enumerate()
            .all(|(index, cell)| match *cell {
                Cell::Empty => true,
                Cell::Tile(value) => value as usize == index + 1,
            })
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            for col in 0..self.size {
                match self.cell(row, col) {
                    Some(Cell::Tile(value)) => write!(f, "{value:>02} ")?,
                    Some(Cell::Empty) => write!(f, "   ")?,
                    None => {}
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiles_are_permutation(board: &Board) -> bool {
        let mut values: Vec<u8> = (0..board.size())
            .flat_map(|row| (0..board.size()).map(move |col| (row, col)))
            .filter_map(|(row, col)| match board.cell(row, col) {
                Some(Cell::Tile(value)) => Some(value),
                _ => None,
            })
            .collect();
        values.sort_unstable();
        let expected: Vec<u8> = (1..(board.size() * board.size()) as u8).collect();
        values == expected
    }

    fn empty_count(board: &Board) -> usize {
        (0..board.size())
            .flat_map(|row| (0..board.size()).map(move |col| (row, col)))
            .filter(|&(row, col)| board.cell(row, col) == Some(Cell::Empty))
            .count()
    }

    /// Standard solvability rule for the sliding-puzzle family. Each legal
    /// slide flips both the permutation parity and the parity of the empty
    /// slot's taxicab distance from its home corner, so their sum stays
    /// even for any configuration reachable from solved.
    fn is_solvable(board: &Board) -> bool {
        let n = board.size();
        let sequence: Vec<usize> = (0..n)
            .flat_map(|row| (0..n).map(move |col| (row, col)))
            .map(|(row, col)| match board.cell(row, col) {
                Some(Cell::Tile(value)) => value as usize,
                _ => n * n,
            })
            .collect();
        let mut inversions = 0;
        for i in 0..sequence.len() {
            for j in i + 1..sequence.len() {
                if sequence[i] > sequence[j] {
                    inversions += 1;
                }
            }
        }
        let (row, col) = board.empty_pos();
        let blank_distance = (n - 1 - row) + (n - 1 - col);
        (inversions + blank_distance) % 2 == 0
    }

    /// 3x3 board with the empty slot in the top-left corner.
    fn corner_empty_board() -> Board {
        let cells = vec![
            Cell::Empty,
            Cell::Tile(1),
            Cell::Tile(2),
            Cell::Tile(3),
            Cell::Tile(4),
            Cell::Tile(5),
            Cell::Tile(6),
            Cell::Tile(7),
            Cell::Tile(8),
        ];
        Board::from_cells(3, cells).expect("valid test board")
    }

    #[test]
    fn solved_board_is_solved() {
        for size in 3..=5 {
            let board = Board::solved(size);
            assert!(board.is_solved(), "{size}x{size} must start solved");
            assert_eq!(board.empty_pos(), (size - 1, size - 1));
            assert_eq!(empty_count(&board), 1);
            assert!(tiles_are_permutation(&board));
        }
    }

    #[test]
    fn from_cells_rejects_broken_invariants() {
        // Two empties.
        assert!(
            Board::from_cells(
                2,
                vec![Cell::Empty, Cell::Empty, Cell::Tile(1), Cell::Tile(2)]
            )
            .is_none(),
            "two empty cells must be rejected"
        );
        // Duplicate value.
        assert!(
            Board::from_cells(
                2,
                vec![Cell::Tile(1), Cell::Tile(1), Cell::Tile(2), Cell::Empty]
            )
            .is_none(),
            "duplicate tile values must be rejected"
        );
        // Out-of-range value.
        assert!(
            Board::from_cells(
                2,
                vec![Cell::Tile(1), Cell::Tile(4), Cell::Tile(2), Cell::Empty]
            )
            .is_none(),
            "values past N²-1 must be rejected"
        );
        // Well formed.
        assert!(
            Board::from_cells(
                2,
                vec![Cell::Tile(1), Cell::Tile(2), Cell::Tile(3), Cell::Empty]
            )
            .is_some(),
            "a valid configuration must be accepted"
        );
    }

    #[test]
    fn win_detection_spots_a_single_swap() {
        let solved = Board::from_cells(
            3,
            vec![
                Cell::Tile(1),
                Cell::Tile(2),
                Cell::Tile(3),
                Cell::Tile(4),
                Cell::Tile(5),
                Cell::Tile(6),
                Cell::Tile(7),
                Cell::Tile(8),
                Cell::Empty,
            ],
        )
        .expect("valid test board");
        assert!(solved.is_solved(), "identity layout must report solved");

        let swapped = Board::from_cells(
            3,
            vec![
                Cell::Tile(2),
                Cell::Tile(1),
                Cell::Tile(3),
                Cell::Tile(4),
                Cell::Tile(5),
                Cell::Tile(6),
                Cell::Tile(7),
                Cell::Tile(8),
                Cell::Empty,
            ],
        )
        .expect("valid test board");
        assert!(!swapped.is_solved(), "swapped tiles must report unsolved");
    }

    #[test]
    fn corner_empty_has_exactly_two_neighbours() {
        let board = corner_empty_board();
        assert_eq!(board.empty_pos(), (0, 0));
        assert_eq!(board.neighbours(0, 0), vec![(0, 1), (1, 0)]);
        assert!(board.is_adjacent_to_empty(0, 1));
        assert!(board.is_adjacent_to_empty(1, 0));
        assert!(
            !board.is_adjacent_to_empty(2, 2),
            "far corner must not be selectable"
        );
        assert!(
            !board.is_adjacent_to_empty(1, 1),
            "diagonal must not be selectable"
        );
    }

    #[test]
    fn slide_moves_exactly_one_tile() {
        let mut board = Board::solved(3);
        let before = board.clone();
        assert!(board.slide(2, 1), "tile next to the empty slot must slide");

        assert_eq!(board.empty_pos(), (2, 1));
        assert_eq!(board.cell(2, 2), Some(Cell::Tile(8)));
        assert_eq!(board.cell(2, 1), Some(Cell::Empty));
        assert_eq!(empty_count(&board), 1);
        assert!(tiles_are_permutation(&board));

        // Every other cell is untouched.
        let moved = (0..3)
            .flat_map(|row| (0..3).map(move |col| (row, col)))
            .filter(|&(row, col)| board.cell(row, col) != before.cell(row, col))
            .count();
        assert_eq!(moved, 2, "one slide must touch one tile and the empty cell");
    }

    #[test]
    fn slide_rejects_non_adjacent_cells() {
        let mut board = Board::solved(3);
        let before = board.clone();
        assert!(!board.slide(0, 0), "distant tile must not slide");
        assert!(!board.slide(1, 1), "diagonal tile must not slide");
        assert_eq!(board.empty_pos(), before.empty_pos());
        for row in 0..3 {
            for col in 0..3 {
                assert_eq!(board.cell(row, col), before.cell(row, col));
            }
        }
    }

    #[test]
    fn shuffle_keeps_every_size_solvable() {
        for size in 3..=5 {
            for seed in 0..8 {
                let mut board = Board::solved(size);
                board.shuffle(SHUFFLE_MOVES, &mut fastrand::Rng::with_seed(seed));
                assert_eq!(empty_count(&board), 1, "exactly one empty after shuffle");
                assert!(tiles_are_permutation(&board), "values stay a permutation");
                assert!(
                    is_solvable(&board),
                    "{size}x{size} shuffle (seed {seed}) must stay solvable"
                );
            }
        }
    }

    #[test]
    fn seeded_shuffle_leaves_the_solved_configuration() {
        let mut board = Board::solved(3);
        board.shuffle(SHUFFLE_MOVES, &mut fastrand::Rng::with_seed(42));
        assert!(
            !board.is_solved(),
            "a 1000-move scramble must not end up solved"
        );
        assert!(is_solvable(&board), "scramble must remain solvable");
    }

    #[test]
    fn inverse_move_sequence_restores_the_solved_board() {
        let mut board = Board::solved(3);
        let moves = [(1, 2), (1, 1), (2, 1), (2, 0), (1, 0)];

        // Each slide vacates the slid tile's cell, so sliding back through
        // the empty slot's previous positions undoes the walk.
        let mut undo = Vec::new();
        for &(row, col) in &moves {
            undo.push(board.empty_pos());
            assert!(board.slide(row, col), "scripted move must be legal");
        }
        assert!(!board.is_solved());

        for &(row, col) in undo.iter().rev() {
            assert!(board.slide(row, col), "inverse move must be legal");
        }
        assert!(board.is_solved(), "inverse sequence must restore the board");
    }

    #[test]
    fn seeded_random_walk_can_be_undone_move_by_move() {
        let mut rng = fastrand::Rng::with_seed(7);
        let mut board = Board::solved(3);

        // Same walk the shuffle performs, with the empty slot's trail kept
        // so the scramble can be replayed backwards.
        let mut trail = Vec::new();
        for _ in 0..200 {
            let (empty_row, empty_col) = board.empty_pos();
            let neighbours = board.neighbours(empty_row, empty_col);
            let &(row, col) = neighbours
                .get(rng.usize(..neighbours.len()))
                .expect("a cell always has neighbours");
            trail.push(board.empty_pos());
            assert!(board.slide(row, col), "walk move must be legal");
        }
        assert!(!board.is_solved(), "walk must leave the solved layout");

        for &(row, col) in trail.iter().rev() {
            assert!(board.slide(row, col), "undo move must be legal");
        }
        assert!(board.is_solved(), "undoing the walk must restore the board");
    }
}
