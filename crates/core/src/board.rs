//! Board module - manages the game grid
//!
//! The board is a `width x height` grid where each cell is empty or holds the
//! colour of a locked block. Storage is a flat row-major vector (row 0 first),
//! which keeps row copies during line clears cheap.
//!
//! Coordinates: `x` ranges `0..width` (left to right), `y` ranges `0..height`
//! (bottom to top). Cells above the top row are legal for a falling piece but
//! never stored.

use crate::types::{Cell, Color, Point, BOARD_HEIGHT, BOARD_WIDTH};

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero; configs are validated before a
    /// board is built.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "board dimensions must be non-zero");
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Get width of the board
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get height of the board
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check whether a piece may occupy `cells`.
    ///
    /// Every cell needs `0 <= x < width` and `y >= 0`. Cells below the ceiling
    /// must be empty; cells at or above `height` are always acceptable so
    /// pieces can hang over the top of the board.
    pub fn is_valid_position(&self, cells: &[Point]) -> bool {
        cells.iter().all(|c| {
            if c.x < 0 || c.x as usize >= self.width || c.y < 0 {
                return false;
            }
            c.y as usize >= self.height || !self.is_occupied(c.x, c.y)
        })
    }

    /// Commit blocks of `color` at `cells`.
    ///
    /// Cells at or above the ceiling are dropped, as is anything out of
    /// bounds. Already occupied cells keep their colour.
    pub fn place_blocks(&mut self, cells: &[Point], color: Color) {
        for c in cells {
            if let Some(idx) = self.index(c.x, c.y) {
                if self.cells[idx].is_none() {
                    self.cells[idx] = Some(color);
                }
            }
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= self.height {
            return false;
        }
        self.row(y).iter().all(|cell| cell.is_some())
    }

    fn row(&self, y: usize) -> &[Cell] {
        let start = y * self.width;
        &self.cells[start..start + self.width]
    }

    /// Clear all full rows and compact the rest downwards.
    ///
    /// Two-pointer pass from the floor up: every surviving row is copied to the
    /// next free write row, then the rows left above the write pointer are
    /// emptied. Surviving rows keep their relative order. Returns the number of
    /// rows removed.
    pub fn clear_lines(&mut self) -> usize {
        let width = self.width;
        let mut write_y = 0usize;
        let mut cleared = 0usize;

        for read_y in 0..self.height {
            if self.is_row_full(read_y) {
                cleared += 1;
                continue;
            }
            if write_y != read_y {
                let src_start = read_y * width;
                self.cells
                    .copy_within(src_start..src_start + width, write_y * width);
            }
            write_y += 1;
        }

        if cleared > 0 {
            for cell in &mut self.cells[write_y * width..] {
                *cell = None;
            }
            tracing::trace!(cleared, "rows cleared");
        }

        cleared
    }

    /// True when anything is locked in the top row
    pub fn is_game_over(&self) -> bool {
        self.row(self.height - 1).iter().any(|cell| cell.is_some())
    }

    /// Clear the entire board
    pub fn clear_board(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Every locked block with its colour, row by row from the floor.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (Point, Color)> + '_ {
        let width = self.width;
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.map(|color| (Point::new((i % width) as i32, (i / width) as i32), color))
        })
    }

    /// Number of occupied cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Height of the stack in column `x` (index of the highest block + 1).
    pub fn column_height(&self, x: usize) -> usize {
        if x >= self.width {
            return 0;
        }
        (0..self.height)
            .rev()
            .find(|&y| self.cells[y * self.width + x].is_some())
            .map_or(0, |y| y + 1)
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BOARD_WIDTH, BOARD_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(board: &mut Board, y: i32, color: Color) {
        for x in 0..board.width() as i32 {
            board.set(x, y, Some(color));
        }
    }

    #[test]
    fn test_board_index_calculation() {
        let board = Board::default();
        assert_eq!(board.index(0, 0), Some(0));
        assert_eq!(board.index(9, 0), Some(9));
        assert_eq!(board.index(0, 1), Some(10));
        assert_eq!(board.index(9, 19), Some(199));
        assert_eq!(board.index(-1, 0), None);
        assert_eq!(board.index(10, 0), None);
        assert_eq!(board.index(0, 20), None);
    }

    #[test]
    fn test_board_flat_array() {
        let mut board = Board::default();

        board.set(0, 0, Some(Color::CYAN));
        board.set(5, 10, Some(Color::MAGENTA));

        assert_eq!(board.cells[0], Some(Color::CYAN));
        assert_eq!(board.cells[10 * 10 + 5], Some(Color::MAGENTA));
    }

    #[test]
    fn test_cells_above_ceiling_are_valid() {
        let board = Board::default();
        assert!(board.is_valid_position(&[Point::new(0, 20), Point::new(9, 35)]));
        assert!(!board.is_valid_position(&[Point::new(0, 20), Point::new(10, 25)]));
    }

    #[test]
    fn test_place_blocks_keeps_existing_color() {
        let mut board = Board::default();
        board.set(3, 3, Some(Color::RED));
        board.place_blocks(&[Point::new(3, 3), Point::new(4, 3)], Color::BLUE);
        assert_eq!(board.get(3, 3), Some(Some(Color::RED)));
        assert_eq!(board.get(4, 3), Some(Some(Color::BLUE)));
    }

    #[test]
    fn test_clear_lines_drops_partial_rows() {
        let mut board = Board::new(4, 6);
        fill_row(&mut board, 0, Color::RED);
        board.set(1, 1, Some(Color::GREEN));
        fill_row(&mut board, 2, Color::RED);
        board.set(3, 3, Some(Color::BLUE));

        assert_eq!(board.clear_lines(), 2);
        assert_eq!(board.get(1, 0), Some(Some(Color::GREEN)));
        assert_eq!(board.get(3, 1), Some(Some(Color::BLUE)));
        assert_eq!(board.filled_count(), 2);
    }

    #[test]
    fn test_column_height() {
        let mut board = Board::default();
        assert_eq!(board.column_height(2), 0);
        board.set(2, 0, Some(Color::RED));
        board.set(2, 6, Some(Color::RED));
        assert_eq!(board.column_height(2), 7);
        assert_eq!(board.column_height(42), 0);
    }

    #[test]
    fn test_occupied_cells_reports_positions() {
        let mut board = Board::new(3, 3);
        board.set(2, 1, Some(Color::ORANGE));
        let cells: Vec<_> = board.occupied_cells().collect();
        assert_eq!(cells, vec![(Point::new(2, 1), Color::ORANGE)]);
    }

    #[test]
    fn test_game_over_only_checks_top_row() {
        let mut board = Board::default();
        board.set(0, 18, Some(Color::RED));
        assert!(!board.is_game_over());
        board.set(7, 19, Some(Color::RED));
        assert!(board.is_game_over());
    }
}
