use crate::types::{HexColor, PixelOwner};

#[derive(Debug, Clone, PartialEq)]
struct Cell {
    color: HexColor,
    owner: Option<PixelOwner>,
}

/// Independent copy of the whole board
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSnapshot {
    pub size: usize,
    pub pixels: Vec<HexColor>,
    pub owners: Vec<Option<PixelOwner>>,
}

/// Square grid of colored cells. Color and owner live in one cell value so a
/// paint replaces both together.
#[derive(Debug, Clone)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    pub fn new(size: usize, fallback: HexColor) -> Self {
        let blank = Cell {
            color: fallback,
            owner: None,
        };
        Self {
            size,
            cells: vec![blank; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether signed coordinates fall on the board
    pub fn contains(&self, x: i64, y: i64) -> bool {
        let size = self.size as i64;
        (0..size).contains(&x) && (0..size).contains(&y)
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.size + x
    }

    /// Caller guarantees `x` and `y` are in range.
    pub fn apply_paint(&mut self, x: usize, y: usize, color: HexColor, owner: PixelOwner) {
        debug_assert!(x < self.size && y < self.size);
        let index = self.index(x, y);
        self.cells[index] = Cell {
            color,
            owner: Some(owner),
        };
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<(&HexColor, Option<&PixelOwner>)> {
        if x >= self.size || y >= self.size {
            return None;
        }
        let cell = &self.cells[self.index(x, y)];
        Some((&cell.color, cell.owner.as_ref()))
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let (pixels, owners) = self
            .cells
            .iter()
            .map(|cell| (cell.color.clone(), cell.owner.clone()))
            .unzip();
        BoardSnapshot {
            size: self.size,
            pixels,
            owners,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Avatar;

    fn color(s: &str) -> HexColor {
        HexColor::parse(s).unwrap()
    }

    fn owner(name: &str) -> PixelOwner {
        PixelOwner {
            name: name.to_string(),
            avatar: Avatar::PixelRobot,
        }
    }

    #[test]
    fn test_new_board_is_blank() {
        let board = Board::new(8, color("#f8fafc"));
        let snapshot = board.snapshot();

        assert_eq!(snapshot.size, 8);
        assert_eq!(snapshot.pixels.len(), 64);
        assert_eq!(snapshot.owners.len(), 64);
        assert!(snapshot.pixels.iter().all(|c| c.as_str() == "#f8fafc"));
        assert!(snapshot.owners.iter().all(Option::is_none));
    }

    #[test]
    fn test_paint_lands_at_row_major_index() {
        let mut board = Board::new(4, color("#000000"));
        board.apply_paint(3, 1, color("#ff0000"), owner("Ada"));

        let snapshot = board.snapshot();
        let index = 4 + 3;
        assert_eq!(snapshot.pixels[index].as_str(), "#ff0000");
        assert_eq!(snapshot.owners[index], Some(owner("Ada")));
        assert_eq!(
            snapshot.pixels.iter().filter(|c| c.as_str() == "#ff0000").count(),
            1
        );

        let (c, o) = board.cell(3, 1).unwrap();
        assert_eq!(c.as_str(), "#ff0000");
        assert_eq!(o, Some(&owner("Ada")));
    }

    #[test]
    fn test_repaint_replaces_owner() {
        let mut board = Board::new(2, color("#000000"));
        board.apply_paint(0, 0, color("#111111"), owner("Ada"));
        board.apply_paint(0, 0, color("#222222"), owner("Bob"));

        let (c, o) = board.cell(0, 0).unwrap();
        assert_eq!(c.as_str(), "#222222");
        assert_eq!(o.map(|o| o.name.as_str()), Some("Bob"));
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut board = Board::new(2, color("#000000"));
        let mut snapshot = board.snapshot();
        snapshot.pixels[0] = color("#ffffff");
        snapshot.owners[0] = Some(owner("Mallory"));

        assert_eq!(board.cell(0, 0).unwrap().0.as_str(), "#000000");

        board.apply_paint(1, 1, color("#abcdef"), owner("Ada"));
        assert_eq!(snapshot.pixels[3].as_str(), "#000000");
    }

    #[test]
    fn test_contains_bounds() {
        let board = Board::new(64, color("#000000"));
        assert!(board.contains(0, 0));
        assert!(board.contains(63, 63));
        assert!(!board.contains(-1, 0));
        assert!(!board.contains(0, 64));
        assert!(!board.contains(64, 0));
        assert!(board.cell(64, 0).is_none());
    }
}
