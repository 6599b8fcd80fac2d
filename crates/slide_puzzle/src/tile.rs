use bevy::prelude::*;
use puzzle_helpers::{WINDOW_HEIGHT, WINDOW_WIDTH};

/// Pixels per second a sliding tile travels.
pub const SLIDE_SPEED: f32 = 500.0;

const BORDER_THICKNESS: i32 = 6;

/// Sprite carrying one numbered tile.
#[derive(Component, Clone, Copy)]
pub struct TileFace {
    pub number: u8,
}

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

/// Top-left pixel position of a tile in screen space (y grows downward).
/// Kept in integers so arrival at a slide target is exact equality.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenPos(pub IVec2);

/// Present on the single tile currently sliding toward the empty slot.
/// `debt` carries the fractional pixel budget between frames.
#[derive(Component, Debug)]
pub struct Sliding {
    pub target: IVec2,
    pub debt: f32,
}

/// Integer pixel geometry of the puzzle screen: a stopwatch row, N tile
/// rows and a menu-button row stacked with fixed borders in between.
#[derive(Resource, Clone, Copy, Debug)]
pub struct BoardLayout {
    size: usize,
    tile_width: i32,
    tile_height: i32,
}

impl BoardLayout {
    pub fn new(size: usize) -> Self {
        let columns = size as i32;
        let rows = size as i32 + 2;
        Self {
            size,
            tile_width: (WINDOW_WIDTH as i32 - (columns + 1) * BORDER_THICKNESS) / columns,
            tile_height: (WINDOW_HEIGHT as i32 - (rows + 1) * BORDER_THICKNESS) / rows,
        }
    }

    pub const fn tile_size(&self) -> IVec2 {
        IVec2::new(self.tile_width, self.tile_height)
    }

    /// Top-left pixel of the grid cell at (row, col). Row 0 sits below the
    /// stopwatch row.
    pub const fn cell_origin(&self, row: usize, col: usize) -> IVec2 {
        let row = row as i32;
        let col = col as i32;
        IVec2::new(
            BORDER_THICKNESS * (col + 1) + self.tile_width * col,
            self.tile_height * (row + 1) + BORDER_THICKNESS * (row + 2),
        )
    }

    /// Full-width rectangle above the grid holding the stopwatch.
    pub const fn stopwatch_rect(&self) -> (IVec2, IVec2) {
        (
            IVec2::new(BORDER_THICKNESS, BORDER_THICKNESS),
            IVec2::new(
                WINDOW_WIDTH as i32 - 2 * BORDER_THICKNESS,
                self.tile_height,
            ),
        )
    }

    /// Full-width rectangle below the grid holding the menu button.
    pub const fn menu_button_rect(&self) -> (IVec2, IVec2) {
        let origin = self.cell_origin(self.size, 0);
        (
            IVec2::new(BORDER_THICKNESS, origin.y),
            IVec2::new(
                WINDOW_WIDTH as i32 - 2 * BORDER_THICKNESS,
                self.tile_height,
            ),
        )
    }

    /// Label size that leaves a fixed margin inside a tile.
    pub const fn font_size(&self) -> f32 {
        let size = self.tile_height - 40;
        if size < 12 { 12.0 } else { size as f32 }
    }
}

/// One pixel of movement toward `target`: the horizontal axis is fully
/// resolved before the vertical one. Returns `pos` unchanged once there.
pub const fn step_towards(pos: IVec2, target: IVec2) -> IVec2 {
    if pos.x != target.x {
        IVec2::new(pos.x + (target.x - pos.x).signum(), pos.y)
    } else if pos.y != target.y {
        IVec2::new(pos.x, pos.y + (target.y - pos.y).signum())
    } else {
        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stepping_terminates_without_overshoot() {
        let start = IVec2::new(3, -7);
        let target = IVec2::new(40, 15);
        let expected_steps = (target.x - start.x).abs() + (target.y - start.y).abs();

        let mut pos = start;
        let mut steps = 0;
        let mut distance = expected_steps;
        while pos != target {
            pos = step_towards(pos, target);
            steps += 1;
            let remaining = (target.x - pos.x).abs() + (target.y - pos.y).abs();
            assert!(remaining < distance, "every step must close the distance");
            distance = remaining;
            assert!(steps <= expected_steps, "stepping must not overshoot");
        }
        assert_eq!(steps, expected_steps);
        assert_eq!(
            step_towards(pos, target),
            target,
            "stepping at the target must hold position"
        );
    }

    #[test]
    fn horizontal_axis_resolves_first() {
        let start = IVec2::new(0, 0);
        let target = IVec2::new(5, 5);
        let mut pos = start;
        while pos.x != target.x {
            assert_eq!(pos.y, start.y, "y must not move while x is unresolved");
            pos = step_towards(pos, target);
        }
        while pos != target {
            assert_eq!(pos.x, target.x, "x must stay put once resolved");
            pos = step_towards(pos, target);
        }
    }

    #[test]
    fn layout_spaces_cells_by_tile_plus_border() {
        for size in 3..=5 {
            let layout = BoardLayout::new(size);
            let tile = layout.tile_size();
            assert!(tile.x > 0 && tile.y > 0);

            let a = layout.cell_origin(0, 0);
            let b = layout.cell_origin(0, 1);
            let c = layout.cell_origin(1, 0);
            assert_eq!(b.x - a.x, tile.x + BORDER_THICKNESS);
            assert_eq!(c.y - a.y, tile.y + BORDER_THICKNESS);

            // Grid fits between the stopwatch row and the menu button row.
            let (stopwatch_origin, stopwatch_size) = layout.stopwatch_rect();
            assert!(a.y >= stopwatch_origin.y + stopwatch_size.y);
            let (button_origin, _) = layout.menu_button_rect();
            let last = layout.cell_origin(size - 1, size - 1);
            assert!(button_origin.y >= last.y + tile.y);
        }
    }
}
