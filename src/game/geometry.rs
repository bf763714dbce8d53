//! Toroidal coordinates and squared-radius neighbourhoods.
//!
//! Every radius in the game is a *squared* radius, so all distance
//! comparisons stay in integer arithmetic.

use serde::Serialize;

/// A normalized cell coordinate on the torus.
///
/// A `Coord` never stores the map dimensions; it only ever comes out of
/// a [`Torus`], which guarantees `x < width` and `y < height`. Coordinates
/// order row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Coord {
    /// Column.
    pub x: u16,
    /// Row.
    pub y: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

impl Ord for Coord {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// A raw offset between two cells. Offsets never wrap on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Offset {
    /// Column delta.
    pub dx: i32,
    /// Row delta.
    pub dy: i32,
}

impl Offset {
    /// Create a new offset.
    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Non-wrapping squared length `dx² + dy²`.
    ///
    /// Computed in 64 bits, which holds the norm of any `i32` pair.
    #[must_use]
    pub fn norm2(self) -> u64 {
        let dx = u64::from(self.dx.unsigned_abs());
        let dy = u64::from(self.dy.unsigned_abs());
        dx * dx + dy * dy
    }

    /// All offsets with `norm2() <= radius2`, scanning the
    /// `[-⌊√r⌋, ⌊√r⌋]²` window in row-major order.
    #[must_use]
    pub fn within(radius2: u32) -> Vec<Offset> {
        #[allow(clippy::cast_possible_wrap)]
        let reach = radius2.isqrt() as i32;
        let mut offsets = Vec::new();
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let offset = Offset::new(dx, dy);
                if offset.norm2() <= u64::from(radius2) {
                    offsets.push(offset);
                }
            }
        }
        offsets
    }
}

/// The dimensions of the wrapped battlefield.
///
/// All coordinate arithmetic goes through a `Torus`, so there is exactly
/// one source of truth for the modulus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Torus {
    width: u16,
    height: u16,
}

impl Torus {
    /// Create a torus of the given size.
    ///
    /// Returns `None` if either dimension is zero.
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Option<Self> {
        if width == 0 || height == 0 {
            None
        } else {
            Some(Self { width, height })
        }
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Normalize an arbitrary signed pair onto the torus.
    ///
    /// Negative inputs wrap around (`-1` becomes `width - 1`).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn wrap(&self, x: i64, y: i64) -> Coord {
        let x = x.rem_euclid(i64::from(self.width));
        let y = y.rem_euclid(i64::from(self.height));
        Coord::new(x as u16, y as u16)
    }

    /// Apply an offset to a coordinate, wrapping the result.
    #[must_use]
    pub fn translate(&self, coord: Coord, offset: Offset) -> Coord {
        self.wrap(
            i64::from(coord.x) + i64::from(offset.dx),
            i64::from(coord.y) + i64::from(offset.dy),
        )
    }

    /// Squared wrapped distance between two coordinates.
    ///
    /// Each axis uses the shorter way around the torus.
    #[must_use]
    pub fn distance2(&self, a: Coord, b: Coord) -> u32 {
        let dx = a.x.abs_diff(b.x);
        let dy = a.y.abs_diff(b.y);
        let wx = u32::from(dx.min(self.width - dx));
        let wy = u32::from(dy.min(self.height - dy));
        wx * wx + wy * wy
    }

    /// Distinct cells within `offsets` of `center`.
    ///
    /// On maps narrower than the offset window two offsets can land on
    /// the same cell; each cell is still yielded only once.
    #[must_use]
    pub fn cells_around(&self, center: Coord, offsets: &[Offset]) -> Vec<Coord> {
        let mut cells: Vec<Coord> = offsets
            .iter()
            .map(|&offset| self.translate(center, offset))
            .collect();
        if self.window_overlaps(offsets) {
            cells.sort_unstable();
            cells.dedup();
        }
        cells
    }

    /// Distinct cells with offset `norm2 <= radius2` around `center`.
    #[must_use]
    pub fn within(&self, center: Coord, radius2: u32) -> Vec<Coord> {
        self.cells_around(center, &Offset::within(radius2))
    }

    /// Whether the offset window is wide enough to wrap onto itself.
    fn window_overlaps(&self, offsets: &[Offset]) -> bool {
        let reach = offsets
            .iter()
            .map(|o| o.dx.unsigned_abs().max(o.dy.unsigned_abs()))
            .max()
            .unwrap_or(0);
        2 * reach + 1 > u32::from(self.width.min(self.height))
    }

    /// Iterate over every coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| Coord::new(x, y)))
    }

    /// Total number of cells.
    #[must_use]
    pub fn area(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}
