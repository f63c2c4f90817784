use core::ops::RangeInclusive;

/// Single coordinate axis used for the board side length and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Grid position as `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

/// Number of cells on a square board with side `side`.
pub const fn square(side: Coord) -> CellCount {
    let side = side as CellCount;
    side.saturating_mul(side)
}

pub const fn in_bounds((row, col): Coord2, side: Coord) -> bool {
    row < side && col < side
}

/// Chebyshev distance of at most one, so `a == b` is within reach too.
pub const fn within_reach(a: Coord2, b: Coord2) -> bool {
    a.0.abs_diff(b.0) <= 1 && a.1.abs_diff(b.1) <= 1
}

fn clipped_span(center: Coord, side: Coord) -> RangeInclusive<Coord> {
    let last = side.saturating_sub(1);
    center.saturating_sub(1)..=center.saturating_add(1).min(last)
}

/// The 3x3 block around `center`, clipped to the grid, `center` included.
pub fn block(center: Coord2, side: Coord) -> impl Iterator<Item = Coord2> {
    let cols = clipped_span(center.1, side);
    clipped_span(center.0, side).flat_map(move |row| cols.clone().map(move |col| (row, col)))
}

/// The clipped 8-neighborhood of `center`.
pub fn neighbors(center: Coord2, side: Coord) -> impl Iterator<Item = Coord2> {
    block(center, side).filter(move |&pos| pos != center)
}

/// Every position of a square board in row-major order.
pub fn iter_coords(side: Coord) -> impl Iterator<Item = Coord2> {
    (0..side).flat_map(move |row| (0..side).map(move |col| (row, col)))
}
