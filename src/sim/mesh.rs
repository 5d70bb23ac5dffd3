//! Cardinal mesh positions
//!
//! Two grid neighbors can only couple through the pair of tooth slots facing
//! their shared edge. Each cardinal direction maps to one slot index on the
//! gear's circle; coupling is tested at that slot on one gear and at the
//! opposite direction's slot on the neighbor. Slot indices are exact only when
//! the teeth count is divisible by 4.

/// One of the four canonical angular positions used to test mechanical
/// coupling with a grid neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshPosition {
    Right,
    Bottom,
    Left,
    Top,
}

impl MeshPosition {
    /// All four positions, in a fixed sweep order.
    pub const ALL: [MeshPosition; 4] = [
        MeshPosition::Right,
        MeshPosition::Bottom,
        MeshPosition::Left,
        MeshPosition::Top,
    ];

    /// Tooth slot index facing this direction, for a gear with `num_teeth`
    /// slots. Slot 0 is "right" by convention.
    #[inline]
    pub fn slot(self, num_teeth: usize) -> usize {
        match self {
            MeshPosition::Right => 0,
            MeshPosition::Bottom => num_teeth / 4,
            MeshPosition::Left => num_teeth / 2,
            MeshPosition::Top => 3 * num_teeth / 4,
        }
    }

    /// The position a neighbor presents back across the shared edge.
    #[inline]
    pub fn opposite(self) -> MeshPosition {
        match self {
            MeshPosition::Right => MeshPosition::Left,
            MeshPosition::Bottom => MeshPosition::Top,
            MeshPosition::Left => MeshPosition::Right,
            MeshPosition::Top => MeshPosition::Bottom,
        }
    }

    /// Grid coordinates of the neighbor in this direction, or `None` at the
    /// grid boundary. Rows grow downward, so `Top` is `row - 1`.
    #[inline]
    pub fn neighbor(
        self,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    ) -> Option<(usize, usize)> {
        match self {
            MeshPosition::Right => (col + 1 < cols).then(|| (row, col + 1)),
            MeshPosition::Bottom => (row + 1 < rows).then(|| (row + 1, col)),
            MeshPosition::Left => col.checked_sub(1).map(|c| (row, c)),
            MeshPosition::Top => row.checked_sub(1).map(|r| (r, col)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_for_eight_teeth() {
        assert_eq!(MeshPosition::Right.slot(8), 0);
        assert_eq!(MeshPosition::Bottom.slot(8), 2);
        assert_eq!(MeshPosition::Left.slot(8), 4);
        assert_eq!(MeshPosition::Top.slot(8), 6);
    }

    #[test]
    fn test_opposite_is_involution() {
        for pos in MeshPosition::ALL {
            assert_eq!(pos.opposite().opposite(), pos);
        }
    }

    #[test]
    fn test_neighbor_at_corner() {
        // Top-left corner of a 2x2 grid: only Right and Bottom exist
        assert_eq!(MeshPosition::Right.neighbor(0, 0, 2, 2), Some((0, 1)));
        assert_eq!(MeshPosition::Bottom.neighbor(0, 0, 2, 2), Some((1, 0)));
        assert_eq!(MeshPosition::Left.neighbor(0, 0, 2, 2), None);
        assert_eq!(MeshPosition::Top.neighbor(0, 0, 2, 2), None);
        // Bottom-right corner: only Left and Top exist
        assert_eq!(MeshPosition::Right.neighbor(1, 1, 2, 2), None);
        assert_eq!(MeshPosition::Bottom.neighbor(1, 1, 2, 2), None);
        assert_eq!(MeshPosition::Left.neighbor(1, 1, 2, 2), Some((1, 0)));
        assert_eq!(MeshPosition::Top.neighbor(1, 1, 2, 2), Some((0, 1)));
    }
}
