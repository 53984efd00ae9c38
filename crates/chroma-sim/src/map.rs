//! Map layout: the enemy path and the build grid around it.

use std::collections::HashSet;

use glam::Vec2;

use chroma_core::constants::CELL_SIZE;
use chroma_core::types::{self, GridCell, Vector2};

/// Ordered waypoints enemies walk from first to last.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    waypoints: Vec<Vector2>,
}

impl Path {
    /// Build a path. Returns `None` for fewer than two points or
    /// non-finite coordinates.
    pub fn new(waypoints: Vec<Vector2>) -> Option<Self> {
        if waypoints.len() < 2 || !waypoints.iter().all(|p| p.is_finite()) {
            return None;
        }
        Some(Self { waypoints })
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always false; a path holds at least two points.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn waypoints(&self) -> &[Vector2] {
        &self.waypoints
    }

    pub fn point(&self, index: usize) -> Vector2 {
        self.waypoints[index.min(self.waypoints.len() - 1)]
    }

    pub fn first(&self) -> Vector2 {
        self.waypoints[0]
    }

    pub fn last(&self) -> Vector2 {
        self.waypoints[self.waypoints.len() - 1]
    }

    /// Index of the final waypoint.
    pub fn last_index(&self) -> usize {
        self.waypoints.len() - 1
    }

    /// Start and end of the segment beginning at `index`.
    pub fn segment(&self, index: usize) -> (Vector2, Vector2) {
        (self.point(index), self.point(index + 1))
    }

    pub fn segment_length(&self, index: usize) -> f32 {
        let (start, end) = self.segment(index);
        types::distance(start, end)
    }

    pub fn total_length(&self) -> f32 {
        self.waypoints
            .windows(2)
            .map(|pair| types::distance(pair[0], pair[1]))
            .sum()
    }

    /// World position `progress` of the way along the segment at `index`.
    pub fn position_at(&self, index: usize, progress: f32) -> Vector2 {
        if index >= self.last_index() {
            return self.last();
        }
        let (start, end) = self.segment(index);
        types::lerp(start, end, progress)
    }
}

/// The playing field: a path plus the cells it makes unbuildable.
#[derive(Debug, Clone)]
pub struct GameMap {
    path: Path,
    path_cells: HashSet<GridCell>,
}

impl GameMap {
    pub fn new(path: Path) -> Self {
        let path_cells = trace_path_cells(&path);
        Self { path, path_cells }
    }

    /// Serpentine route across the 800x600 field, entering on the left and
    /// leaving through the bottom edge.
    pub fn default_map() -> Self {
        let waypoints = vec![
            Vec2::new(-20.0, 100.0),
            Vec2::new(620.0, 100.0),
            Vec2::new(620.0, 260.0),
            Vec2::new(140.0, 260.0),
            Vec2::new(140.0, 460.0),
            Vec2::new(740.0, 460.0),
            Vec2::new(740.0, 620.0),
        ];
        Self::new(Path { waypoints })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_path_cell(&self, cell: GridCell) -> bool {
        self.path_cells.contains(&cell)
    }

    /// On the grid and not under the path.
    pub fn is_buildable(&self, cell: GridCell) -> bool {
        cell.in_bounds() && !self.is_path_cell(cell)
    }
}

impl Default for GameMap {
    fn default() -> Self {
        Self::default_map()
    }
}

/// Collect every grid cell a path segment passes through by sampling
/// each segment at quarter-cell steps.
fn trace_path_cells(path: &Path) -> HashSet<GridCell> {
    let step = CELL_SIZE / 4.0;
    let mut cells = HashSet::new();
    for index in 0..path.last_index() {
        let (start, end) = path.segment(index);
        let samples = (types::distance(start, end) / step).ceil().max(1.0) as usize;
        for i in 0..=samples {
            let point = types::lerp(start, end, i as f32 / samples as f32);
            if let Some(cell) = GridCell::from_world(point) {
                cells.insert(cell);
            }
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_requires_two_points() {
        assert!(Path::new(vec![]).is_none());
        assert!(Path::new(vec![Vec2::ZERO]).is_none());
        assert!(Path::new(vec![Vec2::ZERO, Vec2::new(f32::INFINITY, 0.0)]).is_none());
        assert!(Path::new(vec![Vec2::ZERO, Vec2::X]).is_some());
    }

    #[test]
    fn test_path_lengths() {
        let path = Path::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(30.0, 40.0),
            Vec2::new(30.0, 40.0),
            Vec2::new(30.0, 100.0),
        ])
        .unwrap();
        assert_eq!(path.segment_length(0), 50.0);
        assert_eq!(path.segment_length(1), 0.0);
        assert_eq!(path.total_length(), 110.0);
        assert_eq!(path.position_at(2, 0.5), Vec2::new(30.0, 70.0));
        assert_eq!(path.position_at(3, 0.0), Vec2::new(30.0, 100.0));
    }

    #[test]
    fn test_default_map_blocks_path_cells() {
        let map = GameMap::default_map();
        // First leg runs along row 2.
        assert!(map.is_path_cell(GridCell::new(0, 2)));
        assert!(map.is_path_cell(GridCell::new(15, 2)));
        // Vertical leg down column 15.
        assert!(map.is_path_cell(GridCell::new(15, 4)));
        assert!(!map.is_buildable(GridCell::new(10, 2)));
        assert!(map.is_buildable(GridCell::new(10, 4)));
        assert!(!map.is_buildable(GridCell::new(-1, 4)));
        assert!(!map.is_buildable(GridCell::new(20, 4)));
    }

    #[test]
    fn test_default_map_total_length() {
        let map = GameMap::default_map();
        let expected = 640.0 + 160.0 + 480.0 + 200.0 + 600.0 + 160.0;
        assert!((map.path().total_length() - expected).abs() < 1e-3);
    }
}
