/// A dense 2D grid stored row-major. Grids never wrap:
/// lookups outside `0..width` / `0..height` are simply out of bounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

/// 4-connected neighbour offsets (left, right, down, up).
pub const CARDINAL_OFFSETS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// 8-connected neighbour offsets, scanned x-outer / y-inner like the grid itself.
pub const MOORE_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Wrap existing row-major data. `data.len()` must equal `width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Self {
        assert_eq!(data.len(), width * height, "tilemap data does not match {}x{}", width, height);
        Self { width, height, data }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height, "({}, {}) outside {}x{}", x, y, self.width, self.height);
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether a signed coordinate lies inside the map.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Lookup with signed coordinates; `None` outside the map.
    pub fn get_signed(&self, x: i32, y: i32) -> Option<&T> {
        if self.in_bounds(x, y) {
            Some(self.get(x as usize, y as usize))
        } else {
            None
        }
    }

    /// Whether the cell sits on the outermost ring of the map.
    pub fn is_perimeter(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height
    }

    /// In-bounds 4-connected neighbours (no wrapping).
    pub fn neighbors(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        let mut result = Vec::with_capacity(4);
        for (dx, dy) in CARDINAL_OFFSETS {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if self.in_bounds(nx, ny) {
                result.push((nx as usize, ny as usize));
            }
        }
        result
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| (idx % width, idx / width, val))
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data
            .iter_mut()
            .enumerate()
            .map(move |(idx, val)| (idx % width, idx / width, val))
    }

    /// Coordinates in the x-outer / y-inner order every cave stage scans in.
    pub fn coords_column_major(&self) -> impl Iterator<Item = (usize, usize)> {
        let height = self.height;
        (0..self.width).flat_map(move |x| (0..height).map(move |y| (x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_horizontal_wrap() {
        let map = Tilemap::new_with(4, 3, 0u8);
        assert_eq!(map.neighbors(0, 0), vec![(1, 0), (0, 1)]);
        assert_eq!(map.neighbors(3, 2).len(), 2);
        assert_eq!(map.neighbors(1, 1).len(), 4);
        assert!(map.get_signed(-1, 0).is_none());
        assert!(map.get_signed(4, 0).is_none());
    }

    #[test]
    fn test_iter_coordinates() {
        let mut map = Tilemap::new_with(3, 2, 0usize);
        for (x, y, v) in map.iter_mut() {
            *v = x * 10 + y;
        }
        assert_eq!(*map.get(2, 1), 21);
        let coords: Vec<_> = map.coords_column_major().collect();
        assert_eq!(coords[..3], [(0, 0), (0, 1), (1, 0)]);
    }

    #[test]
    fn test_perimeter() {
        let map = Tilemap::new_with(5, 4, 0u8);
        assert!(map.is_perimeter(0, 2));
        assert!(map.is_perimeter(4, 1));
        assert!(map.is_perimeter(2, 3));
        assert!(!map.is_perimeter(2, 2));
    }
}
