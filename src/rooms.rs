//! Rooms and the passages that join them
//!
//! A room is an open region that survived size filtering. Rooms are joined by
//! their closest pair of edge tiles:
//! - a greedy pass gives every unconnected room a link to its nearest neighbour
//! - an optional accessibility pass then links clusters back to the largest room
//!   until every room can be reached from it
//!
//! Each join can carve a straight passage through the grid.

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::grid::{CaveGrid, Tile};
use crate::params::{CaveParams, EdgeTileRule};
use crate::regions::Coord;
use crate::tilemap::{Tilemap, CARDINAL_OFFSETS};

/// Identity of a room: its index in the room list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub usize);

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub tiles: Vec<Coord>,
    pub edge_tiles: Vec<Coord>,
    pub connected: BTreeSet<RoomId>,
    pub is_main_room: bool,
}

impl Room {
    pub fn new(id: usize, tiles: Vec<Coord>, edges: &EdgeScan) -> Self {
        let edge_tiles = tiles.iter().copied().filter(|&c| edges.is_edge(c)).collect();
        Self {
            id: RoomId(id),
            tiles,
            edge_tiles,
            connected: BTreeSet::new(),
            is_main_room: false,
        }
    }

    pub fn size(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_connected(&self, other: RoomId) -> bool {
        self.connected.contains(&other)
    }
}

/// Edge-tile test for one grid, built once and shared by every room on it.
pub struct EdgeScan<'a> {
    grid: &'a CaveGrid,
    rule: EdgeTileRule,
    // Cumulative rule: wall somewhere in row y at columns 0..=x / in column x at rows 0..=y.
    row_prefix: Option<Tilemap<bool>>,
    col_prefix: Option<Tilemap<bool>>,
}

impl<'a> EdgeScan<'a> {
    pub fn new(grid: &'a CaveGrid, rule: EdgeTileRule) -> Self {
        let (row_prefix, col_prefix) = match rule {
            EdgeTileRule::Adjacent => (None, None),
            EdgeTileRule::Cumulative => {
                let mut rows = Tilemap::new_with(grid.width, grid.height, false);
                let mut cols = Tilemap::new_with(grid.width, grid.height, false);
                for y in 0..grid.height {
                    let mut seen = false;
                    for x in 0..grid.width {
                        seen |= grid.get(x, y).is_wall();
                        rows.set(x, y, seen);
                    }
                }
                for x in 0..grid.width {
                    let mut seen = false;
                    for y in 0..grid.height {
                        seen |= grid.get(x, y).is_wall();
                        cols.set(x, y, seen);
                    }
                }
                (Some(rows), Some(cols))
            }
        };
        Self {
            grid,
            rule,
            row_prefix,
            col_prefix,
        }
    }

    pub fn is_edge(&self, c: Coord) -> bool {
        match (self.rule, &self.row_prefix, &self.col_prefix) {
            (EdgeTileRule::Cumulative, Some(rows), Some(cols)) => *rows.get(c.x, c.y) || *cols.get(c.x, c.y),
            _ => CARDINAL_OFFSETS.iter().any(|&(dx, dy)| {
                self.grid
                    .get_signed(c.x as i32 + dx, c.y as i32 + dy)
                    .map_or(true, |t| t.is_wall())
            }),
        }
    }
}

/// A join between two rooms through their closest edge tiles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub room_a: RoomId,
    pub room_b: RoomId,
    pub tile_a: Coord,
    pub tile_b: Coord,
    pub distance_sq: u64,
}

/// How rooms get joined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConnectOptions {
    pub ensure_connectivity: bool,
    pub carve_passages: bool,
    pub passage_radius: usize,
}

impl From<&CaveParams> for ConnectOptions {
    fn from(p: &CaveParams) -> Self {
        Self {
            ensure_connectivity: p.ensure_connectivity,
            carve_passages: p.carve_passages,
            passage_radius: p.passage_radius,
        }
    }
}

/// Record a symmetric connection.
pub fn connect_rooms(rooms: &mut [Room], a: RoomId, b: RoomId) {
    rooms[a.0].connected.insert(b);
    rooms[b.0].connected.insert(a);
}

pub fn is_connected(rooms: &[Room], a: RoomId, b: RoomId) -> bool {
    rooms[a.0].is_connected(b)
}

/// Closest pair of edge tiles between two rooms. Ties keep the first pair found.
pub fn closest_tiles(a: &Room, b: &Room) -> Option<(Coord, Coord, u64)> {
    let mut best: Option<(Coord, Coord, u64)> = None;
    for &ta in &a.edge_tiles {
        for &tb in &b.edge_tiles {
            let d = ta.distance_sq(tb);
            if best.map_or(true, |(_, _, bd)| d < bd) {
                best = Some((ta, tb, d));
            }
        }
    }
    best
}

/// Flag the largest room (first on ties) as the main room.
pub fn mark_main_room(rooms: &mut [Room]) -> Option<RoomId> {
    let mut main: Option<usize> = None;
    for (i, room) in rooms.iter().enumerate() {
        if main.map_or(true, |m| room.size() > rooms[m].size()) {
            main = Some(i);
        }
    }
    for (i, room) in rooms.iter_mut().enumerate() {
        room.is_main_room = Some(i) == main;
    }
    main.map(RoomId)
}

/// Rooms reachable from the main room over the connection graph.
pub fn accessible_from_main(rooms: &[Room]) -> Vec<bool> {
    let mut reachable = vec![false; rooms.len()];
    let mut queue: VecDeque<RoomId> = rooms.iter().filter(|r| r.is_main_room).map(|r| r.id).collect();
    for id in &queue {
        reachable[id.0] = true;
    }
    while let Some(id) = queue.pop_front() {
        for &next in &rooms[id.0].connected {
            if !reachable[next.0] {
                reachable[next.0] = true;
                queue.push_back(next);
            }
        }
    }
    reachable
}

/// Join the rooms and, if asked, carve passages into `grid`.
pub fn connect_closest_rooms(rooms: &mut [Room], grid: &mut CaveGrid, options: ConnectOptions) -> Vec<Passage> {
    let mut passages = Vec::new();
    mark_main_room(rooms);
    if rooms.len() < 2 {
        return passages;
    }

    // Greedy pass: each room without a link joins its nearest other room.
    for a in 0..rooms.len() {
        if !rooms[a].connected.is_empty() {
            continue;
        }
        let mut best: Option<(usize, Coord, Coord, u64)> = None;
        for b in 0..rooms.len() {
            if a == b || rooms[a].is_connected(RoomId(b)) {
                continue;
            }
            if let Some((ta, tb, d)) = closest_tiles(&rooms[a], &rooms[b]) {
                if best.map_or(true, |(_, _, _, bd)| d < bd) {
                    best = Some((b, ta, tb, d));
                }
            }
        }
        if let Some((b, ta, tb, d)) = best {
            passages.push(join(rooms, grid, options, RoomId(a), RoomId(b), ta, tb, d));
        }
    }

    if options.ensure_connectivity {
        // Globally closest unreachable/reachable pair, one join per round.
        loop {
            let reachable = accessible_from_main(rooms);
            if reachable.iter().all(|&r| r) {
                break;
            }
            let mut best: Option<(usize, usize, Coord, Coord, u64)> = None;
            for a in (0..rooms.len()).filter(|&i| !reachable[i]) {
                for b in (0..rooms.len()).filter(|&i| reachable[i]) {
                    if let Some((ta, tb, d)) = closest_tiles(&rooms[a], &rooms[b]) {
                        if best.map_or(true, |(_, _, _, _, bd)| d < bd) {
                            best = Some((a, b, ta, tb, d));
                        }
                    }
                }
            }
            let Some((a, b, ta, tb, d)) = best else {
                log::warn!("{} room(s) unreachable from the main room", reachable.iter().filter(|&&r| !r).count());
                break;
            };
            passages.push(join(rooms, grid, options, RoomId(a), RoomId(b), ta, tb, d));
        }
    }

    passages
}

#[allow(clippy::too_many_arguments)]
fn join(
    rooms: &mut [Room],
    grid: &mut CaveGrid,
    options: ConnectOptions,
    a: RoomId,
    b: RoomId,
    tile_a: Coord,
    tile_b: Coord,
    distance_sq: u64,
) -> Passage {
    connect_rooms(rooms, a, b);
    if options.carve_passages {
        carve_passage(grid, tile_a, tile_b, options.passage_radius);
    }
    log::debug!(
        "joined room {} -> room {} via ({}, {}) -> ({}, {}), d2={}",
        a.0, b.0, tile_a.x, tile_a.y, tile_b.x, tile_b.y, distance_sq
    );
    Passage {
        room_a: a,
        room_b: b,
        tile_a,
        tile_b,
        distance_sq,
    }
}

/// Open a disc of `radius` around every tile on the line from `from` to `to`.
/// The outermost ring of the grid is never opened. A zero radius walks a
/// 4-connected line so the passage still joins the two rooms.
pub fn carve_passage(grid: &mut CaveGrid, from: Coord, to: Coord, radius: usize) {
    let r = radius as i32;
    let path = if radius == 0 { cardinal_line_coords(from, to) } else { line_coords(from, to) };
    for c in path {
        for dx in -r..=r {
            for dy in -r..=r {
                if dx * dx + dy * dy > r * r {
                    continue;
                }
                let x = c.x as i32 + dx;
                let y = c.y as i32 + dy;
                if grid.in_bounds(x, y) && !grid.is_perimeter(x as usize, y as usize) {
                    grid.set(x as usize, y as usize, Tile::Open);
                }
            }
        }
    }
}

/// Bresenham's line algorithm, both endpoints included.
pub fn line_coords(from: Coord, to: Coord) -> Vec<Coord> {
    let mut path = Vec::new();

    let (x0, y0) = (from.x as i64, from.y as i64);
    let (x1, y1) = (to.x as i64, to.y as i64);
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let (mut x, mut y) = (x0, y0);
    loop {
        path.push(Coord::new(x as usize, y as usize));
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }

    path
}

/// [`line_coords`] with a corner tile inserted at every diagonal step, so
/// consecutive coordinates are always 4-adjacent.
pub fn cardinal_line_coords(from: Coord, to: Coord) -> Vec<Coord> {
    let line = line_coords(from, to);
    let mut path: Vec<Coord> = Vec::with_capacity(line.len() * 2);
    for c in line {
        if let Some(&prev) = path.last() {
            if prev.x != c.x && prev.y != c.y {
                path.push(Coord::new(c.x, prev.y));
            }
        }
        path.push(c);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::from_ascii;
    use crate::regions::{get_regions, process_regions};

    fn three_rooms() -> CaveGrid {
        from_ascii(
            "\
            ##############\n\
            #...##########\n\
            #...######...#\n\
            #...######...#\n\
            ##############\n\
            ##############\n\
            ##..##########\n\
            ##..##########\n\
            ##############\n",
        )
    }

    #[test]
    fn test_adjacent_edge_tiles() {
        let grid = three_rooms();
        let (rooms, _) = process_regions(&mut grid.clone(), 0, 0, EdgeTileRule::Adjacent);
        // 3x3 room: every tile but the centre touches a wall
        let big = rooms.iter().find(|r| r.size() == 9).unwrap();
        assert_eq!(big.edge_tiles.len(), 8);
        assert!(!big.edge_tiles.contains(&Coord::new(2, 6)));
    }

    #[test]
    fn test_cumulative_edge_tiles() {
        let grid = three_rooms();
        let (rooms, _) = process_regions(&mut grid.clone(), 0, 0, EdgeTileRule::Cumulative);
        // Column 0 and row 0 are wall, so every open tile qualifies.
        for room in &rooms {
            assert_eq!(room.edge_tiles.len(), room.size());
        }
    }

    #[test]
    fn test_cumulative_ignores_walls_after_tile() {
        let grid = from_ascii("....\n...#\n");
        let scan = EdgeScan::new(&grid, EdgeTileRule::Cumulative);
        // (3, 0) is the only wall: it sits after (2, 0) in the row, below (3, 1) in the column
        assert!(!scan.is_edge(Coord::new(2, 0)));
        assert!(scan.is_edge(Coord::new(3, 1)));
        assert!(!scan.is_edge(Coord::new(0, 1)));
    }

    #[test]
    fn test_connect_is_symmetric() {
        let mut grid = three_rooms();
        let (mut rooms, _) = process_regions(&mut grid, 0, 0, EdgeTileRule::Adjacent);
        assert!(!is_connected(&rooms, RoomId(0), RoomId(1)));
        connect_rooms(&mut rooms, RoomId(0), RoomId(1));
        assert!(is_connected(&rooms, RoomId(0), RoomId(1)));
        assert!(is_connected(&rooms, RoomId(1), RoomId(0)));
        assert!(!is_connected(&rooms, RoomId(0), RoomId(2)));
    }

    #[test]
    fn test_greedy_joins_nearest() {
        let mut grid = three_rooms();
        let (mut rooms, _) = process_regions(&mut grid, 0, 0, EdgeTileRule::Adjacent);
        assert_eq!(rooms.len(), 3);
        let options = ConnectOptions {
            ensure_connectivity: false,
            carve_passages: false,
            passage_radius: 1,
        };
        let before = grid.clone();
        let passages = connect_closest_rooms(&mut rooms, &mut grid, options);
        assert_eq!(grid, before);

        // Rooms in discovery order: big (x 1..3), small (x 2..3, low), right (x 10..12).
        let big = rooms.iter().position(|r| r.size() == 9).unwrap();
        let small = rooms.iter().position(|r| r.size() == 4).unwrap();
        let right = rooms.iter().position(|r| r.size() == 6).unwrap();
        assert!(rooms[big].is_main_room);
        assert!(is_connected(&rooms, RoomId(big), RoomId(small)));
        // The right room is far from both but still gets its nearest link (to big).
        assert!(is_connected(&rooms, RoomId(right), RoomId(big)));
        assert_eq!(passages.len(), 2);
    }

    #[test]
    fn test_accessibility_pass_links_clusters() {
        // Two pairs of rooms, each pair close together, the pairs far apart.
        let mut grid = from_ascii(
            "\
            ##################\n\
            #...#.##########.#\n\
            #...#.########.#.#\n\
            #...#.########.#.#\n\
            ##################\n",
        );
        let (mut rooms, _) = process_regions(&mut grid, 0, 0, EdgeTileRule::Adjacent);
        assert_eq!(rooms.len(), 4);

        let greedy_only = ConnectOptions {
            ensure_connectivity: false,
            carve_passages: false,
            passage_radius: 1,
        };
        let mut lonely = rooms.clone();
        connect_closest_rooms(&mut lonely, &mut grid.clone(), greedy_only);
        assert!(accessible_from_main(&lonely).iter().any(|&r| !r));

        let options = ConnectOptions { ensure_connectivity: true, ..greedy_only };
        let passages = connect_closest_rooms(&mut rooms, &mut grid, options);
        assert!(accessible_from_main(&rooms).iter().all(|&r| r));
        assert_eq!(passages.len(), 3);
    }

    #[test]
    fn test_carving_opens_line_but_not_perimeter() {
        let mut grid = CaveGrid::new_with(8, 5, Tile::Wall);
        carve_passage(&mut grid, Coord::new(1, 1), Coord::new(6, 1), 1);
        for x in 1..=6 {
            assert!(!grid.get(x, 1).is_wall());
            assert!(!grid.get(x, 2).is_wall());
            assert!(grid.get(x, 0).is_wall());
        }
        assert!(grid.get(0, 1).is_wall());
        assert!(grid.get(7, 1).is_wall());
        assert!(grid.get(3, 3).is_wall());
    }

    #[test]
    fn test_line_endpoints() {
        let line = line_coords(Coord::new(1, 1), Coord::new(5, 3));
        assert_eq!(line.first(), Some(&Coord::new(1, 1)));
        assert_eq!(line.last(), Some(&Coord::new(5, 3)));
        assert_eq!(line.len(), 5);
        let back = line_coords(Coord::new(5, 3), Coord::new(1, 1));
        assert_eq!(back.len(), 5);
        assert_eq!(line_coords(Coord::new(2, 2), Coord::new(2, 2)), vec![Coord::new(2, 2)]);
    }

    #[test]
    fn test_radius_zero_diagonal_passage_connects() {
        let mut grid = CaveGrid::new_with(8, 8, Tile::Wall);
        grid.set(1, 1, Tile::Open);
        grid.set(5, 5, Tile::Open);
        carve_passage(&mut grid, Coord::new(1, 1), Coord::new(5, 5), 0);
        assert_eq!(get_regions(&grid, Tile::Open).len(), 1);
        assert!(grid.get(0, 0).is_wall());
    }

    #[test]
    fn test_cardinal_line_steps_are_adjacent() {
        let line = cardinal_line_coords(Coord::new(6, 1), Coord::new(1, 4));
        assert_eq!(line.first(), Some(&Coord::new(6, 1)));
        assert_eq!(line.last(), Some(&Coord::new(1, 4)));
        for pair in line.windows(2) {
            let step = pair[0].x.abs_diff(pair[1].x) + pair[0].y.abs_diff(pair[1].y);
            assert_eq!(step, 1, "{:?} -> {:?}", pair[0], pair[1]);
        }
    }
}
