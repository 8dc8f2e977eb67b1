use std::collections::HashSet;

use cave_generator::generator::generate_grid;
use cave_generator::grid::{random_fill, CaveGrid, Tile};
use cave_generator::params::{CaveParams, EdgeTileRule, SmoothingMode};
use cave_generator::regions::{get_regions, process_regions, Coord};
use cave_generator::rooms::{accessible_from_main, connect_closest_rooms, ConnectOptions};
use cave_generator::seeds::CaveSeed;
use cave_generator::tilemap::Tilemap;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn arb_grid() -> impl Strategy<Value = CaveGrid> {
    (1usize..20, 1usize..20).prop_flat_map(|(w, h)| {
        prop::collection::vec(any::<bool>(), w * h).prop_map(move |cells| {
            let tiles = cells.into_iter().map(|wall| if wall { Tile::Wall } else { Tile::Open }).collect();
            Tilemap::from_vec(w, h, tiles)
        })
    })
}

fn arb_smoothing() -> impl Strategy<Value = SmoothingMode> {
    prop_oneof![Just(SmoothingMode::InPlace), Just(SmoothingMode::DoubleBuffered)]
}

fn arb_edge_rule() -> impl Strategy<Value = EdgeTileRule> {
    prop_oneof![Just(EdgeTileRule::Adjacent), Just(EdgeTileRule::Cumulative)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    // Regions of a tag are disjoint and together cover exactly the cells with that tag.
    #[test]
    fn regions_partition_tag_cells(grid in arb_grid()) {
        for tag in [Tile::Open, Tile::Wall] {
            let regions = get_regions(&grid, tag);
            let mut seen: HashSet<Coord> = HashSet::new();
            for region in &regions {
                prop_assert!(!region.is_empty());
                prop_assert_eq!(region.tag, tag);
                for &c in &region.tiles {
                    prop_assert_eq!(*grid.get(c.x, c.y), tag);
                    prop_assert!(seen.insert(c), "cell {:?} in two regions", c);
                }
            }
            let expected = grid.iter().filter(|(_, _, t)| **t == tag).count();
            prop_assert_eq!(seen.len(), expected);
        }
    }

    // Filling always walls the perimeter, and smoothing keeps it walled.
    #[test]
    fn perimeter_is_wall(
        w in 1usize..40,
        h in 1usize..40,
        fill in 0u32..=100,
        seed in any::<u64>(),
        passes in 0usize..4,
        mode in arb_smoothing(),
    ) {
        let mut grid = random_fill(w, h, fill, &mut ChaCha8Rng::seed_from_u64(seed));
        cave_generator::grid::smooth(&mut grid, passes, mode);
        for (x, y, t) in grid.iter() {
            if grid.is_perimeter(x, y) {
                prop_assert!(t.is_wall());
            }
        }
    }

    // Same parameters and seed always reproduce the same grid.
    #[test]
    fn grid_is_deterministic(seed in "[a-z0-9]{1,12}", fill in 30u32..60, mode in arb_smoothing()) {
        let params = CaveParams { width: 32, height: 24, fill_percent: fill, smoothing: mode, ..CaveParams::default() };
        let seed = CaveSeed::parse(&seed);
        prop_assert_eq!(generate_grid(&params, &seed), generate_grid(&params, &seed));
    }

    // After filtering, every open region is a room at least `room_threshold` big.
    #[test]
    fn filtered_open_regions_meet_threshold(
        seed in any::<u64>(),
        wall_threshold in 0usize..30,
        room_threshold in 0usize..30,
        rule in arb_edge_rule(),
    ) {
        let mut grid = random_fill(40, 30, 48, &mut ChaCha8Rng::seed_from_u64(seed));
        cave_generator::grid::smooth(&mut grid, 3, SmoothingMode::InPlace);
        let (rooms, _) = process_regions(&mut grid, wall_threshold, room_threshold, rule);
        let open = get_regions(&grid, Tile::Open);
        prop_assert_eq!(open.len(), rooms.len());
        for region in &open {
            prop_assert!(region.len() >= room_threshold);
        }
        for room in &rooms {
            let tiles: HashSet<Coord> = room.tiles.iter().copied().collect();
            prop_assert!(room.edge_tiles.iter().all(|c| tiles.contains(c)));
        }
    }

    // Wall regions under the wall threshold are opened. A tile from one of them
    // only ends up wall again when the open region it joined was itself too small.
    #[test]
    fn small_wall_regions_are_opened(
        seed in any::<u64>(),
        wall_threshold in 0usize..30,
        room_threshold in 0usize..30,
        rule in arb_edge_rule(),
    ) {
        let mut grid = random_fill(40, 30, 48, &mut ChaCha8Rng::seed_from_u64(seed));
        cave_generator::grid::smooth(&mut grid, 3, SmoothingMode::InPlace);
        let before = grid.clone();
        let small: Vec<_> = get_regions(&before, Tile::Wall)
            .into_iter()
            .filter(|r| r.len() < wall_threshold)
            .collect();

        let (_, stats) = process_regions(&mut grid, wall_threshold, room_threshold, rule);
        prop_assert_eq!(stats.wall_regions_removed, small.len());

        for region in &small {
            let first = *grid.get(region.tiles[0].x, region.tiles[0].y);
            prop_assert!(region.tiles.iter().all(|c| *grid.get(c.x, c.y) == first));
            if first.is_wall() {
                prop_assert!(region.len() < room_threshold);
            }
        }
    }

    // The accessibility pass leaves every room reachable from the main room,
    // and connections are symmetric.
    #[test]
    fn rooms_end_up_connected(seed in any::<u64>(), carve in any::<bool>()) {
        let mut grid = random_fill(48, 32, 50, &mut ChaCha8Rng::seed_from_u64(seed));
        cave_generator::grid::smooth(&mut grid, 2, SmoothingMode::InPlace);
        let (mut rooms, _) = process_regions(&mut grid, 4, 4, EdgeTileRule::Adjacent);
        let options = ConnectOptions { ensure_connectivity: true, carve_passages: carve, passage_radius: 1 };
        let passages = connect_closest_rooms(&mut rooms, &mut grid, options);

        prop_assert!(accessible_from_main(&rooms).iter().all(|&r| r));
        for room in &rooms {
            for other in &room.connected {
                prop_assert!(rooms[other.0].connected.contains(&room.id));
            }
        }
        for p in &passages {
            prop_assert!(rooms[p.room_a.0].is_connected(p.room_b));
        }
        for (x, y, t) in grid.iter() {
            if grid.is_perimeter(x, y) {
                prop_assert!(t.is_wall());
            }
        }
    }
}
