//! Maze layout properties over many seeds, checked both on the raw
//! generator output and on the walls a spawned map registers.

use fastrand::Rng;

use snakeduel::entities::gamemap::{GameMap, MapConfig};
use snakeduel::game::Game;
use snakeduel::resources::rng::ScriptedSource;
use snakeduel::systems::maze::{self, MazeError, MazeParams, OccupancyGrid};
use snakeduel::systems::scheduler::Scheduler;

fn params(config: &MapConfig) -> MazeParams {
    let [a, b] = config.start_cells();
    MazeParams {
        rows: config.rows,
        cols: config.cols,
        inner_walls: config.inner_walls,
        starts: [(a.row, a.col), (b.row, b.col)],
    }
}

fn assert_layout(grid: &OccupancyGrid, config: &MapConfig) {
    let (rows, cols) = (config.rows, config.cols);
    for r in 0..rows {
        assert!(grid.is_occupied(r, 0) && grid.is_occupied(r, cols - 1));
    }
    for c in 0..cols {
        assert!(grid.is_occupied(0, c) && grid.is_occupied(rows - 1, c));
    }
    for r in 0..rows {
        for c in 0..cols {
            let (mr, mc) = grid.mirror(r, c);
            assert_eq!(grid.is_occupied(r, c), grid.is_occupied(mr, mc));
        }
    }
    let [a, b] = config.start_cells();
    assert!(!grid.is_occupied(a.row, a.col));
    assert!(!grid.is_occupied(b.row, b.col));
    assert!(maze::is_reachable(grid, (a.row, a.col), (b.row, b.col)));
}

#[test]
fn default_layouts_are_bordered_symmetric_and_connected() {
    let config = MapConfig::default();
    for seed in 0..100 {
        let mut rng = Rng::with_seed(seed);
        let grid = maze::generate(&params(&config), &mut rng).unwrap();
        assert_layout(&grid, &config);
        let border = 2 * config.rows + 2 * config.cols - 4;
        let inner = grid.occupied_count() as i32 - border;
        assert!(inner % 2 == 0 && inner <= 2 * config.inner_walls as i32);
    }
}

#[test]
fn same_seed_same_layout() {
    let config = MapConfig::default();
    let a = maze::generate(&params(&config), &mut Rng::with_seed(7)).unwrap();
    let b = maze::generate(&params(&config), &mut Rng::with_seed(7)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn spawned_map_matches_its_layout() {
    let config = MapConfig::default();
    for seed in 0..20 {
        let expected = maze::generate(&params(&config), &mut Rng::with_seed(seed)).unwrap();

        let mut scheduler = Scheduler::new();
        let map = GameMap::spawn(&mut scheduler, config, &mut Rng::with_seed(seed)).unwrap();
        let map = map.borrow();

        assert_eq!(map.wall_count(), expected.occupied_count());
        assert_eq!(
            map.wall_cells().collect::<Vec<_>>(),
            expected.occupied().collect::<Vec<_>>()
        );
        assert_eq!(scheduler.len(), 3 + map.wall_count());
    }
}

#[test]
fn regenerating_walls_replaces_them() {
    let config = MapConfig::default();
    let mut scheduler = Scheduler::new();
    let map = GameMap::spawn(&mut scheduler, config, &mut Rng::with_seed(1)).unwrap();
    let before = scheduler.len();

    let count = map
        .borrow_mut()
        .generate_walls(&mut scheduler, &mut Rng::with_seed(2))
        .unwrap();
    assert_eq!(scheduler.len(), 3 + count);
    assert!(before >= 3);
    assert_eq!(map.borrow().object_ids().len(), scheduler.len());
}

#[test]
fn unsolvable_parameters_register_nothing() {
    let config = MapConfig {
        rows: 2,
        cols: 6,
        inner_walls: 0,
        snake_speed: 5.0,
    };
    let mut scheduler = Scheduler::new();
    let err = GameMap::spawn(&mut scheduler, config, &mut ScriptedSource::new(vec![0]))
        .err()
        .unwrap();
    assert!(matches!(err, MazeError::Unsolvable { rows: 2, cols: 6, .. }));
    assert!(scheduler.is_empty());
}

#[test]
fn oversized_grid_is_an_error_not_a_panic() {
    let config = MapConfig {
        rows: 50_000,
        cols: 50_000,
        inner_walls: 10,
        snake_speed: 5.0,
    };
    let err = Game::new(config, &mut Rng::with_seed(1)).err().unwrap();
    assert_eq!(
        err,
        MazeError::GridTooLarge {
            rows: 50_000,
            cols: 50_000
        }
    );
}
