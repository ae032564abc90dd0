use grid_search::*;
use rand::prelude::*;

/// Reference cheapest cost by repeated relaxation over the whole grid.
fn reference_cost(grid: &Grid) -> Option<u64> {
    let start = grid.start()?;
    let goal = grid.goal()?;
    let cells = grid.cells().collect::<Vec<Cell>>();
    let ix = |c: Cell| c.row * grid.cols() + c.col;
    let mut dist = vec![u64::MAX; cells.len()];
    dist[ix(start)] = 0;
    let mut changed = true;
    while changed {
        changed = false;
        for &cell in &cells {
            if grid.is_obstacle(cell) || dist[ix(cell)] == u64::MAX {
                continue;
            }
            for n in grid.passable_neighbors(cell) {
                let candidate = dist[ix(cell)] + u64::from(grid.weight(n));
                if candidate < dist[ix(n)] {
                    dist[ix(n)] = candidate;
                    changed = true;
                }
            }
        }
    }
    (dist[ix(goal)] != u64::MAX).then(|| dist[ix(goal)])
}

#[test]
fn cost_file_scenario() {
    let mut grid = Grid::new(3, 3).unwrap();
    grid.set_start(Cell::new(0, 0)).unwrap();
    grid.set_goal(Cell::new(2, 2)).unwrap();
    grid.load_costs("6 5 1\n1 8 5\n2 8 1").unwrap();
    let expected = reference_cost(&grid).unwrap();
    assert_eq!(expected, 12);
    for strategy in [Strategy::Dijkstra, Strategy::AStar] {
        let result = grid.search(strategy).unwrap();
        assert_eq!(result.cost, expected);
        assert_eq!(grid.path_cost(&result.path), expected);
    }
}

#[test]
fn round_trip_generated_costs() {
    let mut rng = StdRng::seed_from_u64(11);
    for (rows, cols) in [(1, 1), (19, 19), (4, 13)] {
        let config = CostConfig {
            rows,
            cols,
            ..CostConfig::default()
        };
        let matrix = generate_costs(&config, &mut rng).unwrap();
        let mut buffer = Vec::new();
        write_costs(&matrix, &mut buffer).unwrap();
        assert_eq!(read_costs(buffer.as_slice(), rows, cols).unwrap(), matrix);
    }
}

#[test]
fn wrong_row_count_is_rejected() {
    let mut rng = StdRng::seed_from_u64(12);
    let matrix = generate_costs(&CostConfig::default(), &mut rng).unwrap();
    let text = matrix.to_string();
    let mut grid = Grid::new(20, 19).unwrap();
    assert_eq!(
        grid.load_costs(&text),
        Err(SearchError::DimensionMismatch {
            expected: (20, 19),
            found: (19, 19)
        })
    );
    assert!(!grid.is_weighted());
}

#[test]
fn fuzz_weighted() {
    const N_GRIDS: usize = 1000;
    let mut rng = StdRng::seed_from_u64(13);
    let config = CostConfig {
        rows: 8,
        cols: 8,
        ..CostConfig::default()
    };
    for _ in 0..N_GRIDS {
        let mut grid = Grid::new(config.rows, config.cols).unwrap();
        for cell in grid.cells() {
            grid.set_obstacle(cell, rng.gen_bool(0.25)).unwrap();
        }
        let start = Cell::new(rng.gen_range(0..8), rng.gen_range(0..8));
        let goal = Cell::new(rng.gen_range(0..8), rng.gen_range(0..8));
        if start == goal {
            continue;
        }
        grid.set_obstacle(start, false).unwrap();
        grid.set_obstacle(goal, false).unwrap();
        grid.set_start(start).unwrap();
        grid.set_goal(goal).unwrap();
        grid.set_weights(generate_costs(&config, &mut rng).unwrap())
            .unwrap();

        let expected = reference_cost(&grid);
        let dijkstra = grid.search(Strategy::Dijkstra).unwrap();
        let astar = grid.search(Strategy::AStar).unwrap();
        assert_eq!(dijkstra.found, expected.is_some());
        assert_eq!(astar.found, expected.is_some());
        if let Some(expected) = expected {
            if astar.cost != expected {
                print!("{grid}");
                println!("Dijkstra: {}; A*: {}", dijkstra.cost, astar.cost);
            }
            assert_eq!(dijkstra.cost, expected);
            assert_eq!(astar.cost, expected);
            for strategy in Strategy::ALL {
                let result = grid.search(strategy).unwrap();
                assert!(grid.is_valid_path(&result.path));
                assert!(result.cost >= expected);
            }
        }
    }
}
