use grid_search::{maze, Cell, GridConfig, SearchEngine, SearchEvent, Strategy};

// Carves a 15x15 maze, places the start in the top-left corner and the goal in the
// bottom-right corner, then steps through every strategy. Output uses
// - # for walls
// - S and G for start and goal
// - v for visited cells, f for the remaining frontier and * for the path

fn main() {
    let mut grid = GridConfig { rows: 15, cols: 15 }.build().unwrap();
    grid.set_start(Cell::new(0, 0)).unwrap();
    grid.set_goal(Cell::new(14, 14)).unwrap();
    maze::generate(&mut grid, Cell::new(0, 0), 2024).unwrap();
    println!("{}", grid);

    for strategy in Strategy::ALL {
        let mut steps = 0;
        let result = {
            let mut engine = SearchEngine::new(&mut grid, strategy).unwrap();
            loop {
                match engine.next() {
                    Some(SearchEvent::Visited(_)) => steps += 1,
                    Some(SearchEvent::Finished(result)) => break result,
                    None => unreachable!("a run always ends with a result"),
                }
            }
        };
        println!("{strategy}: {steps} steps, path length {}", result.path_len());
        println!("{}", grid);
    }
}
