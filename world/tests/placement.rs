use frostmaul_core::{CellCoord, CellState, Command, Event, GridConfig, PlacementError};
use frostmaul_world::{self as world, query, World};
use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

fn place(world: &mut World, cell: CellCoord) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::PlaceObstacle { cell }, &mut events);
    events
}

fn entry_reaches_exit(world: &World) -> bool {
    let path = query::trace_path(world);
    path.first() == Some(&query::entry(world)) && path.last() == Some(&query::exit(world))
}

#[test]
fn narrow_corridor_rejects_blocking_the_middle() {
    let mut world = World::new(&GridConfig::centered(3, 3)).expect("valid layout");
    let _ = place(&mut world, CellCoord::new(0, 1));
    let _ = place(&mut world, CellCoord::new(2, 1));

    assert!(!query::is_placement_valid(&world, CellCoord::new(1, 1)));
    let events = place(&mut world, CellCoord::new(1, 1));

    assert_eq!(
        events,
        vec![Event::PlacementRejected {
            cell: CellCoord::new(1, 1),
            reason: PlacementError::WouldBlockPath,
        }],
    );
    assert_eq!(query::state(&world, CellCoord::new(1, 1)), CellState::Open);
}

#[test]
fn open_side_columns_accept_the_middle_and_reroute() {
    let mut world = World::new(&GridConfig::centered(3, 3)).expect("valid layout");
    let middle = CellCoord::new(1, 1);

    assert!(query::is_placement_valid(&world, middle));
    let events = place(&mut world, middle);
    assert!(events.contains(&Event::ObstaclePlaced { cell: middle }));

    let field = query::flow_field(&world);
    assert_eq!(field.distance(middle), None);
    assert_eq!(field.distance(query::entry(&world)), Some(4));
    let path = query::trace_path(&world);
    assert!(!path.contains(&middle), "path {path:?} must avoid the obstacle");
    assert!(entry_reaches_exit(&world));
}

#[test]
fn sealing_the_exit_on_a_single_path_grid_is_rejected() {
    let mut world = World::new(&GridConfig::centered(3, 5)).expect("valid layout");

    for row in 0..5 {
        let _ = place(&mut world, CellCoord::new(0, row));
        let _ = place(&mut world, CellCoord::new(2, row));
    }
    assert_eq!(query::occupied_cells(&world).len(), 10);
    assert_eq!(query::path_length(&world), 5);

    let next_to_exit = CellCoord::new(1, 3);
    assert!(query::is_buildable(&world, next_to_exit));
    assert_eq!(
        query::placement_error(&world, next_to_exit),
        Some(PlacementError::WouldBlockPath)
    );
}

#[test]
fn approved_placements_never_disconnect_entry_and_exit() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed_f00d);
    let config = GridConfig::default();
    let mut world = World::new(&config).expect("valid layout");
    let columns = i32::try_from(config.columns).expect("columns fit");
    let rows = i32::try_from(config.rows).expect("rows fit");
    let mut placed = 0;

    for _ in 0..400 {
        let cell = CellCoord::new(rng.gen_range(0..columns), rng.gen_range(0..rows));
        if !query::is_buildable(&world, cell) {
            continue;
        }

        let approved = query::is_placement_valid(&world, cell);
        let events = place(&mut world, cell);
        let committed = events.contains(&Event::ObstaclePlaced { cell });
        assert_eq!(approved, committed, "validator and world disagree on {cell:?}");

        if committed {
            placed += 1;
        }
        assert!(
            entry_reaches_exit(&world),
            "route lost after placing {cell:?}"
        );
    }

    assert!(placed > 20, "expected a dense maze, placed only {placed}");
}

#[test]
fn every_reachable_cell_walks_to_the_exit_in_random_mazes() {
    for seed in 0..8_u64 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut world = World::new(&GridConfig::centered(12, 10)).expect("valid layout");

        for _ in 0..60 {
            let cell = CellCoord::new(rng.gen_range(0..12), rng.gen_range(0..10));
            let _ = place(&mut world, cell);
        }

        let grid = query::grid(&world);
        let field = query::flow_field(&world);
        let budget = grid.cell_count();

        for row in 0..10 {
            for column in 0..12 {
                let start = CellCoord::new(column, row);
                if !field.is_reachable(start) {
                    assert_eq!(field.heading(start), None);
                    continue;
                }

                let mut current = start;
                let mut steps = 0;
                while let Some(direction) = field.heading(current) {
                    current = current.step(direction);
                    steps += 1;
                    assert!(steps <= budget, "seed {seed}: walk from {start:?} loops");
                }
                assert_eq!(current, grid.exit(), "seed {seed}: walk from {start:?} stalled");
            }
        }
    }
}

#[test]
fn repeated_validation_without_mutation_agrees() {
    let mut world = World::new(&GridConfig::centered(5, 5)).expect("valid layout");
    let _ = place(&mut world, CellCoord::new(1, 2));
    let _ = place(&mut world, CellCoord::new(3, 2));

    for row in 1..4 {
        for column in 0..5 {
            let cell = CellCoord::new(column, row);
            assert_eq!(
                query::is_placement_valid(&world, cell),
                query::is_placement_valid(&world, cell),
            );
        }
    }
}
