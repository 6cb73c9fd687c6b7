use std::time::Duration;

use frostmaul_core::{CellCoord, CellState, Command, GridConfig, Mobility, UnitId};
use frostmaul_system_movement::{steer, Movement, Walker};
use frostmaul_world::{self as world, query, World};
use glam::Vec2;

const TICK: Duration = Duration::from_millis(100);

fn world_with(columns: u32, rows: u32, obstacles: &[CellCoord]) -> World {
    let mut world = World::new(&GridConfig::centered(columns, rows)).expect("valid layout");
    let mut events = Vec::new();
    for cell in obstacles {
        world::apply(&mut world, Command::PlaceObstacle { cell: *cell }, &mut events);
    }
    assert_eq!(query::occupied_cells(&world).len(), obstacles.len());
    world
}

fn walker_at(world: &World, cell: CellCoord, mobility: Mobility) -> Walker {
    Walker::new(UnitId::new(1), query::cell_to_world(world, cell), 1.0, mobility)
}

#[test]
fn ground_units_follow_the_field() {
    let world = world_with(3, 3, &[]);
    let entry = query::cell_to_world(&world, query::entry(&world));

    assert_eq!(steer(&world, entry, Mobility::Ground), Vec2::new(0.0, -1.0));
}

#[test]
fn fliers_ignore_obstacles() {
    let world = world_with(3, 3, &[CellCoord::new(1, 1)]);
    let entry = query::cell_to_world(&world, query::entry(&world));

    assert_eq!(steer(&world, entry, Mobility::Ground), Vec2::new(1.0, 0.0));
    assert_eq!(steer(&world, entry, Mobility::Flying), Vec2::new(0.0, -1.0));
}

#[test]
fn ground_units_without_guidance_hold_position() {
    let pocket = CellCoord::new(0, 0);
    let world = world_with(5, 5, &[CellCoord::new(1, 0), CellCoord::new(0, 1)]);
    assert!(!query::flow_field(&world).is_reachable(pocket));

    let movement = Movement::default();
    let mut walkers = [
        walker_at(&world, pocket, Mobility::Ground),
        Walker::new(UnitId::new(2), Vec2::new(-3.0, 1.0), 1.0, Mobility::Ground),
    ];
    let before = walkers;
    let mut arrived = Vec::new();

    movement.advance(&world, TICK, &mut walkers, &mut arrived);

    assert_eq!(walkers, before);
    assert!(arrived.is_empty());
}

#[test]
fn ground_unit_walks_around_obstacle_to_the_exit() {
    let world = world_with(3, 3, &[CellCoord::new(1, 1)]);
    let movement = Movement::default();
    let mut walkers = [walker_at(&world, query::entry(&world), Mobility::Ground)];
    let mut arrived = Vec::new();

    for _ in 0..200 {
        movement.advance(&world, TICK, &mut walkers, &mut arrived);
        let cell = query::world_to_cell(&world, walkers[0].position)
            .expect("walker must stay on the grid");
        assert_ne!(
            query::state(&world, cell),
            CellState::Occupied,
            "walker entered an obstacle at {cell:?}"
        );
        if !arrived.is_empty() {
            break;
        }
    }

    assert_eq!(arrived, vec![UnitId::new(1)]);
    let exit = query::exit_position(&world);
    assert!(walkers[0].position.distance(exit) < movement.exit_threshold());
}

#[test]
fn flier_reaches_the_exit_in_a_straight_line() {
    let world = world_with(3, 5, &[CellCoord::new(1, 2)]);
    let movement = Movement::default();
    let start = query::cell_to_world(&world, query::entry(&world));
    let mut walkers = [walker_at(&world, query::entry(&world), Mobility::Flying)];
    let mut arrived = Vec::new();
    let mut ticks = 0;

    while arrived.is_empty() && ticks < 100 {
        movement.advance(&world, TICK, &mut walkers, &mut arrived);
        assert!((walkers[0].position.x - start.x).abs() < 1e-4);
        ticks += 1;
    }

    assert_eq!(arrived, vec![UnitId::new(1)]);
    assert!(ticks < 45, "flier should take the direct route, took {ticks} ticks");
}
