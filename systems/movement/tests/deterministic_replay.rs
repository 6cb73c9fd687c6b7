use std::time::Duration;

use frostmaul_core::{CellCoord, Command, Event, GridConfig, Mobility, UnitId};
use frostmaul_system_movement::{Movement, Walker};
use frostmaul_world::{self as world, query, World};
use glam::Vec2;

const TICK: Duration = Duration::from_millis(50);

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    events: Vec<Event>,
    arrivals: Vec<(usize, UnitId)>,
    positions: Vec<[u32; 2]>,
    path: Vec<CellCoord>,
}

enum Step {
    Apply(Command),
    Advance(usize),
}

fn scripted_steps() -> Vec<Step> {
    let place = |column, row| {
        Step::Apply(Command::PlaceObstacle {
            cell: CellCoord::new(column, row),
        })
    };

    vec![
        place(0, 3),
        place(1, 3),
        place(2, 3),
        place(3, 3),
        Step::Advance(20),
        place(4, 6),
        place(5, 6),
        place(6, 6),
        place(7, 6),
        place(8, 6),
        Step::Advance(30),
        Step::Apply(Command::RemoveObstacle {
            cell: CellCoord::new(2, 3),
        }),
        place(8, 3),
        Step::Advance(600),
    ]
}

fn replay(steps: Vec<Step>) -> ReplayOutcome {
    let mut world = World::new(&GridConfig::default()).expect("valid layout");
    let movement = Movement::default();
    let start = query::cell_to_world(&world, query::entry(&world));
    let mut walkers = vec![
        Walker::new(UnitId::new(0), start, 1.5, Mobility::Ground),
        Walker::new(UnitId::new(1), start + Vec2::new(0.2, 0.0), 1.0, Mobility::Ground),
        Walker::new(UnitId::new(2), start, 1.0, Mobility::Flying),
    ];
    let mut events = Vec::new();
    let mut arrivals = Vec::new();
    let mut tick = 0;

    for step in steps {
        match step {
            Step::Apply(command) => world::apply(&mut world, command, &mut events),
            Step::Advance(ticks) => {
                for _ in 0..ticks {
                    tick += 1;
                    let mut arrived = Vec::new();
                    movement.advance(&world, TICK, &mut walkers, &mut arrived);
                    for id in arrived {
                        arrivals.push((tick, id));
                        walkers.retain(|walker| walker.id != id);
                    }
                }
            }
        }
    }

    ReplayOutcome {
        events,
        arrivals,
        positions: walkers
            .iter()
            .map(|walker| [walker.position.x.to_bits(), walker.position.y.to_bits()])
            .collect(),
        path: query::trace_path(&world),
    }
}

#[test]
fn deterministic_replay_produces_identical_outcomes() {
    let first = replay(scripted_steps());
    let second = replay(scripted_steps());

    assert_eq!(first, second, "replay diverged between runs");
}

#[test]
fn replay_delivers_every_walker_to_the_exit() {
    let outcome = replay(scripted_steps());

    let mut arrived: Vec<UnitId> = outcome.arrivals.iter().map(|(_, id)| *id).collect();
    arrived.sort();
    assert_eq!(
        arrived,
        vec![UnitId::new(0), UnitId::new(1), UnitId::new(2)],
        "all walkers should leave the maze"
    );
    assert!(outcome.positions.is_empty());

    let flier_tick = outcome
        .arrivals
        .iter()
        .find(|(_, id)| *id == UnitId::new(2))
        .map(|(tick, _)| *tick)
        .expect("flier arrived");
    let ground_tick = outcome
        .arrivals
        .iter()
        .find(|(_, id)| *id == UnitId::new(1))
        .map(|(tick, _)| *tick)
        .expect("ground unit arrived");
    assert!(
        flier_tick < ground_tick,
        "equally fast flier should beat the walker through the maze"
    );

    let rejected = outcome
        .events
        .iter()
        .filter(|event| matches!(event, Event::PlacementRejected { .. }))
        .count();
    assert_eq!(rejected, 0, "scripted maze only uses legal placements");
    assert_eq!(outcome.path.last(), Some(&CellCoord::new(4, 15)));
}
