//! The built-in demo city the simulator plays on.
//!
//! Thirty stops laid out on a 6x5 grid. Taxis run between neighbouring
//! stops, buses skip every other stop along alternate rows and two columns,
//! and a handful of underground and ferry links cross the whole city.

use rand::seq::SliceRandom;
use rand::Rng;
use scotland_core::{Graph, Location, Transport};

const COLUMNS: u32 = 6;
const ROWS: u32 = 5;

fn stop(row: u32, column: u32) -> Location {
    row * COLUMNS + column + 1
}

/// Build the demo city
pub fn demo_city() -> Graph {
    let mut graph = Graph::new();

    for row in 0..ROWS {
        for column in 0..COLUMNS {
            if column + 1 < COLUMNS {
                graph.add_edge(stop(row, column), stop(row, column + 1), Transport::Taxi);
            }
            if row + 1 < ROWS {
                graph.add_edge(stop(row, column), stop(row + 1, column), Transport::Taxi);
            }
        }
    }

    for row in (0..ROWS).step_by(2) {
        for column in (0..COLUMNS - 2).step_by(2) {
            graph.add_edge(stop(row, column), stop(row, column + 2), Transport::Bus);
        }
    }
    for column in [1, 4] {
        for row in (0..ROWS - 2).step_by(2) {
            graph.add_edge(stop(row, column), stop(row + 2, column), Transport::Bus);
        }
    }

    for (a, b) in [(1, 15), (15, 30), (6, 25), (8, 23)] {
        graph.add_edge(a, b, Transport::Underground);
    }
    for (a, b) in [(1, 30), (12, 19)] {
        graph.add_edge(a, b, Transport::Boat);
    }

    graph
}

/// Pick distinct starting stops: one for MrX, then one per detective.
/// `None` if the graph has too few stops for everyone.
pub fn starting_positions<R: Rng>(
    rng: &mut R,
    graph: &Graph,
    detectives: usize,
) -> Option<(Location, Vec<Location>)> {
    let stops: Vec<Location> = graph.nodes().collect();
    if stops.len() <= detectives {
        return None;
    }
    let picked: Vec<Location> = stops
        .choose_multiple(rng, detectives + 1)
        .copied()
        .collect();
    let (mr_x, detectives) = picked.split_first()?;
    Some((*mr_x, detectives.to_vec()))
}
