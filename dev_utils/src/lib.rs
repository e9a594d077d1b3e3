use busnet::{BusKind, NetworkBuilder, Planner, RoutingConfig};

// Common example data for the demos and benchmarks: a synthetic city grid
// with measured road distances, straight lines along rows and some columns,
// and one circular line around the rim. Seeded, so every run gets the same
// network.

pub const GRID_WIDTH: usize = 12;
pub const GRID_HEIGHT: usize = 12;

pub fn example_config() -> RoutingConfig {
    RoutingConfig { bus_wait_time: 4, bus_velocity: 35. }
}

fn stop_name(x: usize, y: usize) -> String {
    format!("Stop {x}-{y}")
}

pub fn example_endpoints() -> (String, String) {
    (stop_name(0, 0), stop_name(GRID_WIDTH - 1, GRID_HEIGHT - 1))
}

pub fn build_example_planner() -> Planner {
    let mut rng = fastrand::Rng::with_seed(0x5eed);
    let mut builder = NetworkBuilder::new(example_config());

    for y in 0..GRID_HEIGHT {
        for x in 0..GRID_WIDTH {
            // Road metres to the east and south neighbours; the reverse
            // directions come from symmetrization.
            let mut measured: Vec<(String, u32)> = Vec::new();
            if x + 1 < GRID_WIDTH {
                measured.push((stop_name(x + 1, y), 600 + rng.u32(0..900)));
            }
            if y + 1 < GRID_HEIGHT {
                measured.push((stop_name(x, y + 1), 600 + rng.u32(0..900)));
            }
            let distances: Vec<(&str, u32)> =
                measured.iter().map(|(name, metres)| (name.as_str(), *metres)).collect();

            let latitude = 55.55 + y as f64 * 0.008;
            let longitude = 37.2 + x as f64 * 0.013;
            builder.add_stop(&stop_name(x, y), latitude, longitude, &distances).unwrap();
        }
    }

    // A straight line along every row.
    for y in 0..GRID_HEIGHT {
        let stops: Vec<String> = (0..GRID_WIDTH).map(|x| stop_name(x, y)).collect();
        let refs: Vec<&str> = stops.iter().map(String::as_str).collect();
        builder.add_bus(&format!("H{y}"), BusKind::Straight, &refs).unwrap();
    }

    // And along every other column.
    for x in (0..GRID_WIDTH).step_by(2) {
        let stops: Vec<String> = (0..GRID_HEIGHT).map(|y| stop_name(x, y)).collect();
        let refs: Vec<&str> = stops.iter().map(String::as_str).collect();
        builder.add_bus(&format!("V{x}"), BusKind::Straight, &refs).unwrap();
    }

    // One circular line around the rim of the grid.
    let mut ring: Vec<String> = Vec::new();
    for x in 0..GRID_WIDTH {
        ring.push(stop_name(x, 0));
    }
    for y in 1..GRID_HEIGHT {
        ring.push(stop_name(GRID_WIDTH - 1, y));
    }
    for x in (0..GRID_WIDTH - 1).rev() {
        ring.push(stop_name(x, GRID_HEIGHT - 1));
    }
    for y in (1..GRID_HEIGHT - 1).rev() {
        ring.push(stop_name(0, y));
    }
    ring.push(stop_name(0, 0));
    let refs: Vec<&str> = ring.iter().map(String::as_str).collect();
    builder.add_bus("Ring", BusKind::Circular, &refs).unwrap();

    builder.finalize().unwrap()
}
