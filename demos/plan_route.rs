use dev_utils::{build_example_planner, example_endpoints};

fn main() {
    let planner = build_example_planner();
    planner.print_stats();

    let (from, to) = example_endpoints();
    println!("From {from} to {to}:");
    match planner.route(&from, &to) {
        Some(journey) => println!("{journey}"),
        None => println!("No route found."),
    }

    if let Some(info) = planner.stop_info(&from) {
        let buses: Vec<&str> = info.buses.iter().map(|bus| bus.as_ref()).collect();
        println!("Buses at {from}: {}.", buses.join(", "));
    }

    if let Some(stats) = planner.bus_info("Ring") {
        println!(
            "Ring serves {} stops ({} unique), {:.0} m of road, curvature {:.3}.",
            stats.stop_count, stats.unique_stop_count, stats.route_length, stats.curvature
        );
    }
}
