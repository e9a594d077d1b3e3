use std::fmt::Display;
use std::sync::Arc;

use crate::graph::{Cost, Graph};
use crate::network::Network;
use crate::router::RouteInfo;

// One step of an itinerary: wait for a bus at a stop, or ride one.
#[derive(Clone, Debug, PartialEq)]
pub enum Leg {
    Wait { stop: Arc<str>, minutes: Cost },
    Ride { bus: Arc<str>, span: u32, minutes: Cost },
}

// A reconstructed itinerary. Every ride is preceded by the wait at its
// boarding stop, so legs alternate Wait, Ride, Wait, Ride, ...
#[derive(Clone, Debug)]
pub struct Journey {
    pub total_minutes: Cost,
    pub legs: Vec<Leg>,
}

impl Journey {
    // Expands a shortest path into legs. Each costed edge is one boarding:
    // the wait, then the ride for the remainder of the edge's minutes.
    // Structural zero-cost edges carry no ride and are dropped.
    pub(crate) fn from_route(
        route: &RouteInfo,
        graph: &Graph,
        network: &Network,
        bus_wait_time: u32,
    ) -> Journey {
        let wait = bus_wait_time as Cost;
        let mut legs = Vec::new();
        for &edge_idx in &route.edges {
            let edge = graph.edge(edge_idx);
            if edge.weight.minutes == 0. {
                continue;
            }
            let bus = edge.weight.bus.clone().expect("Costed edge without a bus.");
            legs.push(Leg::Wait {
                stop: network.stop(edge.from).name.clone(),
                minutes: wait,
            });
            legs.push(Leg::Ride {
                bus,
                span: edge.weight.span,
                minutes: edge.weight.minutes - wait,
            });
        }
        Journey { total_minutes: route.total_minutes, legs }
    }
}

impl Display for Journey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "-----------------------------------------------")?;
        if self.legs.is_empty() {
            writeln!(f, "Already there.")?;
        }
        for leg in self.legs.iter() {
            match leg {
                Leg::Wait { stop, minutes } => {
                    writeln!(f, "Wait {minutes:.1} min at {stop}.")?;
                }
                Leg::Ride { bus, span, minutes } => {
                    writeln!(f, "Ride bus {bus} for {span} stop(s), {minutes:.1} min.")?;
                }
            }
        }
        writeln!(f, "Total journey time: {:.2} minutes.", self.total_minutes)?;
        write!(f, "-----------------------------------------------")
    }
}
