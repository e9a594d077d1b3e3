use crate::network::{BusIndex, Network, StopIndex};
use std::sync::Arc;

pub type EdgeIndex = u32;
// Path costs are minutes.
pub type Cost = f64;

// Routing parameters, fixed for the lifetime of the graph.
#[derive(Clone, Copy, Debug)]
pub struct RoutingConfig {
    // Minutes spent waiting at a stop before every boarding.
    pub bus_wait_time: u32,
    // Bus speed in km/h.
    pub bus_velocity: f64,
}

impl RoutingConfig {
    pub(crate) fn metres_per_minute(&self) -> f64 {
        self.bus_velocity * 1000. / 60.
    }
}

#[derive(Clone, Debug)]
pub struct EdgeWeight {
    pub minutes: Cost,
    // None on structural zero-cost edges, which no itinerary reports.
    pub bus: Option<Arc<str>>,
    // Stops advanced along the bus's traversal.
    pub span: u32,
}

impl EdgeWeight {
    fn zero() -> Self {
        EdgeWeight { minutes: 0., bus: None, span: 0 }
    }
}

#[derive(Clone, Debug)]
pub struct Edge {
    pub from: StopIndex,
    pub to: StopIndex,
    pub weight: EdgeWeight,
}

// Directed weighted multigraph over the network's stops. Vertices are the
// stop indices; edges are appended once at build time and addressed by id.
pub struct Graph {
    edges: Vec<Edge>,
    // Outgoing edge ids per vertex.
    incidence: Vec<Vec<EdgeIndex>>,
}

impl Graph {
    pub fn new(vertex_count: usize) -> Self {
        Graph {
            edges: Vec::new(),
            incidence: vec![Vec::new(); vertex_count],
        }
    }

    pub fn add_edge(&mut self, from: StopIndex, to: StopIndex, weight: EdgeWeight) -> EdgeIndex {
        assert!(
            self.edges.len() < EdgeIndex::MAX as usize,
            "Too many edges (max {}).",
            EdgeIndex::MAX
        );
        let id = self.edges.len() as EdgeIndex;
        self.incidence[from as usize].push(id);
        self.edges.push(Edge { from, to, weight });
        id
    }

    pub fn vertex_count(&self) -> usize {
        self.incidence.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge(&self, id: EdgeIndex) -> &Edge {
        &self.edges[id as usize]
    }

    pub fn outgoing(&self, vertex: StopIndex) -> &[EdgeIndex] {
        &self.incidence[vertex as usize]
    }

    // One vertex per stop, one edge per way of riding a single bus between
    // two of its traversal positions without getting off. The boarding wait
    // is rolled into every ride edge, so a transfer pays it again while a
    // ride staying on board (including through a straight bus's terminus
    // u-turn) pays it once.
    pub fn build(network: &Network, config: &RoutingConfig) -> Graph {
        let mut graph = Graph::new(network.num_stops());
        let wait = config.bus_wait_time as Cost;
        let metres_per_minute = config.metres_per_minute();

        for vertex in 0..network.num_stops() as StopIndex {
            graph.add_edge(vertex, vertex, EdgeWeight::zero());
        }

        for bus_idx in 0..network.num_buses() as BusIndex {
            let bus = network.bus(bus_idx);
            let route = network.effective_route(bus_idx);

            // cum[k] is the ride time in minutes from the traversal's first
            // stop to its k-th.
            let mut cum = vec![0.; route.len()];
            for k in 1..route.len() {
                cum[k] =
                    cum[k - 1] + network.road_distance(route[k - 1], route[k]) / metres_per_minute;
            }

            for i in 0..route.len() {
                for j in (i + 1)..route.len() {
                    let minutes = cum[j] - cum[i];
                    if minutes == 0. {
                        // A zero-length ride costs nothing and names no bus.
                        graph.add_edge(route[i], route[j], EdgeWeight::zero());
                    } else {
                        graph.add_edge(
                            route[i],
                            route[j],
                            EdgeWeight {
                                minutes: wait + minutes,
                                bus: Some(bus.name.clone()),
                                span: (j - i) as u32,
                            },
                        );
                    }
                }
            }
        }

        log::debug!(
            "Built graph with {} vertices and {} edges.",
            graph.vertex_count(),
            graph.edge_count()
        );
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::BusKind;

    fn config() -> RoutingConfig {
        // 30 km/h is 500 metres per minute.
        RoutingConfig { bus_wait_time: 2, bus_velocity: 30. }
    }

    fn line_network(distances: &[u32]) -> Network {
        let mut network = Network::new();
        let names = ["A", "B", "C", "D"];
        for (i, &name) in names.iter().enumerate().take(distances.len() + 1) {
            let measured;
            let next: &[(&str, u32)] = if i < distances.len() {
                measured = [(names[i + 1], distances[i])];
                &measured
            } else {
                &[]
            };
            network.add_stop(name, 55.6 + i as f64 * 0.01, 37.2, next).unwrap();
        }
        network
    }

    #[test]
    fn every_vertex_gets_a_self_edge() {
        let mut network = line_network(&[1000]);
        network.add_bus("1", BusKind::Straight, &["A", "B"]).unwrap();
        network.symmetrize_distances();

        let graph = Graph::build(&network, &config());
        for vertex in 0..graph.vertex_count() as StopIndex {
            assert!(graph.outgoing(vertex).iter().any(|&id| {
                let edge = graph.edge(id);
                edge.to == vertex && edge.weight.minutes == 0.
            }));
        }
    }

    #[test]
    fn two_stop_straight_bus_edges() {
        let mut network = line_network(&[6000]);
        network.add_bus("1", BusKind::Straight, &["A", "B"]).unwrap();
        network.symmetrize_distances();

        let graph = Graph::build(&network, &config());
        // Two self-edges plus the A->B, A->A (out and back) and B->A rides.
        assert_eq!(graph.edge_count(), 5);

        let ride = graph
            .outgoing(0)
            .iter()
            .map(|&id| graph.edge(id))
            .find(|edge| edge.to == 1)
            .expect("A->B ride missing");
        assert_eq!(ride.weight.minutes, 14.);
        assert_eq!(ride.weight.span, 1);
        assert_eq!(ride.weight.bus.as_deref(), Some("1"));
    }

    #[test]
    fn straight_bus_rides_continue_through_the_terminus() {
        let mut network = line_network(&[1000, 2000]);
        network.add_bus("1", BusKind::Straight, &["A", "B", "C"]).unwrap();
        network.symmetrize_distances();

        let graph = Graph::build(&network, &config());
        // Traversal is A B C B A, so one edge rides B->C->B->A in a single
        // boarding: 2000 + 2000 + 1000 metres at 500 m/min, plus the wait.
        let through = graph
            .outgoing(1)
            .iter()
            .map(|&id| graph.edge(id))
            .find(|edge| edge.to == 0 && edge.weight.span == 3)
            .expect("through-terminus ride missing");
        assert_eq!(through.weight.minutes, 2. + 10.);
    }

    #[test]
    fn circular_bus_only_rides_forward() {
        let mut network = Network::new();
        network.add_stop("A", 55.60, 37.2, &[("B", 1000)]).unwrap();
        network.add_stop("B", 55.61, 37.2, &[("C", 1000)]).unwrap();
        network.add_stop("C", 55.62, 37.2, &[("A", 1000)]).unwrap();
        network
            .add_bus("ring", BusKind::Circular, &["A", "B", "C", "A"])
            .unwrap();
        network.symmetrize_distances();

        let graph = Graph::build(&network, &config());
        let rides_to_b: Vec<_> = graph
            .outgoing(2)
            .iter()
            .map(|&id| graph.edge(id))
            .filter(|edge| edge.to == 1 && edge.weight.bus.is_some())
            .collect();
        // C reaches B only by riding on through A, never backwards.
        assert!(rides_to_b.is_empty());
    }

    #[test]
    fn zero_length_rides_become_structural_edges() {
        let mut network = line_network(&[0]);
        network.add_bus("1", BusKind::Straight, &["A", "B"]).unwrap();
        network.symmetrize_distances();

        let graph = Graph::build(&network, &config());
        let ride = graph
            .outgoing(0)
            .iter()
            .map(|&id| graph.edge(id))
            .find(|edge| edge.to == 1)
            .expect("A->B edge missing");
        assert_eq!(ride.weight.minutes, 0.);
        assert!(ride.weight.bus.is_none());
    }
}
