use std::sync::Arc;

use crate::graph::{Graph, RoutingConfig};
use crate::journey::Journey;
use crate::network::{BusKind, BusStats, Network, NetworkError};
use crate::router::Router;

// Accumulates the static description of the city. Finalizing consumes the
// builder, so nothing can be added once routing tables exist.
pub struct NetworkBuilder {
    network: Network,
    config: RoutingConfig,
}

impl NetworkBuilder {
    pub fn new(config: RoutingConfig) -> Self {
        NetworkBuilder { network: Network::new(), config }
    }

    pub fn add_stop(
        &mut self,
        name: &str,
        latitude: f64,
        longitude: f64,
        distances: &[(&str, u32)],
    ) -> Result<(), NetworkError> {
        self.network.add_stop(name, latitude, longitude, distances).map(|_| ())
    }

    pub fn add_bus(
        &mut self,
        name: &str,
        kind: BusKind,
        stops: &[&str],
    ) -> Result<(), NetworkError> {
        self.network.add_bus(name, kind, stops).map(|_| ())
    }

    // Completes the catalog (symmetrized distances, stop-to-bus index),
    // builds the ride graph and precomputes every single-source table.
    pub fn finalize(self) -> Result<Planner, NetworkError> {
        let NetworkBuilder { mut network, config } = self;
        network.validate()?;
        network.symmetrize_distances();
        network.index_buses();

        let graph = Graph::build(&network, &config);
        let router = Router::new(&graph);
        Ok(Planner { network, config, graph, router })
    }
}

// Answers stop, bus and route queries against a finalized network. A miss
// (unknown name, unreachable pair) is None, never an error.
pub struct Planner {
    network: Network,
    config: RoutingConfig,
    graph: Graph,
    router: Router,
}

pub struct StopInfo {
    // Names of the buses serving the stop, in lexicographic order.
    pub buses: Vec<Arc<str>>,
}

impl Planner {
    pub fn stop_info(&self, name: &str) -> Option<StopInfo> {
        let stop = self.network.stop_idx(name)?;
        Some(StopInfo {
            buses: self.network.stop(stop).buses().cloned().collect(),
        })
    }

    pub fn bus_info(&self, name: &str) -> Option<BusStats> {
        Some(self.network.bus_stats(self.network.bus_idx(name)?))
    }

    pub fn route(&self, from: &str, to: &str) -> Option<Journey> {
        let from = self.network.stop_idx(from)?;
        let to = self.network.stop_idx(to)?;
        let route = self.router.route(&self.graph, from, to)?;
        Some(Journey::from_route(&route, &self.graph, &self.network, self.config.bus_wait_time))
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn print_stats(&self) {
        log::info!(
            "Network has {} stops, {} buses, {} vertices and {} edges.",
            self.network.num_stops(),
            self.network.num_buses(),
            self.graph.vertex_count(),
            self.graph.edge_count()
        );
    }
}
