pub mod network;

pub use network::{BusKind, BusStats, Network, NetworkError};

pub mod graph;

pub use graph::{Graph, RoutingConfig};

pub mod router;

pub use router::{RouteInfo, Router};

pub mod journey;

pub use journey::{Journey, Leg};

pub mod planner;

pub use planner::{NetworkBuilder, Planner, StopInfo};
