use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

// Indices are dense and follow declaration order.
pub type StopIndex = u32;
pub type BusIndex = u32;

#[derive(thiserror::Error, Debug)]
pub enum NetworkError {
    #[error("Stop {0} is already declared.")]
    DuplicateStop(String),
    #[error("Bus {0} is already declared.")]
    DuplicateBus(String),
    #[error("Bus {bus} has {len} stops, at least 2 are required.")]
    RouteTooShort { bus: String, len: usize },
    #[error("Stop {stop} has a road distance to undeclared stop {target}.")]
    UnknownDistanceTarget { stop: String, target: String },
    #[error("Bus {bus} passes through undeclared stop {stop}.")]
    UnknownRouteStop { bus: String, stop: String },
}

#[derive(Clone, Copy, Debug)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    const EARTH_RADIUS: f64 = 6_371_000.; // metres

    // Great-circle distance in metres (spherical law of cosines).
    pub fn distance(self, other: GeoPoint) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();
        let cos_angle = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * delta_lon.cos();
        // Rounding can push the cosine of a near-zero angle past 1.
        Self::EARTH_RADIUS * cos_angle.clamp(-1., 1.).acos()
    }
}

#[derive(Debug)]
pub struct Stop {
    pub name: Arc<str>,
    pub point: GeoPoint,
    // Measured road metres to named neighbours. Missing reverse entries are
    // filled in during symmetrization.
    distances: HashMap<Box<str>, u32>,
    // Buses calling at this stop. A BTreeSet keeps them in name order.
    buses: BTreeSet<Arc<str>>,
}

impl Stop {
    pub fn distance_to(&self, neighbour: &str) -> Option<u32> {
        self.distances.get(neighbour).copied()
    }

    pub fn buses(&self) -> impl Iterator<Item = &Arc<str>> {
        self.buses.iter()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BusKind {
    // Runs the declared sequence out, then back the same way.
    Straight,
    // The declared sequence already closes on itself (first stop repeated last).
    Circular,
}

#[derive(Debug)]
pub struct Bus {
    pub name: Arc<str>,
    pub kind: BusKind,
    stops: Vec<Box<str>>,
}

impl Bus {
    // The full traversal pattern: forward then back again for straight buses
    // (terminus not repeated), the declared loop for circular ones.
    pub fn effective_stops(&self) -> Vec<&str> {
        let forward = self.stops.iter().map(|name| name.as_ref());
        match self.kind {
            BusKind::Circular => forward.collect(),
            BusKind::Straight => forward
                .chain(self.stops.iter().rev().skip(1).map(|name| name.as_ref()))
                .collect(),
        }
    }
}

// Per-bus statistics over the effective traversal.
#[derive(Clone, Copy, Debug)]
pub struct BusStats {
    pub stop_count: usize,
    pub unique_stop_count: usize,
    // Measured road metres along the traversal.
    pub route_length: f64,
    // route_length over the great-circle length of the same traversal.
    pub curvature: f64,
}

pub struct Network {
    stops: Vec<Stop>,
    buses: Vec<Bus>,
    stop_index: HashMap<Arc<str>, StopIndex>,
    bus_index: HashMap<Arc<str>, BusIndex>,
}

impl Network {
    pub fn new() -> Self {
        Network {
            stops: Vec::new(),
            buses: Vec::new(),
            stop_index: HashMap::new(),
            bus_index: HashMap::new(),
        }
    }

    pub fn add_stop(
        &mut self,
        name: &str,
        latitude: f64,
        longitude: f64,
        distances: &[(&str, u32)],
    ) -> Result<StopIndex, NetworkError> {
        if self.stop_index.contains_key(name) {
            return Err(NetworkError::DuplicateStop(name.to_owned()));
        }
        assert!(
            self.stops.len() < StopIndex::MAX as usize,
            "Too many stops (max {}).",
            StopIndex::MAX
        );

        let name: Arc<str> = Arc::from(name);
        let index = self.stops.len() as StopIndex;
        self.stop_index.insert(name.clone(), index);
        self.stops.push(Stop {
            name,
            point: GeoPoint { latitude, longitude },
            distances: distances
                .iter()
                .map(|&(target, metres)| (Box::from(target), metres))
                .collect(),
            buses: BTreeSet::new(),
        });
        Ok(index)
    }

    pub fn add_bus(
        &mut self,
        name: &str,
        kind: BusKind,
        stops: &[&str],
    ) -> Result<BusIndex, NetworkError> {
        if self.bus_index.contains_key(name) {
            return Err(NetworkError::DuplicateBus(name.to_owned()));
        }
        if stops.len() < 2 {
            return Err(NetworkError::RouteTooShort {
                bus: name.to_owned(),
                len: stops.len(),
            });
        }
        assert!(
            self.buses.len() < BusIndex::MAX as usize,
            "Too many buses (max {}).",
            BusIndex::MAX
        );

        let name: Arc<str> = Arc::from(name);
        let index = self.buses.len() as BusIndex;
        self.bus_index.insert(name.clone(), index);
        self.buses.push(Bus {
            name,
            kind,
            stops: stops.iter().map(|&stop| Box::from(stop)).collect(),
        });
        Ok(index)
    }

    // Checks that every name mentioned in a distance table or a bus route
    // resolves to a declared stop. A single miss fails the whole batch.
    pub(crate) fn validate(&self) -> Result<(), NetworkError> {
        for stop in &self.stops {
            for target in stop.distances.keys() {
                if !self.stop_index.contains_key(&**target) {
                    return Err(NetworkError::UnknownDistanceTarget {
                        stop: stop.name.to_string(),
                        target: target.to_string(),
                    });
                }
            }
        }
        for bus in &self.buses {
            for stop in &bus.stops {
                if !self.stop_index.contains_key(&**stop) {
                    return Err(NetworkError::UnknownRouteStop {
                        bus: bus.name.to_string(),
                        stop: stop.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    // If A measures a distance to B and B measures none back, B acquires the
    // same value. Declared entries are kept, so roads may stay asymmetric.
    pub(crate) fn symmetrize_distances(&mut self) {
        let mut missing = Vec::new();
        for stop in &self.stops {
            for (target, &metres) in &stop.distances {
                let target_idx = self.stop_index[&**target];
                if !self.stops[target_idx as usize]
                    .distances
                    .contains_key(&*stop.name)
                {
                    missing.push((target_idx, Box::from(&*stop.name), metres));
                }
            }
        }
        for (target_idx, name, metres) in missing {
            self.stops[target_idx as usize].distances.insert(name, metres);
        }
    }

    // Fills every stop's set of serving buses.
    pub(crate) fn index_buses(&mut self) {
        let stops = &mut self.stops;
        let stop_index = &self.stop_index;
        for bus in &self.buses {
            for stop in &bus.stops {
                let index = stop_index[&**stop];
                stops[index as usize].buses.insert(bus.name.clone());
            }
        }
    }

    pub fn stop(&self, index: StopIndex) -> &Stop {
        &self.stops[index as usize]
    }

    pub fn bus(&self, index: BusIndex) -> &Bus {
        &self.buses[index as usize]
    }

    pub fn stop_idx(&self, name: &str) -> Option<StopIndex> {
        self.stop_index.get(name).copied()
    }

    pub fn bus_idx(&self, name: &str) -> Option<BusIndex> {
        self.bus_index.get(name).copied()
    }

    pub fn num_stops(&self) -> usize {
        self.stops.len()
    }

    pub fn num_buses(&self) -> usize {
        self.buses.len()
    }

    // Stop indices along the bus's effective traversal.
    pub fn effective_route(&self, bus: BusIndex) -> Vec<StopIndex> {
        self.buses[bus as usize]
            .effective_stops()
            .iter()
            .map(|&name| self.stop_index[name])
            .collect()
    }

    // Measured road metres from one stop to another: the stop's own entry,
    // else free for a self-pair, else the neighbour's reverse entry, else the
    // great-circle distance.
    pub fn road_distance(&self, from: StopIndex, to: StopIndex) -> f64 {
        let (a, b) = (&self.stops[from as usize], &self.stops[to as usize]);
        if let Some(metres) = a.distance_to(&b.name) {
            return metres as f64;
        }
        if from == to {
            return 0.;
        }
        if let Some(metres) = b.distance_to(&a.name) {
            return metres as f64;
        }
        a.point.distance(b.point)
    }

    pub fn bus_stats(&self, bus: BusIndex) -> BusStats {
        let route = self.effective_route(bus);
        let unique: HashSet<StopIndex> = route.iter().copied().collect();

        let mut route_length = 0.;
        let mut geo_length = 0.;
        for leg in route.windows(2) {
            route_length += self.road_distance(leg[0], leg[1]);
            geo_length += self.stop(leg[0]).point.distance(self.stop(leg[1]).point);
        }

        BusStats {
            stop_count: route.len(),
            unique_stop_count: unique.len(),
            route_length,
            curvature: route_length / geo_length,
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Network::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Two stops 1 692.99 m apart as the crow flies and 6 000 m by road.
    fn reference_pair() -> Network {
        let mut network = Network::new();
        network
            .add_stop("Maple St", 55.611087, 37.20829, &[("Quarry Rd", 6000)])
            .unwrap();
        network.add_stop("Quarry Rd", 55.595884, 37.209755, &[]).unwrap();
        network
    }

    #[test]
    fn great_circle_distance() {
        let network = reference_pair();
        let geo = network.stop(0).point.distance(network.stop(1).point);
        assert!((geo - 1692.99).abs() < 0.5, "geo distance was {geo}");
    }

    #[test]
    fn symmetrization_fills_missing_reverse_entries() {
        let mut network = reference_pair();
        network.validate().unwrap();
        network.symmetrize_distances();
        assert_eq!(network.stop(1).distance_to("Maple St"), Some(6000));
    }

    #[test]
    fn symmetrization_keeps_declared_asymmetry() {
        let mut network = Network::new();
        network.add_stop("A", 55.6, 37.2, &[("B", 100)]).unwrap();
        network.add_stop("B", 55.7, 37.3, &[("A", 250)]).unwrap();
        network.symmetrize_distances();
        assert_eq!(network.stop(0).distance_to("B"), Some(100));
        assert_eq!(network.stop(1).distance_to("A"), Some(250));
    }

    #[test]
    fn road_distance_fallbacks() {
        let mut network = reference_pair();
        // The reverse entry answers even before symmetrization.
        assert_eq!(network.road_distance(1, 0), 6000.);
        assert_eq!(network.road_distance(0, 1), 6000.);
        assert_eq!(network.road_distance(0, 0), 0.);

        // No measurement at all falls back to the great circle.
        let c = network.add_stop("Wharf", 55.6, 37.21, &[]).unwrap();
        let geo = network.stop(0).point.distance(network.stop(c).point);
        assert_eq!(network.road_distance(0, c), geo);
    }

    #[test]
    fn straight_bus_statistics() {
        let mut network = Network::new();
        network.add_stop("A", 55.60, 37.20, &[("B", 1000)]).unwrap();
        network
            .add_stop("B", 55.61, 37.21, &[("C", 2000), ("A", 1500)])
            .unwrap();
        network.add_stop("C", 55.62, 37.22, &[]).unwrap();
        let bus = network.add_bus("7", BusKind::Straight, &["A", "B", "C"]).unwrap();
        network.symmetrize_distances();

        let stats = network.bus_stats(bus);
        assert_eq!(stats.stop_count, 5);
        assert_eq!(stats.unique_stop_count, 3);
        // Out 1000 + 2000, back 2000 + 1500.
        assert_eq!(stats.route_length, 6500.);
    }

    #[test]
    fn circular_bus_statistics() {
        let mut network = Network::new();
        network.add_stop("A", 55.60, 37.20, &[("B", 1000)]).unwrap();
        network.add_stop("B", 55.61, 37.21, &[("C", 1000)]).unwrap();
        network.add_stop("C", 55.62, 37.22, &[("A", 1000)]).unwrap();
        let bus = network
            .add_bus("ring", BusKind::Circular, &["A", "B", "C", "A"])
            .unwrap();

        let stats = network.bus_stats(bus);
        assert_eq!(stats.stop_count, 4);
        assert_eq!(stats.unique_stop_count, 3);
        assert_eq!(stats.route_length, 3000.);
    }

    #[test]
    fn curvature_of_reference_pair() {
        let mut network = reference_pair();
        let bus = network
            .add_bus("1", BusKind::Straight, &["Maple St", "Quarry Rd"])
            .unwrap();
        network.symmetrize_distances();

        let stats = network.bus_stats(bus);
        assert_eq!(stats.route_length, 12000.);
        assert!(
            (stats.curvature - 3.544).abs() < 1e-3,
            "curvature was {}",
            stats.curvature
        );
    }

    #[test]
    fn stop_buses_are_name_ordered() {
        let mut network = Network::new();
        network.add_stop("Hub", 55.6, 37.2, &[]).unwrap();
        network.add_stop("End", 55.7, 37.3, &[]).unwrap();
        network.add_bus("9", BusKind::Straight, &["Hub", "End"]).unwrap();
        network.add_bus("14", BusKind::Straight, &["Hub", "End"]).unwrap();
        network.add_bus("2", BusKind::Straight, &["Hub", "End"]).unwrap();
        network.index_buses();

        let names: Vec<&str> = network.stop(0).buses().map(|bus| &**bus).collect();
        assert_eq!(names, ["14", "2", "9"]);
    }

    #[test]
    fn duplicate_declarations_are_rejected() {
        let mut network = Network::new();
        network.add_stop("A", 55.6, 37.2, &[]).unwrap();
        assert!(matches!(
            network.add_stop("A", 55.6, 37.2, &[]),
            Err(NetworkError::DuplicateStop(_))
        ));
        network.add_stop("B", 55.7, 37.3, &[]).unwrap();
        network.add_bus("1", BusKind::Straight, &["A", "B"]).unwrap();
        assert!(matches!(
            network.add_bus("1", BusKind::Straight, &["B", "A"]),
            Err(NetworkError::DuplicateBus(_))
        ));
    }

    #[test]
    fn undeclared_references_fail_validation() {
        let mut network = Network::new();
        network.add_stop("A", 55.6, 37.2, &[("Ghost", 500)]).unwrap();
        assert!(matches!(
            network.validate(),
            Err(NetworkError::UnknownDistanceTarget { .. })
        ));

        let mut network = Network::new();
        network.add_stop("A", 55.6, 37.2, &[]).unwrap();
        network.add_bus("1", BusKind::Straight, &["A", "Ghost"]).unwrap();
        assert!(matches!(
            network.validate(),
            Err(NetworkError::UnknownRouteStop { .. })
        ));
    }

    #[test]
    fn short_routes_are_rejected() {
        let mut network = Network::new();
        network.add_stop("A", 55.6, 37.2, &[]).unwrap();
        assert!(matches!(
            network.add_bus("1", BusKind::Straight, &["A"]),
            Err(NetworkError::RouteTooShort { .. })
        ));
    }
}
