use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use rayon::prelude::*;

use crate::graph::{Cost, EdgeIndex, Graph};
use crate::network::StopIndex;

// A shortest path between two stops: its total cost and the graph edges
// ridden, in travel order.
#[derive(Clone, Debug)]
pub struct RouteInfo {
    pub total_minutes: Cost,
    pub edges: Vec<EdgeIndex>,
}

// Heap entry for a single-source pass. Ordered by cost, then vertex, so Ord
// stays consistent with PartialEq.
#[derive(Copy, Clone, PartialEq)]
struct QueueEntry {
    cost: Cost,
    vertex: StopIndex,
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.vertex.cmp(&other.vertex))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// All-pairs shortest paths over a fixed graph: one relaxation pass per
// source, with flat row-major distance and predecessor tables. The graph is
// borrowed per call, so the router can live beside it in one owner.
pub struct Router {
    vertex_count: usize,
    // Minutes from source to target at source * vertex_count + target;
    // infinity where unreachable.
    dist: Vec<Cost>,
    // Last edge of an optimal path to each target, same layout.
    prev_edge: Vec<Option<EdgeIndex>>,
}

impl Router {
    pub fn new(graph: &Graph) -> Router {
        let n = graph.vertex_count();
        let mut dist = vec![Cost::INFINITY; n * n];
        let mut prev_edge = vec![None; n * n];

        if n > 0 {
            // Sources are independent, so their rows relax in parallel.
            dist.par_chunks_mut(n)
                .zip(prev_edge.par_chunks_mut(n))
                .enumerate()
                .for_each(|(source, (dist_row, prev_row))| {
                    relax_from(graph, source as StopIndex, dist_row, prev_row);
                });
        }

        Router { vertex_count: n, dist, prev_edge }
    }

    pub fn total_minutes(&self, from: StopIndex, to: StopIndex) -> Option<Cost> {
        let cost = self.dist[self.table_idx(from, to)];
        cost.is_finite().then_some(cost)
    }

    pub fn route(&self, graph: &Graph, from: StopIndex, to: StopIndex) -> Option<RouteInfo> {
        let total_minutes = self.total_minutes(from, to)?;

        // Walk the predecessor chain back from the target, then flip it.
        let mut edges = Vec::new();
        let mut vertex = to;
        while vertex != from {
            let edge_idx = self.prev_edge[self.table_idx(from, vertex)]
                .expect("Predecessor missing for a finite distance.");
            edges.push(edge_idx);
            assert!(edges.len() <= graph.edge_count(), "Cycle in predecessor chain.");
            vertex = graph.edge(edge_idx).from;
        }
        edges.reverse();

        Some(RouteInfo { total_minutes, edges })
    }

    fn table_idx(&self, from: StopIndex, to: StopIndex) -> usize {
        from as usize * self.vertex_count + to as usize
    }
}

// Dijkstra with a strictly-less relaxation, so on equal costs the earliest
// edge id keeps the slot.
fn relax_from(
    graph: &Graph,
    source: StopIndex,
    dist: &mut [Cost],
    prev_edge: &mut [Option<EdgeIndex>],
) {
    let mut queue = BinaryHeap::new();
    dist[source as usize] = 0.;
    queue.push(Reverse(QueueEntry { cost: 0., vertex: source }));

    while let Some(Reverse(QueueEntry { cost, vertex })) = queue.pop() {
        // A cheaper entry for this vertex was already settled.
        if cost > dist[vertex as usize] {
            continue;
        }
        for &edge_idx in graph.outgoing(vertex) {
            let edge = graph.edge(edge_idx);
            let next_cost = cost + edge.weight.minutes;
            if next_cost < dist[edge.to as usize] {
                dist[edge.to as usize] = next_cost;
                prev_edge[edge.to as usize] = Some(edge_idx);
                queue.push(Reverse(QueueEntry { cost: next_cost, vertex: edge.to }));
            }
        }
    }
}
