//! BFS traversal over a `DesignGraph`: path enumeration, shortest path (by
//! hops or accumulated delay), and fan-in/fan-out cones. Mirrors the
//! teacher's `TraversalEngine` shape (global-visited BFS per source, depth
//! and path-count limiting, a wall-clock timeout) generalized from a single
//! edge-type filter to DKG's richer optional data-only filter.

use crate::features::query_engine::domain::path::{FanoutResult, PathResult, PathWeight, TraversalDirection};
use crate::shared::models::{DesignGraph, EdgeId, NodeId, RelationType};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet, VecDeque};
use std::time::Instant;

pub struct TraversalEngine<'a> {
    graph: &'a DesignGraph,
}

impl<'a> TraversalEngine<'a> {
    pub fn new(graph: &'a DesignGraph) -> Self {
        Self { graph }
    }

    /// Enumerates cycle-free paths from `sources` to `targets`. `data_only`
    /// restricts traversal to `RelationType::Data` edges.
    pub fn find_paths(
        &self,
        sources: &[NodeId],
        targets: &[NodeId],
        direction: TraversalDirection,
        max_depth: usize,
        max_paths: usize,
        timeout_ms: u64,
        data_only: bool,
    ) -> Vec<PathResult> {
        let start_time = Instant::now();
        let target_ids: HashSet<&str> = targets.iter().map(|s| s.as_str()).collect();
        let mut paths = Vec::new();

        for source in sources {
            if paths.len() >= max_paths || start_time.elapsed().as_millis() > timeout_ms as u128 {
                break;
            }
            let found = self.bfs_single(source, &target_ids, direction, max_depth, max_paths - paths.len(), timeout_ms, start_time, data_only);
            paths.extend(found);
        }

        paths
    }

    #[allow(clippy::too_many_arguments)]
    fn bfs_single(
        &self,
        source: &str,
        target_ids: &HashSet<&str>,
        direction: TraversalDirection,
        max_depth: usize,
        max_paths: usize,
        timeout_ms: u64,
        start_time: Instant,
        data_only: bool,
    ) -> Vec<PathResult> {
        let mut paths = Vec::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();

        queue.push_back((source.to_string(), vec![source.to_string()], Vec::<EdgeId>::new(), 0.0_f64, 0usize));
        visited.insert(source.to_string());

        while let Some((node_id, node_path, edge_path, delay_so_far, depth)) = queue.pop_front() {
            if paths.len() >= max_paths || start_time.elapsed().as_millis() > timeout_ms as u128 {
                break;
            }
            if depth >= max_depth {
                continue;
            }

            for edge in self.neighbor_edges(&node_id, direction) {
                if data_only && edge.relation_type != RelationType::Data {
                    continue;
                }
                let next_id = match direction {
                    TraversalDirection::Forward => edge.dst.clone(),
                    TraversalDirection::Backward => edge.src.clone(),
                };
                let next_delay = delay_so_far + edge.delay.unwrap_or(0.0);

                if target_ids.contains(next_id.as_str()) {
                    let mut nodes = node_path.clone();
                    nodes.push(next_id.clone());
                    let mut edges = edge_path.clone();
                    edges.push(edge.edge_id.clone());
                    paths.push(PathResult { nodes, edges, total_delay: next_delay });
                    if paths.len() >= max_paths {
                        return paths;
                    }
                    continue;
                }

                if !visited.contains(&next_id) {
                    visited.insert(next_id.clone());
                    let mut nodes = node_path.clone();
                    nodes.push(next_id.clone());
                    let mut edges = edge_path.clone();
                    edges.push(edge.edge_id.clone());
                    queue.push_back((next_id, nodes, edges, next_delay, depth + 1));
                }
            }
        }

        paths
    }

    fn neighbor_edges(&self, node_id: &str, direction: TraversalDirection) -> Vec<&crate::shared::models::Edge> {
        match direction {
            TraversalDirection::Forward => self.graph.edges_from(node_id).collect(),
            TraversalDirection::Backward => self.graph.edges_to(node_id).collect(),
        }
    }

    /// Unweighted BFS for `PathWeight::Hops`, Dijkstra over `edge.delay` for
    /// `PathWeight::Delay`.
    pub fn shortest_path(&self, from: &str, to: &str, weight: PathWeight) -> Option<PathResult> {
        match weight {
            PathWeight::Hops => self.shortest_by_hops(from, to),
            PathWeight::Delay => self.shortest_by_delay(from, to),
        }
    }

    fn shortest_by_hops(&self, from: &str, to: &str) -> Option<PathResult> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back((from.to_string(), vec![from.to_string()], Vec::<EdgeId>::new(), 0.0_f64));
        visited.insert(from.to_string());

        while let Some((node_id, nodes, edges, delay)) = queue.pop_front() {
            if node_id == to {
                return Some(PathResult { nodes, edges, total_delay: delay });
            }
            for edge in self.graph.edges_from(&node_id) {
                if !visited.contains(&edge.dst) {
                    visited.insert(edge.dst.clone());
                    let mut next_nodes = nodes.clone();
                    next_nodes.push(edge.dst.clone());
                    let mut next_edges = edges.clone();
                    next_edges.push(edge.edge_id.clone());
                    queue.push_back((edge.dst.clone(), next_nodes, next_edges, delay + edge.delay.unwrap_or(0.0)));
                }
            }
        }
        None
    }

    fn shortest_by_delay(&self, from: &str, to: &str) -> Option<PathResult> {
        #[derive(PartialEq)]
        struct State {
            cost: f64,
            node: NodeId,
            nodes: Vec<NodeId>,
            edges: Vec<EdgeId>,
        }
        impl Eq for State {}
        impl Ord for State {
            fn cmp(&self, other: &Self) -> Ordering {
                other.cost.partial_cmp(&self.cost).unwrap_or(Ordering::Equal)
            }
        }
        impl PartialOrd for State {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        let mut best: std::collections::HashMap<NodeId, f64> = std::collections::HashMap::new();
        let mut heap = BinaryHeap::new();
        heap.push(State { cost: 0.0, node: from.to_string(), nodes: vec![from.to_string()], edges: Vec::new() });
        best.insert(from.to_string(), 0.0);

        while let Some(State { cost, node, nodes, edges }) = heap.pop() {
            if node == to {
                return Some(PathResult { nodes, edges, total_delay: cost });
            }
            if cost > *best.get(&node).unwrap_or(&f64::INFINITY) {
                continue;
            }
            for edge in self.graph.edges_from(&node) {
                let next_cost = cost + edge.delay.unwrap_or(0.0);
                if next_cost < *best.get(&edge.dst).unwrap_or(&f64::INFINITY) {
                    best.insert(edge.dst.clone(), next_cost);
                    let mut next_nodes = nodes.clone();
                    next_nodes.push(edge.dst.clone());
                    let mut next_edges = edges.clone();
                    next_edges.push(edge.edge_id.clone());
                    heap.push(State { cost: next_cost, node: edge.dst.clone(), nodes: next_nodes, edges: next_edges });
                }
            }
        }
        None
    }

    /// Full BFS reachability cone from `node_id`, max cumulative delay per
    /// reached node tracked so repeated arrival via a longer path never
    /// shrinks the recorded delay.
    pub fn fanout(&self, node_id: &str, direction: TraversalDirection, max_depth: usize) -> FanoutResult {
        let mut best_delay: std::collections::HashMap<NodeId, f64> = std::collections::HashMap::new();
        let mut queue = VecDeque::new();
        queue.push_back((node_id.to_string(), 0.0_f64, 0usize));

        while let Some((current, delay, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            for edge in self.neighbor_edges(&current, direction) {
                let next_id = match direction {
                    TraversalDirection::Forward => edge.dst.clone(),
                    TraversalDirection::Backward => edge.src.clone(),
                };
                let next_delay = delay + edge.delay.unwrap_or(0.0);
                let improved = match best_delay.get(&next_id) {
                    Some(&existing) => next_delay > existing,
                    None => true,
                };
                if improved {
                    best_delay.insert(next_id.clone(), next_delay);
                    queue.push_back((next_id, next_delay, depth + 1));
                }
            }
        }

        let max_delay = best_delay.values().cloned().fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))));
        let mut fanout_nodes: Vec<NodeId> = best_delay.keys().cloned().collect();
        fanout_nodes.sort();

        FanoutResult { fanout_count: fanout_nodes.len(), max_delay, fanout_nodes }
    }
}
