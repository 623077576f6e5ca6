//! Reachability graph of a [`PetriNet`]
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::core::petri_net::{Marking, PetriNetError, TransitionID};
use crate::PetriNet;

/// Options for [`explore_reachability_graph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReachabilityOptions {
    /// Maximum number of markings (nodes) to explore
    ///
    /// Unbounded nets have infinitely many reachable markings.
    /// The initial marking is always part of the graph, so a value of `0` acts like `1`.
    pub max_states: usize,
}

impl Default for ReachabilityOptions {
    fn default() -> Self {
        Self { max_states: 10_000 }
    }
}

/// Reachable markings of a [`PetriNet`] connected by the transitions firing between them
#[derive(Debug, Clone)]
pub struct ReachabilityGraph {
    /// Nodes are markings, edges are labelled with the fired transition
    pub graph: DiGraph<Marking, TransitionID>,
    /// Node of the marking the exploration started from
    pub initial: NodeIndex,
    /// `false` if [`ReachabilityOptions::max_states`] cut the exploration short
    pub complete: bool,
    nodes: HashMap<Marking, NodeIndex>,
    truncated: HashSet<NodeIndex>,
}

impl ReachabilityGraph {
    /// Number of explored markings
    pub fn state_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Whether `marking` was reached
    pub fn contains(&self, marking: &Marking) -> bool {
        self.nodes.contains_key(marking)
    }

    /// The marking the exploration started from
    pub fn initial_marking(&self) -> &Marking {
        &self.graph[self.initial]
    }

    /// Explored markings in which no transition is enabled
    ///
    /// For an incomplete graph, markings at the exploration frontier whose successors were cut
    /// off are not reported.
    pub fn deadlocks(&self) -> Vec<&Marking> {
        self.graph
            .node_indices()
            .filter(|n| {
                self.graph
                    .neighbors_directed(*n, Direction::Outgoing)
                    .next()
                    .is_none()
                    && !self.truncated.contains(n)
            })
            .map(|n| &self.graph[n])
            .collect()
    }
}

///
/// Explore all markings reachable from the current marking of `net` (breadth-first)
///
/// `net` itself is not changed.
///
pub fn explore_reachability_graph(
    net: &PetriNet,
    options: &ReachabilityOptions,
) -> Result<ReachabilityGraph, PetriNetError> {
    let mut scratch = net.clone();
    let mut graph: DiGraph<Marking, TransitionID> = DiGraph::new();
    let mut nodes: HashMap<Marking, NodeIndex> = HashMap::new();
    let mut truncated = HashSet::new();
    let mut complete = true;

    let start = net.marking();
    let initial = graph.add_node(start.clone());
    nodes.insert(start, initial);
    let mut queue: VecDeque<NodeIndex> = VecDeque::from([initial]);

    while let Some(node) = queue.pop_front() {
        let marking = graph[node].clone();
        scratch.set_marking(&marking)?;
        for transition in scratch.enabled_transitions() {
            scratch.set_marking(&marking)?;
            scratch.fire(transition)?;
            let next = scratch.marking();
            let target = match nodes.get(&next) {
                Some(existing) => *existing,
                None if graph.node_count() >= options.max_states.max(1) => {
                    complete = false;
                    truncated.insert(node);
                    continue;
                }
                None => {
                    let new_node = graph.add_node(next.clone());
                    nodes.insert(next, new_node);
                    queue.push_back(new_node);
                    new_node
                }
            };
            graph.add_edge(node, target, transition);
        }
    }

    if complete {
        log::debug!("Explored all {} reachable markings", graph.node_count());
    } else {
        log::warn!(
            "Reachability exploration stopped at {} markings",
            graph.node_count()
        );
    }

    Ok(ReachabilityGraph {
        graph,
        initial,
        complete,
        nodes,
        truncated,
    })
}
