//! Executing Petri nets
//!
//! Simulation, reachability exploration and concurrent access on top of
//! [`PetriNet::fire`](crate::PetriNet::fire).
pub mod reachability;
pub mod shared_net;
pub mod simulation;

pub use reachability::{explore_reachability_graph, ReachabilityGraph, ReachabilityOptions};
pub use shared_net::SharedPetriNet;
pub use simulation::{simulate, FiringStrategy, SimulationOptions, SimulationOutcome, SimulationRun};
