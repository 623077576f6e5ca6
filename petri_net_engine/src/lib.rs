#![warn(
    clippy::doc_markdown,
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs
)]

#![doc = include_str!("../README.md")]

pub mod core;

pub mod execution;

#[doc(inline)]
pub use crate::core::petri_net::{
    ArcType, DuplicateIdPolicy, Marking, PetriNetError, PetriNetOptions, Place, PlaceID,
    Transition, TransitionID,
};

#[doc(inline)]
pub use crate::core::PetriNet;

#[doc(inline)]
pub use execution::reachability::explore_reachability_graph;

#[doc(inline)]
pub use execution::simulation::simulate;

#[doc(inline)]
pub use execution::shared_net::SharedPetriNet;

///
/// Serialize a [`PetriNet`] as a JSON [`String`]
///
pub fn petrinet_to_json(net: &PetriNet) -> Result<String, serde_json::Error> {
    net.to_json()
}

#[cfg(test)]
mod tests;
