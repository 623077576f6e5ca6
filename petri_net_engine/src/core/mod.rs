//! Core modules: the [`PetriNet`] data structure and its firing rule

pub mod petri_net;

pub use petri_net::PetriNet;
