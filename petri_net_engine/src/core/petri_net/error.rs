use thiserror::Error;

use super::petri_net_struct::{PlaceID, TransitionID};

/// Errors of [`PetriNet`](super::PetriNet) operations
///
/// Firing a transition that is not enabled is not an error (see [`PetriNet::fire`](super::PetriNet::fire)).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PetriNetError {
    /// The referenced place was never added to the net
    #[error("place {0} is not part of the Petri net")]
    UnknownPlace(PlaceID),
    /// The referenced transition was never added to the net
    #[error("transition {0} is not part of the Petri net")]
    UnknownTransition(TransitionID),
    /// A place with this ID already exists (only with [`DuplicateIdPolicy::Reject`](super::DuplicateIdPolicy::Reject))
    #[error("place {0} already exists")]
    DuplicatePlace(PlaceID),
    /// A transition with this ID already exists (only with [`DuplicateIdPolicy::Reject`](super::DuplicateIdPolicy::Reject))
    #[error("transition {0} already exists")]
    DuplicateTransition(TransitionID),
    /// No unused ID is left for an automatically numbered place or transition
    #[error("no unused identifier left")]
    IdSpaceExhausted,
}
