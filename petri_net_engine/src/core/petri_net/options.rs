/// What happens when a place or transition is added with an ID that is already in use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateIdPolicy {
    /// Replace the existing node: a place starts over with zero tokens, a transition starts
    /// over without arcs
    #[default]
    Replace,
    /// Keep the existing node and return an error
    Reject,
}

/// Options for building a [`PetriNet`](super::PetriNet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PetriNetOptions {
    /// Handling of duplicate place/transition IDs
    pub duplicate_ids: DuplicateIdPolicy,
}
