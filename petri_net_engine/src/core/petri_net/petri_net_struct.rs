use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Display;

use super::error::PetriNetError;
use super::options::{DuplicateIdPolicy, PetriNetOptions};

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialOrd, Ord)]
/// Place ID
///
/// Places use their own identifier space, independent of [`TransitionID`]s.
pub struct PlaceID(pub u64);

impl PlaceID {
    /// Get the raw identifier
    pub fn get_raw(self) -> u64 {
        self.0
    }
}

impl Display for PlaceID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "p{}", self.0)
    }
}

impl From<&Place> for PlaceID {
    fn from(value: &Place) -> Self {
        value.id
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialOrd, Ord)]
/// Transition ID
///
/// Transitions use their own identifier space, independent of [`PlaceID`]s.
pub struct TransitionID(pub u64);

impl TransitionID {
    /// Get the raw identifier
    pub fn get_raw(self) -> u64 {
        self.0
    }
}

impl Display for TransitionID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}", self.0)
    }
}

impl From<&Transition> for TransitionID {
    fn from(value: &Transition) -> Self {
        value.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
/// Place in a Petri net
///
/// Passive node holding a non-negative number of tokens.
pub struct Place {
    id: PlaceID,
    tokens: u64,
}

impl Place {
    /// Create a new place without tokens
    pub fn new(id: PlaceID) -> Self {
        Self { id, tokens: 0 }
    }

    /// ID of this place
    pub fn id(&self) -> PlaceID {
        self.id
    }

    /// Current number of tokens
    pub fn tokens(&self) -> u64 {
        self.tokens
    }

    /// Add one token
    pub fn add_token(&mut self) -> &mut Self {
        self.tokens += 1;
        self
    }

    /// Remove one token
    ///
    /// Consuming from an empty place leaves it empty; this is not an error.
    pub fn consume_token(&mut self) -> &mut Self {
        if self.tokens > 0 {
            self.tokens -= 1;
        }
        self
    }

    fn set_tokens(&mut self, tokens: u64) {
        self.tokens = tokens;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Transition in a Petri net
///
/// Only holds the places it consumes from (`inputs`) and produces to (`outputs`).
/// Enabling and firing are decided by the owning [`PetriNet`].
pub struct Transition {
    /// Transition label (None if this transition is _invisible_)
    pub label: Option<String>,
    id: TransitionID,
    inputs: HashSet<PlaceID>,
    outputs: HashSet<PlaceID>,
}

impl Transition {
    /// Create a new transition without any arcs
    pub fn new(label: Option<String>, id: TransitionID) -> Self {
        Self {
            label,
            id,
            inputs: HashSet::new(),
            outputs: HashSet::new(),
        }
    }

    /// ID of this transition
    pub fn id(&self) -> TransitionID {
        self.id
    }

    /// Places this transition consumes tokens from
    pub fn inputs(&self) -> &HashSet<PlaceID> {
        &self.inputs
    }

    /// Places this transition produces tokens to
    pub fn outputs(&self) -> &HashSet<PlaceID> {
        &self.outputs
    }

    /// Whether this transition is silent (has no label)
    pub fn is_silent(&self) -> bool {
        self.label.is_none()
    }

    /// Add an input place (adding the same place twice has no further effect)
    pub fn add_input(&mut self, place: PlaceID) -> &mut Self {
        self.inputs.insert(place);
        self
    }

    /// Add an output place (adding the same place twice has no further effect)
    pub fn add_output(&mut self, place: PlaceID) -> &mut Self {
        self.outputs.insert(place);
        self
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[serde(tag = "type", content = "nodes")]
/// Arc type in a Petri net
pub enum ArcType {
    /// From Place to Transition (the transition consumes from the place)
    PlaceTransition(PlaceID, TransitionID),
    /// From Transition to Place (the transition produces to the place)
    TransitionPlace(TransitionID, PlaceID),
}

impl ArcType {
    /// Create new from place to transition
    pub fn place_to_transition(from: PlaceID, to: TransitionID) -> ArcType {
        ArcType::PlaceTransition(from, to)
    }
    /// Create new from transition to place
    pub fn transition_to_place(from: TransitionID, to: PlaceID) -> ArcType {
        ArcType::TransitionPlace(from, to)
    }
}

/// One past the largest used ID; the smallest unused ID once that overflows
fn next_free_id(used: impl Iterator<Item = u64>, is_used: impl Fn(u64) -> bool) -> Option<u64> {
    match used.max() {
        None => Some(0),
        Some(max) => max
            .checked_add(1)
            .or_else(|| (0..=u64::MAX).find(|id| !is_used(*id))),
    }
}

/// Marking of a Petri net: Assigning every [`PlaceID`] its number of tokens
pub type Marking = BTreeMap<PlaceID, u64>;

#[derive(Debug, Serialize, Clone, Default)]
///
/// A Petri net of [`Place`]s and [`Transition`]s
///
/// Bipartite graph of [`Place`]s and [`Transition`]s. Transitions refer to places only by
/// [`PlaceID`], and arcs can only be added between nodes that are part of the net, so every
/// referenced place is always present.
pub struct PetriNet {
    places: HashMap<PlaceID, Place>,
    transitions: HashMap<TransitionID, Transition>,
    #[serde(skip)]
    options: PetriNetOptions,
}

impl PetriNet {
    /// Create new [`PetriNet`] with no places or transitions
    pub fn new() -> Self {
        Self::default()
    }

    /// Create new empty [`PetriNet`] using the given options
    pub fn with_options(options: PetriNetOptions) -> Self {
        Self {
            places: HashMap::new(),
            transitions: HashMap::new(),
            options,
        }
    }

    /// Options this net was created with
    pub fn options(&self) -> &PetriNetOptions {
        &self.options
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Add a place (with an optional passed ID)
    ///
    /// If no ID is passed, the ID following the largest place ID in use is taken (or, if that
    /// would overflow, the smallest unused one). An existing place is never picked.
    ///
    /// Re-adding an existing ID is governed by [`PetriNetOptions::duplicate_ids`]:
    /// with [`DuplicateIdPolicy::Replace`] the place is reset to zero tokens (arcs referring to
    /// it stay in place), with [`DuplicateIdPolicy::Reject`] an error is returned.
    pub fn add_place(&mut self, place_id: Option<PlaceID>) -> Result<PlaceID, PetriNetError> {
        let place_id = match place_id {
            Some(place_id) => place_id,
            None => PlaceID(
                next_free_id(self.places.keys().map(|p| p.0), |id| {
                    self.places.contains_key(&PlaceID(id))
                })
                .ok_or(PetriNetError::IdSpaceExhausted)?,
            ),
        };
        if self.places.contains_key(&place_id) {
            match self.options.duplicate_ids {
                DuplicateIdPolicy::Reject => return Err(PetriNetError::DuplicatePlace(place_id)),
                DuplicateIdPolicy::Replace => {
                    log::warn!("Place {place_id} already exists; resetting it to zero tokens")
                }
            }
        }
        self.places.insert(place_id, Place::new(place_id));
        log::debug!("Added place {place_id}");
        Ok(place_id)
    }

    /// Add a transition with an optional label (and with an optional passed ID)
    ///
    /// If no ID is passed, the ID following the largest transition ID in use is taken (or, if
    /// that would overflow, the smallest unused one). An existing transition is never picked.
    ///
    /// Re-adding an existing ID is governed by [`PetriNetOptions::duplicate_ids`]:
    /// with [`DuplicateIdPolicy::Replace`] the transition starts over without any arcs,
    /// with [`DuplicateIdPolicy::Reject`] an error is returned.
    pub fn add_transition(
        &mut self,
        label: Option<String>,
        transition_id: Option<TransitionID>,
    ) -> Result<TransitionID, PetriNetError> {
        let transition_id = match transition_id {
            Some(transition_id) => transition_id,
            None => TransitionID(
                next_free_id(self.transitions.keys().map(|t| t.0), |id| {
                    self.transitions.contains_key(&TransitionID(id))
                })
                .ok_or(PetriNetError::IdSpaceExhausted)?,
            ),
        };
        if self.transitions.contains_key(&transition_id) {
            match self.options.duplicate_ids {
                DuplicateIdPolicy::Reject => {
                    return Err(PetriNetError::DuplicateTransition(transition_id))
                }
                DuplicateIdPolicy::Replace => {
                    log::warn!("Transition {transition_id} already exists; dropping its arcs")
                }
            }
        }
        log::debug!("Added transition {transition_id} ({label:?})");
        self.transitions
            .insert(transition_id, Transition::new(label, transition_id));
        Ok(transition_id)
    }

    /// Add an arc
    ///
    /// Both endpoints need to be part of the net already.
    pub fn add_arc(&mut self, from_to: ArcType) -> Result<&mut Self, PetriNetError> {
        match from_to {
            ArcType::PlaceTransition(place, transition) => {
                self.add_input_arc(place, transition)
            }
            ArcType::TransitionPlace(transition, place) => {
                self.add_output_arc(transition, place)
            }
        }
    }

    /// Add an arc from `place` to `transition`: firing `transition` consumes from `place`
    pub fn add_input_arc(
        &mut self,
        place: PlaceID,
        transition: TransitionID,
    ) -> Result<&mut Self, PetriNetError> {
        self.place(place)?;
        self.transition_mut(transition)?.add_input(place);
        log::trace!("Added arc {place} -> {transition}");
        Ok(self)
    }

    /// Add an arc from `transition` to `place`: firing `transition` produces to `place`
    pub fn add_output_arc(
        &mut self,
        transition: TransitionID,
        place: PlaceID,
    ) -> Result<&mut Self, PetriNetError> {
        self.place(place)?;
        self.transition_mut(transition)?.add_output(place);
        log::trace!("Added arc {transition} -> {place}");
        Ok(self)
    }

    /// Get a place
    pub fn place(&self, place: PlaceID) -> Result<&Place, PetriNetError> {
        self.places
            .get(&place)
            .ok_or(PetriNetError::UnknownPlace(place))
    }

    fn place_mut(&mut self, place: PlaceID) -> Result<&mut Place, PetriNetError> {
        self.places
            .get_mut(&place)
            .ok_or(PetriNetError::UnknownPlace(place))
    }

    /// Get a transition
    pub fn transition(&self, transition: TransitionID) -> Result<&Transition, PetriNetError> {
        self.transitions
            .get(&transition)
            .ok_or(PetriNetError::UnknownTransition(transition))
    }

    fn transition_mut(
        &mut self,
        transition: TransitionID,
    ) -> Result<&mut Transition, PetriNetError> {
        self.transitions
            .get_mut(&transition)
            .ok_or(PetriNetError::UnknownTransition(transition))
    }

    /// All places (in no particular order)
    pub fn places(&self) -> impl Iterator<Item = &Place> {
        self.places.values()
    }

    /// All transitions (in no particular order)
    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.values()
    }

    /// Number of places
    pub fn place_count(&self) -> usize {
        self.places.len()
    }

    /// Number of transitions
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Put one token into `place`
    pub fn mark(&mut self, place: PlaceID) -> Result<&mut Self, PetriNetError> {
        self.place_mut(place)?.add_token();
        Ok(self)
    }

    /// Current number of tokens in `place`
    pub fn token_count(&self, place: PlaceID) -> Result<u64, PetriNetError> {
        Ok(self.place(place)?.tokens())
    }

    /// Current [`Marking`], containing every place of the net
    pub fn marking(&self) -> Marking {
        self.places
            .values()
            .map(|place| (place.id, place.tokens))
            .collect()
    }

    /// Replace the current marking
    ///
    /// Places not contained in `marking` end up without tokens. If `marking` mentions a place
    /// that is not part of the net, an error is returned and no place is changed.
    pub fn set_marking(&mut self, marking: &Marking) -> Result<&mut Self, PetriNetError> {
        if let Some(unknown) = marking.keys().find(|p| !self.places.contains_key(*p)) {
            return Err(PetriNetError::UnknownPlace(*unknown));
        }
        for place in self.places.values_mut() {
            place.set_tokens(marking.get(&place.id).copied().unwrap_or(0));
        }
        Ok(self)
    }

    /// Check if `transition` is enabled, i.e., every input place holds at least one token
    ///
    /// A transition without input places is always enabled.
    pub fn is_enabled(&self, transition: TransitionID) -> Result<bool, PetriNetError> {
        for place in self.transition(transition)?.inputs.iter() {
            if self.place(*place)?.tokens == 0 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// All enabled transitions, ordered by ID
    pub fn enabled_transitions(&self) -> Vec<TransitionID> {
        self.transitions
            .keys()
            .filter(|t| matches!(self.is_enabled(**t), Ok(true)))
            .copied()
            .sorted()
            .collect()
    }

    /// Fire `transition`
    ///
    /// If the transition is enabled, one token is consumed from each input place and one token
    /// is produced in each output place, and `true` is returned.
    /// Firing a transition that is not enabled changes nothing and returns `false`.
    pub fn fire(&mut self, transition: TransitionID) -> Result<bool, PetriNetError> {
        if !self.is_enabled(transition)? {
            log::trace!("Transition {transition} is not enabled; nothing fired");
            return Ok(false);
        }
        let t = self.transition(transition)?;
        let inputs: Vec<PlaceID> = t.inputs.iter().copied().collect();
        let outputs: Vec<PlaceID> = t.outputs.iter().copied().collect();
        // All endpoints exist: arcs are only added between registered nodes and nodes are never
        // removed, so the token moves below cannot stop halfway.
        for place in inputs {
            self.place_mut(place)?.consume_token();
        }
        for place in outputs {
            self.place_mut(place)?.add_token();
        }
        log::debug!("Fired transition {transition}");
        Ok(true)
    }

    /// Fire the given transitions in order
    ///
    /// Transitions that are not enabled when their turn comes are skipped.
    /// Returns how many transitions actually fired.
    pub fn fire_sequence(&mut self, sequence: &[TransitionID]) -> Result<usize, PetriNetError> {
        let mut fired = 0;
        for transition in sequence {
            if self.fire(*transition)? {
                fired += 1;
            }
        }
        Ok(fired)
    }

    /// Get the preset of a [`PetriNet`] place
    pub fn preset_of_place(&self, p: PlaceID) -> Vec<TransitionID> {
        self.transitions
            .values()
            .filter(|t| t.outputs.contains(&p))
            .map(|t| t.id)
            .sorted()
            .collect()
    }

    /// Get the preset of [`PetriNet`] transition referred to by passed id
    pub fn preset_of_transition(&self, t: TransitionID) -> Vec<PlaceID> {
        self.transitions
            .get(&t)
            .map(|t| t.inputs.iter().copied().sorted().collect())
            .unwrap_or_default()
    }

    /// Get postset of [`PetriNet`] place referred to by passed id
    pub fn postset_of_place(&self, p: PlaceID) -> Vec<TransitionID> {
        self.transitions
            .values()
            .filter(|t| t.inputs.contains(&p))
            .map(|t| t.id)
            .sorted()
            .collect()
    }

    /// Get postset of [`PetriNet`] transition referred to by passed id
    pub fn postset_of_transition(&self, t: TransitionID) -> Vec<PlaceID> {
        self.transitions
            .get(&t)
            .map(|t| t.outputs.iter().copied().sorted().collect())
            .unwrap_or_default()
    }

    /// Checks if the Petri net contains duplicate or silent transitions
    pub fn contains_duplicate_or_silent_transitions(&self) -> bool {
        let mut activities = HashSet::new();

        for transition in self.transitions.values() {
            match &transition.label {
                Some(label) if activities.insert(label) => {}
                _ => return true,
            }
        }

        false
    }
}
