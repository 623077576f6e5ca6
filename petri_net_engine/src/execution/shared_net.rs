//! Thread-safe handle to a [`PetriNet`]
use parking_lot::RwLock;
use std::sync::Arc;

use crate::core::petri_net::{Marking, PetriNetError, PlaceID, TransitionID};
use crate::PetriNet;

///
/// Shareable [`PetriNet`] that serializes every firing
///
/// Each [`SharedPetriNet::fire`] holds the write lock from the enabling check until the last
/// token moved, so two firings never observe or change the same places at the same time.
/// Queries take the read lock.
///
#[derive(Debug, Clone, Default)]
pub struct SharedPetriNet {
    inner: Arc<RwLock<PetriNet>>,
}

impl From<PetriNet> for SharedPetriNet {
    fn from(net: PetriNet) -> Self {
        Self::new(net)
    }
}

impl SharedPetriNet {
    /// Wrap `net`
    pub fn new(net: PetriNet) -> Self {
        Self {
            inner: Arc::new(RwLock::new(net)),
        }
    }

    /// Fire `transition` (see [`PetriNet::fire`])
    pub fn fire(&self, transition: TransitionID) -> Result<bool, PetriNetError> {
        self.inner.write().fire(transition)
    }

    /// Fire the enabled transition with the smallest ID, if any
    ///
    /// Choosing and firing happen under the same lock, so the chosen transition is still enabled
    /// when it fires.
    pub fn fire_any_enabled(&self) -> Result<Option<TransitionID>, PetriNetError> {
        let mut net = self.inner.write();
        match net.enabled_transitions().first() {
            Some(transition) => {
                net.fire(*transition)?;
                Ok(Some(*transition))
            }
            None => Ok(None),
        }
    }

    /// See [`PetriNet::is_enabled`]
    pub fn is_enabled(&self, transition: TransitionID) -> Result<bool, PetriNetError> {
        self.inner.read().is_enabled(transition)
    }

    /// Put one token into `place`
    pub fn mark(&self, place: PlaceID) -> Result<(), PetriNetError> {
        self.inner.write().mark(place)?;
        Ok(())
    }

    /// See [`PetriNet::token_count`]
    pub fn token_count(&self, place: PlaceID) -> Result<u64, PetriNetError> {
        self.inner.read().token_count(place)
    }

    /// Consistent snapshot of the current marking
    pub fn marking(&self) -> Marking {
        self.inner.read().marking()
    }

    /// Run `f` on the net while holding the read lock
    pub fn read<T>(&self, f: impl FnOnce(&PetriNet) -> T) -> T {
        f(&self.inner.read())
    }

    /// Get the net back, if this is the last handle to it
    pub fn into_inner(self) -> Result<PetriNet, Self> {
        Arc::try_unwrap(self.inner)
            .map(RwLock::into_inner)
            .map_err(|inner| Self { inner })
    }
}
