//! Pre-, post- and incidence matrices of a [`PetriNet`]
//!
//! Only available with the `incidence-matrix` feature.
use itertools::Itertools;
use nalgebra::{DMatrix, DVector, Dyn, OMatrix};
use std::collections::HashMap;

use super::petri_net_struct::{PetriNet, PlaceID, TransitionID};

/// Row (place) and column (transition) positions used for the matrices of a [`PetriNet`]
///
/// Positions follow the ascending order of the IDs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidenceIndex {
    /// Row of each place
    pub places: HashMap<PlaceID, usize>,
    /// Column of each transition
    pub transitions: HashMap<TransitionID, usize>,
}

impl PetriNet {
    /// Creates a dictionary for the creation of matrices and vectors
    pub fn create_incidence_index(&self) -> IncidenceIndex {
        IncidenceIndex {
            places: self
                .places()
                .map(|p| p.id())
                .sorted()
                .enumerate()
                .map(|(pos, id)| (id, pos))
                .collect(),
            transitions: self
                .transitions()
                .map(|t| t.id())
                .sorted()
                .enumerate()
                .map(|(pos, id)| (id, pos))
                .collect(),
        }
    }

    /// Creates the pre-incidence matrix of the Petri net (places x transitions)
    pub fn create_pre_incidence_matrix(&self, index: &IncidenceIndex) -> DMatrix<u8> {
        let mut result: OMatrix<u8, Dyn, Dyn> =
            DMatrix::zeros(index.places.len(), index.transitions.len());

        for transition in self.transitions() {
            for place in transition.inputs() {
                if let (Some(row), Some(col)) = (
                    index.places.get(place),
                    index.transitions.get(&transition.id()),
                ) {
                    result[(*row, *col)] += 1;
                }
            }
        }

        result
    }

    /// Creates the post-incidence matrix of the Petri net (places x transitions)
    pub fn create_post_incidence_matrix(&self, index: &IncidenceIndex) -> DMatrix<u8> {
        let mut result: OMatrix<u8, Dyn, Dyn> =
            DMatrix::zeros(index.places.len(), index.transitions.len());

        for transition in self.transitions() {
            for place in transition.outputs() {
                if let (Some(row), Some(col)) = (
                    index.places.get(place),
                    index.transitions.get(&transition.id()),
                ) {
                    result[(*row, *col)] += 1;
                }
            }
        }

        result
    }

    /// Creates the incidence matrix of the Petri net
    ///
    /// Self-loops cancel out, so their entries are zero.
    pub fn create_incidence_matrix(&self, index: &IncidenceIndex) -> DMatrix<i8> {
        self.create_post_incidence_matrix(index).cast::<i8>()
            - self.create_pre_incidence_matrix(index).cast::<i8>()
    }

    /// Current marking as a vector, with rows as given by `index`
    ///
    /// Token counts above [`i64::MAX`] saturate at [`i64::MAX`].
    pub fn marking_vector(&self, index: &IncidenceIndex) -> DVector<i64> {
        let mut result: DVector<i64> = DVector::zeros(index.places.len());

        for place in self.places() {
            if let Some(row) = index.places.get(&place.id()) {
                result[*row] = i64::try_from(place.tokens()).unwrap_or(i64::MAX);
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::petri_net::Marking;

    #[test]
    fn create_incidence_matrix_test() {
        let mut net = PetriNet::new();
        let p1 = net.add_place(None).unwrap();
        let p2 = net.add_place(None).unwrap();
        let p3 = net.add_place(None).unwrap();
        let t1 = net.add_transition(Some("a".into()), None).unwrap();
        let t2 = net.add_transition(Some("b".into()), None).unwrap();
        let t3 = net.add_transition(Some("c".into()), None).unwrap();
        let t4 = net.add_transition(Some("d".into()), None).unwrap();
        net.add_input_arc(p1, t1).unwrap();
        net.add_input_arc(p1, t2).unwrap();
        net.add_output_arc(t1, p2).unwrap();
        net.add_output_arc(t2, p2).unwrap();
        net.add_input_arc(p2, t3).unwrap();
        net.add_output_arc(t3, p3).unwrap();
        net.add_output_arc(t4, p2).unwrap();
        net.add_input_arc(p2, t4).unwrap();

        let index = net.create_incidence_index();
        let pre_matrix = net.create_pre_incidence_matrix(&index);
        let expected_pre_matrix =
            DMatrix::from_row_slice(3, 4, &[1, 1, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0]);

        assert_eq!(pre_matrix, expected_pre_matrix);

        let post_matrix = net.create_post_incidence_matrix(&index);
        let expected_post_matrix =
            DMatrix::from_row_slice(3, 4, &[0, 0, 0, 0, 1, 1, 0, 1, 0, 0, 1, 0]);

        assert_eq!(post_matrix, expected_post_matrix);

        let incidence_matrix = net.create_incidence_matrix(&index);
        let expected_incidence_matrix =
            DMatrix::from_row_slice(3, 4, &[-1, -1, 0, 0, 1, 1, -1, 0, 0, 0, 1, 0]);

        assert_eq!(incidence_matrix, expected_incidence_matrix);
    }

    #[test]
    fn marking_equation_matches_firing() {
        let mut net = PetriNet::new();
        let p1 = net.add_place(None).unwrap();
        let p2 = net.add_place(None).unwrap();
        let t = net.add_transition(Some("a".into()), None).unwrap();
        net.add_input_arc(p1, t).unwrap().add_output_arc(t, p2).unwrap();
        net.mark(p1).unwrap();

        let index = net.create_incidence_index();
        let incidence = net.create_incidence_matrix(&index).cast::<i64>();
        let before = net.marking_vector(&index);
        net.fire(t).unwrap();
        let after = net.marking_vector(&index);
        assert_eq!(after, before + incidence.column(index.transitions[&t]));
    }

    #[test]
    fn marking_vector_saturates() {
        let mut net = PetriNet::new();
        let full = net.add_place(None).unwrap();
        let small = net.add_place(None).unwrap();
        net.set_marking(&Marking::from([(full, u64::MAX), (small, 3)]))
            .unwrap();

        let index = net.create_incidence_index();
        let vector = net.marking_vector(&index);
        assert_eq!(vector[index.places[&full]], i64::MAX);
        assert_eq!(vector[index.places[&small]], 3);
    }
}
