//! Convenient Macros for creating Petri nets
///
/// Creates a [`PetriNet`](crate::PetriNet), wrapped in a `Result`.
///
/// Every parenthesized group is one place: the labels before `;` are transitions producing into
/// the place, the labels after `;` are transitions consuming from it.
/// Transitions with the same label are the same transition.
///
/// # Examples
///
/// ```rust
/// use petri_net_engine::{petri_net, PetriNet};
/// let petri_net: PetriNet = petri_net!(("a", "b", "c"; "c", "d"), ("f"; "e", "g")).unwrap();
/// assert_eq!(petri_net.place_count(), 2);
/// assert_eq!(petri_net.transition_count(), 7);
/// ```
#[macro_export]
macro_rules! petri_net {
    ( $( ($($x:expr),* ; $($y:expr),* ) ),* ) => {{
        #[allow(unused_imports)]
        use std::collections::HashMap;
        #[allow(unused_imports)]
        use $crate::core::petri_net::{ArcType, PetriNet, PetriNetError, TransitionID};

        (|| -> Result<PetriNet, PetriNetError> {
            #[allow(unused_mut)]
            let mut result = PetriNet::new();
            #[allow(unused_mut, unused_variables)]
            let mut transition_id_dict: HashMap<String, TransitionID> = HashMap::new();

            $(
                let place_id = result.add_place(None)?;

                $(
                    let t_label = $x.to_string();
                    let t_in = match transition_id_dict.get(&t_label) {
                        Some(t) => *t,
                        None => {
                            let t = result.add_transition(Some(t_label.clone()), None)?;
                            transition_id_dict.insert(t_label, t);
                            t
                        }
                    };
                    result.add_arc(ArcType::transition_to_place(t_in, place_id))?;
                )*
                $(
                    let t_label = $y.to_string();
                    let t_out = match transition_id_dict.get(&t_label) {
                        Some(t) => *t,
                        None => {
                            let t = result.add_transition(Some(t_label.clone()), None)?;
                            transition_id_dict.insert(t_label, t);
                            t
                        }
                    };
                    result.add_arc(ArcType::place_to_transition(place_id, t_out))?;
                )*
            )*

            Ok(result)
        })()
    }}
}

#[cfg(test)]
mod tests {
    use crate::core::petri_net::{PlaceID, TransitionID};

    #[test]
    fn macro_builds_shared_transitions() {
        let net = petri_net!(("start"; "a"), ("a"; "b", "c"), ("b", "c"; "end")).unwrap();
        assert_eq!(net.place_count(), 3);
        // start, a, b, c, end
        assert_eq!(net.transition_count(), 5);

        let a = net
            .transitions()
            .find(|t| t.label.as_deref() == Some("a"))
            .map(|t| t.id())
            .unwrap();
        assert_eq!(net.preset_of_transition(a), vec![PlaceID(0)]);
        assert_eq!(net.postset_of_transition(a), vec![PlaceID(1)]);
        assert_eq!(net.preset_of_place(PlaceID(2)).len(), 2);
        assert!(net.transition(TransitionID(4)).is_ok());
    }
}
