//! Step-bounded simulation of a [`PetriNet`]
#[cfg(feature = "random-simulation")]
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::core::petri_net::{Marking, PetriNetError, TransitionID};
use crate::PetriNet;

/// How the next transition is chosen among all enabled transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FiringStrategy {
    /// Always fire the enabled transition with the smallest ID
    #[default]
    FirstEnabled,
    /// Fire a uniformly chosen enabled transition, using a seeded RNG (reproducible runs)
    ///
    /// __Requires the `random-simulation` feature__
    #[cfg(feature = "random-simulation")]
    Random {
        /// Seed for the RNG
        seed: u64,
    },
}

/// Options for [`simulate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationOptions {
    /// Maximum number of firings before the simulation stops
    pub max_steps: usize,
    /// Choice of the next transition
    pub strategy: FiringStrategy,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            max_steps: 1_000,
            strategy: FiringStrategy::default(),
        }
    }
}

/// Why a simulation stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationOutcome {
    /// No transition was enabled anymore
    Deadlock,
    /// [`SimulationOptions::max_steps`] transitions fired
    StepLimitReached,
}

/// Result of [`simulate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationRun {
    /// Fired transitions, in firing order
    pub fired: Vec<TransitionID>,
    /// Marking after the last firing
    pub final_marking: Marking,
    /// Why the simulation stopped
    pub outcome: SimulationOutcome,
}

enum Chooser {
    First,
    #[cfg(feature = "random-simulation")]
    Random(StdRng),
}

impl Chooser {
    fn new(strategy: FiringStrategy) -> Self {
        match strategy {
            FiringStrategy::FirstEnabled => Chooser::First,
            #[cfg(feature = "random-simulation")]
            FiringStrategy::Random { seed } => Chooser::Random(StdRng::seed_from_u64(seed)),
        }
    }

    fn choose(&mut self, enabled: &[TransitionID]) -> Option<TransitionID> {
        match self {
            Chooser::First => enabled.first().copied(),
            #[cfg(feature = "random-simulation")]
            Chooser::Random(rng) => {
                if enabled.is_empty() {
                    None
                } else {
                    Some(enabled[rng.random_range(0..enabled.len())])
                }
            }
        }
    }
}

///
/// Simulate `net` starting from its current marking
///
/// Repeatedly fires one enabled transition (chosen according to [`SimulationOptions::strategy`])
/// until no transition is enabled or [`SimulationOptions::max_steps`] transitions fired.
/// The net is left in the final marking.
///
pub fn simulate(
    net: &mut PetriNet,
    options: &SimulationOptions,
) -> Result<SimulationRun, PetriNetError> {
    let mut chooser = Chooser::new(options.strategy);
    let mut fired = Vec::new();
    let outcome = loop {
        if fired.len() >= options.max_steps {
            break SimulationOutcome::StepLimitReached;
        }
        let enabled = net.enabled_transitions();
        let Some(transition) = chooser.choose(&enabled) else {
            break SimulationOutcome::Deadlock;
        };
        net.fire(transition)?;
        fired.push(transition);
    };
    log::info!(
        "Simulation stopped after {} firings ({:?})",
        fired.len(),
        outcome
    );
    Ok(SimulationRun {
        fired,
        final_marking: net.marking(),
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::petri_net::PlaceID;

    /// p0 -> t0 -> p1 -> t1 -> p2
    fn sequence_net() -> PetriNet {
        let mut net = PetriNet::new();
        for _ in 0..3 {
            net.add_place(None).unwrap();
        }
        for i in 0..2 {
            let t = net.add_transition(Some(format!("step {i}")), None).unwrap();
            net.add_input_arc(PlaceID(i), t)
                .unwrap()
                .add_output_arc(t, PlaceID(i + 1))
                .unwrap();
        }
        net
    }

    #[test]
    fn runs_into_deadlock() {
        let mut net = sequence_net();
        net.mark(PlaceID(0)).unwrap().mark(PlaceID(0)).unwrap();
        let run = simulate(&mut net, &SimulationOptions::default()).unwrap();
        assert_eq!(run.outcome, SimulationOutcome::Deadlock);
        assert_eq!(run.fired.len(), 4);
        // First enabled always prefers t0
        assert_eq!(
            run.fired,
            vec![TransitionID(0), TransitionID(0), TransitionID(1), TransitionID(1)]
        );
        assert_eq!(
            run.final_marking,
            Marking::from([(PlaceID(0), 0), (PlaceID(1), 0), (PlaceID(2), 2)])
        );
        assert_eq!(net.marking(), run.final_marking);
    }

    #[test]
    fn stops_at_step_limit() {
        let mut net = PetriNet::new();
        let p = net.add_place(None).unwrap();
        let source = net.add_transition(Some("source".into()), None).unwrap();
        net.add_output_arc(source, p).unwrap();
        let run = simulate(
            &mut net,
            &SimulationOptions {
                max_steps: 5,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(run.outcome, SimulationOutcome::StepLimitReached);
        assert_eq!(net.token_count(p).unwrap(), 5);
    }

    #[test]
    fn empty_net_deadlocks_immediately() {
        let mut net = PetriNet::new();
        let run = simulate(&mut net, &SimulationOptions::default()).unwrap();
        assert_eq!(run.outcome, SimulationOutcome::Deadlock);
        assert!(run.fired.is_empty());
    }

    #[cfg(feature = "random-simulation")]
    #[test]
    fn random_runs_are_reproducible() {
        let options = SimulationOptions {
            max_steps: 50,
            strategy: FiringStrategy::Random { seed: 42 },
        };
        let mut first = sequence_net();
        first.mark(PlaceID(0)).unwrap().mark(PlaceID(0)).unwrap();
        let mut second = first.clone();
        let run_a = simulate(&mut first, &options).unwrap();
        let run_b = simulate(&mut second, &options).unwrap();
        assert_eq!(run_a, run_b);
        assert_eq!(run_a.outcome, SimulationOutcome::Deadlock);
        assert_eq!(first.token_count(PlaceID(2)).unwrap(), 2);
    }
}
