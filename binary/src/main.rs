use std::{env, error::Error, time::Instant};

use petri_net_engine::{
    execution::{FiringStrategy, ReachabilityOptions, SimulationOptions},
    explore_reachability_graph, simulate, PetriNet, PetriNetError, PlaceID, TransitionID,
};

/// Dining philosophers: each philosopher needs both neighbouring forks to eat
fn dining_philosophers(count: u64) -> Result<PetriNet, PetriNetError> {
    let mut net = PetriNet::new();
    let forks: Vec<PlaceID> = (0..count)
        .map(|_| net.add_place(None))
        .collect::<Result<_, _>>()?;
    for i in 0..count {
        let thinking = net.add_place(None)?;
        let eating = net.add_place(None)?;
        let take = net.add_transition(Some(format!("philosopher {i} takes forks")), None)?;
        let release = net.add_transition(Some(format!("philosopher {i} releases forks")), None)?;
        let left = forks[i as usize];
        let right = forks[((i + 1) % count) as usize];

        net.add_input_arc(thinking, take)?
            .add_input_arc(left, take)?
            .add_input_arc(right, take)?
            .add_output_arc(take, eating)?;
        net.add_input_arc(eating, release)?
            .add_output_arc(release, thinking)?
            .add_output_arc(release, left)?
            .add_output_arc(release, right)?;

        net.mark(thinking)?;
    }
    for fork in forks {
        net.mark(fork)?;
    }
    Ok(net)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seed: u64 = match env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => 42,
    };
    log::info!("Simulating with seed {seed}");

    let net = dining_philosophers(5)?;
    println!(
        "Built Petri net with {} places and {} transitions",
        net.place_count(),
        net.transition_count()
    );

    let now = Instant::now();
    let rg = explore_reachability_graph(&net, &ReachabilityOptions::default())?;
    println!(
        "Explored {} reachable markings ({} deadlocks, complete: {}) in {:#?}",
        rg.state_count(),
        rg.deadlocks().len(),
        rg.complete,
        now.elapsed()
    );

    let mut simulated = net.clone();
    let run = simulate(
        &mut simulated,
        &SimulationOptions {
            max_steps: 20,
            strategy: FiringStrategy::Random { seed },
        },
    )?;
    let labels: Vec<String> = run
        .fired
        .iter()
        .map(|t: &TransitionID| {
            simulated
                .transition(*t)
                .ok()
                .and_then(|transition| transition.label.clone())
                .unwrap_or_else(|| t.to_string())
        })
        .collect();
    println!("Simulation ({:?}, seed {}):", run.outcome, seed);
    for label in labels {
        println!("  {label}");
    }
    println!(
        "Final marking: {}",
        serde_json::to_string(&run.final_marking)?
    );

    Ok(())
}
