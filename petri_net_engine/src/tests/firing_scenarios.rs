use crate::{
    explore_reachability_graph, petri_net, simulate, ArcType, Marking, PetriNet, PlaceID,
    TransitionID,
};
use crate::execution::{ReachabilityOptions, SimulationOptions, SimulationOutcome};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn single_input_scenario() {
    init_logger();
    let mut net = PetriNet::new();
    let p0 = net.add_place(Some(PlaceID(0))).unwrap();
    let p1 = net.add_place(Some(PlaceID(1))).unwrap();
    let t = net
        .add_transition(Some("t".into()), Some(TransitionID(1)))
        .unwrap();
    net.add_arc(ArcType::place_to_transition(p0, t)).unwrap();
    net.add_arc(ArcType::transition_to_place(t, p1)).unwrap();

    net.mark(p0).unwrap();
    assert_eq!(net.token_count(p0).unwrap(), 1);
    assert!(net.is_enabled(t).unwrap());

    assert!(net.fire(t).unwrap());
    assert_eq!(net.token_count(p0).unwrap(), 0);
    assert_eq!(net.token_count(p1).unwrap(), 1);
    assert!(!net.is_enabled(t).unwrap());

    assert!(!net.fire(t).unwrap());
    assert_eq!(net.token_count(p0).unwrap(), 0);
    assert_eq!(net.token_count(p1).unwrap(), 1);
    assert!(crate::petrinet_to_json(&net)
        .unwrap()
        .contains(r#"{"id":1,"tokens":1}"#));
}

#[test]
fn two_input_scenario() {
    init_logger();
    let mut net = PetriNet::new();
    let p0 = net.add_place(Some(PlaceID(0))).unwrap();
    let p1 = net.add_place(Some(PlaceID(1))).unwrap();
    let p2 = net.add_place(Some(PlaceID(2))).unwrap();
    let t = net
        .add_transition(Some("join".into()), Some(TransitionID(2)))
        .unwrap();
    net.add_input_arc(p0, t)
        .unwrap()
        .add_input_arc(p1, t)
        .unwrap()
        .add_output_arc(t, p2)
        .unwrap();

    net.mark(p0).unwrap();
    assert!(!net.is_enabled(t).unwrap());
    // Not enabled: no partial consumption from p0
    assert!(!net.fire(t).unwrap());
    assert_eq!(net.marking(), Marking::from([(p0, 1), (p1, 0), (p2, 0)]));

    net.mark(p1).unwrap().mark(p1).unwrap();
    assert!(net.is_enabled(t).unwrap());
    assert!(net.fire(t).unwrap());
    assert_eq!(net.marking(), Marking::from([(p0, 0), (p1, 1), (p2, 1)]));
}

#[test]
fn transition_without_inputs_is_always_enabled() {
    let mut net = PetriNet::new();
    let t = net.add_transition(Some("generate".into()), None).unwrap();
    assert!(net.is_enabled(t).unwrap());
    // No outputs either: firing changes nothing, but it fires
    assert!(net.fire(t).unwrap());
    assert!(net.is_enabled(t).unwrap());
}

#[test]
fn fire_moves_exactly_one_token_per_arc() {
    // Fork: p_in -> t -> {p_a, p_b, p_c}, with p_in holding several tokens
    let mut net = PetriNet::new();
    let p_in = net.add_place(None).unwrap();
    let outs: Vec<PlaceID> = (0..3).map(|_| net.add_place(None).unwrap()).collect();
    let t = net.add_transition(Some("fork".into()), None).unwrap();
    net.add_input_arc(p_in, t).unwrap();
    for p in &outs {
        net.add_output_arc(t, *p).unwrap();
    }
    for _ in 0..3 {
        net.mark(p_in).unwrap();
    }

    assert!(net.fire(t).unwrap());
    assert_eq!(net.token_count(p_in).unwrap(), 2);
    for p in &outs {
        assert_eq!(net.token_count(*p).unwrap(), 1);
    }
}

#[test]
fn tokens_never_go_negative() {
    let mut net = petri_net!(("a"; "b"), ("b"; "a", "c")).unwrap();
    net.mark(PlaceID(0)).unwrap();
    let transitions: Vec<TransitionID> = net.transitions().map(|t| t.id()).collect();
    for _ in 0..10 {
        for t in &transitions {
            net.fire(*t).unwrap();
            assert!(net.marking().values().all(|tokens| *tokens <= 1));
        }
    }
    // One token circulates or ends up consumed by "c" (which produces nothing)
    assert!(net.marking().values().sum::<u64>() <= 1);
}

#[test]
fn simulation_and_reachability_agree_on_deadlocks() {
    init_logger();
    // Producer/consumer with a one-slot buffer
    let mut net = PetriNet::new();
    let ready = net.add_place(None).unwrap();
    let buffer = net.add_place(None).unwrap();
    let free = net.add_place(None).unwrap();
    let consumed = net.add_place(None).unwrap();
    let produce = net.add_transition(Some("produce".into()), None).unwrap();
    let consume = net.add_transition(Some("consume".into()), None).unwrap();
    net.add_input_arc(ready, produce)
        .unwrap()
        .add_input_arc(free, produce)
        .unwrap()
        .add_output_arc(produce, buffer)
        .unwrap();
    net.add_input_arc(buffer, consume)
        .unwrap()
        .add_output_arc(consume, free)
        .unwrap()
        .add_output_arc(consume, consumed)
        .unwrap();
    net.mark(ready).unwrap().mark(ready).unwrap().mark(free).unwrap();

    let rg = explore_reachability_graph(&net, &ReachabilityOptions::default()).unwrap();
    assert!(rg.complete);
    let deadlocks = rg.deadlocks();
    assert_eq!(deadlocks.len(), 1);

    let run = simulate(&mut net, &SimulationOptions::default()).unwrap();
    assert_eq!(run.outcome, SimulationOutcome::Deadlock);
    assert_eq!(run.fired, vec![produce, consume, produce, consume]);
    assert_eq!(&run.final_marking, deadlocks[0]);
    assert_eq!(net.token_count(consumed).unwrap(), 2);
}
