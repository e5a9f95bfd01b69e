use workflow_designer::core::workflow_graph::{
    analysis::{self, DEFAULT_MAX_DEPTH},
    model::{Place, Transition, Workflow},
};

fn graph(places: &[&str], transitions: &[(&str, &str, &str)], initial: Option<&str>) -> Workflow {
    let mut workflow = Workflow::new("graph");
    for place in places {
        workflow.add_place(Place::new(*place));
    }
    for (name, from, to) in transitions {
        workflow.add_transition(Transition::new(*name, &[*from], &[*to]));
    }
    if let Some(initial) = initial {
        workflow.set_initial_marking(initial);
    }
    workflow
}

#[test]
fn linear_chain_is_fully_reachable() {
    let workflow = graph(
        &["a", "b", "c"],
        &[("ab", "a", "b"), ("bc", "b", "c")],
        Some("a"),
    );
    let report = analysis::reachability(&workflow);
    assert_eq!(report.reachable, ["a", "b", "c"]);
    assert!(report.unreachable.is_empty());
    assert_eq!(report.dead_ends, ["c"]);
    assert!(!report.has_cycles);
    assert!(report.cycles.is_empty());

    let paths = analysis::trace_paths(&workflow, DEFAULT_MAX_DEPTH);
    assert_eq!(paths.len(), 1);
    let places: Vec<&str> = paths[0].iter().map(|s| s.place.as_str()).collect();
    let transitions: Vec<Option<&str>> =
        paths[0].iter().map(|s| s.transition.as_deref()).collect();
    assert_eq!(places, ["a", "b", "c"]);
    assert_eq!(transitions, [Some("ab"), Some("bc"), None]);
}

#[test]
fn two_place_loop_is_a_cycle() {
    let workflow = graph(
        &["a", "b", "c"],
        &[("go", "a", "b"), ("back", "b", "a")],
        Some("a"),
    );
    let report = analysis::reachability(&workflow);
    assert!(report.has_cycles);
    assert_eq!(report.cycles, vec![vec!["a".to_string(), "b".to_string()]]);
    assert_eq!(report.unreachable, ["c"]);
    assert_eq!(report.dead_ends, ["c"]);

    let paths = analysis::trace_paths(&workflow, DEFAULT_MAX_DEPTH);
    assert_eq!(paths.len(), 1);
    let last = paths[0].last().unwrap();
    assert!(last.cycle);
    assert_eq!(last.place, "a");
}

#[test]
fn loop_is_walked_three_times_before_cycle_step() {
    let workflow = graph(&["a", "b"], &[("go", "a", "b"), ("back", "b", "a")], Some("a"));
    let paths = analysis::trace_paths(&workflow, DEFAULT_MAX_DEPTH);
    assert_eq!(paths.len(), 1);
    let path = &paths[0];

    let places: Vec<&str> = path.iter().map(|step| step.place.as_str()).collect();
    assert_eq!(places, ["a", "b", "a", "b", "a", "b", "a"]);
    let transitions: Vec<Option<&str>> =
        path.iter().map(|step| step.transition.as_deref()).collect();
    assert_eq!(
        transitions,
        [Some("go"), Some("back"), Some("go"), Some("back"), Some("go"), Some("back"), None]
    );

    let (last, before) = path.split_last().unwrap();
    assert!(last.cycle);
    assert!(before.iter().all(|step| !step.cycle && !step.truncated));
    for place in ["a", "b"] {
        assert!(before.iter().filter(|step| step.place == place).count() <= 3);
    }
}

#[test]
fn diamond_sets_revisit_flag_but_has_no_cycle() {
    let workflow = graph(
        &["start", "left", "right", "end"],
        &[
            ("l", "start", "left"),
            ("r", "start", "right"),
            ("lj", "left", "end"),
            ("rj", "right", "end"),
        ],
        Some("start"),
    );
    let report = analysis::reachability(&workflow);
    assert!(report.has_cycles);
    assert!(report.cycles.is_empty());
    assert_eq!(analysis::trace_paths(&workflow, 10).len(), 2);
}

#[test]
fn without_initial_marking_everything_is_unreachable() {
    let workflow = graph(&["a", "b"], &[("ab", "a", "b")], None);
    let report = analysis::reachability(&workflow);
    assert!(report.reachable.is_empty());
    assert_eq!(report.unreachable, ["a", "b"]);
    assert_eq!(report.dead_ends, ["b"]);
    assert!(analysis::trace_paths(&workflow, DEFAULT_MAX_DEPTH).is_empty());
}

#[test]
fn paths_never_exceed_max_depth() {
    let places: Vec<String> = (0..12).map(|i| format!("p{}", i)).collect();
    let place_refs: Vec<&str> = places.iter().map(String::as_str).collect();
    let names: Vec<String> = (0..11).map(|i| format!("t{}", i)).collect();
    let transitions: Vec<(&str, &str, &str)> = (0..11)
        .map(|i| (names[i].as_str(), place_refs[i], place_refs[i + 1]))
        .collect();
    let workflow = graph(&place_refs, &transitions, Some("p0"));

    for depth in 1..=15 {
        let paths = analysis::trace_paths(&workflow, depth);
        assert_eq!(paths.len(), 1);
        assert!(paths[0].len() <= depth, "depth {}", depth);
        let last = paths[0].last().unwrap();
        assert_eq!(last.truncated, depth < 12, "depth {}", depth);
    }
    assert!(analysis::trace_paths(&workflow, 0).is_empty());
}

#[test]
fn self_loop_is_listed_as_cycle() {
    let workflow = graph(&["a", "b"], &[("again", "a", "a"), ("ab", "a", "b")], Some("a"));
    let report = analysis::reachability(&workflow);
    assert_eq!(report.cycles, vec![vec!["a".to_string()]]);
    assert!(report.has_cycles);
}
