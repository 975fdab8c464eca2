use determinize::{
    convert, export, parse, try_convert, AutomatonCatalog, AutomatonError, Dfa, DfaRunner, Nfa,
    NfaRunner, StateId, StateSet,
};
use std::collections::{HashSet, VecDeque};

fn demo(name: &str) -> Dfa {
    convert(&AutomatonCatalog::get_by_name(name).unwrap())
}

fn state_labels(dfa: &Dfa) -> HashSet<String> {
    dfa.states().map(|(_, subset)| subset.label()).collect()
}

fn accepting_labels(dfa: &Dfa) -> HashSet<String> {
    dfa.accepting_states().map(|id| dfa.label(id)).collect()
}

fn edges(dfa: &Dfa) -> HashSet<(String, String, String)> {
    dfa.transitions()
        .map(|(from, symbol, to)| (dfa.label(from), symbol.clone(), dfa.label(to)))
        .collect()
}

/// States reachable from the start by following moves breadth-first.
fn reachable(dfa: &Dfa) -> HashSet<StateId> {
    let mut reached = HashSet::from([dfa.start()]);
    let mut queue = VecDeque::from([dfa.start()]);

    while let Some(id) = queue.pop_front() {
        for symbol in dfa.alphabet() {
            if let Some(next) = dfa.next(id, symbol) {
                if reached.insert(next) {
                    queue.push_back(next);
                }
            }
        }
    }

    reached
}

fn set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Every word over `alphabet` of length at most `max_len`.
fn words(alphabet: &[String], max_len: usize) -> Vec<Vec<String>> {
    let mut all = vec![Vec::new()];
    let mut frontier = vec![Vec::new()];

    for _ in 0..max_len {
        frontier = frontier
            .iter()
            .flat_map(|word: &Vec<String>| {
                alphabet.iter().map(move |symbol| {
                    let mut next = word.clone();
                    next.push(symbol.clone());
                    next
                })
            })
            .collect();
        all.extend(frontier.iter().cloned());
    }

    all
}

fn assert_equivalent(nfa: &Nfa, max_len: usize) {
    let dfa = convert(nfa);
    let mut nfa_runner = NfaRunner::new(nfa);
    let mut dfa_runner = DfaRunner::new(&dfa);

    // One symbol outside the alphabet exercises the stuck path.
    let mut alphabet: Vec<String> = nfa.alphabet.iter().cloned().collect();
    alphabet.push("#".to_string());

    for word in words(&alphabet, max_len) {
        assert_eq!(
            nfa_runner.accepts(&word),
            dfa_runner.accepts(&word),
            "'{}' disagrees on {:?}",
            nfa.name,
            word
        );
    }
}

#[test]
fn test_single_transition_scenario() {
    let dfa = demo("Single transition");

    assert_eq!(state_labels(&dfa), set(&["{0}", "{1}"]));
    assert_eq!(dfa.label(dfa.start()), "{0}");
    assert_eq!(accepting_labels(&dfa), set(&["{1}"]));
    assert_eq!(
        edges(&dfa),
        HashSet::from([("{0}".to_string(), "a".to_string(), "{1}".to_string())])
    );
}

#[test]
fn test_three_cycle_scenario() {
    let dfa = demo("Three cycle");

    assert_eq!(state_labels(&dfa), set(&["{0}", "{1}", "{2}"]));
    assert_eq!(accepting_labels(&dfa), set(&["{0}"]));
    assert!(dfa.is_accepting(dfa.start()));
    assert_eq!(
        edges(&dfa),
        HashSet::from([
            ("{0}".to_string(), "a".to_string(), "{1}".to_string()),
            ("{1}".to_string(), "b".to_string(), "{2}".to_string()),
            ("{2}".to_string(), "c".to_string(), "{0}".to_string()),
        ])
    );
}

#[test]
fn test_branching_scenario() {
    let dfa = demo("Branching");

    let merged = dfa.find(&StateSet::from_iter(["1", "2"])).unwrap();
    assert_eq!(dfa.next(dfa.start(), "a"), Some(merged));
    assert!(dfa.is_accepting(merged));
    assert_eq!(state_labels(&dfa), set(&["{0}", "{1,2}"]));
}

#[test]
fn test_single_state_scenario() {
    let dfa = demo("Single state");

    assert_eq!(state_labels(&dfa), set(&["{0}"]));
    assert_eq!(dfa.transition_count(), 0);
    assert_eq!(accepting_labels(&dfa), set(&["{0}"]));
}

#[test]
fn test_determinism_and_reachability_of_demos() {
    for index in 0..AutomatonCatalog::count() {
        let nfa = AutomatonCatalog::get_by_index(index).unwrap();
        let dfa = convert(&nfa);

        let mut seen = HashSet::new();
        for (from, symbol, _) in dfa.transitions() {
            assert!(seen.insert((from, symbol.clone())), "two moves from one pair");
        }

        assert_eq!(
            reachable(&dfa).len(),
            dfa.state_count(),
            "orphan state in '{}'",
            nfa.name
        );
    }
}

#[test]
fn test_language_equivalence_of_demos() {
    for index in 0..AutomatonCatalog::count() {
        assert_equivalent(&AutomatonCatalog::get_by_index(index).unwrap(), 5);
    }
}

#[test]
fn test_language_equivalence_with_heavy_nondeterminism() {
    let nfa = parse(
        r#"
name: Third from last is a
states: s, t, u, v
start: s
final: v
transitions:
  s -a-> s, t
  s -b-> s
  t -a-> u
  t -b-> u
  u -a-> v
  u -b-> v
"#,
    )
    .unwrap();

    let dfa = convert(&nfa);
    assert_eq!(dfa.state_count(), 8);
    assert_eq!(reachable(&dfa).len(), 8);
    assert_equivalent(&nfa, 7);
}

#[test]
fn test_dot_output_for_demo() {
    let dot = export(&demo("Ends with ab"));
    let lines: HashSet<&str> = dot.lines().map(str::trim).collect();

    assert!(lines.contains("\"\" -> \"{q0}\";"));
    assert!(lines.contains("\"{q0,q2}\" [shape=doublecircle];"));
    assert!(lines.contains("\"{q0}\" -> \"{q0,q1}\" [label=\"a\"];"));
    assert!(lines.contains("\"{q0,q1}\" -> \"{q0,q2}\" [label=\"b\"];"));
    assert!(lines.contains("\"{q0,q2}\" -> \"{q0}\" [label=\"b\"];"));
}

#[test]
fn test_malformed_input_is_rejected_before_conversion() {
    let mut nfa = Nfa::new("0");
    nfa.add_transition("0", "a", "1");

    assert!(matches!(
        try_convert(&nfa),
        Err(AutomatonError::MalformedAutomaton(_))
    ));
}
