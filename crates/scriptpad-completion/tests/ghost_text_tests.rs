/// Integration tests for ghost text prediction and acceptance
use proptest::prelude::*;
use scriptpad_completion::{
    EngineConfig, GhostKey, GhostText, GhostTextPredictor, GhostTextSession, GhostTextState,
    HostMember, KeyOutcome, StaticHost, SuggestionEngine, Symbol, SymbolKind, SymbolSnapshot,
    UsageSnapshot,
};
use std::sync::Arc;

fn snapshot(names: &[&str]) -> SymbolSnapshot {
    SymbolSnapshot::from_symbols(
        names
            .iter()
            .map(|name| Symbol::new(*name, SymbolKind::HostFunction)),
    )
}

fn engine() -> SuggestionEngine {
    let host = StaticHost::new(vec![
        HostMember::callable("createNode", &["node"]),
        HostMember::callable("create", &[]),
        HostMember::callable("selectedNodes", &[]),
    ]);
    let engine = SuggestionEngine::python(EngineConfig::default(), Arc::new(host));
    engine.warm_up();
    engine
}

#[test]
fn test_shortest_strictly_longer_name() {
    let predictor = GhostTextPredictor::new();
    let symbols = snapshot(&["createNode", "create"]);
    let usage = UsageSnapshot::default();

    assert_eq!(predictor.predict("cre", 3, &symbols, &usage), "ate");
    assert_eq!(predictor.predict("create", 6, &symbols, &usage), "Node");
    assert_eq!(predictor.predict("createNode", 10, &symbols, &usage), "");
}

#[test]
fn test_snapshot_order_breaks_ties() {
    let predictor = GhostTextPredictor::new();
    let usage = UsageSnapshot::default();
    assert_eq!(predictor.predict("ab", 2, &snapshot(&["abY", "abX"]), &usage), "Y");
    assert_eq!(predictor.predict("ab", 2, &snapshot(&["abX", "abY"]), &usage), "X");
}

#[test]
fn test_engine_predicts_from_buffer_and_host() {
    let engine = engine();
    assert_eq!(engine.predict("x = sel", 7), "ectedNodes");

    let buffer = "render_farm_queue = []\nrender_f";
    assert_eq!(engine.predict(buffer, buffer.len()), "arm_queue");
}

#[test]
fn test_engine_predict_degrades() {
    let engine = engine();
    assert_eq!(engine.predict("", 0), "");
    assert_eq!(engine.predict("create(", 7), "");
    assert_eq!(engine.predict("cre", 99), "");
}

#[test]
fn test_session_accept_round_trip() {
    let engine = engine();
    let mut session = GhostTextSession::new();
    let buffer = "node = cre";

    session.refresh(&engine, buffer, buffer.len());
    assert_eq!(
        session.displayed(),
        Some(&GhostText::new("ate", buffer.len(), "create"))
    );

    let outcome = session.handle_key(GhostKey::Tab, &engine, buffer).unwrap();
    let applied = match outcome {
        KeyOutcome::Applied(applied) => applied,
        other => panic!("expected applied ghost text, got {:?}", other),
    };
    assert_eq!(applied.text, "node = create");
    assert_eq!(applied.cursor, applied.text.len());
    assert_eq!(engine.usage().usage_count("create").unwrap(), 1);
    assert!(matches!(session.state(), GhostTextState::Accepted(_)));

    // Typing on resumes prediction from the new text
    session.refresh(&engine, &applied.text, applied.cursor);
    assert_eq!(session.displayed().unwrap().suffix, "Node");
}

#[test]
fn test_session_dismiss_on_escape_and_no_match() {
    let engine = engine();
    let mut session = GhostTextSession::new();

    session.refresh(&engine, "sel", 3);
    assert!(session.is_displayed());
    assert_eq!(
        session.handle_key(GhostKey::Escape, &engine, "sel").unwrap(),
        KeyOutcome::Dismissed
    );

    session.refresh(&engine, "zzz", 3);
    assert_eq!(session.state(), &GhostTextState::Dismissed);
}

#[test]
fn test_engine_mid_identifier() {
    let engine = engine();

    // The rest of the name already follows the cursor
    assert_eq!(engine.predict("n = createNode()", 12), "");

    let buffer = "n = selecX()";
    let ghost = engine.predict_ghost(buffer, 9).unwrap();
    assert_eq!(ghost.suffix, "tedNodes");
    let applied = engine.accept_ghost(buffer, &ghost).unwrap();
    assert_eq!(applied.text, "n = selectedNodes()");
    assert_eq!(engine.usage().usage_count("selectedNodes").unwrap(), 1);
}

proptest! {
    /// Property: prediction plus the current word always spells a known name
    #[test]
    fn prop_prediction_completes_known_name(
        names in prop::collection::vec("[a-zA-Z_][a-zA-Z0-9_]{0,10}", 1..20),
        word in "[a-zA-Z_]{1,3}"
    ) {
        let symbols = SymbolSnapshot::from_symbols(
            names.iter().map(|n| Symbol::new(n.clone(), SymbolKind::UserVariable)),
        );
        let suffix = GhostTextPredictor::new().predict(&word, word.len(), &symbols, &UsageSnapshot::default());

        if !suffix.is_empty() {
            let full = format!("{}{}", word, suffix);
            prop_assert!(symbols.contains(&full));
            let shorter = symbols
                .iter()
                .filter(|s| s.name.starts_with(&word) && s.name.len() > word.len())
                .any(|s| s.name.chars().count() < full.chars().count());
            prop_assert!(!shorter);
        }
    }
}
