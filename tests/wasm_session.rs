#![cfg(target_arch = "wasm32")]

use portfolio_engine::PortfolioSession;
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn session_add_and_transition() {
    let mut session = PortfolioSession::new(7);
    assert!(session.add_project("Alpha".to_string()));
    assert!(!session.add_project("Alpha".to_string()));
    assert_eq!(session.project_count(), 1);

    // APPROVED is not reachable from IDEA; PROPOSAL is
    assert!(!session.transition_project("Alpha", "APPROVED", None));
    assert!(session.transition_project("Alpha", "PROPOSAL", None));
    assert!(!session.transition_project("Alpha", "NOT_A_STATE", None));
}

#[wasm_bindgen_test]
fn session_simulate_returns_batch() {
    let mut session = PortfolioSession::new(7);
    session.add_project("Alpha".to_string());

    let batch = session.simulate(10);
    assert!(!batch.is_null());

    let aggregate = session.simulate_aggregate(10);
    assert!(!aggregate.is_null());
}

#[wasm_bindgen_test]
fn session_reset_clears_portfolio() {
    let mut session = PortfolioSession::new(7);
    session.add_project("Alpha".to_string());
    session.reset();
    assert_eq!(session.project_count(), 0);
}
