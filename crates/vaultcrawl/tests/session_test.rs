//! # Session Tests
//!
//! The async worker against an in-memory host: ordering, host round trips,
//! persistence and graph refresh.

use std::sync::Arc;

use vaultcrawl::{
    decode_state, DocumentGraph, DocumentNode, EngineConfig, LogAuthor, MemoryHost, NullHost,
    Recall, Session, ViewportAction,
};

fn vault() -> DocumentGraph {
    let mut graph = DocumentGraph::new();
    for (id, name) in [("alpha.md", "Alpha"), ("beta.md", "Beta"), ("gamma.md", "Gamma")] {
        graph.insert_node(DocumentNode::new(id, name)).unwrap();
    }
    graph
}

fn player_lines(view: &vaultcrawl::SessionView) -> Vec<String> {
    view.log
        .iter()
        .filter(|e| e.author == LogAuthor::Player)
        .map(|e| e.text.clone())
        .collect()
}

#[tokio::test]
async fn test_commands_run_in_submission_order() {
    let host = Arc::new(MemoryHost::new(vault()).with_content("alpha.md", "# Alpha\nFirst."));
    let session = Session::spawn(Arc::clone(&host), EngineConfig::testing()).await;

    // Submitted back to back: `open` waits on the host, the rest queue.
    let open = session.submit_command("open");
    let inventory = session.submit_command("inventory");
    let teleport = session.submit_command("teleport gamma");
    let stats = session.submit_command("stats");

    stats.await.unwrap();
    teleport.await.unwrap();
    inventory.await.unwrap();
    open.await.unwrap();

    let view = session.snapshot();
    assert_eq!(
        player_lines(&view),
        vec!["> open", "> inventory", "> teleport gamma", "> stats"]
    );
    assert_eq!(view.inventory, vec!["alpha.md".to_string()]);
    assert_eq!(view.current_room.as_deref(), Some("gamma.md"));

    let inventory_reply = view
        .log
        .iter()
        .skip_while(|e| e.text != "> inventory")
        .nth(1)
        .unwrap();
    assert_eq!(inventory_reply.text, "You carry:\n- Alpha");
}

#[tokio::test]
async fn test_state_is_persisted_after_each_command() {
    let host = Arc::new(MemoryHost::new(vault()).with_open_document("beta.md"));
    let session = Session::spawn(Arc::clone(&host), EngineConfig::testing()).await;
    assert_eq!(session.snapshot().current_room.as_deref(), Some("beta.md"));

    session.submit_command("look").await.unwrap();
    session.submit_command("teleport alpha").await.unwrap();
    assert_eq!(host.persist_count(), 2);

    let saved = decode_state(&host.saved_state().unwrap()).unwrap();
    assert_eq!(saved.current_room_id.as_deref(), Some("alpha.md"));
    assert_eq!(saved.travel_history, vec!["beta.md".to_string()]);
    assert!(saved.layout().is_some());

    // A new session resumes where the last one stopped.
    drop(session);
    let resumed = Session::spawn(Arc::clone(&host), EngineConfig::testing()).await;
    assert_eq!(resumed.snapshot().current_room.as_deref(), Some("alpha.md"));
}

#[tokio::test]
async fn test_host_failures_are_logged() {
    let host = Arc::new(MemoryHost::new(vault()));
    let session = Session::spawn(Arc::clone(&host), EngineConfig::testing()).await;
    host.set_fail_io(true);

    session.submit_command("open").await.unwrap();
    let view = session.snapshot();
    assert!(view.inventory.is_empty());
    assert!(view.log.iter().any(|e| e.text.starts_with("Could not open alpha.md")));
    assert_eq!(view.log.last().unwrap().text, "Progress could not be saved.");
    assert!(!view.busy);
}

#[tokio::test]
async fn test_link_round_trip_updates_graph() {
    let host = Arc::new(MemoryHost::new(vault()));
    let session = Session::spawn(Arc::clone(&host), EngineConfig::testing()).await;

    session.set_input("link gam").await.unwrap();
    let suggestions = session.snapshot().autocomplete;
    assert!(suggestions.active);
    assert_eq!(suggestions.suggestions.first().map(String::as_str), Some("gamma.md"));

    session.submit_command("link gam").await.unwrap();
    assert!(host.graph().outbound("alpha.md").contains("gamma.md"));
    assert!(!session.snapshot().autocomplete.active);

    session.set_input("link gam").await.unwrap();
    let after = session.snapshot().autocomplete;
    assert!(after.suggestions.iter().all(|id| id != "gamma.md"));
}

#[tokio::test]
async fn test_refresh_graph_picks_up_new_documents() {
    let host = Arc::new(MemoryHost::new(vault()));
    let session = Session::spawn(Arc::clone(&host), EngineConfig::testing()).await;
    let before = session.snapshot();

    let mut grown = vault();
    for i in 0..10 {
        let id = format!("extra-{i}.md");
        grown.insert_node(DocumentNode::new(id.clone(), id)).unwrap();
    }
    host.set_graph(grown);
    session.refresh_graph().await.unwrap();

    let after = session.snapshot();
    assert_ne!(after.layout_signature, before.layout_signature);
    assert_eq!(after.current_room, before.current_room);
    assert!(after.viewport.is_some());
}

#[tokio::test]
async fn test_viewport_and_recall() {
    let session = Session::spawn(Arc::new(MemoryHost::new(vault())), EngineConfig::testing()).await;

    session.viewport(ViewportAction::Fit).await.unwrap();
    let fitted = session.snapshot().viewport.unwrap();
    session.viewport(ViewportAction::Pan(2.0, 0.0)).await.unwrap();
    let panned = session.snapshot().viewport.unwrap();
    assert_eq!(panned.x, fitted.x + 2.0);

    session.submit_command("look").await.unwrap();
    session.submit_command("stats").await.unwrap();
    assert_eq!(session.recall(Recall::Older).await.unwrap().as_deref(), Some("stats"));
    assert_eq!(session.recall(Recall::Older).await.unwrap().as_deref(), Some("look"));
    assert_eq!(session.recall(Recall::Newer).await.unwrap().as_deref(), Some("stats"));
}

#[tokio::test]
async fn test_null_host_session() {
    let session = Session::spawn(Arc::new(NullHost), EngineConfig::default()).await;
    session.submit_command("north").await.unwrap();
    let view = session.snapshot();
    assert_eq!(view.current_room, None);
    assert_eq!(view.viewport, None);
    assert!(session.set_pending_ai(true).is_ok());
    assert!(!session.is_closed());
}
