use chat_widget::services::session_manager::SessionManager;
use chat_widget::transcript::Entry;
use std::time::Duration;
use tokio::time::sleep;

#[tokio::test]
async fn basic_session_flow() {
    let mgr = SessionManager::new(Duration::from_secs(60));
    let sid = mgr.create_session().await;
    assert!(!sid.is_empty());
    let index = mgr.append_entry(&sid, Entry::User("hello".into())).await;
    assert_eq!(index, 0);
    let html = mgr.render_transcript(&sid).await.unwrap();
    assert!(html.contains("hello"));
    assert!(mgr.remove_session(&sid).await);
    assert!(mgr.render_transcript(&sid).await.is_none());
}

#[tokio::test]
async fn test_session_expiration() {
    let mgr = SessionManager::new(Duration::from_millis(10));
    let sid = mgr.create_session().await;

    // Wait for expiration
    sleep(Duration::from_millis(20)).await;

    let removed_count = mgr.purge_expired().await;
    assert_eq!(removed_count, 1, "Should have removed 1 expired session");
    assert!(
        !mgr.remove_session(&sid).await,
        "Session should already be gone"
    );
}

#[tokio::test]
async fn test_upstream_session_is_per_widget() {
    let mgr = SessionManager::new(Duration::from_secs(60));
    let first = mgr.create_session().await;
    let second = mgr.create_session().await;
    assert_eq!(mgr.len().await, 2);
    let ids = mgr.list_session_ids().await;
    assert!(ids.contains(&first) && ids.contains(&second));

    mgr.set_upstream_session(&first, Some("backend-1".to_string())).await;

    assert_eq!(mgr.upstream_session(&first).await.as_deref(), Some("backend-1"));
    assert_eq!(mgr.upstream_session(&second).await, None);
}

#[tokio::test]
async fn test_placeholder_replacement() {
    let mgr = SessionManager::new(Duration::from_secs(60));
    let sid = mgr.ensure_session("widget-a").await;
    assert_eq!(sid, "widget-a");

    mgr.append_entry(&sid, Entry::User("hola".into())).await;
    let slot = mgr.append_entry(&sid, Entry::Typing).await;
    assert!(mgr.replace_entry(&sid, slot, Entry::BotText("¡Hola!".into())).await);

    let transcript = mgr.get_transcript(&sid).await.unwrap();
    assert_eq!(transcript.entries()[1], Entry::BotText("¡Hola!".into()));
    assert!(!mgr.replace_entry("missing", 0, Entry::Typing).await);
}
