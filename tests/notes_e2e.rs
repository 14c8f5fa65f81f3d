//! End-to-end tests over a real socket using the Rust SDK.

use reqwest::StatusCode;
use tiny_notes::NotesConfig;

mod common;

use common::{page_version, spawn_server, ADMIN_KEY};
use notes_sdk::NotesClient;

#[tokio::test]
async fn test_create_edit_and_view() {
    let server = spawn_server(NotesConfig::default()).await;
    let client = NotesClient::new(&server.url());

    let res = client.view("shopping").await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.create("shopping", ADMIN_KEY).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let html = res.text().await.unwrap();
    assert_eq!(page_version(&html), 1);
    assert!(server.note_file("shopping").is_file());

    let res = client.update("shopping", "# Shopping\n\n- [x] milk\n", 1).await.unwrap();
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(
        res.headers().get(reqwest::header::LOCATION).unwrap(),
        "/notes/shopping"
    );

    let html = client.view("shopping").await.unwrap().text().await.unwrap();
    assert_eq!(page_version(&html), 2);
    assert!(html.contains("- [x] milk"));

    server.stop().await;
}

#[tokio::test]
async fn test_stale_save_is_rejected() {
    let server = spawn_server(NotesConfig::default()).await;
    let client = NotesClient::new(&server.url());
    client.create("shared", ADMIN_KEY).await.unwrap();

    let first = client.update("shared", "# from tab one", 1).await.unwrap();
    assert_eq!(first.status(), StatusCode::FOUND);

    let second = client.update("shared", "# from tab two", 1).await.unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert!(second.text().await.unwrap().contains("/notes/shared"));

    let html = client.view("shared").await.unwrap().text().await.unwrap();
    assert!(html.contains("# from tab one"));
    assert_eq!(page_version(&html), 2);

    server.stop().await;
}

#[tokio::test]
async fn test_concurrent_saves_have_one_winner() {
    let server = spawn_server(NotesConfig::default()).await;
    let client = std::sync::Arc::new(NotesClient::new(&server.url()));
    client.create("race", ADMIN_KEY).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..6 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client
                .update("race", &format!("# writer {i}"), 1)
                .await
                .unwrap()
                .status()
        }));
    }

    let mut saved = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::FOUND => saved += 1,
            StatusCode::CONFLICT => conflicts += 1,
            other => panic!("unexpected status {other}"),
        }
    }
    assert_eq!(saved, 1);
    assert_eq!(conflicts, 5);

    let raw = std::fs::read_to_string(server.note_file("race")).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored["version"], 2);

    server.stop().await;
}

#[tokio::test]
async fn test_health_counts_notes() {
    let server = spawn_server(NotesConfig::default()).await;
    let client = NotesClient::new(&server.url());

    let health = client.health().await.unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.notes, Some(0));

    client.create("one", ADMIN_KEY).await.unwrap();
    client.create("two", ADMIN_KEY).await.unwrap();
    assert_eq!(client.health().await.unwrap().notes, Some(2));

    server.stop().await;
}

#[tokio::test]
async fn test_wrong_key_does_not_create() {
    let server = spawn_server(NotesConfig::default()).await;
    let client = NotesClient::new(&server.url());

    let res = client.create("secret", "guess").await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(!server.note_file("secret").exists());

    server.stop().await;
}

#[tokio::test]
async fn test_shutdown_stops_accepting() {
    let server = spawn_server(NotesConfig::default()).await;
    let url = server.url();
    server.stop().await;

    let client = NotesClient::new(&url);
    assert!(client.health().await.is_err());
}

#[tokio::test]
async fn test_full_length_multibyte_note_over_socket() {
    let server = spawn_server(NotesConfig::default()).await;
    let client = NotesClient::new(&server.url());
    client.create("long", ADMIN_KEY).await.unwrap();

    let at_limit = "ä".repeat(100_000);
    let res = client.update("long", &at_limit, 1).await.unwrap();
    assert_eq!(res.status(), StatusCode::FOUND);

    let over = "ä".repeat(100_001);
    let res = client.update("long", &over, 2).await.unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);

    server.stop().await;
}
