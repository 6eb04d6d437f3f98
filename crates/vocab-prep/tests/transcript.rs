//! Tests for transcript fetching against a mocked YouTube.

#![cfg(feature = "transcript")]

use serde_json::{Value, json};
use vocab_prep::{Error, TranscriptClient};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VIDEO_ID: &str = "dQw4w9WgXcQ";
const API_KEY: &str = "AIzaTestKey_123";

const TIMEDTEXT: &str = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0.0" dur="1.5">Привет всем</text><text start="1.5" dur="2.0">Сегодня мы говорим о котах</text></transcript>"#;

fn client_for(server: &MockServer) -> TranscriptClient {
    TranscriptClient::builder().url(server.uri()).build().unwrap()
}

async fn mock_watch_page(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/watch"))
        .and(query_param("v", VIDEO_ID))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mock_watch_page_with_key(server: &MockServer) {
    let html = format!(
        r#"<html><script>ytcfg.set({{"INNERTUBE_API_KEY": "{API_KEY}", "OTHER": 1}});</script></html>"#
    );
    mock_watch_page(server, &html).await;
}

async fn mock_player(server: &MockServer, response: Value) {
    Mock::given(method("POST"))
        .and(path("/youtubei/v1/player"))
        .and(query_param("key", API_KEY))
        .and(body_partial_json(json!({ "videoId": VIDEO_ID })))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .expect(1)
        .mount(server)
        .await;
}

async fn mock_timedtext(server: &MockServer, lang: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path("/api/timedtext"))
        .and(query_param("lang", lang))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn track(server: &MockServer, lang: &str, kind: Option<&str>) -> Value {
    let mut track = json!({
        "baseUrl": format!("{}/api/timedtext?v={VIDEO_ID}&lang={lang}&fmt=srv3", server.uri()),
        "languageCode": lang,
        "name": { "runs": [{ "text": lang }] }
    });
    if let Some(kind) = kind {
        track["kind"] = json!(kind);
    }
    track
}

fn player_with_tracks(tracks: Vec<Value>) -> Value {
    json!({
        "playabilityStatus": { "status": "OK" },
        "captions": {
            "playerCaptionsTracklistRenderer": { "captionTracks": tracks }
        }
    })
}

#[tokio::test]
async fn test_fetch_manual_transcript() {
    let server = MockServer::start().await;
    mock_watch_page_with_key(&server).await;
    mock_player(
        &server,
        player_with_tracks(vec![
            track(&server, "ru", Some("asr")),
            track(&server, "ru", None),
        ]),
    )
    .await;
    mock_timedtext(&server, "ru", TIMEDTEXT).await;

    let transcript = client_for(&server).fetch(VIDEO_ID, "ru").await.unwrap();

    assert!(!transcript.is_generated);
    assert_eq!(transcript.language_code, "ru");
    assert_eq!(transcript.segments.len(), 2);
    assert_eq!(
        transcript.text(),
        "Привет всем\nСегодня мы говорим о котах"
    );
}

#[tokio::test]
async fn test_fetch_falls_back_to_generated() {
    let server = MockServer::start().await;
    mock_watch_page_with_key(&server).await;
    mock_player(
        &server,
        player_with_tracks(vec![
            track(&server, "en", None),
            track(&server, "ru", Some("asr")),
        ]),
    )
    .await;
    mock_timedtext(&server, "ru", TIMEDTEXT).await;

    let transcript = client_for(&server).fetch(VIDEO_ID, "ru").await.unwrap();
    assert!(transcript.is_generated);
}

#[tokio::test]
async fn test_list_tracks() {
    let server = MockServer::start().await;
    mock_watch_page_with_key(&server).await;
    mock_player(
        &server,
        player_with_tracks(vec![track(&server, "ru", None), track(&server, "en", Some("asr"))]),
    )
    .await;

    let tracks = client_for(&server).list(VIDEO_ID).await.unwrap();
    assert_eq!(tracks.len(), 2);
    assert!(!tracks[0].base_url.contains("fmt=srv3"));
    assert!(tracks[1].is_generated);
}

#[tokio::test]
async fn test_no_transcript_in_language() {
    let server = MockServer::start().await;
    mock_watch_page_with_key(&server).await;
    mock_player(&server, player_with_tracks(vec![track(&server, "en", None)])).await;

    let err = client_for(&server).fetch(VIDEO_ID, "ru").await.unwrap_err();
    match err {
        Error::NoTranscriptFound { video_id, lang } => {
            assert_eq!(video_id, VIDEO_ID);
            assert_eq!(lang, "ru");
        }
        other => panic!("expected NoTranscriptFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_transcripts_disabled() {
    let server = MockServer::start().await;
    mock_watch_page_with_key(&server).await;
    mock_player(&server, json!({ "playabilityStatus": { "status": "OK" } })).await;

    let err = client_for(&server).fetch(VIDEO_ID, "ru").await.unwrap_err();
    assert!(matches!(err, Error::TranscriptsDisabled(id) if id == VIDEO_ID));
}

#[tokio::test]
async fn test_video_unavailable() {
    let server = MockServer::start().await;
    mock_watch_page_with_key(&server).await;
    mock_player(
        &server,
        json!({
            "playabilityStatus": { "status": "ERROR", "reason": "This video is unavailable" }
        }),
    )
    .await;

    let err = client_for(&server).fetch(VIDEO_ID, "ru").await.unwrap_err();
    match err {
        Error::VideoUnavailable { reason, .. } => {
            assert_eq!(reason, "This video is unavailable");
        }
        other => panic!("expected VideoUnavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_captcha_page() {
    let server = MockServer::start().await;
    mock_watch_page(&server, r#"<form><div class="g-recaptcha"></div></form>"#).await;

    let err = client_for(&server).fetch(VIDEO_ID, "ru").await.unwrap_err();
    assert!(matches!(err, Error::TooManyRequests));
}

#[tokio::test]
async fn test_watch_page_without_player_data() {
    let server = MockServer::start().await;
    mock_watch_page(&server, "<html>nothing here</html>").await;

    let err = client_for(&server).fetch(VIDEO_ID, "ru").await.unwrap_err();
    assert!(matches!(err, Error::VideoUnavailable { .. }));
}

#[tokio::test]
async fn test_http_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/watch"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch(VIDEO_ID, "ru").await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
}
