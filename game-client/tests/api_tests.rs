use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use game_client::api::{DreamloClient, HttpConnectivity, WordApiClient, build_http_client};
use game_core::{
    AlwaysOnline, Connectivity, LeaderboardService, RetryPolicy, WordAcquirer, WordSource,
};
use game_types::{AcquisitionFailure, LeaderboardEntry, PlayerName, RemoteError};
use reqwest::Url;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use warp::Filter;
use warp::http::StatusCode;

const API_KEY: &str = "secret-key";

macro_rules! serve {
    ($routes:expr) => {{
        let (addr, server) = warp::serve($routes).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        addr
    }};
}

fn base_url(addr: SocketAddr, path: &str) -> Url {
    Url::parse(&format!("http://{}/{}", addr, path)).unwrap()
}

fn unreachable_url() -> Url {
    Url::parse("http://127.0.0.1:1/").unwrap()
}

fn http() -> reqwest::Client {
    build_http_client(Duration::from_secs(5)).unwrap()
}

/// Word API that answers only with the right key; every word has the given synonyms.
fn word_api(words: Vec<serde_json::Value>, synonyms: serde_json::Value) -> (SocketAddr, Arc<AtomicU32>) {
    let word_hits = Arc::new(AtomicU32::new(0));
    let hits = word_hits.clone();
    let words = Arc::new(Mutex::new(words));

    let random_word = warp::path!("v1" / "randomword")
        .and(warp::get())
        .and(warp::header::exact("x-api-key", API_KEY))
        .map(move || {
            hits.fetch_add(1, Ordering::SeqCst);
            let mut words = words.lock().unwrap();
            let body = if words.len() > 1 {
                words.remove(0)
            } else {
                words[0].clone()
            };
            warp::reply::json(&body)
        });

    let thesaurus = warp::path!("v1" / "thesaurus")
        .and(warp::get())
        .and(warp::header::exact("x-api-key", API_KEY))
        .and(warp::query::<HashMap<String, String>>())
        .map(move |query: HashMap<String, String>| {
            warp::reply::json(&json!({
                "word": query.get("word").cloned().unwrap_or_default(),
                "synonyms": synonyms.clone(),
            }))
        });

    (serve!(random_word.or(thesaurus)), word_hits)
}

#[tokio::test]
async fn test_random_word_is_lowercased_first_entry() {
    let (addr, hits) = word_api(vec![json!({"word": ["Apple", "Pear"]})], json!([]));
    let client = WordApiClient::new(http(), base_url(addr, ""), API_KEY);

    assert_eq!(client.random_word().await, Ok("apple".to_string()));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_random_word_accepts_plain_string_and_empty_list() {
    let (addr, _) = word_api(
        vec![json!({"word": "Lemon"}), json!({"word": []})],
        json!([]),
    );
    let client = WordApiClient::new(http(), base_url(addr, ""), API_KEY);

    assert_eq!(client.random_word().await, Ok("lemon".to_string()));
    assert_eq!(client.random_word().await, Ok(String::new()));
}

#[tokio::test]
async fn test_wrong_key_is_a_status_error() {
    let (addr, _) = word_api(vec![json!({"word": ["apple"]})], json!([]));
    let client = WordApiClient::new(http(), base_url(addr, ""), "wrong-key");

    // warp answers a failed header match with 400
    assert_eq!(
        client.random_word().await,
        Err(RemoteError::Status { status: 400 })
    );
}

#[tokio::test]
async fn test_synonyms_skip_nulls() {
    let (addr, _) = word_api(
        vec![json!({"word": ["run"]})],
        json!(["sprint", null, "go fast", ""]),
    );
    let client = WordApiClient::new(http(), base_url(addr, ""), API_KEY);

    let synonyms = assert_ok!(client.synonyms("run").await);
    assert_eq!(synonyms, vec!["sprint", "go fast", ""]);
}

#[tokio::test]
async fn test_synonyms_null_list_is_empty() {
    let (addr, _) = word_api(vec![json!({"word": ["run"]})], json!(null));
    let client = WordApiClient::new(http(), base_url(addr, ""), API_KEY);

    assert_eq!(client.synonyms("run").await, Ok(Vec::new()));
}

#[tokio::test]
async fn test_malformed_word_payload() {
    let routes = warp::path!("v1" / "randomword").map(|| "<html>busy</html>");
    let addr = serve!(routes);
    let client = WordApiClient::new(http(), base_url(addr, ""), API_KEY);

    assert!(matches!(
        client.random_word().await,
        Err(RemoteError::Malformed { .. })
    ));
}

#[tokio::test]
async fn test_unreachable_word_api() {
    let client = WordApiClient::new(http(), unreachable_url(), API_KEY);

    let error = assert_err!(client.random_word().await);
    assert!(error.is_connectivity());
}

#[tokio::test]
async fn test_acquirer_over_http_accepts_valid_word() {
    let (addr, hits) = word_api(
        vec![json!({"word": ["Apple"]})],
        json!(["APPLE", "pome", "malus!"]),
    );
    let source = Arc::new(WordApiClient::new(http(), base_url(addr, ""), API_KEY));
    let acquirer = WordAcquirer::new(source, Arc::new(AlwaysOnline), RetryPolicy::default());

    let acquired = assert_ok!(acquirer.acquire().await);
    assert_eq!(acquired.word, "apple");
    assert_eq!(acquired.synonyms, vec!["pome"]);
    assert_eq!(acquired.attempts, 1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_acquirer_over_http_stops_after_five_words() {
    let (addr, hits) = word_api(vec![json!({"word": ["qat"]})], json!(["qat", "!!"]));
    let source = Arc::new(WordApiClient::new(http(), base_url(addr, ""), API_KEY));
    let acquirer = WordAcquirer::new(source, Arc::new(AlwaysOnline), RetryPolicy::default());

    let failure = assert_err!(acquirer.acquire().await);
    assert!(matches!(failure, AcquisitionFailure::Exhausted { attempts: 5, .. }));
    assert_eq!(hits.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_connectivity_probe() {
    // Any HTTP answer counts, even a 404.
    let addr = serve!(warp::path("nothing-here").map(|| "hi"));
    let online = HttpConnectivity::new(http(), base_url(addr, ""));
    assert!(online.is_online().await);

    let offline = HttpConnectivity::new(http(), unreachable_url());
    assert!(!offline.is_online().await);
}

#[tokio::test]
async fn test_submit_score_path() {
    let paths = Arc::new(Mutex::new(Vec::new()));
    let recorded = paths.clone();
    let routes = warp::path("lb")
        .and(warp::get())
        .and(warp::path::full())
        .map(move |path: warp::path::FullPath| {
            recorded.lock().unwrap().push(path.as_str().to_string());
            "OK"
        });
    let addr = serve!(routes);
    let client = DreamloClient::new(http(), base_url(addr, "lb/"), "private", "public");

    let name = PlayerName::parse("Ann Lee").unwrap();
    assert_ok!(client.submit(&name, 150, 42).await);

    assert_eq!(
        paths.lock().unwrap().clone(),
        vec!["/lb/private/add/Ann%20Lee/150/42".to_string()]
    );
}

#[tokio::test]
async fn test_submit_failure_status() {
    let routes = warp::path("lb")
        .map(|| warp::reply::with_status("down", StatusCode::INTERNAL_SERVER_ERROR));
    let addr = serve!(routes);
    let client = DreamloClient::new(http(), base_url(addr, "lb/"), "private", "public");

    let name = PlayerName::parse("Ann").unwrap();
    assert_eq!(
        client.submit(&name, 10, 1).await,
        Err(RemoteError::Status { status: 500 })
    );
}

#[tokio::test]
async fn test_fetch_board_in_service_order() {
    let routes = warp::path!("lb" / "public" / "json").map(|| {
        warp::reply::json(&json!({"dreamlo": {"leaderboard": {"entry": [
            {"name": "Bob", "score": "40", "seconds": "10", "text": "", "date": "10/17/2026"},
            {"name": "Alice", "score": "150", "seconds": "75", "text": "", "date": "10/17/2026"}
        ]}}}))
    });
    let addr = serve!(routes);
    let client = DreamloClient::new(http(), base_url(addr, "lb"), "private", "public");

    let entries = assert_ok!(client.fetch().await);
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Bob", "Alice"]);
    assert_eq!(entries[1].formatted_time(), "01:15");
}

#[tokio::test]
async fn test_fetch_other_board_by_public_code() {
    let routes = warp::path!("lb" / "other" / "json").map(|| {
        warp::reply::json(&json!({"dreamlo": {"leaderboard": {"entry":
            {"name": "Solo", "score": "60", "seconds": "9"}
        }}}))
    });
    let addr = serve!(routes);
    let client = DreamloClient::new(http(), base_url(addr, "lb/"), "private", "public");

    assert_eq!(
        client.fetch_board("other").await,
        Ok(vec![LeaderboardEntry::new("Solo", 60, 9)])
    );
}

#[tokio::test]
async fn test_fetch_empty_and_broken_boards() {
    let empty = warp::path!("lb" / "empty" / "json")
        .map(|| warp::reply::json(&json!({"dreamlo": {"leaderboard": null}})));
    let broken = warp::path!("lb" / "broken" / "json").map(|| "not json");
    let addr = serve!(empty.or(broken));
    let client = DreamloClient::new(http(), base_url(addr, "lb/"), "private", "public");

    assert_eq!(client.fetch_board("empty").await, Ok(Vec::new()));
    assert!(matches!(
        client.fetch_board("broken").await,
        Err(RemoteError::Malformed { .. })
    ));
    assert_eq!(
        client.fetch_board("missing").await,
        Err(RemoteError::Status { status: 404 })
    );
}
