//! Protocol version query, cache and minimum-version gate.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::future::join_all;
use serde_json::{Value, json};
use tokio_test::assert_ok;

use cdp_client::{Client, ClientOptions, Error, ProtocolVersion};

use common::{MockBrowser, browser_responder, reply, reply_error};

#[tokio::test]
async fn version_is_queried_once_and_cached() {
    let mock = MockBrowser::with_protocol("1.3").await;
    let client = Client::connect(mock.url()).await.expect("connect");

    let first = client.get_protocol_version().await.expect("version");
    let second = client.get_protocol_version().await.expect("version");

    assert_eq!(first, ProtocolVersion::new(1, 3));
    assert_eq!(second, first);
    assert_eq!(mock.count("Browser.getVersion"), 1);
}

#[tokio::test]
async fn concurrent_first_callers_share_one_query() {
    let mock = MockBrowser::with_protocol("1.3").await;
    let client = Client::connect(mock.url()).await.expect("connect");

    let versions = join_all((0..10).map(|_| client.get_protocol_version())).await;

    for version in versions {
        assert_eq!(version.expect("version"), ProtocolVersion::new(1, 3));
    }
    assert_eq!(mock.count("Browser.getVersion"), 1);
}

#[tokio::test]
async fn minimum_version_accepts_equal_and_newer() {
    for reported in ["1.3", "1.10", "2.0"] {
        let mock = MockBrowser::with_protocol(reported).await;
        let client = Client::connect(mock.url()).await.expect("connect");

        assert_ok!(client.ensure_minimum_protocol_version("1.3").await);
    }
}

#[tokio::test]
async fn minimum_version_rejects_older() {
    let mock = MockBrowser::with_protocol("1.2").await;
    let client = Client::connect(mock.url()).await.expect("connect");

    let err = client
        .ensure_minimum_protocol_version("1.3")
        .await
        .unwrap_err();

    match err {
        Error::VersionTooOld { required, actual } => {
            assert_eq!(required, ProtocolVersion::new(1, 3));
            assert_eq!(actual, ProtocolVersion::new(1, 2));
        }
        other => panic!("expected VersionTooOld, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_query_reports_zero_and_is_cached() {
    let mock = MockBrowser::start(|request: &Value| {
        vec![reply_error(request, -32601, "'Browser.getVersion' wasn't found")]
    })
    .await;
    let client = Client::connect(mock.url()).await.expect("connect");

    assert_eq!(
        client.get_protocol_version().await.expect("version"),
        ProtocolVersion::ZERO
    );
    assert_eq!(
        client.get_protocol_version().await.expect("version"),
        ProtocolVersion::ZERO
    );
    assert_eq!(mock.count("Browser.getVersion"), 1);

    let err = client
        .ensure_minimum_protocol_version("0.1")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::VersionTooOld { .. }));
}

#[tokio::test]
async fn timed_out_query_is_retried_not_cached() {
    let calls = Arc::new(AtomicUsize::new(0));
    let answer = browser_responder("1.3");
    let mock = MockBrowser::start({
        let calls = Arc::clone(&calls);
        move |request: &Value| {
            // The first version query goes unanswered.
            let is_version = request["method"] == "Browser.getVersion";
            if is_version && calls.fetch_add(1, Ordering::SeqCst) == 0 {
                return Vec::new();
            }
            answer(request)
        }
    })
    .await;

    let options = ClientOptions::new().with_command_timeout(Duration::from_millis(100));
    let client = Client::connect_with_options(mock.url(), options)
        .await
        .expect("connect");

    let err = client.get_protocol_version().await.unwrap_err();
    assert!(matches!(err, Error::RequestTimeout { .. }), "{err:?}");

    let version = client.get_protocol_version().await.expect("version");
    assert_eq!(version, ProtocolVersion::new(1, 3));
    assert_eq!(mock.count("Browser.getVersion"), 2);

    assert_ok!(client.take_screenshot().await);
}

#[tokio::test]
async fn garbled_version_string_reports_zero() {
    let mock = MockBrowser::start(|request: &Value| {
        vec![reply(request, json!({ "protocolVersion": "one point three" }))]
    })
    .await;
    let client = Client::connect(mock.url()).await.expect("connect");

    let version = client.get_protocol_version().await.expect("version");
    assert_eq!(version, ProtocolVersion::ZERO);
}

#[tokio::test]
async fn invalid_minimum_is_an_argument_error() {
    let mock = MockBrowser::with_protocol("1.3").await;
    let client = Client::connect(mock.url()).await.expect("connect");

    for bad in ["", "1", "1.x", "latest"] {
        let err = client.ensure_minimum_protocol_version(bad).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }), "{bad:?}: {err:?}");
    }
    assert_eq!(mock.count("Browser.getVersion"), 0);
}

#[tokio::test]
async fn version_query_after_close_is_not_cached_as_zero() {
    let mock = MockBrowser::with_protocol("1.3").await;
    let client = Client::connect(mock.url()).await.expect("connect");
    client.close().await;

    let err = client.get_protocol_version().await.unwrap_err();
    assert!(matches!(err, Error::ConnectionClosed));
}

#[tokio::test]
async fn browser_version_reports_product_details() {
    let mock = MockBrowser::with_protocol("1.3").await;
    let client = Client::connect(mock.url()).await.expect("connect");

    let info = client.browser_version().await.expect("browser version");

    assert_eq!(info.protocol_version, "1.3");
    assert_eq!(info.product, "HeadlessChrome/120.0.6099.109");
    assert_eq!(info.js_version, "12.0.267.10");
    assert_eq!(info.protocol().expect("parse"), ProtocolVersion::new(1, 3));
}
