use super::*;
use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use shared::{
    domain::{Role, GREETING_TEXT},
    protocol::CONNECTION_FAILURE_TEXT,
};
use storage::{MemoryStore, SESSION_ID_KEY, THEME_KEY};

#[derive(Default)]
struct ScriptedTransport {
    outcomes: Mutex<VecDeque<Result<WebhookReply, ExchangeError>>>,
    requests: Mutex<Vec<WebhookRequest>>,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    fn replying(outputs: &[&str]) -> Self {
        let transport = Self::default();
        {
            let mut outcomes = transport.outcomes.lock().expect("outcomes");
            for output in outputs {
                outcomes.push_back(Ok(WebhookReply::with_output(*output)));
            }
        }
        transport
    }

    fn failing() -> Self {
        let transport = Self::default();
        transport
            .outcomes
            .lock()
            .expect("outcomes")
            .push_back(Err(ExchangeError::transport("connection refused")));
        transport
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WebhookTransport for ScriptedTransport {
    async fn deliver(&self, request: &WebhookRequest) -> Result<WebhookReply, ExchangeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .expect("requests")
            .push(request.clone());
        self.outcomes
            .lock()
            .expect("outcomes")
            .pop_front()
            .unwrap_or_else(|| Ok(WebhookReply::default()))
    }
}

fn open_client() -> (Arc<MemoryStore>, ChatClient) {
    let store = Arc::new(MemoryStore::new());
    let client = ChatClient::open(store.clone());
    (store, client)
}

#[tokio::test]
async fn transcript_grows_by_two_per_successful_exchange() {
    let (_store, mut client) = open_client();
    let transport = ScriptedTransport::replying(&["one", "two", "three"]);

    for (n, text) in ["a", "b", "c"].into_iter().enumerate() {
        client.exchange(text, &transport).await.expect("exchange");
        assert_eq!(client.transcript().len(), 1 + 2 * (n + 1));
    }
    assert_eq!(transport.calls(), 3);
    assert_eq!(client.transcript()[0].text, GREETING_TEXT);
}

#[tokio::test]
async fn hello_scenario_appends_user_and_bot_messages() {
    let (_store, mut client) = open_client();
    let transport = ScriptedTransport::replying(&["hi there"]);

    let reply = client
        .exchange("hello", &transport)
        .await
        .expect("bot reply")
        .clone();
    assert_eq!(reply, ChatMessage::bot("hi there"));
    assert_eq!(client.transcript()[1], ChatMessage::user("hello"));
    assert!(!client.is_awaiting_reply());

    let requests = transport.requests.lock().expect("requests");
    assert_eq!(requests.len(), 1);
    assert_eq!(&requests[0].session_id, client.session_id());
    assert_eq!(requests[0].message, "hello");
}

#[tokio::test]
async fn transport_failure_appends_fixed_error_message() {
    let (_store, mut client) = open_client();
    let transport = ScriptedTransport::failing();

    let reply = client.exchange("hello", &transport).await.expect("bot reply");
    assert_eq!(reply.role, Role::Bot);
    assert_eq!(reply.text, CONNECTION_FAILURE_TEXT);
    assert!(!client.is_awaiting_reply());
}

#[tokio::test]
async fn blank_input_never_reaches_the_transport() {
    let (_store, mut client) = open_client();
    let transport = ScriptedTransport::default();

    assert!(client.exchange("   ", &transport).await.is_none());
    assert_eq!(client.transcript().len(), 1);
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn outstanding_exchange_blocks_a_second_request() {
    let (_store, mut client) = open_client();
    let transport = ScriptedTransport::replying(&["late"]);

    let first = client.submit_text("first").expect("first request");
    assert!(client.submit_text("second").is_none());
    assert!(client.exchange("third", &transport).await.is_none());
    assert_eq!(transport.calls(), 0);
    assert_eq!(client.transcript().len(), 2);

    let outcome = transport.deliver(&first).await;
    client.resolve(outcome);
    assert_eq!(client.transcript().len(), 3);
    assert_eq!(transport.calls(), 1);
}

#[test]
fn session_id_is_reused_across_reopen() {
    let store = Arc::new(MemoryStore::new());
    let first = ChatClient::open(store.clone()).session_id().clone();
    let second = ChatClient::open(store.clone()).session_id().clone();
    assert_eq!(first, second);
    assert_eq!(store.get(SESSION_ID_KEY).as_deref(), Some(first.as_str()));
}

#[test]
fn reset_session_generates_and_persists_a_new_id() {
    let (store, mut client) = open_client();
    let original = client.session_id().clone();

    let renewed = client.reset_session().expect("reset").clone();
    assert_ne!(original, renewed);
    assert_eq!(store.get(SESSION_ID_KEY).as_deref(), Some(renewed.as_str()));
}

#[test]
fn preference_toggles_persist_through_the_client() {
    let (store, mut client) = open_client();
    assert_eq!(client.toggle_theme(), Theme::Dark);
    assert!(client.toggle_high_contrast());

    let reopened = ChatClient::open(store.clone());
    assert_eq!(reopened.preferences().theme, Theme::Dark);
    assert!(reopened.preferences().high_contrast);
    assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
}

#[test]
fn revision_tracks_every_transcript_append() {
    let (_store, mut client) = open_client();
    assert_eq!(client.revision(), 0);
    client.input_mut().push_str("hello");
    client.submit().expect("request");
    assert_eq!(client.revision(), 1);
    client.resolve(Ok(WebhookReply::with_output("hi")));
    assert_eq!(client.revision(), 2);
    assert_eq!(client.messages_since(1).len(), 2);
}
