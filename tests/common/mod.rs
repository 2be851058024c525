#![allow(dead_code)]

use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

use uport_storefront::api::{ApiError, ApiRequest, Transport, Upload};
use uport_storefront::services::push::PushRegistry;
use uport_storefront::services::AppContext;
use uport_storefront::session::{Session, SessionContext};
use uport_storefront::store::MemoryStore;

/// Transport double: replays queued responses and records every call.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    responses: Arc<Mutex<VecDeque<Result<Value, ApiError>>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
    uploads: Arc<Mutex<Vec<Upload>>>,
}

impl RecordingTransport {
    pub fn with_responses(responses: Vec<Value>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into_iter().map(Ok).collect())),
            ..Default::default()
        }
    }

    pub async fn push(&self, response: Result<Value, ApiError>) {
        self.responses.lock().await.push_back(response);
    }

    async fn pop_response(&self) -> Result<Value, ApiError> {
        let mut guard = self.responses.lock().await;
        guard
            .pop_front()
            .unwrap_or_else(|| Ok(json!({ "status": 0, "message": "no response queued" })))
    }

    pub async fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn paths(&self) -> Vec<String> {
        self.requests
            .lock()
            .await
            .iter()
            .map(|r| r.path.clone())
            .collect()
    }

    pub async fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        self.requests.lock().await.push(request);
        self.pop_response().await
    }

    async fn upload(&self, upload: Upload) -> Result<Value, ApiError> {
        self.uploads.lock().await.push(upload);
        self.pop_response().await
    }
}

#[derive(Clone, Default)]
pub struct RecordingPush {
    pub registered: Arc<Mutex<Vec<String>>>,
    pub unregistered: Arc<Mutex<usize>>,
}

#[async_trait::async_trait]
impl PushRegistry for RecordingPush {
    async fn register(&self, external_id: &str) {
        self.registered.lock().await.push(external_id.to_string());
    }

    async fn unregister(&self) {
        *self.unregistered.lock().await += 1;
    }
}

pub struct Harness {
    pub transport: RecordingTransport,
    pub store: Arc<MemoryStore>,
    pub push: RecordingPush,
    pub ctx: AppContext,
}

pub fn harness(responses: Vec<Value>) -> Harness {
    let transport = RecordingTransport::with_responses(responses);
    let store = Arc::new(MemoryStore::new());
    let session = SessionContext::new(store.clone());
    let push = RecordingPush::default();
    let ctx = AppContext::new(
        Arc::new(transport.clone()),
        session,
        Arc::new(push.clone()),
        "https://uports.in/admin/",
        "1.0.41",
    );
    Harness {
        transport,
        store,
        push,
        ctx,
    }
}

/// Harness with a B2B user already logged in as id 7.
pub async fn logged_in(responses: Vec<Value>) -> Harness {
    let h = harness(responses);
    h.ctx
        .session
        .save(&Session {
            user_id: "7".into(),
            name: "Acme Co".into(),
            user_type: "2".into(),
            token: "abc".into(),
            minimum_qty: None,
        })
        .await
        .unwrap();
    h
}

pub fn cart_line(id: i64, product_id: i64, price: &str, quantity: i64) -> Value {
    json!({
        "id": id,
        "product_id": product_id,
        "product_name": format!("item {id}"),
        "product_image": "",
        "sales_price": price,
        "regular_price": price,
        "offer_price": "0",
        "quantity": quantity,
        "product_size": "1kg"
    })
}

pub fn ok(result: Value) -> Value {
    json!({ "status": 1, "message": "ok", "result": result })
}
