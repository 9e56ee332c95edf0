//! Test helper utilities for driving the router in-process

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use herb_origin_report::app_state::AppState;
use herb_origin_report::config::ReportSettings;
use herb_origin_report::routes;
use herb_origin_report::services::prompt::Prompt;
use herb_origin_report::services::report::{ModelError, ReportModel};

use crate::fixtures::{jpeg_photo, BatchFixture};

pub const BODY_LIMIT: usize = 10 * 1024 * 1024;
const BOUNDARY: &str = "herb-origin-report-test-boundary";

/// What the stub model answers with.
#[derive(Debug, Clone)]
pub enum StubReply {
    Text(String),
    Fail(String),
}

/// In-process stand-in for the hosted model. Records every prompt.
pub struct StubModel {
    reply: StubReply,
    calls: AtomicUsize,
    prompts: Mutex<Vec<Prompt>>,
}

impl StubModel {
    pub fn replying(text: &str) -> Arc<Self> {
        Self::with_reply(StubReply::Text(text.to_string()))
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Self::with_reply(StubReply::Fail(message.to_string()))
    }

    fn with_reply(reply: StubReply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<Prompt> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ReportModel for StubModel {
    async fn generate(&self, prompt: &Prompt) -> Result<String, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.clone());
        match &self.reply {
            StubReply::Text(text) => Ok(text.clone()),
            StubReply::Fail(message) => Err(ModelError::Provider(message.clone())),
        }
    }

    fn model_name(&self) -> &str {
        "stub"
    }
}

/// Router wired to the given model.
pub fn app(model: Arc<dyn ReportModel>, settings: ReportSettings) -> Router {
    routes::router(AppState::from_shared(model, settings), BODY_LIMIT)
}

/// Hand-built `multipart/form-data` body.
#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header(header::CONTENT_LENGTH, self.body.len())
            .body(Body::from(self.body))
            .unwrap()
    }
}

/// The fixture's text fields, without a photo.
pub fn batch_form(fixture: &BatchFixture) -> MultipartForm {
    fixture
        .fields()
        .iter()
        .fold(MultipartForm::new(), |form, (name, value)| form.text(name, value))
}

/// The fixture's text fields plus a JPEG of the fixture's size.
pub fn batch_form_with_photo(fixture: &BatchFixture) -> MultipartForm {
    batch_form(fixture).file(
        "photo",
        "batch.jpg",
        "image/jpeg",
        &jpeg_photo(fixture.photo_bytes),
    )
}

/// Send one request through the router and collect the response.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, String::from_utf8_lossy(&bytes).into_owned())
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, HeaderMap, String) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

/// The redirect target of a 303 response.
pub fn location(headers: &HeaderMap) -> String {
    headers
        .get(header::LOCATION)
        .expect("missing Location header")
        .to_str()
        .unwrap()
        .to_string()
}
