//! Scripted fakes for the gateway, clock and host seams.

use crate::{
    clock::Clock,
    error::{Result, StudioError},
    gateway::Gateway,
    models::{
        GenerateContentRequest, GenerateContentResponse, GenerateVideosRequest, VideoObject,
        VideoOperation,
    },
    session::HostCapabilities,
};
use async_trait::async_trait;
use bytes::Bytes;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

pub fn video_object(uri: &str) -> VideoObject {
    VideoObject::from_value(json!({ "uri": uri, "mimeType": "video/mp4" }))
}

#[derive(Debug, Clone)]
pub enum GatewayCall {
    Content(String, GenerateContentRequest),
    Videos(String, GenerateVideosRequest),
    Poll(String),
    Media(String),
}

#[derive(Default)]
pub struct FakeGateway {
    calls: Mutex<Vec<GatewayCall>>,
    content: Mutex<VecDeque<Result<GenerateContentResponse>>>,
    starts: Mutex<VecDeque<Result<VideoOperation>>>,
    polls: Mutex<VecDeque<Result<VideoOperation>>>,
    media: Mutex<VecDeque<Result<Bytes>>>,
    content_gate: Mutex<Option<Arc<Notify>>>,
    poll_gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_content(&self, response: Result<GenerateContentResponse>) {
        self.content.lock().unwrap().push_back(response);
    }

    pub fn push_start(&self, operation: Result<VideoOperation>) {
        self.starts.lock().unwrap().push_back(operation);
    }

    pub fn push_poll(&self, operation: Result<VideoOperation>) {
        self.polls.lock().unwrap().push_back(operation);
    }

    pub fn push_media(&self, data: Result<Bytes>) {
        self.media.lock().unwrap().push_back(data);
    }

    /// Content calls wait for a notification before answering.
    pub fn hold_content(&self, gate: Arc<Notify>) {
        *self.content_gate.lock().unwrap() = Some(gate);
    }

    /// Polls wait for a notification before answering.
    pub fn hold_polls(&self, gate: Arc<Notify>) {
        *self.poll_gate.lock().unwrap() = Some(gate);
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn content_requests(&self) -> Vec<(String, GenerateContentRequest)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GatewayCall::Content(model, request) => Some((model, request)),
                _ => None,
            })
            .collect()
    }

    pub fn video_requests(&self) -> Vec<(String, GenerateVideosRequest)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GatewayCall::Videos(model, request) => Some((model, request)),
                _ => None,
            })
            .collect()
    }

    pub fn media_requests(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GatewayCall::Media(uri) => Some(uri),
                _ => None,
            })
            .collect()
    }

    pub fn poll_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, GatewayCall::Poll(_)))
            .count()
    }

    fn record(&self, call: GatewayCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next<T>(queue: &Mutex<VecDeque<Result<T>>>, what: &str) -> Result<T> {
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(StudioError::ResponseError(format!("no scripted {}", what))))
    }

    async fn wait(gate: &Mutex<Option<Arc<Notify>>>) {
        let gate = gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn generate_content(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        self.record(GatewayCall::Content(model.to_string(), request));
        Self::wait(&self.content_gate).await;
        Self::next(&self.content, "content")
    }

    async fn generate_videos(
        &self,
        model: &str,
        request: GenerateVideosRequest,
    ) -> Result<VideoOperation> {
        self.record(GatewayCall::Videos(model.to_string(), request));
        Self::next(&self.starts, "operation")
    }

    async fn get_operation(&self, operation: &VideoOperation) -> Result<VideoOperation> {
        self.record(GatewayCall::Poll(operation.name.clone()));
        Self::wait(&self.poll_gate).await;
        Self::next(&self.polls, "poll")
    }

    async fn fetch_media(&self, uri: &str) -> Result<Bytes> {
        self.record(GatewayCall::Media(uri.to_string()));
        self.media
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Bytes::from_static(b"video/mp4")))
    }
}

/// Records requested delays and returns without waiting.
#[derive(Default)]
pub struct RecordingClock {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for RecordingClock {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        tokio::task::yield_now().await;
    }
}

pub struct FakeHost {
    selected: AtomicBool,
    fail_open: bool,
}

impl FakeHost {
    pub fn with_key() -> Self {
        Self {
            selected: AtomicBool::new(true),
            fail_open: false,
        }
    }

    pub fn without_key() -> Self {
        Self {
            selected: AtomicBool::new(false),
            fail_open: false,
        }
    }

    pub fn refusing() -> Self {
        Self {
            fail_open: true,
            ..Self::without_key()
        }
    }
}

#[async_trait]
impl HostCapabilities for FakeHost {
    async fn has_selected_api_key(&self) -> bool {
        self.selected.load(Ordering::SeqCst)
    }

    async fn open_select_key(&self) -> Result<()> {
        if self.fail_open {
            return Err(StudioError::ConfigError("key selection dismissed".into()));
        }
        self.selected.store(true, Ordering::SeqCst);
        Ok(())
    }
}
