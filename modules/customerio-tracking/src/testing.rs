// Test doubles for the forwarder's two seams.
//
// - MockTrackingApi (TrackingApi) — records every request, optional forced failure
// - RecordingDispatcher (EventDispatcher) — records hook names, optional mutation
//
// Both can share a Timeline so tests can assert the hook fired before the call.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use customerio_client::{CustomerIoError, Result};
use serde_json::{Map, Value};

use crate::api::TrackingApi;
use crate::dispatcher::{EventDispatcher, Hook};

pub type Timeline = Arc<Mutex<Vec<String>>>;

#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    AddCustomer(Map<String, Value>),
    CustomerEvent(Map<String, Value>),
    AnonymousEvent(Map<String, Value>),
}

impl ApiCall {
    pub fn name(&self) -> &'static str {
        match self {
            ApiCall::AddCustomer(_) => "add_customer",
            ApiCall::CustomerEvent(_) => "track_customer_event",
            ApiCall::AnonymousEvent(_) => "track_anonymous_event",
        }
    }

    pub fn request(&self) -> &Map<String, Value> {
        match self {
            ApiCall::AddCustomer(r) | ApiCall::CustomerEvent(r) | ApiCall::AnonymousEvent(r) => r,
        }
    }
}

// ---------------------------------------------------------------------------
// MockTrackingApi
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockTrackingApi {
    calls: Mutex<Vec<ApiCall>>,
    failure: Option<CustomerIoFailure>,
    timeline: Option<Timeline>,
}

#[derive(Debug, Clone)]
enum CustomerIoFailure {
    Api { status: u16, message: String },
    Network(String),
}

impl MockTrackingApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call answers with a non-2xx carrying `message`.
    pub fn failing(mut self, status: u16, message: impl Into<String>) -> Self {
        self.failure = Some(CustomerIoFailure::Api {
            status,
            message: message.into(),
        });
        self
    }

    /// Every call fails at the transport level.
    pub fn unreachable(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(CustomerIoFailure::Network(message.into()));
        self
    }

    pub fn with_timeline(mut self, timeline: Timeline) -> Self {
        self.timeline = Some(timeline);
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ApiCall) -> Result<()> {
        if let Some(timeline) = &self.timeline {
            timeline.lock().unwrap().push(call.name().to_string());
        }
        self.calls.lock().unwrap().push(call);

        match &self.failure {
            None => Ok(()),
            Some(CustomerIoFailure::Api { status, message }) => Err(CustomerIoError::Api {
                status: *status,
                message: message.clone(),
            }),
            Some(CustomerIoFailure::Network(message)) => {
                Err(CustomerIoError::Network(message.clone()))
            }
        }
    }
}

#[async_trait]
impl TrackingApi for MockTrackingApi {
    async fn add_customer(&self, request: &Map<String, Value>) -> Result<()> {
        self.record(ApiCall::AddCustomer(request.clone()))
    }

    async fn track_customer_event(&self, request: &Map<String, Value>) -> Result<()> {
        self.record(ApiCall::CustomerEvent(request.clone()))
    }

    async fn track_anonymous_event(&self, request: &Map<String, Value>) -> Result<()> {
        self.record(ApiCall::AnonymousEvent(request.clone()))
    }
}

// ---------------------------------------------------------------------------
// RecordingDispatcher
// ---------------------------------------------------------------------------

type Mutation = Box<dyn Fn(&mut Hook<'_>) + Send + Sync>;

#[derive(Default)]
pub struct RecordingDispatcher {
    hooks: Mutex<Vec<String>>,
    timeline: Option<Timeline>,
    mutation: Option<Mutation>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeline(mut self, timeline: Timeline) -> Self {
        self.timeline = Some(timeline);
        self
    }

    /// Run `mutation` on every hook, after recording it.
    pub fn with_mutation<F>(mut self, mutation: F) -> Self
    where
        F: Fn(&mut Hook<'_>) + Send + Sync + 'static,
    {
        self.mutation = Some(Box::new(mutation));
        self
    }

    pub fn hooks(&self) -> Vec<String> {
        self.hooks.lock().unwrap().clone()
    }
}

impl EventDispatcher for RecordingDispatcher {
    fn dispatch(&self, mut hook: Hook<'_>) {
        let name = hook.name().to_string();
        if let Some(timeline) = &self.timeline {
            timeline.lock().unwrap().push(name.clone());
        }
        self.hooks.lock().unwrap().push(name);

        if let Some(mutation) = &self.mutation {
            mutation(&mut hook);
        }
    }
}
