//! The provider seam.
//!
//! `TrackingApi` is what the forwarder talks to. Production wires in
//! `CustomerIoClient`; tests use `testing::MockTrackingApi`.

use std::sync::Arc;

use async_trait::async_trait;
use customerio_client::{CustomerIoClient, Result};
use serde_json::{Map, Value};

#[async_trait]
pub trait TrackingApi: Send + Sync {
    /// Create or update a customer. `request` carries `id` and profile fields.
    async fn add_customer(&self, request: &Map<String, Value>) -> Result<()>;

    /// Record `{id, name, data}` against a known customer.
    async fn track_customer_event(&self, request: &Map<String, Value>) -> Result<()>;

    /// Record an event with no customer attached.
    async fn track_anonymous_event(&self, request: &Map<String, Value>) -> Result<()>;
}

#[async_trait]
impl TrackingApi for CustomerIoClient {
    async fn add_customer(&self, request: &Map<String, Value>) -> Result<()> {
        CustomerIoClient::add_customer(self, request).await
    }

    async fn track_customer_event(&self, request: &Map<String, Value>) -> Result<()> {
        CustomerIoClient::track_customer_event(self, request).await
    }

    async fn track_anonymous_event(&self, request: &Map<String, Value>) -> Result<()> {
        CustomerIoClient::track_anonymous_event(self, request).await
    }
}

// ---------------------------------------------------------------------------
// Arc<T> blanket — lets tests keep a handle on the mock for assertions
// ---------------------------------------------------------------------------

#[async_trait]
impl<T: TrackingApi + ?Sized> TrackingApi for Arc<T> {
    async fn add_customer(&self, request: &Map<String, Value>) -> Result<()> {
        (**self).add_customer(request).await
    }

    async fn track_customer_event(&self, request: &Map<String, Value>) -> Result<()> {
        (**self).track_customer_event(request).await
    }

    async fn track_anonymous_event(&self, request: &Map<String, Value>) -> Result<()> {
        (**self).track_anonymous_event(request).await
    }
}
