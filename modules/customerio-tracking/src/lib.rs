//! Forwards identify and action events from the host's bus to Customer.io.
//!
//! The host registers [`EventForwarder`] using the table from
//! [`EventForwarder::subscribed_events`] and hands each event to
//! [`EventForwarder::handle`] (or to the specific handler). Listeners see
//! each event through an [`EventDispatcher`] hook just before it goes out.

pub mod api;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod forwarder;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use api::TrackingApi;
pub use config::Config;
pub use dispatcher::{
    EventDispatcher, Hook, Listeners, NoopDispatcher, BEFORE_CREATE_CUSTOMER, BEFORE_FIRE_EVENT,
};
pub use error::{Result, TrackingError};
pub use forwarder::{
    anonymous_event_request, customer_event_request, identify_request, EventForwarder, HandlerId,
    Subscription, ACTION_PRIORITY, IDENTIFY_PRIORITY,
};
pub use types::{ActionEvent, Attributes, Customer, EventKind, IdentifyEvent, TrackingEvent};
