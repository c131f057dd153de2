//! EventForwarder — turns identify/action events into Customer.io calls.
//!
//! Each handler makes exactly one provider call. Failures come back to the
//! caller as `TrackingError::ProviderRequestFailed`; nothing is retried or
//! swallowed here. Redelivery, if any, is the host's decision.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::info;

use crate::api::TrackingApi;
use crate::dispatcher::{EventDispatcher, Hook};
use crate::error::{Result, TrackingError};
use crate::types::{ActionEvent, Attributes, Customer, EventKind, IdentifyEvent, TrackingEvent};

/// Identify runs just ahead of Action, and both ahead of default-priority
/// listeners on the host bus.
pub const IDENTIFY_PRIORITY: i32 = 80;
pub const ACTION_PRIORITY: i32 = 81;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerId {
    OnIdentify,
    OnAction,
}

impl HandlerId {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerId::OnIdentify => "on_identify",
            HandlerId::OnAction => "on_action",
        }
    }
}

/// One row of the registration table read by the host bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    pub kind: EventKind,
    pub handler: HandlerId,
    pub priority: i32,
}

pub struct EventForwarder {
    api: Arc<dyn TrackingApi>,
}

impl EventForwarder {
    pub fn new(api: Arc<dyn TrackingApi>) -> Self {
        Self { api }
    }

    pub fn client(&self) -> &Arc<dyn TrackingApi> {
        &self.api
    }

    /// Swap the provider handle. Takes `&mut self`, so no call can be in
    /// flight on the old handle while this runs.
    pub fn set_client(&mut self, api: Arc<dyn TrackingApi>) {
        self.api = api;
    }

    /// Static registration table. Does not depend on instance state.
    pub fn subscribed_events() -> Vec<Subscription> {
        vec![
            Subscription {
                kind: EventKind::Identify,
                handler: HandlerId::OnIdentify,
                priority: IDENTIFY_PRIORITY,
            },
            Subscription {
                kind: EventKind::Action,
                handler: HandlerId::OnAction,
                priority: ACTION_PRIORITY,
            },
        ]
    }

    /// Route an event to the handler registered for its kind.
    pub async fn handle(
        &self,
        event: &mut TrackingEvent,
        dispatcher: &dyn EventDispatcher,
    ) -> Result<()> {
        match event {
            TrackingEvent::Identify(identify) => self.on_identify(identify, dispatcher).await,
            TrackingEvent::Action(action) => self.on_action(action, dispatcher).await,
        }
    }

    pub async fn on_identify(
        &self,
        event: &mut IdentifyEvent,
        dispatcher: &dyn EventDispatcher,
    ) -> Result<()> {
        dispatcher.dispatch(Hook::BeforeCreateCustomer(&mut *event));

        let customer = &event.customer;
        ensure_customer_id(customer)?;

        info!(
            customer_id = %customer.id,
            attributes = %log_json(&customer.attributes),
            "Sending createCustomer request to Customer.io"
        );

        let request = identify_request(customer);
        self.api.add_customer(&request).await?;
        Ok(())
    }

    pub async fn on_action(
        &self,
        event: &mut ActionEvent,
        dispatcher: &dyn EventDispatcher,
    ) -> Result<()> {
        dispatcher.dispatch(Hook::BeforeFireEvent(&mut *event));
        let event = &*event;

        info!(
            action = %event.action,
            attributes = %log_json(&event.attributes),
            "Firing Customer.io event"
        );

        match &event.customer {
            Some(customer) => {
                ensure_customer_id(customer)?;
                let request = customer_event_request(event, customer);
                self.api.track_customer_event(&request).await?;
            }
            None => {
                let request = anonymous_event_request(event);
                self.api.track_anonymous_event(&request).await?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Request builders
// ---------------------------------------------------------------------------

/// `customer.attributes` with `id` and `email` laid over the top.
/// Identity fields win over same-named attributes.
pub fn identify_request(customer: &Customer) -> Map<String, Value> {
    let mut request = customer.attributes.clone();
    request.insert("id".into(), Value::String(customer.id.clone()));
    if let Some(email) = &customer.email {
        request.insert("email".into(), Value::String(email.clone()));
    }
    request
}

/// `{id, name, data}` where `data` is the event attributes overlaid by the
/// customer attributes.
pub fn customer_event_request(event: &ActionEvent, customer: &Customer) -> Map<String, Value> {
    let mut data = event.attributes.clone();
    merge(&mut data, &customer.attributes);

    let mut request = Map::new();
    request.insert("id".into(), Value::String(customer.id.clone()));
    request.insert("name".into(), Value::String(event.action.clone()));
    request.insert("data".into(), Value::Object(data));
    request
}

/// Event attributes with `action` laid over the top.
pub fn anonymous_event_request(event: &ActionEvent) -> Map<String, Value> {
    let mut request = event.attributes.clone();
    request.insert("action".into(), Value::String(event.action.clone()));
    request
}

fn merge(into: &mut Attributes, from: &Attributes) {
    for (key, value) in from {
        into.insert(key.clone(), value.clone());
    }
}

fn ensure_customer_id(customer: &Customer) -> Result<()> {
    if customer.id.trim().is_empty() {
        return Err(TrackingError::MissingCustomerId);
    }
    Ok(())
}

fn log_json(attributes: &Attributes) -> String {
    serde_json::to_string(attributes).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn identify_request_merges_identity_and_attributes() {
        let customer = Customer::new("u1")
            .with_email("a@b.com")
            .with_attribute("plan", "pro");

        assert_eq!(
            identify_request(&customer),
            object(json!({"id": "u1", "email": "a@b.com", "plan": "pro"}))
        );
    }

    #[test]
    fn identity_fields_win_over_colliding_attributes() {
        let customer = Customer::new("u1")
            .with_email("a@b.com")
            .with_attribute("id", "spoofed")
            .with_attribute("email", "spoofed@x.com");

        let request = identify_request(&customer);
        assert_eq!(request["id"], json!("u1"));
        assert_eq!(request["email"], json!("a@b.com"));
        assert_eq!(request.len(), 2);
    }

    #[test]
    fn identify_request_omits_missing_email() {
        let customer = Customer::new("u1").with_attribute("email", "from-attrs@x.com");
        let request = identify_request(&customer);
        assert_eq!(request["email"], json!("from-attrs@x.com"));
    }

    #[test]
    fn customer_event_data_prefers_customer_attributes() {
        let event = ActionEvent::new("purchased")
            .with_attribute("amount", 10)
            .with_attribute("plan", "free");
        let customer = Customer::new("u1").with_attribute("plan", "pro");

        assert_eq!(
            customer_event_request(&event, &customer),
            object(json!({"id": "u1", "name": "purchased", "data": {"amount": 10, "plan": "pro"}}))
        );
    }

    #[test]
    fn anonymous_request_keeps_action_name() {
        let event = ActionEvent::new("viewed_page")
            .with_attribute("url", "/x")
            .with_attribute("action", "overwritten?");

        assert_eq!(
            anonymous_event_request(&event),
            object(json!({"action": "viewed_page", "url": "/x"}))
        );
    }

    #[test]
    fn subscription_table_is_fixed() {
        let table = EventForwarder::subscribed_events();
        assert_eq!(
            table,
            vec![
                Subscription {
                    kind: EventKind::Identify,
                    handler: HandlerId::OnIdentify,
                    priority: 80,
                },
                Subscription {
                    kind: EventKind::Action,
                    handler: HandlerId::OnAction,
                    priority: 81,
                },
            ]
        );
    }
}
