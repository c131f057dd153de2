//! Event payloads carried over the host's bus.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form attribute map forwarded to Customer.io as-is.
pub type Attributes = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub attributes: Attributes,
}

impl Customer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            attributes: Attributes::new(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// "This customer's profile should be created or updated."
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifyEvent {
    pub customer: Customer,
}

impl IdentifyEvent {
    pub fn new(customer: Customer) -> Self {
        Self { customer }
    }
}

/// A named action, attributed to a customer when one is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEvent {
    pub action: String,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
}

impl ActionEvent {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            attributes: Attributes::new(),
            customer: None,
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_customer(mut self, customer: Customer) -> Self {
        self.customer = Some(customer);
        self
    }

    pub fn is_anonymous(&self) -> bool {
        self.customer.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Identify,
    Action,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Identify => "customerio.identify",
            EventKind::Action => "customerio.action",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrackingEvent {
    Identify(IdentifyEvent),
    Action(ActionEvent),
}

impl TrackingEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            TrackingEvent::Identify(_) => EventKind::Identify,
            TrackingEvent::Action(_) => EventKind::Action,
        }
    }
}

impl From<IdentifyEvent> for TrackingEvent {
    fn from(event: IdentifyEvent) -> Self {
        TrackingEvent::Identify(event)
    }
}

impl From<ActionEvent> for TrackingEvent {
    fn from(event: ActionEvent) -> Self {
        TrackingEvent::Action(event)
    }
}
