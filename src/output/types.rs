use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

pub const SCHEMA_VERSION: &str = "foyer.v1";

/// Exactly one of `plan` / `result` appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    Plan(Value),
    Result(Value),
}

impl Payload {
    pub fn plan<T: Serialize>(plan: &T) -> Result<Self, serde_json::Error> {
        Ok(Payload::Plan(serde_json::to_value(plan)?))
    }

    pub fn result<T: Serialize>(result: &T) -> Result<Self, serde_json::Error> {
        Ok(Payload::Result(serde_json::to_value(result)?))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Plan(_) => "plan",
            Payload::Result(_) => "result",
        }
    }

    pub fn body(&self) -> &Value {
        match self {
            Payload::Plan(v) | Payload::Result(v) => v,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub schema_version: &'static str,
    pub time: DateTime<Utc>,
    pub request_id: Uuid,
    pub op: &'static str,
    pub apply: bool,
    #[serde(flatten)]
    pub payload: Payload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,
}

impl Envelope {
    pub fn new(op: &'static str, payload: Payload) -> Self {
        Envelope {
            schema_version: SCHEMA_VERSION,
            time: Utc::now(),
            request_id: Uuid::new_v4(),
            op,
            apply: matches!(payload, Payload::Result(_)),
            payload,
            duration_ms: None,
        }
    }

    pub fn timed(mut self, duration_ms: Option<u128>) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}
