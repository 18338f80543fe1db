//! Newline-delimited JSON frames exchanged with clients.
//!
//! Request:  `{"id": 1, "metadata": {"username": "..", "password": "..", "token": ".."},
//!            "call": {"method": "Set", "key": "k", "value": "v"}}`
//! Response: `{"id": 1, "ok": {"kind": "status", "success": true, "message": ".."}}`
//!       or: `{"id": 1, "err": {"code": "key_exists", "message": "key already exists"}}`
use crate::types::{CallMetadata, KeyValuePair};
use crate::NskvError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub metadata: CallMetadata,
    pub call: Call,
}

/// Every RPC method with its input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum Call {
    UseNamespace { namespace: String },
    Set { key: String, value: String },
    Update { key: String, value: String },
    Has { key: String },
    Unset { key: String },
    Get { key: String },
    Count,
    ShowKeys,
    ShowData,
    ShowNamespaces,
}

impl Call {
    pub fn method(&self) -> &'static str {
        match self {
            Call::UseNamespace { .. } => "UseNamespace",
            Call::Set { .. } => "Set",
            Call::Update { .. } => "Update",
            Call::Has { .. } => "Has",
            Call::Unset { .. } => "Unset",
            Call::Get { .. } => "Get",
            Call::Count => "Count",
            Call::ShowKeys => "ShowKeys",
            Call::ShowData => "ShowData",
            Call::ShowNamespaces => "ShowNamespaces",
        }
    }
}

/// Successful call output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reply {
    Token { token: String },
    Status { success: bool, message: String },
    Pair { key: String, value: String },
    Count { count: usize },
    Keys { keys: Vec<String> },
    Data { pairs: Vec<KeyValuePair> },
    Namespaces { namespaces: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl From<&NskvError> for ErrorBody {
    fn from(err: &NskvError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Ok(Reply),
    Err(ErrorBody),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub id: Option<u64>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl Response {
    pub fn ok(id: Option<u64>, reply: Reply) -> Self {
        Self {
            id,
            outcome: Outcome::Ok(reply),
        }
    }

    pub fn err(id: Option<u64>, err: &NskvError) -> Self {
        Self {
            id,
            outcome: Outcome::Err(err.into()),
        }
    }
}
