//! Request/Response for console interaction.

use crate::storage::types::Timestamp;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Request {
    Put {
        key: String,
        value: String,
        expire_at: Timestamp,
    },
    Get {
        key: String,
    },
    Exists {
        key: String,
    },
    Del {
        key: String,
    },
    Can {
        role: String,
        resource: String,
        attribute: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Response {
    Put {
        key: String,
    },
    Get {
        key: String,
        value: Option<String>,
    },
    Exists {
        key: String,
        exists: bool,
    },
    Del {
        key: String,
    },
    Can {
        role: String,
        resource: String,
        attribute: String,
        granted: bool,
    },
}

impl Response {
    pub(super) fn status(&self) -> Status {
        let okay = match self {
            Response::Put { .. } | Response::Del { .. } => true,
            Response::Get { value, .. } => value.is_some(),
            Response::Exists { exists, .. } => *exists,
            Response::Can { granted, .. } => *granted,
        };
        if okay {
            Status::Okay
        } else {
            Status::Fail
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(super) enum Status {
    Okay,
    Fail,
}
