// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use indexmap::IndexMap;
use serde::Serialize;

/// A decoded session token.
///
/// Token fields without a dedicated member are kept in `privileges`, in token order.
#[derive(Serialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub partner_id: i64,
    pub user_id: Option<String>,
    pub session_type: Option<i64>,
    pub master_partner_id: Option<i64>,
    /// Seconds since the Unix epoch
    pub expiry: Option<i64>,
    pub privileges: IndexMap<String, String>,
}

impl Session {
    pub fn is_expired_at(&self, now_epoch_seconds: i64) -> bool {
        self.expiry.is_some_and(|expiry| expiry < now_epoch_seconds)
    }
}

/// What a handler knows about the call it is serving.
#[derive(Clone, Debug)]
pub struct CallContext {
    pub service: String,
    pub action: String,
    pub session: Option<Session>,
}

impl CallContext {
    pub fn new(service: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            action: action.into(),
            session: None,
        }
    }

    pub fn with_session(mut self, session: Option<Session>) -> Self {
        self.session = session;
        self
    }

    pub fn partner_id(&self) -> Option<i64> {
        self.session.as_ref().map(|session| session.partner_id)
    }
}
