// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The session-token hook. Token formats and signatures are the business of the
//! [`SessionParser`] implementation the embedder supplies.

use async_trait::async_trait;
use thiserror::Error;

use common::context::Session;

#[async_trait]
pub trait SessionParser: Send + Sync {
    async fn parse(&self, token: &str) -> Result<Session, SessionError>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid KS format")]
    InvalidFormat,

    #[error("KS expired")]
    Expired,

    #[error("Partner invalid")]
    PartnerUnknown,
}

impl SessionError {
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::InvalidFormat => "INVALID_KS_FORMAT",
            SessionError::Expired => "KS_EXPIRED",
            SessionError::PartnerUnknown => "PARTNER_INVALID",
        }
    }
}
