//! Short-lived signed tickets admitting realtime subscriptions.
//!
//! Format: `base64url(json claims) "." base64url(hmac_sha256(json claims))`.

use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use time::OffsetDateTime;

use crate::state::room::RoomId;

type HmacSha256 = Hmac<Sha256>;

/// Reasons a ticket fails verification. Never shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TicketError {
    /// Not two base64url segments around a JSON claims object.
    #[error("malformed ticket")]
    Malformed,
    /// The MAC does not match the claims.
    #[error("ticket signature mismatch")]
    BadSignature,
    /// The ticket expired.
    #[error("ticket expired")]
    Expired,
}

/// Claims carried by a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketClaims {
    /// Room the ticket admits to.
    pub room: RoomId,
    /// Username the ticket was issued to.
    pub username: String,
    /// Issue time (unix seconds).
    pub iat: i64,
    /// Expiry time (unix seconds).
    pub exp: i64,
}

/// A freshly signed ticket.
#[derive(Debug, Clone)]
pub struct IssuedTicket {
    /// Wire form handed to the client.
    pub ticket: String,
    /// Claims signed into the ticket.
    pub claims: TicketClaims,
}

/// Signs and verifies tickets with a process secret.
pub struct TicketAuthority {
    secret: Vec<u8>,
    validity: Duration,
}

impl TicketAuthority {
    /// Authority signing with `secret` and issuing tickets valid for `validity`.
    pub fn new(secret: impl Into<Vec<u8>>, validity: Duration) -> Self {
        Self {
            secret: secret.into(),
            validity,
        }
    }

    /// Issue a ticket for `username` in `room` valid from now.
    pub fn issue(&self, room: RoomId, username: &str) -> IssuedTicket {
        self.issue_at(room, username, OffsetDateTime::now_utc())
    }

    /// Issue a ticket as if the current time were `now`.
    pub fn issue_at(&self, room: RoomId, username: &str, now: OffsetDateTime) -> IssuedTicket {
        let iat = now.unix_timestamp();
        let validity = i64::try_from(self.validity.as_secs()).unwrap_or(i64::MAX);
        let claims = TicketClaims {
            room,
            username: username.to_string(),
            iat,
            exp: iat.saturating_add(validity),
        };

        // Serializing a struct of plain fields cannot fail.
        let payload = serde_json::to_vec(&claims).unwrap_or_default();
        let signature = self.sign(&payload).finalize().into_bytes();
        let ticket = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(&payload),
            URL_SAFE_NO_PAD.encode(signature)
        );

        IssuedTicket { ticket, claims }
    }

    /// Verify signature and expiry against the current time.
    pub fn verify(&self, ticket: &str) -> Result<TicketClaims, TicketError> {
        self.verify_at(ticket, OffsetDateTime::now_utc())
    }

    /// Verify signature and expiry as if the current time were `now`.
    pub fn verify_at(&self, ticket: &str, now: OffsetDateTime) -> Result<TicketClaims, TicketError> {
        let (payload, signature) = ticket.split_once('.').ok_or(TicketError::Malformed)?;
        let payload = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TicketError::Malformed)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TicketError::Malformed)?;

        self.sign(&payload)
            .verify_slice(&signature)
            .map_err(|_| TicketError::BadSignature)?;

        let claims: TicketClaims =
            serde_json::from_slice(&payload).map_err(|_| TicketError::Malformed)?;
        if claims.exp <= now.unix_timestamp() {
            return Err(TicketError::Expired);
        }
        Ok(claims)
    }

    fn sign(&self, payload: &[u8]) -> HmacSha256 {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(&self.secret)
            .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
        mac.update(payload);
        mac
    }
}
