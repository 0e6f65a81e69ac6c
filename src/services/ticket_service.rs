//! Ticket issuance and the gate admitting realtime subscribers.

use thiserror::Error;
use tracing::debug;

use crate::{
    dto::room::{RoomSnapshot, TicketResponse},
    error::ServiceError,
    services::broadcast,
    state::{
        SharedState,
        hub::Subscription,
        room::{GameError, RoomId},
    },
};

/// Opaque refusal returned to realtime clients; the reason is only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("denied")]
pub struct AdmissionDenied;

/// A subscriber let into a room.
pub struct Admission {
    /// Username the ticket was issued to.
    pub identity: String,
    /// Receiving end of the room's snapshots.
    pub subscription: Subscription,
    /// View of the room at subscription time.
    pub initial: RoomSnapshot,
}

/// Issue a ticket for a member of the room.
pub async fn issue_ticket(
    state: &SharedState,
    room_id: RoomId,
    identity: &str,
) -> Result<TicketResponse, ServiceError> {
    let handle = state.room(room_id)?;
    let room = handle.lock().await;
    if !room.is_member(identity) {
        return Err(GameError::NotMember(identity.to_string()).into());
    }

    let issued = state.tickets().issue(room_id, identity);
    debug!(room_id = %room_id, identity, exp = issued.claims.exp, "ticket issued");
    Ok(TicketResponse {
        ticket: issued.ticket,
        expires_at: issued.claims.exp,
    })
}

/// Check `ticket` against `room_id` and the live membership, then subscribe.
///
/// Subscription and the initial snapshot happen under the room lock, so the subscriber
/// misses no publish and sees none twice.
pub async fn admit(
    state: &SharedState,
    room_id: RoomId,
    ticket: Option<&str>,
) -> Result<Admission, AdmissionDenied> {
    let Some(ticket) = ticket.filter(|ticket| !ticket.is_empty()) else {
        debug!(room_id = %room_id, "admission denied: no ticket");
        return Err(AdmissionDenied);
    };

    let claims = state.tickets().verify(ticket).map_err(|err| {
        debug!(room_id = %room_id, reason = %err, "admission denied");
        AdmissionDenied
    })?;
    if claims.room != room_id {
        debug!(room_id = %room_id, ticket_room = %claims.room, "admission denied: room mismatch");
        return Err(AdmissionDenied);
    }

    let handle = state.room(room_id).map_err(|_| {
        debug!(room_id = %room_id, "admission denied: room not found");
        AdmissionDenied
    })?;
    let room = handle.lock().await;
    if !room.is_member(&claims.username) {
        debug!(room_id = %room_id, identity = %claims.username, "admission denied: not a member");
        return Err(AdmissionDenied);
    }

    let subscription = state.hub().subscribe(room_id, &claims.username);
    let initial = broadcast::snapshot_for(&room, Some(&claims.username));
    Ok(Admission {
        identity: claims.username,
        subscription,
        initial,
    })
}
