//! Splitting a send into relay-sized chunks.

use tracing::{debug, warn};

use agrirent_core::config::push::RELAY_BATCH_LIMIT;

use crate::error::PushError;
use crate::message::{PushMessage, PushTicket};
use crate::relay::PushRelay;

/// What happened to one message of a chunked send.
#[derive(Debug, Clone)]
pub struct MessageOutcome {
    /// Recipient token of the message.
    pub to: String,
    /// The relay's ticket, or the error that failed the whole chunk.
    pub result: Result<PushTicket, PushError>,
}

impl MessageOutcome {
    /// Whether the relay accepted the message.
    pub fn is_accepted(&self) -> bool {
        matches!(&self.result, Ok(ticket) if ticket.is_ok())
    }
}

/// Send `messages` in chunks of at most `batch_size` (capped at the relay
/// limit), returning one outcome per message in input order.
///
/// A chunk that fails entirely marks each of its messages failed; the
/// remaining chunks are still sent.
pub async fn send_in_chunks(
    relay: &dyn PushRelay,
    messages: &[PushMessage],
    batch_size: usize,
) -> Vec<MessageOutcome> {
    let size = batch_size.clamp(1, RELAY_BATCH_LIMIT);
    let mut outcomes = Vec::with_capacity(messages.len());

    for (index, chunk) in messages.chunks(size).enumerate() {
        match relay.send(chunk).await {
            Ok(tickets) => {
                if tickets.len() != chunk.len() {
                    warn!(
                        chunk = index,
                        expected = chunk.len(),
                        received = tickets.len(),
                        "Relay returned a ticket count that does not match the chunk"
                    );
                }
                let mut tickets = tickets.into_iter();
                for message in chunk {
                    let result = tickets.next().ok_or_else(|| {
                        PushError::InvalidResponse("no ticket for message".to_string())
                    });
                    outcomes.push(MessageOutcome {
                        to: message.to.clone(),
                        result,
                    });
                }
                debug!(chunk = index, size = chunk.len(), "Push chunk submitted");
            }
            Err(e) => {
                warn!(chunk = index, size = chunk.len(), error = %e, "Push chunk failed");
                outcomes.extend(chunk.iter().map(|message| MessageOutcome {
                    to: message.to.clone(),
                    result: Err(e.clone()),
                }));
            }
        }
    }

    outcomes
}
