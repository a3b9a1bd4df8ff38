//! Background processing for AgriRent.
//!
//! When the document store offers a change feed, [`ChangeFeedWorker`]
//! consumes booking writes and runs each one through the trigger adapter:
//!
//! - different bookings run concurrently, bounded by `trigger.concurrency`
//! - writes to the same booking are queued and handled one at a time, in
//!   arrival order
//! - the feed is read continuously, so slow processing does not make it lag
//! - retryable failures are retried with exponential backoff

pub mod queue;
pub mod runner;

pub use queue::KeyedQueue;
pub use runner::ChangeFeedWorker;
