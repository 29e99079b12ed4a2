//! Matchmaking engine
//!
//! Pairs waiting connections into one-to-one sessions, relays messages between
//! session members, and reconciles state when connections go away.
//!
//! All state lives in a single [`MatchmakingState`]. Callers serialize access to
//! it (the gateway keeps it behind one mutex) and deliver the returned
//! [`Outbound`](crate::Outbound) notifications after releasing that access.

mod queue;
mod reconciler;
mod relay;
mod session_table;
mod state;

pub use queue::WaitingQueue;
pub use reconciler::SweepReport;
pub use session_table::SessionTable;
pub use state::MatchmakingState;
