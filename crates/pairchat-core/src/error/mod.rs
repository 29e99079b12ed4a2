//! Domain errors

mod match_error;

pub use match_error::{MatchError, MatchResult};
