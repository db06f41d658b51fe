//! Session orchestration: request, decode, apply, recover.

mod controller;
mod phase;

pub use controller::SessionController;
pub use phase::{ExchangeOutcome, ExchangePhase};
