//! Match request command handlers.

mod decide_request;
mod submit_request;
mod withdraw_request;

pub use decide_request::{DecideRequestCommand, DecideRequestHandler, Decision, DecisionOutcome};
pub use submit_request::{SubmitRequestCommand, SubmitRequestHandler};
pub use withdraw_request::{WithdrawOutcome, WithdrawRequestCommand, WithdrawRequestHandler};
