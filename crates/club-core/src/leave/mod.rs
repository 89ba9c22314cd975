//! Club leave protocol
//!
//! Leaving a club is the one membership operation with real branching: a
//! regular member simply drops out, while the owner has to say what happens to
//! the club (hand it to an approved member, or close it). The decision is made
//! by [`plan_leave`], a pure function over a locked snapshot of the club and
//! its memberships. Repositories apply the resulting [`LeavePlan`] inside the
//! same transaction that took the snapshot.

mod disposition;
mod plan;

pub use disposition::{DispositionRequest, LeaveDisposition};
pub use plan::{plan_leave, LeaveOutcome, LeavePlan, LeaveRequest};
