//! Rate gating logic and state management.

mod limiter;
mod window;

pub use limiter::{Admission, Permit, RateGate};
pub use window::TimeWindow;
