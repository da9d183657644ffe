//! Send-time scheduling.
//!
//! A [`ScheduleSpec`] is a symbolic description of when to send ("in 2
//! hours", "tomorrow at 9am", an explicit date and time). It is resolved to
//! an absolute timestamp only at send time.

mod model;
mod resolve;

pub use model::{SchedulePreset, ScheduleSpec};
pub use resolve::resolve_schedule;
