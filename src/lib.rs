//! Greedy class-timetable generation with typed conflicts and fix suggestions.
//!
//! [`solver::generate_timetable`] and [`suggest::suggest_resolutions`] are the
//! two entry points; everything they read comes in as a [`data::Snapshot`].

pub mod config;
pub mod conflict;
pub mod data;
pub mod error;
pub mod leave;
pub mod repository;
pub mod server;
pub mod solver;
pub mod suggest;
pub mod tracker;
pub mod validation;

pub use conflict::Conflict;
pub use data::{ScheduleEntry, Snapshot, TimetableResult};
pub use error::{Error, Result};
pub use solver::generate_timetable;
pub use suggest::suggest_resolutions;
