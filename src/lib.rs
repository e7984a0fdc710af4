//! Firefox Health Report UDFs.
//!
//! [`ProfileCreationTime`] turns the `profileCreation` day count of a payload into a millisecond
//! timestamp. The [`batch`], [`job`], [`payload`] and [`config`] modules are a small local host
//! for running it over payload dumps.

pub mod batch;
pub mod config;
pub mod eval;
pub mod job;
pub mod payload;
pub mod time;

pub use self::eval::{EvalFunc, ProfileCreationTime};
