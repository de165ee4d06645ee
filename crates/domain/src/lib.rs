//! # lumen-domain
//!
//! Pure domain model for the lumen lighting automation core.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Schedules** (time/sun/sensor-triggered automation rules)
//! - Define **Scenes** (named lighting presets applied as one command)
//! - Define **Light commands** (the fan-out payload sent to physical targets)
//! - Define **Pending commands** (in-flight fan-outs awaiting acknowledgment)
//! - Define **Conflicts** (pairwise findings between schedules, with resolutions)
//! - Define **Events** (lifecycle notifications for commands and schedules)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod command;
pub mod conflict;
pub mod event;
pub mod scene;
pub mod schedule;
