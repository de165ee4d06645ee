//! # lumen-app
//!
//! Application layer — the automation core and its **port definitions**.
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `ScheduleRepository` / `SceneRepository` — storage
//!   - `CommandPublisher` — fire-and-forget fan-out to physical targets
//!   - `EventPublisher` — lifecycle notification broadcast
//!   - `ReasoningService` — optional text-generation collaborator
//! - Implement the three core components:
//!   - `Scheduler` — per-minute evaluation of time-based schedules
//!   - `ConflictAnalyzer` — pairwise conflict detection with ranked resolutions
//!   - `CommandTracker` — at-most-one-terminal-event acknowledgment tracking
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `lumen-domain` only (plus `tokio::sync`/`tokio::time` for
//! channels and timeouts). Never imports adapter crates. Adapters depend on
//! *this* crate, not the reverse.

pub mod conflict;
pub mod event_bus;
pub mod ports;
pub mod rooms;
pub mod scheduler;
pub mod services;
pub mod tracker;
