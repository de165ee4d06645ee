//! Application services — use-cases composed from ports.

mod schedule_service;

pub use schedule_service::ScheduleService;
