//! Maintenance request lifecycle engine
//!
//! Pure policy and projection logic: the role gate, assignment resolution, the status
//! state machine, and the kanban and report views. Nothing in here touches storage.

pub mod access;
pub mod assignment;
pub mod kanban;
pub mod lifecycle;
pub mod reports;
