//! Domain models for Taskdeck.
//!
//! # Core Concepts
//!
//! - [`Project`]: Named container of tasks. Projects are created and listed,
//!   never updated or deleted through the API.
//! - [`Task`]: Unit of work under exactly one project, carrying a
//!   [`TaskStatus`] and a [`TaskPriority`].
//!
//! Request payloads (`Create*Input`, [`UpdateTaskInput`]) hold the raw values a
//! client sent. They are validated into typed values ([`NewTask`],
//! [`TaskPatch`]) before anything is persisted.

mod project;
mod task;

pub use project::*;
pub use task::*;
