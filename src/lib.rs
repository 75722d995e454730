//! Taskdeck: a project and task tracking REST API.
//!
//! Projects own tasks; tasks move through `todo -> in_progress -> done` under
//! the rules in [`transition`]. The HTTP surface lives in [`api`], the SQLite
//! store in [`db`], and the operations tying them together in [`services`].

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod models;
pub mod pagination;
pub mod services;
pub mod transition;

pub use error::{Error, Result};
