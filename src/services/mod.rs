//! Create/list/update/delete orchestration over the [`Database`].
//!
//! Every operation validates its input and checks referenced entities before
//! it writes anything, so a failed call leaves the store untouched.
//!
//! [`Database`]: crate::db::Database

mod project;
mod task;

pub use project::*;
pub use task::*;
