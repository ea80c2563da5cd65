//! Domain types shared across the workspace.
//! - Entity definitions with their validation helpers.
//! - Closed enumerations for roles, categories, priorities, and statuses.
//! - No persistence concerns; stores live behind traits in `service`.

pub mod complaint;
pub mod errors;
pub mod user;
