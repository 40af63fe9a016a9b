// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "auth/mod.rs"]
pub mod auth;

#[path = "documents/mod.rs"]
pub mod documents;

#[path = "highlight/mod.rs"]
pub mod highlight;
