// The infra module contains implementations of core traits.
// Each external system gets its own submodule.

#[path = "google_docs/mod.rs"]
pub mod google_docs;

#[path = "config/app_config.rs"]
pub mod config;
