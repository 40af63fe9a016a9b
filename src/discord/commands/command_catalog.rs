// Discord commands module.
// Each feature gets its own command file.

pub mod highlight;

// Bot presence management
pub mod presence;
