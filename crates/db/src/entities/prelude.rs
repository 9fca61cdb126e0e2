//! Entity re-exports.

pub use super::submissions::Entity as Submissions;
