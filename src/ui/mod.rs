//! User-facing collaborators
//!
//! - Native folder picker (folder.rs)
//! - Group naming prompt (prompt.rs)

pub mod folder;
pub mod prompt;
