//! CLI command implementations.

pub mod check;
pub mod docs;
pub mod init;
pub mod output;
pub mod rules;
