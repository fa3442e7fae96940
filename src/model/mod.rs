//! Data transfer types exchanged with the remote session.

pub mod completions;
pub mod manipulator;
pub mod plots;
pub mod vcs;
