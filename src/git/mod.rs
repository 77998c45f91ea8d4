//! Git repository management for drydock
//!
//! Handles:
//! - Repository initialization and commit identity
//! - Staging and the initial commit
//! - Remote bookkeeping and force-push

mod operations;

pub use operations::{
    add_all, add_remote, commit, configure_identity, has_remote, init, push_force,
};
