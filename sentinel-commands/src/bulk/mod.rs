//! Bulk member operations.
//!
//! Every command here snapshots the guild's member list once, runs the
//! shared batch engine over it, and replies with an aggregate failure
//! report.

pub mod perms;
pub mod role;
pub mod send;
