//! Single-target moderation commands.

pub mod ban;
pub mod unban;
