/// Sequential batch engine for bulk member operations.
pub mod batch;
/// Shared embed styling.
pub mod embed;
/// Paginated member and guild enumeration helpers.
pub mod members;
/// Pure parser helpers.
pub mod parse;
/// Permission helper utilities.
pub mod permissions;
/// Channel-status template rendering.
pub mod template;
/// Single source of truth for the message-command prefix.
pub const COMMAND_PREFIX: char = '!';
