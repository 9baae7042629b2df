//! Global denylist: operator commands plus the cross-guild enforcement
//! engine.
//!
//! The denylist is one shared table; each guild only controls whether it
//! is enforced there. Join events are the primary enforcement path; the
//! sweeps after `gban`/`ungban` are best-effort catch-up for members who
//! joined before the entry existed.

pub mod add;
pub mod engine;
pub mod list;
pub mod remove;
pub mod stat;
