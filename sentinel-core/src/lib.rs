use std::sync::Arc;

use twilight_http::Client;
use twilight_model::id::{Id, marker::UserMarker};

use sentinel_database::Database;

/// Shared application context passed into command handlers.
///
/// Cheap to clone because it only stores reference-counted shared state.
#[derive(Clone)]
pub struct Context {
    pub http: Arc<Client>,
    pub db: Database,
    /// Operator allowed to mutate the global denylist, when configured.
    pub owner_id: Option<Id<UserMarker>>,
}

impl Context {
    /// Create a new application context.
    pub fn new(http: Arc<Client>, db: Database, owner_id: Option<Id<UserMarker>>) -> Self {
        Self { http, db, owner_id }
    }

    /// Whether a user is the configured bot owner.
    pub fn is_owner(&self, user_id: Id<UserMarker>) -> bool {
        self.owner_id == Some(user_id)
    }
}
