//! Client lookup provider trait.

use kc_model::Client;
use uuid::Uuid;

use crate::error::StorageResult;

/// Provider for client lookups.
///
/// Implementations must be thread-safe and support concurrent access.
pub trait ClientProvider: Send + Sync {
    /// Gets a client by internal ID.
    fn get_by_id(&self, realm_id: Uuid, id: Uuid) -> StorageResult<Option<Client>>;

    /// Gets a client by `client_id` (OAuth client identifier).
    fn get_by_client_id(&self, realm_id: Uuid, client_id: &str) -> StorageResult<Option<Client>>;
}
