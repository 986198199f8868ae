//! In-memory customer store
//!
//! A single mapping from identifier to record, guarded by an `RwLock` so
//! concurrent requests cannot race on a bare map. Each operation is one
//! guarded read-modify-write; there are no transactional semantics beyond
//! that.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::customer::{seed_customers, Customer};

/// Shared mapping of customer identifier to record.
///
/// The store owns the collection for the life of the process. It is injected
/// into handlers through `AppState` rather than living in a global.
pub struct CustomerStore {
    records: RwLock<HashMap<Uuid, Customer>>,
}

impl CustomerStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Create a store populated with the sample records
    pub fn seeded() -> Self {
        let mut records = HashMap::new();
        for customer in seed_customers() {
            records.insert(customer.id, customer);
        }
        Self {
            records: RwLock::new(records),
        }
    }

    /// Snapshot of every record, keyed by identifier
    pub async fn list(&self) -> HashMap<Uuid, Customer> {
        self.records.read().await.clone()
    }

    /// Look up a single record
    pub async fn get(&self, id: Uuid) -> Option<Customer> {
        self.records.read().await.get(&id).cloned()
    }

    /// Whether a record with this identifier exists
    pub async fn contains(&self, id: Uuid) -> bool {
        self.records.read().await.contains_key(&id)
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Insert a new record under a freshly generated identifier.
    ///
    /// Any identifier already present on `customer` is overwritten; clients
    /// never pick their own. Returns the record as stored.
    pub async fn create(&self, mut customer: Customer) -> Customer {
        customer.id = Uuid::new_v4();
        let mut records = self.records.write().await;
        records.insert(customer.id, customer.clone());
        customer
    }

    /// Replace an existing record wholesale.
    ///
    /// The stored identifier is forced to `id` regardless of what the
    /// incoming record carries. Existence is re-checked under the write lock,
    /// so a record deleted concurrently is not resurrected. Returns the
    /// record as stored, or `None` if `id` is absent.
    pub async fn replace(&self, id: Uuid, mut customer: Customer) -> Option<Customer> {
        customer.id = id;
        let mut records = self.records.write().await;
        match records.entry(id) {
            Entry::Occupied(mut slot) => {
                slot.insert(customer.clone());
                Some(customer)
            }
            Entry::Vacant(_) => None,
        }
    }

    /// Remove a record. Returns whether it was present.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.records.write().await.remove(&id).is_some()
    }
}

impl Default for CustomerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Customer {
        Customer::new("Test Person", "Basic Customer", "test@example.com", 1000, false)
    }

    #[tokio::test]
    async fn test_seeded_store_has_five_records() {
        let store = CustomerStore::seeded();
        assert_eq!(store.len().await, 5);

        let records = store.list().await;
        for (id, customer) in &records {
            assert_eq!(*id, customer.id, "map key must match record id");
        }
    }

    #[tokio::test]
    async fn test_create_assigns_fresh_id() {
        let store = CustomerStore::new();
        let mut incoming = sample();
        let supplied = Uuid::new_v4();
        incoming.id = supplied;

        let stored = store.create(incoming.clone()).await;
        assert_ne!(stored.id, supplied, "client-supplied id must be ignored");
        assert_eq!(stored.name, incoming.name);

        let fetched = store.get(stored.id).await.unwrap();
        assert_eq!(fetched, stored);
    }

    #[tokio::test]
    async fn test_created_ids_are_distinct() {
        let store = CustomerStore::seeded();
        let before: Vec<_> = store.list().await.keys().copied().collect();

        let stored = store.create(sample()).await;
        assert!(!before.contains(&stored.id));
        assert_eq!(store.len().await, 6);
    }

    #[tokio::test]
    async fn test_replace_forces_id_and_overwrites_all_fields() {
        let store = CustomerStore::new();
        let original = store.create(sample()).await;

        let replacement = Customer {
            id: Uuid::new_v4(), // body id, should be ignored
            name: "Renamed".to_string(),
            ..Customer::default()
        };

        let stored = store.replace(original.id, replacement).await.unwrap();
        assert_eq!(stored.id, original.id);
        assert_eq!(stored.name, "Renamed");
        // Full replace: untouched fields fall back to their zero values
        assert_eq!(stored.email, "");
        assert_eq!(stored.phone, 0);
        assert!(!stored.contacted);

        assert_eq!(store.get(original.id).await.unwrap(), stored);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_replace_absent_id() {
        let store = CustomerStore::new();
        assert!(store.replace(Uuid::new_v4(), sample()).await.is_none());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = CustomerStore::seeded();
        let id = *store.list().await.keys().next().unwrap();

        assert!(store.remove(id).await);
        assert_eq!(store.len().await, 4);
        assert!(store.get(id).await.is_none());

        // A second delete of the same id reports absence
        assert!(!store.remove(id).await);
        assert_eq!(store.len().await, 4);
    }
}
