//! Customer record type
//!
//! Defines the wire representation of a customer and the sample records
//! the store is seeded with at startup.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single customer record.
///
/// Field names on the wire are capitalized (`ID`, `Name`, ...). Decoding is
/// lenient: absent fields take their zero value and unknown fields are
/// ignored. The `id` is always assigned server-side; any client-supplied
/// value is overwritten by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Customer {
    #[serde(rename = "ID")]
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub email: String,
    pub phone: u64,
    pub contacted: bool,
}

impl Customer {
    /// Create a record with a freshly generated identifier
    pub fn new(name: &str, role: &str, email: &str, phone: u64, contacted: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            role: role.to_string(),
            email: email.to_string(),
            phone,
            contacted,
        }
    }
}

/// Sample records inserted at startup.
///
/// Identifiers are generated fresh on every call, so they are not stable
/// across process restarts.
pub fn seed_customers() -> Vec<Customer> {
    vec![
        Customer::new(
            "Masatoshi Tanida",
            "Free-tier Customer",
            "masatoshi.tanida@gmail.com",
            5_555_550_000,
            false,
        ),
        Customer::new(
            "Atsuko Tanida",
            "Basic Customer",
            "atsuko.tanida@gmail.com",
            5_555_550_001,
            false,
        ),
        Customer::new(
            "Kaito Nakamura",
            "Premium Customer",
            "kaito.nakamura@gmail.com",
            5_555_550_002,
            true,
        ),
        Customer::new(
            "Yuto Tanaka",
            "Premium Customer",
            "yuto.tanaka@gmail.com",
            5_555_550_003,
            false,
        ),
        Customer::new(
            "Ayumi Takahashi",
            "Premium Customer",
            "ayumi.takahashi@gmail.com",
            5_555_550_004,
            false,
        ),
    ]
}
