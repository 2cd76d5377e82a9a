//! Access key handling
//!
//! The Cosmos DB access key is held in a [`secrecy::Secret`] so it is zeroed
//! on drop and redacted from `Debug` output. Code that needs the raw value
//! must call `expose_secret()` explicitly.

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Raw access key material
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct AccessKey(String);

impl CloneableSecret for AccessKey {}
impl DebugSecret for AccessKey {}
impl SerializableSecret for AccessKey {}

impl AccessKey {
    /// Borrow the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for AccessKey {
    fn from(s: String) -> Self {
        AccessKey(s)
    }
}

impl Serialize for AccessKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AccessKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(AccessKey)
    }
}

/// Secret-wrapped access key
pub type SecretKey = Secret<AccessKey>;

/// Wrap a string in a [`SecretKey`]
///
/// ```rust
/// use cosmos_csv::config::secret_key;
/// use secrecy::ExposeSecret;
///
/// let key = secret_key("c2VjcmV0".to_string());
/// assert_eq!(key.expose_secret().as_str(), "c2VjcmV0");
/// assert!(!format!("{key:?}").contains("c2VjcmV0"));
/// ```
#[inline]
pub fn secret_key(value: String) -> SecretKey {
    Secret::new(AccessKey::from(value))
}
