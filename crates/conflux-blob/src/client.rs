use async_trait::async_trait;
use chrono::{DateTime, Utc};
use conflux_store::StoreResult;

/// Metadata of one stored object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectMeta {
    /// Full object name, `/`-separated.
    pub name: String,
    /// Backend creation time. Read policies order candidates by this.
    pub created: DateTime<Utc>,
}

impl ObjectMeta {
    pub fn new(name: impl Into<String>, created: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            created,
        }
    }
}

/// `/`-delimited rollup over a flat name listing: the distinct next-level
/// prefixes under `prefix`, each ending in `/`, in first-occurrence order.
/// A name with no further `/` is an object at this level and produces no
/// rollup entry.
pub(crate) fn rollup_prefixes<'a>(
    names: impl Iterator<Item = &'a str>,
    prefix: &str,
) -> Vec<String> {
    let mut prefixes: Vec<String> = Vec::new();
    for name in names.filter(|name| name.starts_with(prefix)) {
        let remainder = &name[prefix.len()..];
        if let Some(slash) = remainder.find('/') {
            let rolled = format!("{prefix}{}/", &remainder[..slash]);
            if !prefixes.contains(&rolled) {
                prefixes.push(rolled);
            }
        }
    }
    prefixes
}

/// Low-level blob storage boundary.
///
/// Object names are opaque `/`-separated strings; the store layers slot
/// semantics on top. Implementations must treat writes as create-only for
/// practical purposes — the store derives names from content digests, so a
/// repeated name always carries identical bytes.
#[async_trait]
pub trait BlobClient: Send + Sync {
    /// All objects whose name starts with `prefix`, flat.
    async fn list_objects(&self, prefix: &str) -> StoreResult<Vec<ObjectMeta>>;

    /// `/`-delimited rollup: the distinct next-level prefixes under
    /// `prefix`, each ending in `/`.
    async fn list_prefixes(&self, prefix: &str) -> StoreResult<Vec<String>>;

    /// Read an object's bytes. Missing objects are a backend error; callers
    /// only read names they have just listed.
    async fn read_object(&self, name: &str) -> StoreResult<Vec<u8>>;

    /// Write an object.
    async fn write_object(&self, name: &str, bytes: Vec<u8>) -> StoreResult<()>;
}
