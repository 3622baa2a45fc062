//! Object-store sessions
//!
//! A session fixes one set of backend parameters and lazily builds one
//! `object_store` client per container from them. The `SessionCache` makes
//! process-wide sharing explicit and injectable: one shared session per
//! object-store kind, initialized by the first caller that asks for reuse.

use crate::traits::{TransferError, TransferResult};
use ferry_core::StorageKind;
use object_store::ObjectStore;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock};
use tokio::sync::Mutex;

/// Backend session configuration as an open-ended key/value map.
///
/// Keys are `object_store` configuration keys for the backend in question,
/// e.g. `region`, `endpoint` or `access_key_id` for S3 and
/// `service_account` for GCS. Unknown keys fail session establishment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionParams(BTreeMap<String, String>);

impl SessionParams {
    pub fn new() -> Self {
        SessionParams(BTreeMap::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A lazily-populated set of per-container clients sharing one set of
/// session parameters.
///
/// The parameters are fixed at construction. When a session is shared
/// through the [`SessionCache`], later callers inherit this configuration
/// whatever parameters their own requests carry.
pub struct ObjectStoreSession {
    kind: StorageKind,
    params: SessionParams,
    stores: Mutex<HashMap<String, Arc<dyn ObjectStore>>>,
}

impl ObjectStoreSession {
    pub fn new(kind: StorageKind, params: SessionParams) -> Self {
        ObjectStoreSession {
            kind,
            params,
            stores: Mutex::new(HashMap::new()),
        }
    }

    /// A session that serves `store` for `container` without building a
    /// client, bypassing builder configuration entirely.
    pub fn with_store(
        kind: StorageKind,
        container: impl Into<String>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        let mut stores = HashMap::new();
        stores.insert(container.into(), store);
        ObjectStoreSession {
            kind,
            params: SessionParams::new(),
            stores: Mutex::new(stores),
        }
    }

    pub fn kind(&self) -> StorageKind {
        self.kind
    }

    pub fn params(&self) -> &SessionParams {
        &self.params
    }

    /// Client for one container, built from the session parameters on first
    /// use and cached for the session's lifetime.
    pub async fn store_for(&self, container: &str) -> TransferResult<Arc<dyn ObjectStore>> {
        let mut stores = self.stores.lock().await;
        if let Some(store) = stores.get(container) {
            return Ok(store.clone());
        }
        let store = self.build_store(container)?;
        stores.insert(container.to_string(), store.clone());
        Ok(store)
    }

    fn build_store(&self, container: &str) -> TransferResult<Arc<dyn ObjectStore>> {
        match self.kind {
            #[cfg(feature = "backend-s3")]
            StorageKind::S3 => self.build_s3(container),
            #[cfg(not(feature = "backend-s3"))]
            StorageKind::S3 => Err(TransferError::BackendUnavailable(
                "S3 backend not available (backend-s3 feature not enabled)".to_string(),
            )),
            #[cfg(feature = "backend-gcs")]
            StorageKind::Gcs => self.build_gcs(container),
            #[cfg(not(feature = "backend-gcs"))]
            StorageKind::Gcs => Err(TransferError::BackendUnavailable(
                "GCS backend not available (backend-gcs feature not enabled)".to_string(),
            )),
            other => Err(TransferError::BackendUnavailable(format!(
                "no object-store session for backend '{}'",
                other
            ))),
        }
    }

    #[cfg(feature = "backend-s3")]
    fn build_s3(&self, container: &str) -> TransferResult<Arc<dyn ObjectStore>> {
        use object_store::aws::{AmazonS3Builder, AmazonS3ConfigKey};

        // Environment credentials apply first; explicit session parameters
        // override them.
        let mut builder = AmazonS3Builder::from_env().with_bucket_name(container);
        for (key, value) in self.params.iter() {
            let config_key = key.parse::<AmazonS3ConfigKey>().map_err(|e| {
                TransferError::BackendUnavailable(format!(
                    "invalid S3 session parameter '{}': {}",
                    key, e
                ))
            })?;
            builder = builder.with_config(config_key, value);
        }
        let store = builder
            .build()
            .map_err(|e| TransferError::BackendUnavailable(e.to_string()))?;
        Ok(Arc::new(store))
    }

    #[cfg(feature = "backend-gcs")]
    fn build_gcs(&self, container: &str) -> TransferResult<Arc<dyn ObjectStore>> {
        use object_store::gcp::{GoogleCloudStorageBuilder, GoogleConfigKey};

        let mut builder = GoogleCloudStorageBuilder::from_env().with_bucket_name(container);
        for (key, value) in self.params.iter() {
            let config_key = key.parse::<GoogleConfigKey>().map_err(|e| {
                TransferError::BackendUnavailable(format!(
                    "invalid GCS session parameter '{}': {}",
                    key, e
                ))
            })?;
            builder = builder.with_config(config_key, value);
        }
        let store = builder
            .build()
            .map_err(|e| TransferError::BackendUnavailable(e.to_string()))?;
        Ok(Arc::new(store))
    }
}

/// Process-owned cache of shared object-store sessions.
///
/// One slot per object-store kind. The slot keeps the first parameters it
/// sees; later reusing callers share that session even when their requests
/// carry different parameters. Callers that need isolation ask for a fresh
/// session instead.
#[derive(Default)]
pub struct SessionCache {
    s3: OnceLock<Arc<ObjectStoreSession>>,
    gcs: OnceLock<Arc<ObjectStoreSession>>,
}

impl SessionCache {
    pub fn new() -> Self {
        SessionCache {
            s3: OnceLock::new(),
            gcs: OnceLock::new(),
        }
    }

    /// Pre-populate the shared slot for the session's kind. Slots exist for
    /// object-store kinds only; a slot that is already set keeps its first
    /// session.
    pub fn with_session(self, session: Arc<ObjectStoreSession>) -> Self {
        if let Some(slot) = self.slot(session.kind()) {
            let _ = slot.set(session);
        }
        self
    }

    /// Session for one request: the shared lazily-initialized session when
    /// `reuse` is on, a fresh single-call session otherwise.
    pub fn obtain(
        &self,
        kind: StorageKind,
        params: &SessionParams,
        reuse: bool,
    ) -> TransferResult<Arc<ObjectStoreSession>> {
        let Some(slot) = self.slot(kind) else {
            return Err(TransferError::BackendUnavailable(format!(
                "backend '{}' does not use object-store sessions",
                kind
            )));
        };
        if !reuse {
            return Ok(Arc::new(ObjectStoreSession::new(kind, params.clone())));
        }
        let session =
            slot.get_or_init(|| Arc::new(ObjectStoreSession::new(kind, params.clone())));
        Ok(session.clone())
    }

    fn slot(&self, kind: StorageKind) -> Option<&OnceLock<Arc<ObjectStoreSession>>> {
        match kind {
            StorageKind::S3 => Some(&self.s3),
            StorageKind::Gcs => Some(&self.gcs),
            _ => None,
        }
    }
}
