//! Typed access to profile documents.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use vantage_core::ProfileDocument;

use crate::{DocumentStore, Error, Result};

/// Profile document operations used by sign-in, sign-up and the guard.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Point read by uid.
    ///
    /// Fails with [`Error::InvalidDocument`] when the stored role or status
    /// is not a recognised value.
    async fn get(&self, uid: &str) -> Result<Option<ProfileDocument>>;

    /// Conditional create; [`Error::AlreadyExists`] if the uid has a profile.
    async fn create(&self, profile: &ProfileDocument) -> Result<()>;

    /// Unconditional overwrite.
    async fn set(&self, profile: &ProfileDocument) -> Result<()>;
}

/// [`ProfileStore`] over any [`DocumentStore`], using the `users`
/// collection.
#[derive(Clone)]
pub struct ProfileRepository {
    store: Arc<dyn DocumentStore>,
}

impl ProfileRepository {
    /// Wrap a document store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn encode(profile: &ProfileDocument) -> Result<Map<String, Value>> {
        match serde_json::to_value(profile)? {
            Value::Object(map) => Ok(map),
            other => Err(Error::invalid(
                ProfileDocument::COLLECTION,
                &profile.uid,
                format!("profile serialized to {other}"),
            )),
        }
    }
}

#[async_trait]
impl ProfileStore for ProfileRepository {
    async fn get(&self, uid: &str) -> Result<Option<ProfileDocument>> {
        let Some(doc) = self.store.get(ProfileDocument::COLLECTION, uid).await? else {
            return Ok(None);
        };

        let mut data = doc.data;
        // Documents written by hand sometimes omit the uid field.
        data.entry("uid")
            .or_insert_with(|| Value::String(doc.id.clone()));

        let profile: ProfileDocument = serde_json::from_value(Value::Object(data))
            .map_err(|e| Error::invalid(ProfileDocument::COLLECTION, &doc.id, e))?;
        Ok(Some(profile))
    }

    async fn create(&self, profile: &ProfileDocument) -> Result<()> {
        let data = Self::encode(profile)?;
        self.store
            .create(ProfileDocument::COLLECTION, &profile.uid, data)
            .await
    }

    async fn set(&self, profile: &ProfileDocument) -> Result<()> {
        let data = Self::encode(profile)?;
        self.store
            .set(ProfileDocument::COLLECTION, &profile.uid, data)
            .await
    }
}
