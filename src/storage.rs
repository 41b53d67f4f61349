use crate::errors::AppError;
use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::error;

pub const LINKS: &str = "links";
pub const EXPENSES: &str = "expenses";
pub const INCOMES: &str = "incomes";
pub const USERS: &str = "users";
pub const CURRENT_USER: &str = "currentUser";
pub const THEME: &str = "theme";

/// Key-value store holding one JSON document per key under a data directory.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let store = Self::new(root);
        fs::create_dir_all(&store.root).await?;
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    /// Reads a whole collection. Missing or unreadable keys yield an empty one.
    pub async fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.read_value(key).await.unwrap_or_default()
    }

    pub async fn write_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), AppError> {
        self.write_value(key, items).await
    }

    pub async fn read_value<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.key_path(key);
        match fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(value) => Some(value),
                Err(err) => {
                    error!("failed to parse store key {key}: {err}");
                    None
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                error!("failed to read store key {key}: {err}");
                None
            }
        }
    }

    pub async fn write_value<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), AppError> {
        let payload = serde_json::to_vec_pretty(value)?;
        fs::write(self.key_path(key), payload).await?;
        Ok(())
    }

    pub async fn remove(&self, key: &str) -> Result<(), AppError> {
        match fs::remove_file(self.key_path(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
