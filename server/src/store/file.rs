use crate::{error::StorageError, store::MappingStore};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};

type Mappings = Map<String, Value>;

/// Mapping store kept as one pretty-printed JSON object on local disk.
///
/// Every operation re-reads the whole file. A missing file is created empty,
/// and content that does not parse as a JSON object reads back as an empty
/// mapping; the next `save` replaces it. Writers inside this process are
/// serialised, other processes sharing the file are not.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Mappings, StorageError> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(self.parse(&bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.create_empty().await?;
                Ok(Mappings::new())
            }
            Err(e) => Err(StorageError::io(&self.path, e)),
        }
    }

    fn parse(&self, bytes: &[u8]) -> Mappings {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Mappings::new();
        }

        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                tracing::warn!(
                    "Mapping file {} is not a JSON object, treating it as empty",
                    self.path.display()
                );
                Mappings::new()
            }
            Err(e) => {
                tracing::warn!(
                    "Mapping file {} is malformed ({}), treating it as empty",
                    self.path.display(),
                    e
                );
                Mappings::new()
            }
        }
    }

    async fn create_empty(&self) -> Result<(), StorageError> {
        let created = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .await;

        let mut file = match created {
            Ok(file) => file,
            // Someone else created it between our read and now
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(()),
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };

        file.write_all(b"{}")
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;
        file.flush()
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;

        tracing::info!("Created empty mapping file {}", self.path.display());
        Ok(())
    }

    /// Replace the file contents via a sibling temp file + rename.
    async fn persist(&self, mappings: &Mappings) -> Result<(), StorageError> {
        let bytes = encode(mappings)?;
        let tmp = self.temp_path();

        fs::write(&tmp, &bytes)
            .await
            .map_err(|e| StorageError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;

        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl MappingStore for JsonFileStore {
    async fn lookup(&self, long_url: &str) -> Result<Option<String>, StorageError> {
        let mappings = self.read_all().await?;
        Ok(mappings
            .get(long_url)
            .and_then(Value::as_str)
            .filter(|short_url| !short_url.is_empty())
            .map(str::to_owned))
    }

    async fn save(&self, long_url: &str, short_url: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;

        let mut mappings = self.read_all().await?;
        mappings.insert(long_url.to_owned(), Value::String(short_url.to_owned()));
        self.persist(&mappings).await?;

        tracing::debug!(
            "Saved mapping {} -> {} ({} total)",
            long_url,
            short_url,
            mappings.len()
        );
        Ok(())
    }
}

/// Pretty-print with a four-space indent, keys in insertion order.
fn encode(mappings: &Mappings) -> Result<Vec<u8>, StorageError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    mappings.serialize(&mut ser)?;
    Ok(buf)
}
