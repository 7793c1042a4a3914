use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use serde_json::{Map, Value};

pub const TOKEN_KEY: &str = "jwt_token";

pub trait SessionStore: Send + Sync + 'static {
    fn token(&self) -> Option<String>;
    fn store_token(&self, token: &str) -> Result<()>;
    fn clear_token(&self) -> Result<()>;
}

#[derive(Default)]
pub struct MemorySession {
    token: Mutex<Option<String>>,
}

impl SessionStore for MemorySession {
    fn token(&self) -> Option<String> {
        self.token.lock().map(|guard| guard.clone()).unwrap_or(None)
    }

    fn store_token(&self, token: &str) -> Result<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| anyhow!("session lock poisoned"))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear_token(&self) -> Result<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| anyhow!("session lock poisoned"))?;
        *guard = None;
        Ok(())
    }
}

/// Token kept in a small JSON file, the console's stand-in for browser
/// local storage.
pub struct FileSession {
    path: PathBuf,
}

impl FileSession {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_map(&self) -> Map<String, Value> {
        let Ok(bytes) = fs::read(&self.path) else {
            return Map::new();
        };
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    fn write_map(&self, map: Map<String, Value>) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&Value::Object(map))?;
        fs::write(&self.path, bytes)
            .with_context(|| format!("failed to write session file {}", self.path.display()))
    }
}

impl SessionStore for FileSession {
    fn token(&self) -> Option<String> {
        self.read_map()
            .get(TOKEN_KEY)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn store_token(&self, token: &str) -> Result<()> {
        let mut map = self.read_map();
        map.insert(TOKEN_KEY.to_string(), Value::String(token.to_string()));
        self.write_map(map)
    }

    fn clear_token(&self) -> Result<()> {
        let mut map = self.read_map();
        if map.remove(TOKEN_KEY).is_none() {
            return Ok(());
        }
        self.write_map(map)
    }
}
