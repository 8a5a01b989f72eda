//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context as _, Result};
use bazaar_commerce::remote::MemoryStore;
use bazaar_commerce::session::Session;
use bazaar_commerce::UserId;

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Where the configuration came from, if a file was found.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            let path = resolve(&cwd, path);
            (CliConfig::load(&path)?, Some(path))
        } else {
            match Self::find_config(&cwd) {
                Some(path) => (CliConfig::load(&path)?, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        if let Some(ref path) = config_path {
            output.debug(&format!("Using config: {}", path.display()));
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let candidate = current.join(name);
                if candidate.exists() {
                    return Some(candidate);
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Directory that relative paths in the config are taken from.
    fn base_dir(&self) -> &Path {
        self.config_path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or(&self.cwd)
    }

    /// Path of the store fixture.
    pub fn fixture_path(&self) -> PathBuf {
        resolve(self.base_dir(), &self.config.store.fixture)
    }

    /// Load the store from its fixture.
    pub fn load_store(&self) -> Result<Arc<MemoryStore>> {
        let path = self.fixture_path();
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read store fixture: {}", path.display()))?;
        let store = MemoryStore::from_json(&json)
            .with_context(|| format!("Failed to parse store fixture: {}", path.display()))?;
        self.output.debug(&format!("Loaded store: {}", path.display()));
        Ok(Arc::new(store))
    }

    /// Write the store back to its fixture.
    pub fn save_store(&self, store: &MemoryStore) -> Result<()> {
        let path = self.fixture_path();
        std::fs::write(&path, store.to_json()?)
            .with_context(|| format!("Failed to write store fixture: {}", path.display()))?;
        self.output.debug(&format!("Saved store: {}", path.display()));
        Ok(())
    }

    /// The configured buyer's session, or an error if nobody is signed in.
    pub fn session(&self, store: &MemoryStore) -> Result<Session> {
        let Some(ref id) = self.config.store.buyer else {
            bail!("Not signed in. Set `store.buyer` in bazaar.toml.");
        };
        match store.buyer(&UserId::new(id.as_str())) {
            Some(buyer) => Ok(Session::authenticated(buyer)),
            None => bail!("Buyer '{}' not found in the store fixture", id),
        }
    }
}

/// Resolve a path relative to a base directory.
fn resolve(base: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
