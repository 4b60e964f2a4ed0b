mod types;

use std::path::{Path, PathBuf};

use teloxide::types::{ChatId, UserId};
use tokio::sync::Mutex;

pub use types::{Change, Config};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to access the config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to (de)serialize the config: {0}")]
    Json(#[from] serde_json::Error),
}

/// The bot's config, kept in memory and mirrored to a JSON file.
///
/// Every mutation happens under one lock together with writing the file,
/// so two handlers running at once can't interleave their writes, and
/// after any call returns, memory and the file agree with each other.
pub struct ConfigStore {
    path: PathBuf,
    config: Mutex<Config>,
}

impl ConfigStore {
    /// Read and parse the config file at `path`.
    pub async fn load(path: impl Into<PathBuf>) -> Result<ConfigStore, Error> {
        let path = path.into();
        let contents = tokio::fs::read(&path).await?;
        let config: Config = serde_json::from_slice(&contents)?;

        log::info!(
            "Loaded config from {}: {} whitelisted, {} blacklisted, {} allowed groups",
            path.display(),
            config.whitelist.len(),
            config.blacklist.len(),
            config.allowed_groups.len()
        );

        Ok(ConfigStore {
            path,
            config: Mutex::new(config),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn token(&self) -> String {
        self.config.lock().await.token.clone()
    }

    pub async fn is_whitelisted(&self, user: UserId) -> bool {
        self.config.lock().await.whitelist.contains(&user.0)
    }

    pub async fn is_blacklisted(&self, user: UserId) -> bool {
        self.config.lock().await.blacklist.contains(&user.0)
    }

    pub async fn is_group_allowed(&self, chat: ChatId) -> bool {
        self.config.lock().await.allowed_groups.contains(&chat.0)
    }

    /// Start enforcing the blacklist in this group.
    pub async fn allow_group(&self, chat: ChatId) -> Result<Change, Error> {
        self.mutate(|config| config.allowed_groups.insert(chat.0))
            .await
    }

    pub async fn ban(&self, user: UserId) -> Result<Change, Error> {
        self.mutate(|config| config.blacklist.insert(user.0)).await
    }

    pub async fn unban(&self, user: UserId) -> Result<Change, Error> {
        self.mutate(|config| config.blacklist.remove(&user.0)).await
    }

    /// Apply `change` to the config, and if it reports that it did change
    /// anything, write the config to disk.
    ///
    /// If writing fails, the in-memory config is restored to how it was.
    async fn mutate(&self, change: impl FnOnce(&mut Config) -> bool) -> Result<Change, Error> {
        let mut config = self.config.lock().await;
        let previous = config.clone();

        if !change(&mut config) {
            return Ok(Change::Unchanged);
        }

        if let Err(e) = write_config(&self.path, &config).await {
            *config = previous;
            return Err(e);
        }

        Ok(Change::Applied)
    }
}

/// Replace the file at `path` with the serialized `config`.
///
/// Writes into a temporary file next to it first and renames it over,
/// so a crash midway never leaves a half-written config behind.
async fn write_config(path: &Path, config: &Config) -> Result<(), Error> {
    let mut contents = serde_json::to_vec_pretty(config)?;
    contents.push(b'\n');

    let mut tmp_path = path.as_os_str().to_owned();
    tmp_path.push(".tmp");
    let tmp_path = PathBuf::from(tmp_path);

    tokio::fs::write(&tmp_path, &contents).await?;
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        if let Err(e) = tokio::fs::remove_file(&tmp_path).await {
            log::warn!("Failed to remove {}: {e}", tmp_path.display());
        }
        return Err(e.into());
    }

    log::debug!("Wrote config to {}", path.display());
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Write `config` into a fresh directory and load it back as a store.
    /// The directory must be kept alive for as long as the store is used.
    pub(crate) async fn store_with(config: &Config) -> (tempfile::TempDir, ConfigStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, serde_json::to_vec_pretty(config).unwrap()).unwrap();
        let store = ConfigStore::load(&path).await.unwrap();
        (dir, store)
    }

    fn read_back(store: &ConfigStore) -> Config {
        serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn missing_sets_default_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"token": "123:abc", "whitelist": [7]}"#).unwrap();

        let store = ConfigStore::load(&path).await.unwrap();
        assert_eq!(store.token().await, "123:abc");
        assert!(store.is_whitelisted(UserId(7)).await);
        assert!(!store.is_blacklisted(UserId(7)).await);
        assert!(!store.is_group_allowed(ChatId(-100)).await);
    }

    #[tokio::test]
    async fn garbage_config_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            ConfigStore::load(&path).await,
            Err(Error::Json(_))
        ));

        let missing = dir.path().join("nope.json");
        assert!(matches!(ConfigStore::load(&missing).await, Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn mutations_are_persisted() {
        let (_dir, store) = store_with(&Config {
            token: "t".into(),
            ..Default::default()
        })
        .await;

        assert_eq!(store.ban(UserId(20)).await.unwrap(), Change::Applied);
        assert_eq!(store.ban(UserId(10)).await.unwrap(), Change::Applied);
        assert_eq!(
            store.allow_group(ChatId(-1001)).await.unwrap(),
            Change::Applied
        );

        let on_disk = read_back(&store);
        assert_eq!(on_disk.token, "t");
        assert_eq!(on_disk.blacklist.iter().copied().collect::<Vec<_>>(), [10, 20]);
        assert_eq!(
            on_disk.allowed_groups.iter().copied().collect::<Vec<_>>(),
            [-1001]
        );

        assert_eq!(store.unban(UserId(20)).await.unwrap(), Change::Applied);
        let on_disk = read_back(&store);
        assert_eq!(on_disk.blacklist.iter().copied().collect::<Vec<_>>(), [10]);

        // Indented and human readable.
        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("\n  \"blacklist\": [\n"));
    }

    #[tokio::test]
    async fn unchanged_does_not_write() {
        let mut config = Config::default();
        config.blacklist.insert(5);
        config.allowed_groups.insert(-42);
        let (_dir, store) = store_with(&config).await;

        // If anything gets written, the file reappears.
        std::fs::remove_file(store.path()).unwrap();

        assert_eq!(store.ban(UserId(5)).await.unwrap(), Change::Unchanged);
        assert_eq!(store.unban(UserId(6)).await.unwrap(), Change::Unchanged);
        assert_eq!(
            store.allow_group(ChatId(-42)).await.unwrap(),
            Change::Unchanged
        );

        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn failed_write_rolls_back() {
        let (dir, store) = store_with(&Config::default()).await;
        std::fs::remove_dir_all(dir.path()).unwrap();

        assert!(matches!(store.ban(UserId(9)).await, Err(Error::Io(_))));
        assert!(!store.is_blacklisted(UserId(9)).await);
    }

    #[tokio::test]
    async fn failed_rename_cleans_up() {
        let (_dir, store) = store_with(&Config::default()).await;

        // A file can't be renamed over a directory.
        std::fs::remove_file(store.path()).unwrap();
        std::fs::create_dir(store.path()).unwrap();
        std::fs::write(store.path().join("keep"), "x").unwrap();

        assert!(matches!(store.ban(UserId(9)).await, Err(Error::Io(_))));
        assert!(!store.is_blacklisted(UserId(9)).await);

        let mut tmp_path = store.path().as_os_str().to_owned();
        tmp_path.push(".tmp");
        assert!(!Path::new(&tmp_path).exists());
        assert!(store.path().join("keep").exists());
    }

    #[tokio::test]
    async fn concurrent_mutations_all_land() {
        let (_dir, store) = store_with(&Config::default()).await;
        let store = std::sync::Arc::new(store);

        let mut tasks = Vec::new();
        for uid in 0..16u64 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move { store.ban(UserId(uid)).await }));
        }
        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap(), Change::Applied);
        }

        assert_eq!(read_back(&store).blacklist.len(), 16);
    }
}
