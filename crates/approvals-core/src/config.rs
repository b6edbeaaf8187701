//! Resolution of the golden-master storage location

use crate::error::{ApprovalError, ApprovalResult};
use crate::store::FsStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DIRECTORY: &str = "golden-master";
pub const DEFAULT_RECEIVED_EXTENSION: &str = "received";
pub const DEFAULT_APPROVED_EXTENSION: &str = "approved";

/// Overrides the storage root in [`ApprovalConfig::from_env`].
pub const ROOT_ENV: &str = "APPROVALS_ROOT";
/// Overrides the golden-master directory name in [`ApprovalConfig::from_env`].
pub const DIRECTORY_ENV: &str = "APPROVALS_DIR";

/// Where golden-master artifacts live and how they are named.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalConfig {
    /// Directory that contains the golden-master directory
    pub storage_root: PathBuf,
    /// Name of the golden-master directory under `storage_root`
    pub directory: String,
    pub received_extension: String,
    pub approved_extension: String,
}

impl Default for ApprovalConfig {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from("."),
            directory: DEFAULT_DIRECTORY.to_string(),
            received_extension: DEFAULT_RECEIVED_EXTENSION.to_string(),
            approved_extension: DEFAULT_APPROVED_EXTENSION.to_string(),
        }
    }
}

impl ApprovalConfig {
    pub fn new(storage_root: impl Into<PathBuf>) -> Self {
        Self {
            storage_root: storage_root.into(),
            ..Self::default()
        }
    }

    /// Store golden masters next to a crate's manifest, typically
    /// `ApprovalConfig::for_manifest_dir(env!("CARGO_MANIFEST_DIR"))`.
    pub fn for_manifest_dir(manifest_dir: impl AsRef<Path>) -> Self {
        Self::new(manifest_dir.as_ref().join("tests"))
    }

    /// Resolve from `APPROVALS_ROOT` / `APPROVALS_DIR`, falling back to the
    /// `CARGO_MANIFEST_DIR` cargo exports to tests, then the current directory.
    pub fn from_env() -> Self {
        let storage_root = std::env::var_os(ROOT_ENV)
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("CARGO_MANIFEST_DIR").map(|dir| PathBuf::from(dir).join("tests"))
            })
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));

        let mut config = Self::new(storage_root);
        if let Ok(directory) = std::env::var(DIRECTORY_ENV) {
            if !directory.is_empty() {
                config.directory = directory;
            }
        }
        config
    }

    /// Load configuration from a TOML or YAML file, falling back to defaults
    /// when the file does not exist.
    ///
    /// A relative `storage_root` is resolved against the file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> ApprovalResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::info!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ApprovalError::io(path.display().to_string(), e))?;

        let mut config: ApprovalConfig = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| {
                ApprovalError::config(format!("Failed to parse YAML config {:?}: {}", path, e))
            })?,
            _ => toml::from_str(&content).map_err(|e| {
                ApprovalError::config(format!("Failed to parse TOML config {:?}: {}", path, e))
            })?,
        };

        if config.storage_root.is_relative() {
            if let Some(parent) = path.parent() {
                config.storage_root = parent.join(&config.storage_root);
            }
        }
        config.validate()?;

        tracing::info!("Loaded configuration from: {:?}", path);
        Ok(config)
    }

    pub fn with_directory(mut self, directory: impl Into<String>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn with_extensions(
        mut self,
        received: impl Into<String>,
        approved: impl Into<String>,
    ) -> Self {
        self.received_extension = received.into();
        self.approved_extension = approved.into();
        self
    }

    pub fn validate(&self) -> ApprovalResult<()> {
        if self.directory.is_empty() {
            return Err(ApprovalError::config("directory must not be empty"));
        }
        if self.received_extension.is_empty() || self.approved_extension.is_empty() {
            return Err(ApprovalError::config("artifact extensions must not be empty"));
        }
        if self.received_extension == self.approved_extension {
            return Err(ApprovalError::config(format!(
                "received and approved extensions must differ (both are '{}')",
                self.received_extension
            )));
        }
        Ok(())
    }

    /// `<storage_root>/<directory>`
    pub fn golden_dir(&self) -> PathBuf {
        self.storage_root.join(&self.directory)
    }

    pub fn store(&self) -> FsStore {
        FsStore::new(self.golden_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::io::Write;
    use std::sync::{Mutex, MutexGuard};
    use tempfile::{tempdir, Builder};

    // Tests that touch process environment must not interleave.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Holds the env lock and restores the approval variables on drop.
    struct EnvSnapshot {
        saved: Vec<(&'static str, Option<OsString>)>,
        _lock: MutexGuard<'static, ()>,
    }

    impl EnvSnapshot {
        fn take() -> Self {
            let lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
            let saved = [ROOT_ENV, DIRECTORY_ENV]
                .into_iter()
                .map(|name| (name, std::env::var_os(name)))
                .collect();
            Self { saved, _lock: lock }
        }
    }

    impl Drop for EnvSnapshot {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(value) => std::env::set_var(name, value),
                    None => std::env::remove_var(name),
                }
            }
        }
    }

    #[test]
    fn defaults_use_golden_master_directory() {
        let config = ApprovalConfig::new("/work/tests");
        assert_eq!(config.golden_dir(), PathBuf::from("/work/tests/golden-master"));
        assert_eq!(config.received_extension, "received");
        assert_eq!(config.approved_extension, "approved");
        config.validate().unwrap();
    }

    #[test]
    fn manifest_dir_places_masters_under_tests() {
        let config = ApprovalConfig::for_manifest_dir("/work/crate");
        assert_eq!(
            config.golden_dir(),
            PathBuf::from("/work/crate/tests/golden-master")
        );
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = ApprovalConfig::load(dir.path().join("approvals.toml")).unwrap();
        assert_eq!(config, ApprovalConfig::default());
    }

    #[test]
    fn toml_file_resolves_relative_root() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("approvals.toml");
        std::fs::write(&path, "storage_root = \"snapshots\"\ndirectory = \"masters\"\n").unwrap();

        let config = ApprovalConfig::load(&path).unwrap();
        assert_eq!(config.golden_dir(), dir.path().join("snapshots").join("masters"));
        assert_eq!(config.approved_extension, "approved");
    }

    #[test]
    fn yaml_file_is_parsed_by_extension() {
        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "storage_root: /abs/root\nreceived_extension: out").unwrap();

        let config = ApprovalConfig::load(file.path()).unwrap();
        assert_eq!(config.storage_root, PathBuf::from("/abs/root"));
        assert_eq!(config.received_extension, "out");
        assert_eq!(config.directory, "golden-master");
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("approvals.toml");
        std::fs::write(&path, "storage_root = [").unwrap();

        let err = ApprovalConfig::load(&path).unwrap_err();
        assert!(matches!(err, ApprovalError::Config(_)));
    }

    #[test]
    fn identical_extensions_are_rejected() {
        let config = ApprovalConfig::default().with_extensions("txt", "txt");
        assert!(matches!(
            config.validate().unwrap_err(),
            ApprovalError::Config(_)
        ));
    }

    #[test]
    fn env_root_and_directory_override_defaults() {
        let _env = EnvSnapshot::take();
        std::env::set_var(ROOT_ENV, "/srv/approvals");
        std::env::set_var(DIRECTORY_ENV, "masters");

        let config = ApprovalConfig::from_env();
        assert_eq!(config.storage_root, PathBuf::from("/srv/approvals"));
        assert_eq!(config.golden_dir(), PathBuf::from("/srv/approvals/masters"));
    }

    #[test]
    fn empty_env_directory_keeps_the_default() {
        let _env = EnvSnapshot::take();
        std::env::set_var(ROOT_ENV, "/srv/approvals");
        std::env::set_var(DIRECTORY_ENV, "");

        let config = ApprovalConfig::from_env();
        assert_eq!(config.directory, DEFAULT_DIRECTORY);
        assert_eq!(config.golden_dir(), PathBuf::from("/srv/approvals/golden-master"));
    }

    #[test]
    fn without_env_root_falls_back_to_manifest_tests_dir() {
        let _env = EnvSnapshot::take();
        std::env::remove_var(ROOT_ENV);
        std::env::remove_var(DIRECTORY_ENV);

        let manifest_dir = std::env::var_os("CARGO_MANIFEST_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")));
        let config = ApprovalConfig::from_env();
        assert_eq!(config, ApprovalConfig::for_manifest_dir(&manifest_dir));
        assert_eq!(config.storage_root, manifest_dir.join("tests"));
    }
}
