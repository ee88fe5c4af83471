use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use shopseed_core::SeedConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid TOML in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),
    #[error("{0} already exists (use --force to overwrite)")]
    Exists(PathBuf),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Load a seed config. Missing keys take their defaults; no file means all defaults.
pub fn load_config(path: Option<&Path>) -> ConfigResult<SeedConfig> {
    let Some(path) = path else {
        return Ok(SeedConfig::default());
    };
    let raw = fs::read_to_string(path).map_err(|source| io_error(path, source))?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the default config as TOML.
pub fn write_default_config(path: &Path, force: bool) -> ConfigResult<()> {
    if path.exists() && !force {
        return Err(ConfigError::Exists(path.to_path_buf()));
    }
    let rendered = toml::to_string_pretty(&SeedConfig::default())?;
    write_atomic(path, rendered.as_bytes()).map_err(|source| io_error(path, source))
}

/// Write through a sibling temp file and rename over `path`.
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let parent = path.parent().filter(|parent| !parent.as_os_str().is_empty());
    if let Some(parent) = parent {
        create_dir_all(parent)?;
    }

    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "path has no file name")
    })?;
    let tmp_path = path.with_file_name(format!("{}.tmp", file_name.to_string_lossy()));

    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    fs::rename(&tmp_path, path)?;

    if let Some(parent) = parent {
        OpenOptions::new().read(true).open(parent)?.sync_all()?;
    }
    Ok(())
}

fn io_error(path: &Path, source: io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("shopseed_config_{}", uuid::Uuid::new_v4()));
        create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    #[test]
    fn no_file_means_defaults() {
        let config = load_config(None).expect("defaults");
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = scratch_dir();
        let path = dir.join("seed.toml");
        fs::write(
            &path,
            "seed = 42\n\n[readiness]\nmax_attempts = 3\n\n[counts]\nproducts = 5\n\n[counts.orders_per_customer]\nmin = 0\nmax = 2\n",
        )
        .expect("write config");

        let config = load_config(Some(&path)).expect("parse config");
        let defaults = SeedConfig::default();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.readiness.max_attempts, 3);
        assert_eq!(config.readiness.delay_ms, defaults.readiness.delay_ms);
        assert_eq!(config.counts.products, 5);
        assert_eq!(config.counts.orders_per_customer.max, 2);
        assert_eq!(config.counts.customers, defaults.counts.customers);

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn malformed_file_names_the_path() {
        let dir = scratch_dir();
        let path = dir.join("broken.toml");
        fs::write(&path, "seed = \"not a number\"").expect("write config");

        let err = load_config(Some(&path)).expect_err("type mismatch");
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.toml"));

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn default_config_round_trips_and_refuses_overwrite() {
        let dir = scratch_dir();
        let path = dir.join("nested").join("seed.toml");

        write_default_config(&path, false).expect("first write");
        let loaded = load_config(Some(&path)).expect("reload");
        assert_eq!(loaded.counts.customers, SeedConfig::default().counts.customers);
        assert!(!path.with_file_name("seed.toml.tmp").exists());

        let err = write_default_config(&path, false).expect_err("exists");
        assert!(matches!(err, ConfigError::Exists(_)));
        write_default_config(&path, true).expect("forced overwrite");

        fs::remove_dir_all(dir).ok();
    }
}
