// ABOUTME: Shared configuration for the file editing servers and local file service
// ABOUTME: Defines size/timeout limits, builder setters, string parsers, and optional TOML file loading
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::num::ParseIntError;
use std::path::PathBuf;
use std::time::Duration;

/// Default maximum size of a file that may be read or edited (10 MB)
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 10;

/// Default maximum HTTP request body (10 MB)
pub const DEFAULT_MAX_BODY_MB: u64 = 10;

/// Default time to wait for a per-file edit lock (5 seconds)
const DEFAULT_LOCK_TIMEOUT_SECS: u64 = 5;

/// Default per-request HTTP deadline (30 seconds)
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Bytes per megabyte used for all size limits
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Configuration shared by both transports and the local file service
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory all file names are resolved against
    pub working_directory: PathBuf,
    /// Largest file (in MB) that may be read or edited
    pub max_file_size_mb: u64,
    /// Largest HTTP request body (in MB)
    pub max_body_mb: u64,
    /// How long an edit waits for the per-file lock
    pub lock_timeout: Duration,
    /// HTTP per-request deadline
    pub request_timeout: Duration,
}

impl ServerConfig {
    /// Create a configuration rooted at the given working directory
    pub fn new(working_directory: PathBuf) -> Self {
        Self {
            working_directory,
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
            max_body_mb: DEFAULT_MAX_BODY_MB,
            lock_timeout: Duration::from_secs(DEFAULT_LOCK_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Set the file size ceiling in megabytes
    pub const fn with_max_file_size_mb(mut self, mb: u64) -> Self {
        self.max_file_size_mb = mb;
        self
    }

    /// Set the HTTP body ceiling in megabytes
    pub const fn with_max_body_mb(mut self, mb: u64) -> Self {
        self.max_body_mb = mb;
        self
    }

    /// Set the edit lock timeout
    pub const fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Set the HTTP request timeout
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// File size ceiling in bytes
    pub const fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(BYTES_PER_MB)
    }

    /// HTTP body ceiling in bytes
    pub fn max_body_bytes(&self) -> usize {
        usize::try_from(self.max_body_mb.saturating_mul(BYTES_PER_MB)).unwrap_or(usize::MAX)
    }
}

/// Parse a size in megabytes from a string
pub fn parse_size_mb(input: &str) -> Result<u64, ParseIntError> {
    input.trim().parse::<u64>()
}

/// Parse a timeout value from a string (in seconds)
pub fn parse_timeout(input: &str) -> Result<Duration, ParseIntError> {
    input.trim().parse::<u64>().map(Duration::from_secs)
}

#[cfg(feature = "config-file")]
pub use file::FileConfig;

#[cfg(feature = "config-file")]
mod file {
    use std::path::Path;
    use std::time::Duration;

    use serde::Deserialize;

    use super::ServerConfig;

    /// Optional overrides loaded from TOML
    ///
    /// ```toml
    /// # ~/.config/fileedit/config.toml or .fileedit.toml
    /// max_file_size_mb = 20
    /// max_body_mb = 5
    /// lock_timeout_secs = 2
    /// request_timeout_secs = 60
    /// ```
    #[derive(Debug, Default, Deserialize)]
    #[serde(default, deny_unknown_fields)]
    pub struct FileConfig {
        /// Largest file that may be read or edited
        pub max_file_size_mb: Option<u64>,
        /// Largest HTTP request body
        pub max_body_mb: Option<u64>,
        /// Edit lock timeout in seconds
        pub lock_timeout_secs: Option<u64>,
        /// HTTP request timeout in seconds
        pub request_timeout_secs: Option<u64>,
    }

    impl FileConfig {
        /// Load user config then project config; project values win
        pub fn load(working_directory: &Path) -> Self {
            let user = dirs::config_dir()
                .map(|d| d.join("fileedit/config.toml"))
                .and_then(|p| Self::load_file(&p))
                .unwrap_or_default();
            let project =
                Self::load_file(&working_directory.join(".fileedit.toml")).unwrap_or_default();
            user.override_with(&project)
        }

        /// Load configuration from a specific file
        pub fn load_file(path: &Path) -> Option<Self> {
            let content = match std::fs::read_to_string(path) {
                Ok(c) => c,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to read config");
                    return None;
                }
            };

            match toml::from_str::<Self>(&content) {
                Ok(config) => {
                    tracing::debug!(path = %path.display(), ?config, "Loaded config");
                    Some(config)
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to parse config");
                    None
                }
            }
        }

        fn override_with(&self, other: &Self) -> Self {
            Self {
                max_file_size_mb: other.max_file_size_mb.or(self.max_file_size_mb),
                max_body_mb: other.max_body_mb.or(self.max_body_mb),
                lock_timeout_secs: other.lock_timeout_secs.or(self.lock_timeout_secs),
                request_timeout_secs: other.request_timeout_secs.or(self.request_timeout_secs),
            }
        }

        /// Apply the loaded values on top of a base configuration
        pub fn apply(&self, mut config: ServerConfig) -> ServerConfig {
            if let Some(mb) = self.max_file_size_mb {
                config.max_file_size_mb = mb;
            }
            if let Some(mb) = self.max_body_mb {
                config.max_body_mb = mb;
            }
            if let Some(secs) = self.lock_timeout_secs {
                config.lock_timeout = Duration::from_secs(secs);
            }
            if let Some(secs) = self.request_timeout_secs {
                config.request_timeout = Duration::from_secs(secs);
            }
            config
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn project_file_overrides_defaults() {
            let dir = tempfile::tempdir().expect("tempdir");
            std::fs::write(
                dir.path().join(".fileedit.toml"),
                "max_file_size_mb = 3\nlock_timeout_secs = 1\n",
            )
            .expect("write");

            let loaded = FileConfig::load_file(&dir.path().join(".fileedit.toml")).expect("load");
            let config = loaded.apply(ServerConfig::new(dir.path().to_path_buf()));
            assert_eq!(config.max_file_size_mb, 3);
            assert_eq!(config.lock_timeout, Duration::from_secs(1));
            assert_eq!(config.max_body_mb, super::super::DEFAULT_MAX_BODY_MB);
        }

        #[test]
        fn project_values_win_over_user_values() {
            let user = FileConfig {
                max_file_size_mb: Some(1),
                max_body_mb: Some(2),
                ..FileConfig::default()
            };
            let project = FileConfig {
                max_file_size_mb: Some(7),
                ..FileConfig::default()
            };
            let merged = user.override_with(&project);
            assert_eq!(merged.max_file_size_mb, Some(7));
            assert_eq!(merged.max_body_mb, Some(2));
            assert!(merged.lock_timeout_secs.is_none());
        }

        #[test]
        fn malformed_file_is_ignored() {
            let dir = tempfile::tempdir().expect("tempdir");
            let path = dir.path().join("config.toml");
            std::fs::write(&path, "max_file_size_mb = \"lots\"").expect("write");
            assert!(FileConfig::load_file(&path).is_none());
        }
    }
}
