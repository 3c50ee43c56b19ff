//! Dashboard configuration.
//!
//! Read from a TOML file; every field has a default, so an empty file (or no
//! file at all) yields a working configuration:
//!
//! ```toml
//! initial_path = "/"
//! id_param = "id"
//! fetch_latency_ms = 0
//! lazy_latency_ms = 0
//!
//! [log]
//! filter = "wayfinder=debug"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error parsing TOML syntax or an unknown key.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// A value parsed but is not usable.
	#[error("invalid {field}: {reason}")]
	Invalid {
		/// The offending field.
		field: &'static str,
		/// Why it was rejected.
		reason: String,
	},
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Logging section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
	/// `EnvFilter` directive used when `RUST_LOG` is unset.
	pub filter: Option<String>,
}

/// Top-level dashboard configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
	/// Location the page starts at.
	pub initial_path: String,
	/// Query parameter edit forms read their record id from.
	pub id_param: String,
	/// Artificial latency of the in-memory record service.
	pub fetch_latency_ms: u64,
	/// Artificial latency of lazily loaded screens.
	pub lazy_latency_ms: u64,
	pub log: LogConfig,
}

impl Default for DashboardConfig {
	fn default() -> Self {
		Self {
			initial_path: "/".to_string(),
			id_param: "id".to_string(),
			fetch_latency_ms: 0,
			lazy_latency_ms: 0,
			log: LogConfig::default(),
		}
	}
}

impl DashboardConfig {
	/// Parses and validates configuration from TOML source.
	pub fn from_toml(source: &str) -> Result<Self> {
		let config: Self = toml::from_str(source)?;
		config.validate()?;
		Ok(config)
	}

	/// Loads configuration from `path`.
	pub fn load(path: &Path) -> Result<Self> {
		let source = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml(&source)
	}

	pub fn fetch_latency(&self) -> Duration {
		Duration::from_millis(self.fetch_latency_ms)
	}

	pub fn lazy_latency(&self) -> Duration {
		Duration::from_millis(self.lazy_latency_ms)
	}

	fn validate(&self) -> Result<()> {
		if !self.initial_path.starts_with('/') {
			return Err(ConfigError::Invalid {
				field: "initial_path",
				reason: format!("{:?} is not an absolute path", self.initial_path),
			});
		}
		if self.id_param.is_empty() {
			return Err(ConfigError::Invalid {
				field: "id_param",
				reason: "must not be empty".to_string(),
			});
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn empty_source_yields_defaults() {
		assert_eq!(DashboardConfig::from_toml("").unwrap(), DashboardConfig::default());
	}

	#[test]
	fn fields_override_defaults() {
		let config = DashboardConfig::from_toml(
			r#"
			initial_path = "/vendors"
			id_param = "record"
			fetch_latency_ms = 25

			[log]
			filter = "wayfinder_loader=trace"
			"#,
		)
		.unwrap();
		assert_eq!(config.initial_path, "/vendors");
		assert_eq!(config.id_param, "record");
		assert_eq!(config.fetch_latency(), Duration::from_millis(25));
		assert_eq!(config.lazy_latency(), Duration::ZERO);
		assert_eq!(config.log.filter.as_deref(), Some("wayfinder_loader=trace"));
	}

	#[test]
	fn unknown_keys_are_rejected() {
		let err = DashboardConfig::from_toml("intial_path = \"/\"").unwrap_err();
		assert!(matches!(err, ConfigError::Toml(_)), "{err}");
	}

	#[test]
	fn relative_initial_path_is_invalid() {
		let err = DashboardConfig::from_toml("initial_path = \"vendors\"").unwrap_err();
		assert!(matches!(err, ConfigError::Invalid { field: "initial_path", .. }));
	}

	#[test]
	fn empty_id_param_is_invalid() {
		let err = DashboardConfig::from_toml("id_param = \"\"").unwrap_err();
		assert!(matches!(err, ConfigError::Invalid { field: "id_param", .. }));
	}

	#[test]
	fn load_reads_file_and_reports_missing_path() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "lazy_latency_ms = 40").unwrap();
		let config = DashboardConfig::load(file.path()).unwrap();
		assert_eq!(config.lazy_latency_ms, 40);

		let missing = file.path().with_extension("missing");
		assert!(matches!(DashboardConfig::load(&missing), Err(ConfigError::Io { .. })));
	}
}
