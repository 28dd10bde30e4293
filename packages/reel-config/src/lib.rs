mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Media, Postgres, Query, Service, Storage};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.query.default_page_size == 0 {
		return Err(Error::Validation {
			message: "query.default_page_size must be greater than zero.".to_string(),
		});
	}
	if cfg.query.max_page_size < cfg.query.default_page_size {
		return Err(Error::Validation {
			message: "query.max_page_size must be at least query.default_page_size.".to_string(),
		});
	}
	if cfg.media.cover_url_prefix.trim().is_empty() {
		return Err(Error::Validation {
			message: "media.cover_url_prefix must be non-empty.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let prefix = cfg.media.cover_url_prefix.trim();

	if !prefix.is_empty() && !prefix.ends_with('/') {
		cfg.media.cover_url_prefix = format!("{prefix}/");
	} else {
		cfg.media.cover_url_prefix = prefix.to_string();
	}
}
