use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub query: Query,
	#[serde(default)]
	pub media: Media,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

/// Paging limits for the video list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Query {
	#[serde(default = "default_page_size")]
	pub default_page_size: u32,
	/// Requested page sizes above this are clamped down to it.
	#[serde(default = "default_max_page_size")]
	pub max_page_size: u32,
}
impl Default for Query {
	fn default() -> Self {
		Self { default_page_size: default_page_size(), max_page_size: default_max_page_size() }
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Media {
	/// URL prefix that stored cover paths are rewritten under, e.g. "/covers/".
	#[serde(default = "default_cover_url_prefix")]
	pub cover_url_prefix: String,
}
impl Default for Media {
	fn default() -> Self {
		Self { cover_url_prefix: default_cover_url_prefix() }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_page_size() -> u32 {
	20
}

fn default_max_page_size() -> u32 {
	200
}

fn default_cover_url_prefix() -> String {
	"/covers/".to_string()
}
