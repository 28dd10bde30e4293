pub mod store;
pub mod tags;
pub mod time_serde;
pub mod videos;

mod error;

pub use error::{Error, Result};
pub use store::{BoxFuture, VideoStore};
pub use tags::{AddVideoTagRequest, TagItem, TagListResponse};
pub use videos::{
	ExecutionPath, PlayCountResponse, RatingRequest, RatingResponse, VideoItem, VideoListRequest,
	VideoListResponse, VideoQuery,
};

use std::sync::Arc;

use reel_config::Config;
use reel_storage::db::Db;

pub struct ReelService {
	pub cfg: Config,
	pub store: Arc<dyn VideoStore>,
}
impl ReelService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, store: Arc::new(db) }
	}

	pub fn with_store(cfg: Config, store: Arc<dyn VideoStore>) -> Self {
		Self { cfg, store }
	}
}
