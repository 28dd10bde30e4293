use std::sync::Arc;

use reel_service::ReelService;
use reel_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<ReelService>,
}
impl AppState {
	pub async fn new(config: reel_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		Ok(Self::from_service(ReelService::new(config, db)))
	}

	pub fn from_service(service: ReelService) -> Self {
		Self { service: Arc::new(service) }
	}
}
