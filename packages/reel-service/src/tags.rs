use reel_storage::models::Tag;

use crate::{Error, ReelService, Result};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TagItem {
	pub id: i64,
	pub name: String,
	pub sort_order: i32,
}
impl From<Tag> for TagItem {
	fn from(tag: Tag) -> Self {
		Self { id: tag.id, name: tag.name, sort_order: tag.sort_order }
	}
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TagListResponse {
	pub tags: Vec<TagItem>,
}
impl TagListResponse {
	fn from_tags(tags: Vec<Tag>) -> Self {
		Self { tags: tags.into_iter().map(TagItem::from).collect() }
	}
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AddVideoTagRequest {
	pub tag_id: i64,
}

impl ReelService {
	pub async fn list_tags(&self) -> Result<TagListResponse> {
		let tags = self.store.list_tags().await?;

		Ok(TagListResponse::from_tags(tags))
	}

	pub async fn get_video_tags(&self, video_id: i64) -> Result<TagListResponse> {
		let tags = self.store.fetch_video_tags(video_id).await?;

		Ok(TagListResponse::from_tags(tags))
	}

	/// Attaches a tag and returns the video's tags afterwards.
	pub async fn add_video_tag(
		&self,
		video_id: i64,
		req: AddVideoTagRequest,
	) -> Result<TagListResponse> {
		if req.tag_id <= 0 {
			return Err(Error::InvalidRequest { message: "tag_id must be positive.".to_string() });
		}

		let tags = self.store.add_video_tag(video_id, req.tag_id).await?;

		tracing::debug!(video_id, tag_id = req.tag_id, "Attached tag.");

		Ok(TagListResponse::from_tags(tags))
	}

	pub async fn remove_video_tag(&self, video_id: i64, tag_id: i64) -> Result<TagListResponse> {
		let tags = self.store.remove_video_tag(video_id, tag_id).await?;

		tracing::debug!(video_id, tag_id, "Detached tag.");

		Ok(TagListResponse::from_tags(tags))
	}
}
