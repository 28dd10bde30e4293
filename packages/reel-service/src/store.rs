use std::{future::Future, pin::Pin};

use reel_storage::{
	db::Db,
	models::{Tag, VideoWithTags},
	tags,
	videos::{self, SortColumn, SortOrder, VideoFilter, VideoPage},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Read and write access to the video catalog.
///
/// [`Db`] is the production implementation. Tests plug in an in-memory catalog.
pub trait VideoStore
where
	Self: Send + Sync,
{
	/// Every candidate matching `filter`, ordered by id, with tag names attached.
	fn load_candidates<'a>(
		&'a self,
		filter: &'a VideoFilter,
	) -> BoxFuture<'a, reel_storage::Result<Vec<VideoWithTags>>>;

	/// One page of candidates in store order plus the unpaged total.
	fn fetch_page<'a>(
		&'a self,
		filter: &'a VideoFilter,
		sort: SortColumn,
		order: SortOrder,
		offset: u64,
		limit: u32,
	) -> BoxFuture<'a, reel_storage::Result<VideoPage>>;

	fn fetch_video<'a>(
		&'a self,
		video_id: i64,
	) -> BoxFuture<'a, reel_storage::Result<Option<VideoWithTags>>>;

	fn increment_play_count<'a>(
		&'a self,
		video_id: i64,
	) -> BoxFuture<'a, reel_storage::Result<i64>>;

	fn update_rating<'a>(
		&'a self,
		video_id: i64,
		rating: f64,
	) -> BoxFuture<'a, reel_storage::Result<f64>>;

	fn list_tags<'a>(&'a self) -> BoxFuture<'a, reel_storage::Result<Vec<Tag>>>;

	/// Live tags of a live video. A missing video is [`reel_storage::Error::NotFound`].
	fn fetch_video_tags<'a>(
		&'a self,
		video_id: i64,
	) -> BoxFuture<'a, reel_storage::Result<Vec<Tag>>>;

	/// Links a tag and returns the video's tags afterwards. An existing link is
	/// [`reel_storage::Error::InvalidArgument`].
	fn add_video_tag<'a>(
		&'a self,
		video_id: i64,
		tag_id: i64,
	) -> BoxFuture<'a, reel_storage::Result<Vec<Tag>>>;

	fn remove_video_tag<'a>(
		&'a self,
		video_id: i64,
		tag_id: i64,
	) -> BoxFuture<'a, reel_storage::Result<Vec<Tag>>>;
}

impl VideoStore for Db {
	fn load_candidates<'a>(
		&'a self,
		filter: &'a VideoFilter,
	) -> BoxFuture<'a, reel_storage::Result<Vec<VideoWithTags>>> {
		Box::pin(videos::load_candidates(self, filter))
	}

	fn fetch_page<'a>(
		&'a self,
		filter: &'a VideoFilter,
		sort: SortColumn,
		order: SortOrder,
		offset: u64,
		limit: u32,
	) -> BoxFuture<'a, reel_storage::Result<VideoPage>> {
		Box::pin(videos::fetch_page(self, filter, sort, order, offset, limit))
	}

	fn fetch_video<'a>(
		&'a self,
		video_id: i64,
	) -> BoxFuture<'a, reel_storage::Result<Option<VideoWithTags>>> {
		Box::pin(videos::fetch_video(self, video_id))
	}

	fn increment_play_count<'a>(
		&'a self,
		video_id: i64,
	) -> BoxFuture<'a, reel_storage::Result<i64>> {
		Box::pin(videos::increment_play_count(self, video_id))
	}

	fn update_rating<'a>(
		&'a self,
		video_id: i64,
		rating: f64,
	) -> BoxFuture<'a, reel_storage::Result<f64>> {
		Box::pin(videos::update_rating(self, video_id, rating))
	}

	fn list_tags<'a>(&'a self) -> BoxFuture<'a, reel_storage::Result<Vec<Tag>>> {
		Box::pin(tags::list_tags(self))
	}

	fn fetch_video_tags<'a>(
		&'a self,
		video_id: i64,
	) -> BoxFuture<'a, reel_storage::Result<Vec<Tag>>> {
		Box::pin(tags::fetch_video_tags(self, video_id))
	}

	fn add_video_tag<'a>(
		&'a self,
		video_id: i64,
		tag_id: i64,
	) -> BoxFuture<'a, reel_storage::Result<Vec<Tag>>> {
		Box::pin(tags::add_video_tag(self, video_id, tag_id))
	}

	fn remove_video_tag<'a>(
		&'a self,
		video_id: i64,
		tag_id: i64,
	) -> BoxFuture<'a, reel_storage::Result<Vec<Tag>>> {
		Box::pin(tags::remove_video_tag(self, video_id, tag_id))
	}
}
