use time::OffsetDateTime;

use reel_config::Query;
use reel_domain::{
	page::{page_offset, paginate, total_pages},
	ranking::{self, SearchRankParams},
	shuffle,
};
use reel_storage::{
	models::VideoWithTags,
	videos::{SortColumn, SortOrder, VideoFilter},
};

use crate::{Error, ReelService, Result};

/// Raw query string of the list endpoint. Every field arrives as text and is parsed leniently by
/// [`VideoQuery::parse`].
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct VideoListRequest {
	pub page: Option<String>,
	pub page_size: Option<String>,
	/// Comma-separated library ids.
	pub library_ids: Option<String>,
	/// Comma-separated tag ids. A video must carry all of them.
	pub tag_ids: Option<String>,
	pub sort_by: Option<String>,
	pub order: Option<String>,
	pub keyword: Option<String>,
	pub random_seed: Option<String>,
	pub folder_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoQuery {
	pub filter: VideoFilter,
	pub sort: SortColumn,
	pub order: SortOrder,
	pub seed: Option<u64>,
	pub page: u32,
	pub page_size: u32,
}
impl VideoQuery {
	pub fn parse(req: &VideoListRequest, limits: &Query) -> Result<Self> {
		let sort = match non_empty(req.sort_by.as_deref()) {
			None => SortColumn::CreatedAt,
			Some(raw) => SortColumn::parse(raw).ok_or_else(|| Error::InvalidRequest {
				message: format!("Unsupported sort_by {raw:?}."),
			})?,
		};
		let order = match non_empty(req.order.as_deref()) {
			None => SortOrder::Desc,
			Some(raw) => SortOrder::parse(raw).ok_or_else(|| Error::InvalidRequest {
				message: format!("order must be asc or desc, got {raw:?}."),
			})?,
		};
		let page = parse_positive(req.page.as_deref()).unwrap_or(1);
		let page_size = parse_positive(req.page_size.as_deref())
			.unwrap_or(limits.default_page_size)
			.min(limits.max_page_size);
		let seed = non_empty(req.random_seed.as_deref())
			.and_then(|raw| raw.parse::<u64>().ok())
			.filter(|seed| *seed > 0);
		let folder_path = non_empty(req.folder_path.as_deref())
			.map(|raw| raw.trim_end_matches('/').to_string())
			.filter(|folder| !folder.is_empty());
		let filter = VideoFilter {
			library_ids: parse_ids(req.library_ids.as_deref()),
			folder_path,
			tag_ids: parse_ids(req.tag_ids.as_deref()),
			keyword: non_empty(req.keyword.as_deref()).map(str::to_string),
		};

		Ok(Self { filter, sort, order, seed, page, page_size })
	}

	pub fn is_default_sort(&self) -> bool {
		self.sort == SortColumn::CreatedAt && self.order == SortOrder::Desc
	}

	pub fn path(&self) -> ExecutionPath {
		let has_keyword = self.filter.keyword.is_some();

		if has_keyword && self.is_default_sort() {
			return ExecutionPath::Ranked;
		}
		if (!self.filter.tag_ids.is_empty() && !has_keyword)
			|| (self.sort == SortColumn::Random && self.seed.is_some())
		{
			return ExecutionPath::EagerLoad;
		}

		ExecutionPath::Direct
	}
}

/// How a list request is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionPath {
	/// Load every candidate, rank by keyword relevance, slice the page.
	Ranked,
	/// Load every candidate, shuffle or sort in memory, slice the page.
	EagerLoad,
	/// The store orders and pages natively.
	Direct,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct VideoItem {
	pub id: i64,
	pub library_id: i64,
	pub filename: String,
	pub filepath: String,
	pub duration: f64,
	pub width: i32,
	pub height: i32,
	pub codec: String,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	pub play_count: i64,
	pub rating: f64,
	pub cover_path: String,
	pub tags: Vec<String>,
}
impl VideoItem {
	fn from_row(row: VideoWithTags, cover_url_prefix: &str) -> Self {
		let VideoWithTags { video, tag_names } = row;

		Self {
			id: video.id,
			library_id: video.library_id,
			filename: video.filename,
			filepath: video.filepath,
			duration: video.duration,
			width: video.width,
			height: video.height,
			codec: video.codec,
			created_at: video.created_at,
			play_count: video.play_count,
			rating: video.rating,
			cover_path: cover_url(&video.cover_path, cover_url_prefix),
			tags: tag_names,
		}
	}
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct VideoListResponse {
	pub list: Vec<VideoItem>,
	pub total: u64,
	pub page: u32,
	pub page_size: u32,
	pub total_pages: u64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PlayCountResponse {
	pub play_count: i64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RatingRequest {
	pub rating: f64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RatingResponse {
	pub rating: f64,
}

impl ReelService {
	pub async fn list_videos(&self, req: VideoListRequest) -> Result<VideoListResponse> {
		let query = VideoQuery::parse(&req, &self.cfg.query)?;
		let path = query.path();

		tracing::debug!(
			?path,
			sort_by = query.sort.as_str(),
			order = query.order.as_str(),
			seeded = query.seed.is_some(),
			page = query.page,
			page_size = query.page_size,
			"Listing videos."
		);

		let (total, items) = match path {
			ExecutionPath::Ranked => {
				let candidates = self.store.load_candidates(&query.filter).await?;
				let total = candidates.len() as u64;
				let keyword = query.filter.keyword.as_deref().unwrap_or_default();
				let ranked = ranking::rank(SearchRankParams { query: keyword, candidates });

				tracing::debug!(candidates = total, "Ranked candidates by keyword relevance.");

				(total, paginate(ranked, query.page, query.page_size))
			},
			ExecutionPath::EagerLoad => {
				let mut candidates = self.store.load_candidates(&query.filter).await?;
				let total = candidates.len() as u64;

				if query.sort == SortColumn::Random {
					shuffle::shuffle(&mut candidates, query.seed);
				} else {
					sort_in_memory(&mut candidates, query.sort, query.order);
				}

				tracing::debug!(candidates = total, "Ordered candidates in memory.");

				(total, paginate(candidates, query.page, query.page_size))
			},
			ExecutionPath::Direct => {
				let offset = page_offset(query.page, query.page_size);
				let page = self
					.store
					.fetch_page(&query.filter, query.sort, query.order, offset, query.page_size)
					.await?;

				(u64::try_from(page.total).unwrap_or_default(), page.items)
			},
		};
		let prefix = self.cfg.media.cover_url_prefix.as_str();

		Ok(VideoListResponse {
			list: items.into_iter().map(|row| VideoItem::from_row(row, prefix)).collect(),
			total,
			page: query.page,
			page_size: query.page_size,
			total_pages: total_pages(total, query.page_size),
		})
	}

	pub async fn get_video(&self, video_id: i64) -> Result<VideoItem> {
		let Some(row) = self.store.fetch_video(video_id).await? else {
			return Err(Error::NotFound { message: format!("video {video_id}") });
		};

		Ok(VideoItem::from_row(row, &self.cfg.media.cover_url_prefix))
	}

	pub async fn record_play(&self, video_id: i64) -> Result<PlayCountResponse> {
		let play_count = self.store.increment_play_count(video_id).await?;

		tracing::debug!(video_id, play_count, "Recorded play.");

		Ok(PlayCountResponse { play_count })
	}

	pub async fn update_rating(&self, video_id: i64, req: RatingRequest) -> Result<RatingResponse> {
		if !req.rating.is_finite() || !(0.0..=10.0).contains(&req.rating) {
			return Err(Error::InvalidRequest {
				message: "rating must be between 0 and 10.".to_string(),
			});
		}

		let rating = self.store.update_rating(video_id, req.rating).await?;

		Ok(RatingResponse { rating })
	}
}

/// Stable in-memory ordering by one column, with ascending id as the final tie-break.
///
/// Filenames compare case-insensitively first, then by exact text.
pub fn sort_in_memory(items: &mut [VideoWithTags], sort: SortColumn, order: SortOrder) {
	items.sort_by(|a, b| {
		let (a, b) = (&a.video, &b.video);
		let by_column = match sort {
			SortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
			SortColumn::Filename => a
				.filename
				.to_lowercase()
				.cmp(&b.filename.to_lowercase())
				.then_with(|| a.filename.cmp(&b.filename)),
			SortColumn::PlayCount => a.play_count.cmp(&b.play_count),
			SortColumn::Duration => a.duration.total_cmp(&b.duration),
			SortColumn::Rating => a.rating.total_cmp(&b.rating),
			SortColumn::Id | SortColumn::Random => a.id.cmp(&b.id),
		};
		let by_column = match order {
			SortOrder::Asc => by_column,
			SortOrder::Desc => by_column.reverse(),
		};

		by_column.then_with(|| a.id.cmp(&b.id))
	});
}

fn cover_url(cover_path: &str, prefix: &str) -> String {
	if cover_path.is_empty() {
		return String::new();
	}

	let basename = cover_path.rsplit(['/', '\\']).next().unwrap_or(cover_path);

	format!("{prefix}{basename}")
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
	raw.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
	non_empty(raw)?.parse::<u32>().ok().filter(|value| *value > 0)
}

fn parse_ids(raw: Option<&str>) -> Vec<i64> {
	let mut ids = Vec::new();
	let Some(raw) = non_empty(raw) else { return ids };

	for id in raw.split(',').filter_map(|part| part.trim().parse::<i64>().ok()) {
		if id > 0 && !ids.contains(&id) {
			ids.push(id);
		}
	}

	ids
}
