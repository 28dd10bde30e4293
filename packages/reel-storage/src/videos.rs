use std::collections::HashMap;

use sqlx::{PgConnection, Postgres, QueryBuilder, Transaction};

use crate::{
	Error, Result,
	db::Db,
	models::{Video, VideoWithTags},
};

const VIDEO_COLUMNS: &str = "\
v.id, v.library_id, v.filename, v.filepath, v.duration, v.width, v.height, v.codec, \
v.created_at, v.play_count, v.rating, v.cover_path";

/// Predicates that narrow the catalog down to a candidate set. Empty fields do not filter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VideoFilter {
	pub library_ids: Vec<i64>,
	/// Only videos directly inside this folder, not in its subfolders. No trailing slash.
	pub folder_path: Option<String>,
	/// A video must carry every one of these tags.
	pub tag_ids: Vec<i64>,
	pub keyword: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortColumn {
	CreatedAt,
	Filename,
	PlayCount,
	Duration,
	Rating,
	Id,
	Random,
}
impl SortColumn {
	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"created_at" => Some(Self::CreatedAt),
			"filename" => Some(Self::Filename),
			"play_count" => Some(Self::PlayCount),
			"duration" => Some(Self::Duration),
			"rating" => Some(Self::Rating),
			"id" => Some(Self::Id),
			"random" => Some(Self::Random),
			_ => None,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::CreatedAt => "created_at",
			Self::Filename => "filename",
			Self::PlayCount => "play_count",
			Self::Duration => "duration",
			Self::Rating => "rating",
			Self::Id => "id",
			Self::Random => "random",
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
	Asc,
	Desc,
}
impl SortOrder {
	pub fn parse(raw: &str) -> Option<Self> {
		if raw.eq_ignore_ascii_case("asc") {
			Some(Self::Asc)
		} else if raw.eq_ignore_ascii_case("desc") {
			Some(Self::Desc)
		} else {
			None
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Asc => "asc",
			Self::Desc => "desc",
		}
	}

	fn as_sql(self) -> &'static str {
		match self {
			Self::Asc => "ASC",
			Self::Desc => "DESC",
		}
	}
}

#[derive(Debug)]
pub struct VideoPage {
	pub total: i64,
	pub items: Vec<VideoWithTags>,
}

/// Loads the whole filtered candidate set, ordered by id, with tag names attached.
pub async fn load_candidates(db: &Db, filter: &VideoFilter) -> Result<Vec<VideoWithTags>> {
	let mut tx = begin_snapshot(db).await?;
	let mut builder = QueryBuilder::new(format!("SELECT {VIDEO_COLUMNS} FROM videos v"));

	push_filters(&mut builder, filter);
	builder.push(" ORDER BY v.id ASC");

	let videos: Vec<Video> = builder.build_query_as().fetch_all(&mut *tx).await?;
	let items = attach_tags(&mut tx, videos).await?;

	tx.commit().await?;

	Ok(items)
}

/// Lets Postgres order, offset and limit the filtered set. The total is read from the same
/// snapshot as the page.
pub async fn fetch_page(
	db: &Db,
	filter: &VideoFilter,
	sort: SortColumn,
	order: SortOrder,
	offset: u64,
	limit: u32,
) -> Result<VideoPage> {
	let mut tx = begin_snapshot(db).await?;
	let mut count = QueryBuilder::new("SELECT COUNT(*) FROM videos v");

	push_filters(&mut count, filter);

	let total: i64 = count.build_query_scalar().fetch_one(&mut *tx).await?;
	let mut builder = QueryBuilder::new(format!("SELECT {VIDEO_COLUMNS} FROM videos v"));

	push_filters(&mut builder, filter);
	builder.push(" ORDER BY ");
	builder.push(order_clause(sort, order));
	builder.push(" LIMIT ");
	builder.push_bind(i64::from(limit));
	builder.push(" OFFSET ");
	builder.push_bind(i64::try_from(offset).unwrap_or(i64::MAX));

	let videos: Vec<Video> = builder.build_query_as().fetch_all(&mut *tx).await?;
	let items = attach_tags(&mut tx, videos).await?;

	tx.commit().await?;

	Ok(VideoPage { total, items })
}

pub async fn fetch_video(db: &Db, video_id: i64) -> Result<Option<VideoWithTags>> {
	let mut conn = db.pool.acquire().await?;
	let video: Option<Video> = sqlx::query_as(&format!(
		"SELECT {VIDEO_COLUMNS} FROM videos v WHERE v.id = $1 AND v.deleted_at IS NULL"
	))
	.bind(video_id)
	.fetch_optional(&mut *conn)
	.await?;
	let Some(video) = video else { return Ok(None) };
	let mut items = attach_tags(&mut conn, vec![video]).await?;

	Ok(items.pop())
}

pub async fn increment_play_count(db: &Db, video_id: i64) -> Result<i64> {
	let play_count: Option<i64> = sqlx::query_scalar(
		"\
UPDATE videos
SET play_count = play_count + 1
WHERE id = $1 AND deleted_at IS NULL
RETURNING play_count",
	)
	.bind(video_id)
	.fetch_optional(&db.pool)
	.await?;

	play_count.ok_or_else(|| Error::NotFound(format!("video {video_id}")))
}

pub async fn update_rating(db: &Db, video_id: i64, rating: f64) -> Result<f64> {
	if !rating.is_finite() || !(0.0..=10.0).contains(&rating) {
		return Err(Error::InvalidArgument("rating must be between 0 and 10.".to_string()));
	}

	let stored: Option<f64> = sqlx::query_scalar(
		"\
UPDATE videos
SET rating = $2
WHERE id = $1 AND deleted_at IS NULL
RETURNING rating",
	)
	.bind(video_id)
	.bind(rating)
	.fetch_optional(&db.pool)
	.await?;

	stored.ok_or_else(|| Error::NotFound(format!("video {video_id}")))
}

/// Escapes `LIKE` wildcards so user text only matches literally.
pub fn escape_like(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len());

	for ch in raw.chars() {
		if matches!(ch, '\\' | '%' | '_') {
			out.push('\\');
		}

		out.push(ch);
	}

	out
}

pub fn order_clause(sort: SortColumn, order: SortOrder) -> String {
	match sort {
		SortColumn::Random => "random()".to_string(),
		SortColumn::Id => format!("v.id {}", order.as_sql()),
		column => format!("v.{} {}, v.id ASC", column.as_str(), order.as_sql()),
	}
}

/// Returns the numeric id a single-token keyword refers to, if it is one.
pub fn keyword_video_id(keyword: &str) -> Option<i64> {
	let mut tokens = keyword.split_whitespace();
	let token = tokens.next()?;

	if tokens.next().is_some() {
		return None;
	}

	token.parse::<u32>().ok().filter(|id| *id > 0).map(i64::from)
}

async fn begin_snapshot(db: &Db) -> Result<Transaction<'static, Postgres>> {
	let mut tx = db.pool.begin().await?;

	sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
		.execute(&mut *tx)
		.await?;

	Ok(tx)
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &VideoFilter) {
	builder.push(" WHERE v.deleted_at IS NULL");

	if !filter.library_ids.is_empty() {
		builder.push(" AND v.library_id = ANY(");
		builder.push_bind(filter.library_ids.clone());
		builder.push(")");
	}
	if let Some(folder) = filter.folder_path.as_deref() {
		let depth = folder.matches('/').count() as i32 + 1;

		builder.push(" AND v.filepath LIKE ");
		builder.push_bind(format!("{}/%", escape_like(folder)));
		builder.push(" AND length(v.filepath) - length(replace(v.filepath, '/', '')) = ");
		builder.push_bind(depth);
	}
	if !filter.tag_ids.is_empty() {
		builder.push(
			" AND v.id IN (SELECT vt.video_id FROM video_tags vt JOIN tags t ON t.id = vt.tag_id \
			 WHERE t.deleted_at IS NULL AND vt.tag_id = ANY(",
		);
		builder.push_bind(filter.tag_ids.clone());
		builder.push(") GROUP BY vt.video_id HAVING COUNT(DISTINCT vt.tag_id) = ");
		builder.push_bind(filter.tag_ids.len() as i64);
		builder.push(")");
	}
	if let Some(keyword) = filter.keyword.as_deref() {
		push_keyword(builder, keyword);
	}
}

fn push_keyword(builder: &mut QueryBuilder<'_, Postgres>, keyword: &str) {
	if let Some(video_id) = keyword_video_id(keyword) {
		builder.push(" AND v.id = ");
		builder.push_bind(video_id);

		return;
	}

	for token in keyword.split_whitespace() {
		let pattern = format!("%{}%", escape_like(token));

		builder.push(" AND (v.filename ILIKE ");
		builder.push_bind(pattern.clone());
		builder.push(
			" OR v.id IN (SELECT vt.video_id FROM video_tags vt JOIN tags t ON t.id = vt.tag_id \
			 WHERE t.deleted_at IS NULL AND t.name ILIKE ",
		);
		builder.push_bind(pattern);
		builder.push("))");
	}
}

async fn attach_tags(conn: &mut PgConnection, videos: Vec<Video>) -> Result<Vec<VideoWithTags>> {
	if videos.is_empty() {
		return Ok(Vec::new());
	}

	let ids = videos.iter().map(|video| video.id).collect::<Vec<_>>();
	let rows: Vec<(i64, String)> = sqlx::query_as(
		"\
SELECT vt.video_id, t.name
FROM video_tags vt
JOIN tags t ON t.id = vt.tag_id
WHERE vt.video_id = ANY($1) AND t.deleted_at IS NULL
ORDER BY vt.video_id, t.sort_order, t.id",
	)
	.bind(ids.as_slice())
	.fetch_all(&mut *conn)
	.await?;
	let mut by_video = HashMap::<i64, Vec<String>>::new();

	for (video_id, name) in rows {
		by_video.entry(video_id).or_default().push(name);
	}

	Ok(videos
		.into_iter()
		.map(|video| {
			let tag_names = by_video.remove(&video.id).unwrap_or_default();

			VideoWithTags { video, tag_names }
		})
		.collect())
}
