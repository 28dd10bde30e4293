use time::OffsetDateTime;

use reel_domain::ranking::Rankable;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Video {
	pub id: i64,
	pub library_id: i64,
	pub filename: String,
	pub filepath: String,
	pub duration: f64,
	pub width: i32,
	pub height: i32,
	pub codec: String,
	pub created_at: OffsetDateTime,
	pub play_count: i64,
	pub rating: f64,
	pub cover_path: String,
}

/// A video row together with the names of its live tags, ordered by tag sort order.
#[derive(Debug, Clone)]
pub struct VideoWithTags {
	pub video: Video,
	pub tag_names: Vec<String>,
}
impl Rankable for VideoWithTags {
	fn filename(&self) -> &str {
		&self.video.filename
	}

	fn tag_names(&self) -> &[String] {
		&self.tag_names
	}

	fn play_count(&self) -> i64 {
		self.video.play_count
	}

	fn created_at(&self) -> OffsetDateTime {
		self.video.created_at
	}
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Tag {
	pub id: i64,
	pub name: String,
	pub sort_order: i32,
}
