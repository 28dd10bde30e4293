//! Query-time relevance ranking for video search.
//!
//! A query is split into keywords, each keyword is weighted by how often it occurs across the
//! candidate set, every candidate is scored against the weighted keywords, and the candidates
//! are ordered by score and then by recency.

mod keyword;
mod rank;
mod score;

pub use keyword::{
	ANCHOR_WEIGHT, COMMON_FACTOR, COMMON_FREQUENCY, KeywordInfo, RARE_FACTOR, RARE_FREQUENCY,
	calculate_keyword_weights,
};
pub use rank::{SearchRankParams, cmp_f64_desc, rank};
pub use score::{
	DOUBLE_HIT_BONUS, TAG_BASE, TITLE_BASE, TITLE_DECAY_FLOOR, TITLE_DECAY_SPAN, TITLE_DECAY_STEP,
	TITLE_LEAD_BONUS, popularity_bonus, position_decay, score_video, tag_score, title_score,
};

use time::OffsetDateTime;

/// Read-only view of a candidate video.
pub trait Rankable {
	fn filename(&self) -> &str;

	fn tag_names(&self) -> &[String];

	fn play_count(&self) -> i64;

	fn created_at(&self) -> OffsetDateTime;
}
