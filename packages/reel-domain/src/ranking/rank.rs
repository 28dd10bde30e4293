use std::cmp::Ordering;

use crate::ranking::{Rankable, calculate_keyword_weights, score_video};

pub struct SearchRankParams<'a, T> {
	pub query: &'a str,
	pub candidates: Vec<T>,
}

struct ScoredVideo<T> {
	video: T,
	score: f64,
	created_at: i64,
}

/// Orders `candidates` by relevance to `query`, newest first among equal scores.
///
/// Returns the candidates untouched when there is nothing to rank by.
pub fn rank<T>(params: SearchRankParams<'_, T>) -> Vec<T>
where
	T: Rankable,
{
	let SearchRankParams { query, candidates } = params;

	if query.is_empty() || candidates.is_empty() {
		return candidates;
	}

	let keywords = calculate_keyword_weights(query, &candidates);

	if keywords.is_empty() {
		return candidates;
	}

	let mut scored = candidates
		.into_iter()
		.map(|video| {
			let score = score_video(&video, &keywords);
			let created_at = video.created_at().unix_timestamp();

			ScoredVideo { video, score, created_at }
		})
		.collect::<Vec<_>>();

	scored.sort_by(|left, right| {
		cmp_f64_desc(left.score, right.score).then_with(|| right.created_at.cmp(&left.created_at))
	});

	scored.into_iter().map(|entry| entry.video).collect()
}

pub fn cmp_f64_desc(a: f64, b: f64) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}
