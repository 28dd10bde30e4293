use crate::ranking::{KeywordInfo, Rankable};

pub const TITLE_BASE: f64 = 10.0;
/// Title score decays by `TITLE_DECAY_STEP` for every `TITLE_DECAY_SPAN` characters the first
/// match sits away from the start, down to `TITLE_DECAY_FLOOR`.
pub const TITLE_DECAY_STEP: f64 = 0.05;
pub const TITLE_DECAY_SPAN: usize = 10;
pub const TITLE_DECAY_FLOOR: f64 = 0.5;
/// Extra multiplier for a match inside the first `TITLE_DECAY_SPAN` characters.
pub const TITLE_LEAD_BONUS: f64 = 1.1;
pub const TAG_BASE: f64 = 5.0;
/// Added once per keyword that hits both the title and a tag.
pub const DOUBLE_HIT_BONUS: f64 = 3.0;

/// Scores `keyword` against a filename. The flag reports whether the keyword occurs at all.
pub fn title_score(title: &str, keyword: &KeywordInfo) -> (f64, bool) {
	let Some(position) = match_position(title, &keyword.word) else { return (0.0, false) };
	let mut score = TITLE_BASE * keyword.weight * position_decay(position);

	if position < TITLE_DECAY_SPAN {
		score *= TITLE_LEAD_BONUS;
	}

	(score, true)
}

/// Character offset, in the original title, of the first case-insensitive occurrence of `word`.
fn match_position(title: &str, word: &str) -> Option<usize> {
	let mut lowered = String::with_capacity(title.len());
	// Byte offset in `lowered` where each original character's lowercase form begins.
	let mut starts = Vec::with_capacity(title.len());

	for ch in title.chars() {
		starts.push(lowered.len());
		lowered.extend(ch.to_lowercase());
	}

	let byte_idx = lowered.find(word)?;

	Some(starts.partition_point(|start| *start <= byte_idx).saturating_sub(1))
}

pub fn position_decay(position: usize) -> f64 {
	let steps = (position / TITLE_DECAY_SPAN) as f64;

	(1.0 - TITLE_DECAY_STEP * steps).max(TITLE_DECAY_FLOOR)
}

/// First matching tag wins; further matching tags add nothing.
pub fn tag_score(tag_names: &[String], keyword: &KeywordInfo) -> f64 {
	let word = keyword.word.as_str();

	if tag_names.iter().any(|tag| tag.to_lowercase().contains(word)) {
		return TAG_BASE * keyword.weight;
	}

	0.0
}

pub fn popularity_bonus(play_count: i64) -> f64 {
	(play_count.max(0) as f64 + 1.0).log10()
}

pub fn score_video<T>(candidate: &T, keywords: &[KeywordInfo]) -> f64
where
	T: Rankable,
{
	let mut score = 0.0;

	for keyword in keywords {
		let (title, title_hit) = title_score(candidate.filename(), keyword);
		let tag = tag_score(candidate.tag_names(), keyword);

		score += title + tag;

		if title_hit && tag > 0.0 {
			score += DOUBLE_HIT_BONUS * keyword.weight;
		}
	}

	score + popularity_bonus(candidate.play_count())
}
