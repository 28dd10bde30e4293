use std::collections::{HashMap, HashSet};

use crate::ranking::Rankable;

pub const ANCHOR_WEIGHT: f64 = 1.2;
/// Keywords present in more than this share of candidates are damped.
pub const COMMON_FREQUENCY: f64 = 0.2;
pub const COMMON_FACTOR: f64 = 0.8;
/// Keywords present in fewer than this share of candidates (but at least one) are boosted.
pub const RARE_FREQUENCY: f64 = 0.05;
pub const RARE_FACTOR: f64 = 1.5;

#[derive(Clone, Debug, PartialEq)]
pub struct KeywordInfo {
	pub word: String,
	pub weight: f64,
	pub is_common: bool,
	pub is_rare: bool,
}
impl KeywordInfo {
	pub fn new(word: impl Into<String>, weight: f64) -> Self {
		Self { word: word.into(), weight, is_common: false, is_rare: false }
	}
}

/// Returns one entry per whitespace-separated token of `query`, in query order.
///
/// Repeated tokens are kept as separate entries. An empty result means there is nothing to rank
/// by.
pub fn calculate_keyword_weights<T>(query: &str, candidates: &[T]) -> Vec<KeywordInfo>
where
	T: Rankable,
{
	let words = query.split_whitespace().map(str::to_lowercase).collect::<Vec<_>>();

	if words.is_empty() {
		return Vec::new();
	}

	let mut seen = HashSet::new();
	let distinct =
		words.iter().map(String::as_str).filter(|word| seen.insert(*word)).collect::<Vec<_>>();
	let mut present = HashMap::<&str, usize>::new();

	for candidate in candidates {
		let title = candidate.filename().to_lowercase();
		let tags = tag_text(candidate.tag_names());

		for &word in &distinct {
			if title.contains(word) || tags.contains(word) {
				*present.entry(word).or_default() += 1;
			}
		}
	}

	let total = candidates.len();

	words
		.iter()
		.enumerate()
		.map(|(idx, word)| {
			let base = if idx == 0 { ANCHOR_WEIGHT } else { 1.0 };
			let count = present.get(word.as_str()).copied().unwrap_or(0);

			weigh(word, base, count, total)
		})
		.collect()
}

fn weigh(word: &str, base: f64, count: usize, total: usize) -> KeywordInfo {
	let mut info = KeywordInfo::new(word, base);

	if total == 0 {
		return info;
	}

	let frequency = count as f64 / total as f64;

	if frequency > COMMON_FREQUENCY {
		info.weight *= COMMON_FACTOR;
		info.is_common = true;
	} else if frequency > 0.0 && frequency < RARE_FREQUENCY {
		info.weight *= RARE_FACTOR;
		info.is_rare = true;
	}

	info
}

// Each tag is prefixed with a space so a token cannot straddle two tag names.
fn tag_text(tag_names: &[String]) -> String {
	let mut out = String::new();

	for tag in tag_names {
		out.push(' ');
		out.push_str(&tag.to_lowercase());
	}

	out
}
