use std::ops::Range;

/// Index range of a 1-based `page` within `len` items. Out-of-range pages yield an empty range.
pub fn page_window(len: usize, page: u32, page_size: u32) -> Range<usize> {
	let offset = page_offset(page, page_size).min(len as u64) as usize;
	let end = offset.saturating_add(page_size as usize).min(len);

	offset..end
}

pub fn page_offset(page: u32, page_size: u32) -> u64 {
	u64::from(page.max(1) - 1) * u64::from(page_size)
}

pub fn paginate<T>(mut items: Vec<T>, page: u32, page_size: u32) -> Vec<T> {
	let window = page_window(items.len(), page, page_size);

	items.truncate(window.end);
	items.drain(..window.start);

	items
}

pub fn total_pages(total: u64, page_size: u32) -> u64 {
	if page_size == 0 {
		return 0;
	}

	total.div_ceil(u64::from(page_size))
}
