use sqlx::PgConnection;

use crate::{Error, Result, db::Db, models::Tag};

/// Every live tag, in display order.
pub async fn list_tags(db: &Db) -> Result<Vec<Tag>> {
	let tags = sqlx::query_as(
		"\
SELECT id, name, sort_order
FROM tags
WHERE deleted_at IS NULL
ORDER BY sort_order ASC, name ASC, id ASC",
	)
	.fetch_all(&db.pool)
	.await?;

	Ok(tags)
}

/// Live tags attached to a live video. A missing video is an error, an untagged one is not.
pub async fn fetch_video_tags(db: &Db, video_id: i64) -> Result<Vec<Tag>> {
	let mut conn = db.pool.acquire().await?;

	ensure_video(&mut conn, video_id).await?;

	video_tags(&mut conn, video_id).await
}

/// Links a tag to a video. Both must exist and the link must be new.
pub async fn add_video_tag(db: &Db, video_id: i64, tag_id: i64) -> Result<Vec<Tag>> {
	let mut tx = db.pool.begin().await?;

	ensure_video(&mut tx, video_id).await?;

	let tag_exists: bool = sqlx::query_scalar(
		"SELECT EXISTS (SELECT 1 FROM tags WHERE id = $1 AND deleted_at IS NULL)",
	)
	.bind(tag_id)
	.fetch_one(&mut *tx)
	.await?;

	if !tag_exists {
		return Err(Error::NotFound(format!("tag {tag_id}")));
	}

	let inserted = sqlx::query(
		"INSERT INTO video_tags (video_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
	)
	.bind(video_id)
	.bind(tag_id)
	.execute(&mut *tx)
	.await?
	.rows_affected();

	if inserted == 0 {
		return Err(Error::InvalidArgument(format!(
			"tag {tag_id} is already attached to video {video_id}."
		)));
	}

	let tags = video_tags(&mut tx, video_id).await?;

	tx.commit().await?;

	Ok(tags)
}

/// Unlinks a tag from a video. Removing a link that does not exist is a no-op.
pub async fn remove_video_tag(db: &Db, video_id: i64, tag_id: i64) -> Result<Vec<Tag>> {
	let mut tx = db.pool.begin().await?;

	ensure_video(&mut tx, video_id).await?;

	sqlx::query("DELETE FROM video_tags WHERE video_id = $1 AND tag_id = $2")
		.bind(video_id)
		.bind(tag_id)
		.execute(&mut *tx)
		.await?;

	let tags = video_tags(&mut tx, video_id).await?;

	tx.commit().await?;

	Ok(tags)
}

async fn ensure_video(conn: &mut PgConnection, video_id: i64) -> Result<()> {
	let exists: bool = sqlx::query_scalar(
		"SELECT EXISTS (SELECT 1 FROM videos WHERE id = $1 AND deleted_at IS NULL)",
	)
	.bind(video_id)
	.fetch_one(&mut *conn)
	.await?;

	if !exists {
		return Err(Error::NotFound(format!("video {video_id}")));
	}

	Ok(())
}

async fn video_tags(conn: &mut PgConnection, video_id: i64) -> Result<Vec<Tag>> {
	let tags = sqlx::query_as(
		"\
SELECT t.id, t.name, t.sort_order
FROM video_tags vt
JOIN tags t ON t.id = vt.tag_id
WHERE vt.video_id = $1 AND t.deleted_at IS NULL
ORDER BY t.sort_order ASC, t.id ASC",
	)
	.bind(video_id)
	.fetch_all(&mut *conn)
	.await?;

	Ok(tags)
}
