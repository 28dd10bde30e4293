use time::{Duration, OffsetDateTime, macros::datetime};

use reel_config::Postgres;
use reel_storage::{
	db::Db,
	tags,
	videos::{self, SortColumn, SortOrder, VideoFilter},
};
use reel_testkit::TestDatabase;

const BASE_TIME: OffsetDateTime = datetime!(2024-05-01 12:00 UTC);

struct Seeded {
	beach: i64,
	sunset: i64,
	nested: i64,
	other_library: i64,
	tag_travel: i64,
	tag_summer: i64,
}

async fn connect(test_db: &TestDatabase) -> Db {
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 2 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	db
}

async fn insert_library(db: &Db, name: &str, path: &str) -> i64 {
	sqlx::query_scalar("INSERT INTO libraries (name, path) VALUES ($1, $2) RETURNING id")
		.bind(name)
		.bind(path)
		.fetch_one(&db.pool)
		.await
		.expect("Failed to insert library.")
}

async fn insert_video(
	db: &Db,
	library_id: i64,
	filepath: &str,
	created_at: OffsetDateTime,
	play_count: i64,
) -> i64 {
	let filename = filepath.rsplit('/').next().unwrap_or(filepath);

	sqlx::query_scalar(
		"\
INSERT INTO videos (library_id, filename, filepath, created_at, play_count)
VALUES ($1, $2, $3, $4, $5)
RETURNING id",
	)
	.bind(library_id)
	.bind(filename)
	.bind(filepath)
	.bind(created_at)
	.bind(play_count)
	.fetch_one(&db.pool)
	.await
	.expect("Failed to insert video.")
}

async fn insert_tag(db: &Db, name: &str, sort_order: i32) -> i64 {
	sqlx::query_scalar("INSERT INTO tags (name, sort_order) VALUES ($1, $2) RETURNING id")
		.bind(name)
		.bind(sort_order)
		.fetch_one(&db.pool)
		.await
		.expect("Failed to insert tag.")
}

async fn seed(db: &Db) -> Seeded {
	let library = insert_library(db, "main", "/mnt/videos").await;
	let second = insert_library(db, "second", "/mnt/other").await;
	let at = |minutes: i64| BASE_TIME + Duration::minutes(minutes);
	let beach = insert_video(db, library, "/mnt/videos/beach_day.mp4", at(0), 3).await;
	let sunset = insert_video(db, library, "/mnt/videos/sunset.mp4", at(1), 0).await;
	let nested = insert_video(db, library, "/mnt/videos/trips/beach_night.mp4", at(2), 0).await;
	let other_library = insert_video(db, second, "/mnt/other/clip.mp4", at(3), 0).await;
	let tag_travel = insert_tag(db, "Travel", 2).await;
	let tag_summer = insert_tag(db, "Summer", 1).await;

	for (video_id, tag_id) in
		[(beach, tag_travel), (beach, tag_summer), (sunset, tag_travel), (nested, tag_summer)]
	{
		tags::add_video_tag(db, video_id, tag_id).await.expect("Failed to attach tag.");
	}

	Seeded { beach, sunset, nested, other_library, tag_travel, tag_summer }
}

fn ids(items: &[reel_storage::models::VideoWithTags]) -> Vec<i64> {
	items.iter().map(|item| item.video.id).collect()
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set REEL_PG_DSN to run."]
async fn db_connects_and_bootstraps() {
	let Some(base_dsn) = reel_testkit::env_dsn() else {
		eprintln!("Skipping db_connects_and_bootstraps; set REEL_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = connect(&test_db).await;

	// A second bootstrap must be a no-op.
	db.ensure_schema().await.expect("Failed to re-apply schema.");

	for table in ["libraries", "videos", "tags", "video_tags"] {
		let count: i64 = sqlx::query_scalar(
			"SELECT count(*) FROM information_schema.tables WHERE table_name = $1",
		)
		.bind(table)
		.fetch_one(&db.pool)
		.await
		.expect("Failed to query schema tables.");

		assert_eq!(count, 1, "Missing table {table}.");
	}

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set REEL_PG_DSN to run."]
async fn candidate_filters_narrow_the_set() {
	let Some(base_dsn) = reel_testkit::env_dsn() else {
		eprintln!("Skipping candidate_filters_narrow_the_set; set REEL_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = connect(&test_db).await;
	let seeded = seed(&db).await;
	let all = videos::load_candidates(&db, &VideoFilter::default())
		.await
		.expect("Failed to load candidates.");

	assert_eq!(ids(&all), vec![seeded.beach, seeded.sunset, seeded.nested, seeded.other_library]);
	assert_eq!(all[0].tag_names, vec!["Summer".to_string(), "Travel".to_string()]);

	let folder = VideoFilter {
		folder_path: Some("/mnt/videos".to_string()),
		..Default::default()
	};
	let folder = videos::load_candidates(&db, &folder).await.expect("Failed to load folder.");

	assert_eq!(ids(&folder), vec![seeded.beach, seeded.sunset]);

	let tagged =
		VideoFilter { tag_ids: vec![seeded.tag_travel, seeded.tag_summer], ..Default::default() };
	let tagged = videos::load_candidates(&db, &tagged).await.expect("Failed to load tagged.");

	assert_eq!(ids(&tagged), vec![seeded.beach]);

	let keyword = VideoFilter { keyword: Some("BEACH".to_string()), ..Default::default() };
	let keyword = videos::load_candidates(&db, &keyword).await.expect("Failed to load keyword.");

	assert_eq!(ids(&keyword), vec![seeded.beach, seeded.nested]);

	let by_tag_name = VideoFilter { keyword: Some("travel".to_string()), ..Default::default() };
	let by_tag_name =
		videos::load_candidates(&db, &by_tag_name).await.expect("Failed to load keyword.");

	assert_eq!(ids(&by_tag_name), vec![seeded.beach, seeded.sunset]);

	let by_id = VideoFilter { keyword: Some(seeded.sunset.to_string()), ..Default::default() };
	let by_id = videos::load_candidates(&db, &by_id).await.expect("Failed to load by id.");

	assert_eq!(ids(&by_id), vec![seeded.sunset]);

	let library = VideoFilter { library_ids: vec![1_000_000], ..Default::default() };
	let library = videos::load_candidates(&db, &library).await.expect("Failed to load library.");

	assert!(library.is_empty());

	sqlx::query("UPDATE videos SET deleted_at = now() WHERE id = $1")
		.bind(seeded.sunset)
		.execute(&db.pool)
		.await
		.expect("Failed to soft-delete video.");

	let remaining = videos::load_candidates(&db, &VideoFilter::default())
		.await
		.expect("Failed to load candidates.");

	assert!(!ids(&remaining).contains(&seeded.sunset));
	assert!(
		videos::fetch_video(&db, seeded.sunset).await.expect("Failed to fetch video.").is_none()
	);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set REEL_PG_DSN to run."]
async fn direct_page_orders_and_counts() {
	let Some(base_dsn) = reel_testkit::env_dsn() else {
		eprintln!("Skipping direct_page_orders_and_counts; set REEL_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = connect(&test_db).await;
	let seeded = seed(&db).await;
	let page = videos::fetch_page(
		&db,
		&VideoFilter::default(),
		SortColumn::CreatedAt,
		SortOrder::Desc,
		1,
		2,
	)
	.await
	.expect("Failed to fetch page.");

	assert_eq!(page.total, 4);
	assert_eq!(ids(&page.items), vec![seeded.nested, seeded.sunset]);

	let page = videos::fetch_page(
		&db,
		&VideoFilter::default(),
		SortColumn::PlayCount,
		SortOrder::Desc,
		0,
		1,
	)
	.await
	.expect("Failed to fetch page.");

	assert_eq!(ids(&page.items), vec![seeded.beach]);

	let beyond = videos::fetch_page(
		&db,
		&VideoFilter::default(),
		SortColumn::Id,
		SortOrder::Asc,
		40,
		10,
	)
	.await
	.expect("Failed to fetch page.");

	assert_eq!(beyond.total, 4);
	assert!(beyond.items.is_empty());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set REEL_PG_DSN to run."]
async fn play_count_and_rating_updates() {
	let Some(base_dsn) = reel_testkit::env_dsn() else {
		eprintln!("Skipping play_count_and_rating_updates; set REEL_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = connect(&test_db).await;
	let seeded = seed(&db).await;
	let plays =
		videos::increment_play_count(&db, seeded.beach).await.expect("Failed to record play.");

	assert_eq!(plays, 4);

	let rating = videos::update_rating(&db, seeded.beach, 7.5).await.expect("Failed to rate.");

	assert_eq!(rating, 7.5);
	assert!(matches!(
		videos::update_rating(&db, seeded.beach, 11.0).await,
		Err(reel_storage::Error::InvalidArgument(_))
	));
	assert!(matches!(
		videos::increment_play_count(&db, 1_000_000).await,
		Err(reel_storage::Error::NotFound(_))
	));

	let detail = videos::fetch_video(&db, seeded.beach)
		.await
		.expect("Failed to fetch video.")
		.expect("Video should exist.");

	assert_eq!(detail.video.play_count, 4);
	assert_eq!(detail.video.rating, 7.5);
	assert_eq!(detail.tag_names, vec!["Summer".to_string(), "Travel".to_string()]);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set REEL_PG_DSN to run."]
async fn soft_deleted_tags_are_invisible() {
	let Some(base_dsn) = reel_testkit::env_dsn() else {
		eprintln!("Skipping soft_deleted_tags_are_invisible; set REEL_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = connect(&test_db).await;
	let seeded = seed(&db).await;
	let retired = insert_tag(&db, "Retired", 0).await;

	tags::add_video_tag(&db, seeded.sunset, retired).await.expect("Failed to attach tag.");
	sqlx::query("UPDATE tags SET deleted_at = now() WHERE id = $1")
		.bind(retired)
		.execute(&db.pool)
		.await
		.expect("Failed to soft-delete tag.");

	let by_tag = VideoFilter { tag_ids: vec![retired], ..Default::default() };
	let by_tag = videos::load_candidates(&db, &by_tag).await.expect("Failed to load tagged.");

	assert!(by_tag.is_empty());

	let mixed = VideoFilter { tag_ids: vec![seeded.tag_travel, retired], ..Default::default() };
	let mixed = videos::load_candidates(&db, &mixed).await.expect("Failed to load tagged.");

	assert!(mixed.is_empty());

	let by_name = VideoFilter { keyword: Some("retired".to_string()), ..Default::default() };
	let by_name = videos::load_candidates(&db, &by_name).await.expect("Failed to load keyword.");

	assert!(by_name.is_empty());

	let sunset = videos::fetch_video(&db, seeded.sunset)
		.await
		.expect("Failed to fetch video.")
		.expect("Video should exist.");

	assert_eq!(sunset.tag_names, vec!["Travel".to_string()]);

	let listed = tags::list_tags(&db).await.expect("Failed to list tags.");

	assert!(listed.iter().all(|tag| tag.id != retired));
	assert!(matches!(
		tags::add_video_tag(&db, seeded.beach, retired).await,
		Err(reel_storage::Error::NotFound(_))
	));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set REEL_PG_DSN to run."]
async fn video_tag_links_are_managed() {
	let Some(base_dsn) = reel_testkit::env_dsn() else {
		eprintln!("Skipping video_tag_links_are_managed; set REEL_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = connect(&test_db).await;
	let seeded = seed(&db).await;
	let listed = tags::list_tags(&db).await.expect("Failed to list tags.");

	assert_eq!(
		listed.iter().map(|tag| tag.name.as_str()).collect::<Vec<_>>(),
		vec!["Summer", "Travel"]
	);

	let attached = tags::add_video_tag(&db, seeded.sunset, seeded.tag_summer)
		.await
		.expect("Failed to attach tag.");

	assert_eq!(
		attached.iter().map(|tag| tag.id).collect::<Vec<_>>(),
		vec![seeded.tag_summer, seeded.tag_travel]
	);
	assert!(matches!(
		tags::add_video_tag(&db, seeded.sunset, seeded.tag_summer).await,
		Err(reel_storage::Error::InvalidArgument(_))
	));
	assert!(matches!(
		tags::add_video_tag(&db, 1_000_000, seeded.tag_summer).await,
		Err(reel_storage::Error::NotFound(_))
	));
	assert!(matches!(
		tags::add_video_tag(&db, seeded.sunset, 1_000_000).await,
		Err(reel_storage::Error::NotFound(_))
	));

	let remaining = tags::remove_video_tag(&db, seeded.sunset, seeded.tag_travel)
		.await
		.expect("Failed to detach tag.");

	assert_eq!(remaining.iter().map(|tag| tag.id).collect::<Vec<_>>(), vec![seeded.tag_summer]);

	let fetched =
		tags::fetch_video_tags(&db, seeded.sunset).await.expect("Failed to fetch video tags.");

	assert_eq!(fetched, remaining);
	assert!(matches!(
		tags::fetch_video_tags(&db, 1_000_000).await,
		Err(reel_storage::Error::NotFound(_))
	));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
