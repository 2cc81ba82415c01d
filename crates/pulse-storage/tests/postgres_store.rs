// Runs against a live database only when PULSE_TEST_DATABASE_URL is set.

use chrono::NaiveDate;
use pulse_core::DailyMetric;
use pulse_storage::{MetricStore, PgMetricStore};
use rust_decimal::Decimal;
use uuid::Uuid;

async fn connect() -> Option<PgMetricStore> {
    let url = std::env::var("PULSE_TEST_DATABASE_URL").ok()?;
    Some(PgMetricStore::connect(&url).await.expect("connect to test database"))
}

fn metric(subreddit: &str, posts: i32, politicians: &[&str]) -> DailyMetric {
    DailyMetric {
        snapshot_date: NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
        subreddit: subreddit.to_string(),
        left_score: Decimal::new(4200, 4),
        right_score: Decimal::new(5800, 4),
        posts_count: posts,
        vibe: "Tense".to_string(),
        trending_politicians: politicians.iter().map(|s| s.to_string()).collect(),
    }
}

#[tokio::test]
async fn upsert_round_trip_and_rollback() {
    let Some(mut store) = connect().await else {
        eprintln!("PULSE_TEST_DATABASE_URL not set; skipping");
        return;
    };
    let subreddit = format!("pulse-test-{}", Uuid::new_v4());

    store.begin().await.unwrap();
    store.ensure_schema().await.unwrap();
    store.ensure_schema().await.unwrap();
    store.upsert_metric(&metric(&subreddit, 12, &["A", "B"])).await.unwrap();
    store.commit().await.unwrap();

    store.begin().await.unwrap();
    store.upsert_metric(&metric(&subreddit, 13, &[])).await.unwrap();
    let rows = store.fetch_all_metrics().await.unwrap();
    let mine = rows.iter().filter(|r| r.subreddit == subreddit).collect::<Vec<_>>();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].posts_count, 13);
    assert_eq!(mine[0].left_score, Decimal::new(4200, 4));
    store.rollback().await.unwrap();

    store.begin().await.unwrap();
    let rows = store.fetch_all_metrics().await.unwrap();
    let mine = rows.iter().find(|r| r.subreddit == subreddit).unwrap();
    assert_eq!(mine.posts_count, 12);
    assert_eq!(
        mine.trending_politicians.as_deref(),
        Some(&["A".to_string(), "B".to_string()][..])
    );
    assert!(mine.updated_at >= mine.created_at);
    store.rollback().await.unwrap();

    store.close().await;

    let url = std::env::var("PULSE_TEST_DATABASE_URL").unwrap();
    let pool = sqlx::PgPool::connect(&url).await.unwrap();
    sqlx::query("DELETE FROM public.daily_subreddit_metrics WHERE subreddit = $1")
        .bind(&subreddit)
        .execute(&pool)
        .await
        .unwrap();
    pool.close().await;
}
