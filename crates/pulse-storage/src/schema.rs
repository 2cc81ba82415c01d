//! DDL and statements for `daily_subreddit_metrics`.

pub const SCHEMA_NAME: &str = "public";
pub const TABLE_NAME: &str = "daily_subreddit_metrics";

/// Every statement is guarded by `IF NOT EXISTS`, so re-running is a no-op.
pub const ENSURE_SCHEMA_STATEMENTS: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS public.daily_subreddit_metrics (
        id                   BIGSERIAL PRIMARY KEY,
        snapshot_date        DATE NOT NULL,
        subreddit            TEXT NOT NULL,
        left_score           NUMERIC(5,4) NOT NULL,
        right_score          NUMERIC(5,4) NOT NULL,
        posts_count          INTEGER NOT NULL DEFAULT 0,
        vibe                 TEXT NOT NULL DEFAULT 'Unknown',
        trending_politicians JSONB DEFAULT '[]'::jsonb,
        created_at           TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at           TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT daily_subreddit_metrics_snapshot_subreddit_key
            UNIQUE (snapshot_date, subreddit)
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_daily_subreddit_metrics_snapshot_date
        ON public.daily_subreddit_metrics (snapshot_date DESC)
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_daily_subreddit_metrics_subreddit
        ON public.daily_subreddit_metrics (subreddit)
    "#,
];

/// `id` and `created_at` are left alone on conflict.
pub const UPSERT_METRIC: &str = r#"
    INSERT INTO public.daily_subreddit_metrics
        (snapshot_date, subreddit, left_score, right_score, posts_count, vibe, trending_politicians)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
    ON CONFLICT (snapshot_date, subreddit) DO UPDATE
       SET left_score           = EXCLUDED.left_score,
           right_score          = EXCLUDED.right_score,
           posts_count          = EXCLUDED.posts_count,
           vibe                 = EXCLUDED.vibe,
           trending_politicians = EXCLUDED.trending_politicians,
           updated_at           = NOW()
"#;

pub const SELECT_ALL_METRICS: &str = r#"
    SELECT id,
           snapshot_date,
           subreddit,
           left_score,
           right_score,
           posts_count,
           vibe,
           trending_politicians,
           created_at,
           updated_at
      FROM public.daily_subreddit_metrics
     ORDER BY subreddit ASC, snapshot_date ASC
"#;
