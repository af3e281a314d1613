//! Common source code fixtures for tests.

pub const SIMPLE_SELECT: &str = "SELECT 1";

pub const ANALYTICS_QUERY: &str = r#"
-- daily active users
WITH toDate(ts) AS day
SELECT
    day,
    uniq(user_id) AS users,
    avg(duration) AS avg_duration
FROM analytics.events
WHERE event_type = 'session' AND ts >= now() - INTERVAL 7 DAY
GROUP BY day
ORDER BY day DESC
LIMIT 7;
"#;

pub const EVENTS_TABLE: &str = r#"
/* Raw event stream */
CREATE TABLE IF NOT EXISTS analytics.events ON CLUSTER main
(
    id UInt64,
    ts DateTime64(3) CODEC(Delta, ZSTD(1)),
    user_id UInt32,
    event_type String DEFAULT 'unknown',
    duration Float64 MATERIALIZED 0,
    tags Array(String),
    attrs Map(String, Nullable(String)),
    point Tuple(Float64, Float64),
    items Nested(name String, price Decimal(9, 2)),
    note String NULL COMMENT 'free text'
)
ENGINE = MergeTree()
PARTITION BY toYYYYMM(ts)
ORDER BY (user_id, ts)
PRIMARY KEY user_id
SAMPLE BY user_id
TTL ts + INTERVAL 90 DAY
SETTINGS index_granularity = 8192, storage_policy = 'hot'
COMMENT 'events';
"#;

pub const INSERT_VALUES: &str = "INSERT INTO events (id, user_id) VALUES (1, 10), (2, 20)";

pub const MULTI_STATEMENT: &str = r#"
CREATE TABLE t (a UInt8) ENGINE = Memory;
INSERT INTO t VALUES (1);
SELECT a FROM t;
"#;

/// Inputs that must parse with diagnostics but never panic or hang
pub const MALFORMED: &[&str] = &[
    ")",
    "(((((",
    ")))))",
    ";;;;",
    ",,,",
    "SELECT SELECT SELECT",
    "SELECT 1 +",
    "SELECT 1 FROM (",
    "SELECT count(x FROM t",
    "SELECT [1, 2",
    "CREATE TABLE",
    "CREATE TABLE t (",
    "CREATE TABLE t (a UInt8) ENGINE =",
    "INSERT INTO",
    "INSERT INTO t VALUES (1,",
    "WITH AS SELECT",
    "SELECT 'unterminated",
    "SELECT `unterminated",
    "/* unterminated",
    "SELECT a FROM t WHERE",
    "\u{0}\u{1}\u{2}",
    "SELECT ) 1 ( FROM , WHERE ; SELECT",
];
