use super::row::{CountRow, EventRow};
use crate::domain::stats::TOP_SCREENS;
use crate::domain::{CountBucket, DateRange, EventFilter, EventStats, Page, StoredEvent};
use crate::port::{EventStore, StoreError, StoreFuture};
use clickhouse::Client;
use clickhouse::query::Query;
use tracing::debug;

const TABLE: &str = "telemetry_events";

const CREATE_TABLE: &str = "
CREATE TABLE IF NOT EXISTS telemetry_events (
    id String,
    created_at DateTime64(3, 'UTC'),
    kind LowCardinality(String),
    timestamp Int64,
    screen_name Nullable(String),
    button_name Nullable(String),
    variant Nullable(String),
    render_time_ms Nullable(Float64),
    metadata String,
    message String
) ENGINE = MergeTree
ORDER BY (created_at, id)";

impl From<clickhouse::error::Error> for StoreError {
    fn from(e: clickhouse::error::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

enum Param {
    Text(String),
    Millis(i64),
}

/// `WHERE` clause assembled alongside its bind values, in placeholder order.
#[derive(Default)]
struct Conditions {
    clauses: Vec<String>,
    params: Vec<Param>,
}

impl Conditions {
    fn for_range(range: &DateRange) -> Self {
        let mut conditions = Self::default();
        if let Some(start) = range.start {
            conditions.push_bound(
                "created_at >= fromUnixTimestamp64Milli(?)",
                Param::Millis(start.timestamp_millis()),
            );
        }
        if let Some(end) = range.end {
            conditions.push_bound(
                "created_at <= fromUnixTimestamp64Milli(?)",
                Param::Millis(end.timestamp_millis()),
            );
        }
        conditions
    }

    fn for_filter(filter: &EventFilter) -> Self {
        let mut conditions = Self::for_range(&filter.range);
        if let Some(kind) = filter.kind {
            conditions.push_bound("kind = ?", Param::Text(kind.to_string()));
        }
        if let Some(screen) = &filter.screen_name {
            conditions.push_bound("screen_name = ?", Param::Text(screen.clone()));
        }
        if let Some(variant) = filter.variant {
            conditions.push_bound("variant = ?", Param::Text(variant.to_string()));
        }
        conditions
    }

    fn push_bound(&mut self, clause: &str, param: Param) {
        self.clauses.push(clause.to_string());
        self.params.push(param);
    }

    fn push(&mut self, clause: impl Into<String>) {
        self.clauses.push(clause.into());
    }

    fn sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    fn bind(self, mut query: Query) -> Query {
        for param in self.params {
            query = match param {
                Param::Text(text) => query.bind(text),
                Param::Millis(millis) => query.bind(millis),
            };
        }
        query
    }
}

/// Event store backed by a ClickHouse table. Each insert is its own
/// statement so one failing row cannot take others down with it.
pub struct ClickHouseEventStore {
    client: Client,
}

impl ClickHouseEventStore {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        self.client.query(CREATE_TABLE).execute().await?;
        Ok(())
    }

    async fn insert_row(&self, row: EventRow) -> Result<(), StoreError> {
        let mut insert = self.client.insert::<EventRow>(TABLE)?;
        insert.write(&row).await?;
        insert.end().await?;
        debug!(id = %row.id, "Inserted event row");
        Ok(())
    }

    async fn find_rows(
        &self,
        filter: EventFilter,
        page: Page,
    ) -> Result<Vec<StoredEvent>, StoreError> {
        let conditions = Conditions::for_filter(&filter);
        let sql = format!(
            "SELECT ?fields FROM {TABLE}{} ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
            conditions.sql()
        );
        let rows = conditions
            .bind(self.client.query(&sql))
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all::<EventRow>()
            .await?;
        rows.into_iter().map(StoredEvent::try_from).collect()
    }

    async fn find_one(&self, id: String) -> Result<Option<StoredEvent>, StoreError> {
        let sql = format!("SELECT ?fields FROM {TABLE} WHERE id = ? LIMIT 1");
        let rows = self
            .client
            .query(&sql)
            .bind(id)
            .fetch_all::<EventRow>()
            .await?;
        rows.into_iter().next().map(StoredEvent::try_from).transpose()
    }

    async fn collect_stats(&self, range: DateRange) -> Result<EventStats, StoreError> {
        Ok(EventStats {
            total_events: self.count_where(Conditions::for_range(&range)).await?,
            by_type: self.grouped("kind", &range, None).await?,
            by_screen: self.grouped("screen_name", &range, Some(TOP_SCREENS)).await?,
            by_variant: self.grouped("variant", &range, None).await?,
            avg_render_time: self.average_render_time(&range).await?,
        })
    }

    async fn ping_server(&self) -> Result<(), StoreError> {
        self.client
            .query("SELECT 1")
            .execute()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    async fn count_where(&self, conditions: Conditions) -> Result<u64, StoreError> {
        let sql = format!("SELECT count() FROM {TABLE}{}", conditions.sql());
        Ok(conditions
            .bind(self.client.query(&sql))
            .fetch_one::<u64>()
            .await?)
    }

    async fn grouped(
        &self,
        column: &str,
        range: &DateRange,
        limit: Option<usize>,
    ) -> Result<Vec<CountBucket>, StoreError> {
        let mut conditions = Conditions::for_range(range);
        conditions.push(format!("{column} IS NOT NULL"));
        let limit = limit.map(|n| format!(" LIMIT {n}")).unwrap_or_default();
        let sql = format!(
            "SELECT assumeNotNull({column}) AS key, count() AS count FROM {TABLE}{} \
             GROUP BY key ORDER BY count DESC, key ASC{limit}",
            conditions.sql()
        );

        let rows = conditions
            .bind(self.client.query(&sql))
            .fetch_all::<CountRow>()
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| CountBucket::new(row.key, row.count))
            .collect())
    }

    async fn average_render_time(&self, range: &DateRange) -> Result<f64, StoreError> {
        let mut conditions = Conditions::for_range(range);
        conditions.push("kind = 'RENDER_TIME'");
        let sql = format!(
            "SELECT ifNull(avgOrNull(render_time_ms), 0) FROM {TABLE}{}",
            conditions.sql()
        );
        Ok(conditions
            .bind(self.client.query(&sql))
            .fetch_one::<f64>()
            .await?)
    }
}

impl EventStore for ClickHouseEventStore {
    fn insert_one(&self, event: StoredEvent) -> StoreFuture<'_, ()> {
        Box::pin(self.insert_row(EventRow::from(event)))
    }

    fn find(&self, filter: EventFilter, page: Page) -> StoreFuture<'_, Vec<StoredEvent>> {
        Box::pin(self.find_rows(filter, page))
    }

    fn count(&self, filter: EventFilter) -> StoreFuture<'_, u64> {
        Box::pin(self.count_where(Conditions::for_filter(&filter)))
    }

    fn find_by_id(&self, id: String) -> StoreFuture<'_, Option<StoredEvent>> {
        Box::pin(self.find_one(id))
    }

    fn stats(&self, range: DateRange) -> StoreFuture<'_, EventStats> {
        Box::pin(self.collect_stats(range))
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(self.ping_server())
    }
}
