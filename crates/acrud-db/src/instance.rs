use tokio::sync::OnceCell;
use tracing::debug;

use acrud_core::{Result, Row, Schema, ValidationResult};

use crate::callbacks::{CallbackRegistry, FieldHook, TableHook};
use crate::catalog;
use crate::db_err;
use crate::engine::Engine;
use crate::executor::Pool;
use crate::save::{SaveOutcome, save_row};
use crate::validator::validate_row;

/// One logical database connection.
///
/// Owns the driver pool, the memoized normalized schema, and the callback
/// registry. The schema is built once on first use — concurrent first callers
/// share a single catalog fetch — and stays immutable until an explicit
/// [`refresh_schema`](Instance::refresh_schema).
pub struct Instance {
    engine: Engine,
    pool: Pool,
    schema: OnceCell<Schema>,
    callbacks: CallbackRegistry,
}

impl Instance {
    /// Connect to the database named by a connection URL.
    ///
    /// The URL scheme selects the engine; anything but `mysql` or `sqlite`
    /// fails with `UnsupportedDriver`.
    pub async fn connect(url: &str) -> Result<Instance> {
        let engine = Engine::from_url(url)?;
        let pool = match engine {
            Engine::MySql => {
                Pool::MySql(sqlx::MySqlPool::connect(url).await.map_err(db_err)?)
            }
            Engine::Sqlite => {
                Pool::Sqlite(sqlx::SqlitePool::connect(url).await.map_err(db_err)?)
            }
        };
        Ok(Instance::new(pool))
    }

    /// Wrap a pre-configured pool.
    pub fn new(pool: Pool) -> Instance {
        let engine = match &pool {
            Pool::MySql(_) => Engine::MySql,
            Pool::Sqlite(_) => Engine::Sqlite,
        };
        Instance {
            engine,
            pool,
            schema: OnceCell::new(),
            callbacks: CallbackRegistry::new(),
        }
    }

    pub fn engine(&self) -> Engine {
        self.engine
    }

    /// The normalized schema, built from the catalog on first call and cached
    /// for the lifetime of the instance.
    pub async fn schema(&self) -> Result<&Schema> {
        self.schema
            .get_or_try_init(|| build_schema(self.engine, &self.pool))
            .await
    }

    /// Discard the cached schema and rebuild it from the catalog.
    pub async fn refresh_schema(&mut self) -> Result<()> {
        let schema = build_schema(self.engine, &self.pool).await?;
        self.schema = OnceCell::new_with(Some(schema));
        Ok(())
    }

    /// Names of user tables in the target database.
    pub async fn tables(&self) -> Result<Vec<String>> {
        catalog::reader(&self.pool).list_tables().await
    }

    /// Validate a candidate row against the cached schema.
    pub async fn validate(&self, table: &str, data: &Row) -> Result<ValidationResult> {
        let schema = self.schema().await?;
        validate_row(&self.pool, self.engine, schema, &self.callbacks, table, data).await
    }

    /// Insert or update a row. Assumes the data has been validated.
    pub async fn save(&self, table: &str, data: &Row) -> Result<SaveOutcome> {
        let schema = self.schema().await?;
        save_row(&self.pool, self.engine, schema, table, data).await
    }

    /// Register a field-level hook under `"table.column"`.
    pub fn on_field(&mut self, key: impl Into<String>, hook: impl FieldHook + 'static) -> &mut Self {
        self.callbacks.register_field(key, hook);
        self
    }

    /// Register a table-level hook under the bare table name.
    pub fn on_table(&mut self, key: impl Into<String>, hook: impl TableHook + 'static) -> &mut Self {
        self.callbacks.register_table(key, hook);
        self
    }
}

async fn build_schema(engine: Engine, pool: &Pool) -> Result<Schema> {
    let reader = catalog::reader(pool);
    let columns = reader.read_columns().await?;
    let foreign_keys = reader.read_foreign_keys().await?;
    let schema = crate::normalize::normalize(engine, columns, foreign_keys)?;
    debug!(
        engine = engine.as_str(),
        tables = schema.tables.len(),
        "schema normalized"
    );
    Ok(schema)
}
