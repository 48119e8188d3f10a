/// Database layer for TaskHive
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool management with health checks
/// - Models are in the `models` module at crate root level
///
/// # Example
///
/// ```no_run
/// use taskhive_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// };
///
/// let pool = create_pool(config).await?;
/// # Ok(())
/// # }
/// ```

pub mod pool;
