//! Apply pending migrations.

use nicelab_core::config::AppConfig;
use nicelab_core::error::AppError;
use nicelab_database::DatabasePool;

/// Execute the migrate command
pub async fn execute(config: AppConfig) -> Result<(), AppError> {
    let db = DatabasePool::connect(&config.database).await?;
    let result = nicelab_database::migration::run_migrations(db.pool()).await;
    db.close().await;
    result?;

    println!("All migrations applied successfully.");
    Ok(())
}
