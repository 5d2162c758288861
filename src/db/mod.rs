pub mod artists;
pub mod outbox;
pub mod projects;
pub mod users;

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection, DbErr};

/// Connect to `database_url` and bring the schema up to date.
pub async fn create_pool(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}
