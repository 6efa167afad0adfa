use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Pool, Sqlite};

/// Creates the database file if needed, connects a pool and makes sure the
/// tables exist.
pub async fn connect(database_url: &str) -> Result<Pool<Sqlite>, sqlx::Error> {
    // Check if the database exists, if not, create it
    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        tracing::info!(url = database_url, "creating database");
        Sqlite::create_database(database_url).await?;
    } else {
        tracing::debug!(url = database_url, "database already exists");
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    tracing::info!("connection to the database is successful");

    init_schema(&pool).await?;
    Ok(pool)
}

pub async fn init_schema(pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username VARCHAR(150) NOT NULL UNIQUE,
        password VARCHAR(150) NOT NULL,
        date_created DATETIME NOT NULL
    );"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS todos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title VARCHAR(200) NOT NULL,
        "desc" VARCHAR(500) NOT NULL,
        date_created DATETIME NOT NULL,
        owner_id INTEGER NOT NULL REFERENCES users(id)
    );"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS sessions (
        token TEXT PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES users(id),
        date_created DATETIME NOT NULL
    );"#,
    )
    .execute(pool)
    .await?;

    tracing::debug!("schema ready");
    Ok(())
}
