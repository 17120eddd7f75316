use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (document collections)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                id      TEXT PRIMARY KEY,
                body    TEXT NOT NULL CHECK (json_valid(body))
            );
            CREATE UNIQUE INDEX idx_users_email
                ON users(json_extract(body, '$.email'));

            CREATE TABLE properties (
                id      TEXT PRIMARY KEY,
                body    TEXT NOT NULL CHECK (json_valid(body))
            );
            CREATE INDEX idx_properties_agent
                ON properties(json_extract(body, '$.agentEmail'));

            CREATE TABLE advertisements (
                id      TEXT PRIMARY KEY,
                body    TEXT NOT NULL CHECK (json_valid(body))
            );

            CREATE TABLE wishlist (
                id      TEXT PRIMARY KEY,
                body    TEXT NOT NULL CHECK (json_valid(body))
            );
            CREATE INDEX idx_wishlist_user
                ON wishlist(json_extract(body, '$.user'));
            CREATE INDEX idx_wishlist_email
                ON wishlist(json_extract(body, '$.userEmail'));

            CREATE TABLE offers (
                id      TEXT PRIMARY KEY,
                body    TEXT NOT NULL CHECK (json_valid(body))
            );
            CREATE INDEX idx_offers_agent
                ON offers(json_extract(body, '$.agentEmail'));
            CREATE INDEX idx_offers_buyer
                ON offers(json_extract(body, '$.buyerEmail'));

            CREATE TABLE reviews (
                id      TEXT PRIMARY KEY,
                body    TEXT NOT NULL CHECK (json_valid(body))
            );
            CREATE INDEX idx_reviews_property
                ON reviews(json_extract(body, '$.propertyId'));
            CREATE INDEX idx_reviews_user
                ON reviews(json_extract(body, '$.userEmail'));

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
