use anyhow::Result;
use rusqlite::Connection;

/// Creates the two lead collections and the staff account table. The two
/// lead tables do not share a schema: `leads` carries campaign attribution
/// and an `updated_at` column, `hire_helper_leads` carries the intake-form
/// `message` and `specific_requirements` free text.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS leads (
            id TEXT PRIMARY KEY,
            created_at TEXT NOT NULL,
            updated_at TEXT,
            name TEXT NOT NULL,
            phone TEXT,
            email TEXT,
            city TEXT,
            source TEXT,
            campaign TEXT,
            service TEXT,
            status TEXT,
            assigned_to TEXT,
            notes TEXT,
            last_contacted_at TEXT,
            next_followup_at TEXT,
            priority TEXT,
            score INTEGER
        );

        CREATE TABLE IF NOT EXISTS hire_helper_leads (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            created_at TEXT NOT NULL,
            name TEXT NOT NULL,
            phone TEXT,
            email TEXT,
            city TEXT,
            source TEXT,
            service TEXT,
            status TEXT,
            message TEXT,
            specific_requirements TEXT,
            assigned_to TEXT,
            notes TEXT,
            last_contacted_at TEXT,
            next_followup_at TEXT,
            priority TEXT,
            score INTEGER
        );

        CREATE TABLE IF NOT EXISTS staff_users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            password_hash BLOB NOT NULL,
            salt BLOB NOT NULL,
            role TEXT NOT NULL DEFAULT 'staff',
            email_confirmed INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_leads_created_at ON leads(created_at);
        CREATE INDEX IF NOT EXISTS idx_hire_helper_leads_created_at
            ON hire_helper_leads(created_at);
        ",
    )?;

    Ok(())
}
