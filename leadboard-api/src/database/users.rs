use crate::database::AsyncDbConnection;
use anyhow::Result;
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

#[derive(Debug, Clone)]
pub struct StaffUser {
    pub id: String,
    pub email: String,
    pub role: String,
    pub email_confirmed: bool,
    pub created_at: DateTime<Utc>,
}

/// Salted SHA-256; the raw password is never stored.
pub fn hash_password(salt: &[u8], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    let out = hasher.finalize();
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&out);
    arr
}

/// Trim + lowercase, minimal sanity check.
fn normalize_email(email: &str) -> Result<String> {
    let e = email.trim().to_lowercase();
    if e.is_empty() || !e.contains('@') || e.starts_with('@') || e.ends_with('@') {
        return Err(anyhow::anyhow!("invalid email"));
    }
    Ok(e)
}

/// Provisions a login-capable staff account. Admin-created accounts are
/// auto-confirmed.
pub async fn create_user(
    conn: AsyncDbConnection,
    email: &str,
    password: &str,
    role: &str,
) -> Result<StaffUser> {
    let email = normalize_email(email)?;
    if password.is_empty() {
        return Err(anyhow::anyhow!("password must not be empty"));
    }

    let conn = conn.lock().await;

    let existing: Result<String, _> = conn.query_row(
        "SELECT id FROM staff_users WHERE email = ?1 LIMIT 1",
        [&email],
        |row| row.get(0),
    );
    if existing.is_ok() {
        return Err(anyhow::anyhow!("User with email {} already exists", email));
    }

    let id = uuid::Uuid::new_v4().to_string();
    let created_at = Utc::now();
    let mut salt = [0u8; 16];
    OsRng.fill_bytes(&mut salt);
    let password_hash = hash_password(&salt, password);

    conn.execute(
        "INSERT INTO staff_users (id, email, password_hash, salt, role, email_confirmed, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)",
        rusqlite::params![
            id,
            email,
            password_hash.as_slice(),
            salt.as_slice(),
            role,
            created_at.to_rfc3339(),
        ],
    )?;

    Ok(StaffUser {
        id,
        email,
        role: role.to_string(),
        email_confirmed: true,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    #[test]
    fn password_hash_is_salted() {
        let a = hash_password(b"salt-a", "secret");
        let b = hash_password(b"salt-b", "secret");
        assert_ne!(a, b);
        assert_eq!(a, hash_password(b"salt-a", "secret"));
    }

    #[tokio::test]
    async fn create_user_rejects_duplicates() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = Database::new(&dir.path().join("users.sqlite3")).expect("open db");

        let user = create_user(db.async_connection.clone(), "Staff@Example.com", "pw", "admin")
            .await
            .expect("create user");
        assert_eq!(user.email, "staff@example.com");
        assert!(user.email_confirmed);

        let dup = create_user(db.async_connection.clone(), "staff@example.com", "pw2", "staff").await;
        assert!(dup.is_err());
    }

    #[tokio::test]
    async fn create_user_rejects_bad_input() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = Database::new(&dir.path().join("users.sqlite3")).expect("open db");

        assert!(create_user(db.async_connection.clone(), "not-an-email", "pw", "staff")
            .await
            .is_err());
        assert!(create_user(db.async_connection.clone(), "ok@example.com", "", "staff")
            .await
            .is_err());
    }
}
