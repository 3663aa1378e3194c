use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::User;

impl User {
    /// Find a user by (lowercased) email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, referral_code, referred_by, referrals, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    /// Find the owner of a referral code.
    pub async fn find_by_referral_code(
        db: &PgPool,
        code: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, referral_code, referred_by, referrals, created_at
            FROM users
            WHERE referral_code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(db)
        .await
    }

    /// Insert a new user. When `referred_by` is set, the referrer's counter is
    /// bumped with an in-database increment inside the same transaction, so
    /// concurrent registrations citing one code never lose updates.
    pub async fn create(
        db: &PgPool,
        username: &str,
        email: &str,
        password_hash: &str,
        referral_code: &str,
        referred_by: Option<Uuid>,
    ) -> Result<User, sqlx::Error> {
        let mut tx = db.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, referral_code, referred_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, email, password_hash, referral_code, referred_by, referrals, created_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(referral_code)
        .bind(referred_by)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(referrer_id) = referred_by {
            sqlx::query("UPDATE users SET referrals = referrals + 1 WHERE id = $1")
                .bind(referrer_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(user)
    }

    /// Replace the stored password hash.
    pub async fn update_password_hash(
        db: &PgPool,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Users referred by the given user, oldest first.
    pub async fn list_referred_by(
        db: &PgPool,
        referrer_id: Uuid,
    ) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, referral_code, referred_by, referrals, created_at
            FROM users
            WHERE referred_by = $1
            ORDER BY created_at
            "#,
        )
        .bind(referrer_id)
        .fetch_all(db)
        .await
    }
}
