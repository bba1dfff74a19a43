use sqlx::PgPool;

use crate::models::{Account, AccountChanges};

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(
        "SELECT id, title, price_usd, price_dz, coins, gems, images, status, views, created_at
         FROM accounts
         ORDER BY id DESC"
    )
    .fetch_all(pool)
    .await
}

pub async fn fetch_one(pool: &PgPool, id: i64) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(
        "SELECT id, title, price_usd, price_dz, coins, gems, images, status, views, created_at
         FROM accounts
         WHERE id = $1"
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Single-statement increment so concurrent readers never lose a view.
pub async fn increment_views(pool: &PgPool, id: i64) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(
        "UPDATE accounts
         SET views = views + 1
         WHERE id = $1
         RETURNING id, title, price_usd, price_dz, coins, gems, images, status, views, created_at"
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn max_id(pool: &PgPool) -> Result<Option<i64>, sqlx::Error> {
    let max: Option<i64> = sqlx::query_scalar("SELECT MAX(id) FROM accounts")
        .fetch_one(pool)
        .await?;
    Ok(max)
}

pub async fn insert(pool: &PgPool, account: &Account) -> Result<Account, sqlx::Error> {
    sqlx::query_as::<_, Account>(
        "INSERT INTO accounts (id, title, price_usd, price_dz, coins, gems, images, status, views, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
         RETURNING id, title, price_usd, price_dz, coins, gems, images, status, views, created_at"
    )
    .bind(account.id)
    .bind(&account.title)
    .bind(&account.price_usd)
    .bind(&account.price_dz)
    .bind(&account.coins)
    .bind(&account.gems)
    .bind(&account.images)
    .bind(account.status)
    .bind(account.views)
    .bind(account.created_at)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    changes: &AccountChanges,
) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(
        "UPDATE accounts
         SET title = COALESCE($2, title),
             price_usd = COALESCE($3, price_usd),
             price_dz = COALESCE($4, price_dz),
             coins = COALESCE($5, coins),
             gems = COALESCE($6, gems),
             images = COALESCE($7, images)
         WHERE id = $1
         RETURNING id, title, price_usd, price_dz, coins, gems, images, status, views, created_at"
    )
    .bind(id)
    .bind(&changes.title)
    .bind(&changes.price_usd)
    .bind(&changes.price_dz)
    .bind(&changes.coins)
    .bind(&changes.gems)
    .bind(&changes.images)
    .fetch_optional(pool)
    .await
}

pub async fn toggle_status(pool: &PgPool, id: i64) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(
        "UPDATE accounts
         SET status = CASE status WHEN 'Available' THEN 'Sold' ELSE 'Available' END
         WHERE id = $1
         RETURNING id, title, price_usd, price_dz, coins, gems, images, status, views, created_at"
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
