use sqlx::{PgPool, Postgres, Transaction};

use crate::models::{Settings, SettingsChanges};

// The settings table holds at most one row, pinned to id = 1 by a CHECK constraint.
const SETTINGS_COLUMNS: &str =
    "support_link, mediation_link, sell_account_link, buy_now_link, announcement, logo_url, usd_rate, updated_at";

pub async fn fetch(pool: &PgPool) -> Result<Option<Settings>, sqlx::Error> {
    sqlx::query_as::<_, Settings>(&format!(
        "SELECT {} FROM settings WHERE id = 1",
        SETTINGS_COLUMNS
    ))
    .fetch_optional(pool)
    .await
}

async fn insert_if_absent(
    tx: &mut Transaction<'_, Postgres>,
    defaults: &Settings,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO settings (id, support_link, mediation_link, sell_account_link, buy_now_link,
                               announcement, logo_url, usd_rate, updated_at)
         VALUES (1, $1, $2, $3, $4, $5, $6, $7, NOW())
         ON CONFLICT (id) DO NOTHING"
    )
    .bind(&defaults.support_link)
    .bind(&defaults.mediation_link)
    .bind(&defaults.sell_account_link)
    .bind(&defaults.buy_now_link)
    .bind(&defaults.announcement)
    .bind(&defaults.logo_url)
    .bind(defaults.usd_rate)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Idempotent: inserts the defaults only when no settings row exists.
pub async fn ensure(pool: &PgPool, defaults: &Settings) -> Result<Settings, sqlx::Error> {
    let mut tx = pool.begin().await?;
    insert_if_absent(&mut tx, defaults).await?;
    let settings = sqlx::query_as::<_, Settings>(&format!(
        "SELECT {} FROM settings WHERE id = 1",
        SETTINGS_COLUMNS
    ))
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(settings)
}

pub async fn upsert(
    pool: &PgPool,
    defaults: &Settings,
    changes: &SettingsChanges,
) -> Result<Settings, sqlx::Error> {
    let mut tx = pool.begin().await?;
    insert_if_absent(&mut tx, defaults).await?;
    let settings = sqlx::query_as::<_, Settings>(&format!(
        "UPDATE settings
         SET support_link = COALESCE($1, support_link),
             mediation_link = COALESCE($2, mediation_link),
             sell_account_link = COALESCE($3, sell_account_link),
             buy_now_link = COALESCE($4, buy_now_link),
             announcement = COALESCE($5, announcement),
             logo_url = COALESCE($6, logo_url),
             usd_rate = COALESCE($7, usd_rate),
             updated_at = NOW()
         WHERE id = 1
         RETURNING {}",
        SETTINGS_COLUMNS
    ))
    .bind(&changes.support_link)
    .bind(&changes.mediation_link)
    .bind(&changes.sell_account_link)
    .bind(&changes.buy_now_link)
    .bind(&changes.announcement)
    .bind(&changes.logo_url)
    .bind(changes.usd_rate)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(settings)
}
