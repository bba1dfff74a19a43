use sqlx::PgPool;

use crate::models::{Faq, FaqContent};

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<Faq>, sqlx::Error> {
    sqlx::query_as::<_, Faq>(
        "SELECT id, question, answer, created_at
         FROM faqs
         ORDER BY id ASC"
    )
    .fetch_all(pool)
    .await
}

pub async fn insert(pool: &PgPool, input: FaqContent) -> Result<Faq, sqlx::Error> {
    sqlx::query_as::<_, Faq>(
        "INSERT INTO faqs (question, answer)
         VALUES ($1, $2)
         RETURNING id, question, answer, created_at"
    )
    .bind(input.question)
    .bind(input.answer)
    .fetch_one(pool)
    .await
}

pub async fn update(pool: &PgPool, id: i64, content: &FaqContent) -> Result<Option<Faq>, sqlx::Error> {
    sqlx::query_as::<_, Faq>(
        "UPDATE faqs
         SET question = $2,
             answer = $3
         WHERE id = $1
         RETURNING id, question, answer, created_at"
    )
    .bind(id)
    .bind(&content.question)
    .bind(&content.answer)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM faqs WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
