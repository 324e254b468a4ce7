//! # PostgreSQL store
//!
//! Maps the relational model onto the domain records. Tag sets live in
//! `TEXT[]` columns, enums as their string names. Migrations are embedded
//! and applied by [`PostgresStore::connect`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domains::{
    Favorite, FavoriteRepository, Game, GameFilter, GameRepository, RatingSummary, Review,
    ReviewRepository, User, UserRepository,
};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;
use uuid::Uuid;

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Opens a pool and brings the schema up to date.
    pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!(max_connections, "postgres store ready");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = anyhow::Error;

    fn try_from(row: UserRow) -> anyhow::Result<Self> {
        Ok(User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            role: row.role.parse()?,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct GameRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    release_date: Option<DateTime<Utc>>,
    platforms: Vec<String>,
    genres: Vec<String>,
    image_url: Option<String>,
    status: String,
    average_rating: f64,
    total_ratings: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<GameRow> for Game {
    type Error = anyhow::Error;

    fn try_from(row: GameRow) -> anyhow::Result<Self> {
        Ok(Game {
            id: row.id,
            title: row.title,
            description: row.description,
            release_date: row.release_date,
            platforms: row.platforms,
            genres: row.genres,
            image_url: row.image_url,
            status: row.status.parse()?,
            average_rating: row.average_rating,
            total_ratings: u32::try_from(row.total_ratings)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    user_id: Uuid,
    game_id: Uuid,
    text: Option<String>,
    rating: Option<i16>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = anyhow::Error;

    fn try_from(row: ReviewRow) -> anyhow::Result<Self> {
        Ok(Review {
            id: row.id,
            user_id: row.user_id,
            game_id: row.game_id,
            text: row.text,
            rating: row.rating.map(u8::try_from).transpose()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct FavoriteRow {
    id: Uuid,
    user_id: Uuid,
    game_id: Uuid,
    created_at: DateTime<Utc>,
}

impl From<FavoriteRow> for Favorite {
    fn from(row: FavoriteRow) -> Self {
        Favorite {
            id: row.id,
            user_id: row.user_id,
            game_id: row.game_id,
            created_at: row.created_at,
        }
    }
}

fn convert_all<R, T>(rows: Vec<R>) -> anyhow::Result<Vec<T>>
where
    T: TryFrom<R, Error = anyhow::Error>,
{
    rows.into_iter().map(T::try_from).collect()
}

#[async_trait]
impl UserRepository for PostgresStore {
    async fn insert(&self, user: &User) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, role, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) ON CONFLICT DO NOTHING",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_many(&self, ids: &[Uuid]) -> anyhow::Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        convert_all(rows)
    }
}

#[async_trait]
impl GameRepository for PostgresStore {
    async fn create(&self, game: &Game) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO games (id, title, description, release_date, platforms, genres, image_url, \
             status, average_rating, total_ratings, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(game.id)
        .bind(&game.title)
        .bind(&game.description)
        .bind(game.release_date)
        .bind(&game.platforms)
        .bind(&game.genres)
        .bind(&game.image_url)
        .bind(game.status.as_str())
        .bind(game.average_rating)
        .bind(i32::try_from(game.total_ratings)?)
        .bind(game.created_at)
        .bind(game.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Game>> {
        sqlx::query_as::<_, GameRow>("SELECT * FROM games WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Game::try_from)
            .transpose()
    }

    async fn find_many(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Game>> {
        let rows = sqlx::query_as::<_, GameRow>("SELECT * FROM games WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        convert_all(rows)
    }

    async fn list(&self, filter: &GameFilter) -> anyhow::Result<Vec<Game>> {
        let rows = sqlx::query_as::<_, GameRow>(
            "SELECT * FROM games \
             WHERE ($1::text IS NULL OR strpos(lower(title), lower($1)) > 0) \
               AND ($2::text IS NULL OR $2 = ANY(platforms)) \
               AND ($3::text IS NULL OR $3 = ANY(genres)) \
               AND ($4::text IS NULL OR status = $4) \
             ORDER BY release_date DESC NULLS LAST",
        )
        .bind(filter.search.as_deref())
        .bind(filter.platform.as_deref())
        .bind(filter.genre.as_deref())
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    async fn update_details(&self, game: &Game) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "UPDATE games SET title = $2, description = $3, release_date = $4, platforms = $5, \
             genres = $6, image_url = $7, status = $8, updated_at = $9 WHERE id = $1",
        )
        .bind(game.id)
        .bind(&game.title)
        .bind(&game.description)
        .bind(game.release_date)
        .bind(&game.platforms)
        .bind(&game.genres)
        .bind(&game.image_url)
        .bind(game.status.as_str())
        .bind(game.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn set_rating_summary(&self, id: Uuid, summary: RatingSummary) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "UPDATE games SET average_rating = $2, total_ratings = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(summary.average_rating)
        .bind(i32::try_from(summary.total_ratings)?)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<Game>> {
        sqlx::query_as::<_, GameRow>("DELETE FROM games WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Game::try_from)
            .transpose()
    }
}

#[async_trait]
impl ReviewRepository for PostgresStore {
    async fn create(&self, review: &Review) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO reviews (id, user_id, game_id, text, rating, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(review.id)
        .bind(review.user_id)
        .bind(review.game_id)
        .bind(&review.text)
        .bind(review.rating.map(i16::from))
        .bind(review.created_at)
        .bind(review.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Review>> {
        sqlx::query_as::<_, ReviewRow>("SELECT * FROM reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Review::try_from)
            .transpose()
    }

    async fn list_for_game(&self, game_id: Uuid) -> anyhow::Result<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            "SELECT * FROM reviews WHERE game_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    async fn ratings_for_game(&self, game_id: Uuid) -> anyhow::Result<Vec<u8>> {
        let ratings: Vec<i16> = sqlx::query_scalar(
            "SELECT rating FROM reviews WHERE game_id = $1 AND rating IS NOT NULL",
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ratings
            .into_iter()
            .map(u8::try_from)
            .collect::<Result<_, _>>()?)
    }

    async fn update(&self, review: &Review) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "UPDATE reviews SET text = $2, rating = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(review.id)
        .bind(&review.text)
        .bind(review.rating.map(i16::from))
        .bind(review.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<Review>> {
        sqlx::query_as::<_, ReviewRow>("DELETE FROM reviews WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Review::try_from)
            .transpose()
    }

    async fn delete_for_game(&self, game_id: Uuid) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM reviews WHERE game_id = $1")
            .bind(game_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl FavoriteRepository for PostgresStore {
    async fn insert(&self, favorite: &Favorite) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "INSERT INTO favorites (id, user_id, game_id, created_at) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, game_id) DO NOTHING",
        )
        .bind(favorite.id)
        .bind(favorite.user_id)
        .bind(favorite.game_id)
        .bind(favorite.created_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn list_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Favorite>> {
        let rows = sqlx::query_as::<_, FavoriteRow>(
            "SELECT * FROM favorites WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Favorite::from).collect())
    }

    async fn delete(&self, user_id: Uuid, game_id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND game_id = $2")
            .bind(user_id)
            .bind(game_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game_row(status: &str) -> GameRow {
        GameRow {
            id: Uuid::now_v7(),
            title: "Nova".into(),
            description: None,
            release_date: None,
            platforms: vec!["PC".into()],
            genres: vec![],
            image_url: None,
            status: status.into(),
            average_rating: 3.5,
            total_ratings: 2,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn game_row_maps_to_domain() {
        let game = Game::try_from(game_row("Released")).unwrap();
        assert_eq!(game.status, domains::GameStatus::Released);
        assert_eq!(game.total_ratings, 2);
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(Game::try_from(game_row("Cancelled")).is_err());
    }
}
