use crate::record::{CommentRecord, DbDataError, PostRecord};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::query_as;
use std::str::FromStr;
use thiserror::Error;
use time::OffsetDateTime;
use treffpunkt_common::model::Id;
use treffpunkt_common::model::comment::{Comment, CreateComment};
use treffpunkt_common::model::post::{CreatePost, Post, PostMarker};

pub type Result<T, E = DbError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("A record with id {0:?} already exists")]
    Conflict(String),
    #[error("Post with id {0} does not exist")]
    MissingPost(Id<PostMarker>),
    #[error("An object in the database was invalid: {0}")]
    Data(#[from] DbDataError),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS posts (
    id TEXT PRIMARY KEY,
    author TEXT NOT NULL,
    content TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    likes INTEGER NOT NULL DEFAULT 0
);
CREATE TABLE IF NOT EXISTS comments (
    id TEXT PRIMARY KEY,
    postId TEXT NOT NULL REFERENCES posts(id),
    author TEXT NOT NULL,
    content TEXT NOT NULL,
    timestamp TEXT NOT NULL
);
";

#[derive(Debug)]
pub struct DbClient {
    pool: SqlitePool,
}

impl DbClient {
    /// Opens the database, enables foreign keys and applies the schema.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // One connection: sqlite serializes writers anyway, and an
        // in-memory database exists per connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        sqlx::raw_sql(SCHEMA).execute(&pool).await?;

        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        let records = query_as::<_, PostRecord>(
            "
            SELECT id, author, content, timestamp, likes
            FROM posts
            ORDER BY timestamp DESC, id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        let posts = records
            .into_iter()
            .map(Post::try_from)
            .collect::<Result<_, _>>()?;
        Ok(posts)
    }

    /// Inserts with a store-assigned timestamp and `likes = 0`, and
    /// returns the stored row. A duplicate id is a [`DbError::Conflict`]
    /// and leaves the existing row untouched.
    pub async fn insert_post(&self, post: &CreatePost) -> Result<Post> {
        let timestamp = OffsetDateTime::now_utc();

        let record = query_as::<_, PostRecord>(
            "
            INSERT INTO posts (id, author, content, timestamp, likes)
            VALUES (?1, ?2, ?3, ?4, 0)
            RETURNING id, author, content, timestamp, likes
            ",
        )
        .bind(post.id.get())
        .bind(&post.author)
        .bind(&post.content)
        .bind(timestamp)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DbError::Conflict(post.id.get().to_owned())
            }
            other => DbError::Sqlx(other),
        })?;

        Ok(record.try_into()?)
    }

    pub async fn fetch_post(&self, post_id: &Id<PostMarker>) -> Result<Option<Post>> {
        let record = query_as::<_, PostRecord>(
            "
            SELECT id, author, content, timestamp, likes
            FROM posts
            WHERE id = ?1
            ",
        )
        .bind(post_id.get())
        .fetch_optional(&self.pool)
        .await?;

        let post = record.map(Post::try_from).transpose()?;
        Ok(post)
    }

    /// Single-statement increment, so concurrent callers never lose an
    /// update. `None` when the post does not exist.
    pub async fn increment_likes(&self, post_id: &Id<PostMarker>) -> Result<Option<Post>> {
        let record = query_as::<_, PostRecord>(
            "
            UPDATE posts
            SET likes = likes + 1
            WHERE id = ?1
            RETURNING id, author, content, timestamp, likes
            ",
        )
        .bind(post_id.get())
        .fetch_optional(&self.pool)
        .await?;

        let post = record.map(Post::try_from).transpose()?;
        Ok(post)
    }

    /// Comments of one post, oldest first. An absent post yields an
    /// empty list, callers that need the distinction fetch the post
    /// first.
    pub async fn list_comments(&self, post_id: &Id<PostMarker>) -> Result<Vec<Comment>> {
        let records = query_as::<_, CommentRecord>(
            "
            SELECT id, postId, author, content, timestamp
            FROM comments
            WHERE postId = ?1
            ORDER BY timestamp ASC, id ASC
            ",
        )
        .bind(post_id.get())
        .fetch_all(&self.pool)
        .await?;

        let comments = records
            .into_iter()
            .map(Comment::try_from)
            .collect::<Result<_, _>>()?;
        Ok(comments)
    }

    /// Referential integrity is strict: a comment for a missing post is
    /// a [`DbError::MissingPost`], enforced through the foreign key.
    pub async fn insert_comment(
        &self,
        post_id: &Id<PostMarker>,
        comment: &CreateComment,
    ) -> Result<Comment> {
        let timestamp = OffsetDateTime::now_utc();

        let record = query_as::<_, CommentRecord>(
            "
            INSERT INTO comments (id, postId, author, content, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, postId, author, content, timestamp
            ",
        )
        .bind(comment.id.get())
        .bind(post_id.get())
        .bind(&comment.author)
        .bind(&comment.content)
        .bind(timestamp)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DbError::Conflict(comment.id.get().to_owned())
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                DbError::MissingPost(post_id.clone())
            }
            other => DbError::Sqlx(other),
        })?;

        Ok(record.try_into()?)
    }
}
