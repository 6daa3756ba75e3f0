use sqlx::FromRow;
use thiserror::Error;
use time::OffsetDateTime;
use treffpunkt_common::model::{Id, comment::Comment, post::Post};

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("Database had invalid entry")]
pub struct DbDataError;

#[derive(Clone, Eq, PartialEq, Debug, FromRow)]
pub struct PostRecord {
    pub id: String,
    pub author: String,
    pub content: String,
    pub timestamp: OffsetDateTime,
    pub likes: i64,
}

#[derive(Clone, Eq, PartialEq, Debug, FromRow)]
pub struct CommentRecord {
    pub id: String,
    #[sqlx(rename = "postId")]
    pub post_id: String,
    pub author: String,
    pub content: String,
    pub timestamp: OffsetDateTime,
}

impl TryFrom<PostRecord> for Post {
    type Error = DbDataError;

    fn try_from(value: PostRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Id::new(value.id).map_err(|_| DbDataError)?,
            author: value.author,
            content: value.content,
            timestamp: value.timestamp,
            likes: value.likes.try_into().map_err(|_| DbDataError)?,
        })
    }
}

impl TryFrom<CommentRecord> for Comment {
    type Error = DbDataError;

    fn try_from(value: CommentRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Id::new(value.id).map_err(|_| DbDataError)?,
            post_id: Id::new(value.post_id).map_err(|_| DbDataError)?,
            author: value.author,
            content: value.content,
            timestamp: value.timestamp,
        })
    }
}
