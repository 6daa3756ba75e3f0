use crate::model::Id;
use crate::model::post::PostMarker;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct CommentMarker;

/// A comment belongs to exactly one post. The owning post id is bound
/// from the request path at creation, not from the body.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize, Deserialize)]
pub struct Comment {
    pub id: Id<CommentMarker>,
    #[serde(rename = "postId")]
    pub post_id: Id<PostMarker>,
    pub author: String,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize, Deserialize)]
pub struct CreateComment {
    pub id: Id<CommentMarker>,
    pub author: String,
    pub content: String,
}
