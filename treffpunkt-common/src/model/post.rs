use crate::model::Id;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize, Deserialize)]
pub struct Post {
    pub id: Id<PostMarker>,
    pub author: String,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub likes: u64,
}

/// Client input for post creation. Timestamp and likes are assigned by
/// the store.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize, Deserialize)]
pub struct CreatePost {
    pub id: Id<PostMarker>,
    pub author: String,
    pub content: String,
}
