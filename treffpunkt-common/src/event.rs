use crate::model::{
    Id,
    comment::Comment,
    post::{Post, PostMarker},
};
use serde::{Deserialize, Serialize};

/// The closed set of push events fanned out to subscribers after a
/// committed mutation. Wire shape is `{"event": <tag>, "data": <payload>}`.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ForumEvent {
    #[serde(rename = "post-created")]
    PostCreated(Post),
    #[serde(rename = "post-updated")]
    PostUpdated(Post),
    #[serde(rename = "comment-created")]
    CommentCreated {
        #[serde(rename = "postId")]
        post_id: Id<PostMarker>,
        comment: Comment,
    },
}

impl ForumEvent {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ForumEvent::PostCreated(_) => "post-created",
            ForumEvent::PostUpdated(_) => "post-updated",
            ForumEvent::CommentCreated { .. } => "comment-created",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::comment::CommentMarker;
    use time::macros::datetime;

    fn post() -> Post {
        Post {
            id: Id::new("p1".to_owned()).unwrap(),
            author: "Alice".to_owned(),
            content: "hi".to_owned(),
            timestamp: datetime!(2026-01-02 03:04:05 UTC),
            likes: 0,
        }
    }

    fn comment() -> Comment {
        Comment {
            id: Id::new("c1".to_owned()).unwrap(),
            post_id: Id::new("p1".to_owned()).unwrap(),
            author: String::new(),
            content: "hello".to_owned(),
            timestamp: datetime!(2026-01-02 03:05:00 UTC),
        }
    }

    #[test]
    fn post_created_wire_shape() {
        let json = serde_json::to_value(ForumEvent::PostCreated(post())).unwrap();

        assert_eq!(json["event"], "post-created");
        assert_eq!(json["data"]["id"], "p1");
        assert_eq!(json["data"]["likes"], 0);
        assert_eq!(json["data"]["timestamp"], "2026-01-02T03:04:05Z");
    }

    #[test]
    fn comment_created_wire_shape() {
        let event = ForumEvent::CommentCreated {
            post_id: Id::new("p1".to_owned()).unwrap(),
            comment: comment(),
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event"], "comment-created");
        assert_eq!(json["data"]["postId"], "p1");
        assert_eq!(json["data"]["comment"]["id"], "c1");
        assert_eq!(json["data"]["comment"]["postId"], "p1");
    }

    #[test]
    fn round_trips_through_wire_shape() {
        let event = ForumEvent::PostUpdated(post());
        let json = serde_json::to_string(&event).unwrap();
        let parsed: ForumEvent = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, event);
        assert_eq!(parsed.name(), "post-updated");
    }

    #[test]
    fn parses_raw_wire_payload() {
        let raw = r#"{
            "event": "comment-created",
            "data": {
                "postId": "p1",
                "comment": {
                    "id": "c1",
                    "postId": "p1",
                    "author": "",
                    "content": "hello",
                    "timestamp": "2026-01-02T03:05:00Z"
                }
            }
        }"#;

        let event: ForumEvent = serde_json::from_str(raw).unwrap();

        let ForumEvent::CommentCreated { post_id, comment } = event else {
            panic!("wrong variant");
        };
        assert_eq!(post_id.get(), "p1");
        let comment_id: &Id<CommentMarker> = &comment.id;
        assert_eq!(comment_id.get(), "c1");
    }
}
