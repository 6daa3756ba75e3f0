//! Client-side view reconciliation.
//!
//! A client has two update sources: snapshots fetched over the request
//! API and events arriving over the push channel. `ClientView` merges
//! both into one local state. Merges are idempotent, so an event that
//! arrives twice (the creator sees its own mutation as the call result
//! and again via broadcast) never duplicates a record.

use crate::event::ForumEvent;
use crate::model::{
    Id,
    comment::Comment,
    post::{Post, PostMarker},
};

#[derive(Clone, Debug, Default)]
pub struct ClientView {
    posts: Vec<Post>,
    selection: Option<Selection>,
}

#[derive(Clone, Debug)]
struct Selection {
    post_id: Id<PostMarker>,
    comments: Vec<Comment>,
}

impl ClientView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    #[must_use]
    pub fn selected_post_id(&self) -> Option<&Id<PostMarker>> {
        self.selection.as_ref().map(|selection| &selection.post_id)
    }

    /// Comments of the selected post, `None` while unselected.
    #[must_use]
    pub fn comments(&self) -> Option<&[Comment]> {
        self.selection
            .as_ref()
            .map(|selection| selection.comments.as_slice())
    }

    /// Full snapshot overwrite of the post list, last fetch wins.
    pub fn replace_posts(&mut self, posts: Vec<Post>) {
        self.posts = posts;
    }

    /// Enter `Selected` with a freshly fetched comment snapshot. The
    /// previous comment list is discarded, not merged.
    pub fn select(&mut self, post_id: Id<PostMarker>, comments: Vec<Comment>) {
        self.selection = Some(Selection { post_id, comments });
    }

    pub fn deselect(&mut self) {
        self.selection = None;
    }

    /// Merge one push event. Safe under at-least-twice delivery.
    pub fn apply(&mut self, event: &ForumEvent) {
        match event {
            ForumEvent::PostCreated(post) => {
                if !self.posts.iter().any(|existing| existing.id == post.id) {
                    self.posts.insert(0, post.clone());
                }
            }
            ForumEvent::PostUpdated(post) => {
                if let Some(existing) = self
                    .posts
                    .iter_mut()
                    .find(|existing| existing.id == post.id)
                {
                    *existing = post.clone();
                }
            }
            ForumEvent::CommentCreated { post_id, comment } => {
                if let Some(selection) = &mut self.selection
                    && selection.post_id == *post_id
                    && !selection
                        .comments
                        .iter()
                        .any(|existing| existing.id == comment.id)
                {
                    selection.comments.push(comment.clone());
                }
            }
        }
    }
}
