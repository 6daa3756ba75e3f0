use crate::server::{Result, ServerError, ServerRouter, ServerState, json::Json};
use axum::{Router, extract::State};
use axum_extra::routing::{RouterExt, TypedPath};
use serde::Deserialize;
use std::sync::Arc;
use treffpunkt_common::event::ForumEvent;
use treffpunkt_common::model::{
    Id,
    comment::{Comment, CreateComment},
    post::PostMarker,
};
use treffpunkt_db::client::DbClient;

pub fn routes() -> ServerRouter {
    Router::new()
        .typed_get(list_comments)
        .typed_post(create_comment)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/api/posts/{post_id}/comments", rejection(ServerError))]
struct PostCommentsPath {
    post_id: Id<PostMarker>,
}

/// Oldest first. An absent post yields an empty list, not an error.
async fn list_comments(
    PostCommentsPath { post_id }: PostCommentsPath,
    State(db): State<Arc<DbClient>>,
) -> Result<Json<Vec<Comment>>> {
    let comments = db.list_comments(&post_id).await?;

    Ok(Json(comments))
}

#[axum::debug_handler]
async fn create_comment(
    PostCommentsPath { post_id }: PostCommentsPath,
    State(state): State<ServerState>,
    Json(create): Json<CreateComment>,
) -> Result<Json<Comment>> {
    let comment = state.db_client.insert_comment(&post_id, &create).await?;

    state.broadcaster.publish(ForumEvent::CommentCreated {
        post_id,
        comment: comment.clone(),
    });

    Ok(Json(comment))
}
