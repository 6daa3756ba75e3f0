use crate::server::{Result, ServerError, ServerRouter, ServerState, json::Json};
use axum::{Router, extract::State};
use axum_extra::routing::{RouterExt, TypedPath};
use serde::Deserialize;
use std::sync::Arc;
use treffpunkt_common::event::ForumEvent;
use treffpunkt_common::model::{
    Id,
    post::{CreatePost, Post, PostMarker},
};
use treffpunkt_db::client::DbClient;

pub fn routes() -> ServerRouter {
    Router::new()
        .typed_get(list_posts)
        .typed_post(create_post)
        .typed_post(like_post)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/api/posts")]
struct PostsPath;

#[derive(TypedPath, Deserialize)]
#[typed_path("/api/posts/{post_id}/like", rejection(ServerError))]
struct LikePostPath {
    post_id: Id<PostMarker>,
}

async fn list_posts(_: PostsPath, State(db): State<Arc<DbClient>>) -> Result<Json<Vec<Post>>> {
    let posts = db.list_posts().await?;

    Ok(Json(posts))
}

/// Commit happens-before broadcast happens-before the response. A
/// failed insert broadcasts nothing.
#[axum::debug_handler]
async fn create_post(
    _: PostsPath,
    State(state): State<ServerState>,
    Json(create): Json<CreatePost>,
) -> Result<Json<Post>> {
    let post = state.db_client.insert_post(&create).await?;

    state.broadcaster.publish(ForumEvent::PostCreated(post.clone()));

    Ok(Json(post))
}

#[axum::debug_handler]
async fn like_post(
    LikePostPath { post_id }: LikePostPath,
    State(state): State<ServerState>,
) -> Result<Json<Post>> {
    let post = state
        .db_client
        .increment_likes(&post_id)
        .await?
        .ok_or_else(|| ServerError::PostByIdNotFound(post_id))?;

    state.broadcaster.publish(ForumEvent::PostUpdated(post.clone()));

    Ok(Json(post))
}
