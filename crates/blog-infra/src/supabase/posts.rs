use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{CONTENT_RANGE, RANGE};
use reqwest::{Method, StatusCode};

use blog_core::BackendError;
use blog_core::domain::{NewPost, Post, PostId, PostPage, PostPatch, RowRange};
use blog_core::ports::PostBackend;
use blog_shared::dto::{InsertPostRow, PostRow, UpdatePostRow};

use super::client::{SupabaseClient, content_range_total, post_from_row, rest_json, transport_error};

const RETURN_REPRESENTATION: &str = "return=representation";

fn id_filter(id: &PostId) -> [(&'static str, String); 1] {
    [("id", format!("eq.{id}"))]
}

#[async_trait]
impl PostBackend for SupabaseClient {
    async fn list(&self, range: RowRange) -> Result<PostPage, BackendError> {
        let response = self
            .rest(Method::GET)
            .await
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .header("Range-Unit", "items")
            .header(RANGE, format!("{}-{}", range.start, range.end))
            .header("Prefer", "count=exact")
            .send()
            .await
            .map_err(transport_error)?;

        let total = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(content_range_total);

        // Asking past the last row is an empty page, not an error.
        if response.status() == StatusCode::RANGE_NOT_SATISFIABLE {
            return Ok(PostPage {
                posts: Vec::new(),
                total,
            });
        }

        let rows: Vec<PostRow> = rest_json(response).await?;
        Ok(PostPage {
            posts: rows.into_iter().map(post_from_row).collect(),
            total,
        })
    }

    async fn find(&self, id: &PostId) -> Result<Option<Post>, BackendError> {
        let response = self
            .rest(Method::GET)
            .await
            .query(&[("select", "*")])
            .query(&id_filter(id))
            .send()
            .await
            .map_err(transport_error)?;

        let rows: Vec<PostRow> = rest_json(response).await?;
        Ok(rows.into_iter().next().map(post_from_row))
    }

    async fn insert(&self, post: NewPost) -> Result<Post, BackendError> {
        let body = InsertPostRow {
            title: post.title,
            content: post.content,
        };
        let response = self
            .rest(Method::POST)
            .await
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let rows: Vec<PostRow> = rest_json(response).await?;
        rows.into_iter()
            .next()
            .map(post_from_row)
            .ok_or_else(|| BackendError::Decode("insert returned no row".to_string()))
    }

    async fn update(&self, id: &PostId, patch: PostPatch) -> Result<Post, BackendError> {
        let body = UpdatePostRow {
            title: patch.title,
            content: patch.content,
            updated_at: Utc::now(),
        };
        let response = self
            .rest(Method::PATCH)
            .await
            .query(&id_filter(id))
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let rows: Vec<PostRow> = rest_json(response).await?;
        rows.into_iter()
            .next()
            .map(post_from_row)
            .ok_or(BackendError::NotFound)
    }

    async fn delete(&self, id: &PostId) -> Result<u64, BackendError> {
        let response = self
            .rest(Method::DELETE)
            .await
            .query(&id_filter(id))
            .header("Prefer", RETURN_REPRESENTATION)
            .send()
            .await
            .map_err(transport_error)?;

        let rows: Vec<PostRow> = rest_json(response).await?;
        Ok(rows.len() as u64)
    }
}
