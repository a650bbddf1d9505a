use std::convert::Infallible;

use bytes::BufMut;
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use serde_json::json;
use warp::{
    http::StatusCode,
    multipart::{FormData, Part},
    reply::{Json, WithStatus},
};

use crate::{
    core::{
        participant::QuizScore,
        registry::{NewParticipant, Registration},
        uploads::UploadPayload,
    },
    error::Error,
    Services,
};

/// A Json struct to store a quiz score update
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct QuizScoreBody {
    pub score: f64,
    pub time_taken: f64,
    pub user_comment: Option<String>,
}

/// A Json struct to store a snap score update
#[derive(Serialize, Deserialize, Debug)]
pub struct SnapScoreBody {
    pub score: f64,
}

fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::DuplicateContact(_) => StatusCode::CONFLICT,
        Error::MissingPayload | Error::UnsupportedMediaType(_) => StatusCode::BAD_REQUEST,
        Error::StorageUnavailable(_) | Error::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_reply(error: Error) -> WithStatus<Json> {
    log::warn!("{}", error);
    warp::reply::with_status(
        warp::reply::json(&json!({ "error": error.to_string() })),
        status_for(&error),
    )
}

pub fn to_http_output<T: Serialize>(result: Result<T, Error>) -> Result<impl warp::Reply, Infallible> {
    match result {
        Ok(data) => Ok(warp::reply::with_status(
            warp::reply::json(&data),
            StatusCode::OK,
        )),
        Err(e) => Ok(error_reply(e)),
    }
}

pub async fn register_user(
    new: NewParticipant,
    services: Services,
) -> Result<impl warp::Reply, Infallible> {
    match services.registry.register(&new).await {
        Ok(Registration::Created(user)) => Ok(warp::reply::with_status(
            warp::reply::json(&user),
            StatusCode::OK,
        )),
        // The record that owns this contact id is surfaced alongside the
        // error so clients can treat registration as idempotent.
        Ok(Registration::Existing(user)) => Ok(warp::reply::with_status(
            warp::reply::json(&json!({
                "error": format!(
                    "A participant with contact id {} already exists",
                    user.contact_id
                ),
                "user": user,
            })),
            StatusCode::CONFLICT,
        )),
        Err(e) => Ok(error_reply(e)),
    }
}

pub async fn get_user(id: i64, services: Services) -> Result<impl warp::Reply, Infallible> {
    to_http_output(services.db.get_participant(id).await)
}

pub async fn set_quiz_score(
    id: i64,
    body: QuizScoreBody,
    services: Services,
) -> Result<impl warp::Reply, Infallible> {
    let quiz = QuizScore {
        score: body.score,
        time_taken: body.time_taken,
        comment: body.user_comment,
    };

    match services.scores.set_quiz_score(id, quiz).await {
        Ok(user) => Ok(warp::reply::with_status(
            warp::reply::json(&json!({
                "message": "Quiz score updated successfully",
                "user": user,
            })),
            StatusCode::OK,
        )),
        Err(e) => Ok(error_reply(e)),
    }
}

pub async fn set_snap_score(
    id: i64,
    body: SnapScoreBody,
    services: Services,
) -> Result<impl warp::Reply, Infallible> {
    match services.scores.set_snap_score(id, body.score).await {
        Ok(user) => Ok(warp::reply::with_status(
            warp::reply::json(&json!({
                "message": "Snap score updated successfully",
                "user": user,
            })),
            StatusCode::OK,
        )),
        Err(e) => Ok(error_reply(e)),
    }
}

pub async fn upload_video(
    id: i64,
    form: FormData,
    services: Services,
) -> Result<impl warp::Reply, Infallible> {
    let payload = read_upload(form, "video").await;
    match services.uploads.attach_video(id, payload).await {
        Ok(url) => Ok(warp::reply::with_status(
            warp::reply::json(&json!({
                "message": "Video uploaded successfully",
                "videoUrl": url,
            })),
            StatusCode::OK,
        )),
        Err(e) => Ok(error_reply(e)),
    }
}

pub async fn upload_image(
    id: i64,
    form: FormData,
    services: Services,
) -> Result<impl warp::Reply, Infallible> {
    let payload = read_upload(form, "image").await;
    match services.uploads.attach_image(id, payload).await {
        Ok(url) => Ok(warp::reply::with_status(
            warp::reply::json(&json!({
                "message": "Image uploaded successfully",
                "imageUrl": url,
            })),
            StatusCode::OK,
        )),
        Err(e) => Ok(error_reply(e)),
    }
}

pub async fn upload_file(
    id: i64,
    form: FormData,
    services: Services,
) -> Result<impl warp::Reply, Infallible> {
    let payload = read_upload(form, "file").await;
    match services.uploads.attach_file(id, payload).await {
        Ok(url) => Ok(warp::reply::with_status(
            warp::reply::json(&json!({
                "message": "File uploaded successfully",
                "fileUrl": url,
            })),
            StatusCode::OK,
        )),
        Err(e) => Ok(error_reply(e)),
    }
}

pub async fn snap_leaderboard(services: Services) -> Result<impl warp::Reply, Infallible> {
    to_http_output(services.leaderboards.by_snap_score().await)
}

pub async fn quiz_leaderboard(services: Services) -> Result<impl warp::Reply, Infallible> {
    to_http_output(services.leaderboards.by_quiz_performance().await)
}

/// Pulls the named file part out of a multipart body. A missing part or an
/// unreadable stream comes back as an empty payload, so the coordinator
/// still resolves the participant first and reports `MissingPayload` in
/// its place.
async fn read_upload(form: FormData, field: &str) -> UploadPayload {
    let absent = UploadPayload {
        filename: None,
        content_type: None,
        data: Vec::new(),
    };

    let parts: Vec<Part> = match form.try_collect().await {
        Ok(parts) => parts,
        Err(e) => {
            log::warn!("Failed to read multipart body: {}", e);
            return absent;
        }
    };

    let Some(part) = parts.into_iter().find(|p| p.name() == field) else {
        return absent;
    };

    let filename = part.filename().map(str::to_owned);
    let content_type = part.content_type().map(str::to_owned);

    match part
        .stream()
        .try_fold(Vec::new(), |mut data, buf| {
            data.put(buf);
            async move { Ok(data) }
        })
        .await
    {
        Ok(data) => UploadPayload {
            filename,
            content_type,
            data,
        },
        Err(e) => {
            log::warn!("Failed to read upload: {}", e);
            absent
        }
    }
}
