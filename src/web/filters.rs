use std::convert::Infallible;

use warp::{reject::Rejection, Filter};

use crate::{web::handlers, Services};

/// Single uploaded files are capped at 100 MB.
const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

/// Non-file request bodies are capped at 200 MB.
const MAX_BODY_BYTES: u64 = 200 * 1024 * 1024;

pub fn with_services(
    services: Services,
) -> impl Filter<Extract = (Services,), Error = Infallible> + Clone {
    warp::any().map(move || services.clone())
}

fn user_filters(
    services: Services,
) -> impl Filter<Extract = (impl warp::Reply,), Error = Rejection> + Clone {
    let register_user = warp::path!("api" / "users")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_services(services.clone()))
        .and_then(handlers::register_user);

    let read_user = warp::path!("api" / "users" / i64)
        .and(warp::get())
        .and(with_services(services.clone()))
        .and_then(handlers::get_user);

    register_user.or(read_user)
}

fn upload_filters(
    services: Services,
) -> impl Filter<Extract = (impl warp::Reply,), Error = Rejection> + Clone {
    let upload_video = warp::path!("api" / "users" / "videos" / i64)
        .and(warp::post())
        .and(warp::multipart::form().max_length(MAX_UPLOAD_BYTES))
        .and(with_services(services.clone()))
        .and_then(handlers::upload_video);

    let upload_image = warp::path!("api" / "users" / "images" / i64)
        .and(warp::post())
        .and(warp::multipart::form().max_length(MAX_UPLOAD_BYTES))
        .and(with_services(services.clone()))
        .and_then(handlers::upload_image);

    let upload_file = warp::path!("api" / "users" / "upload" / i64)
        .and(warp::post())
        .and(warp::multipart::form().max_length(MAX_UPLOAD_BYTES))
        .and(with_services(services.clone()))
        .and_then(handlers::upload_file);

    upload_video.or(upload_image).or(upload_file)
}

fn score_filters(
    services: Services,
) -> impl Filter<Extract = (impl warp::Reply,), Error = Rejection> + Clone {
    let set_quiz_score = warp::path!("api" / "users" / "quizscore" / i64)
        .and(warp::put())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_services(services.clone()))
        .and_then(handlers::set_quiz_score);

    let set_snap_score = warp::path!("api" / "users" / "snapscore" / i64)
        .and(warp::put())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_services(services.clone()))
        .and_then(handlers::set_snap_score);

    set_quiz_score.or(set_snap_score)
}

fn leaderboard_filters(
    services: Services,
) -> impl Filter<Extract = (impl warp::Reply,), Error = Rejection> + Clone {
    let by_snap_score = warp::path!("api" / "users" / "sort-by-snap-score")
        .and(warp::get())
        .and(with_services(services.clone()))
        .and_then(handlers::snap_leaderboard);

    let by_quiz_score = warp::path!("api" / "users" / "sort-by-quiz-score")
        .and(warp::get())
        .and(with_services(services.clone()))
        .and_then(handlers::quiz_leaderboard);

    by_snap_score.or(by_quiz_score)
}

pub fn api_filters(
    services: Services,
) -> impl Filter<Extract = (impl warp::Reply,), Error = Rejection> + Clone {
    leaderboard_filters(services.clone())
        .or(user_filters(services.clone()))
        .or(upload_filters(services.clone()))
        .or(score_filters(services))
}
