use actix_web::{
    HttpResponse, Responder,
    web::{self, Path},
};
use esports_lib::{
    Database, countdown,
    image::{self, ImageStore},
    now,
    repo::stats,
};
use tracing_actix_web::RequestId;

use crate::{ApiErrorKind, ApiResponse, FitRequestId as _, Res, utils::json};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/stats", web::get().to(get_stats))
        .route("/countdown", web::get().to(get_countdown))
        .route("/uploads/{file}", web::get().to(uploaded_file));
}

async fn get_stats(req_id: RequestId, db: Res<Database>) -> ApiResponse<impl Responder> {
    let stats = stats::get(&db.sql_conn).await.fit(req_id)?;
    json("Statistics retrieved successfully", stats)
}

async fn get_countdown(req_id: RequestId, db: Res<Database>) -> ApiResponse<impl Responder> {
    let countdown = countdown::get(&db.sql_conn, now()).await.fit(req_id)?;
    let message = if countdown.is_some() {
        "Countdown retrieved successfully"
    } else {
        "Nothing upcoming"
    };
    json(message, countdown)
}

async fn uploaded_file(
    req_id: RequestId,
    store: Res<ImageStore>,
    file: Path<String>,
) -> ApiResponse<impl Responder> {
    let file = file.into_inner();
    let Some(path) = store.path_of(&file) else {
        return Err(ApiErrorKind::FileNotFound(file)).fit(req_id);
    };

    match tokio::fs::read(&path).await {
        Ok(content) => Ok(HttpResponse::Ok()
            .content_type(image::content_type(&file))
            .body(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ApiErrorKind::FileNotFound(file)).fit(req_id)
        }
        Err(e) => Err(ApiErrorKind::IOError(e)).fit(req_id),
    }
}
