use actix_multipart::Multipart;
use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::access::Actor;
use crate::middlewares;
use crate::models::{
    ApiResponse,
    submissions::requests::{GradeSubmissionRequest, MySubmissionListParams, SubmitRequest},
};
use crate::services::{LmsContext, submissions};
use crate::utils::multipart::read_multipart;

pub async fn list_my_submissions(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    query: web::Query<MySubmissionListParams>,
) -> ActixResult<HttpResponse> {
    let page = submissions::list_my_submissions(&ctx, &actor, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        page,
        "Submission list retrieved successfully",
    )))
}

pub async fn get_submission(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let submission = submissions::get_submission(&ctx, &actor, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        submission,
        "Submission retrieved successfully",
    )))
}

pub async fn update_submission(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let form = read_multipart::<SubmitRequest>(payload, &ctx.upload).await?;
    let (req, files) = form.into_update();
    let submission =
        submissions::update_submission(&ctx, &actor, id.into_inner(), req, files).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        submission,
        "Submission updated successfully",
    )))
}

pub async fn grade_submission(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
    body: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    let submission =
        submissions::grade_submission(&ctx, &actor, id.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        submission,
        "Submission graded successfully",
    )))
}

pub async fn delete_submission(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    submissions::delete_submission(&ctx, &actor, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Submission deleted successfully")))
}

// 配置路由
pub fn configure_submission_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/submissions")
            .wrap(middlewares::RequireJWT)
            .service(web::resource("/mine").route(web::get().to(list_my_submissions)))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_submission))
                    .route(web::put().to(update_submission))
                    .route(web::delete().to(delete_submission)),
            )
            .service(web::resource("/{id}/grade").route(web::post().to(grade_submission))),
    );
}
