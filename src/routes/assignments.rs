use actix_multipart::Multipart;
use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::access::Actor;
use crate::middlewares;
use crate::models::{
    ApiResponse, PaginationQuery, assignments::requests::UpdateAssignmentRequest,
    submissions::requests::SubmitRequest,
};
use crate::services::{LmsContext, assignments, reports, submissions};
use crate::utils::multipart::read_multipart;

pub async fn get_assignment(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let assignment = assignments::get_assignment(&ctx, &actor, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        assignment,
        "Assignment retrieved successfully",
    )))
}

pub async fn update_assignment(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let form = read_multipart::<UpdateAssignmentRequest>(payload, &ctx.upload).await?;
    let (update, files) = form.into_update();
    let assignment =
        assignments::update_assignment(&ctx, &actor, id.into_inner(), update, files).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        assignment,
        "Assignment updated successfully",
    )))
}

pub async fn toggle_assignment_publish(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let assignment = assignments::toggle_assignment_publish(&ctx, &actor, id.into_inner()).await?;
    let message = if assignment.published {
        "Assignment published"
    } else {
        "Assignment unpublished"
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(assignment, message)))
}

pub async fn delete_assignment(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    assignments::delete_assignment(&ctx, &actor, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Assignment deleted successfully")))
}

pub async fn list_submissions(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    let page = submissions::list_assignment_submissions(
        &ctx,
        &actor,
        id.into_inner(),
        query.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        page,
        "Submission list retrieved successfully",
    )))
}

// 学生提交：data 可只含文本答案，也可只带附件
pub async fn create_submission(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let form = read_multipart::<SubmitRequest>(payload, &ctx.upload).await?;
    let req = form.data.unwrap_or_default();
    let submission =
        submissions::create_submission(&ctx, &actor, id.into_inner(), req, form.files).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        submission,
        "Submission created successfully",
    )))
}

pub async fn assignment_summary(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let summary = reports::assignment_summary(&ctx, &actor, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        summary,
        "Assignment summary retrieved successfully",
    )))
}

pub async fn submission_status(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let rows = reports::submission_status(&ctx, &actor, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        rows,
        "Submission status retrieved successfully",
    )))
}

// 配置路由
pub fn configure_assignment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_assignment))
                    .route(web::put().to(update_assignment))
                    .route(web::delete().to(delete_assignment)),
            )
            .service(
                web::resource("/{id}/publish").route(web::post().to(toggle_assignment_publish)),
            )
            .service(
                web::resource("/{id}/submissions")
                    .route(web::get().to(list_submissions))
                    .route(web::post().to(create_submission)),
            )
            .service(web::resource("/{id}/summary").route(web::get().to(assignment_summary)))
            .service(
                web::resource("/{id}/submission-status").route(web::get().to(submission_status)),
            ),
    );
}
