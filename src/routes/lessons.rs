use actix_multipart::Multipart;
use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::access::Actor;
use crate::middlewares;
use crate::models::{ApiResponse, SetActiveRequest, lessons::requests::UpdateLessonRequest};
use crate::services::{LmsContext, lessons};
use crate::utils::multipart::read_multipart;

pub async fn get_lesson(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let lesson = lessons::get_lesson(&ctx, &actor, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(lesson, "Lesson retrieved successfully")))
}

pub async fn update_lesson(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let form = read_multipart::<UpdateLessonRequest>(payload, &ctx.upload).await?;
    let (update, files) = form.into_update();
    let lesson = lessons::update_lesson(&ctx, &actor, id.into_inner(), update, files).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(lesson, "Lesson updated successfully")))
}

pub async fn set_lesson_active(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
    body: web::Json<SetActiveRequest>,
) -> ActixResult<HttpResponse> {
    let lesson = lessons::set_lesson_active(&ctx, &actor, id.into_inner(), body.active).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        lesson,
        "Lesson status updated successfully",
    )))
}

pub async fn delete_lesson(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    lessons::delete_lesson(&ctx, &actor, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Lesson deleted successfully")))
}

// 配置路由
pub fn configure_lesson_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/lessons")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_lesson))
                    .route(web::put().to(update_lesson))
                    .route(web::delete().to(delete_lesson)),
            )
            .service(web::resource("/{id}/active").route(web::put().to(set_lesson_active))),
    );
}
