use actix_multipart::Multipart;
use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::access::Actor;
use crate::middlewares;
use crate::models::{
    ApiResponse, PaginationQuery, SetActiveRequest,
    course_modules::requests::UpdateModuleRequest, lessons::requests::CreateLessonRequest,
};
use crate::services::{LmsContext, lessons, modules};
use crate::utils::multipart::read_multipart;

pub async fn get_module(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let module = modules::get_module(&ctx, &actor, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(module, "Module retrieved successfully")))
}

pub async fn update_module(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
    body: web::Json<UpdateModuleRequest>,
) -> ActixResult<HttpResponse> {
    let module = modules::update_module(&ctx, &actor, id.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(module, "Module updated successfully")))
}

pub async fn set_module_active(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
    body: web::Json<SetActiveRequest>,
) -> ActixResult<HttpResponse> {
    let module = modules::set_module_active(&ctx, &actor, id.into_inner(), body.active).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        module,
        "Module status updated successfully",
    )))
}

// 连同课时与附件一起删除
pub async fn delete_module(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    modules::delete_module(&ctx, &actor, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Module deleted successfully")))
}

pub async fn list_lessons(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    let page = lessons::list_lessons(&ctx, &actor, id.into_inner(), query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        page,
        "Lesson list retrieved successfully",
    )))
}

pub async fn create_lesson(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let form = read_multipart::<CreateLessonRequest>(payload, &ctx.upload).await?;
    let (req, files) = form.require_data()?;
    let lesson = lessons::create_lesson(&ctx, &actor, id.into_inner(), req, files).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(lesson, "Lesson created successfully")))
}

// 配置路由
pub fn configure_module_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/modules")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_module))
                    .route(web::put().to(update_module))
                    .route(web::delete().to(delete_module)),
            )
            .service(web::resource("/{id}/active").route(web::put().to(set_module_active)))
            .service(
                web::resource("/{id}/lessons")
                    .route(web::get().to(list_lessons))
                    .route(web::post().to(create_lesson)),
            ),
    );
}
