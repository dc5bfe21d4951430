use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::access::Actor;
use crate::middlewares;
use crate::models::ApiResponse;
use crate::services::{LmsContext, enrollments};

pub async fn list_my_enrollments(
    ctx: web::Data<LmsContext>,
    actor: Actor,
) -> ActixResult<HttpResponse> {
    let enrollments = enrollments::list_my_enrollments(&ctx, &actor).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        enrollments,
        "Enrollments retrieved successfully",
    )))
}

// 配置路由
pub fn configure_enrollment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/enrollments")
            .wrap(middlewares::RequireJWT)
            .route("/mine", web::get().to(list_my_enrollments)),
    );
}
