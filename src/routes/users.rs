use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::access::Actor;
use crate::middlewares;
use crate::models::{
    ApiResponse, SetActiveRequest,
    users::{
        entities::GlobalRole,
        requests::{CreateUserRequest, UserListParams},
    },
};
use crate::services::{LmsContext, users};

pub async fn list_users(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    query: web::Query<UserListParams>,
) -> ActixResult<HttpResponse> {
    let page = users::list_users(&ctx, &actor, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(page, "User list retrieved successfully")))
}

pub async fn create_user(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    body: web::Json<CreateUserRequest>,
) -> ActixResult<HttpResponse> {
    let user = users::create_user(&ctx, &actor, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(user, "User created successfully")))
}

pub async fn get_current_user(
    ctx: web::Data<LmsContext>,
    actor: Actor,
) -> ActixResult<HttpResponse> {
    let user = users::get_current_user(&ctx, &actor).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(user, "User retrieved successfully")))
}

pub async fn get_user(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let user = users::get_user(&ctx, &actor, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(user, "User retrieved successfully")))
}

pub async fn set_user_active(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
    body: web::Json<SetActiveRequest>,
) -> ActixResult<HttpResponse> {
    let user = users::set_user_active(&ctx, &actor, id.into_inner(), body.active).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        user,
        "User status updated successfully",
    )))
}

// 配置路由
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/users")
            .wrap(middlewares::RequireJWT)
            .route("/me", web::get().to(get_current_user))
            .route("/{id}", web::get().to(get_user))
            .route("/{id}/active", web::put().to(set_user_active))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(GlobalRole::staff_roles()))
                    .route("", web::get().to(list_users))
                    .route("", web::post().to(create_user)),
            ),
    );
}
