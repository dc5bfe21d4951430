use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::access::Actor;
use crate::middlewares;
use crate::models::{
    ApiResponse, SetActiveRequest,
    departments::requests::{CreateDepartmentRequest, DepartmentListParams, UpdateDepartmentRequest},
};
use crate::services::{LmsContext, departments};

pub async fn list_departments(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    query: web::Query<DepartmentListParams>,
) -> ActixResult<HttpResponse> {
    let page = departments::list_departments(&ctx, &actor, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        page,
        "Department list retrieved successfully",
    )))
}

pub async fn create_department(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    body: web::Json<CreateDepartmentRequest>,
) -> ActixResult<HttpResponse> {
    let department = departments::create_department(&ctx, &actor, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        department,
        "Department created successfully",
    )))
}

pub async fn get_department(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let department = departments::get_department(&ctx, &actor, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        department,
        "Department retrieved successfully",
    )))
}

pub async fn update_department(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
    body: web::Json<UpdateDepartmentRequest>,
) -> ActixResult<HttpResponse> {
    let department =
        departments::update_department(&ctx, &actor, id.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        department,
        "Department updated successfully",
    )))
}

pub async fn set_department_active(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
    body: web::Json<SetActiveRequest>,
) -> ActixResult<HttpResponse> {
    let department =
        departments::set_department_active(&ctx, &actor, id.into_inner(), body.active).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        department,
        "Department status updated successfully",
    )))
}

// 配置路由
pub fn configure_department_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/departments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_departments))
                    .route(web::post().to(create_department)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_department))
                    .route(web::put().to(update_department)),
            )
            .service(web::resource("/{id}/active").route(web::put().to(set_department_active))),
    );
}
