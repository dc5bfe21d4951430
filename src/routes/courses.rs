use actix_multipart::Multipart;
use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::access::Actor;
use crate::middlewares;
use crate::models::{
    ApiResponse, PaginationQuery,
    assignments::requests::CreateAssignmentRequest,
    course_modules::requests::CreateModuleRequest,
    courses::requests::{CourseListParams, CreateCourseRequest, UpdateCourseRequest},
    enrollments::requests::{EnrollRequest, EnrollmentListParams},
};
use crate::services::{LmsContext, assignments, courses, enrollments, modules, reports};
use crate::utils::multipart::read_multipart;

pub async fn list_courses(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    query: web::Query<CourseListParams>,
) -> ActixResult<HttpResponse> {
    let page = courses::list_courses(&ctx, &actor, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        page,
        "Course list retrieved successfully",
    )))
}

pub async fn list_my_courses(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    let page = courses::list_my_courses(&ctx, &actor, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        page,
        "Course list retrieved successfully",
    )))
}

pub async fn create_course(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    body: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    let course = courses::create_course(&ctx, &actor, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(course, "Course created successfully")))
}

pub async fn get_course(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let course = courses::get_course(&ctx, &actor, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(course, "Course retrieved successfully")))
}

pub async fn update_course(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
    body: web::Json<UpdateCourseRequest>,
) -> ActixResult<HttpResponse> {
    let course = courses::update_course(&ctx, &actor, id.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(course, "Course updated successfully")))
}

pub async fn toggle_course_publish(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let course = courses::toggle_course_publish(&ctx, &actor, id.into_inner()).await?;
    let message = if course.published {
        "Course published"
    } else {
        "Course unpublished"
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(course, message)))
}

pub async fn delete_course(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    courses::delete_course(&ctx, &actor, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Course deleted successfully")))
}

pub async fn list_modules(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    let page = modules::list_modules(&ctx, &actor, id.into_inner(), query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        page,
        "Module list retrieved successfully",
    )))
}

pub async fn create_module(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
    body: web::Json<CreateModuleRequest>,
) -> ActixResult<HttpResponse> {
    let module = modules::create_module(&ctx, &actor, id.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(module, "Module created successfully")))
}

pub async fn list_assignments(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    let page =
        assignments::list_assignments(&ctx, &actor, id.into_inner(), query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        page,
        "Assignment list retrieved successfully",
    )))
}

// multipart：data 字段为 JSON，files 字段为附件
pub async fn create_assignment(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let form = read_multipart::<CreateAssignmentRequest>(payload, &ctx.upload).await?;
    let (req, files) = form.require_data()?;
    let assignment =
        assignments::create_assignment(&ctx, &actor, id.into_inner(), req, files).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        assignment,
        "Assignment created successfully",
    )))
}

pub async fn list_enrollments(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
    query: web::Query<EnrollmentListParams>,
) -> ActixResult<HttpResponse> {
    let page =
        enrollments::list_enrollments(&ctx, &actor, id.into_inner(), query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        page,
        "Enrollment list retrieved successfully",
    )))
}

pub async fn enroll_user(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
    body: web::Json<EnrollRequest>,
) -> ActixResult<HttpResponse> {
    let enrollment =
        enrollments::enroll_user(&ctx, &actor, id.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        enrollment,
        "User enrolled successfully",
    )))
}

pub async fn remove_enrollment(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    path: web::Path<(i64, i64)>,
) -> ActixResult<HttpResponse> {
    let (course_id, user_id) = path.into_inner();
    enrollments::remove_enrollment(&ctx, &actor, course_id, user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Enrollment removed successfully")))
}

pub async fn list_participants(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let groups = enrollments::list_participants(&ctx, &actor, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        groups,
        "Participants retrieved successfully",
    )))
}

pub async fn enrollment_summary(
    ctx: web::Data<LmsContext>,
    actor: Actor,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let summary = reports::enrollment_summary(&ctx, &actor, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        summary,
        "Enrollment summary retrieved successfully",
    )))
}

// 配置路由
pub fn configure_course_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_courses))
                    .route(web::post().to(create_course)),
            )
            // 固定路径需在 /{id} 之前注册
            .service(web::resource("/mine").route(web::get().to(list_my_courses)))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_course))
                    .route(web::put().to(update_course))
                    .route(web::delete().to(delete_course)),
            )
            .service(web::resource("/{id}/publish").route(web::post().to(toggle_course_publish)))
            .service(
                web::resource("/{id}/modules")
                    .route(web::get().to(list_modules))
                    .route(web::post().to(create_module)),
            )
            .service(
                web::resource("/{id}/assignments")
                    .route(web::get().to(list_assignments))
                    .route(web::post().to(create_assignment)),
            )
            .service(
                web::resource("/{id}/enrollments")
                    .route(web::get().to(list_enrollments))
                    .route(web::post().to(enroll_user)),
            )
            .service(
                web::resource("/{id}/enrollments/{user_id}")
                    .route(web::delete().to(remove_enrollment)),
            )
            .service(web::resource("/{id}/participants").route(web::get().to(list_participants)))
            .service(
                web::resource("/{id}/enrollment-summary").route(web::get().to(enrollment_summary)),
            ),
    );
}
