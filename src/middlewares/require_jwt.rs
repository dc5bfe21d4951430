/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <JWT_TOKEN>`，把令牌解析为 [`Actor`] 并放入请求扩展。
 * 处理函数通过 `Actor` 提取器取得当前请求方：
 *
 * ```rust,ignore
 * async fn handler(actor: Actor, ctx: web::Data<LmsContext>) -> Result<HttpResponse> {
 *     let course = courses::get_course(&ctx, &actor, 1).await?;
 *     Ok(HttpResponse::Ok().json(ApiResponse::success(course, "ok")))
 * }
 * ```
 *
 * 令牌缺失、签名无效、过期，或用户不存在、已停用时返回 401。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
    body::EitherBody,
    dev::{Payload, ServiceRequest, ServiceResponse},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, info};

use crate::access::Actor;
use crate::errors::{LmsError, Result};
use crate::services::{LmsContext, identity};
use crate::utils::jwt::JwtUtils;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

// 提取并验证 Bearer 令牌
async fn authenticate(req: &ServiceRequest) -> Result<Actor> {
    let token = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| {
            LmsError::authentication_with_reason(
                "missing_token",
                "Missing or invalid Authorization header",
            )
        })?;

    let claims = JwtUtils::verify_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        LmsError::authentication_with_reason("invalid_token", "Invalid JWT token")
    })?;

    let ctx = req
        .app_data::<web::Data<LmsContext>>()
        .ok_or_else(|| LmsError::authentication("Service context is not configured"))?;

    identity::resolve_actor(ctx, token, &claims).await
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::result::Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求交给 CORS 处理
            if req.method() == actix_web::http::Method::OPTIONS {
                let res = srv.call(req).await?.map_into_left_body();
                return Ok(res);
            }

            match authenticate(&req).await {
                Ok(actor) => {
                    debug!("JWT authentication successful for user {}", actor.user_id);
                    req.extensions_mut().insert(actor);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(err.error_response().map_into_right_body()))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 从请求扩展中提取当前请求方
    pub fn extract_actor(req: &HttpRequest) -> Option<Actor> {
        req.extensions().get::<Actor>().copied()
    }
}

/// 处理函数参数提取器，要求路由已应用 [`RequireJWT`]
impl FromRequest for Actor {
    type Error = LmsError;
    type Future = Ready<std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(RequireJWT::extract_actor(req).ok_or_else(|| {
            LmsError::authentication_with_reason("missing_token", "Authentication required")
        }))
    }
}
