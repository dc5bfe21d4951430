mod common;

use common::setup;
use rust_lms_next::models::users::entities::GlobalRole;
use rust_lms_next::runtime::lifetime::startup::seed_admin;
use rust_lms_next::services::{identity, users};
use rust_lms_next::utils::jwt::JwtUtils;

const SECRET: &str = "integration-secret";
const ISSUER: &str = "lms-identity";

#[tokio::test]
async fn token_resolves_to_active_user() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;

    let token = JwtUtils::sign(teacher.user_id, SECRET, ISSUER, chrono::Duration::minutes(5)).unwrap();
    let claims = JwtUtils::verify_with(&token, SECRET, ISSUER, 0).unwrap();
    let actor = identity::resolve_actor(&env.ctx, &token, &claims)
        .await
        .unwrap();
    assert_eq!(actor, teacher);
}

#[tokio::test]
async fn deactivated_user_is_rejected_even_with_cached_token() {
    let env = setup().await;
    let student = env.user("student1", GlobalRole::Student).await;

    let token = JwtUtils::sign(student.user_id, SECRET, ISSUER, chrono::Duration::minutes(5)).unwrap();
    let claims = JwtUtils::verify_with(&token, SECRET, ISSUER, 0).unwrap();
    identity::resolve_actor(&env.ctx, &token, &claims)
        .await
        .unwrap();

    users::set_user_active(&env.ctx, &env.admin, student.user_id, false)
        .await
        .unwrap();

    let err = identity::resolve_actor(&env.ctx, &token, &claims)
        .await
        .unwrap_err();
    assert_eq!(err.reason(), "user_inactive");
}

#[tokio::test]
async fn unknown_subject_is_rejected() {
    let env = setup().await;
    let token = JwtUtils::sign(9999, SECRET, ISSUER, chrono::Duration::minutes(5)).unwrap();
    let claims = JwtUtils::verify_with(&token, SECRET, ISSUER, 0).unwrap();
    let err = identity::resolve_actor(&env.ctx, &token, &claims)
        .await
        .unwrap_err();
    assert_eq!(err.reason(), "unknown_user");
}

#[tokio::test]
async fn admin_cannot_deactivate_self_and_staff_only_listing() {
    let env = setup().await;
    let err = users::set_user_active(&env.ctx, &env.admin, env.admin.user_id, false)
        .await
        .unwrap_err();
    assert_eq!(err.reason(), "cannot_deactivate_self");

    let student = env.user("student1", GlobalRole::Student).await;
    let err = users::get_user(&env.ctx, &student, env.admin.user_id)
        .await
        .unwrap_err();
    assert_eq!(err.reason(), "not_authorized");
    users::get_current_user(&env.ctx, &student).await.unwrap();
}

#[tokio::test]
async fn bootstrap_admin_only_seeds_empty_database() {
    let env = setup().await;
    // setup 已经创建了管理员
    assert_eq!(seed_admin(&env.ctx.storage, "root").await.unwrap(), None);
    assert_eq!(seed_admin(&env.ctx.storage, "").await.unwrap(), None);
}
