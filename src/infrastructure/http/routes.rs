//! HTTP Routes
//!
//! API 路由注册
//!
//! API Endpoints:
//! - /api/register     POST    注册
//! - /api/login        POST    登录
//! - /api/logout/{id}  POST    注销（占位）
//! - /api/users/{id}   GET     获取用户
//! - /api/users        GET     列出所有用户
//! - /api/users        POST    创建用户
//! - /api/users/{id}   PUT     更新用户
//! - /api/users/{id}   DELETE  删除用户

use axum::http::Method;

use super::handlers::{auth, user};
use super::router::ApiRouter;

/// 注册所有路由; 注册顺序即匹配优先级
pub fn api_router(base_path: &str) -> ApiRouter {
    let mut router = ApiRouter::new().with_base_path(base_path);

    router.register(Method::POST, "/api/register", auth::register);
    router.register(Method::POST, "/api/login", auth::login);
    router.register(Method::POST, "/api/logout/{id}", auth::logout);
    router.register(Method::GET, "/api/users/{id}", user::get_user);
    router.register(Method::GET, "/api/users", user::get_all_users);
    router.register(Method::POST, "/api/users", user::create_user);
    router.register(Method::PUT, "/api/users/{id}", user::update_user);
    router.register(Method::DELETE, "/api/users/{id}", user::delete_user);

    router
}
