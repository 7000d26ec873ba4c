//! HTTP Infrastructure
//!
//! - `pattern` / `router`: 路由分发核心（编译模式, 按序扫描, 失败隔离）
//! - `handlers`: 认证与用户 CRUD
//! - `server`: Axum 服务器装配（CORS / trace / 日志中间件）

pub mod dto;
pub mod error;
pub mod handlers;
pub mod pattern;
pub mod response;
pub mod router;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use router::{ApiRouter, RequestContext};
pub use routes::api_router;
pub use server::{HttpServer, ServerConfig};
pub use state::AppState;
