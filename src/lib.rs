//! Quest API - 用户账户管理 JSON API
//!
//! 分层结构:
//! - Application: 仓储端口定义 (UserRepositoryPort)
//! - Infrastructure: HTTP (路由分发核心 + handlers) 与 SQLite 持久化
//!
//! 核心是 `infrastructure::http::router` 中的请求分发器:
//! 按注册顺序扫描路由表, `{name}` 占位符按段匹配, 位置参数传入 handler,
//! handler 失败被隔离为统一的 JSON 错误响应。

pub mod application;
pub mod config;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
