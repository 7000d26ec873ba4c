//! Infrastructure Layer
//!
//! - HTTP: 路由分发核心 + handlers + 服务器
//! - Persistence: SQLite 仓储实现

pub mod http;
pub mod persistence;
