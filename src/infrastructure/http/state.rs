//! Application State

use std::sync::Arc;

use crate::application::ports::UserRepositoryPort;

/// 应用状态
///
/// 启动时构建一次, 以 `Arc` 在请求间共享; 仓储句柄显式传入, 无全局单例
pub struct AppState {
    pub user_repo: Arc<dyn UserRepositoryPort>,
}

impl AppState {
    pub fn new(user_repo: Arc<dyn UserRepositoryPort>) -> Self {
        Self { user_repo }
    }
}
