//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// 用户实体（用于持久化）
///
/// `password_hash` 只在仓储与登录校验之间流转, 不会被序列化输出
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// 新用户（插入用, id 由数据库分配）
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// 用户部分更新, None 表示保留原值
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl UserChanges {
    /// 是否没有任何字段需要更新
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password_hash.is_none()
    }
}

/// User Repository 端口
#[async_trait]
pub trait UserRepositoryPort: Send + Sync {
    /// 插入新用户, 返回分配的 id
    async fn create(&self, user: &NewUser) -> Result<i64, RepositoryError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError>;

    async fn find_all(&self) -> Result<Vec<UserRecord>, RepositoryError>;

    /// 按 `UserChanges` 做部分更新; 用户不存在时返回 `NotFound`
    async fn update(&self, id: i64, changes: &UserChanges) -> Result<(), RepositoryError>;

    /// 删除用户; 用户不存在时返回 `NotFound`
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// 检查用户名或邮箱是否已被占用, `exclude_id` 用于更新时排除自身
    async fn exists(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        exclude_id: Option<i64>,
    ) -> Result<bool, RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_changes_is_empty() {
        assert!(UserChanges::default().is_empty());

        let changes = UserChanges {
            email: Some("a@b.com".to_string()),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
