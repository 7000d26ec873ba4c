//! Quest API - 用户账户管理 JSON API
//!
//! 启动流程: 配置 → 日志 → 数据库 → 仓储 → HTTP 服务器

use std::sync::Arc;

use quest_api::config::{load_config, print_config};
use quest_api::infrastructure::http::{AppState, HttpServer, ServerConfig};
use quest_api::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteUserRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},quest_api={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Quest API - 用户账户管理服务");
    print_config(&config);

    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 初始化数据库
    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // 创建 Repository 适配器
    let user_repo = Arc::new(SqliteUserRepository::new(pool));

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(
        &config.server.host,
        config.server.port,
        &config.server.base_path,
    );
    let state = AppState::new(user_repo);
    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for ctrl-c");
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
