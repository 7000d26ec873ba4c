//! HTTP Server
//!
//! Axum HTTP 服务器启动和配置; 自定义分发器挂载为 fallback,
//! CORS / trace / 错误日志层套在外面

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use http::header::{
    HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    AUTHORIZATION, CONTENT_TYPE,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::router::ApiRouter;
use super::routes::api_router;
use super::state::AppState;

/// 失败响应日志: 4xx 记 warn, 5xx 记 error
///
/// 成功响应交给 TraceLayer, 这里只补分发结果的失败通道
async fn log_failed_responses(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(%method, path, status = status.as_u16(), "Request dispatch failed");
    } else if status.is_client_error() {
        tracing::warn!(%method, path, status = status.as_u16(), "Request rejected");
    }

    response
}

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 分发前从请求路径剥离的挂载前缀
    pub base_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5080,
            base_path: String::new(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16, base_path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            base_path: base_path.into(),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// HTTP 服务器
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
    api: Arc<ApiRouter>,
}

impl HttpServer {
    /// 创建新的 HTTP 服务器; 路由表在此构建一次, 之后不可变
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        let api = Arc::new(api_router(&config.base_path));
        Self {
            config,
            state: Arc::new(state),
            api,
        }
    }

    /// 构建 Router
    ///
    /// 所有请求都进入自定义分发器; axum 自身不注册任何路由
    fn build_router(&self) -> Router {
        // CORS 配置 - 允许所有来源的跨域请求
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers([
                AUTHORIZATION,
                CONTENT_TYPE,
                HeaderName::from_static("x-requested-with"),
            ]);

        let api = self.api.clone();
        Router::new()
            .fallback(move |State(state): State<Arc<AppState>>, req: Request| {
                let api = api.clone();
                async move { api.handle(state, req).await }
            })
            .layer(middleware::from_fn(log_failed_responses))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            // 预检之外的响应也带上这两个 CORS 头; 预检时 CorsLayer 的值优先
            .layer(SetResponseHeaderLayer::if_not_present(
                ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static("Content-Type, Authorization, X-Requested-With"),
            ))
            .with_state(self.state.clone())
    }

    /// 启动服务器
    pub async fn run(self) -> Result<(), std::io::Error> {
        let router = self.build_router();
        let addr = self.config.addr();

        info!("Starting HTTP server on {}", addr);

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }

    /// 启动服务器（带优雅关闭）
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = self.build_router();
        let addr = self.config.addr();

        info!("Starting HTTP server on {} (with graceful shutdown)", addr);

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        Ok(())
    }
}
