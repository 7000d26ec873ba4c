//! Router/Dispatcher - 请求分发核心
//!
//! # Responsibilities
//! - Hold the route table in registration order
//! - Match method + compiled pattern, capture positional params
//! - Invoke the handler with failure isolation
//!
//! # Design Decisions
//! - `register` appends without a uniqueness check; with duplicate patterns
//!   the earliest registered route wins (linear first-match scan; route
//!   counts are small and non-overlapping in practice)
//! - Handlers are boxed async closures resolved at registration time, so an
//!   unresolvable handler cannot reach dispatch; the remaining invocation
//!   failure is a panic, caught and converted to the same `{"error": ...}`
//!   envelope as a routing failure
//! - `OPTIONS` is answered 200/empty before any matching (CORS preflight
//!   fallthrough)
//! - The route table is immutable after startup; dispatch is a pure scan
//!   with no shared mutable state

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;

use axum::body::{to_bytes, Body, Bytes};
use axum::http::{Method, Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use futures_util::FutureExt;

use super::error::ApiError;
use super::pattern::{trim_trailing_slash, RoutePattern};
use super::response;
use super::state::AppState;

/// 请求体大小上限
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// 传给 handler 的请求上下文: 位置参数 + 原始请求体
pub struct RequestContext {
    /// 路径占位符按模式中出现顺序捕获的值
    pub params: Vec<String>,
    /// 原始请求体
    pub body: Bytes,
}

type HandlerFuture = Pin<Box<dyn Future<Output = Result<Response, ApiError>> + Send>>;

/// 注册时装箱的 handler
type RouteHandler = Arc<dyn Fn(Arc<AppState>, RequestContext) -> HandlerFuture + Send + Sync>;

struct Route {
    method: Method,
    pattern: RoutePattern,
    handler: RouteHandler,
}

/// API 路由器
///
/// 启动时注册路由, 之后不可变; 每个请求做一次按序扫描分发
pub struct ApiRouter {
    routes: Vec<Route>,
    base_path: String,
}

impl ApiRouter {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            base_path: String::new(),
        }
    }

    /// 设置分发前要从请求路径剥离的挂载前缀
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// 追加一条路由; 不检查重复, 重复模式下先注册者优先
    pub fn register<H, Fut>(&mut self, method: Method, pattern: &str, handler: H)
    where
        H: Fn(Arc<AppState>, RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, ApiError>> + Send + 'static,
    {
        let pattern = RoutePattern::compile(pattern);
        tracing::debug!(method = %method, pattern = %pattern.raw(), "Route registered");
        self.routes.push(Route {
            method,
            pattern,
            handler: Arc::new(move |state, cx| -> HandlerFuture {
                Box::pin(handler(state, cx))
            }),
        });
    }

    /// axum fallback 入口: 读取请求体后进入 dispatch
    pub async fn handle(&self, state: Arc<AppState>, req: Request<Body>) -> Response {
        let (parts, body) = req.into_parts();

        let bytes = match to_bytes(body, MAX_BODY_BYTES).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read request body");
                return ApiError::BadRequest("No se pudo leer el cuerpo de la solicitud.".to_string())
                    .into_response();
            }
        };

        self.dispatch(state, parts.method, &parts.uri, bytes).await
    }

    /// 分发一次请求
    ///
    /// 1. `OPTIONS` 直接 200 空响应
    /// 2. 取 URI 的路径部分（query string 被丢弃）
    /// 3. 剥离 base path 前缀（如果有）
    /// 4. 去掉一个结尾斜杠
    /// 5. 按注册顺序扫描, 首个方法+模式都命中的路由胜出
    /// 6. 无命中 → 404 `{"error": "Ruta no encontrada."}`
    pub async fn dispatch(
        &self,
        state: Arc<AppState>,
        method: Method,
        uri: &Uri,
        body: Bytes,
    ) -> Response {
        if method == Method::OPTIONS {
            return StatusCode::OK.into_response();
        }

        let path = self.normalize_path(uri.path());

        let matched = self.routes.iter().find_map(|route| {
            if route.method != method {
                return None;
            }
            route.pattern.matches(path).map(|params| (route, params))
        });

        let Some((route, params)) = matched else {
            tracing::debug!(method = %method, path = %path, "No route matched");
            return response::routing_error(StatusCode::NOT_FOUND, "Ruta no encontrada.");
        };

        tracing::debug!(
            method = %method,
            pattern = %route.pattern.raw(),
            ?params,
            "Dispatching request"
        );

        let future = (route.handler)(state, RequestContext { params, body });

        // handler 的 panic 不能击穿分发器
        match AssertUnwindSafe(future).catch_unwind().await {
            Ok(Ok(resp)) => resp,
            Ok(Err(err)) => err.into_response(),
            Err(_) => {
                tracing::error!(
                    method = %method,
                    pattern = %route.pattern.raw(),
                    "Handler panicked during dispatch"
                );
                response::routing_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error interno del servidor.",
                )
            }
        }
    }

    /// 剥离 base path 前缀并去掉一个结尾斜杠
    fn normalize_path<'a>(&self, path: &'a str) -> &'a str {
        let path = if self.base_path.is_empty() {
            path
        } else {
            path.strip_prefix(self.base_path.as_str()).unwrap_or(path)
        };
        trim_trailing_slash(path)
    }
}

impl Default for ApiRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteUserRepository,
    };
    use serde_json::{json, Value};

    async fn test_state() -> Arc<AppState> {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        Arc::new(AppState::new(Arc::new(SqliteUserRepository::new(pool))))
    }

    fn text_handler(
        text: &'static str,
    ) -> impl Fn(Arc<AppState>, RequestContext) -> HandlerFuture + Send + Sync + 'static {
        move |_state, _cx| {
            Box::pin(async move { Ok((StatusCode::OK, text).into_response()) })
        }
    }

    async fn body_string(resp: Response) -> String {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn dispatch(
        router: &ApiRouter,
        method: Method,
        uri: &str,
    ) -> (StatusCode, String) {
        let state = test_state().await;
        let resp = router
            .dispatch(state, method, &uri.parse::<Uri>().unwrap(), Bytes::new())
            .await;
        let status = resp.status();
        (status, body_string(resp).await)
    }

    #[tokio::test]
    async fn test_literal_route_invokes_handler() {
        let mut router = ApiRouter::new();
        router.register(Method::GET, "/api/users", text_handler("all"));

        let (status, body) = dispatch(&router, Method::GET, "/api/users").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "all");
    }

    #[tokio::test]
    async fn test_trailing_slash_is_insignificant() {
        let mut router = ApiRouter::new();
        router.register(Method::GET, "/api/users", text_handler("all"));

        let (status, body) = dispatch(&router, Method::GET, "/api/users/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "all");
    }

    #[tokio::test]
    async fn test_query_string_is_discarded() {
        let mut router = ApiRouter::new();
        router.register(Method::GET, "/api/users", text_handler("all"));

        let (status, _) = dispatch(&router, Method::GET, "/api/users?page=2").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_first_registered_route_wins() {
        let mut router = ApiRouter::new();
        router.register(Method::GET, "/api/users", text_handler("first"));
        router.register(Method::GET, "/api/users", text_handler("second"));

        let (_, body) = dispatch(&router, Method::GET, "/api/users").await;
        assert_eq!(body, "first");
    }

    #[tokio::test]
    async fn test_params_arrive_in_pattern_order() {
        let mut router = ApiRouter::new();
        router.register(Method::GET, "/api/{a}/x/{b}", |_state, cx| {
            Box::pin(async move {
                Ok((StatusCode::OK, cx.params.join(",")).into_response())
            }) as HandlerFuture
        });

        let (_, body) = dispatch(&router, Method::GET, "/api/uno/x/dos").await;
        assert_eq!(body, "uno,dos");
    }

    #[tokio::test]
    async fn test_method_mismatch_is_not_found() {
        let mut router = ApiRouter::new();
        router.register(Method::GET, "/api/users", text_handler("all"));

        let (status, body) = dispatch(&router, Method::POST, "/api/users").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value, json!({ "error": "Ruta no encontrada." }));
    }

    #[tokio::test]
    async fn test_unknown_route_is_structured_404() {
        let router = ApiRouter::new();
        let (status, body) = dispatch(&router, Method::POST, "/api/unknown").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value, json!({ "error": "Ruta no encontrada." }));
    }

    #[tokio::test]
    async fn test_options_answered_before_matching() {
        // 没有任何注册的路由也能得到 200 空响应
        let router = ApiRouter::new();
        let (status, body) = dispatch(&router, Method::OPTIONS, "/cualquier/cosa").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_base_path_is_stripped() {
        let mut router = ApiRouter::new().with_base_path("/backend");
        router.register(Method::GET, "/api/users", text_handler("all"));

        let (status, body) = dispatch(&router, Method::GET, "/backend/api/users").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "all");

        // 前缀不在时原样分发
        let (status, _) = dispatch(&router, Method::GET, "/api/users").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_handler_panic_is_isolated() {
        async fn boom(_state: Arc<AppState>, _cx: RequestContext) -> Result<Response, ApiError> {
            panic!("se rompió")
        }

        let mut router = ApiRouter::new();
        router.register(Method::GET, "/api/boom", boom);

        let (status, body) = dispatch(&router, Method::GET, "/api/boom").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value, json!({ "error": "Error interno del servidor." }));
    }

    #[tokio::test]
    async fn test_duplicate_pattern_and_empty_segment() {
        let mut router = ApiRouter::new();
        router.register(Method::GET, "/api/users/{id}", text_handler("first"));
        router.register(Method::GET, "/api/users/{id}", text_handler("second"));

        // 重复模式下先注册者胜出
        let (status, body) = dispatch(&router, Method::GET, "/api/users/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "first");

        // 空段不满足占位符: "/api/users//" 去掉一个结尾斜杠后仍有空段
        let (status, body) = dispatch(&router, Method::GET, "/api/users//").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value, json!({ "error": "Ruta no encontrada." }));
    }

    #[tokio::test]
    async fn test_handler_error_uses_message_envelope() {
        let mut router = ApiRouter::new();
        router.register(Method::GET, "/api/fallo", |_state, _cx| {
            Box::pin(async move {
                Err(ApiError::BadRequest("Datos inválidos.".to_string()))
            }) as HandlerFuture
        });

        let (status, body) = dispatch(&router, Method::GET, "/api/fallo").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value, json!({ "message": "Datos inválidos." }));
    }
}
