use std::any::Any;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{self, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::handlers::{protected, public};
use crate::middleware::{jwt_auth_middleware, validate_user_middleware};
use crate::state::AppState;

/// Build the full router for `state`
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let protect_user_routes = state.policy.protect_user_routes;

    let router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/login", post(public::login_post))
        .merge(user_public_routes(protect_user_routes))
        // Protected
        .merge(protected_routes(state.clone(), protect_user_routes))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(cors_layer(&config.security))
                .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes)),
        );

    let router = if config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

fn user_public_routes(protect_user_routes: bool) -> Router<AppState> {
    use public::users;

    let router = Router::new().route("/users", post(users::register));

    if protect_user_routes {
        router
    } else {
        router.route("/users/:Name", get(users::show).delete(users::deregister))
    }
}

fn protected_routes(state: AppState, protect_user_routes: bool) -> Router<AppState> {
    use protected::{movies, users};

    let router = Router::new()
        .route("/movies", get(movies::list))
        .route("/movies/:Title", get(movies::by_title))
        .route("/movies/genre/:Name", get(movies::genre))
        .route("/movies/director/:Name", get(movies::director))
        .route(
            "/users/:Name/:movieID",
            post(users::add_favorite).delete(users::remove_favorite),
        );

    let router = if protect_user_routes {
        router.route(
            "/users/:Name",
            get(public::users::show)
                .put(users::update)
                .delete(users::deregister),
        )
    } else {
        router.route("/users/:Name", put(users::update))
    };

    // route_layer runs bottom-up: the token is checked before the user lookup
    router
        .route_layer(middleware::from_fn_with_state(state.clone(), validate_user_middleware))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(cors::Any)
        .allow_headers(cors::Any)
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    tracing::error!("Handler panicked: {}", detail);

    (StatusCode::INTERNAL_SERVER_ERROR, "Something isn't working!").into_response()
}
