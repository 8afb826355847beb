// Actix-Web test fixture - scoped routes, route calls and error handlers
use actix_web::{
    dev::ServiceResponse,
    http::StatusCode,
    middleware::{ErrorHandlerResponse, ErrorHandlers},
    web, App, HttpResponse, Responder, Result,
};

/// List users.
/// ---
/// responses:
///   200:
///     description: All users
#[actix_web::get("/users")]
async fn get_users() -> impl Responder {
    HttpResponse::Ok().json(Vec::<String>::new())
}

/// responses:
///   200:
///     description: The user
#[actix_web::get("/users/{id}")]
async fn get_user(path: web::Path<u32>) -> impl Responder {
    HttpResponse::Ok().body(path.into_inner().to_string())
}

#[actix_web::delete("/users/{id}")]
async fn delete_user(path: web::Path<u32>) -> impl Responder {
    HttpResponse::NoContent()
}

/// Liveness probe.
#[actix_web::get("/health")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

/// Current server version.
async fn version() -> impl Responder {
    HttpResponse::Ok().body("1.0.0")
}

/// required:
///   - message
/// properties:
///   message:
///     type: string
/// type: object
fn handle_bad_request<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    Ok(ErrorHandlerResponse::Response(res.map_into_left_body()))
}

/// 500:
///   type: object
///   properties:
///     trace_id:
///       type: string
fn handle_internal_error<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    Ok(ErrorHandlerResponse::Response(res.map_into_left_body()))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(get_users)
            .service(get_user)
            .service(delete_user)
            .route("/version", web::get().to(version)),
    )
    .service(health_check);
}

pub fn app() {
    App::new()
        .wrap(
            ErrorHandlers::new()
                .handler(StatusCode::BAD_REQUEST, handle_bad_request)
                .handler(StatusCode::INTERNAL_SERVER_ERROR, handle_internal_error),
        )
        .configure(configure_routes);
}
