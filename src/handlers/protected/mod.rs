// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Middleware: jwt_auth_middleware then validate_user_middleware. Handlers that
// mutate an account also check that the token subject owns it.

pub mod movies;
pub mod users;
