/*
 * Responsibility
 * - public entry points of each middleware (apply functions)
 * - the order they are stacked in lives in app::build_router
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
