/*
 * Responsibility
 * - framework-free building blocks used by middleware and handlers
 *   - auth: bearer token → Principal
 *   - authz: (method, path) → access requirement → decision
 *   - password: bcrypt hash / match
 */
pub mod auth;
pub mod authz;
pub mod password;
