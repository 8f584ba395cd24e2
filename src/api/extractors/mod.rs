/*!
 * Extractors handing middleware results to handlers.
 *
 * Public API:
 * - CurrentPrincipal
 */
mod current_principal;

pub use current_principal::CurrentPrincipal;
