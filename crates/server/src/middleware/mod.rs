//! HTTP middleware and extractors.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (recorded on the span, echoed in the response)
//! 4. Session layer (tower-sessions with `PostgreSQL` store)

pub mod auth;
pub mod locale;
pub mod request_id;
pub mod session;

pub use auth::{AuthenticatedUser, OptionalUser, clear_current_user, set_current_user};
pub use locale::RequestLocale;
pub use request_id::{REQUEST_ID_HEADER, make_request_span, request_id_middleware};
pub use session::{create_session_layer, create_session_store};
