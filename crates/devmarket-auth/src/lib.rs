//! Access-control primitives for the devmarket service.
//!
//! Everything in this crate is pure: no I/O, no HTTP types, no store
//! access. The server crate adapts these decisions onto actix-web.
//!
//! - [`Role`] — closed enumeration of session privilege levels
//! - [`SessionKeys`] — JWT session token issue/decode
//! - [`RouteClass`] — request path classification
//! - [`decide`] — the gate policy table

pub mod gate;
pub mod role;
pub mod route;
pub mod token;

pub use gate::{decide, DenyReason, GateDecision, HOME, SIGN_IN};
pub use role::Role;
pub use route::RouteClass;
pub use token::{SessionClaims, SessionKeys};
