//! # Middleware Module
//!
//! Middleware intercepts HTTP requests before they reach a handler.
//! It can short-circuit the request (return an error before the handler runs).
//!
//! ## Our Middleware
//! - `csrf`: Refuses state-changing requests without a matching CSRF token.
//!   Applied to login, registration and password reset; logout is exempt.

pub mod csrf;
