//! # Open House Config
//!
//! Configuration types for the Open House API, loaded from environment
//! variables once at process start:
//!
//! - [`jwt`]: bearer token signing configuration
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`event`]: event-specific settings (public base URL, privileged phones,
//!   the UTC offset that defines a calendar day)
//! - [`server`]: listen address (`HOST`, `PORT`, default port 4000)
//!
//! # Example
//!
//! ```ignore
//! use openhouse_config::{CorsConfig, EventConfig, JwtConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let event_config = EventConfig::from_env();
//! ```

pub mod cors;
pub mod event;
pub mod jwt;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use event::EventConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;
