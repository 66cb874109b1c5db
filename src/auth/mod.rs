//! Authentication Module
//! Mission: Password hashing, JWT issuance, and role-gated route access

pub mod api;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, JwtHandler};
pub use middleware::{require_role, AuthSession};
