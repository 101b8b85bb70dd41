//! Authentication Handlers Module
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports
//! ├── types.rs    - Request and response types
//! ├── signup.rs   - POST /api/auth/signup
//! ├── login.rs    - POST /api/auth/login
//! └── session.rs  - GET /api/auth/session, POST /api/auth/logout
//! ```

/// Request and response types
pub mod types;

/// Signup handler
pub mod signup;

/// Login handler
pub mod login;

/// Session and logout handlers
pub mod session;

pub use types::{AuthResponse, LoginRequest, SessionResponse, SignupRequest};

pub use login::login;
pub use session::{logout, session};
pub use signup::signup;
