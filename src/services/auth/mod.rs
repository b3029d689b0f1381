pub mod access_jwt;
pub mod authenticator;
pub mod context;
pub mod error;
pub mod factory;
pub mod headers;
pub mod principal;
pub mod scope;
pub mod token;

pub use access_jwt::{JwtTokenValidator, TokenValidator};
pub use authenticator::{AuthHandler, BearerAuthenticator};
pub use context::AuthorizationContext;
pub use error::AuthError;
pub use factory::build_token_validator;
pub use principal::PrincipalResolver;
