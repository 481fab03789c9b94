mod authenticate;
mod authorize;
mod client_registry;
mod credentials;
mod exchange;
mod logout;
mod refresh;
mod service;

pub use authorize::AuthorizeCommand;
pub use client_registry::ClientRegistry;
pub use credentials::CredentialVerifier;
pub use exchange::ExchangeCodeCommand;
pub use logout::LogoutCommand;
pub use refresh::RefreshTokenCommand;
pub use service::{AuthCommandService, AuthPolicy};
