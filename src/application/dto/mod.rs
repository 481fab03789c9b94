pub mod auth;
pub mod clients;
pub mod users;

pub use auth::{
    AuthenticatedUser, AuthorizationCodeDto, SessionDto, TokenClaims, TokenPairDto, TokenSubject,
};
pub use clients::ClientDto;
pub use users::UserDto;
