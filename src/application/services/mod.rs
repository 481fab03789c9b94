// src/application/services/mod.rs
mod seed;

use std::sync::Arc;

use crate::{
    application::{
        ApplicationResult,
        commands::{
            auth::{AuthCommandService, AuthPolicy},
            clients::ClientCommandService,
            users::UserCommandService,
        },
        dto::AuthenticatedUser,
        ports::{
            authorization_code::AuthorizationCodeStore,
            security::{PasswordHasher, TokenCodec},
            time::Clock,
        },
        queries::users::UserQueryService,
    },
    domain::{
        client::ClientRepository,
        user::{TokenRepository, UserRepository},
    },
};

pub use seed::{SeedDefaults, SeedReport};

pub struct ApplicationServices {
    pub auth_commands: Arc<AuthCommandService>,
    pub user_commands: Arc<UserCommandService>,
    pub client_commands: Arc<ClientCommandService>,
    pub user_queries: Arc<UserQueryService>,
    code_store: Arc<dyn AuthorizationCodeStore>,
}

impl ApplicationServices {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        client_repo: Arc<dyn ClientRepository>,
        token_repo: Arc<dyn TokenRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_codec: Arc<dyn TokenCodec>,
        code_store: Arc<dyn AuthorizationCodeStore>,
        clock: Arc<dyn Clock>,
        policy: AuthPolicy,
    ) -> Self {
        let auth_commands = Arc::new(AuthCommandService::new(
            Arc::clone(&user_repo),
            Arc::clone(&client_repo),
            Arc::clone(&token_repo),
            Arc::clone(&password_hasher),
            Arc::clone(&token_codec),
            Arc::clone(&code_store),
            Arc::clone(&clock),
            policy,
        ));

        let user_commands = Arc::new(UserCommandService::new(
            Arc::clone(&user_repo),
            Arc::clone(&password_hasher),
            Arc::clone(&clock),
        ));

        let client_commands = Arc::new(ClientCommandService::new(
            Arc::clone(&client_repo),
            Arc::clone(&user_repo),
            Arc::clone(&password_hasher),
            Arc::clone(&clock),
        ));

        let user_queries = Arc::new(UserQueryService::new(user_repo));

        Self {
            auth_commands,
            user_commands,
            client_commands,
            user_queries,
            code_store,
        }
    }

    pub fn code_store(&self) -> Arc<dyn AuthorizationCodeStore> {
        Arc::clone(&self.code_store)
    }

    /// Authenticate a raw bearer access token. Protected routes resolve the
    /// caller through this.
    pub async fn authenticate_request(&self, token: &str) -> ApplicationResult<AuthenticatedUser> {
        self.auth_commands.authenticate_request(token).await
    }
}
