use super::ApplicationServices;
use crate::application::{
    ApplicationResult,
    commands::{clients::CreateClientCommand, users::RegisterUserCommand},
    error::ApplicationError,
};
use crate::domain::errors::DomainError;

fn already_exists(err: &ApplicationError) -> bool {
    matches!(
        err,
        ApplicationError::Conflict(_) | ApplicationError::Domain(DomainError::Conflict(_))
    )
}

/// Records created at startup when missing.
#[derive(Debug, Clone)]
pub struct SeedDefaults {
    pub client_id: String,
    pub client_secret: String,
    pub admin_username: String,
    pub admin_password: String,
    pub admin_display_name: String,
}

impl Default for SeedDefaults {
    fn default() -> Self {
        Self {
            client_id: "clientID1".into(),
            client_secret: "clientSecret".into(),
            admin_username: "secretuser".into(),
            admin_password: "secretpassword".into(),
            admin_display_name: "Super Admin".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub client_created: bool,
    pub admin_created: bool,
}

impl ApplicationServices {
    /// Ensure the default client and admin exist. Existing records are left untouched.
    pub async fn seed(&self, defaults: &SeedDefaults) -> ApplicationResult<SeedReport> {
        let client_created = match self
            .client_commands
            .create_client(CreateClientCommand {
                client_id: defaults.client_id.clone(),
                client_secret: defaults.client_secret.clone(),
            })
            .await
        {
            Ok(_) => true,
            Err(err) if already_exists(&err) => false,
            Err(err) => return Err(err),
        };

        let admin_created = match self
            .user_commands
            .create_user(RegisterUserCommand {
                username: defaults.admin_username.clone(),
                password: defaults.admin_password.clone(),
                display_name: defaults.admin_display_name.clone(),
                is_admin: true,
                is_active: true,
            })
            .await
        {
            Ok(_) => true,
            Err(err) if already_exists(&err) => false,
            Err(err) => return Err(err),
        };

        if client_created || admin_created {
            tracing::info!(client_created, admin_created, "seeded default records");
        }

        Ok(SeedReport {
            client_created,
            admin_created,
        })
    }
}
