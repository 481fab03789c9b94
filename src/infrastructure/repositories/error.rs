use crate::domain::errors::DomainError;

const CNT_USER_PKEY: &str = "users_pkey";
const CNT_CLIENT_PKEY: &str = "clients_pkey";
const CNT_TOKEN_USER: &str = "user_tokens_username_fkey";
const CNT_TOKEN_CLIENT: &str = "user_tokens_client_id_fkey";

pub fn map_sqlx(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(constraint) = db_err.constraint() {
                return match constraint {
                    CNT_USER_PKEY => DomainError::Conflict("username already exists".into()),
                    CNT_CLIENT_PKEY => DomainError::Conflict("client already exists".into()),
                    CNT_TOKEN_USER => DomainError::NotFound("user not found".into()),
                    CNT_TOKEN_CLIENT => DomainError::NotFound("client not found".into()),
                    other => {
                        DomainError::Persistence(format!("database constraint violation: {other}"))
                    }
                };
            }

            if let Some(code) = db_err.code() {
                match code.as_ref() {
                    "23505" => {
                        return DomainError::Conflict("unique constraint violated".into());
                    }
                    "23503" => {
                        return DomainError::NotFound("referenced record not found".into());
                    }
                    _ => {}
                }
            }

            DomainError::Persistence(db_err.message().to_string())
        }
        _ => DomainError::Persistence(err.to_string()),
    }
}
