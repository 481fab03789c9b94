use crate::application::{
    dto::TokenClaims,
    error::{ApplicationResult, AuthError},
};
use crate::domain::user::{ClientId, TokenKind, Username};
use biscuit_auth::builder::{Fact, Predicate, Term};
use chrono::{DateTime, Utc};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Rebuild claims from the facts of an authorized token. Any missing or
/// malformed fact makes the whole token invalid.
pub fn parse_claims(facts: Vec<Fact>) -> ApplicationResult<TokenClaims> {
    let ctx = ClaimsContext::from_facts(facts);
    build_claims(ctx)
}

fn build_claims(ctx: ClaimsContext) -> ApplicationResult<TokenClaims> {
    let username = ctx
        .username
        .and_then(|name| Username::new(name).ok())
        .ok_or(AuthError::InvalidToken)?;
    let client_id = ctx
        .client_id
        .and_then(|id| ClientId::new(id).ok())
        .ok_or(AuthError::InvalidToken)?;
    let kind = ctx.kind.ok_or(AuthError::InvalidToken)?;
    let token_id = ctx.token_id.ok_or(AuthError::InvalidToken)?;
    let issued_at = ctx.issued_at.ok_or(AuthError::InvalidToken)?;
    let expires_at = ctx.expires_at.ok_or(AuthError::InvalidToken)?;

    Ok(TokenClaims {
        username,
        client_id,
        kind,
        token_id,
        issued_at: DateTime::<Utc>::from(issued_at),
        expires_at: DateTime::<Utc>::from(expires_at),
    })
}

#[derive(Default)]
struct ClaimsContext {
    username: Option<String>,
    client_id: Option<String>,
    kind: Option<TokenKind>,
    token_id: Option<String>,
    issued_at: Option<SystemTime>,
    expires_at: Option<SystemTime>,
}

impl ClaimsContext {
    fn from_facts(facts: Vec<Fact>) -> Self {
        let mut ctx = ClaimsContext::default();
        for fact in facts {
            ctx.apply_predicate(fact.predicate);
        }
        ctx
    }

    fn apply_predicate(&mut self, predicate: Predicate) {
        match predicate.name.as_str() {
            "user" => self.username = first_string(&predicate),
            "client" => self.client_id = first_string(&predicate),
            "token_kind" => {
                self.kind = first_string(&predicate).and_then(|kind| kind.parse().ok())
            }
            "token_id" => self.token_id = first_string(&predicate),
            "issued_at" => self.issued_at = first_date(&predicate),
            "expires_at" => self.expires_at = first_date(&predicate),
            _ => {}
        }
    }
}

fn first_string(predicate: &Predicate) -> Option<String> {
    match predicate.terms.first() {
        Some(Term::Str(value)) => Some(value.clone()),
        _ => None,
    }
}

fn first_date(predicate: &Predicate) -> Option<SystemTime> {
    match predicate.terms.first() {
        Some(Term::Date(seconds)) => Some(UNIX_EPOCH + Duration::from_secs(*seconds)),
        _ => None,
    }
}
