use std::{fmt, sync::LazyLock};

use cricket_server_domain::{RecordId, ServiceError, ServiceResult};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const TOKEN_LIFETIME_HOURS: i64 = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Player,
    Coach,
    Club,
    SuperAdmin,
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActorRole::Player => "player",
            ActorRole::Coach => "coach",
            ActorRole::Club => "club",
            ActorRole::SuperAdmin => "super_admin",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: RecordId,
    pub role: ActorRole,
    pub jti: String,
    pub exp: usize,
}

impl Claims {
    pub fn new(id: RecordId, role: ActorRole) -> Self {
        Self {
            sub: id,
            role,
            jti: Uuid::new_v4().to_string(),
            exp: (chrono::Utc::now() + chrono::Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp()
                as usize,
        }
    }
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Keys {
    fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

static KEYS: LazyLock<Keys> = LazyLock::new(|| {
    let secret = read_or_generate_secret();
    Keys::new(&secret)
});

fn read_or_generate_secret() -> Vec<u8> {
    match std::env::var("CRICKET_JWT_SECRET") {
        Ok(secret) if !secret.is_empty() => secret.as_bytes().to_vec(),
        _ => {
            info!("JWT secret not found, generating a random one...");
            Uuid::new_v4().as_bytes().to_vec()
        }
    }
}

pub fn generate_jwt(claims: &Claims) -> ServiceResult<String> {
    encode(&Header::default(), claims, &KEYS.encoding)
        .map_err(|e| ServiceError::Internal(format!("Failed to sign token: {}", e)))
}

pub fn validate_jwt(token: &str) -> ServiceResult<Claims> {
    match decode::<Claims>(token, &KEYS.decoding, &Validation::default()) {
        Ok(data) => Ok(data.claims),
        Err(e) => {
            warn!("Rejected token: {}", e);
            ServiceError::unauthorized("Invalid or expired token")
        }
    }
}
