//! Program arguments and application state.
use clap::Parser;
use directory_database::MongoArgs;
use http::HeaderValue;
use jsonwebtoken::{DecodingKey, EncodingKey};

/// Command line arguments.
#[derive(Parser, Clone)]
#[clap(about, version, author)]
pub struct ProgramArgs {
    #[clap(flatten)]
    pub mongo_opts: MongoArgs,
    #[clap(long, env = "JWT_SECRET")]
    #[clap(help = "HMAC secret used to sign and verify bearer tokens")]
    pub jwt_secret: String,
    #[clap(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,
    #[clap(long = "allow-origin", env = "ALLOWED_ORIGINS", value_delimiter = ',')]
    #[clap(default_value = "http://localhost:5173")]
    #[clap(help = "Cross-origin caller addresses allowed to reach the API")]
    pub allowed_origins: Vec<String>,
}

impl ProgramArgs {
    pub fn mongo_opts(self) -> MongoArgs {
        self.mongo_opts
    }
}

/// Application state shared by every request.
#[derive(Clone)]
pub struct AppConfig {
    jwt_encoding_key: EncodingKey,
    jwt_decoding_key: DecodingKey,
    allowed_origins: Vec<HeaderValue>,
}

impl AppConfig {
    /// Create application config from the signing secret and the
    /// allowed cross-origin callers.
    pub fn new(secret: &[u8], origins: &[String]) -> Self {
        Self {
            jwt_encoding_key: EncodingKey::from_secret(secret),
            jwt_decoding_key: DecodingKey::from_secret(secret),
            allowed_origins: origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect(),
        }
    }

    /// Get a reference to the JWT encoding key.
    pub fn jwt_encoding_key(&self) -> &EncodingKey {
        &self.jwt_encoding_key
    }

    /// Get a reference to the JWT decoding key.
    pub fn jwt_decoding_key(&self) -> &DecodingKey {
        &self.jwt_decoding_key
    }

    /// Origins allowed by the CORS layer.
    pub fn allowed_origins(&self) -> &[HeaderValue] {
        &self.allowed_origins
    }
}
