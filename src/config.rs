use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
}

/// Spoonacular-compatible recipe search API.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeApiConfig {
    pub base_url: String,
    pub api_key: String,
}

/// OpenAI-compatible chat completion endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub recipe_api: RecipeApiConfig,
    pub llm: LlmConfig,
    pub http_timeout_secs: u64,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "mealplan".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "mealplan-users".into()),
            ttl_minutes: env_or("JWT_TTL_MINUTES", 60),
            refresh_ttl_minutes: env_or("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14),
        };
        let storage = StorageConfig {
            endpoint: std::env::var("MINIO_ENDPOINT")?,
            bucket: std::env::var("MINIO_BUCKET")?,
            access_key: std::env::var("MINIO_ACCESS_KEY")?,
            secret_key: std::env::var("MINIO_SECRET_KEY")?,
        };
        let recipe_api = RecipeApiConfig {
            base_url: std::env::var("RECIPE_API_URL")
                .unwrap_or_else(|_| "https://api.spoonacular.com".into()),
            api_key: std::env::var("RECIPE_API_KEY")?,
        };
        let llm = LlmConfig {
            base_url: std::env::var("LLM_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            api_key: std::env::var("LLM_API_KEY")?,
            model: std::env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into()),
            temperature: env_or("LLM_TEMPERATURE", 0.7),
        };
        Ok(Self {
            database_url,
            jwt,
            storage,
            recipe_api,
            llm,
            http_timeout_secs: env_or("HTTP_TIMEOUT_SECS", 30),
        })
    }
}
