use std::env;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum ImageProvider {
    Http,
    Fake,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzerKind {
    Keyword,
    Claude,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Unset means the in-memory store is used.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,

    pub image_provider: ImageProvider,
    pub image_api_url: String,
    pub image_api_key: String,
    pub image_model: String,
    pub image_timeout_secs: u64,

    pub emotion_analyzer: AnalyzerKind,
    pub claude_api_key: String,
    pub claude_model: String,
    pub claude_api_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8005".into())
                .parse()
                .expect("PORT must be a number"),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3005".into()),

            image_provider: match env::var("IMAGE_PROVIDER")
                .unwrap_or_else(|_| "fake".into())
                .to_lowercase()
                .as_str()
            {
                "http" => ImageProvider::Http,
                "fake" => ImageProvider::Fake,
                other => panic!("IMAGE_PROVIDER must be 'http' or 'fake', got '{}'", other),
            },
            image_api_url: env::var("IMAGE_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1/images/generations".into()),
            image_api_key: env::var("IMAGE_API_KEY").unwrap_or_else(|_| String::new()),
            image_model: env::var("IMAGE_MODEL").unwrap_or_else(|_| "dall-e-3".into()),
            image_timeout_secs: env::var("IMAGE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".into())
                .parse()
                .expect("IMAGE_TIMEOUT_SECS must be a number"),

            emotion_analyzer: match env::var("EMOTION_ANALYZER")
                .unwrap_or_else(|_| "keyword".into())
                .to_lowercase()
                .as_str()
            {
                "keyword" => AnalyzerKind::Keyword,
                "claude" => AnalyzerKind::Claude,
                other => panic!("EMOTION_ANALYZER must be 'keyword' or 'claude', got '{}'", other),
            },
            claude_api_key: env::var("CLAUDE_API_KEY").unwrap_or_else(|_| String::new()),
            claude_model: env::var("CLAUDE_MODEL")
                .unwrap_or_else(|_| "claude-sonnet-4-20250514".into()),
            claude_api_url: env::var("CLAUDE_API_URL")
                .unwrap_or_else(|_| "https://api.anthropic.com/v1/messages".into()),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn image_timeout(&self) -> Duration {
        Duration::from_secs(self.image_timeout_secs)
    }
}

#[cfg(test)]
impl Config {
    /// Defaults with no external services configured.
    pub fn for_tests() -> Self {
        Self {
            database_url: None,
            host: "127.0.0.1".into(),
            port: 0,
            frontend_url: "http://localhost:3005".into(),
            image_provider: ImageProvider::Fake,
            image_api_url: String::new(),
            image_api_key: String::new(),
            image_model: "test".into(),
            image_timeout_secs: 5,
            emotion_analyzer: AnalyzerKind::Keyword,
            claude_api_key: String::new(),
            claude_model: "test".into(),
            claude_api_url: String::new(),
        }
    }
}
