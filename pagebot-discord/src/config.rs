/// Discord REST base URL used when none is configured.
pub const DEFAULT_API_URL: &str = "https://discord.com/api/v10";

#[derive(Debug, Clone)]
pub struct DiscordConfig {
    pub bot_token: String,
    pub application_id: String,
    pub api_url: String,
}

impl DiscordConfig {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            application_id: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }

    pub fn with_application_id(mut self, application_id: impl Into<String>) -> Self {
        self.application_id = application_id.into();
        self
    }

    /// `None` keeps the current URL.
    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        self
    }

    /// `api_url` joined with `path`, without doubled slashes.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
