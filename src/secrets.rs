// API keys compiled in from secrets.txt by build.rs

/// Gemini API key from secrets.txt, else the GEMINI_API_KEY environment variable
pub fn gemini_api_key() -> Option<String> {
    option_env!("GEMINI_APIKEY")
        .map(str::to_string)
        .or_else(|| std::env::var("GEMINI_API_KEY").ok())
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}
