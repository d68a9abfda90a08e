//! Static lookup tables for the keyword classifier.
//!
//! All entries are lowercase ASCII; the classifier transliterates and
//! lowercases its input before matching.

/// Political and campaign content that is suppressed entirely
pub const BLOCKED_PHRASES: &[&str] = &[
    "maga",
    "make america great",
    "trump 2024",
    "trump 2028",
    "biden 2024",
    "harris 2024",
    "paid for by",
    "political ad",
    "political committee",
    "campaign ad",
    "super pac",
    "vote for",
    "vote yes on",
    "vote no on",
    "approved this message",
];

/// Markers of a commercial break
pub const COMMERCIAL_KEYWORDS: &[&str] = &[
    "commercial",
    "advertisement",
    "sponsored by",
    "brought to you by",
    "presented by",
    "ad break",
    "spot break",
    "promo",
    "call now",
    "limited time",
    "visit your local",
];

/// A known advertiser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brand {
    /// Lowercase keyword to look for
    pub keyword: &'static str,
    pub display_name: &'static str,
    pub logo_url: &'static str,
}

const fn brand(keyword: &'static str, display_name: &'static str, logo_url: &'static str) -> Brand {
    Brand { keyword, display_name, logo_url }
}

/// Known advertisers, scanned in order
pub const BRANDS: &[Brand] = &[
    brand("gain", "Gain", "https://logo.clearbit.com/gainlaundry.com"),
    brand("tide", "Tide", "https://logo.clearbit.com/tide.com"),
    brand("mcdonald", "McDonald's", "https://logo.clearbit.com/mcdonalds.com"),
    brand("coca-cola", "Coca-Cola", "https://logo.clearbit.com/coca-cola.com"),
    brand("coke", "Coca-Cola", "https://logo.clearbit.com/coca-cola.com"),
    brand("pepsi", "Pepsi", "https://logo.clearbit.com/pepsi.com"),
    brand("geico", "GEICO", "https://logo.clearbit.com/geico.com"),
    brand("state farm", "State Farm", "https://logo.clearbit.com/statefarm.com"),
    brand("progressive", "Progressive", "https://logo.clearbit.com/progressive.com"),
    brand("walmart", "Walmart", "https://logo.clearbit.com/walmart.com"),
    brand("home depot", "The Home Depot", "https://logo.clearbit.com/homedepot.com"),
    brand("verizon", "Verizon", "https://logo.clearbit.com/verizon.com"),
    brand("t-mobile", "T-Mobile", "https://logo.clearbit.com/t-mobile.com"),
    brand("at&t", "AT&T", "https://logo.clearbit.com/att.com"),
    brand("toyota", "Toyota", "https://logo.clearbit.com/toyota.com"),
    brand("ford", "Ford", "https://logo.clearbit.com/ford.com"),
    brand("amazon", "Amazon", "https://logo.clearbit.com/amazon.com"),
    brand("spotify", "Spotify", "https://logo.clearbit.com/spotify.com"),
    brand("subway", "Subway", "https://logo.clearbit.com/subway.com"),
    brand("taco bell", "Taco Bell", "https://logo.clearbit.com/tacobell.com"),
];

/// Talk segments that aren't music but aren't ads either
pub const RADIO_HOST_KEYWORDS: &[&str] = &[
    "dj ",
    "news",
    "traffic",
    "weather",
    "morning show",
    "talk show",
    "interview",
    "live from",
    "station id",
    "on air with",
];
