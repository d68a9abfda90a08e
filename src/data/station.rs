use serde::{Deserialize, Serialize};

/// One upstream metadata source in a station's fallback chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Triton Digital / StreamTheWorld now-playing feed
    Triton { call_sign: String },
    /// SomaFM channel feeds
    Somafm { channel: String },
    /// Generic JSON now-playing APIs, `{station}` in a template is replaced
    /// with the station id
    Alternative { endpoints: Vec<String> },
    /// Simulated rotation from iTunes search results
    Itunes { genre: String },
}

impl SourceConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            SourceConfig::Triton { .. } => "triton",
            SourceConfig::Somafm { .. } => "somafm",
            SourceConfig::Alternative { .. } => "alternative",
            SourceConfig::Itunes { .. } => "itunes",
        }
    }
}

/// A radio station and the ordered list of sources to ask for metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

impl Station {
    pub fn new(id: &str, name: &str, sources: Vec<SourceConfig>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            sources,
        }
    }
}

/// Built-in catalogue used when the configuration doesn't list stations
pub fn default_stations() -> Vec<Station> {
    vec![
        Station::new("hits", "Today's Hits", vec![
            SourceConfig::Triton { call_sign: "WHTZFM".to_string() },
            SourceConfig::Itunes { genre: "pop".to_string() },
        ]),
        Station::new("classic-rock", "Classic Rock", vec![
            SourceConfig::Triton { call_sign: "WAXQFM".to_string() },
            SourceConfig::Itunes { genre: "rock".to_string() },
        ]),
        Station::new("groove-salad", "Groove Salad", vec![
            SourceConfig::Somafm { channel: "groovesalad".to_string() },
        ]),
        Station::new("metal", "Metal Detector", vec![
            SourceConfig::Somafm { channel: "metal".to_string() },
            SourceConfig::Itunes { genre: "metal".to_string() },
        ]),
        Station::new("indie", "Indie Pop Rocks", vec![
            SourceConfig::Somafm { channel: "indiepop".to_string() },
            SourceConfig::Alternative {
                endpoints: vec![
                    "https://api.radioking.io/widget/radio/{station}/track/current".to_string(),
                    "https://public.radio.co/stations/{station}/status".to_string(),
                ],
            },
        ]),
        Station::new("country", "Country Roads", vec![
            SourceConfig::Itunes { genre: "country".to_string() },
        ]),
        Station::new("hiphop", "Hip Hop Nation", vec![
            SourceConfig::Itunes { genre: "hiphop".to_string() },
        ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_config_json_shape() {
        let json = r#"[
            {"type": "triton", "call_sign": "KISSFM"},
            {"type": "somafm", "channel": "metal"},
            {"type": "alternative", "endpoints": ["https://a/{station}"]},
            {"type": "itunes", "genre": "pop"}
        ]"#;
        let sources: Vec<SourceConfig> = serde_json::from_str(json).unwrap();
        assert_eq!(sources.len(), 4);
        assert_eq!(sources[0], SourceConfig::Triton { call_sign: "KISSFM".to_string() });
        assert_eq!(sources[1].kind(), "somafm");
        assert_eq!(sources[3].kind(), "itunes");
    }

    #[test]
    fn test_default_catalogue_ids_are_unique() {
        let stations = default_stations();
        let mut ids: Vec<&str> = stations.iter().map(|s| s.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), stations.len());
        assert!(stations.iter().all(|s| !s.sources.is_empty()));
    }
}
