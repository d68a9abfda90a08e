use crate::data::{ClassificationVerdict, DisplayContent, TrackMetadata};

/// Map a verdict and the original track to what the listener sees.
///
/// Blocked content is shown as a generic live stream and never as an ad.
pub fn to_display_content(verdict: &ClassificationVerdict, original: &TrackMetadata) -> DisplayContent {
    if verdict.is_blocked {
        return DisplayContent {
            title: "Live Stream".to_string(),
            artist: "On Air".to_string(),
            album: "Radio Broadcast".to_string(),
            artwork: None,
            is_ad: false,
        };
    }

    if verdict.is_ad {
        if let (Some(brand), Some(logo)) = (&verdict.brand_name, &verdict.brand_logo_url) {
            return DisplayContent {
                title: format!("{} Commercial", brand),
                artist: "Advertisement".to_string(),
                album: "Commercial Break".to_string(),
                artwork: Some(logo.clone()),
                is_ad: true,
            };
        }

        return DisplayContent {
            title: "Commercial Break".to_string(),
            artist: "Advertisement".to_string(),
            album: "Radio Commercial".to_string(),
            artwork: None,
            is_ad: true,
        };
    }

    DisplayContent {
        title: original.title.clone(),
        artist: original.artist.clone(),
        album: original.album.clone().unwrap_or_default(),
        artwork: original.artwork.clone(),
        is_ad: false,
    }
}
