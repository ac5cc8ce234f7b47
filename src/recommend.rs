//! Recommendation bridge.
//!
//! Turns recent listening history into a prompt, asks the generative service
//! for suggestions, and pulls a JSON array back out of whatever free text the
//! model returns. Extraction is best effort: a missing or unparsable array
//! yields an empty list, never an error.

use crate::{
    Res,
    error::Error,
    gemini::TextGenerator,
    server::AppState,
    spotify::player,
    types::{PlayRecord, RecommendationItem},
    utils,
};

/// Number of recent plays embedded in the prompt.
pub const PROMPT_TRACKS: usize = 5;

pub fn build_prompt(recent: &[PlayRecord], mood: Option<&str>) -> String {
    let track_info = recent
        .iter()
        .take(PROMPT_TRACKS)
        .map(|record| match record.primary_artist() {
            Some(artist) => format!("- {} by {}", record.track.name, artist),
            None => format!("- {}", record.track.name),
        })
        .collect::<Vec<_>>()
        .join("\n");

    let mood_line = mood
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(|m| format!("The listener is feeling {m}.\n\n"))
        .unwrap_or_default();

    format!(
        "You are a music recommendation expert. Based on these recently played tracks:\n\
         {track_info}\n\n\
         {mood_line}\
         Recommend 5 songs that would be perfect for this listener. Consider the musical style, \
         energy, and mood of their recent tracks.\n\
         Format your response as a JSON array with 'artist' and 'track' fields only. Example:\n\
         [\n    {{\"artist\": \"Artist Name\", \"track\": \"Track Name\"}},\n    ...\n]\n"
    )
}

/// Parses the bracketed JSON array out of raw model output.
///
/// Returns an empty list when there is no `[`..`]` span or it does not parse
/// as a list of `{artist, track}` objects.
pub fn parse_recommendations(text: &str) -> Vec<RecommendationItem> {
    let Some(json_str) = utils::extract_json_array(text) else {
        tracing::error!(response = %text, "No JSON array found in response");
        return Vec::new();
    };

    match serde_json::from_str::<Vec<RecommendationItem>>(json_str) {
        Ok(items) => items,
        Err(e) => {
            tracing::error!(error = %e, response = %text, "Error parsing JSON from response");
            Vec::new()
        }
    }
}

/// Asks the generator for recommendations. Never fails; any generator error
/// degrades to an empty list.
pub async fn generate_recommendations(
    generator: &dyn TextGenerator,
    user_id: &str,
    recent: &[PlayRecord],
    mood: Option<&str>,
) -> Vec<RecommendationItem> {
    tracing::info!(user_id, mood = mood.unwrap_or(""), "Getting recommendations");

    let prompt = build_prompt(recent, mood);
    tracing::debug!(%prompt, "Sending prompt to generator");

    match generator.generate(&prompt).await {
        Ok(text) => {
            tracing::debug!(response = %text, "Received response from generator");
            parse_recommendations(&text)
        }
        Err(e) => {
            tracing::error!(error = %e, "Error in generate_recommendations");
            Vec::new()
        }
    }
}

/// Bearer-protected orchestration behind `GET /recommendations`.
///
/// # Errors
///
/// - [`Error::Unauthorized`] when `authorization` is absent or not a bearer
///   credential; nothing upstream is contacted
/// - [`Error::Upstream`] when recent plays or the profile cannot be fetched;
///   the generator is not called
pub async fn get_personalized_recommendations(
    state: &AppState,
    authorization: Option<&str>,
    mood: Option<&str>,
) -> Res<Vec<RecommendationItem>> {
    let header = authorization
        .ok_or_else(|| Error::Unauthorized("Missing authorization header".into()))?;
    let access_token = utils::parse_bearer(header)
        .ok_or_else(|| Error::Unauthorized("Malformed authorization header".into()))?;

    let recent = player::fetch_recent_plays(&state.http, &state.config, access_token).await?;
    let profile = player::fetch_profile(&state.http, &state.config, access_token).await?;

    Ok(generate_recommendations(state.generator.as_ref(), &profile.id, &recent, mood).await)
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;

    use super::*;
    use crate::types::{PlayedTrack, TrackArtist};

    struct Canned {
        reply: Option<&'static str>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl TextGenerator for Canned {
        async fn generate(&self, _prompt: &str) -> Res<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply
                .map(str::to_string)
                .ok_or_else(|| Error::Upstream("model unavailable".into()))
        }
    }

    fn canned(reply: Option<&'static str>) -> Canned {
        Canned {
            reply,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn play(name: &str, artist: &str) -> PlayRecord {
        PlayRecord {
            track: PlayedTrack {
                id: None,
                name: name.to_string(),
                artists: vec![TrackArtist {
                    id: None,
                    name: artist.to_string(),
                }],
            },
            played_at: None,
        }
    }

    #[test]
    fn parses_array_surrounded_by_noise() {
        let items = parse_recommendations(r#"noise [{"artist":"A","track":"B"}] trailing"#);
        assert_eq!(
            items,
            vec![RecommendationItem {
                artist: "A".into(),
                track: "B".into()
            }]
        );
    }

    #[test]
    fn text_without_brackets_yields_nothing() {
        assert!(parse_recommendations("I could not think of anything.").is_empty());
        assert!(parse_recommendations("] backwards [").is_empty());
    }

    #[test]
    fn unparsable_array_yields_nothing() {
        assert!(parse_recommendations("[{\"artist\": \"A\"}]").is_empty());
        assert!(parse_recommendations("[not json]").is_empty());
    }

    #[test]
    fn prompt_uses_five_most_recent_tracks_and_mood() {
        let recent: Vec<_> = (1..=7)
            .map(|i| play(&format!("Song {i}"), &format!("Artist {i}")))
            .collect();

        let prompt = build_prompt(&recent, Some(" melancholic "));
        assert!(prompt.contains("- Song 1 by Artist 1"));
        assert!(prompt.contains("- Song 5 by Artist 5"));
        assert!(!prompt.contains("Song 6"));
        assert!(prompt.contains("The listener is feeling melancholic."));
    }

    #[test]
    fn prompt_omits_blank_mood() {
        let prompt = build_prompt(&[play("Song", "Artist")], Some("   "));
        assert!(!prompt.contains("The listener is feeling"));

        let prompt = build_prompt(&[play("Song", "Artist")], None);
        assert!(!prompt.contains("The listener is feeling"));
    }

    #[tokio::test]
    async fn generator_failure_degrades_to_empty() {
        let generator = canned(None);
        let items =
            generate_recommendations(&generator, "user", &[play("Song", "Artist")], None).await;

        assert!(items.is_empty());
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn generator_reply_is_parsed() {
        let generator = canned(Some(
            "Sure!\n```json\n[{\"artist\": \"Boards of Canada\", \"track\": \"Roygbiv\"}]\n```",
        ));
        let items = generate_recommendations(&generator, "user", &[], Some("calm")).await;

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].artist, "Boards of Canada");
        assert_eq!(items[0].track, "Roygbiv");
    }
}
