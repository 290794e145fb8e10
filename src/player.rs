use crate::logger::{log_error, log_line};
use crate::models::Video;

/// The hosting platform we can actually hand off to.
pub const TRAILER_SITE: &str = "YouTube";
pub const TRAILER_TYPE: &str = "Trailer";

/// Pick the video to play for a movie: the first proper YouTube trailer,
/// falling back to the first descriptor of any kind. An empty list means no
/// playback and no overlay.
pub fn pick_trailer(videos: &[Video]) -> Option<&Video> {
    videos
        .iter()
        .find(|v| v.kind == TRAILER_TYPE && v.site == TRAILER_SITE)
        .or_else(|| videos.first())
}

/// Embed URL for the overlay: autoplay on, related suggestions off.
pub fn embed_url(key: &str) -> String {
    format!("https://www.youtube.com/embed/{}?autoplay=1&rel=0", key)
}

/// Hand playback off to the system browser. egui has no embedded web surface,
/// so the overlay's play control opens the embed URL externally.
pub fn open_trailer(key: &str) {
    let url = embed_url(key);
    log_line(&format!("opening trailer {}", url));
    if let Err(e) = webbrowser::open(&url) {
        log_error("failed to open trailer in browser", &e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(kind: &str, site: &str, key: &str) -> Video {
        Video {
            id: key.to_string(),
            key: key.to_string(),
            name: format!("{} clip", kind),
            site: site.to_string(),
            kind: kind.to_string(),
        }
    }

    #[test]
    fn prefers_youtube_trailer_over_earlier_entries() {
        let videos = vec![
            video("Teaser", "YouTube", "teaser"),
            video("Trailer", "Vimeo", "wrong-site"),
            video("Trailer", "YouTube", "the-one"),
        ];
        assert_eq!(pick_trailer(&videos).unwrap().key, "the-one");
    }

    #[test]
    fn falls_back_to_first_video_in_original_order() {
        let videos = vec![
            video("Teaser", "YouTube", "first"),
            video("Clip", "YouTube", "second"),
        ];
        assert_eq!(pick_trailer(&videos).unwrap().key, "first");
    }

    #[test]
    fn empty_list_selects_nothing() {
        assert!(pick_trailer(&[]).is_none());
    }

    #[test]
    fn embed_url_enables_autoplay_and_hides_suggestions() {
        assert_eq!(
            embed_url("dQw4w9WgXcQ"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=1&rel=0"
        );
    }
}
