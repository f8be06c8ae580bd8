//! Static show catalog and the video entry type read from settings.

use engine::graphics::{Color, rgb};
use serde::{Deserialize, Serialize};

/// Whether the streaming channel should open a series page or play a movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Series,
    Movie,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Series => "series",
            MediaType::Movie => "movie",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Show {
    pub name: &'static str,
    /// Channel app id on the set-top box.
    pub channel: u32,
    pub content_id: &'static str,
    pub media_type: MediaType,
    pub color: Color,
    /// Card art under the assets directory; drawn art is used when absent.
    pub image: Option<&'static str>,
}

const fn show(
    name: &'static str,
    channel: u32,
    content_id: &'static str,
    media_type: MediaType,
    color: Color,
    image: Option<&'static str>,
) -> Show {
    Show {
        name,
        channel,
        content_id,
        media_type,
        color,
        image,
    }
}

use MediaType::{Movie, Series};

pub const SHOWS: [Show; 13] = [
    show("Bluey", 291097, "fa6973b9-e7cf-49fb-81a2-d4908e4bf694", Series, rgb(0, 150, 255), Some("bluey.png")),
    show("Little Mermaid", 291097, "f7643452-fe64-4b05-8f09-c8bea9b2dd60", Movie, rgb(0, 190, 210), Some("little_mermaid.png")),
    show("Frozen", 291097, "04c97b72-504b-47f2-9c6f-fe13d9aea82f", Movie, rgb(130, 200, 245), Some("frozen.png")),
    show("Aladdin", 291097, "bfad6284-a0aa-4ae1-8469-dc1653121dbb", Movie, rgb(100, 50, 150), Some("aladdin.png")),
    show("Lion King", 291097, "87524f44-a8ea-4b08-b4d8-39103bed3eaa", Movie, rgb(255, 180, 60), Some("lion_king.png")),
    show("K-Pop Demon H.", 12, "81498621", Movie, rgb(255, 50, 130), Some("kpop.png")),
    show("Moana", 291097, "e8896bfa-1052-41f7-ae2e-00255d77cf05", Movie, rgb(0, 160, 180), Some("moana.png")),
    show("Princess & Frog", 291097, "2349fffc-2124-4eca-b5e5-a8bb97e569c4", Movie, rgb(0, 160, 80), Some("princess_frog.png")),
    show("Elmo", 61322, "f175ce7b-ab72-4ac9-a029-c8c29bd17b7c", Series, rgb(220, 30, 30), Some("elmo.png")),
    show("Ms. Rachel", 12, "81975233", Series, rgb(255, 180, 220), Some("ms_rachel.png")),
    show("Wall-E", 291097, "280395a4-d5ef-4dd0-bd09-d91c31593d3d", Movie, rgb(139, 90, 43), None),
    show("Toy Story", 291097, "f6174ebf-cb92-453c-a52b-62bb3576e402", Movie, rgb(0, 130, 200), None),
    show("Tarzan", 291097, "6246ebb7-7e52-4767-974c-5da108c6644f", Movie, rgb(34, 120, 15), None),
];

/// One curated video, as listed in the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoEntry {
    pub title: String,
    /// Id from the `v=` parameter of the watch URL.
    pub video_id: String,
    #[serde(default = "default_video_color")]
    pub color: [u8; 3],
}

impl VideoEntry {
    pub fn card_color(&self) -> Color {
        let [r, g, b] = self.color;
        rgb(r, g, b)
    }
}

fn default_video_color() -> [u8; 3] {
    [80, 180, 255]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_ids_are_unique_and_non_empty() {
        let mut ids: Vec<&str> = SHOWS.iter().map(|s| s.content_id).collect();
        assert!(ids.iter().all(|id| !id.is_empty()));
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), SHOWS.len());
    }

    #[test]
    fn video_entry_color_defaults_when_missing() {
        let entry: VideoEntry =
            serde_json::from_str(r#"{"title":"Baby Shark","video_id":"XqZsoesa55w"}"#)
                .expect("entry should parse");
        assert_eq!(entry.card_color(), [80, 180, 255, 255]);
    }
}
