use serde::Deserialize;

/// Read-only track metadata. `id` is the equality key.
#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Track {}

impl Track {
    /// The source locator, if it names anything at all.
    pub fn playable_source(&self) -> Option<&str> {
        self.source
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// "Artist - Title", or just the title when the artist is blank.
    pub fn display(&self) -> String {
        match self.artist.trim() {
            "" => self.title.clone(),
            a => format!("{} - {}", a, self.title),
        }
    }
}
