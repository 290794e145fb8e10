use serde::{Deserialize, Serialize};

/// Whether a catalog entry is a feature film or a series. The provider signals
/// this implicitly by which of `title`/`name` (and `release_date`/
/// `first_air_date`) it populates; we resolve that once at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Movie,
    Series,
}

impl Default for MediaKind {
    fn default() -> Self {
        MediaKind::Movie
    }
}

/// Wire shape of one catalog entry. Title and date come as two mutually
/// exclusive field pairs depending on media type; both may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMovie {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f32,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
}

/// One browsable catalog entry, normalized from the wire shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "RawMovie")]
pub struct Movie {
    pub id: u64,
    pub kind: MediaKind,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: f32,
    pub release_date: Option<String>,
}

impl From<RawMovie> for Movie {
    fn from(raw: RawMovie) -> Self {
        let kind = if raw.title.is_some() || raw.release_date.is_some() {
            MediaKind::Movie
        } else {
            MediaKind::Series
        };
        let title = raw.title.or(raw.name).unwrap_or_default();
        let release_date = raw
            .release_date
            .or(raw.first_air_date)
            .filter(|d| !d.trim().is_empty());
        Movie {
            id: raw.id,
            kind,
            title,
            overview: raw.overview,
            poster_path: raw.poster_path,
            backdrop_path: raw.backdrop_path,
            vote_average: raw.vote_average,
            release_date,
        }
    }
}

impl Movie {
    /// Leading year component of the release date, if any.
    pub fn year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .filter(|y| !y.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// One trailer/clip descriptor attached to a movie.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Video {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub site: String,
    #[serde(default, rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoList {
    #[serde(default)]
    pub results: Vec<Video>,
}

/// Per-movie detail payload, fetched lazily whenever the current carousel
/// entry changes. Never cached; a fresh fetch replaces it wholesale.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub videos: VideoList,
}
