use crate::models::{Movie, MovieDetails};

/// The four browsing categories. Trending is the lead category: it feeds the
/// hero carousel and the view cannot render meaningfully without it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    Trending,
    TopRated,
    Action,
    Comedy,
}

impl RowKind {
    pub const ALL: [RowKind; 4] = [
        RowKind::Trending,
        RowKind::TopRated,
        RowKind::Action,
        RowKind::Comedy,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            RowKind::Trending => "Trending Now",
            RowKind::TopRated => "Top Rated",
            RowKind::Action => "Action Thrillers",
            RowKind::Comedy => "Comedies",
        }
    }

    /// The lead row renders larger tiles using backdrop art.
    pub fn is_large(&self) -> bool {
        matches!(self, RowKind::Trending)
    }
}

/// Top-level view phase. `Loading` holds until the splash timer has elapsed
/// AND the lead-category response has arrived; an empty lead category then
/// lands in `Failed` instead of `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    Ready,
    Failed,
}

/// Messages posted back to the UI thread by background tasks.
#[derive(Debug)]
pub enum Msg {
    CategoryLoaded {
        row: RowKind,
        movies: Vec<Movie>,
    },
    HeroDetails {
        generation: u64,
        details: Option<MovieDetails>,
    },
    SearchResults {
        generation: u64,
        results: Vec<Movie>,
    },
    TrailerResolved {
        key: Option<String>,
    },
    ImageLoaded {
        url: String,
        rgba: Vec<u8>,
        width: u32,
        height: u32,
    },
    ImageFailed {
        url: String,
    },
}
