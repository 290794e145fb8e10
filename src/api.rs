use serde::Deserialize;

use crate::config::Config;
use crate::logger::{log_error, log_line};
use crate::models::{Movie, MovieDetails, Video, VideoList};

pub const BASE_URL: &str = "https://api.themoviedb.org/3";

pub const GENRE_ACTION: u32 = 28;
pub const GENRE_COMEDY: u32 = 35;

#[derive(Debug, Default, Deserialize)]
struct PagedResults {
    #[serde(default)]
    results: Vec<Movie>,
}

/// Client for the remote movie catalog. Every operation is total: transport
/// and parse failures are logged and come back as an empty list or `None`, so
/// callers never branch on errors. "Empty because nothing matched" and "empty
/// because the request failed" are deliberately indistinguishable.
#[derive(Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    config: Config,
}

impl TmdbClient {
    pub fn new(config: Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    async fn get_list(&self, path: &str, extra: &[(&str, String)]) -> Vec<Movie> {
        let url = format!("{}{}", BASE_URL, path);
        let mut query: Vec<(&str, String)> = vec![
            ("api_key", self.config.api_key.clone()),
            ("language", self.config.language.clone()),
        ];
        query.extend(extra.iter().cloned());
        let res = async {
            let resp = self.http.get(&url).query(&query).send().await?;
            let page = resp.error_for_status()?.json::<PagedResults>().await?;
            Ok::<Vec<Movie>, reqwest::Error>(page.results)
        }
        .await;
        match res {
            Ok(movies) => movies,
            Err(e) => {
                log_error(&format!("fetch {} failed", path), &e);
                Vec::new()
            }
        }
    }

    pub async fn fetch_trending(&self) -> Vec<Movie> {
        self.get_list("/trending/all/week", &[]).await
    }

    pub async fn fetch_top_rated(&self) -> Vec<Movie> {
        self.get_list("/movie/top_rated", &[]).await
    }

    pub async fn fetch_by_genre(&self, genre_id: u32) -> Vec<Movie> {
        self.get_list("/discover/movie", &[("with_genres", genre_id.to_string())])
            .await
    }

    /// Full detail payload with embedded videos. A zero id short-circuits
    /// locally without touching the network.
    pub async fn fetch_details(&self, id: u64) -> Option<MovieDetails> {
        if id == 0 {
            return None;
        }
        let url = format!("{}/movie/{}", BASE_URL, id);
        let query = [
            ("api_key", self.config.api_key.as_str()),
            ("language", self.config.language.as_str()),
            ("append_to_response", "videos"),
        ];
        let res = async {
            let resp = self.http.get(&url).query(&query).send().await?;
            let details = resp.error_for_status()?.json::<MovieDetails>().await?;
            Ok::<MovieDetails, reqwest::Error>(details)
        }
        .await;
        match res {
            Ok(details) => Some(details),
            Err(e) => {
                log_error(&format!("fetch details for id {} failed", id), &e);
                None
            }
        }
    }

    /// Video descriptors for one movie, empty on failure or zero id.
    pub async fn fetch_videos(&self, id: u64) -> Vec<Video> {
        if id == 0 {
            return Vec::new();
        }
        let url = format!("{}/movie/{}/videos", BASE_URL, id);
        let query = [
            ("api_key", self.config.api_key.as_str()),
            ("language", self.config.language.as_str()),
        ];
        let res = async {
            let resp = self.http.get(&url).query(&query).send().await?;
            let list = resp.error_for_status()?.json::<VideoList>().await?;
            Ok::<Vec<Video>, reqwest::Error>(list.results)
        }
        .await;
        match res {
            Ok(videos) => videos,
            Err(e) => {
                log_error(&format!("fetch videos for id {} failed", id), &e);
                Vec::new()
            }
        }
    }

    /// Free-text search. Empty or whitespace-only queries return immediately
    /// with no network call.
    pub async fn search(&self, query: &str) -> Vec<Movie> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }
        log_line(&format!("search: {:?}", trimmed));
        self.get_list("/search/movie", &[("query", trimmed.to_string())])
            .await
    }
}
