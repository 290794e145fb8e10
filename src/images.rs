use std::collections::{HashMap, HashSet};
use std::sync::mpsc::Sender;
use std::sync::Arc;

use eframe::egui;
use tokio::sync::Semaphore;

use crate::app_state::Msg;
use crate::logger::log_line;

pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

/// Size tokens the CDN accepts; which one we ask for depends on context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    /// Search-result thumbnails.
    W92,
    /// Hero thumbnail strip.
    W200,
    /// Row tiles.
    W500,
    /// Hero backdrop.
    Original,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::W92 => "w92",
            ImageSize::W200 => "w200",
            ImageSize::W500 => "w500",
            ImageSize::Original => "original",
        }
    }
}

/// Build a CDN URL from a provider path fragment (which starts with '/').
pub fn image_url(size: ImageSize, path: &str) -> String {
    format!("{}/{}{}", IMAGE_BASE, size.as_str(), path)
}

/// In-memory poster/backdrop loader. Downloads and decodes in background
/// tasks (bounded by a semaphore), posts the RGBA payload back as a `Msg`,
/// and keeps the resulting egui textures for the lifetime of the app. URLs
/// that failed once are not retried. Nothing touches disk.
pub struct ImageManager {
    textures: HashMap<String, egui::TextureHandle>,
    in_flight: HashSet<String>,
    failed: HashSet<String>,
    semaphore: Arc<Semaphore>,
}

impl Default for ImageManager {
    fn default() -> Self {
        Self::new(6)
    }
}

impl ImageManager {
    pub fn new(concurrent_loads: usize) -> Self {
        Self {
            textures: HashMap::new(),
            in_flight: HashSet::new(),
            failed: HashSet::new(),
            semaphore: Arc::new(Semaphore::new(concurrent_loads)),
        }
    }

    pub fn texture(&self, url: &str) -> Option<&egui::TextureHandle> {
        self.textures.get(url)
    }

    pub fn has_failed(&self, url: &str) -> bool {
        self.failed.contains(url)
    }

    /// Kick off a download unless the URL is cached, loading, or known bad.
    pub fn request(&mut self, url: &str, tx: Sender<Msg>, ctx: egui::Context) {
        if self.textures.contains_key(url)
            || self.in_flight.contains(url)
            || self.failed.contains(url)
        {
            return;
        }
        self.in_flight.insert(url.to_string());
        let url = url.to_string();
        let semaphore = self.semaphore.clone();
        tokio::spawn(async move {
            let _permit = match semaphore.acquire().await {
                Ok(p) => p,
                Err(_) => return,
            };
            let fetched = async {
                let resp = reqwest::get(&url).await?;
                let bytes = resp.error_for_status()?.bytes().await?;
                Ok::<Vec<u8>, reqwest::Error>(bytes.to_vec())
            }
            .await;
            let msg = match fetched {
                Ok(bytes) => match image::load_from_memory(&bytes) {
                    Ok(decoded) => {
                        let rgba = decoded.to_rgba8();
                        let (width, height) = rgba.dimensions();
                        Msg::ImageLoaded {
                            url: url.clone(),
                            rgba: rgba.into_raw(),
                            width,
                            height,
                        }
                    }
                    Err(e) => {
                        log_line(&format!("image decode failed for {}: {}", url, e));
                        Msg::ImageFailed { url: url.clone() }
                    }
                },
                Err(e) => {
                    log_line(&format!("image download failed for {}: {}", url, e));
                    Msg::ImageFailed { url: url.clone() }
                }
            };
            let _ = tx.send(msg);
            ctx.request_repaint();
        });
    }

    /// Upload a decoded image as a texture; runs on the UI thread.
    pub fn insert_loaded(
        &mut self,
        ctx: &egui::Context,
        url: String,
        rgba: Vec<u8>,
        width: u32,
        height: u32,
    ) {
        self.in_flight.remove(&url);
        let color_image = egui::ColorImage::from_rgba_unmultiplied(
            [width as usize, height as usize],
            &rgba,
        );
        let texture = ctx.load_texture(&url, color_image, egui::TextureOptions::LINEAR);
        self.textures.insert(url, texture);
    }

    pub fn mark_failed(&mut self, url: String) {
        self.in_flight.remove(&url);
        self.failed.insert(url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_url_joins_base_size_and_path() {
        assert_eq!(
            image_url(ImageSize::W500, "/abc.jpg"),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
        assert_eq!(
            image_url(ImageSize::Original, "/hero.jpg"),
            "https://image.tmdb.org/t/p/original/hero.jpg"
        );
    }

    #[test]
    fn failed_urls_are_remembered() {
        let mut m = ImageManager::new(2);
        assert!(!m.has_failed("u"));
        m.mark_failed("u".to_string());
        assert!(m.has_failed("u"));
    }
}
