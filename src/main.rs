use eframe::egui::{self, Align2, Color32, RichText};
use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

mod api;
mod app_state;
mod config;
mod hero;
mod images;
mod logger;
mod models;
mod player;
mod search;
mod timer;
mod ui_helpers;

use api::{TmdbClient, GENRE_ACTION, GENRE_COMEDY};
use app_state::{LoadPhase, Msg, RowKind};
use config::Config;
use hero::{DetailRequest, HeroCarousel};
use images::{image_url, ImageManager, ImageSize};
use logger::log_line;
use models::Movie;
use player::pick_trailer;
use search::SearchController;
use timer::Countdown;
use ui_helpers::{
    format_runtime, genre_line, render_badge, render_loading_spinner, truncate_text, year_badge,
    ACCENT, BACKGROUND, BRAND,
};

/// Minimum duration of the intro splash screen.
pub const SPLASH_DURATION: Duration = Duration::from_millis(2500);

const HERO_HEIGHT: f32 = 380.0;
const ROW_TILE_HEIGHT: f32 = 140.0;
const ROW_TILE_WIDTH: f32 = 95.0;
const LARGE_TILE_WIDTH: f32 = 250.0;
const THUMB_WIDTH: f32 = 64.0;

#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    let viewport = egui::ViewportBuilder::default().with_inner_size([1280.0, 820.0]);
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "CineScope",
        options,
        Box::new(|_cc| {
            let app = CineScopeApp::new(Config::from_env());
            app.reload_categories();
            Box::new(app)
        }),
    )
}

/// What the hero section wants done, collected during rendering and applied
/// once the frame's immutable borrows are released.
enum HeroAction {
    Play(Movie),
    Prev,
    Next,
    Jump(usize),
    Drag(f32),
    DragEnd,
}

struct CineScopeApp {
    client: TmdbClient,
    tx: Sender<Msg>,
    rx: Receiver<Msg>,

    phase: LoadPhase,
    splash: Countdown,
    splash_elapsed: bool,
    lead_arrived: bool,

    rows: HashMap<RowKind, Vec<Movie>>,
    hero: Option<HeroCarousel>,
    search: SearchController,
    trailer_key: Option<String>,
    liked: bool,

    images: ImageManager,
    row_offsets: HashMap<RowKind, f32>,
}

impl CineScopeApp {
    fn new(config: Config) -> Self {
        if !config.has_api_key() {
            log_line("no TMDB_API_KEY configured; catalog fetches will come back empty");
        }
        let (tx, rx) = mpsc::channel();
        let client = TmdbClient::new(config);
        let mut splash = Countdown::idle();
        splash.arm(Instant::now(), SPLASH_DURATION);

        Self {
            client,
            tx,
            rx,
            phase: LoadPhase::Loading,
            splash,
            splash_elapsed: false,
            lead_arrived: false,
            rows: HashMap::new(),
            hero: None,
            search: SearchController::default(),
            trailer_key: None,
            liked: false,
            images: ImageManager::default(),
            row_offsets: HashMap::new(),
        }
    }

    /// The four category fetches are independent; issue them all at once.
    fn reload_categories(&self) {
        for row in RowKind::ALL {
            let client = self.client.clone();
            let tx = self.tx.clone();
            tokio::spawn(async move {
                let movies = match row {
                    RowKind::Trending => client.fetch_trending().await,
                    RowKind::TopRated => client.fetch_top_rated().await,
                    RowKind::Action => client.fetch_by_genre(GENRE_ACTION).await,
                    RowKind::Comedy => client.fetch_by_genre(GENRE_COMEDY).await,
                };
                let _ = tx.send(Msg::CategoryLoaded { row, movies });
            });
        }
    }

    fn spawn_detail_fetch(&self, req: DetailRequest, ctx: &egui::Context) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        let ctx = ctx.clone();
        tokio::spawn(async move {
            let details = client.fetch_details(req.id).await;
            let _ = tx.send(Msg::HeroDetails {
                generation: req.generation,
                details,
            });
            ctx.request_repaint();
        });
    }

    /// Route any item selection through trailer resolution. No qualifying
    /// video means no overlay; that outcome only shows up in the log.
    fn resolve_trailer(&self, movie: Movie, ctx: &egui::Context) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        let ctx = ctx.clone();
        tokio::spawn(async move {
            let videos = client.fetch_videos(movie.id).await;
            let key = pick_trailer(&videos).map(|v| v.key.clone());
            if key.is_none() {
                log_line(&format!("no trailer found for {:?}", movie.title));
            }
            let _ = tx.send(Msg::TrailerResolved { key });
            ctx.request_repaint();
        });
    }

    fn process_messages(&mut self, ctx: &egui::Context, now: Instant) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                Msg::CategoryLoaded { row, movies } => {
                    if row == RowKind::Trending {
                        self.lead_arrived = true;
                        let mut carousel = HeroCarousel::new(movies.clone(), now);
                        if let Some(req) = carousel.initial_request() {
                            self.spawn_detail_fetch(req, ctx);
                        }
                        self.hero = Some(carousel);
                    }
                    self.rows.insert(row, movies);
                }
                Msg::HeroDetails {
                    generation,
                    details,
                } => {
                    if let Some(hero) = self.hero.as_mut() {
                        hero.apply_details(generation, details);
                    }
                }
                Msg::SearchResults {
                    generation,
                    results,
                } => {
                    self.search.apply_results(generation, results);
                }
                Msg::TrailerResolved { key } => {
                    if let Some(key) = key {
                        self.trailer_key = Some(key);
                    }
                }
                Msg::ImageLoaded {
                    url,
                    rgba,
                    width,
                    height,
                } => {
                    self.images.insert_loaded(ctx, url, rgba, width, height);
                }
                Msg::ImageFailed { url } => {
                    self.images.mark_failed(url);
                }
            }
        }
    }

    /// Leave the splash only when the minimum duration has elapsed AND the
    /// lead category has answered; an empty lead feed is a dead end.
    fn advance_phase(&mut self, now: Instant) {
        if self.phase != LoadPhase::Loading {
            return;
        }
        if self.splash.fire(now) {
            self.splash_elapsed = true;
        }
        if self.splash_elapsed && self.lead_arrived {
            let lead_empty = self
                .rows
                .get(&RowKind::Trending)
                .map(|m| m.is_empty())
                .unwrap_or(true);
            self.phase = if lead_empty {
                LoadPhase::Failed
            } else {
                LoadPhase::Ready
            };
        }
    }

    fn poll_timers(&mut self, ctx: &egui::Context, now: Instant) {
        let hero_req = if self.phase == LoadPhase::Ready {
            self.hero.as_mut().and_then(|h| h.tick(now))
        } else {
            None
        };
        if let Some(req) = hero_req {
            self.spawn_detail_fetch(req, ctx);
        }
        if let Some(req) = self.search.poll(now) {
            let client = self.client.clone();
            let tx = self.tx.clone();
            let ctx2 = ctx.clone();
            tokio::spawn(async move {
                let results = client.search(&req.query).await;
                let _ = tx.send(Msg::SearchResults {
                    generation: req.generation,
                    results,
                });
                ctx2.request_repaint();
            });
        }

        // Wake up again for whichever deadline comes first.
        let mut next: Option<Duration> = self.splash.remaining(now);
        if self.phase == LoadPhase::Ready {
            if let Some(hero) = self.hero.as_ref() {
                next = match (next, hero.remaining(now)) {
                    (Some(a), Some(b)) => Some(a.min(b)),
                    (a, b) => a.or(b),
                };
            }
        }
        if let Some(d) = self.search.remaining(now) {
            next = Some(next.map_or(d, |n| n.min(d)));
        }
        if let Some(d) = next {
            ctx.request_repaint_after(d.max(Duration::from_millis(16)));
        }
    }

    fn render_navbar(&mut self, ctx: &egui::Context, now: Instant) {
        let frame = egui::Frame::none()
            .fill(BACKGROUND)
            .inner_margin(egui::Margin::symmetric(16.0, 10.0));
        egui::TopBottomPanel::top("navbar").frame(frame).show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("CineScope").color(BRAND).size(22.0).strong());
                ui.add_space(16.0);
                for entry in ["Home", "TV Shows", "Movies", "New & Popular", "My List"] {
                    ui.label(RichText::new(entry).color(Color32::LIGHT_GRAY).small());
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.search.active {
                        if ui.button("✕").clicked() {
                            self.search.close();
                        } else {
                            let resp = ui.add(
                                egui::TextEdit::singleline(&mut self.search.query)
                                    .hint_text("Titles, people, genres")
                                    .desired_width(300.0),
                            );
                            resp.request_focus();
                            if resp.changed() {
                                let q = self.search.query.clone();
                                self.search.on_input(&q, now);
                            }
                        }
                    } else if ui.button("🔍").clicked() {
                        self.search.open();
                    }
                });
            });
        });
    }

    fn render_search_results(&mut self, ctx: &egui::Context) {
        if !self.search.active || self.search.results().is_empty() {
            return;
        }
        let results = self.search.results().to_vec();
        let mut picked: Option<usize> = None;
        egui::Window::new("search_results")
            .title_bar(false)
            .resizable(false)
            .anchor(Align2::RIGHT_TOP, [-16.0, 52.0])
            .frame(egui::Frame::window(&ctx.style()).fill(Color32::from_rgb(24, 24, 24)))
            .show(ctx, |ui| {
                ui.set_width(320.0);
                for (i, movie) in results.iter().enumerate() {
                    ui.push_id(i, |ui| {
                        ui.horizontal(|ui| {
                            if let Some(path) = movie.poster_path.as_deref() {
                                let url = image_url(ImageSize::W92, path);
                                self.images.request(&url, self.tx.clone(), ctx.clone());
                                if let Some(tex) = self.images.texture(&url) {
                                    ui.add(
                                        egui::Image::new(tex)
                                            .fit_to_exact_size(egui::vec2(32.0, 48.0)),
                                    );
                                }
                            }
                            let label = format!(
                                "{}  ({})",
                                movie.title,
                                movie.year().unwrap_or("N/A")
                            );
                            if ui.selectable_label(false, label).clicked() {
                                picked = Some(i);
                            }
                        });
                    });
                    if i + 1 < results.len() {
                        ui.separator();
                    }
                }
            });
        if let Some(i) = picked {
            // Search closes and clears regardless of whether a trailer is
            // eventually found for the pick.
            if let Some(movie) = self.search.select(i) {
                self.resolve_trailer(movie, ctx);
            }
        }
    }

    fn render_hero(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, now: Instant) {
        let (movies, index, details) = match self.hero.as_ref() {
            Some(h) if h.current().is_some() => (
                h.movies().to_vec(),
                h.index(),
                h.details().cloned(),
            ),
            _ => return,
        };
        let current = movies[index].clone();
        let mut action: Option<HeroAction> = None;

        // Backdrop, also the swipe surface.
        if let Some(path) = current.backdrop_path.as_deref() {
            let url = image_url(ImageSize::Original, path);
            self.images.request(&url, self.tx.clone(), ctx.clone());
            if let Some(tex) = self.images.texture(&url) {
                let size = egui::vec2(ui.available_width(), HERO_HEIGHT);
                let resp = ui.add(
                    egui::Image::new(tex)
                        .fit_to_exact_size(size)
                        .sense(egui::Sense::click_and_drag()),
                );
                if resp.dragged() {
                    action = Some(HeroAction::Drag(resp.drag_delta().x));
                }
                if resp.drag_released() {
                    action = Some(HeroAction::DragEnd);
                }
            } else {
                ui.allocate_space(egui::vec2(ui.available_width(), HERO_HEIGHT * 0.5));
            }
        }

        ui.add_space(8.0);
        ui.label(
            RichText::new(current.title.to_uppercase())
                .color(Color32::WHITE)
                .size(34.0)
                .strong(),
        );

        ui.horizontal(|ui| {
            render_badge(ui, &format!("IMDb {:.1}", current.vote_average), ACCENT);
            render_badge(ui, &year_badge(&current), Color32::LIGHT_GRAY);
            render_badge(ui, "FHD", Color32::LIGHT_GRAY);
            if let Some(runtime) = details.as_ref().and_then(|d| d.runtime) {
                render_badge(ui, &format_runtime(runtime), Color32::LIGHT_GRAY);
            }
        });

        if let Some(d) = details.as_ref() {
            if !d.genres.is_empty() {
                ui.label(
                    RichText::new(genre_line(&d.genres))
                        .color(Color32::LIGHT_GRAY)
                        .small(),
                );
            }
        }

        if !current.overview.is_empty() {
            ui.add_space(4.0);
            ui.label(
                RichText::new(truncate_text(&current.overview, 280))
                    .color(Color32::LIGHT_GRAY),
            );
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui
                .button(RichText::new("▶ Play").color(Color32::BLACK).strong())
                .clicked()
            {
                action = Some(HeroAction::Play(current.clone()));
            }
            let heart = if self.liked { "❤" } else { "♡" };
            if ui.button(heart).clicked() {
                self.liked = !self.liked;
            }
            ui.add_space(24.0);
            if ui.button("◀").clicked() {
                action = Some(HeroAction::Prev);
            }
            if ui.button("▶").clicked() {
                action = Some(HeroAction::Next);
            }
        });

        // Thumbnail strip; the active entry gets the accent border.
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            for (i, movie) in movies.iter().enumerate() {
                let Some(path) = movie.poster_path.as_deref() else {
                    continue;
                };
                let url = image_url(ImageSize::W200, path);
                self.images.request(&url, self.tx.clone(), ctx.clone());
                if let Some(tex) = self.images.texture(&url) {
                    let size = egui::vec2(THUMB_WIDTH, THUMB_WIDTH * 1.5);
                    let button = egui::ImageButton::new(
                        egui::Image::new(tex).fit_to_exact_size(size),
                    )
                    .selected(i == index);
                    if ui.add(button).clicked() {
                        action = Some(HeroAction::Jump(i));
                    }
                }
            }
        });

        let req = match action {
            Some(HeroAction::Play(movie)) => {
                self.resolve_trailer(movie, ctx);
                None
            }
            Some(HeroAction::Prev) => self.hero.as_mut().and_then(|h| h.prev(now)),
            Some(HeroAction::Next) => self.hero.as_mut().and_then(|h| h.next(now)),
            Some(HeroAction::Jump(i)) => self.hero.as_mut().and_then(|h| h.jump(i, now)),
            Some(HeroAction::Drag(dx)) => {
                if let Some(h) = self.hero.as_mut() {
                    h.drag_by(dx);
                }
                None
            }
            Some(HeroAction::DragEnd) => self.hero.as_mut().and_then(|h| h.end_drag(now)),
            None => None,
        };
        if let Some(req) = req {
            self.spawn_detail_fetch(req, ctx);
        }
    }

    fn render_row(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, kind: RowKind) {
        let movies = match self.rows.get(&kind) {
            Some(m) if !m.is_empty() => m.clone(),
            // Empty categories degrade to absent rows, no error surface.
            _ => return,
        };
        let tile_width = if kind.is_large() {
            LARGE_TILE_WIDTH
        } else {
            ROW_TILE_WIDTH
        };

        ui.add_space(12.0);
        let mut offset = self.row_offsets.get(&kind).copied().unwrap_or(0.0);
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(kind.title())
                    .color(Color32::from_gray(229))
                    .size(18.0)
                    .strong(),
            );
            // Chevrons nudge the strip by roughly one viewport width.
            let nudge = ui.available_width().max(tile_width);
            if ui.small_button("‹").clicked() {
                offset = (offset - nudge).max(0.0);
            }
            if ui.small_button("›").clicked() {
                offset += nudge;
            }
        });

        let mut clicked: Option<Movie> = None;
        let output = egui::ScrollArea::horizontal()
            .id_source(kind.title())
            .scroll_offset(egui::vec2(offset, 0.0))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    for movie in &movies {
                        let path = if kind.is_large() {
                            movie.backdrop_path.as_deref()
                        } else {
                            movie.poster_path.as_deref()
                        };
                        let Some(path) = path else { continue };
                        let url = image_url(ImageSize::W500, path);
                        self.images.request(&url, self.tx.clone(), ctx.clone());
                        let size = egui::vec2(tile_width, ROW_TILE_HEIGHT);
                        if let Some(tex) = self.images.texture(&url) {
                            let button = egui::ImageButton::new(
                                egui::Image::new(tex).fit_to_exact_size(size),
                            );
                            if ui.add(button).on_hover_text(&movie.title).clicked() {
                                clicked = Some(movie.clone());
                            }
                        } else if !self.images.has_failed(&url) {
                            ui.allocate_space(size);
                        }
                    }
                });
            });
        self.row_offsets.insert(kind, output.state.offset.x);

        if let Some(movie) = clicked {
            self.resolve_trailer(movie, ctx);
        }
    }

    fn render_overlay(&mut self, ctx: &egui::Context) {
        let Some(key) = self.trailer_key.clone() else {
            return;
        };
        // Dim everything behind the overlay.
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Middle,
            egui::Id::new("overlay_dim"),
        ));
        painter.rect_filled(ctx.screen_rect(), 0.0, Color32::from_black_alpha(200));

        let mut close = false;
        egui::Area::new(egui::Id::new("trailer_overlay"))
            .order(egui::Order::Foreground)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                egui::Frame::window(&ctx.style())
                    .fill(Color32::BLACK)
                    .show(ui, |ui| {
                        ui.set_width(520.0);
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                            if ui.button("✕").clicked() {
                                close = true;
                            }
                        });
                        ui.vertical_centered(|ui| {
                            ui.add_space(24.0);
                            ui.label(
                                RichText::new("Trailer").color(Color32::WHITE).size(20.0),
                            );
                            ui.add_space(8.0);
                            ui.label(
                                RichText::new(player::embed_url(&key))
                                    .color(Color32::GRAY)
                                    .small(),
                            );
                            ui.add_space(16.0);
                            if ui
                                .button(RichText::new("▶ Watch trailer").strong())
                                .clicked()
                            {
                                player::open_trailer(&key);
                            }
                            ui.add_space(24.0);
                        });
                    });
            });
        if close {
            self.trailer_key = None;
        }
    }

    fn render_failed(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.4);
            ui.label(
                RichText::new("Unable to load movies")
                    .color(Color32::WHITE)
                    .size(24.0)
                    .strong(),
            );
            ui.add_space(8.0);
            ui.label(
                RichText::new("Please check your internet connection or API key.")
                    .color(Color32::GRAY),
            );
        });
    }
}

impl eframe::App for CineScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.process_messages(ctx, now);
        self.advance_phase(now);
        self.poll_timers(ctx, now);

        match self.phase {
            LoadPhase::Loading => {
                egui::CentralPanel::default()
                    .frame(egui::Frame::none().fill(BACKGROUND))
                    .show(ctx, |ui| render_loading_spinner(ui, "CINESCOPE"));
            }
            LoadPhase::Failed => {
                egui::CentralPanel::default()
                    .frame(egui::Frame::none().fill(BACKGROUND))
                    .show(ctx, |ui| self.render_failed(ui));
            }
            LoadPhase::Ready => {
                self.render_navbar(ctx, now);
                egui::CentralPanel::default()
                    .frame(egui::Frame::none().fill(BACKGROUND))
                    .show(ctx, |ui| {
                        egui::ScrollArea::vertical().show(ui, |ui| {
                            self.render_hero(ui, ctx, now);
                            for kind in RowKind::ALL {
                                self.render_row(ui, ctx, kind);
                            }
                            ui.add_space(24.0);
                        });
                    });
                self.render_search_results(ctx);
                self.render_overlay(ctx);
            }
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // No timer may outlive the view.
        self.splash.cancel();
        if let Some(hero) = self.hero.as_mut() {
            hero.cancel_timers();
        }
        log_line("shutting down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: u64) -> Movie {
        Movie {
            id,
            title: format!("Movie {}", id),
            ..Default::default()
        }
    }

    fn app() -> CineScopeApp {
        // No reload_categories here: these tests feed messages by hand.
        CineScopeApp::new(Config::new("", "en-US"))
    }

    #[tokio::test]
    async fn splash_alone_does_not_leave_loading() {
        let mut app = app();
        let now = Instant::now() + SPLASH_DURATION + Duration::from_millis(1);
        app.advance_phase(now);
        assert_eq!(app.phase, LoadPhase::Loading);
    }

    #[tokio::test]
    async fn empty_lead_category_fails_after_splash() {
        let mut app = app();
        app.lead_arrived = true;
        app.rows.insert(RowKind::Trending, Vec::new());
        app.advance_phase(Instant::now() + SPLASH_DURATION);
        assert_eq!(app.phase, LoadPhase::Failed);
    }

    #[tokio::test]
    async fn populated_lead_category_becomes_ready() {
        let mut app = app();
        app.lead_arrived = true;
        app.rows.insert(RowKind::Trending, vec![movie(1), movie(2)]);
        app.advance_phase(Instant::now() + SPLASH_DURATION);
        assert_eq!(app.phase, LoadPhase::Ready);
    }

    #[tokio::test]
    async fn lead_data_before_splash_still_waits_for_splash() {
        let mut app = app();
        app.lead_arrived = true;
        app.rows.insert(RowKind::Trending, vec![movie(1)]);
        app.advance_phase(Instant::now());
        assert_eq!(app.phase, LoadPhase::Loading, "minimum splash duration holds");
    }

    #[tokio::test]
    async fn resolved_trailer_opens_overlay_and_none_does_not() {
        let mut app = app();
        let ctx = egui::Context::default();
        app.tx.send(Msg::TrailerResolved { key: None }).unwrap();
        app.process_messages(&ctx, Instant::now());
        assert!(app.trailer_key.is_none(), "no qualifying trailer, no overlay");
        app.tx
            .send(Msg::TrailerResolved {
                key: Some("abc".to_string()),
            })
            .unwrap();
        app.process_messages(&ctx, Instant::now());
        assert_eq!(app.trailer_key.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn trending_response_builds_the_carousel_window() {
        let mut app = app();
        let ctx = egui::Context::default();
        app.tx
            .send(Msg::CategoryLoaded {
                row: RowKind::Trending,
                movies: (1..=7).map(movie).collect(),
            })
            .unwrap();
        app.process_messages(&ctx, Instant::now());
        assert!(app.lead_arrived);
        let hero = app.hero.as_ref().unwrap();
        assert_eq!(hero.movies().len(), hero::CAROUSEL_WINDOW);
        assert_eq!(app.rows.get(&RowKind::Trending).unwrap().len(), 7);
    }
}
