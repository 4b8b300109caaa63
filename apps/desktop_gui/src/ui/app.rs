use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use crossbeam_channel::{Receiver, Sender};
use egui::{Align2, Color32, FontId, Rect, Sense, TextureHandle, Vec2};
use shared::domain::{Decision, Item, ItemId, SwipeDirection};
use swipe_core::{
    gesture::SWIPE_ANIMATION, pointer_signal, CardPose, DragFeedback, Gallery, ImagePurpose,
    PointerOutcome, SessionController, SessionEvent, SessionPhase, Sharer, Summary, SupplyOrigin,
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::media::PreviewImage;
use crate::ui::input::CardInput;

const CARD_SIZE: Vec2 = Vec2::new(320.0, 400.0);
const THUMBNAIL_SIZE: Vec2 = Vec2::new(96.0, 96.0);
const LIKE_COLOR: Color32 = Color32::from_rgb(46, 204, 113);
const NOPE_COLOR: Color32 = Color32::from_rgb(231, 76, 60);

enum CardTexture {
    Loading,
    Ready {
        texture: TextureHandle,
        size: Vec2,
        substituted: bool,
    },
    Failed(String),
}

struct ExitingCard {
    item: Item,
    from: CardPose,
    direction: SwipeDirection,
    started: Instant,
}

impl ExitingCard {
    fn pose(&self, now: Instant) -> CardPose {
        CardPose::exiting(self.from, self.direction, now.duration_since(self.started))
    }

    fn is_finished(&self, now: Instant) -> bool {
        now.duration_since(self.started) >= SWIPE_ANIMATION
    }
}

pub struct SwipeApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    controller: SessionController,
    generation: u64,
    status: String,
    supply_error: Option<UiError>,
    textures: HashMap<(ItemId, ImagePurpose), CardTexture>,
    drag: Option<DragFeedback>,
    card_input: CardInput,
    exiting: Option<ExitingCard>,
    pending_summary: Option<Summary>,
    summary: Option<Summary>,
    sharer: Sharer,
}

impl SwipeApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        total_items: usize,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            controller: SessionController::new(total_items),
            generation: 0,
            status: "Starting...".to_string(),
            supply_error: None,
            textures: HashMap::new(),
            drag: None,
            card_input: CardInput::default(),
            exiting: None,
            pending_summary: None,
            summary: None,
            sharer: Sharer::desktop(),
        };
        app.start_session();
        app
    }

    /// Throws away the current session and asks the backend for a fresh batch.
    fn start_session(&mut self) {
        self.generation += 1;
        let count = self.controller.reset();
        self.textures.clear();
        self.drag = None;
        self.card_input.reset();
        self.exiting = None;
        self.pending_summary = None;
        self.summary = None;
        self.supply_error = None;
        self.status = "Loading cats...".to_string();
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::FetchItems {
                generation: self.generation,
                count,
            },
            &mut self.status,
        );
    }

    fn process_ui_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    tracing::info!("{message}");
                    if !self.controller.is_loading() {
                        self.status = message;
                    }
                }
                UiEvent::ItemsLoaded {
                    generation,
                    items,
                    origin,
                } => {
                    if generation != self.generation || !self.controller.is_loading() {
                        tracing::debug!(generation, "dropping stale item batch");
                        continue;
                    }
                    self.status = match origin {
                        SupplyOrigin::Primary => String::new(),
                        SupplyOrigin::Fallback => {
                            "Cat API unavailable; showing placeholder cats".to_string()
                        }
                    };
                    match self.controller.load(items) {
                        Ok(event) => self.apply_session_event(event),
                        Err(err) => self.report(UiErrorContext::LoadItems, err.to_string()),
                    }
                }
                UiEvent::SupplyFailed { generation, error } => {
                    if generation != self.generation {
                        continue;
                    }
                    tracing::error!(category = ?error.category(), "{}", error.message());
                    self.status = error.user_message();
                    self.supply_error = Some(error);
                }
                UiEvent::ImageLoaded {
                    session_id,
                    item_id,
                    purpose,
                    image,
                    substituted,
                } => {
                    if session_id != self.controller.session().id() {
                        continue;
                    }
                    let texture = load_preview_texture(ctx, &item_id, purpose, &image);
                    self.textures.insert(
                        (item_id, purpose),
                        CardTexture::Ready {
                            texture,
                            size: Vec2::new(image.width as f32, image.height as f32),
                            substituted,
                        },
                    );
                }
                UiEvent::ImageFailed {
                    session_id,
                    item_id,
                    purpose,
                    error,
                } => {
                    if session_id != self.controller.session().id() {
                        continue;
                    }
                    tracing::warn!(item_id = %item_id, ?purpose, "{}", error.message());
                    self.textures
                        .insert((item_id, purpose), CardTexture::Failed(error.user_message()));
                }
                UiEvent::Error(error) => {
                    tracing::error!(context = ?error.context(), "{}", error.message());
                    self.status = error.user_message();
                }
            }
        }
    }

    fn report(&mut self, context: UiErrorContext, message: String) {
        let error = UiError::from_message(context, message);
        tracing::warn!(context = ?error.context(), "{}", error.message());
        self.status = error.user_message();
    }

    fn apply_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Presented { item, position, .. } => {
                self.request_image(&item, position, ImagePurpose::Card);
                if let Some(next) = self.controller.session().items().get(position + 1).cloned() {
                    self.request_image(&next, position + 1, ImagePurpose::Card);
                }
            }
            SessionEvent::CardReset => self.drag = None,
            SessionEvent::Finished(summary) => {
                for entry in summary.gallery.entries() {
                    let position = self
                        .controller
                        .session()
                        .items()
                        .iter()
                        .position(|item| item.id == entry.item.id)
                        .unwrap_or(entry.position - 1);
                    self.request_image(&entry.item, position, ImagePurpose::Thumbnail);
                }
                if self.exiting.is_some() {
                    self.pending_summary = Some(summary);
                } else {
                    self.summary = Some(summary);
                }
            }
        }
    }

    fn request_image(&mut self, item: &Item, position: usize, purpose: ImagePurpose) {
        let key = (item.id.clone(), purpose);
        if self.textures.contains_key(&key) {
            return;
        }
        let queued = dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::FetchImage {
                session_id: self.controller.session().id(),
                item: item.clone(),
                position,
                purpose,
            },
            &mut self.status,
        );
        if queued {
            self.textures.insert(key, CardTexture::Loading);
        }
    }

    fn card_pose(&self) -> CardPose {
        self.drag
            .map(|feedback| CardPose::dragging(feedback.displacement))
            .unwrap_or_default()
    }

    fn accepts_input(&self) -> bool {
        self.controller.phase() == SessionPhase::Presenting && self.exiting.is_none()
    }

    /// Button path: same commit as a swipe past the threshold.
    fn decide(&mut self, decision: Decision) {
        if !self.accepts_input() {
            return;
        }
        let from = self.card_pose();
        let item = self.controller.current_item().cloned();
        match self.controller.decide(decision) {
            Ok(event) => {
                self.drag = None;
                self.begin_exit(decision, item, from);
                self.apply_session_event(event);
            }
            Err(err) => self.report(UiErrorContext::General, err.to_string()),
        }
    }

    fn begin_exit(&mut self, decision: Decision, item: Option<Item>, from: CardPose) {
        if let (Some(direction), Some(item)) = (decision.exit_direction(), item) {
            self.exiting = Some(ExitingCard {
                item,
                from,
                direction,
                started: Instant::now(),
            });
        }
    }

    fn handle_card_input(&mut self, ctx: &egui::Context, card_rect: Rect) {
        if !self.accepts_input() {
            self.card_input.reset();
            return;
        }
        let events = ctx.input(|input| self.card_input.events(&input.events, card_rect));
        for event in events {
            let Some(signal) = pointer_signal(&event) else {
                continue;
            };
            let from = self.card_pose();
            let item = self.controller.current_item().cloned();
            match self.controller.handle_pointer(signal) {
                Ok(PointerOutcome::Ignored) | Ok(PointerOutcome::Started) => {}
                Ok(PointerOutcome::Dragged(feedback)) => self.drag = Some(feedback),
                Ok(PointerOutcome::Resolved(resolution)) => {
                    tracing::debug!(
                        displacement = resolution.displacement,
                        decision = resolution.decision.label(),
                        "swipe resolved"
                    );
                    self.drag = None;
                    self.begin_exit(resolution.decision, item, from);
                    self.apply_session_event(resolution.event);
                    if self.exiting.is_some() {
                        break;
                    }
                }
                Err(err) => self.report(UiErrorContext::General, err.to_string()),
            }
        }
    }

    fn finish_exit_if_done(&mut self, now: Instant) {
        if self.exiting.as_ref().is_some_and(|exit| exit.is_finished(now)) {
            self.exiting = None;
            if let Some(summary) = self.pending_summary.take() {
                self.summary = Some(summary);
            }
        }
    }

    fn show_loading(&mut self, ui: &mut egui::Ui) {
        ui.add_space(120.0);
        if let Some(error) = &self.supply_error {
            ui.colored_label(NOPE_COLOR, error.user_message());
            ui.add_space(8.0);
            if ui.button("Try again").clicked() {
                self.start_session();
            }
        } else {
            ui.spinner();
            ui.label("Loading cats...");
        }
    }

    fn show_card_stage(&mut self, ui: &mut egui::Ui) {
        let progress = self.controller.progress();
        ui.label(format!("{} / {}", progress.current, progress.total));
        ui.add_space(8.0);

        let (card_rect, _) = ui.allocate_exact_size(CARD_SIZE, Sense::hover());
        self.handle_card_input(ui.ctx(), card_rect);

        let now = Instant::now();
        if let Some(exit) = &self.exiting {
            let pose = exit.pose(now);
            let stamp = match exit.direction {
                SwipeDirection::Right => (1.0, 0.0),
                SwipeDirection::Left => (0.0, 1.0),
            };
            self.paint_card(ui, card_rect, &exit.item, pose, stamp);
        } else if let Some(item) = self.controller.current_item() {
            let preview = self.drag.map(|feedback| feedback.preview).unwrap_or_default();
            self.paint_card(
                ui,
                card_rect,
                item,
                self.card_pose(),
                (preview.like, preview.dislike),
            );
        }
        self.finish_exit_if_done(now);

        ui.add_space(16.0);
        let enabled = self.accepts_input();
        ui.horizontal(|ui| {
            ui.add_space((ui.available_width() - 220.0).max(0.0) / 2.0);
            if ui
                .add_enabled(enabled, egui::Button::new("✖ Dislike").min_size(Vec2::new(100.0, 36.0)))
                .clicked()
            {
                self.decide(Decision::Dislike);
            }
            ui.add_space(20.0);
            if ui
                .add_enabled(enabled, egui::Button::new("♥ Like").min_size(Vec2::new(100.0, 36.0)))
                .clicked()
            {
                self.decide(Decision::Like);
            }
        });
    }

    fn paint_card(
        &self,
        ui: &egui::Ui,
        base: Rect,
        item: &Item,
        pose: CardPose,
        (like, dislike): (f32, f32),
    ) {
        let rect = base.translate(Vec2::new(pose.offset_x, 0.0));
        let painter = ui.painter_at(ui.clip_rect());
        let alpha = pose.opacity.clamp(0.0, 1.0);

        match self.textures.get(&(item.id.clone(), ImagePurpose::Card)) {
            Some(CardTexture::Ready {
                texture,
                size,
                substituted,
            }) => {
                egui::Image::new((texture.id(), *size))
                    .rotate(pose.rotation_deg.to_radians(), Vec2::splat(0.5))
                    .tint(Color32::WHITE.gamma_multiply(alpha))
                    .corner_radius(12.0)
                    .paint_at(ui, fit_rect(rect, *size));
                if *substituted {
                    painter.text(
                        rect.center_bottom() - Vec2::new(0.0, 12.0),
                        Align2::CENTER_BOTTOM,
                        "placeholder",
                        FontId::proportional(12.0),
                        Color32::LIGHT_GRAY.gamma_multiply(alpha),
                    );
                }
            }
            Some(CardTexture::Failed(reason)) => {
                painter.rect_filled(rect, 12.0, Color32::from_gray(40).gamma_multiply(alpha));
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    reason,
                    FontId::proportional(14.0),
                    Color32::LIGHT_GRAY.gamma_multiply(alpha),
                );
            }
            Some(CardTexture::Loading) | None => {
                painter.rect_filled(rect, 12.0, Color32::from_gray(30).gamma_multiply(alpha));
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    "Loading...",
                    FontId::proportional(16.0),
                    Color32::GRAY.gamma_multiply(alpha),
                );
            }
        }

        if like > 0.0 {
            painter.text(
                rect.left_top() + Vec2::new(20.0, 20.0),
                Align2::LEFT_TOP,
                "LIKE",
                FontId::proportional(36.0),
                LIKE_COLOR.gamma_multiply(like.min(1.0) * alpha),
            );
        }
        if dislike > 0.0 {
            painter.text(
                rect.right_top() + Vec2::new(-20.0, 20.0),
                Align2::RIGHT_TOP,
                "NOPE",
                FontId::proportional(36.0),
                NOPE_COLOR.gamma_multiply(dislike.min(1.0) * alpha),
            );
        }
    }

    fn show_summary(&mut self, ui: &mut egui::Ui, summary: &Summary) {
        ui.add_space(24.0);
        ui.heading("Session complete");
        ui.label(format!(
            "You liked {} of {} cats ({} disliked)",
            summary.liked_count, summary.total_seen, summary.disliked_count
        ));
        ui.add_space(16.0);

        match &summary.gallery {
            Gallery::Empty { message } => {
                ui.label(message);
            }
            Gallery::Entries { entries } => {
                ui.horizontal_wrapped(|ui| {
                    for entry in entries {
                        ui.vertical(|ui| {
                            match self
                                .textures
                                .get(&(entry.item.id.clone(), ImagePurpose::Thumbnail))
                            {
                                Some(CardTexture::Ready { texture, .. }) => {
                                    ui.add(
                                        egui::Image::new(texture)
                                            .fit_to_exact_size(THUMBNAIL_SIZE)
                                            .corner_radius(6.0),
                                    );
                                }
                                Some(CardTexture::Failed(_)) => {
                                    let (rect, _) =
                                        ui.allocate_exact_size(THUMBNAIL_SIZE, Sense::hover());
                                    ui.painter().rect_filled(rect, 6.0, Color32::from_gray(40));
                                }
                                Some(CardTexture::Loading) | None => {
                                    let (rect, _) =
                                        ui.allocate_exact_size(THUMBNAIL_SIZE, Sense::hover());
                                    ui.put(rect, egui::Spinner::new());
                                }
                            }
                            ui.label(entry.label());
                        });
                    }
                });
            }
        }

        ui.add_space(20.0);
        ui.horizontal(|ui| {
            ui.add_space((ui.available_width() - 220.0).max(0.0) / 2.0);
            if ui.button("Share").clicked() {
                self.share(summary);
            }
            ui.add_space(20.0);
            if ui.button("Play again").clicked() {
                self.start_session();
            }
        });
    }

    fn share(&mut self, summary: &Summary) {
        let result = self.sharer.share(&summary.share_text());
        if result.delivered {
            self.status = "Summary copied to clipboard".to_string();
        } else {
            self.report(
                UiErrorContext::Share,
                "no share mechanism accepted the summary".to_string(),
            );
        }
    }
}

/// Largest rect with the aspect ratio of `size` centered inside `bounds`.
fn fit_rect(bounds: Rect, size: Vec2) -> Rect {
    if size.x <= 0.0 || size.y <= 0.0 {
        return bounds;
    }
    let scale = (bounds.width() / size.x).min(bounds.height() / size.y);
    Rect::from_center_size(bounds.center(), size * scale)
}

fn load_preview_texture(
    ctx: &egui::Context,
    item_id: &ItemId,
    purpose: ImagePurpose,
    image: &PreviewImage,
) -> TextureHandle {
    let color_image =
        egui::ColorImage::from_rgba_unmultiplied([image.width, image.height], &image.rgba);
    ctx.load_texture(
        format!("cat:{item_id}:{purpose:?}"),
        color_image,
        egui::TextureOptions::LINEAR,
    )
}

impl eframe::App for SwipeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events(ctx);

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(&self.status);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Cat Swipe");
                ui.add_space(8.0);
                if self.controller.is_loading() {
                    self.show_loading(ui);
                } else if let Some(summary) = self.summary.clone() {
                    self.show_summary(ui, &summary);
                } else {
                    self.show_card_stage(ui);
                }
            });
        });

        if self.exiting.is_some() || self.controller.is_dragging() {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
