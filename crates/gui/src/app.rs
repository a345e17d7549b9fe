//! Demo viewport wiring the grid overlay and zoom control into an
//! eframe/glow panel.

use std::sync::{Arc, Mutex};

use eframe::egui;
use glam::{Mat4, Vec3};
use glow::HasContext;
use serde::{Deserialize, Serialize};

use latticeview::backend::gl::GlLineBackend;
use latticeview::{Grid, GridPlane, GridSpec, ZoomControl};

/// Viewer display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerSettings {
    /// Background color RGB
    pub background_color: [u8; 3],
    /// Grid line color RGBA
    pub grid_color: [f32; 4],
    /// Vertical field of view (degrees)
    pub fov_degrees: f32,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            background_color: [30, 30, 35],
            grid_color: [0.25, 0.25, 0.25, 1.0],
            fov_degrees: 45.0,
        }
    }
}

/// GL-side state: backend plus the grid living in it. Created once a glow
/// context exists, touched only inside the paint callback.
struct GlViewer {
    gl: Arc<glow::Context>,
    backend: GlLineBackend,
    grid: Option<Grid>,
}

impl GlViewer {
    fn new(gl: Arc<glow::Context>) -> Option<Self> {
        match GlLineBackend::new(gl.clone()) {
            Ok(backend) => Some(Self {
                gl,
                backend,
                grid: None,
            }),
            Err(e) => {
                tracing::error!("GL backend init failed: {e}");
                None
            }
        }
    }

    fn paint(
        &mut self,
        viewport: [f32; 4],
        spec: GridSpec,
        grid_on: bool,
        mvp: Mat4,
        settings: &ViewerSettings,
    ) {
        unsafe {
            self.gl.viewport(
                viewport[0] as i32,
                viewport[1] as i32,
                viewport[2] as i32,
                viewport[3] as i32,
            );
            self.gl.scissor(
                viewport[0] as i32,
                viewport[1] as i32,
                viewport[2] as i32,
                viewport[3] as i32,
            );
            self.gl.enable(glow::SCISSOR_TEST);
            self.gl.clear_color(
                settings.background_color[0] as f32 / 255.0,
                settings.background_color[1] as f32 / 255.0,
                settings.background_color[2] as f32 / 255.0,
                1.0,
            );
            self.gl.clear(glow::COLOR_BUFFER_BIT);
        }

        // Lazy grid creation: the context is guaranteed ready here, so the
        // one-time generate() contract is satisfied on first paint.
        let grid = self.grid.get_or_insert_with(|| {
            let mut grid = Grid::new(spec, &mut self.backend);
            grid.generate(&mut self.backend);
            grid
        });

        if grid.spec() != spec {
            grid.set_all(spec, &mut self.backend);
        }
        if grid.is_visible() != grid_on {
            grid.toggle();
        }

        self.backend.set_view(mvp);
        self.backend.set_color(settings.grid_color);
        grid.render(&mut self.backend);

        unsafe {
            self.gl.disable(glow::SCISSOR_TEST);
        }
    }
}

/// Main application
pub struct ViewerApp {
    viewer: Option<Arc<Mutex<GlViewer>>>,
    zoom: ZoomControl,
    spec: GridSpec,
    grid_on: bool,
    settings: ViewerSettings,
}

impl ViewerApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let viewer = cc
            .gl
            .as_ref()
            .and_then(|gl| GlViewer::new(gl.clone()))
            .map(|v| Arc::new(Mutex::new(v)));
        if viewer.is_none() {
            tracing::warn!("no glow context; viewport will stay empty");
        }

        Self {
            viewer,
            zoom: ZoomControl::new(),
            spec: GridSpec::default(),
            grid_on: true,
            settings: ViewerSettings::default(),
        }
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        ctx.input(|i| {
            if i.key_pressed(egui::Key::G) {
                self.grid_on = !self.grid_on;
            }
            if i.key_pressed(egui::Key::Num1) {
                self.spec.plane = GridPlane::Xy;
            }
            if i.key_pressed(egui::Key::Num2) {
                self.spec.plane = GridPlane::Yz;
            }
            if i.key_pressed(egui::Key::Num3) {
                self.spec.plane = GridPlane::Zx;
            }
            if i.key_pressed(egui::Key::R) {
                self.zoom.reset();
            }
        });
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Grid");
        ui.checkbox(&mut self.grid_on, "Visible (G)");
        egui::ComboBox::from_label("Plane")
            .selected_text(format!("{:?}", self.spec.plane))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut self.spec.plane, GridPlane::Xy, "XY");
                ui.selectable_value(&mut self.spec.plane, GridPlane::Yz, "YZ");
                ui.selectable_value(&mut self.spec.plane, GridPlane::Zx, "ZX");
            });
        ui.add(egui::Slider::new(&mut self.spec.size, 1.0..=100.0).text("Size"));
        ui.add(egui::Slider::new(&mut self.spec.subdivisions, 1..=50).text("Subdivisions"));

        ui.separator();
        ui.heading("Zoom");
        ui.label(format!("Scale: {:.3}", self.zoom.zoom_value().x));
        if ui.button("Reset (R)").clicked() {
            self.zoom.reset();
        }
        ui.label("Drag horizontally in the viewport to zoom.");
    }

    fn viewport(&mut self, ui: &mut egui::Ui) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());

        // Feed the horizontal pointer coordinate, normalised to [-1, 1]
        // across the viewport, then run the drag session.
        if let Some(pos) = response.hover_pos().or(response.interact_pointer_pos()) {
            let nx = (pos.x - rect.center().x) / (rect.width() * 0.5);
            self.zoom.mouse(nx);
        }
        if response.drag_started() {
            self.zoom.begin_drag();
        }
        if response.drag_stopped() {
            self.zoom.end_drag();
        }
        self.zoom.update();

        if !ui.is_rect_visible(rect) {
            return;
        }

        let Some(viewer) = &self.viewer else { return };
        let viewer = viewer.clone();
        let spec = self.spec;
        let grid_on = self.grid_on;
        let settings = self.settings.clone();

        let aspect = rect.width() / rect.height();
        let proj = Mat4::perspective_rh_gl(
            self.settings.fov_degrees.to_radians(),
            aspect,
            0.1,
            200.0,
        );
        let view = Mat4::look_at_rh(Vec3::new(14.0, 10.0, 14.0), Vec3::ZERO, Vec3::Y);
        let mvp = proj * view * self.zoom.value();

        let callback = egui::PaintCallback {
            rect,
            callback: Arc::new(eframe::egui_glow::CallbackFn::new(move |info, _painter| {
                let clip = info.clip_rect_in_pixels();
                let viewport = [
                    clip.left_px as f32,
                    clip.from_bottom_px as f32,
                    clip.width_px as f32,
                    clip.height_px as f32,
                ];
                if let Ok(mut v) = viewer.lock() {
                    v.paint(viewport, spec, grid_on, mvp, &settings);
                }
            })),
        };
        ui.painter().add(callback);

        // Zoom readout overlay
        ui.painter_at(rect).text(
            rect.left_bottom() + egui::vec2(8.0, -8.0),
            egui::Align2::LEFT_BOTTOM,
            format!("zoom {:.2}x", self.zoom.zoom_value().x),
            egui::FontId::monospace(11.0),
            egui::Color32::from_rgb(160, 160, 170),
        );
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keyboard(ctx);

        egui::SidePanel::left("controls")
            .resizable(false)
            .default_width(210.0)
            .show(ctx, |ui| self.controls(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.viewport(ui));
    }

    fn on_exit(&mut self, _gl: Option<&glow::Context>) {
        if let Some(viewer) = &self.viewer {
            if let Ok(mut v) = viewer.lock() {
                if let Some(mut grid) = v.grid.take() {
                    grid.destroy(&mut v.backend);
                }
                v.backend.destroy();
            }
        }
    }
}
