mod config;

use cga::bus::Adapter;
use cga::input::{read_command, KeyQueue, KEY_ESCAPE, SCAN_DOWN, SCAN_UP};
use cga::mem::OffscreenBuffer;
use cga::palette::PaletteSelection;
use cga::video::{framebuffer_cga_to_rgba, CGA_SCREEN_H, CGA_SCREEN_W};
use cga::{Flow, Session};
use clap::Parser;
use config::{clamp_scale, load_config, save_config, Config, MAX_SCALE, MIN_SCALE};
use eframe::egui;
use egui::IconData;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(version, about = "CGA 320x200 four-color palette viewer.", long_about = None)]
struct Args {
    /// Raw 16 KiB video memory dump to show instead of the test pattern.
    #[arg(name = "DUMP_PATH")]
    dump_path: Option<PathBuf>,

    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=2))]
    palette: Option<u8>,

    #[arg(long)]
    intensity: bool,

    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=15))]
    background: Option<u8>,

    #[arg(long)]
    scale: Option<f32>,
}

#[derive(Clone)]
struct DisplayLogEntry {
    level: log::Level,
    target: String,
    message: String,
}

impl From<cga::log_buffer::LogEntry> for DisplayLogEntry {
    fn from(entry: cga::log_buffer::LogEntry) -> Self {
        Self {
            level: entry.level,
            target: entry.target,
            message: entry.message,
        }
    }
}

enum AppState {
    Graphics,
    // Escape was pressed and the adapter is back in 80x25 text.
    TextMode,
}

struct CgaApp {
    state: AppState,
    config: Config,
    session: Session<Adapter>,
    keys: KeyQueue,
    rgba: Vec<u8>,
    texture: Option<egui::TextureHandle>,
    show_debug_panel: bool,
    log_entries: Vec<DisplayLogEntry>,
    auto_scroll_logs: bool,
    log_filter: log::LevelFilter,
    dropped_logs: usize,
}

fn read_dump(path: &Path) -> io::Result<OffscreenBuffer> {
    let data = fs::read(path)?;
    let mut buffer = OffscreenBuffer::new();
    buffer
        .load(&data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(buffer)
}

fn start_session(selection: PaletteSelection, dump: Option<&Path>) -> Session<Adapter> {
    if let Some(path) = dump {
        match read_dump(path) {
            Ok(buffer) => return Session::with_buffer(Adapter::new(), selection, buffer),
            Err(e) => log::error!("cannot load {}: {}", path.display(), e),
        }
    }
    Session::start(Adapter::new(), selection).unwrap_or_else(|e| {
        log::error!("test pattern failed: {}", e);
        Session::with_buffer(Adapter::new(), selection, OffscreenBuffer::new())
    })
}

impl CgaApp {
    fn new(args: Args) -> Self {
        let mut config = load_config();
        if let Some(palette) = args.palette {
            config.palette = palette;
        }
        if args.intensity {
            config.intensity = true;
        }
        if let Some(background) = args.background {
            config.background = background;
        }
        if let Some(scale) = args.scale {
            config.scale = clamp_scale(scale);
        }
        if let Some(path) = &args.dump_path {
            config.add_recent(path.clone());
        }

        let session = start_session(config.selection(), args.dump_path.as_deref());
        Self {
            state: AppState::Graphics,
            config,
            session,
            keys: KeyQueue::new(),
            rgba: vec![0u8; CGA_SCREEN_W * CGA_SCREEN_H * 4],
            texture: None,
            show_debug_panel: cfg!(debug_assertions),
            log_entries: Vec::new(),
            auto_scroll_logs: true,
            log_filter: log::LevelFilter::Trace,
            dropped_logs: 0,
        }
    }

    fn restart(&mut self) {
        self.session = start_session(self.config.selection(), None);
        self.state = AppState::Graphics;
    }

    fn open_dump(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .set_title("Load CGA screen dump")
            .add_filter("CGA screen dump", &["bin", "cga", "pic"])
            .pick_file()
        {
            self.load_dump(&path);
        }
    }

    fn load_dump(&mut self, path: &Path) {
        let result = fs::read(path).and_then(|data| {
            self.session
                .load_image(&data)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
        });
        match result {
            Ok(()) => {
                log::info!("loaded {}", path.display());
                self.config.add_recent(path.to_path_buf());
            }
            Err(e) => log::error!("cannot load {}: {}", path.display(), e),
        }
    }

    fn save_dump(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_title("Save CGA screen dump")
            .add_filter("CGA screen dump", &["bin"])
            .set_file_name("screen.bin")
            .save_file()
        else {
            return;
        };
        match fs::write(&path, self.session.buffer().as_bytes()) {
            Ok(()) => {
                log::info!("saved {}", path.display());
                self.config.add_recent(path);
            }
            Err(e) => log::error!("cannot save {}: {}", path.display(), e),
        }
    }

    // Translates window key events into the byte stream a DOS keyboard
    // would deliver, cursor keys as 0xE0-prefixed scan codes.
    fn collect_keys(&mut self, ctx: &egui::Context) {
        let keys = &mut self.keys;
        ctx.input(|i| {
            for event in &i.events {
                match event {
                    egui::Event::Text(text) => {
                        for c in text.chars().filter(char::is_ascii) {
                            keys.push(c as u8);
                        }
                    }
                    egui::Event::Key { key, pressed: true, .. } => match key {
                        egui::Key::ArrowUp => keys.push_extended(SCAN_UP),
                        egui::Key::ArrowDown => keys.push_extended(SCAN_DOWN),
                        egui::Key::Escape => keys.push(KEY_ESCAPE),
                        _ => {}
                    },
                    _ => {}
                }
            }
        });
    }

    fn process_keys(&mut self) {
        while !self.keys.is_empty() {
            let command = read_command(&mut self.keys);
            if matches!(self.state, AppState::TextMode) {
                continue;
            }
            if self.session.handle(command) == Flow::Quit {
                self.session.shutdown();
                self.state = AppState::TextMode;
            }
        }
        self.config.remember(self.session.selection());
    }

    fn poll_logs(&mut self) {
        let new_logs = cga::log_buffer::drain_logs();
        self.dropped_logs = cga::log_buffer::dropped_logs();
        for entry in new_logs {
            self.log_entries.push(entry.into());
        }
        const MAX_LOG_ENTRIES: usize = 2000;
        if self.log_entries.len() > MAX_LOG_ENTRIES {
            let excess = self.log_entries.len() - MAX_LOG_ENTRIES;
            self.log_entries.drain(0..excess);
        }
    }

    fn level_color(level: log::Level) -> egui::Color32 {
        match level {
            log::Level::Error => egui::Color32::from_rgb(255, 100, 100),
            log::Level::Warn => egui::Color32::from_rgb(255, 200, 100),
            log::Level::Info => egui::Color32::from_rgb(100, 200, 255),
            log::Level::Debug => egui::Color32::from_rgb(180, 180, 180),
            log::Level::Trace => egui::Color32::from_rgb(120, 120, 120),
        }
    }

    // Shows `level` and everything more severe.
    fn filter_matches(&self, level: log::Level) -> bool {
        level <= self.log_filter
    }

    fn register_grid(&self, ui: &mut egui::Ui) {
        let adapter = self.session.hardware();
        egui::Grid::new("registers").num_columns(2).show(ui, |ui| {
            ui.label("Mode");
            match adapter.mode() {
                Some(mode) => ui.monospace(format!("{:?} ({:#04x})", mode, mode.bios_number())),
                None => ui.monospace("unknown"),
            };
            ui.end_row();
            ui.label("3D8 mode control");
            ui.monospace(format!("{:#010b}", adapter.io.read8(cga::io::PORT_MODE_CONTROL)));
            ui.end_row();
            ui.label("3D9 color select");
            ui.monospace(format!("{:#010b}", adapter.io.read8(cga::io::PORT_COLOR_SELECT)));
            ui.end_row();
            ui.label("Mode switches");
            ui.monospace(adapter.mode_switches().to_string());
            ui.end_row();
        });
    }
}

impl eframe::App for CgaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.collect_keys(ctx);
        self.process_keys();
        self.poll_logs();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Load Screen Dump...").clicked() {
                        self.open_dump();
                        ui.close_menu();
                    }
                    if ui.button("Save Screen Dump...").clicked() {
                        self.save_dump();
                        ui.close_menu();
                    }
                    let mut picked = None;
                    ui.menu_button("Recent", |ui| {
                        if self.config.recent_dumps.is_empty() {
                            ui.label("No recent files");
                        }
                        for file in &self.config.recent_dumps {
                            if ui.button(file.display().to_string()).clicked() {
                                picked = Some(file.clone());
                            }
                        }
                    });
                    if let Some(path) = picked {
                        self.load_dump(&path);
                        ui.close_menu();
                    }
                    if ui.button("Redraw Test Pattern").clicked() {
                        if let Err(e) = self.session.redraw_test_pattern() {
                            log::error!("test pattern failed: {}", e);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("Palette", |ui| {
                    let selection = *self.session.selection();
                    let choices = [
                        (b'0', "Green/Red/Brown"),
                        (b'1', "Cyan/Magenta/Grey"),
                        (b'2', "Cyan/Red/Grey"),
                    ];
                    for (key, label) in choices {
                        let index = key - b'0';
                        let selected = selection.palette.index() == index;
                        if ui.radio(selected, format!("{index}: {label}")).clicked() {
                            self.keys.push(key);
                            ctx.request_repaint();
                        }
                    }
                    ui.separator();
                    let mut intensity = selection.intensity;
                    if ui.checkbox(&mut intensity, "High Intensity (I)").clicked() {
                        self.keys.push(b'I');
                        ctx.request_repaint();
                    }
                    ui.horizontal(|ui| {
                        if ui.button("Background -").clicked() {
                            self.keys.push_extended(SCAN_DOWN);
                            ctx.request_repaint();
                        }
                        if ui.button("Background +").clicked() {
                            self.keys.push_extended(SCAN_UP);
                            ctx.request_repaint();
                        }
                    });
                });
                ui.menu_button("Window", |ui| {
                    let scale = egui::Slider::new(&mut self.config.scale, MIN_SCALE..=MAX_SCALE);
                    ui.add(scale.text("Scale"));
                    if ui.checkbox(&mut self.show_debug_panel, "Debug Panel").clicked() {
                        ui.close_menu();
                    }
                });
            });
        });

        if self.show_debug_panel {
            egui::SidePanel::right("debug_panel")
                .resizable(true)
                .min_width(250.0)
                .default_width(350.0)
                .max_width(500.0)
                .show(ctx, |ui| {
                    ui.heading("Adapter");
                    ui.separator();
                    self.register_grid(ui);
                    ui.separator();

                    ui.heading("Debug Log");
                    ui.separator();

                    ui.horizontal(|ui| {
                        ui.label("Filter:");
                        for (level, label) in [
                            (log::LevelFilter::Trace, "All"),
                            (log::LevelFilter::Debug, "Debug"),
                            (log::LevelFilter::Info, "Info"),
                            (log::LevelFilter::Warn, "Warn"),
                            (log::LevelFilter::Error, "Error"),
                        ] {
                            ui.selectable_value(&mut self.log_filter, level, label);
                        }
                    });

                    ui.horizontal(|ui| {
                        ui.checkbox(&mut self.auto_scroll_logs, "Auto-scroll");
                        if ui.button("Clear").clicked() {
                            self.log_entries.clear();
                        }
                    });
                    if self.dropped_logs > 0 {
                        ui.label(format!("{} older entries dropped", self.dropped_logs));
                    }
                    ui.separator();

                    let text_style = egui::TextStyle::Monospace;
                    let row_height = ui.text_style_height(&text_style);
                    let filtered: Vec<_> = self
                        .log_entries
                        .iter()
                        .filter(|e| self.filter_matches(e.level))
                        .collect();

                    egui::ScrollArea::vertical()
                        .auto_shrink([true, false])
                        .stick_to_bottom(self.auto_scroll_logs)
                        .show_rows(ui, row_height, filtered.len(), |ui, row_range| {
                            for i in row_range {
                                if let Some(entry) = filtered.get(i) {
                                    let color = Self::level_color(entry.level);
                                    let short_target = entry.target.split("::").last().unwrap_or(&entry.target);
                                    ui.horizontal(|ui| {
                                        ui.colored_label(color, format!("[{:5}]", entry.level));
                                        ui.colored_label(egui::Color32::GRAY, format!("{:>8}", short_target));
                                        ui.label(&entry.message);
                                    });
                                }
                            }
                        });
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            match self.state {
                AppState::TextMode => {
                    ui.heading("80x25 Text Mode");
                    ui.label("The adapter was returned to text mode.");
                    ui.separator();
                    if ui.button("Restart").clicked() {
                        self.restart();
                    }
                }
                AppState::Graphics => {
                    let selection = self.session.selection();
                    ui.heading("320x200 Four-Color Graphics");
                    ui.label(format!(
                        "Palette {}  Intensity {}  Background {}    [0/1/2] palette  [I] intensity  [Up/Down] background  [Esc] text mode",
                        selection.palette.index(),
                        if selection.intensity { "high" } else { "low" },
                        selection.background,
                    ));
                    ui.separator();

                    let adapter = self.session.hardware();
                    framebuffer_cga_to_rgba(&mut self.rgba, &adapter.vram, &adapter.io);
                    let size = [CGA_SCREEN_W, CGA_SCREEN_H];
                    let image = egui::ColorImage::from_rgba_unmultiplied(size, &self.rgba);
                    let tex = self.texture.get_or_insert_with(|| {
                        ui.ctx().load_texture(
                            "framebuffer",
                            image.clone(),
                            egui::TextureOptions::NEAREST,
                        )
                    });
                    tex.set(image, egui::TextureOptions::NEAREST);

                    let scale = self.config.scale;
                    let desired = egui::Vec2::new(
                        CGA_SCREEN_W as f32 * scale,
                        CGA_SCREEN_H as f32 * scale,
                    );
                    ui.image((tex.id(), desired));
                }
            }
        });
    }

    // Remember the palette, scale and recent dumps for the next run.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if matches!(self.state, AppState::Graphics) {
            self.session.shutdown();
        }
        self.config.remember(self.session.selection());
        if let Err(e) = save_config(&self.config) {
            eprintln!("Failed to save config: {}", e);
        }
    }
}

fn main() -> eframe::Result<()> {
    let log_level = if cfg!(feature = "debug_logs") {
        log::LevelFilter::Trace
    } else if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let _ = cga::log_buffer::init_logger(log_level);

    let args = Args::parse();
    let icon = IconData::default();
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 640.0])
            .with_title("cgapal - CGA Palette Viewer")
            .with_app_id("com.cgapal.viewer")
            .with_icon(icon),
        ..Default::default()
    };

    eframe::run_native(
        "cgapal",
        native_options,
        Box::new(|_cc| Ok(Box::new(CgaApp::new(args)))),
    )
}
