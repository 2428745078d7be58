use cga::palette::{Palette, PaletteSelection};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

const CONFIG_FILE: &str = "config.toml";
const MAX_RECENT: usize = 10;
const DEFAULT_SCALE: f32 = 2.0;
pub const MIN_SCALE: f32 = 1.0;
pub const MAX_SCALE: f32 = 6.0;

// Persisted viewer settings. Missing keys fall back to the defaults so older
// files keep loading.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub palette: u8,
    pub intensity: bool,
    pub background: u8,
    pub scale: f32,
    pub recent_dumps: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            palette: 0,
            intensity: false,
            background: 0,
            scale: DEFAULT_SCALE,
            recent_dumps: Vec::new(),
        }
    }
}

impl Config {
    pub fn selection(&self) -> PaletteSelection {
        let palette = Palette::from_index(self.palette).unwrap_or_else(|e| {
            log::warn!("ignoring saved palette: {}", e);
            Palette::Palette0
        });
        PaletteSelection::new(palette, self.intensity, self.background)
    }

    pub fn remember(&mut self, selection: &PaletteSelection) {
        self.palette = selection.palette.index();
        self.intensity = selection.intensity;
        self.background = selection.background;
    }

    /// Pulls a hand-edited window scale back into the range the viewer draws.
    pub fn sanitized(mut self) -> Self {
        self.scale = clamp_scale(self.scale);
        self
    }

    pub fn add_recent(&mut self, path: PathBuf) {
        if let Some(index) = self.recent_dumps.iter().position(|p| p == &path) {
            self.recent_dumps.remove(index);
        }
        self.recent_dumps.insert(0, path);
        self.recent_dumps.truncate(MAX_RECENT);
    }
}

pub fn clamp_scale(scale: f32) -> f32 {
    if scale.is_nan() {
        DEFAULT_SCALE
    } else {
        scale.clamp(MIN_SCALE, MAX_SCALE)
    }
}

fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "cgapal", "cgapal")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

pub fn load_config() -> Config {
    let Some(mut path) = config_dir() else {
        return Config::default();
    };
    path.push(CONFIG_FILE);
    let Ok(config_str) = fs::read_to_string(&path) else {
        return Config::default();
    };
    toml::from_str::<Config>(&config_str)
        .map(Config::sanitized)
        .unwrap_or_else(|e| {
            log::warn!("{} is not valid, using defaults: {}", path.display(), e);
            Config::default()
        })
}

pub fn save_config(config: &Config) -> io::Result<()> {
    if let Some(mut path) = config_dir() {
        fs::create_dir_all(&path)?;
        path.push(CONFIG_FILE);
        let config_str = toml::to_string(config).map_err(io::Error::other)?;
        fs::write(&path, config_str)?;
    }
    Ok(())
}
