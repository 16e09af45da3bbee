//! Demo configuration resource.
//!
//! Settings of the demo binary, loaded from an INI file. Defaults allow the
//! demo to start without a file.
//!
//! # Configuration File Format
//!
//! ```ini
//! [assets]
//! manifest = ./assets/manifest.json
//! palette = units
//!
//! [animation]
//! mode = WL
//! weapon_class = HTH
//! direction = 0
//! speed = 256
//!
//! [time]
//! time_scale = 1.0
//! tick = 0.04
//! ticks = 100
//! ```

use std::path::PathBuf;

use configparser::ini::Ini;
use log::info;

use crate::error::{CompositeError, Result};

const DEFAULT_MANIFEST: &str = "./assets/manifest.json";
const DEFAULT_PALETTE: &str = "units";
const DEFAULT_MODE: &str = "NU";
const DEFAULT_WEAPON_CLASS: &str = "HTH";
const DEFAULT_TIME_SCALE: f64 = 1.0;
const DEFAULT_TICK: f64 = 0.04;
const DEFAULT_TICKS: u64 = 100;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    /// JSON asset manifest.
    pub manifest: PathBuf,
    pub palette: String,
    pub mode: String,
    pub weapon_class: String,
    /// Abstract facing in `[0, 64)`.
    pub direction: usize,
    /// Raw speed override. The timing table speed is used when unset.
    pub speed: Option<i32>,
    pub time_scale: f64,
    /// Seconds per simulated tick.
    pub tick: f64,
    pub ticks: u64,
    pub config_path: PathBuf,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoConfig {
    pub fn new() -> Self {
        Self {
            manifest: PathBuf::from(DEFAULT_MANIFEST),
            palette: DEFAULT_PALETTE.to_string(),
            mode: DEFAULT_MODE.to_string(),
            weapon_class: DEFAULT_WEAPON_CLASS.to_string(),
            direction: 0,
            speed: None,
            time_scale: DEFAULT_TIME_SCALE,
            tick: DEFAULT_TICK,
            ticks: DEFAULT_TICKS,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values keep their current values. Malformed values are errors.
    pub fn load_from_file(&mut self) -> Result<()> {
        let mut config = Ini::new_cs();
        config
            .load(&self.config_path)
            .map_err(|e| CompositeError::Config(format!("failed to load {:?}: {}", self.config_path, e)))?;

        // [assets] section
        if let Some(manifest) = config.get("assets", "manifest") {
            self.manifest = PathBuf::from(manifest);
        }
        if let Some(palette) = config.get("assets", "palette") {
            self.palette = palette;
        }

        // [animation] section
        if let Some(mode) = config.get("animation", "mode") {
            self.mode = mode;
        }
        if let Some(weapon_class) = config.get("animation", "weapon_class") {
            self.weapon_class = weapon_class;
        }
        if let Some(direction) = config.getuint("animation", "direction").map_err(CompositeError::Config)? {
            self.direction = direction as usize;
        }
        if let Some(speed) = config.getint("animation", "speed").map_err(CompositeError::Config)? {
            self.speed = Some(speed as i32);
        }

        // [time] section
        if let Some(time_scale) = config.getfloat("time", "time_scale").map_err(CompositeError::Config)? {
            self.time_scale = time_scale;
        }
        if let Some(tick) = config.getfloat("time", "tick").map_err(CompositeError::Config)? {
            self.tick = tick;
        }
        if let Some(ticks) = config.getuint("time", "ticks").map_err(CompositeError::Config)? {
            self.ticks = ticks;
        }

        info!(
            "Loaded config: manifest={:?}, palette={}, mode={}{}, direction={}, tick={}s x{}",
            self.manifest, self.palette, self.mode, self.weapon_class, self.direction, self.tick, self.ticks
        );

        Ok(())
    }

    /// Save configuration to the INI file, creating it if needed.
    pub fn save_to_file(&self) -> Result<()> {
        let mut config = Ini::new_cs();

        // [assets] section
        config.set("assets", "manifest", Some(self.manifest.display().to_string()));
        config.set("assets", "palette", Some(self.palette.clone()));

        // [animation] section
        config.set("animation", "mode", Some(self.mode.clone()));
        config.set("animation", "weapon_class", Some(self.weapon_class.clone()));
        config.set("animation", "direction", Some(self.direction.to_string()));
        if let Some(speed) = self.speed {
            config.set("animation", "speed", Some(speed.to_string()));
        }

        // [time] section
        config.set("time", "time_scale", Some(self.time_scale.to_string()));
        config.set("time", "tick", Some(self.tick.to_string()));
        config.set("time", "ticks", Some(self.ticks.to_string()));

        config.write(&self.config_path)?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}
