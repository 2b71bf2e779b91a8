use std::{
    fs,
    path::{Path, PathBuf},
};

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::result::{to_al, AlResult};

lazy_static! {
    pub static ref DEFAULT_HOMEDIR: PathBuf = match dirs::home_dir() {
        Some(home) => home.join(".annolab"),
        None => std::env::temp_dir().join(".annolab"),
    };
}

const CFG_DEFAULT: &str = r##"
    default_label = "object"
    default_color = "#FF0000"
    default_stroke_width = 2.0
    n_autosaves = 2
"##;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Cfg {
    pub default_label: String,
    pub default_color: String,
    pub default_stroke_width: f64,
    pub n_autosaves: u8,
    pub home_folder: Option<String>,
    pub darkmode: Option<bool>,
}

impl Cfg {
    pub fn home_folder(&self) -> PathBuf {
        match &self.home_folder {
            Some(hf) => PathBuf::from(hf),
            None => DEFAULT_HOMEDIR.clone(),
        }
    }
}

impl Default for Cfg {
    fn default() -> Self {
        // the embedded default string is valid toml
        toml::from_str(CFG_DEFAULT).unwrap_or(Cfg {
            default_label: "object".to_string(),
            default_color: "#FF0000".to_string(),
            default_stroke_width: 2.0,
            n_autosaves: 2,
            home_folder: None,
            darkmode: None,
        })
    }
}

pub fn cfg_path(home_folder: &Path) -> PathBuf {
    home_folder.join("cfg.toml")
}

pub fn get_log_folder(home_folder: &Path) -> PathBuf {
    home_folder.join("logs")
}

/// The user config, the embedded default if no config file exists yet.
pub fn read_cfg_from(home_folder: &Path) -> AlResult<Cfg> {
    let path = cfg_path(home_folder);
    if path.exists() {
        let s = fs::read_to_string(&path).map_err(to_al)?;
        toml::from_str(&s).map_err(to_al)
    } else {
        Ok(Cfg::default())
    }
}

pub fn read_cfg() -> AlResult<Cfg> {
    read_cfg_from(&DEFAULT_HOMEDIR)
}

pub fn write_cfg_to(cfg: &Cfg, home_folder: &Path) -> AlResult<()> {
    fs::create_dir_all(home_folder).map_err(to_al)?;
    let s = toml::to_string_pretty(cfg).map_err(to_al)?;
    fs::write(cfg_path(home_folder), s).map_err(to_al)?;
    info!("wrote cfg to {home_folder:?}");
    Ok(())
}

#[test]
fn test_default_cfg_parses() {
    let cfg = Cfg::default();
    assert_eq!(cfg.default_label, "object");
    assert_eq!(cfg.default_color, "#FF0000");
    assert!((cfg.default_stroke_width - 2.0).abs() < 1e-9);
    assert_eq!(cfg.n_autosaves, 2);
}

#[test]
fn test_cfg_roundtrip() {
    let tmp = std::env::temp_dir().join(format!("annolab_cfg_test_{}", std::process::id()));
    let mut cfg = Cfg::default();
    cfg.darkmode = Some(true);
    write_cfg_to(&cfg, &tmp).unwrap();
    let read = read_cfg_from(&tmp).unwrap();
    std::fs::remove_dir_all(&tmp).ok();
    assert_eq!(read, cfg);
}

#[test]
fn test_missing_file_yields_default() {
    let tmp = std::env::temp_dir().join("annolab_cfg_does_not_exist");
    assert_eq!(read_cfg_from(&tmp).unwrap(), Cfg::default());
}
