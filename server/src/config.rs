use std::env;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_SAVE_DIR: &str = "./uploaded_files";
const DEFAULT_MAX_FILE_SIZE: u64 = 2 * 1024 * 1024;
const DEFAULT_BODY_LIMIT: usize = 64 * 1024 * 1024;

/// Server settings, read from `UPSAVE_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Directory uploaded files are moved into
    pub save_dir: PathBuf,
    /// Directory per-request temporary directories are created in
    pub temp_dir: PathBuf,
    /// Largest accepted file, bigger files are reported with error code 1
    pub max_file_size: u64,
    /// Largest accepted request body
    pub body_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            save_dir: PathBuf::from(DEFAULT_SAVE_DIR),
            temp_dir: env::temp_dir(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl Config {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: get_env_parsed("UPSAVE_PORT", defaults.port),
            save_dir: env::var("UPSAVE_SAVE_DIR").map_or(defaults.save_dir, PathBuf::from),
            temp_dir: env::var("UPSAVE_TEMP_DIR").map_or(defaults.temp_dir, PathBuf::from),
            max_file_size: get_env_parsed("UPSAVE_MAX_FILE_SIZE", defaults.max_file_size),
            body_limit: get_env_parsed("UPSAVE_BODY_LIMIT", defaults.body_limit),
        }
    }
}

fn get_env_parsed<T: FromStr + Copy>(key: &str, default: T) -> T {
    let Ok(value) = env::var(key) else {
        return default;
    };
    value.trim().parse().unwrap_or_else(|_| {
        tracing::warn!("{key} has invalid value '{value}', using default");
        default
    })
}
