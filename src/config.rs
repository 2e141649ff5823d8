use anyhow::{Context, Result, anyhow};
use env_logger::Builder;
use log::LevelFilter;
use std::{
    env,
    ffi::OsString,
    fs,
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
};

use crate::client::DEFAULT_API_BASE;
use crate::pipeline::{DEFAULT_CHANNEL_ID, DEFAULT_PLAYLIST_PAGES, PipelineConfig};

pub const DEFAULT_CONFIG_PATH: &str = ".env.local";
/// Environment variable pointing at an alternative config file.
pub const CONFIG_PATH_VAR: &str = "VOA_CONFIG";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_THUMBNAILS_DIR: &str = "public/thumbnails";

/// `info` by default, `RUST_LOG` refines it.
pub fn init_logger() {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Raw values as found in the env file and the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    pub youtube_api_key: Option<String>,
    pub youtube_channel_id: Option<String>,
    pub youtube_api_base: Option<String>,
    pub playlist_pages: Option<u32>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub thumbnails_dir: Option<PathBuf>,
}

impl EnvConfig {
    /// Applies one `KEY=value` pair. Unknown keys are ignored and empty values
    /// leave the current setting alone.
    fn apply(&mut self, key: &str, value: &str, origin: &str) -> Result<()> {
        let value = value.trim().trim_matches('"');
        if value.is_empty() {
            return Ok(());
        }
        match key {
            "YOUTUBE_API_KEY" => self.youtube_api_key = Some(value.to_string()),
            "YOUTUBE_CHANNEL_ID" => self.youtube_channel_id = Some(value.to_string()),
            "YOUTUBE_API_BASE" => self.youtube_api_base = Some(value.to_string()),
            "YOUTUBE_PLAYLIST_PAGES" => {
                let pages: u32 = value
                    .parse()
                    .with_context(|| format!("Parsing YOUTUBE_PLAYLIST_PAGES from {origin}"))?;
                self.playlist_pages = Some(pages);
            }
            "VOA_HOST" => self.host = Some(value.to_string()),
            "VOA_PORT" => {
                let port: u16 = value
                    .parse()
                    .with_context(|| format!("Parsing VOA_PORT from {origin}"))?;
                self.port = Some(port);
            }
            "THUMBNAILS_DIR" => self.thumbnails_dir = Some(PathBuf::from(value)),
            _ => {}
        }
        Ok(())
    }

    /// Overlays process environment variables on top of file values.
    pub fn merge_env<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            self.apply(&key, &value, "the environment")?;
        }
        Ok(())
    }
}

/// Keeps the variables whose key and value are both valid UTF-8.
pub fn utf8_vars<I>(vars: I) -> impl Iterator<Item = (String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
}

pub fn read_env_config(path: &Path) -> Result<Option<EnvConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
    let origin = path.display().to_string();
    let mut cfg = EnvConfig::default();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
        if let Some((key, value_raw)) = trimmed.split_once('=') {
            cfg.apply(key.trim(), value_raw, &origin)?;
        }
    }
    Ok(Some(cfg))
}

/// Fully resolved settings shared by the binaries.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub host: String,
    pub port: u16,
    pub thumbnails_dir: PathBuf,
}

impl AppConfig {
    /// Reads `$VOA_CONFIG` (or `.env.local`) and then the process
    /// environment. A missing file is fine.
    pub fn load() -> Result<Self> {
        let path = env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(path, utf8_vars(env::vars_os()))
    }

    pub fn load_from<I>(path: impl AsRef<Path>, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut cfg = read_env_config(path.as_ref())?.unwrap_or_default();
        cfg.merge_env(vars)?;
        Ok(Self::from_env_config(cfg))
    }

    pub fn from_env_config(cfg: EnvConfig) -> Self {
        let pipeline = PipelineConfig {
            api_key: cfg.youtube_api_key,
            channel_id: cfg
                .youtube_channel_id
                .unwrap_or_else(|| DEFAULT_CHANNEL_ID.to_string()),
            api_base: cfg
                .youtube_api_base
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            playlist_pages: cfg.playlist_pages.unwrap_or(DEFAULT_PLAYLIST_PAGES),
        };
        Self {
            pipeline,
            host: cfg.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: cfg.port.unwrap_or(DEFAULT_PORT),
            thumbnails_dir: cfg
                .thumbnails_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_THUMBNAILS_DIR)),
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|err| anyhow!("Invalid VOA_HOST {:?}: {err}", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn make_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn read_env_config_extracts_values() {
        let cfg = make_config(
            "# YouTube\nYOUTUBE_API_KEY=\"abc123\"\nexport YOUTUBE_CHANNEL_ID=UCxyz\nVOA_PORT=\"4242\"\nNEXT_PUBLIC_SITE_URL=https://voa.example\n",
        );
        let parsed = read_env_config(cfg.path()).unwrap().unwrap();
        assert_eq!(parsed.youtube_api_key.as_deref(), Some("abc123"));
        assert_eq!(parsed.youtube_channel_id.as_deref(), Some("UCxyz"));
        assert_eq!(parsed.port, Some(4242));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let app = AppConfig::load_from(dir.path().join("absent.env"), Vec::new()).unwrap();
        assert_eq!(app.pipeline.api_key, None);
        assert_eq!(app.pipeline.channel_id, DEFAULT_CHANNEL_ID);
        assert_eq!(app.pipeline.api_base, DEFAULT_API_BASE);
        assert_eq!(app.pipeline.playlist_pages, DEFAULT_PLAYLIST_PAGES);
        assert_eq!(app.port, DEFAULT_PORT);
        assert_eq!(app.host, DEFAULT_HOST);
        assert_eq!(app.thumbnails_dir, PathBuf::from(DEFAULT_THUMBNAILS_DIR));
    }

    #[test]
    fn environment_overrides_file() {
        let cfg = make_config("YOUTUBE_API_KEY=from-file\nVOA_HOST=0.0.0.0\n");
        let app = AppConfig::load_from(
            cfg.path(),
            vars(&[("YOUTUBE_API_KEY", "from-env"), ("YOUTUBE_PLAYLIST_PAGES", "3")]),
        )
        .unwrap();
        assert_eq!(app.pipeline.api_key.as_deref(), Some("from-env"));
        assert_eq!(app.pipeline.playlist_pages, 3);
        assert_eq!(app.host, "0.0.0.0");
    }

    #[test]
    fn empty_api_key_is_treated_as_absent() {
        let cfg = make_config("YOUTUBE_API_KEY=\"\"\n");
        let app = AppConfig::load_from(cfg.path(), vars(&[("YOUTUBE_API_KEY", "")])).unwrap();
        assert_eq!(app.pipeline.api_key, None);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_environment_entries_are_skipped() {
        use std::os::unix::ffi::OsStringExt;

        let dir = tempfile::tempdir().unwrap();
        let vars = vec![
            (OsString::from("LATIN1_VALUE"), OsString::from_vec(b"f\xff".to_vec())),
            (OsString::from_vec(b"K\xe9Y".to_vec()), OsString::from("x")),
            (OsString::from("YOUTUBE_API_KEY"), OsString::from("from-env")),
        ];
        let app = AppConfig::load_from(dir.path().join("absent.env"), utf8_vars(vars)).unwrap();
        assert_eq!(app.pipeline.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn invalid_port_is_an_error() {
        let cfg = make_config("VOA_PORT=not-a-port\n");
        let err = read_env_config(cfg.path()).unwrap_err();
        assert!(format!("{err:#}").contains("VOA_PORT"));
    }

    #[test]
    fn bind_addr_rejects_hostnames() {
        let mut app = AppConfig::from_env_config(EnvConfig::default());
        assert_eq!(app.bind_addr().unwrap().to_string(), "127.0.0.1:3001");
        app.host = "localhost".into();
        assert!(app.bind_addr().is_err());
    }
}
