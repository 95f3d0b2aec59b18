//! Configuration types for sheetcast.
//!
//! [`Config::load`] layers an optional `config.toml` over the built-in
//! defaults. [`Config::defaults`] returns the same defaults without touching
//! the filesystem (useful in tests).

use serde::Deserialize;
use std::path::Path;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[source]
root         = "."
spreadsheet  = "Messages"
worksheet    = "Media Log"
timeout_secs = 30

[selection]
date_column        = "date"
visibility_column  = "visibility"
visibility         = "Public"
link_column        = "audiolink"
link_prefix        = "http"
category_column    = "playlist"
category           = "Service"
title_column       = "name"
description_column = "description"
max_entries        = 6

[entry]
author               = "podcast@example.org (Sunday Services)"
category             = "Sermon"
publish_hour         = 10
utc_offset           = "+00:00"
date_pattern         = "%a, %d %b %Y %H:%M:%S %z"
fallback_description = "{title} message from {date}"

[enclosure]
media_type     = "audio/mpeg"
default_length = 50000000
probe          = true
probe_timeout_secs = 10

[channel]
title           = "Sunday Services"
link            = "http://www.example.org/"
description     = "Podcast of Sunday services"
language        = "en-us"
copyright       = "Copyright Sunday Services"
managing_editor = "podcast@example.org (Sunday Services)"
web_master      = "webmaster@example.org (Webmaster)"
category        = "Sermon"
ttl             = 60
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    pub selection: SelectionConfig,
    pub entry: EntryConfig,
    pub enclosure: EnclosureConfig,
    pub channel: ChannelConfig,
}

/// `[source]`: where the media log lives.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Directory bare spreadsheet names are resolved against
    pub root: PathBuf,
    /// Spreadsheet name, workbook path or download URL
    pub spreadsheet: String,
    pub worksheet: String,
    /// Download timeout for remote workbooks
    pub timeout_secs: u64,
}

/// `[selection]`: which columns drive the feed and which rows qualify.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectionConfig {
    pub date_column: String,
    pub visibility_column: String,
    pub visibility: String,
    pub link_column: String,
    pub link_prefix: String,
    pub category_column: String,
    pub category: String,
    pub title_column: String,
    pub description_column: String,
    pub max_entries: usize,
    /// Restricts entries to these days of the week when not empty
    #[serde(default)]
    pub weekdays: Vec<String>,
}

/// `[entry]`
#[derive(Debug, Clone, Deserialize)]
pub struct EntryConfig {
    pub author: String,
    pub category: String,
    /// Hours after midnight of the logged date an entry is published
    pub publish_hour: i64,
    /// Fixed offset such as `+00:00` or `-06:00`
    pub utc_offset: String,
    /// `strftime` pattern of `<pubDate>`
    pub date_pattern: String,
    /// Description of entries without one; `{title}` and `{date}` are replaced
    pub fallback_description: String,
}

/// `[enclosure]`
#[derive(Debug, Clone, Deserialize)]
pub struct EnclosureConfig {
    pub media_type: String,
    /// Byte length used when the real length cannot be looked up
    pub default_length: u64,
    /// Whether to send HEAD requests for enclosure lengths
    pub probe: bool,
    pub probe_timeout_secs: u64,
}

/// `[channel]`: feed header metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelConfig {
    pub title: String,
    pub link: String,
    pub description: String,
    pub language: String,
    pub copyright: String,
    pub managing_editor: String,
    pub web_master: String,
    pub category: String,
    pub ttl: u32,
    #[serde(default)]
    pub image: Option<ImageConfig>,
    /// Public URL of the feed itself, written as `<atom:link rel="self">`
    #[serde(default)]
    pub self_link: Option<String>,
}

/// `[channel.image]`
#[derive(Debug, Clone, Deserialize)]
pub struct ImageConfig {
    pub url: String,
    pub title: String,
    pub link: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Loads the built-in defaults overlaid with a config file.
    ///
    /// An explicit `path` must exist. Without one,
    /// `$XDG_CONFIG_HOME/sheetcast/config.toml` is used when present.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::from(config_path().as_path()).required(false),
        };

        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(file)
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("sheetcast")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
