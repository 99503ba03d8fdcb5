//! Configuration schema definitions.
//!
//! Two kinds of files live in the data directory:
//! - `plugin_settings.toml` → `PluginSettings` (process-wide)
//! - `main.toml` and `extra-configs/<name>.toml` → `MotdConfig` (per entry)
//!
//! All types derive Serde traits and default every field, so a partial file
//! is always valid.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Name of the entry backed by `main.toml`.
pub const DEFAULT_CONFIG_NAME: &str = "default";

/// Icon name that selects any cached icon.
pub const RANDOM_ICON: &str = "random";

/// Process-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PluginSettings {
    /// Whether the host should poll for plugin updates.
    pub update_checker: bool,

    /// Reload automatically when files in the data directory change.
    pub watch_for_changes: bool,

    /// Per-host config selection.
    pub proxy: ProxySettings,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            update_checker: true,
            watch_for_changes: false,
            proxy: ProxySettings::default(),
        }
    }
}

/// Maps the host a client connected through to a config entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxySettings {
    /// Entry used when no virtual host matches.
    pub default_config: String,

    /// Host name (lowercase, no port) → config entry name.
    pub virtual_hosts: BTreeMap<String, String>,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            default_config: DEFAULT_CONFIG_NAME.to_string(),
            virtual_hosts: BTreeMap::new(),
        }
    }
}

impl ProxySettings {
    /// Resolve the config entry for a connection host.
    ///
    /// Matching is case-insensitive and ignores a trailing `:port`.
    pub fn config_for_host(&self, host: Option<&str>) -> &str {
        host.map(strip_port)
            .and_then(|host| {
                self.virtual_hosts
                    .iter()
                    .find(|(candidate, _)| candidate.eq_ignore_ascii_case(host))
                    .map(|(_, name)| name.as_str())
            })
            .unwrap_or(&self.default_config)
    }
}

fn strip_port(host: &str) -> &str {
    match host.rsplit_once(':') {
        Some((name, port)) if !name.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => host,
    }
}

/// A single status message entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Motd {
    /// First status line (raw markup).
    pub line1: String,

    /// Second status line (raw markup).
    pub line2: String,

    /// Logical icon name, or `"random"` for any cached icon.
    pub icon: Option<String>,
}

impl Default for Motd {
    fn default() -> Self {
        Self {
            line1: "<blue>A <bold><red>Minecraft</red></bold> Server".to_string(),
            line2: "<italic><gradient:red:gold>Now with \
                    <bold>{onlinePlayers}/{maxPlayers}</bold> players"
                .to_string(),
            icon: Some(RANDOM_ICON.to_string()),
        }
    }
}

/// Configuration of one MOTD entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MotdConfig {
    /// Replace the status text.
    pub motd_enabled: bool,

    /// Candidate messages; one is chosen at random per request.
    pub motds: Vec<Motd>,

    /// Replace the server icon.
    pub icon_enabled: bool,

    /// Player count adjustments.
    pub player_count: PlayerCountSettings,
}

impl Default for MotdConfig {
    fn default() -> Self {
        Self {
            motd_enabled: true,
            motds: vec![Motd::default()],
            icon_enabled: true,
            player_count: PlayerCountSettings::default(),
        }
    }
}

/// Player count adjustments applied when composing a status response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlayerCountSettings {
    /// Hide the player count entirely.
    pub hide_player_count: bool,

    /// Hide the hover list of online players.
    pub disable_player_list_hover: bool,

    /// Report `max_players` as the maximum.
    pub max_players_enabled: bool,

    pub max_players: u32,

    /// Report `online + x_value` as the maximum. Takes precedence over
    /// `max_players_enabled`.
    pub just_x_more_enabled: bool,

    pub x_value: u32,

    /// Allow the online count to exceed the reported maximum.
    pub allow_exceeding_maximum: bool,

    /// Add fake players to the online count.
    pub fake_players_enabled: bool,

    /// `"N"` adds N, `"A:B"` adds a random value in `[A, B]`,
    /// `"P%"` adds P percent of the real count (rounded up).
    pub fake_players: String,
}

impl Default for PlayerCountSettings {
    fn default() -> Self {
        Self {
            hide_player_count: false,
            disable_player_list_hover: false,
            max_players_enabled: true,
            max_players: 10,
            just_x_more_enabled: false,
            x_value: 3,
            allow_exceeding_maximum: false,
            fake_players_enabled: false,
            fake_players: "25%".to_string(),
        }
    }
}

impl PlayerCountSettings {
    /// Parse the `fake_players` expression.
    pub fn fake_players_mode(&self) -> Result<FakePlayers, String> {
        self.fake_players.parse()
    }
}

/// Parsed form of `PlayerCountSettings::fake_players`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FakePlayers {
    Fixed(u32),
    /// Inclusive range.
    Range(u32, u32),
    Percent(f64),
}

impl FakePlayers {
    /// Number of players to add on top of `online`.
    pub fn extra<R: rand::Rng + ?Sized>(&self, online: u32, rng: &mut R) -> u32 {
        match *self {
            FakePlayers::Fixed(n) => n,
            FakePlayers::Range(min, max) => rng.gen_range(min..=max),
            FakePlayers::Percent(pct) => (online as f64 * pct / 100.0).ceil() as u32,
        }
    }
}

impl std::str::FromStr for FakePlayers {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || format!("invalid fake players value '{s}'");

        if let Some(pct) = s.strip_suffix('%') {
            let pct: f64 = pct.trim().parse().map_err(|_| invalid())?;
            if !pct.is_finite() || pct < 0.0 {
                return Err(invalid());
            }
            return Ok(FakePlayers::Percent(pct));
        }

        if let Some((min, max)) = s.split_once(':') {
            let min: u32 = min.trim().parse().map_err(|_| invalid())?;
            let max: u32 = max.trim().parse().map_err(|_| invalid())?;
            if min > max {
                return Err(format!("fake players range '{s}' has min greater than max"));
            }
            return Ok(FakePlayers::Range(min, max));
        }

        s.parse().map(FakePlayers::Fixed).map_err(|_| invalid())
    }
}
