//! Status response composition.
//!
//! # Responsibilities
//! - Select the config entry for the connection host
//! - Apply player count adjustments (fake players, max players)
//! - Pick a MOTD and its icon
//!
//! # Design Decisions
//! - Works on a borrowed snapshot; never touches the coordinator
//! - Markup is passed through untouched, only player placeholders are filled
//! - Randomness is injectable for deterministic tests

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::config::schema::{MotdConfig, PlayerCountSettings};
use crate::icon::EncodedIcon;
use crate::motd::snapshot::MotdSnapshot;

pub use crate::config::schema::RANDOM_ICON;

const ONLINE_PLACEHOLDER: &str = "{onlinePlayers}";
const MAX_PLACEHOLDER: &str = "{maxPlayers}";

/// Player counts reported to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerCount {
    pub online: u32,
    pub max: u32,
}

/// Everything the status-response builder needs for one probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Snapshot the response was built from.
    pub generation: u64,
    /// Two status lines joined by `\n`, or `None` to keep the server's own.
    pub motd: Option<String>,
    /// Data URI, or `None` to keep the server's own icon.
    pub icon: Option<EncodedIcon>,
    pub player_count: PlayerCount,
    pub hide_player_count: bool,
    pub disable_player_list_hover: bool,
}

/// Compose a status response using the thread-local RNG.
pub fn compose(
    snapshot: &MotdSnapshot,
    host: Option<&str>,
    online: u32,
    max: u32,
) -> StatusResponse {
    compose_with_rng(snapshot, host, online, max, &mut rand::thread_rng())
}

/// Compose a status response with an explicit RNG.
pub fn compose_with_rng<R: Rng + ?Sized>(
    snapshot: &MotdSnapshot,
    host: Option<&str>,
    online: u32,
    max: u32,
    rng: &mut R,
) -> StatusResponse {
    let config = snapshot.config_for_host(host);
    let player_count = adjust_player_count(&config.player_count, online, max, rng);

    let selected = if config.motd_enabled {
        config.motds.choose(rng)
    } else {
        None
    };

    let motd = selected.map(|motd| {
        let text = format!("{}\n{}", motd.line1, motd.line2);
        text.replace(ONLINE_PLACEHOLDER, &player_count.online.to_string())
            .replace(MAX_PLACEHOLDER, &player_count.max.to_string())
    });

    let icon = resolve_icon(snapshot, config, selected.and_then(|m| m.icon.as_deref()), rng);

    StatusResponse {
        generation: snapshot.generation(),
        motd,
        icon,
        player_count,
        hide_player_count: config.player_count.hide_player_count,
        disable_player_list_hover: config.player_count.disable_player_list_hover,
    }
}

/// Apply fake players, then the maximum rules.
pub fn adjust_player_count<R: Rng + ?Sized>(
    settings: &PlayerCountSettings,
    online: u32,
    max: u32,
    rng: &mut R,
) -> PlayerCount {
    let mut online = online;
    let mut max = max;

    if settings.fake_players_enabled {
        match settings.fake_players_mode() {
            Ok(mode) => online = online.saturating_add(mode.extra(online, rng)),
            Err(e) => tracing::debug!(error = %e, "Ignoring fake players setting"),
        }
    }

    if settings.just_x_more_enabled {
        max = online.saturating_add(settings.x_value);
    } else if settings.max_players_enabled {
        max = settings.max_players;
    }

    if !settings.allow_exceeding_maximum && online > max {
        max = online;
    }

    PlayerCount { online, max }
}

fn resolve_icon<R: Rng + ?Sized>(
    snapshot: &MotdSnapshot,
    config: &MotdConfig,
    name: Option<&str>,
    rng: &mut R,
) -> Option<EncodedIcon> {
    if !config.icon_enabled {
        return None;
    }

    let name = name?;
    let icon = if name == RANDOM_ICON {
        snapshot.icons().random(rng)
    } else {
        snapshot.icon(name)
    };

    if icon.is_none() {
        tracing::debug!(icon = %name, generation = snapshot.generation(), "Icon not found");
    }
    icon.cloned()
}
