//! Reload protocol and icon pipeline tests against real data directories.

use std::collections::HashSet;
use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use image::{Rgba, RgbaImage};
use minimotd::config::loader::{ICONS_DIR, MAIN_CONFIG_FILE, PLUGIN_SETTINGS_FILE};
use minimotd::icon::codec::{self, DATA_URI_PREFIX};
use minimotd::icon::ImageDecoder;
use minimotd::icon::IconDecoder;
use minimotd::lifecycle::startup;
use minimotd::motd::{compose, ReloadError};

mod common;

#[test]
fn test_fresh_directory_bootstraps() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("config").join("MiniMOTD");

    let coordinator = startup::start(&data_dir).unwrap();
    let snapshot = coordinator.current();

    assert!(data_dir.join(PLUGIN_SETTINGS_FILE).is_file());
    assert!(data_dir.join(MAIN_CONFIG_FILE).is_file());
    assert!(snapshot.icons().is_empty());
    assert_eq!(snapshot.generation(), 1);
}

#[test]
fn test_stock_config_serves_cached_icon() {
    let dir = tempfile::tempdir().unwrap();
    common::write_icon(&dir.path().join(ICONS_DIR), "lobby.png", 64, 10);

    let coordinator = startup::start(dir.path()).unwrap();
    let snapshot = coordinator.current();

    let response = compose::compose(&snapshot, None, 0, 20);
    assert!(response.icon.is_some());
    assert_eq!(response.icon.as_ref(), snapshot.icon("lobby"));
}

#[test]
fn test_valid_icons_loaded_invalid_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let icons = dir.path().join(ICONS_DIR);
    common::write_icon(&icons, "lobby.png", 64, 10);
    common::write_icon(&icons, "survival.bmp", 64, 20);
    common::write_icon(&icons, "creative.png", 64, 30);
    common::write_icon(&icons, "huge.png", 128, 40);
    common::write_icon(&icons, "tall.png", 16, 50);
    common::write_garbage(&icons, "broken.png");
    common::write_garbage(&icons, "readme.txt");

    let coordinator = startup::start(dir.path()).unwrap();
    let snapshot = coordinator.current();

    assert_eq!(snapshot.icons().names(), vec!["creative", "lobby", "survival"]);
    for name in snapshot.icons().names() {
        let icon = snapshot.icon(name).unwrap();
        assert!(icon.as_str().starts_with(DATA_URI_PREFIX));

        let bitmap = ImageDecoder.decode(&icon.decode_payload().unwrap()).unwrap();
        assert_eq!(bitmap.dimensions(), (64, 64));
    }
}

#[test]
fn test_duplicate_logical_name_resolved_by_file_name_order() {
    let dir = tempfile::tempdir().unwrap();
    let icons = dir.path().join(ICONS_DIR);
    common::write_icon(&icons, "lobby.bmp", 64, 1);
    common::write_icon(&icons, "lobby.png", 64, 200);

    let coordinator = startup::start(dir.path()).unwrap();
    let snapshot = coordinator.current();

    let expected = codec::encode(&RgbaImage::from_pixel(64, 64, Rgba([200, 55, 64, 255]))).unwrap();
    assert_eq!(snapshot.icons().len(), 1);
    assert_eq!(snapshot.icon("lobby"), Some(&expected));
}

#[test]
fn test_reload_picks_up_added_and_removed_icons() {
    let dir = tempfile::tempdir().unwrap();
    let icons = dir.path().join(ICONS_DIR);
    common::write_icon(&icons, "old.png", 64, 1);

    let coordinator = startup::start(dir.path()).unwrap();
    assert!(coordinator.icon("old").is_some());

    fs::remove_file(icons.join("old.png")).unwrap();
    common::write_icon(&icons, "new.png", 64, 2);
    coordinator.reload().unwrap();

    assert!(coordinator.icon("old").is_none());
    assert!(coordinator.icon("new").is_some());
}

#[test]
fn test_failed_reload_leaves_snapshot_untouched() {
    let dir = tempfile::tempdir().unwrap();
    common::write_icon(&dir.path().join(ICONS_DIR), "lobby.png", 64, 9);

    let coordinator = startup::start(dir.path()).unwrap();
    let before = coordinator.current();
    let before_response = compose::compose_with_rng(
        &before,
        None,
        5,
        20,
        &mut <rand::rngs::StdRng as rand::SeedableRng>::seed_from_u64(1),
    );

    fs::write(dir.path().join(MAIN_CONFIG_FILE), "motd_enabled = maybe").unwrap();
    common::write_icon(&dir.path().join(ICONS_DIR), "extra.png", 64, 3);

    let err = coordinator.reload().unwrap_err();
    assert!(matches!(err, ReloadError::Config(_)));

    let after = coordinator.current();
    assert!(Arc::ptr_eq(&before, &after));
    assert!(after.icon("extra").is_none());
    let after_response = compose::compose_with_rng(
        &after,
        None,
        5,
        20,
        &mut <rand::rngs::StdRng as rand::SeedableRng>::seed_from_u64(1),
    );
    assert_eq!(before_response, after_response);
}

#[test]
fn test_readers_never_observe_torn_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let icons = dir.path().join(ICONS_DIR);
    common::write_icon(&icons, "a.png", 64, 1);

    let coordinator = startup::start(dir.path()).unwrap();
    let published = Arc::new(Mutex::new(HashSet::from([coordinator.generation()])));
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let coordinator = Arc::clone(&coordinator);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut seen = Vec::new();
                while !done.load(Ordering::Acquire) {
                    let snapshot = coordinator.current();
                    // Each generation N was written with exactly N icons.
                    assert_eq!(snapshot.icons().len() as u64, snapshot.generation());
                    seen.push(snapshot.generation());
                }
                seen
            })
        })
        .collect();

    for generation in 2..=5u64 {
        common::write_icon(&icons, &format!("icon{generation}.png"), 64, generation as u8);
        let snapshot = coordinator.reload().unwrap();
        assert_eq!(snapshot.generation(), generation);
        published.lock().unwrap().insert(generation);
    }
    done.store(true, Ordering::Release);

    let published = published.lock().unwrap();
    for reader in readers {
        let seen = reader.join().unwrap();
        assert!(seen.windows(2).all(|w| w[0] <= w[1]), "generations went backwards");
        assert!(seen.iter().all(|g| published.contains(g)));
    }
    assert_eq!(coordinator.generation(), 5);
}

#[test]
fn test_virtual_host_selects_extra_config() {
    let dir = tempfile::tempdir().unwrap();
    common::write_icon(&dir.path().join(ICONS_DIR), "survival.png", 64, 77);

    let extra = dir.path().join("extra-configs");
    fs::create_dir_all(&extra).unwrap();
    fs::write(
        extra.join("survival.toml"),
        r#"
        [[motds]]
        line1 = "Survival"
        line2 = "{onlinePlayers} online"
        icon = "survival"

        [player_count]
        max_players_enabled = false
        "#,
    )
    .unwrap();
    fs::write(
        dir.path().join(PLUGIN_SETTINGS_FILE),
        "[proxy.virtual_hosts]\n\"survival.example.com\" = \"survival\"\n",
    )
    .unwrap();

    let coordinator = startup::start(dir.path()).unwrap();
    let snapshot = coordinator.current();

    let response = compose::compose(&snapshot, Some("survival.example.com:25565"), 4, 50);
    assert_eq!(response.motd.as_deref(), Some("Survival\n4 online"));
    assert_eq!(response.player_count.max, 50);
    assert_eq!(response.icon.as_ref(), snapshot.icon("survival"));

    // The stock main.toml picks a random icon; "survival" is the only one.
    let fallback = compose::compose(&snapshot, Some("lobby.example.com"), 4, 50);
    assert_eq!(fallback.icon.as_ref(), snapshot.icon("survival"));
    assert_eq!(fallback.player_count.max, 10);
}
