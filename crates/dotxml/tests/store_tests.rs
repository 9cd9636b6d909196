use std::fs;
use std::path::PathBuf;

use dotxml::{ConfigStore, LoadError, StoreOptions, UNAVAILABLE};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures")).join(name)
}

/// Store whose write-back lands in a scratch directory; the directory is
/// returned first so the store is dropped before it
fn scratch_store(
    name: &str,
    contents: &str,
) -> Result<(tempfile::TempDir, ConfigStore), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let source = dir.path().join(name);
    fs::write(&source, contents)?;
    let options = StoreOptions::default().with_output_dir(dir.path());
    let store = ConfigStore::open_with_options(&source, options)?;
    Ok((dir, store))
}

const SETTINGS: &str = r#"<config><Settings optX="5"><value>10</value></Settings></config>"#;

#[test]
fn test_settings_scenario() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, store) = scratch_store("settings.xml", SETTINGS)?;

    assert!(store.exists("Settings"));
    assert_eq!(store.get_option("Settings.value"), "10");
    assert_eq!(store.get_attribute("Settings", "optX"), "5");
    assert!(!store.exists("Settings.missing"));
    assert_eq!(store.get_option("Settings.missing"), "N/A");
    assert_eq!(store.root_name(), Some("config"));
    Ok(())
}

#[test]
fn test_missing_paths_yield_sentinel() -> Result<(), Box<dyn std::error::Error>> {
    let store = ConfigStore::open(fixture("sample.xml"))?;

    for path in [
        "",
        "config",
        "option_y",
        "ApplicationSettings.option_c",
        "applicationsettings.option_a",
        ".ApplicationSettings",
        "OtherStuff.option_x.deeper",
    ] {
        assert!(!store.exists(path), "{path:?} should not exist");
        assert_eq!(store.option(path), None);
        assert_eq!(store.get_option(path), UNAVAILABLE);
        assert_eq!(store.get_attribute(path, "mode"), UNAVAILABLE);
    }
    Ok(())
}

#[test]
fn test_empty_and_verbatim_text() -> Result<(), Box<dyn std::error::Error>> {
    let store = ConfigStore::open(fixture("sample.xml"))?;

    assert!(store.exists("ApplicationSettings.option_d"));
    assert_eq!(store.get_option("ApplicationSettings.option_d"), "");
    assert_eq!(store.get_option("OtherStuff.option_y"), "");
    assert_eq!(store.get_option("ApplicationSettings"), "");
    assert_eq!(store.get_option("ApplicationSettings.option_a"), "first value");
    assert_eq!(store.get_option("ApplicationSettings.option_b"), "  padded  ");
    Ok(())
}

#[test]
fn test_attributes() -> Result<(), Box<dyn std::error::Error>> {
    let store = ConfigStore::open(fixture("sample.xml"))?;

    assert_eq!(store.get_attribute("ApplicationSettings", "mode"), "release");
    assert_eq!(store.get_attribute("ApplicationSettings", "verbose"), "false");
    assert_eq!(store.attribute("ApplicationSettings", "Mode"), None);
    assert_eq!(store.get_attribute("ApplicationSettings.option_a", "mode"), UNAVAILABLE);
    Ok(())
}

#[test]
fn test_first_sibling_wins() -> Result<(), Box<dyn std::error::Error>> {
    let store = ConfigStore::open(fixture("boards.xml"))?;
    assert_eq!(store.get_option("LPC2148_HW.programming.program"), "lpc21isp");
    assert_eq!(store.get_option("LPC2148_HW.LPC2148_APP.debug_level"), "3");
    assert!(!store.exists("LPC2148_HW.LPC2148_APP.debug"));
    assert!(!store.exists("LPC2138_HW"));
    assert_eq!(
        store.get_option("LPC2106_HW.FreeRTOS-LPC2106_APP.port"),
        "/dev/ttyS0"
    );

    let (_dir, store) = scratch_store("p.xml", "<r><p><x>1</x><x>2</x></p></r>")?;
    assert_eq!(store.get_option("p.x"), "1");
    Ok(())
}

#[test]
fn test_reads_leave_store_clean() -> Result<(), Box<dyn std::error::Error>> {
    let store = ConfigStore::open(fixture("sample.xml"))?;
    let before = store.render();

    for _ in 0..3 {
        store.exists("OtherStuff.option_x");
        store.get_option("OtherStuff.option_x");
        store.get_attribute("ApplicationSettings", "mode");
        store.get_option("nope");
    }

    assert!(!store.is_dirty());
    assert_eq!(store.render(), before);
    Ok(())
}

#[test]
fn test_set_option_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, mut store) = scratch_store("settings.xml", SETTINGS)?;

    for value in ["42", "", "  spaced  ", "a < b & c", "N/A", "line\nbreak"] {
        assert!(store.set_option("Settings.value", value));
        assert_eq!(store.get_option("Settings.value"), value);
    }
    assert!(store.is_dirty());

    // text is placed in front of existing child elements
    assert!(store.set_option("Settings", "head"));
    assert_eq!(store.get_option("Settings"), "head");
    assert!(store.exists("Settings.value"));
    Ok(())
}

#[test]
fn test_set_option_never_creates() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, mut store) = scratch_store("settings.xml", SETTINGS)?;
    let before = store.render();

    assert!(!store.set_option("Settings.missing", "1"));
    assert!(!store.set_option("Other", "1"));
    assert!(!store.set_option("", "1"));

    assert!(!store.is_dirty());
    assert_eq!(store.render(), before);
    Ok(())
}

#[test]
fn test_set_attribute_only_updates_existing() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, mut store) = scratch_store("settings.xml", SETTINGS)?;
    let before = store.render();

    assert!(!store.set_attribute("Settings", "optY", "1"));
    assert!(!store.set_attribute("Settings.value", "optX", "1"));
    assert!(!store.set_attribute("Missing", "optX", "1"));
    assert!(!store.is_dirty());
    assert_eq!(store.render(), before);

    assert!(store.set_attribute("Settings", "optX", "6"));
    assert_eq!(store.get_attribute("Settings", "optX"), "6");
    assert!(store.is_dirty());
    Ok(())
}

#[test]
fn test_dirty_flag_is_sticky() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, mut store) = scratch_store("settings.xml", SETTINGS)?;

    assert!(store.set_option("Settings.value", "11"));
    assert!(store.set_option("Settings.value", "10"));
    assert!(!store.set_option("Settings.nothing", "x"));
    assert!(store.is_dirty());
    Ok(())
}

#[test]
fn test_load_errors_are_distinct() -> Result<(), Box<dyn std::error::Error>> {
    let missing = ConfigStore::open(fixture("does_not_exist.xml"));
    assert!(matches!(missing, Err(LoadError::FileNotAccessible { .. })));

    let malformed = ConfigStore::open(fixture("malformed.xml"));
    assert!(matches!(malformed, Err(LoadError::Parse { .. })));

    let no_root = ConfigStore::open(fixture("no_root.xml"));
    assert!(matches!(no_root, Err(LoadError::NoRootElement { .. })));

    let directory = ConfigStore::open(fixture(""));
    assert!(matches!(directory, Err(LoadError::FileNotAccessible { .. })));
    Ok(())
}

#[test]
fn test_failed_load_leaves_store_unloaded() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = ConfigStore::new();
    assert!(store.load(fixture("malformed.xml")).is_err());
    assert!(!store.is_loaded());
    assert!(!store.exists("Settings"));

    store.load(fixture("sample.xml"))?;
    assert!(store.is_loaded());
    assert_eq!(store.source_path(), Some(fixture("sample.xml").as_path()));
    Ok(())
}

#[test]
fn test_second_load_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = ConfigStore::open(fixture("sample.xml"))?;
    let again = store.load(fixture("boards.xml"));

    assert!(matches!(again, Err(LoadError::AlreadyLoaded { .. })));
    assert_eq!(store.root_name(), Some("config"));
    Ok(())
}

#[test]
fn test_parser_limits_apply_on_load() -> Result<(), Box<dyn std::error::Error>> {
    let options = StoreOptions::default().with_parser(dotxml::XmlConfig::new(2, 0));
    let result = ConfigStore::open_with_options(fixture("boards.xml"), options);

    match result {
        Err(LoadError::Parse { source, .. }) => {
            assert_eq!(
                source.kind(),
                &dotxml::ErrorKind::MaxDepthExceeded { max: 2 }
            );
            Ok(())
        }
        other => Err(format!("expected depth error, got {other:?}").into()),
    }
}

#[test]
fn test_deep_nesting_is_a_parse_error() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let source = dir.path().join("deep.xml");
    fs::write(
        &source,
        format!("{}{}", "<a>".repeat(100_000), "</a>".repeat(100_000)),
    )?;

    let options = StoreOptions::default().with_parser(dotxml::XmlConfig::unlimited());
    match ConfigStore::open_with_options(&source, options) {
        Err(LoadError::Parse { source, .. }) => {
            assert_eq!(
                source.kind(),
                &dotxml::ErrorKind::MaxDepthExceeded {
                    max: dotxml::xml::MAX_NESTING
                }
            );
            Ok(())
        }
        other => Err(format!("expected depth error, got {other:?}").into()),
    }
}

#[test]
fn test_render_sample() -> Result<(), Box<dyn std::error::Error>> {
    let store = ConfigStore::open(fixture("sample.xml"))?;
    let rendered = store.render().unwrap_or_default();

    let expected = [
        "config:",
        "    ApplicationSettings:",
        "      mode = release",
        "      verbose = false",
        "        option_a: \"first value\"",
        "        option_b: \"padded\"",
        "        option_d:",
        "    OtherStuff:",
        "    #  incremented by the test driver",
        "    #             on every run ",
        "        option_x: \"7\"",
        "        option_y:",
    ];
    assert_eq!(rendered.lines().collect::<Vec<_>>(), expected);
    store.print_config_file();
    Ok(())
}
