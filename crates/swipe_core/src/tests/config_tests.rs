use super::*;

use std::{
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn no_env(_: &str) -> Option<String> {
    None
}

fn temp_settings_file(contents: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("swipe_settings_test_{suffix}.toml"));
    fs::write(&path, contents).expect("write settings");
    path
}

#[test]
fn missing_file_yields_defaults() {
    let settings = load_settings_from(Path::new("/definitely/not/here/swipe.toml"), no_env);
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.total_items, 10);
}

#[test]
fn file_values_override_defaults() {
    let path = temp_settings_file(
        "total_items = 3\ncat_api_url = \"http://127.0.0.1:9000/\"\nfetch_timeout_secs = \"4\"\n",
    );

    let settings = load_settings_from(&path, no_env);
    assert_eq!(settings.total_items, 3);
    assert_eq!(settings.cat_api_base(), "http://127.0.0.1:9000");
    assert_eq!(settings.fetch_timeout(), Duration::from_secs(4));

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn env_overrides_file_and_prefixed_names_win() {
    let path = temp_settings_file("total_items = 3\n");

    let settings = load_settings_from(&path, |key| match key {
        "TOTAL_ITEMS" => Some("5".to_string()),
        "APP__TOTAL_ITEMS" => Some("7".to_string()),
        "PLACEHOLDER_URL" => Some("http://placeholder.test".to_string()),
        _ => None,
    });
    assert_eq!(settings.total_items, 7);
    assert_eq!(settings.placeholder_base(), "http://placeholder.test");

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn invalid_values_keep_previous_setting() {
    let path = temp_settings_file("total_items = \"lots\"\nimage_width = 0\n");

    let settings = load_settings_from(&path, |key| {
        (key == "APP__FETCH_TIMEOUT_SECS").then(|| "0".to_string())
    });
    assert_eq!(settings.total_items, DEFAULT_TOTAL_ITEMS);
    assert_eq!(settings.image_width, 400);
    assert_eq!(settings.fetch_timeout_secs, 10);

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn malformed_file_is_ignored() {
    let path = temp_settings_file("this is = = not toml");
    let settings = load_settings_from(&path, no_env);
    assert_eq!(settings, Settings::default());
    fs::remove_file(path).expect("cleanup");
}
