use super::*;
use std::time::{SystemTime, UNIX_EPOCH};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn defaults_to_local_n8n_webhook() {
    let settings = resolve_settings(None, env_from(&[("APP__DATA_DIR", "/tmp/chat")]))
        .expect("settings");
    assert_eq!(settings.webhook_url.as_str(), DEFAULT_WEBHOOK_URL);
    assert_eq!(settings.data_dir, PathBuf::from("/tmp/chat"));
}

#[test]
fn file_values_are_overridden_by_environment() {
    let mut file_cfg = HashMap::new();
    file_cfg.insert(
        "webhook_url".to_string(),
        "https://flows.example.com/webhook/file".to_string(),
    );
    file_cfg.insert("data_dir".to_string(), "/srv/file".to_string());

    let settings = resolve_settings(Some(&file_cfg), env_from(&[])).expect("file settings");
    assert_eq!(
        settings.webhook_url.as_str(),
        "https://flows.example.com/webhook/file"
    );
    assert_eq!(settings.data_dir, PathBuf::from("/srv/file"));

    let settings = resolve_settings(
        Some(&file_cfg),
        env_from(&[
            ("N8N_WEBHOOK_URL", "https://flows.example.com/webhook/env"),
            ("APP__DATA_DIR", "/srv/env"),
        ]),
    )
    .expect("env settings");
    assert_eq!(
        settings.webhook_url.as_str(),
        "https://flows.example.com/webhook/env"
    );
    assert_eq!(settings.data_dir, PathBuf::from("/srv/env"));
}

#[test]
fn blank_environment_values_are_ignored() {
    let settings = resolve_settings(
        None,
        env_from(&[("N8N_WEBHOOK_URL", "  "), ("APP__DATA_DIR", "/tmp/chat")]),
    )
    .expect("settings");
    assert_eq!(settings.webhook_url.as_str(), DEFAULT_WEBHOOK_URL);
}

#[test]
fn rejects_non_http_webhook_urls() {
    assert!(parse_webhook_url("ftp://example.com/hook").is_err());
    assert!(parse_webhook_url("not a url").is_err());
    assert!(parse_webhook_url(" http://127.0.0.1:5678/webhook/n8n ").is_ok());
}

#[test]
fn cli_overrides_win() {
    let settings = resolve_settings(None, env_from(&[("APP__DATA_DIR", "/tmp/chat")]))
        .expect("settings")
        .with_overrides(
            Some("http://127.0.0.1:9000/webhook/test"),
            Some(PathBuf::from("/tmp/override")),
        )
        .expect("overrides");
    assert_eq!(
        settings.webhook_url.as_str(),
        "http://127.0.0.1:9000/webhook/test"
    );
    assert_eq!(settings.data_dir, PathBuf::from("/tmp/override"));
}

#[test]
fn data_dir_falls_back_to_home() {
    assert_eq!(
        default_data_dir(None, Some("/home/alice".to_string())).expect("home"),
        PathBuf::from("/home/alice/.n8n_chat")
    );
    assert_eq!(
        default_data_dir(Some(PathBuf::from("/data")), None).expect("local data"),
        PathBuf::from("/data/n8n_chat")
    );
    assert!(default_data_dir(None, None).is_err());
}

#[test]
fn reads_flat_toml_config_file() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = std::env::temp_dir().join(format!("n8n_chat_config_{suffix}.toml"));
    fs::write(
        &path,
        "webhook_url = \"http://10.0.0.5:5678/webhook/n8n\"\ndata_dir = \"/var/lib/chat\"\n",
    )
    .expect("write config");

    let cfg = read_config_file(&path).expect("parsed config");
    assert_eq!(
        cfg.get("webhook_url").map(String::as_str),
        Some("http://10.0.0.5:5678/webhook/n8n")
    );

    fs::write(&path, "webhook_url = [1, 2]\n").expect("write bad config");
    assert!(read_config_file(&path).is_none());

    fs::remove_file(path).expect("cleanup");
}
