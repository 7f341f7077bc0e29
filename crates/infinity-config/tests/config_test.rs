#![allow(clippy::unwrap_used)]
// Loading, saving and environment overrides for `infinity-config`.

use std::path::Path;

use figment::Jail;
use pretty_assertions::assert_eq;
use secrecy::ExposeSecret;

use infinity_config::{
    AuthMode, Config, ConfigError, Credentials, Profile, load_config_from, profile_to_builder,
    resolve_credentials, save_config_to,
};

fn to_figment(err: ConfigError) -> figment::Error {
    err.to_string().into()
}

#[test]
fn test_missing_file_yields_defaults() {
    Jail::expect_with(|_jail| {
        let cfg = load_config_from(Path::new("absent.toml")).map_err(to_figment)?;
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.timeout, 30);
        assert_eq!(cfg.defaults.max_retries, 3);
        assert!(cfg.profiles.is_empty());
        Ok(())
    });
}

#[test]
fn test_loads_profiles_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
                default_profile = "lab"

                [defaults]
                timeout = 15

                [profiles.lab]
                base_url = "https://lab-mgr.example.com"
                auth_mode = "token"
                token = "tok-123"
                max_retries = 0
            "#,
        )?;

        let cfg = load_config_from(Path::new("config.toml")).map_err(to_figment)?;
        let (name, profile) = cfg.profile(None).map_err(to_figment)?;
        assert_eq!(name, "lab");
        assert_eq!(profile.auth_mode, AuthMode::Token);
        assert_eq!(profile.max_retries, Some(0));
        assert_eq!(cfg.defaults.timeout, 15);
        Ok(())
    });
}

#[test]
fn test_environment_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
                [defaults]
                timeout = 15

                [profiles.default]
                base_url = "https://mgr.example.com"
            "#,
        )?;
        jail.set_env("INFINITY_DEFAULTS__TIMEOUT", "5");
        jail.set_env("INFINITY_PROFILES__DEFAULT__USERNAME", "ops");

        let cfg = load_config_from(Path::new("config.toml")).map_err(to_figment)?;
        assert_eq!(cfg.defaults.timeout, 5);
        assert_eq!(
            cfg.profiles["default"].username.as_deref(),
            Some("ops")
        );
        Ok(())
    });
}

#[test]
fn test_password_env_wins_over_plaintext() {
    Jail::expect_with(|jail| {
        jail.set_env("LAB_MGR_PASSWORD", "from-env");

        let profile = Profile {
            base_url: "https://mgr.example.com".into(),
            username: Some("admin".into()),
            password: Some("from-file".into()),
            password_env: Some("LAB_MGR_PASSWORD".into()),
            ..Profile::default()
        };

        match resolve_credentials(&profile, "env-test").map_err(to_figment)? {
            Credentials::Basic { username, password } => {
                assert_eq!(username, "admin");
                assert_eq!(password.expose_secret(), "from-env");
            }
            other => panic!("expected basic credentials, got {other:?}"),
        }
        Ok(())
    });
}

#[test]
fn test_token_profile_builds_client() {
    let profile = Profile {
        base_url: "https://mgr.example.com/api/admin/".into(),
        auth_mode: AuthMode::Bearer,
        token: Some("bearer-token".into()),
        timeout: Some(3),
        ..Profile::default()
    };

    let client = profile_to_builder(&profile, "bearer-test", &Config::default().defaults)
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(client.base_url().as_str(), "https://mgr.example.com/");
    assert_eq!(client.retry_policy().max_retries, 3);
}

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut cfg = Config::default();
    cfg.profiles.insert(
        "default".into(),
        Profile {
            base_url: "https://mgr.example.com".into(),
            username: Some("admin".into()),
            ..Profile::default()
        },
    );
    save_config_to(&cfg, &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("[profiles.default]"));
    assert!(written.contains("auth_mode = \"basic\""));

    let loaded = load_config_from(&path).unwrap();
    assert_eq!(loaded.profiles["default"].username.as_deref(), Some("admin"));
}
