use super::*;

#[test]
fn defaults_resolve_without_any_source() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.server.addr.port(), DEFAULT_PORT);
    assert_eq!(settings.server.base_path, "/api");
    assert_eq!(settings.server.request_timeout, Duration::from_secs(10));
    assert_eq!(settings.auth.token_ttl, time::Duration::hours(72));
    assert!(settings.auth.jwt_secret.is_none());
    assert!(settings.cache.enabled);
    assert_eq!(settings.cache.listing_ttl_secs.get(), 30);
    assert_eq!(settings.cache.invalidate_pages, 5);
    assert_eq!(
        settings
            .cache
            .invalidate_page_sizes
            .iter()
            .map(|size| size.get())
            .collect::<Vec<_>>(),
        vec![10]
    );
    assert_eq!(settings.listing.default_page_size.get(), 10);
    assert_eq!(settings.listing.max_page_size.get(), 100);
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());
    raw.cache.enabled = Some(true);

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        cache_enabled: Some(false),
        database: DatabaseOverride {
            database_url: Some("postgres://override".to_string()),
        },
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert!(!settings.cache.enabled);
    assert_eq!(
        settings.database.url.as_deref(),
        Some("postgres://override")
    );
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn zero_values_are_rejected() {
    let mut raw = RawSettings::default();
    raw.cache.listing_ttl_secs = Some(0);
    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "cache.listing_ttl_secs",
            ..
        })
    ));

    let mut raw = RawSettings::default();
    raw.database.acquire_timeout_ms = Some(0);
    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn empty_invalidation_sizes_are_rejected() {
    let mut raw = RawSettings::default();
    raw.cache.invalidate_page_sizes = Some(Vec::new());

    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "cache.invalidate_page_sizes",
            ..
        })
    ));
}

#[test]
fn default_page_size_cannot_exceed_max() {
    let mut raw = RawSettings::default();
    raw.listing.default_page_size = Some(50);
    raw.listing.max_page_size = Some(20);

    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn base_path_is_normalised() {
    assert_eq!(normalize_base_path("/api/").unwrap(), "/api");
    assert_eq!(normalize_base_path("/").unwrap(), "");
    assert_eq!(normalize_base_path("").unwrap(), "");
    assert!(normalize_base_path("api").is_err());
}

#[test]
fn blank_secret_counts_as_missing() {
    let mut raw = RawSettings::default();
    raw.auth.jwt_secret = Some("   ".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(settings.auth.require_secret().is_err());
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["quire"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_migrate_arguments() {
    let args = CliArgs::parse_from(["quire", "migrate", "--database-url", "postgres://example"]);

    match args.command.expect("migrate command") {
        Command::Migrate(migrate) => {
            assert_eq!(
                migrate.database.database_url.as_deref(),
                Some("postgres://example")
            );
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_serve_overrides() {
    let args = CliArgs::parse_from([
        "quire",
        "serve",
        "--server-host",
        "0.0.0.0",
        "--database-url",
        "postgres://override",
        "--cache-enabled",
        "false",
    ]);

    match args.command.expect("serve command") {
        Command::Serve(serve) => {
            assert_eq!(serve.overrides.server_host.as_deref(), Some("0.0.0.0"));
            assert_eq!(
                serve.overrides.database.database_url.as_deref(),
                Some("postgres://override")
            );
            assert_eq!(serve.overrides.cache_enabled, Some(false));
        }
        _ => panic!("wrong command parsed"),
    }
}
