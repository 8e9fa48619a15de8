mod common;

use std::fs;

use trader_dashboard::routes::{static_routes, tickers_file_codes, Route, RouteOrigin};

use common::{temp_dir, SNAPSHOT_JSON};

const TICKERS_YML: &str = r#"
tickers:
  - code: "7203.T"
    name: "Toyota Motor"
  - code: "^N225"
    name: "Nikkei 225"
  - code: "7203.T"
    name: "Toyota Motor (dup)"
"#;

#[test]
/// Verifies routes come from the snapshot in document order when it exists.
fn routes_from_snapshot() {
    let dir = temp_dir("routes-snapshot");
    let snapshot = dir.join("history_data.json");
    fs::write(&snapshot, SNAPSHOT_JSON).unwrap();
    fs::write(dir.join("tickers.yml"), TICKERS_YML).unwrap();

    let routes = static_routes(&snapshot, &dir.join("tickers.yml"));
    assert_eq!(routes.origin, RouteOrigin::Snapshot);
    assert_eq!(
        routes.routes,
        vec![
            Route::Overview,
            Route::detail("7203.T"),
            Route::detail("6758.T"),
            Route::detail("9984.T"),
        ]
    );
    let _ = fs::remove_dir_all(dir);
}

#[test]
/// Verifies the tickers file is used, deduplicated, when the snapshot is missing.
fn routes_fall_back_to_tickers_file() {
    let dir = temp_dir("routes-tickers");
    let tickers = dir.join("tickers.yml");
    fs::write(&tickers, TICKERS_YML).unwrap();

    let routes = static_routes(&dir.join("missing.json"), &tickers);
    assert_eq!(routes.origin, RouteOrigin::TickersFile);
    assert_eq!(
        routes.routes,
        vec![Route::Overview, Route::detail("7203.T"), Route::detail("^N225")]
    );
    let _ = fs::remove_dir_all(dir);
}

#[test]
/// Verifies a malformed snapshot also falls back to the tickers file.
fn malformed_snapshot_falls_back() {
    let dir = temp_dir("routes-malformed");
    let snapshot = dir.join("history_data.json");
    let tickers = dir.join("tickers.yml");
    fs::write(&snapshot, "{\"last_update\": ").unwrap();
    fs::write(&tickers, TICKERS_YML).unwrap();

    let routes = static_routes(&snapshot, &tickers);
    assert_eq!(routes.origin, RouteOrigin::TickersFile);
    assert_eq!(routes.routes.len(), 3);
    let _ = fs::remove_dir_all(dir);
}

#[test]
/// Verifies only the overview route remains when neither source is readable.
fn routes_without_sources() {
    let dir = temp_dir("routes-none");
    let routes = static_routes(&dir.join("missing.json"), &dir.join("missing.yml"));
    assert_eq!(routes.origin, RouteOrigin::None);
    assert_eq!(routes.routes, vec![Route::Overview]);
    let _ = fs::remove_dir_all(dir);
}

#[test]
/// Verifies blank codes in the tickers file are skipped.
fn tickers_file_skips_blank_codes() {
    let dir = temp_dir("routes-blank");
    let tickers = dir.join("tickers.yml");
    fs::write(&tickers, "tickers:\n  - code: \" \"\n  - code: \"6758.T\"\n").unwrap();
    assert_eq!(tickers_file_codes(&tickers).unwrap(), vec!["6758.T".to_string()]);
    assert!(tickers_file_codes(&dir.join("nope.yml")).is_err());
    let _ = fs::remove_dir_all(dir);
}
