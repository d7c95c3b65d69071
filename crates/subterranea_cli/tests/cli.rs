use assert_cmd::Command;
use predicates::prelude::*;
use rusqlite::params;
use std::path::{Path, PathBuf};
use subterranea_core::db::open_db;

const KEY: &str = "reader";

fn seed_catalog(dir: &Path, count: usize, read_key: Option<&str>) -> PathBuf {
    let path = dir.join("catalog.sqlite3");
    let conn = open_db(&path).unwrap();
    for n in 1..=count {
        conn.execute(
            "INSERT INTO books (id, title, author, genre, category, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6);",
            params![
                format!("b{n}"),
                format!("Title {n}"),
                if n == 2 { "Edgar Allan Poe" } else { "Author" },
                if n == 1 { Some("Science Fiction") } else { None },
                if n % 2 == 0 { "magazine" } else { "artist-book" },
                ((count - n) * 1000) as i64,
            ],
        )
        .unwrap();
    }
    if let Some(key) = read_key {
        conn.execute(
            "INSERT INTO catalog_meta (key, value) VALUES ('read_key', ?1);",
            [key],
        )
        .unwrap();
    }
    path
}

fn subterranea(endpoint: Option<&Path>) -> Command {
    let mut cmd = Command::cargo_bin("subterranea").unwrap();
    cmd.env_remove("SUBTERRANEA_STORE_URL")
        .env_remove("SUBTERRANEA_STORE_KEY");
    if let Some(endpoint) = endpoint {
        cmd.env("SUBTERRANEA_STORE_URL", endpoint)
            .env("SUBTERRANEA_STORE_KEY", KEY);
    }
    cmd
}

#[test]
fn unconfigured_catalog_exits_with_configuration_code() {
    subterranea(None)
        .arg("inventory")
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "Catalog is not configured. Please set SUBTERRANEA_STORE_URL and SUBTERRANEA_STORE_KEY.",
        ));
}

#[test]
fn inventory_prints_the_first_spread() {
    let dir = tempfile::tempdir().unwrap();
    let path = seed_catalog(dir.path(), 30, Some(KEY));

    subterranea(Some(&path))
        .arg("inventory")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Page 1 of 2\n[Left]\n"))
        .stdout(predicate::str::contains("  1.  Title 1 by Author"))
        .stdout(predicate::str::contains("[Right]\n  1.  Title 16 by Author"));
}

#[test]
fn out_of_range_page_is_clamped() {
    let dir = tempfile::tempdir().unwrap();
    let path = seed_catalog(dir.path(), 30, Some(KEY));

    subterranea(Some(&path))
        .args(["inventory", "--page", "9"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Page 2 of 2\n"))
        .stdout(predicate::str::contains("Title 28 by Author"));
}

#[test]
fn seeded_shuffle_is_repeatable() {
    let dir = tempfile::tempdir().unwrap();
    let path = seed_catalog(dir.path(), 20, Some(KEY));

    let run = || {
        subterranea(Some(&path))
            .args(["inventory", "--seed", "42"])
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn search_prints_route_and_matches() {
    let dir = tempfile::tempdir().unwrap();
    let path = seed_catalog(dir.path(), 5, Some(KEY));

    subterranea(Some(&path))
        .args(["search", "FIC"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("/search?q=FIC\n"))
        .stdout(predicate::str::contains("Title 1 by Author"))
        .stdout(predicate::str::contains("Title 3").not());

    subterranea(Some(&path))
        .args(["search", "edgar allan"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("/search?q=edgar%20allan\n"))
        .stdout(predicate::str::contains("Title 2 by Edgar Allan Poe"));
}

#[test]
fn search_without_matches_prints_no_books_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = seed_catalog(dir.path(), 5, Some(KEY));

    subterranea(Some(&path))
        .args(["search", "nothing like this"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No Books Found"));
}

#[test]
fn book_detail_and_missing_book() {
    let dir = tempfile::tempdir().unwrap();
    let path = seed_catalog(dir.path(), 3, Some(KEY));

    subterranea(Some(&path))
        .args(["book", "b1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Title 1\nby Author\n"))
        .stdout(predicate::str::contains("Genre: Science Fiction"))
        .stdout(predicate::str::contains("Route: /book/b1"));

    subterranea(Some(&path))
        .args(["book", "missing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Book not found"));
}

#[test]
fn shelf_lists_sections_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = seed_catalog(dir.path(), 4, Some(KEY));

    let output = subterranea(Some(&path)).arg("shelf").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let artist = stdout.find("Artist Book (AB)").unwrap();
    let magazine = stdout.find("Magazine (M)").unwrap();
    let cargo = stdout.find("Cargo (Sample) (Cargo)").unwrap();
    assert!(artist < magazine && magazine < cargo);
    assert!(stdout.starts_with("Featured: Title 1 by Author\n"));
}

#[test]
fn json_output_is_tagged_by_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = seed_catalog(dir.path(), 2, Some(KEY));

    let output = subterranea(Some(&path))
        .args(["--json", "inventory"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["state"], "page");
    assert_eq!(value["total_pages"], 1);
    assert_eq!(value["left_zone"][0]["book"]["id"], "b1");
}

#[test]
fn wrong_access_key_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = seed_catalog(dir.path(), 2, Some("someone-else"));

    subterranea(Some(&path))
        .arg("inventory")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Catalog is not configured"));
}

#[test]
fn corrupt_store_is_a_fetch_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.sqlite3");
    std::fs::write(&path, vec![b'x'; 4096]).unwrap();

    subterranea(Some(&path))
        .args(["search", "poe"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to search books"));
}

#[test]
fn invalid_layout_in_config_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("subterranea.toml");
    std::fs::write(
        &config,
        "[layout]\nrecords_per_page = 10\nleft_zone_capacity = 12\n",
    )
    .unwrap();

    subterranea(None)
        .arg("--config")
        .arg(&config)
        .arg("inventory")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("left_zone_capacity 12 exceeds"));
}

#[test]
fn store_settings_can_come_from_the_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = seed_catalog(dir.path(), 1, None);
    let config = dir.path().join("subterranea.toml");
    std::fs::write(
        &config,
        format!(
            "[store]\nendpoint = \"{}\"\naccess_key = \"anything\"\n",
            path.display()
        ),
    )
    .unwrap();

    subterranea(None)
        .arg("--config")
        .arg(&config)
        .arg("inventory")
        .assert()
        .success()
        .stdout(predicate::str::contains("Title 1 by Author"));
}
