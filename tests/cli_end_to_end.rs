#![deny(clippy::all, clippy::pedantic)]

use std::path::Path;

use assert_cmd::Command;
use httpmock::MockServer;
use predicates::str::contains;
use serde_json::json;
use tempfile::TempDir;

fn cli(server: &MockServer, session: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("entradas-cli"));
    cmd.env_remove("ENTRADAS_PASSWORD")
        .env_remove("ENTRADAS_PASSWORD_FILE")
        .env_remove("ENTRADAS_CONFIG_FILE")
        .arg("--api-url")
        .arg(server.base_url())
        .arg("--session-file")
        .arg(session);
    cmd
}

#[test]
fn login_persists_token_for_later_commands() {
    let server = MockServer::start();
    let token = server.mock(|when, then| {
        when.method("POST")
            .path("/api/token/")
            .json_body(json!({"username": "ana", "password": "secret"}));
        then.status(200)
            .json_body(json!({"access": "tok1", "refresh": "ref1"}));
    });
    let list = server.mock(|when, then| {
        when.method("GET")
            .path("/categorias/")
            .header("authorization", "Bearer tok1");
        then.status(200)
            .json_body(json!([{"id": 7, "nombre": "Viajes"}]));
    });

    let dir = TempDir::new().expect("tmp dir");
    let session = dir.path().join("session.json");

    cli(&server, &session)
        .env("ENTRADAS_PASSWORD", "secret")
        .args(["login", "--username", "ana"])
        .assert()
        .success()
        .stdout(contains("\"next\": \"landing\""));
    token.assert();

    let assert = cli(&server, &session)
        .args(["categories", "list"])
        .assert()
        .success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains("\"nombre\": \"Viajes\""));
    list.assert();
}

#[test]
fn login_without_password_fails_fast() {
    let server = MockServer::start();
    let dir = TempDir::new().expect("tmp dir");

    cli(&server, &dir.path().join("session.json"))
        .args(["login", "--username", "ana"])
        .assert()
        .failure()
        .stderr(contains("password is required"));
}

#[test]
fn delete_requires_confirmation() {
    let server = MockServer::start();
    let any = server.mock(|_when, _then| {});
    let dir = TempDir::new().expect("tmp dir");

    cli(&server, &dir.path().join("session.json"))
        .args(["categories", "delete", "3"])
        .assert()
        .failure()
        .stderr(contains("without --yes"));
    any.assert_calls(0);
}

#[test]
fn posts_list_prints_resolved_cards() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/entradas/");
        then.status(200).json_body(json!([
            {"id": 1, "titulo": "Lima", "slug": "lima", "contenido": "x", "autor": 5}
        ]));
    });
    server.mock(|when, then| {
        when.method("GET").path("/categorias/");
        then.status(200).json_body(json!([]));
    });
    server.mock(|when, then| {
        when.method("GET").path("/cuenta/usuarios/");
        then.status(200).json_body(json!([]));
    });
    let dir = TempDir::new().expect("tmp dir");

    cli(&server, &dir.path().join("session.json"))
        .args(["posts", "list"])
        .assert()
        .success()
        .stdout(contains("\"author\": \"Unknown author\""))
        .stdout(contains("\"resumen\": \"No description available\""));
}

#[test]
fn invalid_api_url_is_reported() {
    let dir = TempDir::new().expect("tmp dir");
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("entradas-cli"));
    cmd.arg("--api-url")
        .arg("not a url")
        .arg("--session-file")
        .arg(dir.path().join("session.json"))
        .args(["authors", "list"])
        .assert()
        .failure()
        .stderr(contains("api.base_url"));
}
