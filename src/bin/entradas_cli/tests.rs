#![deny(clippy::all, clippy::pedantic)]

use clap::Parser;
use entradas_admin::infra::api::ApiClient;
use entradas_admin::session::Session;
use httpmock::MockServer;
use serde_json::json;
use tempfile::NamedTempFile;

use crate::args::{CategoriesCmd, Cli, Commands, PasswordArgs, PostsCmd, ProfileCmd};
use crate::client::{CliError, Ctx};
use crate::handlers::{auth, categories, posts, profile};

fn ctx(server: &MockServer) -> Ctx {
    let client = ApiClient::new(&server.base_url()).expect("client");
    Ctx::with_parts(client, Session::in_memory())
}

fn logged_in(server: &MockServer) -> Ctx {
    let ctx = ctx(server);
    ctx.api
        .session()
        .set_session("tok1", "ref1")
        .expect("session");
    ctx
}

fn tmp_file(contents: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("tmp file");
    std::io::Write::write_all(&mut file, contents).expect("write tmp");
    file
}

#[test]
fn password_file_wins_over_env() -> Result<(), CliError> {
    let file = tmp_file(b"from-file\n");
    let args = PasswordArgs {
        password_file: Some(file.path().to_path_buf()),
        password_env: Some("from-env".into()),
    };
    assert_eq!(crate::io::read_password(&args)?, "from-file");
    Ok(())
}

#[test]
fn missing_password_is_reported() {
    let err = crate::io::read_password(&PasswordArgs::default()).expect_err("no password");
    assert!(matches!(err, CliError::MissingPassword));
}

#[test]
fn delete_defaults_to_unconfirmed() {
    let cli = Cli::parse_from(["entradas-cli", "categories", "delete", "3"]);
    match cli.command {
        Commands::Categories(args) => {
            assert!(matches!(
                args.action,
                CategoriesCmd::Delete { id: 3, yes: false }
            ));
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn global_flags_parse_after_subcommand() {
    let cli = Cli::parse_from([
        "entradas-cli",
        "posts",
        "list",
        "--api-url",
        "https://blog.example/",
    ]);
    assert_eq!(cli.config.api_url.as_deref(), Some("https://blog.example/"));
    assert!(matches!(cli.command, Commands::Posts(_)));
}

#[tokio::test]
async fn unconfirmed_delete_sends_nothing() {
    let server = MockServer::start_async().await;
    let mock = server.mock_async(|_when, _then| {}).await;

    let ctx = logged_in(&server);
    let err = categories::handle(&ctx, CategoriesCmd::Delete { id: 3, yes: false })
        .await
        .expect_err("refused");
    assert!(matches!(
        err,
        CliError::ConfirmationRequired {
            subject: "category",
            id: 3
        }
    ));
    mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn confirmed_delete_opens_then_deletes_then_reloads() -> Result<(), CliError> {
    let server = MockServer::start_async().await;
    let get = server
        .mock_async(|when, then| {
            when.method("GET").path("/categorias/3");
            then.status(200).json_body(json!({"id": 3, "nombre": "Viajes"}));
        })
        .await;
    let delete = server
        .mock_async(|when, then| {
            when.method("DELETE")
                .path("/categorias/3")
                .header("authorization", "Bearer tok1");
            then.status(204);
        })
        .await;
    let list = server
        .mock_async(|when, then| {
            when.method("GET").path("/categorias/");
            then.status(200).json_body(json!([]));
        })
        .await;

    let ctx = logged_in(&server);
    categories::handle(&ctx, CategoriesCmd::Delete { id: 3, yes: true }).await?;
    get.assert_async().await;
    delete.assert_async().await;
    list.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn invalid_category_name_never_reaches_the_server() {
    let server = MockServer::start_async().await;
    let mock = server.mock_async(|_when, _then| {}).await;

    let ctx = logged_in(&server);
    let err = categories::handle(
        &ctx,
        CategoriesCmd::Create {
            nombre: "ab".into(),
        },
    )
    .await
    .expect_err("too short");
    assert!(err.to_string().contains("nombre"));
    mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn login_stores_the_access_token() -> Result<(), CliError> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method("POST")
                .path("/api/token/")
                .json_body(json!({"username": "ana", "password": "secret"}));
            then.status(200)
                .json_body(json!({"access": "tok1", "refresh": "ref1"}));
        })
        .await;

    let ctx = ctx(&server);
    let password = PasswordArgs {
        password_file: None,
        password_env: Some("secret".into()),
    };
    auth::login(&ctx, "ana".into(), &password).await?;

    mock.assert_async().await;
    assert_eq!(ctx.api.session().access_token().as_deref(), Some("tok1"));
    Ok(())
}

#[tokio::test]
async fn logout_clears_the_session() -> Result<(), CliError> {
    let server = MockServer::start_async().await;
    let ctx = logged_in(&server);
    auth::logout(&ctx)?;
    assert!(!ctx.api.session().is_authenticated());
    Ok(())
}

#[tokio::test]
async fn posts_create_sends_multipart_with_image() -> Result<(), CliError> {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method("POST")
                .path("/entradas/")
                .body_includes("name=\"titulo\"")
                .body_includes("Rust en casa")
                .body_includes("filename=\"cover.png\"");
            then.status(201).json_body(json!({
                "id": 9, "titulo": "Rust en casa", "slug": "rust-en-casa", "contenido": "BODY"
            }));
        })
        .await;
    for path in ["/entradas/", "/categorias/", "/cuenta/usuarios/"] {
        server
            .mock_async(|when, then| {
                when.method("GET").path(path);
                then.status(200).json_body(json!([]));
            })
            .await;
    }

    let dir = tempfile::tempdir().expect("tmp dir");
    let image = dir.path().join("cover.png");
    std::fs::write(&image, [0x89, 0x50, 0x4e, 0x47]).expect("write image");
    let body = tmp_file(b"BODY");

    let ctx = logged_in(&server);
    posts::handle(
        &ctx,
        PostsCmd::Create {
            titulo: "Rust en casa".into(),
            slug: None,
            resumen: None,
            contenido: None,
            contenido_file: Some(body.path().to_path_buf()),
            categoria: None,
            imagen: Some(image),
        },
    )
    .await?;
    create.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn posts_show_looks_up_by_slug() -> Result<(), CliError> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method("GET").path("/entradas/slug/viaje-a-lima");
            then.status(200).json_body(json!({
                "id": 4, "titulo": "Viaje a Lima", "slug": "viaje-a-lima", "contenido": "Texto"
            }));
        })
        .await;

    let ctx = logged_in(&server);
    posts::handle(
        &ctx,
        PostsCmd::Show {
            slug: "viaje-a-lima".into(),
        },
    )
    .await?;
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn profile_update_keeps_unset_fields() -> Result<(), CliError> {
    let server = MockServer::start_async().await;
    let get = server
        .mock_async(|when, then| {
            when.method("GET").path("/cuenta/perfil/");
            then.status(200).json_body(json!({
                "username": "ana", "descripcion": "Hola", "es_autor": false
            }));
        })
        .await;
    let put = server
        .mock_async(|when, then| {
            when.method("PUT")
                .path("/cuenta/perfil/")
                .body_includes("Hola")
                .body_includes("true");
            then.status(200).json_body(json!({
                "username": "ana", "descripcion": "Hola", "es_autor": true
            }));
        })
        .await;

    let ctx = logged_in(&server);
    profile::handle(
        &ctx,
        ProfileCmd::Update {
            descripcion: None,
            descripcion_file: None,
            es_autor: Some(true),
            avatar: None,
        },
    )
    .await?;
    put.assert_async().await;
    get.assert_calls_async(2).await;
    Ok(())
}
