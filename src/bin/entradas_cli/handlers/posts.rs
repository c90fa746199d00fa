#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use entradas_admin::application::board::PostsBoard;
use entradas_admin::application::create::CreateController;
use entradas_admin::application::edit::EditController;
use entradas_admin::application::error::{Action, ControllerError};
use entradas_admin::domain::forms::PostForm;

use crate::args::PostsCmd;
use crate::client::{CliError, Ctx};
use crate::io::{read_opt_value, read_upload};
use crate::print::{print_json, print_notice};

use super::{remove, show_one};

/// Field values supplied on the command line; `None` leaves the form as is.
#[derive(Debug, Default)]
pub struct PostInput {
    pub titulo: Option<String>,
    pub slug: Option<String>,
    pub resumen: Option<String>,
    pub contenido: Option<String>,
    pub contenido_file: Option<PathBuf>,
    pub categoria: Option<i64>,
    pub imagen: Option<PathBuf>,
}

impl PostInput {
    fn apply(self, form: &mut PostForm) -> Result<(), CliError> {
        if let Some(titulo) = self.titulo {
            form.titulo = titulo;
        }
        if let Some(slug) = self.slug {
            form.slug = slug;
        }
        if let Some(resumen) = self.resumen {
            form.resumen = resumen;
        }
        if let Some(contenido) = read_opt_value(self.contenido, self.contenido_file)? {
            form.contenido = contenido;
        }
        if let Some(categoria) = self.categoria {
            form.categoria = categoria.to_string();
        }
        if let Some(imagen) = read_upload(self.imagen.as_deref())? {
            form.imagen = Some(imagen);
        }
        Ok(())
    }
}

pub async fn handle(ctx: &Ctx, cmd: PostsCmd) -> Result<(), CliError> {
    match cmd {
        PostsCmd::List => list(ctx).await,
        PostsCmd::Get { id } => show_one(ctx, ctx.api.posts(), id).await,
        PostsCmd::Show { slug } => show(ctx, &slug).await,
        PostsCmd::Create {
            titulo,
            slug,
            resumen,
            contenido,
            contenido_file,
            categoria,
            imagen,
        } => {
            let input = PostInput {
                titulo: Some(titulo),
                slug,
                resumen,
                contenido,
                contenido_file,
                categoria,
                imagen,
            };
            create(ctx, input).await
        }
        PostsCmd::Update {
            id,
            titulo,
            slug,
            resumen,
            contenido,
            contenido_file,
            categoria,
            imagen,
        } => {
            let input = PostInput {
                titulo,
                slug,
                resumen,
                contenido,
                contenido_file,
                categoria,
                imagen,
            };
            update(ctx, id, input).await
        }
        PostsCmd::Delete { id, yes } => {
            let mut owner = PostsBoard::new(&ctx.api, ctx.scope());
            remove(ctx, ctx.api.posts(), &mut owner, id, yes).await
        }
    }
}

async fn list(ctx: &Ctx) -> Result<(), CliError> {
    let mut board = PostsBoard::new(&ctx.api, ctx.scope());
    board.load().await?;
    print_json(&board.cards())
}

async fn show(ctx: &Ctx, slug: &str) -> Result<(), CliError> {
    let entrada = ctx
        .api
        .posts()
        .by_slug(slug, &ctx.scope())
        .await
        .map_err(|err| ControllerError::request(Action::Fetch, "post", err))?;
    print_json(&entrada)
}

async fn create(ctx: &Ctx, input: PostInput) -> Result<(), CliError> {
    let mut owner = PostsBoard::new(&ctx.api, ctx.scope());
    let mut creator = CreateController::new(ctx.api.posts(), ctx.scope());
    creator.open();
    input.apply(creator.form_mut())?;
    let created = creator.submit(&mut owner).await?;
    print_notice(creator.notice());
    match created {
        Some(entrada) => print_json(&entrada),
        None => print_json(&owner.cards()),
    }
}

async fn update(ctx: &Ctx, id: i64, input: PostInput) -> Result<(), CliError> {
    let mut owner = PostsBoard::new(&ctx.api, ctx.scope());
    let mut editor = EditController::new(ctx.api.posts(), ctx.scope());
    editor.open(id).await?;
    if let Some(form) = editor.form_mut() {
        input.apply(form)?;
    }
    let updated = editor.submit(&mut owner).await?;
    print_notice(editor.notice());
    match updated {
        Some(entrada) => print_json(&entrada),
        None => print_json(&owner.entries().iter().find(|e| e.id == id)),
    }
}
