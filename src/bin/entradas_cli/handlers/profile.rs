#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use entradas_admin::application::profile::ProfileController;
use serde_json::json;

use crate::args::ProfileCmd;
use crate::client::{CliError, Ctx};
use crate::io::{read_opt_value, read_upload};
use crate::print::{print_json, print_notice};

pub async fn handle(ctx: &Ctx, cmd: ProfileCmd) -> Result<(), CliError> {
    match cmd {
        ProfileCmd::Show => show(ctx).await,
        ProfileCmd::Update {
            descripcion,
            descripcion_file,
            es_autor,
            avatar,
        } => update(ctx, descripcion, descripcion_file, es_autor, avatar).await,
    }
}

async fn show(ctx: &Ctx) -> Result<(), CliError> {
    let mut controller = ProfileController::new(ctx.api.accounts(), ctx.scope());
    controller.load().await?;
    render(&controller)
}

async fn update(
    ctx: &Ctx,
    descripcion: Option<String>,
    descripcion_file: Option<PathBuf>,
    es_autor: Option<bool>,
    avatar: Option<PathBuf>,
) -> Result<(), CliError> {
    let descripcion = read_opt_value(descripcion, descripcion_file)?;
    let avatar = read_upload(avatar.as_deref())?;

    let mut controller = ProfileController::new(ctx.api.accounts(), ctx.scope());
    controller.load().await?;
    controller.begin_edit()?;
    if let Some(form) = controller.form_mut() {
        if let Some(descripcion) = descripcion {
            form.descripcion = descripcion;
        }
        if let Some(es_autor) = es_autor {
            form.es_autor = es_autor;
        }
        form.avatar = avatar;
    }
    controller.save().await?;
    print_notice(controller.notice());
    render(&controller)
}

fn render(controller: &ProfileController) -> Result<(), CliError> {
    let Some(perfil) = controller.perfil() else {
        return Err(CliError::NotFound("profile".into()));
    };
    print_json(&json!({
        "profile": perfil,
        "avatar_url": controller.avatar_url(),
    }))
}
