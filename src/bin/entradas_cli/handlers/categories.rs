#![deny(clippy::all, clippy::pedantic)]

use entradas_admin::application::create::CreateController;
use entradas_admin::application::edit::EditController;
use entradas_admin::application::loader::ListLoader;
use entradas_admin::application::resources::Categories;

use crate::args::CategoriesCmd;
use crate::client::{CliError, Ctx};
use crate::print::{print_json, print_notice};

use super::{remove, show_one};

pub async fn handle(ctx: &Ctx, cmd: CategoriesCmd) -> Result<(), CliError> {
    match cmd {
        CategoriesCmd::List => list(ctx).await,
        CategoriesCmd::Get { id } => show_one(ctx, ctx.api.categories(), id).await,
        CategoriesCmd::Create { nombre } => create(ctx, nombre).await,
        CategoriesCmd::Update { id, nombre } => update(ctx, id, nombre).await,
        CategoriesCmd::Delete { id, yes } => {
            let mut owner = loader(ctx);
            remove(ctx, ctx.api.categories(), &mut owner, id, yes).await
        }
    }
}

fn loader(ctx: &Ctx) -> ListLoader<Categories> {
    ListLoader::new(ctx.api.categories(), ctx.scope())
}

async fn list(ctx: &Ctx) -> Result<(), CliError> {
    let mut loader = loader(ctx);
    let items = loader.load().await?;
    print_json(&items)
}

async fn create(ctx: &Ctx, nombre: String) -> Result<(), CliError> {
    let mut owner = loader(ctx);
    let mut creator = CreateController::new(ctx.api.categories(), ctx.scope());
    creator.open();
    creator.form_mut().nombre = nombre;
    let created = creator.submit(&mut owner).await?;
    print_notice(creator.notice());
    match created {
        Some(category) => print_json(&category),
        None => print_json(&owner.items()),
    }
}

async fn update(ctx: &Ctx, id: i64, nombre: String) -> Result<(), CliError> {
    let mut owner = loader(ctx);
    let mut editor = EditController::new(ctx.api.categories(), ctx.scope());
    editor.open(id).await?;
    if let Some(form) = editor.form_mut() {
        form.nombre = nombre;
    }
    let updated = editor.submit(&mut owner).await?;
    print_notice(editor.notice());
    match updated {
        Some(category) => print_json(&category),
        None => print_json(&owner.find(id)),
    }
}
