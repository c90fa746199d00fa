#![deny(clippy::all, clippy::pedantic)]

pub mod auth;
pub mod authors;
pub mod categories;
pub mod posts;
pub mod profile;

use entradas_admin::application::edit::EditController;
use entradas_admin::application::loader::Reload;
use entradas_admin::application::resources::Resource;

use crate::client::{CliError, Ctx};
use crate::print::{print_json, print_notice};

/// Open the edit form for `id` and print the fetched resource.
async fn show_one<R: Resource>(ctx: &Ctx, resource: R, id: i64) -> Result<(), CliError> {
    let mut editor = EditController::new(resource, ctx.scope());
    let item = editor.open(id).await?;
    print_json(item)
}

/// Delete through the edit form's two-step confirmation. Refused before any
/// request unless the caller confirmed.
async fn remove<R, O>(
    ctx: &Ctx,
    resource: R,
    owner: &mut O,
    id: i64,
    confirmed: bool,
) -> Result<(), CliError>
where
    R: Resource,
    O: Reload,
{
    if !confirmed {
        return Err(CliError::ConfirmationRequired {
            subject: R::SINGULAR,
            id,
        });
    }
    let mut editor = EditController::new(resource, ctx.scope());
    editor.open(id).await?;
    let confirmation = editor.request_delete()?;
    editor.confirm_delete(confirmation, owner).await?;
    print_notice(editor.notice());
    Ok(())
}
