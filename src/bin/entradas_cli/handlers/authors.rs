#![deny(clippy::all, clippy::pedantic)]

use entradas_admin::application::loader::ListLoader;

use crate::args::AuthorsCmd;
use crate::client::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: AuthorsCmd) -> Result<(), CliError> {
    match cmd {
        AuthorsCmd::List => {
            let mut loader = ListLoader::new(ctx.api.authors(), ctx.scope());
            let authors = loader.load().await?;
            print_json(&authors)
        }
    }
}
