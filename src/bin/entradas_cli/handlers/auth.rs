#![deny(clippy::all, clippy::pedantic)]

use entradas_admin::application::auth::{LoginController, RegistrationController};
use entradas_admin::domain::forms::{LoginForm, RegistrationForm};
use serde_json::json;

use crate::args::PasswordArgs;
use crate::client::{CliError, Ctx};
use crate::io::read_password;
use crate::print::{print_json, print_notice};

pub async fn login(ctx: &Ctx, username: String, password: &PasswordArgs) -> Result<(), CliError> {
    let password = read_password(password)?;
    let mut controller = LoginController::new(ctx.api.accounts(), ctx.scope());
    *controller.form_mut() = LoginForm::new(username, password);
    let next = controller.submit().await?;
    eprintln!("Logged in");
    print_json(&json!({ "next": next }))
}

pub fn logout(ctx: &Ctx) -> Result<(), CliError> {
    let next = ctx.api.accounts().logout()?;
    eprintln!("Logged out");
    print_json(&json!({ "next": next }))
}

pub struct Registration {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

pub async fn register(
    ctx: &Ctx,
    input: Registration,
    password: &PasswordArgs,
) -> Result<(), CliError> {
    let password = read_password(password)?;
    let mut controller = RegistrationController::new(ctx.api.accounts(), ctx.scope());
    *controller.form_mut() = RegistrationForm {
        username: input.username,
        email: input.email,
        password,
        first_name: input.first_name,
        last_name: input.last_name,
    };
    let next = controller.submit().await?;
    print_notice(controller.notice());
    print_json(&json!({ "next": next }))
}
