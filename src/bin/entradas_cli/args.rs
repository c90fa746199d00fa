//! Command-line surface for `entradas-cli`.

#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use entradas_admin::config::ConfigArgs;

#[derive(Parser, Debug)]
#[command(name = "entradas-cli", version, about = "Entradas blog admin CLI", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Password sources: a file or the environment.
#[derive(Args, Debug, Default, Clone)]
pub struct PasswordArgs {
    /// Path to a file containing the password (takes precedence over env)
    #[arg(long, env = "ENTRADAS_PASSWORD_FILE")]
    pub password_file: Option<PathBuf>,

    /// Password from env (CLI flag intentionally disabled to avoid shell history leaks)
    #[arg(hide = true, env = "ENTRADAS_PASSWORD")]
    pub password_env: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Exchange credentials for a session token
    Login {
        #[arg(long)]
        username: String,
        #[command(flatten)]
        password: PasswordArgs,
    },
    /// Forget the stored session
    Logout,
    /// Create a new account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        #[command(flatten)]
        password: PasswordArgs,
    },
    /// The logged-in user's profile
    Profile(ProfileArgs),
    /// Registered authors
    Authors(AuthorsArgs),
    /// Category management
    Categories(CategoriesArgs),
    /// Post management
    Posts(PostsArgs),
}

#[derive(Parser, Debug)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileCmd,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCmd {
    /// Show the current profile
    Show,
    /// Update description, author flag or avatar
    Update {
        #[arg(long)]
        descripcion: Option<String>,
        #[arg(long)]
        descripcion_file: Option<PathBuf>,
        #[arg(long)]
        es_autor: Option<bool>,
        /// Image file to upload as the new avatar
        #[arg(long)]
        avatar: Option<PathBuf>,
    },
}

#[derive(Parser, Debug)]
pub struct AuthorsArgs {
    #[command(subcommand)]
    pub action: AuthorsCmd,
}

#[derive(Subcommand, Debug)]
pub enum AuthorsCmd {
    /// List authors
    List,
}

#[derive(Parser, Debug)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    pub action: CategoriesCmd,
}

#[derive(Subcommand, Debug)]
pub enum CategoriesCmd {
    /// List categories
    List,
    /// Get a category by id
    Get { id: i64 },
    /// Create a category
    Create {
        #[arg(long)]
        nombre: String,
    },
    /// Rename a category
    Update {
        id: i64,
        #[arg(long)]
        nombre: String,
    },
    /// Delete a category
    Delete {
        id: i64,
        /// Confirm the deletion
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
}

#[derive(Parser, Debug)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub action: PostsCmd,
}

#[derive(Subcommand, Debug)]
pub enum PostsCmd {
    /// List posts with author and category names resolved
    List,
    /// Get a post by id
    Get { id: i64 },
    /// Show a post by slug
    Show { slug: String },
    /// Create a post
    Create {
        #[arg(long)]
        titulo: String,
        #[arg(long)]
        slug: Option<String>,
        #[arg(long)]
        resumen: Option<String>,
        #[arg(long)]
        contenido: Option<String>,
        #[arg(long)]
        contenido_file: Option<PathBuf>,
        #[arg(long)]
        categoria: Option<i64>,
        /// Cover image to upload
        #[arg(long)]
        imagen: Option<PathBuf>,
    },
    /// Update a post; omitted fields keep their current values
    Update {
        id: i64,
        #[arg(long)]
        titulo: Option<String>,
        #[arg(long)]
        slug: Option<String>,
        #[arg(long)]
        resumen: Option<String>,
        #[arg(long)]
        contenido: Option<String>,
        #[arg(long)]
        contenido_file: Option<PathBuf>,
        #[arg(long)]
        categoria: Option<i64>,
        #[arg(long)]
        imagen: Option<PathBuf>,
    },
    /// Delete a post
    Delete {
        id: i64,
        /// Confirm the deletion
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
}
