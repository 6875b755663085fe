// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! - `cargo xtask ci` runs formatting, clippy, docs, build and tests
//! - `cargo xtask migrate <path>` applies the embedded migrations to a
//!   `SQLite` file, creating it if needed
//! - `cargo xtask verify-schema` migrates a scratch database and checks the
//!   tables and the one-active-lot-per-location index are in place

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{
    io,
    path::{Path, PathBuf},
    process::Output,
};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{
    eyre::{bail, eyre, Context},
    Result,
};
use diesel::sql_types::Text;
use diesel::{Connection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::MigrationHarness;
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;
use veilingklok_persistence::MIGRATIONS;

/// Tables the migrations must create.
const EXPECTED_TABLES: [&str; 3] = ["accounts", "product_status_history", "products"];

/// Index that keeps a single lot on the clock per location.
const ACTIVE_LOT_INDEX: &str = "idx_products_one_active_per_location";

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test, schema)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Lint formatting, clippy, and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check documentation for errors and warnings
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Apply the embedded migrations to a `SQLite` database file
    #[command(visible_alias = "m")]
    Migrate {
        /// Database file to migrate
        database: PathBuf,
    },

    /// Migrate a scratch database and check the resulting schema
    #[command(visible_alias = "vs")]
    VerifySchema,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => lint_format(),
            Self::FixFormatting => fix_format(),
            Self::Test => test(),
            Self::Migrate { database } => migrate(&database),
            Self::VerifySchema => verify_schema(),
        }
    }
}

/// Run CI checks (lint, build, test, schema)
fn ci() -> Result<()> {
    lint()?;
    build()?;
    test()?;
    verify_schema()?;
    Ok(())
}

/// Build the project
fn build() -> Result<()> {
    run_cargo(vec!["build", "--all-targets", "--all-features"])
}

/// Run cargo check
fn check() -> Result<()> {
    run_cargo(vec!["check", "--all-targets", "--all-features"])
}

/// Lint formatting, clippy, and docs
fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    lint_format()?;
    Ok(())
}

/// Run clippy on the project
fn lint_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Check that docs build without warnings for every default package
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            ["doc", "--no-deps", "--all-features", "--package", &package.name],
        )
        .env("RUSTDOCFLAGS", "-D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

/// Lint formatting issues in the project
fn lint_format() -> Result<()> {
    run_cargo(vec!["fmt", "--all", "--check"])
}

/// Fix formatting issues in the project
fn fix_format() -> Result<()> {
    run_cargo(vec!["fmt", "--all"])
}

/// Run all tests in the workspace
fn test() -> Result<()> {
    run_cargo(vec!["test", "--all-targets", "--all-features"])?;
    run_cargo(vec!["test", "--doc", "--all-features"])
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// Apply pending migrations to `database`.
fn migrate(database: &Path) -> Result<()> {
    let url = database
        .to_str()
        .ok_or_else(|| eyre!("database path is not valid UTF-8: {}", database.display()))?;

    let mut conn = SqliteConnection::establish(url)
        .wrap_err_with(|| format!("failed to open database {url}"))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("failed to run migrations: {e}"))?;

    if applied.is_empty() {
        tracing::info!("{url} is up to date");
    }
    for version in applied {
        tracing::info!("applied migration {version}");
    }
    Ok(())
}

#[derive(QueryableByName)]
struct SchemaObject {
    #[diesel(sql_type = Text)]
    name: String,
}

/// Migrate an in-memory database and check the lifecycle schema
fn verify_schema() -> Result<()> {
    let mut conn =
        SqliteConnection::establish(":memory:").wrap_err("failed to open scratch database")?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("failed to run migrations: {e}"))?;

    let tables: Vec<SchemaObject> = diesel::sql_query(
        "SELECT name FROM sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
         AND name != '__diesel_schema_migrations' ORDER BY name",
    )
    .load(&mut conn)
    .wrap_err("failed to list tables")?;
    let table_names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();

    for expected in EXPECTED_TABLES {
        if !table_names.contains(&expected) {
            bail!("missing table {expected}; found {table_names:?}");
        }
    }

    let indexes: Vec<SchemaObject> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = 'products'",
    )
    .load(&mut conn)
    .wrap_err("failed to list indexes")?;
    if !indexes.iter().any(|i| i.name == ACTIVE_LOT_INDEX) {
        bail!("missing index {ACTIVE_LOT_INDEX}");
    }

    tracing::info!(
        "schema verified: {} tables, {} product indexes",
        table_names.len(),
        indexes.len()
    );
    Ok(())
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
