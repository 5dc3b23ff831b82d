// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! `cargo xtask ci` runs formatting, clippy, docs, every crate's tests and
//! the migration check, in that order. `cargo xtask verify-migrations`
//! applies the embedded `SQLite` migrations to a scratch database and
//! checks the resulting schema: every expected table exists, every
//! foreign key carries the expected delete action, and the migrations
//! revert and re-apply cleanly. `cargo xtask serve` runs the server
//! against a development database under `target/`.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{fmt::Debug, io, process::Output};

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{eyre::Context, Result};
use diesel::sql_types::Text;
use diesel::{QueryableByName, RunQueryDsl, SqliteConnection};
use duct::cmd;
use std::collections::{BTreeMap, BTreeSet};
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

/// Development database used by `cargo xtask serve`.
const DEV_DATABASE: &str = "target/hoa-tickets-dev.sqlite3";

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
    /// Run CI checks (format, clippy, docs, tests, migrations)
    CI,

    /// Check formatting, clippy and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Fix formatting issues in the workspace
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Run tests for the whole workspace or one crate
    #[command(visible_alias = "t")]
    Test {
        /// Only test this crate
        #[arg(value_enum)]
        krate: Option<Crate>,
    },

    /// Verify the `SQLite` migrations produce the expected schema
    #[command(visible_alias = "vm")]
    VerifyMigrations,

    /// Run the server against the development database
    #[command(visible_alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = 3000)]
        port: u16,

        /// Start from an empty development database
        #[arg(long)]
        fresh: bool,
    },
}

/// Workspace crates, in dependency order.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Crate {
    Domain,
    Audit,
    Persistence,
    Api,
    Server,
}

impl Crate {
    const fn package(self) -> &'static str {
        match self {
            Self::Domain => "hoa-tickets-domain",
            Self::Audit => "hoa-tickets-audit",
            Self::Persistence => "hoa-tickets-persistence",
            Self::Api => "hoa-tickets-api",
            Self::Server => "hoa-tickets-server",
        }
    }
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Lint => lint(),
            Self::FixFormatting => run_cargo_nightly(vec!["fmt", "--all"]),
            Self::Test { krate } => test(krate),
            Self::VerifyMigrations => verify_migrations(),
            Self::Serve { port, fresh } => serve(port, fresh),
        }
    }
}

/// Run CI checks (format, clippy, docs, tests, migrations)
fn ci() -> Result<()> {
    lint()?;
    test(None)?;
    verify_migrations()?;
    Ok(())
}

/// Check formatting first, since it is the cheapest failure
fn lint() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all", "--check"])?;
    run_cargo(vec!["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])?;
    lint_docs()
}

/// Check that the library docs build without warnings
fn lint_docs() -> Result<()> {
    cmd("cargo", ["doc", "--no-deps", "--workspace", "--exclude", "xtask"])
        .env_remove("CARGO")
        .env("RUSTDOCFLAGS", "-D warnings")
        .run_with_trace()?;

    Ok(())
}

/// Run tests for the whole workspace, or for one crate
fn test(krate: Option<Crate>) -> Result<()> {
    match krate {
        Some(krate) => run_cargo(vec!["test", "--package", krate.package()]),
        None => run_cargo(vec!["test", "--workspace", "--exclude", "xtask"]),
    }
}

/// Run the server with debug logging against `DEV_DATABASE`
fn serve(port: u16, fresh: bool) -> Result<()> {
    if fresh {
        for suffix in ["", "-wal", "-shm"] {
            let path = format!("{DEV_DATABASE}{suffix}");
            match std::fs::remove_file(&path) {
                Ok(()) => tracing::info!("removed {path}"),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => return Err(err).wrap_err(format!("Failed to remove {path}")),
            }
        }
    }

    let port = port.to_string();
    cmd(
        "cargo",
        [
            "run",
            "--package",
            "hoa-tickets-server",
            "--",
            "--database",
            DEV_DATABASE,
            "--port",
            port.as_str(),
        ],
    )
    .env("RUST_LOG", "debug")
    .run_with_trace()?;
    Ok(())
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// Run a cargo subcommand with the nightly toolchain
fn run_cargo_nightly(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args)
        // CARGO env var is set because we're running in a cargo subcommand
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;
    Ok(())
}

/// Tables the migrations must create.
const EXPECTED_TABLES: [&str; 11] = [
    "houses",
    "login_credentials",
    "organizations",
    "request_audit_events",
    "requests",
    "residents",
    "residents_houses",
    "sessions",
    "specializations",
    "staff_member_specializations",
    "staff_members",
];

/// Foreign keys as (table, column, referenced table, `ON DELETE` action).
const EXPECTED_FOREIGN_KEYS: [(&str, &str, &str, &str); 9] = [
    ("request_audit_events", "request_id", "requests", "CASCADE"),
    ("requests", "house_id", "houses", "CASCADE"),
    ("requests", "organization_id", "organizations", "SET NULL"),
    ("requests", "resident_id", "residents", "CASCADE"),
    ("requests", "responsible_id", "staff_members", "SET NULL"),
    ("residents_houses", "house_id", "houses", "CASCADE"),
    ("residents_houses", "resident_id", "residents", "CASCADE"),
    (
        "staff_member_specializations",
        "specialization_id",
        "specializations",
        "CASCADE",
    ),
    (
        "staff_member_specializations",
        "staff_member_id",
        "staff_members",
        "NO ACTION",
    ),
];

/// Verify the `SQLite` migrations.
///
/// ## What This Command Does
///
/// 1. Applies the embedded migrations to an in-memory `SQLite` database
/// 2. Checks the table set against the expected tables
/// 3. Checks every foreign key and its `ON DELETE` action
/// 4. Reverts all migrations and checks no tables remain
/// 5. Re-applies the migrations and checks the schema is unchanged
///
/// ## Usage
///
/// ```bash
/// cargo xtask verify-migrations
/// ```
fn verify_migrations() -> Result<()> {
    use diesel::Connection;
    use diesel_migrations::{embed_migrations, MigrationHarness};

    const MIGRATIONS: diesel_migrations::EmbeddedMigrations =
        embed_migrations!("../crates/persistence/migrations");

    tracing::info!("Starting migration verification");

    let mut conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;

    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .wrap_err("Failed to enable foreign keys on SQLite")?;

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to apply migrations: {}", e))?;
    tracing::info!("Migrations applied");

    let schema = introspect_schema(&mut conn)?;
    check_schema(&schema)?;

    conn.revert_all_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to revert migrations: {}", e))?;
    let reverted = introspect_schema(&mut conn)?;
    if !reverted.is_empty() {
        return Err(color_eyre::eyre::eyre!(
            "Tables left behind after revert: {:?}",
            reverted.keys().collect::<Vec<_>>()
        ));
    }
    tracing::info!("Migrations reverted");

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to re-apply migrations: {}", e))?;
    let reapplied = introspect_schema(&mut conn)?;
    if reapplied != schema {
        return Err(color_eyre::eyre::eyre!(
            "Schema differs after revert and re-apply"
        ));
    }

    tracing::info!("✓ Migration verification passed");
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ForeignKey {
    from_column: String,
    to_table: String,
    on_delete: String,
}

/// Foreign keys per table, keyed by table name.
type Schema = BTreeMap<String, BTreeSet<ForeignKey>>;

/// Introspect the `SQLite` tables and their foreign keys
fn introspect_schema(conn: &mut SqliteConnection) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ForeignKeyInfo {
        #[diesel(sql_type = Text)]
        table: String,
        #[diesel(sql_type = Text)]
        from: String,
        #[diesel(sql_type = Text)]
        on_delete: String,
    }

    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' \
         AND name != '__diesel_schema_migrations' ORDER BY name",
    )
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    let mut schema = Schema::new();
    for table in tables {
        let fks: Vec<ForeignKeyInfo> =
            diesel::sql_query(format!("PRAGMA foreign_key_list({})", table.name))
                .load(conn)
                .wrap_err(format!(
                    "Failed to get foreign keys for table {}",
                    table.name
                ))?;

        let foreign_keys = fks
            .into_iter()
            .map(|fk| ForeignKey {
                from_column: fk.from,
                to_table: fk.table,
                on_delete: fk.on_delete,
            })
            .collect();
        schema.insert(table.name, foreign_keys);
    }

    Ok(schema)
}

/// Compare the introspected schema with the expected tables and keys
fn check_schema(schema: &Schema) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    let expected_tables: BTreeSet<&str> = EXPECTED_TABLES.into_iter().collect();
    let actual_tables: BTreeSet<&str> = schema.keys().map(String::as_str).collect();
    for missing in expected_tables.difference(&actual_tables) {
        errors.push(format!("Missing table: {missing}"));
    }
    for extra in actual_tables.difference(&expected_tables) {
        errors.push(format!("Unexpected table: {extra}"));
    }

    let mut expected: Schema = Schema::new();
    for (table, column, to_table, on_delete) in EXPECTED_FOREIGN_KEYS {
        expected
            .entry(table.to_string())
            .or_default()
            .insert(ForeignKey {
                from_column: column.to_string(),
                to_table: to_table.to_string(),
                on_delete: on_delete.to_string(),
            });
    }

    for (table, actual_keys) in schema {
        let empty = BTreeSet::new();
        let expected_keys = expected.get(table).unwrap_or(&empty);
        for fk in expected_keys.difference(actual_keys) {
            errors.push(format!(
                "Table {table}: missing foreign key {} -> {} (ON DELETE {})",
                fk.from_column, fk.to_table, fk.on_delete
            ));
        }
        for fk in actual_keys.difference(expected_keys) {
            errors.push(format!(
                "Table {table}: unexpected foreign key {} -> {} (ON DELETE {})",
                fk.from_column, fk.to_table, fk.on_delete
            ));
        }
    }

    if errors.is_empty() {
        tracing::info!(tables = schema.len(), "Schema matches expectations");
        return Ok(());
    }

    for error in &errors {
        tracing::error!("{error}");
    }
    Err(color_eyre::eyre::eyre!(
        "Schema verification failed with {} error(s)",
        errors.len()
    ))
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
