// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation and Infrastructure Orchestration
//!
//! Workspace automation for building, linting, and testing, including
//! explicit opt-in backend validation for MySQL/MariaDB in addition to
//! the default `SQLite` backend.
//!
//! ## Backend Testing Commands
//!
//! - `cargo test`: standard tests against `SQLite`, fast and infrastructure-free
//! - `cargo xtask test-mariadb`: backend validation tests against `MariaDB`
//!
//! ### Implementation Details
//!
//! The `test-mariadb` command:
//! - Drives the Docker container lifecycle (start, wait, stop, remove)
//! - Provisions a `MariaDB` 11 container with a test database
//! - Exports the environment variables the tests expect
//! - Runs the explicitly ignored tests via the `--ignored` flag
//! - Cleans up the container even when tests fail
//!
//! ### Design Principles
//!
//! - Test code carries no infrastructure setup of its own
//! - Tests never skip silently because a service is missing
//! - External databases are strictly opt-in, never automatic
//! - Plain `cargo test` stays fast with no external services
//! - Backend-specific orchestration lives here, not in the crates

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{
    collections::{BTreeMap, BTreeSet},
    io,
    process::Output,
    thread::sleep,
    time::Duration,
};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{Result, eyre::Context};
use diesel::sql_types::{Integer, Text};
use diesel::{Connection, MysqlConnection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use duct::cmd;
use tracing_log::AsTrace;

/// `SQLite` migrations embedded from the persistence crate.
const SQLITE_MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");

/// `MySQL` migrations embedded from the persistence crate.
const MYSQL_MIGRATIONS: EmbeddedMigrations =
    embed_migrations!("../crates/persistence/migrations_mysql");

/// Container settings for the `test-mariadb` command.
const TEST_DB: MariadbConfig = MariadbConfig {
    container_name: "resa-test-mariadb",
    db_name: "resa_test",
    db_user: "resa",
    db_password: "test_password",
    port: "3307", // Non-standard port to avoid conflicts
};

/// Container settings for the `verify-migrations` command.
const VERIFY_DB: MariadbConfig = MariadbConfig {
    container_name: "resa-verify-migrations",
    db_name: "resa_verify",
    db_user: "resa",
    db_password: "verify_password",
    port: "3308", // Different port from test-mariadb so both can run
};

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.verbosity.log_level_filter().as_trace())
        .without_time()
        .init();

    if let Err(err) = args.command.run() {
        tracing::error!("{err}");
        std::process::exit(1);
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

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run the full CI pipeline (lint, deny, machete, build, test)
    CI,

    /// Build every workspace target
    #[command(visible_alias = "b")]
    Build,

    /// Type-check the workspace
    #[command(visible_alias = "c")]
    Check,

    /// Generate an lcov coverage report
    #[command(visible_alias = "cov")]
    Coverage,

    /// Audit dependencies with cargo-deny
    #[command(visible_alias = "cd")]
    Deny,

    /// Find unused dependencies with cargo-machete
    #[command(visible_alias = "m")]
    Machete,

    /// Run every lint (clippy, docs, formatting, typos)
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy with warnings denied
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check that docs build cleanly
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check formatting without modifying files
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Check for typos
    #[command(visible_alias = "lt")]
    LintTypos,

    /// Apply clippy fixes
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Reformat the workspace
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Fix typos in place
    #[command(visible_alias = "typos")]
    FixTypos,

    /// Run lib and doc tests
    #[command(visible_alias = "t")]
    Test,

    /// Run doc tests only
    #[command(visible_alias = "td")]
    TestDocs,

    /// Run lib tests only
    #[command(visible_alias = "tl")]
    TestLibs,

    /// Run `MariaDB` backend validation tests
    #[command(visible_alias = "tm")]
    TestMariadb,

    /// Verify schema parity between `SQLite` and `MySQL` migrations
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Coverage => coverage(),
            Self::Deny => deny(),
            Self::Machete => machete(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => lint_format(),
            Self::LintTypos => lint_typos(),
            Self::FixClippy => fix_clippy(),
            Self::FixFormatting => fix_format(),
            Self::FixTypos => fix_typos(),
            Self::Test => test(),
            Self::TestDocs => test_docs(),
            Self::TestLibs => test_libs(),
            Self::TestMariadb => test_mariadb(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

/// Run CI checks (lint, build, test)
///
/// Docker-backed commands (`test-mariadb`, `verify-migrations`) are not
/// part of CI and must be invoked explicitly.
fn ci() -> Result<()> {
    lint()?;
    deny()?;
    machete()?;
    build()?;
    test()?;
    Ok(())
}

fn deny() -> Result<()> {
    run_cargo(&["deny", "check"])
}

fn machete() -> Result<()> {
    cmd!("cargo-machete").run_with_trace()?;
    Ok(())
}

/// Build every target in the workspace
fn build() -> Result<()> {
    run_cargo(&["build", "--all-targets", "--all-features"])
}

/// Type-check without producing artifacts
fn check() -> Result<()> {
    run_cargo(&["check", "--all-targets", "--all-features"])
}

/// Produce an lcov coverage report under target/
fn coverage() -> Result<()> {
    run_cargo(&[
        "llvm-cov",
        "--lcov",
        "--output-path",
        "target/lcov.info",
        "--all-features",
    ])
}

/// Run every lint in sequence
fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    lint_format()?;
    lint_typos()?;
    Ok(())
}

/// Run clippy across every target with warnings denied
fn lint_clippy() -> Result<()> {
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Apply clippy's machine-applicable fixes
fn fix_clippy() -> Result<()> {
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--fix",
        "--allow-dirty",
        "--allow-staged",
        "--",
        "-D",
        "warnings",
    ])
}

/// Check that docs build cleanly under docs.rs-equivalent flags
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for pkg in meta.workspace_default_packages() {
        cmd(
            "cargo",
            ["doc", "--no-deps", "--all-features", "--package", &pkg.name],
        )
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .env("RUSTDOCFLAGS", "--cfg docsrs -D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

/// Report formatting drift without touching files
fn lint_format() -> Result<()> {
    run_cargo_nightly(&["fmt", "--all", "--check"])
}

/// Reformat the whole workspace
fn fix_format() -> Result<()> {
    run_cargo_nightly(&["fmt", "--all"])
}

/// Scan for typos with [typos-cli](https://github.com/crate-ci/typos/)
fn lint_typos() -> Result<()> {
    cmd!("typos").run_with_trace()?;
    Ok(())
}

/// Rewrite typos in place
fn fix_typos() -> Result<()> {
    cmd!("typos", "-w").run_with_trace()?;
    Ok(())
}

/// Run lib tests, then doc tests
fn test() -> Result<()> {
    test_libs()?;
    test_docs()?; // run last because it's slow
    Ok(())
}

/// Run doc tests across the workspace
fn test_docs() -> Result<()> {
    run_cargo(&["test", "--doc", "--all-features"])
}

/// Run unit and integration tests across the workspace
fn test_libs() -> Result<()> {
    run_cargo(&["test", "--all-targets", "--all-features"])
}

/// Invoke a cargo subcommand on the default toolchain.
fn run_cargo(args: &[&str]) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// Invoke a cargo subcommand on the nightly toolchain.
fn run_cargo_nightly(args: &[&str]) -> Result<()> {
    cmd("cargo", args)
        // CARGO is set because this runs inside a cargo subcommand itself
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;
    Ok(())
}

/// Settings for a disposable `MariaDB` container.
struct MariadbConfig {
    /// Docker container name.
    container_name: &'static str,
    /// Database name to provision.
    db_name: &'static str,
    /// Database user to provision.
    db_user: &'static str,
    /// Password for the database user.
    db_password: &'static str,
    /// Host port mapped to the container's 3306.
    port: &'static str,
}

impl MariadbConfig {
    /// Connection URL for the provisioned database.
    fn database_url(&self) -> String {
        format!(
            "mysql://{}:{}@127.0.0.1:{}/{}",
            self.db_user, self.db_password, self.port, self.db_name
        )
    }
}

/// Ensure Docker is installed and reachable.
fn ensure_docker() -> Result<()> {
    cmd!("docker", "--version")
        .run_with_trace()
        .wrap_err("Docker is not available. Please install Docker.")?;
    Ok(())
}

/// Stop and remove a container, ignoring failures.
fn remove_container(name: &str) {
    let _ = cmd!("docker", "stop", name).run();
    let _ = cmd!("docker", "rm", name).run();
}

/// Start a `MariaDB` 11 container with the given settings.
fn start_mariadb(config: &MariadbConfig) -> Result<()> {
    tracing::info!("Starting MariaDB container: {}", config.container_name);
    cmd!(
        "docker",
        "run",
        "--name",
        config.container_name,
        "-e",
        format!("MARIADB_DATABASE={}", config.db_name),
        "-e",
        format!("MARIADB_USER={}", config.db_user),
        "-e",
        format!("MARIADB_PASSWORD={}", config.db_password),
        "-e",
        "MARIADB_ROOT_PASSWORD=root_password",
        "-p",
        format!("{}:3306", config.port),
        "-d",
        "mariadb:11"
    )
    .run_with_trace()
    .wrap_err("Failed to start MariaDB container")?;
    Ok(())
}

/// Wait for a `MariaDB` container to accept connections.
///
/// Polls once per second for up to 30 seconds.
fn wait_for_mariadb(config: &MariadbConfig) -> Result<()> {
    const READINESS_ATTEMPTS: u32 = 30;

    tracing::info!("Waiting for MariaDB to be ready...");
    for attempt in 1..=READINESS_ATTEMPTS {
        sleep(Duration::from_secs(1));
        tracing::debug!("Probing MariaDB, attempt {attempt}/{READINESS_ATTEMPTS}");

        let probe = cmd!(
            "docker",
            "exec",
            config.container_name,
            "mariadb",
            "-u",
            config.db_user,
            format!("-p{}", config.db_password),
            "-e",
            "SELECT 1"
        )
        .run();

        if probe.is_ok() {
            tracing::info!("MariaDB is ready");
            return Ok(());
        }
    }

    Err(color_eyre::eyre::eyre!(
        "MariaDB did not become ready within timeout"
    ))
}

/// Run `MariaDB` backend validation tests
///
/// This command provides explicit, opt-in backend validation for MySQL/MariaDB.
/// It orchestrates all required infrastructure and runs ignored tests that
/// validate schema compatibility, constraint enforcement, and transaction behavior.
///
/// ## What This Command Does
///
/// 1. Checks that Docker is reachable
/// 2. Starts a `MariaDB` 11 container holding a provisioned test database
/// 3. Polls until `MariaDB` accepts connections (30 second limit)
/// 4. Exports the environment the tests read:
///    - `DATABASE_URL`: `MySQL` connection string
///    - `RESA_TEST_BACKEND`: Set to "mariadb"
/// 5. Runs the `#[ignore]`d validation tests in `resa-persistence`
/// 6. Stops and removes the container whether or not tests passed
///
/// ## Requirements
///
/// - A running Docker daemon
/// - Port 3307 free on the host (mapped to the container)
/// - `MySQL` client libraries present at compile time
///
/// ## Failures
///
/// The command fails if Docker is missing, the container does not start or
/// never becomes ready, or any validation test fails. Container cleanup
/// happens regardless of test outcome.
fn test_mariadb() -> Result<()> {
    tracing::info!("Starting MariaDB backend validation");

    tracing::info!("Checking Docker availability");
    ensure_docker()?;

    tracing::info!("Cleaning up any existing test container");
    remove_container(TEST_DB.container_name);

    start_mariadb(&TEST_DB)?;

    if let Err(err) = wait_for_mariadb(&TEST_DB) {
        remove_container(TEST_DB.container_name);
        return Err(err);
    }

    // Run ignored tests with explicit opt-in
    // Filter to only backend_validation_tests module to avoid running non-ignored tests
    tracing::info!("Running MariaDB backend validation tests");
    let test_result = cmd!(
        "cargo",
        "test",
        "--package",
        "resa-persistence",
        "backend_validation_tests",
        "--",
        "--ignored",
        "--test-threads=1"
    )
    .env("DATABASE_URL", TEST_DB.database_url())
    .env("RESA_TEST_BACKEND", "mariadb")
    .run_with_trace();

    // Always cleanup container
    tracing::info!("Stopping MariaDB container");
    remove_container(TEST_DB.container_name);

    test_result.wrap_err("MariaDB backend validation tests failed")?;

    tracing::info!("MariaDB backend validation completed successfully");
    Ok(())
}

/// Verify schema parity between `SQLite` and `MySQL` migrations
///
/// This command enforces that backend-specific migrations in `migrations/` (`SQLite`)
/// and `migrations_mysql/` (`MySQL`) produce semantically identical schemas.
///
/// ## What This Command Does
///
/// 1. Provisions an in-memory `SQLite` database and a throwaway `MariaDB`
///    container
/// 2. Applies each backend's migration set
/// 3. Introspects both resulting schemas (tables, columns, types, constraints)
/// 4. Normalizes type names into a shared vocabulary
/// 5. Compares the schemas structurally and fails on the first mismatch
/// 6. Tears down the container whether or not verification passed
///
/// ## Requirements
///
/// - Docker must be installed and running
/// - Port 3308 must be available (used for `MariaDB` verification)
///
/// ## Failures
///
/// The command fails if:
/// - Docker is not available
/// - `MariaDB` container fails to start
/// - Migrations fail to apply on either backend
/// - Schemas do not match structurally
///
/// Container cleanup happens regardless of outcome.
fn verify_migrations() -> Result<()> {
    tracing::info!("Starting schema parity verification");

    tracing::info!("Checking Docker availability");
    ensure_docker()?;

    tracing::info!("Cleaning up any existing verification container");
    remove_container(VERIFY_DB.container_name);

    start_mariadb(&VERIFY_DB)?;

    if let Err(err) = wait_for_mariadb(&VERIFY_DB) {
        remove_container(VERIFY_DB.container_name);
        return Err(err);
    }

    // Apply migrations and introspect schemas
    let verification_result = (|| -> Result<()> {
        tracing::info!("Applying SQLite migrations");
        let mut sqlite_conn = SqliteConnection::establish(":memory:")
            .wrap_err("Failed to create SQLite in-memory database")?;

        diesel::sql_query("PRAGMA foreign_keys = ON")
            .execute(&mut sqlite_conn)
            .wrap_err("Failed to enable foreign keys on SQLite")?;

        sqlite_conn
            .run_pending_migrations(SQLITE_MIGRATIONS)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to apply SQLite migrations: {}", e))?;

        tracing::info!("SQLite migrations applied successfully");

        tracing::info!("Applying MySQL migrations");
        let mut mysql_conn = MysqlConnection::establish(&VERIFY_DB.database_url())
            .wrap_err("Failed to connect to MariaDB")?;

        mysql_conn
            .run_pending_migrations(MYSQL_MIGRATIONS)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to apply MySQL migrations: {}", e))?;

        tracing::info!("MySQL migrations applied successfully");

        tracing::info!("Introspecting SQLite schema");
        let sqlite_schema = introspect_sqlite_schema(&mut sqlite_conn)?;

        tracing::info!("Introspecting MySQL schema");
        let mysql_schema = introspect_mysql_schema(&mut mysql_conn, VERIFY_DB.db_name)?;

        tracing::info!("Comparing schemas");
        compare_schemas(&sqlite_schema, &mysql_schema)?;

        tracing::info!("✓ Schema parity verification passed");
        Ok(())
    })();

    // Always cleanup
    tracing::info!("Cleaning up MariaDB container");
    remove_container(VERIFY_DB.container_name);

    verification_result
}

/// One backend's schema, normalized into a shared vocabulary so the two
/// backends can be compared structurally.
#[derive(Debug, Default)]
struct Schema {
    tables: BTreeMap<String, Table>,
}

/// A single table: columns plus every constraint and index we compare.
///
/// Unique constraints and indexes are stored as ordered column lists.
/// Index names are deliberately not recorded since the backends name
/// them differently.
#[derive(Debug, Default)]
struct Table {
    columns: BTreeMap<String, Column>,
    primary_keys: BTreeSet<String>,
    foreign_keys: BTreeSet<ForeignKey>,
    unique_constraints: BTreeSet<Vec<String>>,
    indexes: BTreeSet<Vec<String>>,
}

#[derive(Debug)]
struct Column {
    data_type: String,
    nullable: bool,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct ForeignKey {
    column: String,
    references_table: String,
    references_column: String,
}

/// Shared row shape for results with a single `name` column
/// (`sqlite_master` and `PRAGMA index_info`).
#[derive(QueryableByName)]
struct NameRow {
    #[diesel(sql_type = Text)]
    name: String,
}

#[derive(QueryableByName)]
struct SqliteColumnRow {
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = Text)]
    r#type: String,
    #[diesel(sql_type = Integer)]
    notnull: i32,
    #[diesel(sql_type = Integer)]
    pk: i32,
}

#[derive(QueryableByName)]
struct SqliteForeignKeyRow {
    #[diesel(sql_type = Text)]
    table: String,
    #[diesel(sql_type = Text)]
    from: String,
    #[diesel(sql_type = Text)]
    to: String,
}

#[derive(QueryableByName)]
struct SqliteIndexRow {
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = Text)]
    origin: String,
}

fn introspect_sqlite_schema(conn: &mut SqliteConnection) -> Result<Schema> {
    let tables: Vec<NameRow> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name"
    )
    .load(conn)
    .wrap_err("Failed to list SQLite tables")?;

    let mut schema = Schema::default();
    for table in tables {
        let model = introspect_sqlite_table(conn, &table.name)?;
        schema.tables.insert(table.name, model);
    }

    Ok(schema)
}

fn introspect_sqlite_table(conn: &mut SqliteConnection, table: &str) -> Result<Table> {
    let mut model = Table::default();

    let columns: Vec<SqliteColumnRow> = diesel::sql_query(format!("PRAGMA table_info({table})"))
        .load(conn)
        .wrap_err_with(|| format!("Failed to read columns of table {table}"))?;

    for col in columns {
        if col.pk > 0 {
            model.primary_keys.insert(col.name.clone());
        }
        model.columns.insert(
            col.name,
            Column {
                data_type: normalize_sqlite_type(&col.r#type),
                nullable: col.notnull == 0,
            },
        );
    }

    let foreign_keys: Vec<SqliteForeignKeyRow> =
        diesel::sql_query(format!("PRAGMA foreign_key_list({table})"))
            .load(conn)
            .wrap_err_with(|| format!("Failed to read foreign keys of table {table}"))?;

    for fk in foreign_keys {
        model.foreign_keys.insert(ForeignKey {
            column: fk.from,
            references_table: fk.table,
            references_column: fk.to,
        });
    }

    let indexes: Vec<SqliteIndexRow> = diesel::sql_query(format!("PRAGMA index_list({table})"))
        .load(conn)
        .wrap_err_with(|| format!("Failed to read indexes of table {table}"))?;

    for idx in indexes {
        let columns = sqlite_index_columns(conn, &idx.name)?;

        // origin 'u' marks UNIQUE constraints, whose backing indexes carry
        // auto-generated sqlite_autoindex_* names. Other auto-generated
        // indexes are not compared.
        if idx.origin == "u" {
            model.unique_constraints.insert(columns);
        } else if !idx.name.starts_with("sqlite_autoindex_") {
            model.indexes.insert(columns);
        }
    }

    Ok(model)
}

/// Column names of one `SQLite` index, in index order.
fn sqlite_index_columns(conn: &mut SqliteConnection, index: &str) -> Result<Vec<String>> {
    let rows: Vec<NameRow> = diesel::sql_query(format!("PRAGMA index_info({index})"))
        .load(conn)
        .wrap_err_with(|| format!("Failed to read columns of index {index}"))?;

    Ok(rows.into_iter().map(|row| row.name).collect())
}

#[derive(QueryableByName)]
struct MysqlTableRow {
    #[diesel(sql_type = Text)]
    table_name: String,
}

#[derive(QueryableByName)]
struct MysqlColumnRow {
    #[diesel(sql_type = Text)]
    column_name: String,
    #[diesel(sql_type = Text)]
    data_type: String,
    #[diesel(sql_type = Text)]
    is_nullable: String,
    #[diesel(sql_type = Text)]
    column_key: String,
}

#[derive(QueryableByName)]
struct MysqlForeignKeyRow {
    #[diesel(sql_type = Text)]
    column_name: String,
    #[diesel(sql_type = Text)]
    references_table: String,
    #[diesel(sql_type = Text)]
    references_column: String,
}

/// Row shape for queries returning (group, column) pairs, used to collect
/// multi-column unique constraints and indexes.
#[derive(QueryableByName)]
struct GroupedColumnRow {
    #[diesel(sql_type = Text)]
    group_name: String,
    #[diesel(sql_type = Text)]
    column_name: String,
}

fn introspect_mysql_schema(conn: &mut MysqlConnection, db_name: &str) -> Result<Schema> {
    let tables: Vec<MysqlTableRow> = diesel::sql_query(
        "SELECT table_name FROM information_schema.tables WHERE table_schema = ? AND table_name != '__diesel_schema_migrations' ORDER BY table_name"
    )
    .bind::<Text, _>(db_name)
    .load(conn)
    .wrap_err("Failed to list MySQL tables")?;

    let mut schema = Schema::default();
    for table in tables {
        let model = introspect_mysql_table(conn, db_name, &table.table_name)?;
        schema.tables.insert(table.table_name, model);
    }

    Ok(schema)
}

fn introspect_mysql_table(
    conn: &mut MysqlConnection,
    db_name: &str,
    table: &str,
) -> Result<Table> {
    let mut model = Table::default();

    let columns: Vec<MysqlColumnRow> = diesel::sql_query(
        "SELECT column_name, data_type, is_nullable, column_key \
         FROM information_schema.columns \
         WHERE table_schema = ? AND table_name = ? ORDER BY ordinal_position",
    )
    .bind::<Text, _>(db_name)
    .bind::<Text, _>(table)
    .load(conn)
    .wrap_err_with(|| format!("Failed to read columns of table {table}"))?;

    for col in columns {
        if col.column_key == "PRI" {
            model.primary_keys.insert(col.column_name.clone());
        }
        model.columns.insert(
            col.column_name,
            Column {
                data_type: normalize_mysql_type(&col.data_type),
                nullable: col.is_nullable == "YES",
            },
        );
    }

    let foreign_keys: Vec<MysqlForeignKeyRow> = diesel::sql_query(
        "SELECT column_name, referenced_table_name AS references_table, \
                referenced_column_name AS references_column \
         FROM information_schema.key_column_usage \
         WHERE table_schema = ? AND table_name = ? AND referenced_table_name IS NOT NULL \
         ORDER BY column_name",
    )
    .bind::<Text, _>(db_name)
    .bind::<Text, _>(table)
    .load(conn)
    .wrap_err_with(|| format!("Failed to read foreign keys of table {table}"))?;

    for fk in foreign_keys {
        model.foreign_keys.insert(ForeignKey {
            column: fk.column_name,
            references_table: fk.references_table,
            references_column: fk.references_column,
        });
    }

    let unique_rows: Vec<GroupedColumnRow> = diesel::sql_query(
        "SELECT tc.constraint_name AS group_name, kcu.column_name \
         FROM information_schema.table_constraints tc \
         JOIN information_schema.key_column_usage kcu \
           ON tc.constraint_name = kcu.constraint_name \
           AND tc.table_schema = kcu.table_schema \
           AND tc.table_name = kcu.table_name \
         WHERE tc.constraint_type = 'UNIQUE' \
           AND tc.table_schema = ? \
           AND tc.table_name = ? \
         ORDER BY tc.constraint_name, kcu.ordinal_position",
    )
    .bind::<Text, _>(db_name)
    .bind::<Text, _>(table)
    .load(conn)
    .wrap_err_with(|| format!("Failed to read unique constraints of table {table}"))?;

    model.unique_constraints = group_column_lists(unique_rows);

    // non_unique = 1 keeps plain indexes only; the PRIMARY index and the
    // backing indexes of UNIQUE constraints are tracked separately above.
    let index_rows: Vec<GroupedColumnRow> = diesel::sql_query(
        "SELECT index_name AS group_name, column_name \
         FROM information_schema.statistics \
         WHERE table_schema = ? AND table_name = ? AND non_unique = 1 \
         ORDER BY index_name, seq_in_index",
    )
    .bind::<Text, _>(db_name)
    .bind::<Text, _>(table)
    .load(conn)
    .wrap_err_with(|| format!("Failed to read indexes of table {table}"))?;

    model.indexes = group_column_lists(index_rows);

    Ok(model)
}

/// Collects (group, column) rows into per-group column lists, preserving
/// row order within each group.
fn group_column_lists(rows: Vec<GroupedColumnRow>) -> BTreeSet<Vec<String>> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for row in rows {
        groups
            .entry(row.group_name)
            .or_default()
            .push(row.column_name);
    }

    groups.into_values().collect()
}

/// Collapses a `SQLite` declared type to the shared comparison vocabulary,
/// following `SQLite` affinity rules.
fn normalize_sqlite_type(declared: &str) -> String {
    let upper = declared.to_uppercase();

    let class = if upper.contains("INT") {
        "integer"
    } else if ["CHAR", "CLOB", "TEXT"]
        .iter()
        .any(|marker| upper.contains(marker))
    {
        "text"
    } else if ["REAL", "FLOA", "DOUB"]
        .iter()
        .any(|marker| upper.contains(marker))
    {
        "real"
    } else if upper.contains("BLOB") {
        "blob"
    } else {
        // Everything else is compared as text
        "text"
    };

    class.to_string()
}

/// Collapses a `MySQL` data type to the shared comparison vocabulary.
fn normalize_mysql_type(data_type: &str) -> String {
    let class = match data_type.to_uppercase().as_str() {
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => "integer",
        "DECIMAL" | "NUMERIC" | "FLOAT" | "DOUBLE" | "REAL" => "real",
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => "blob",
        // CHAR/VARCHAR/TEXT variants and anything unrecognized compare as text
        _ => "text",
    };

    class.to_string()
}

/// Compares the two schemas and reports the first structural mismatch.
fn compare_schemas(sqlite_schema: &Schema, mysql_schema: &Schema) -> Result<()> {
    let sqlite_tables: BTreeSet<_> = sqlite_schema.tables.keys().collect();
    let mysql_tables: BTreeSet<_> = mysql_schema.tables.keys().collect();

    if sqlite_tables != mysql_tables {
        let errors: Vec<String> = sqlite_tables
            .difference(&mysql_tables)
            .map(|table| format!("  - Table '{table}' exists in SQLite but not in MySQL"))
            .chain(
                mysql_tables
                    .difference(&sqlite_tables)
                    .map(|table| format!("  - Table '{table}' exists in MySQL but not in SQLite")),
            )
            .collect();

        return Err(color_eyre::eyre::eyre!(
            "❌ Schema parity check FAILED: Table mismatch\n{}",
            errors.join("\n")
        ));
    }

    for (table_name, sqlite_table) in &sqlite_schema.tables {
        let mysql_table = &mysql_schema.tables[table_name];
        compare_columns(table_name, sqlite_table, mysql_table)?;
        compare_constraints(table_name, sqlite_table, mysql_table)?;
        compare_indexes(table_name, sqlite_table, mysql_table)?;
    }

    Ok(())
}

/// Compare column sets, types, and nullability for a single table.
fn compare_columns(table_name: &str, sqlite_table: &Table, mysql_table: &Table) -> Result<()> {
    let sqlite_columns: BTreeSet<_> = sqlite_table.columns.keys().collect();
    let mysql_columns: BTreeSet<_> = mysql_table.columns.keys().collect();

    if sqlite_columns != mysql_columns {
        let errors: Vec<String> = sqlite_columns
            .difference(&mysql_columns)
            .map(|col| format!("    - Column '{col}' exists in SQLite but not in MySQL"))
            .chain(
                mysql_columns
                    .difference(&sqlite_columns)
                    .map(|col| format!("    - Column '{col}' exists in MySQL but not in SQLite")),
            )
            .collect();

        return Err(color_eyre::eyre::eyre!(
            "❌ Schema parity check FAILED: Column mismatch in table '{}'\n{}",
            table_name,
            errors.join("\n")
        ));
    }

    for col_name in sqlite_columns {
        let sqlite_col = &sqlite_table.columns[col_name];
        let mysql_col = &mysql_table.columns[col_name];

        if sqlite_col.data_type != mysql_col.data_type {
            return Err(color_eyre::eyre::eyre!(
                "❌ Schema parity check FAILED: Type mismatch in table '{}', column '{}'\n  SQLite: {}\n  MySQL: {}",
                table_name,
                col_name,
                sqlite_col.data_type,
                mysql_col.data_type
            ));
        }

        if sqlite_col.nullable != mysql_col.nullable {
            return Err(color_eyre::eyre::eyre!(
                "❌ Schema parity check FAILED: Nullability mismatch in table '{}', column '{}'\n  SQLite nullable: {}\n  MySQL nullable: {}",
                table_name,
                col_name,
                sqlite_col.nullable,
                mysql_col.nullable
            ));
        }
    }

    Ok(())
}

/// Compare primary keys, foreign keys, and unique constraints for a single table.
fn compare_constraints(table_name: &str, sqlite_table: &Table, mysql_table: &Table) -> Result<()> {
    if sqlite_table.primary_keys != mysql_table.primary_keys {
        return Err(color_eyre::eyre::eyre!(
            "❌ Schema parity check FAILED: Primary key mismatch in table '{}'\n  SQLite: {:?}\n  MySQL: {:?}",
            table_name,
            sqlite_table.primary_keys,
            mysql_table.primary_keys
        ));
    }

    if sqlite_table.foreign_keys != mysql_table.foreign_keys {
        return Err(color_eyre::eyre::eyre!(
            "❌ Schema parity check FAILED: Foreign key mismatch in table '{}'\n  SQLite: {:?}\n  MySQL: {:?}",
            table_name,
            sqlite_table.foreign_keys,
            mysql_table.foreign_keys
        ));
    }

    if sqlite_table.unique_constraints != mysql_table.unique_constraints {
        return Err(color_eyre::eyre::eyre!(
            "❌ Schema parity check FAILED: Unique constraint mismatch in table '{}'\n  SQLite: {:?}\n  MySQL: {:?}",
            table_name,
            sqlite_table.unique_constraints,
            mysql_table.unique_constraints
        ));
    }

    Ok(())
}

/// Compare indexes for a single table.
///
/// Indexes are matched by their column lists, never by name. InnoDB
/// auto-creates an index for each foreign key column, so MySQL may carry
/// extra single-column indexes on FK columns that `SQLite` does not have;
/// anything beyond that is a mismatch.
fn compare_indexes(table_name: &str, sqlite_table: &Table, mysql_table: &Table) -> Result<()> {
    if let Some(missing) = sqlite_table
        .indexes
        .difference(&mysql_table.indexes)
        .next()
    {
        return Err(color_eyre::eyre::eyre!(
            "❌ Schema parity check FAILED: Index missing in MySQL for table '{}'\n  Missing index columns: {:?}",
            table_name,
            missing
        ));
    }

    let fk_columns: BTreeSet<&str> = mysql_table
        .foreign_keys
        .iter()
        .map(|fk| fk.column.as_str())
        .collect();

    for extra in mysql_table.indexes.difference(&sqlite_table.indexes) {
        let fk_backed = extra.len() == 1 && fk_columns.contains(extra[0].as_str());
        if !fk_backed {
            return Err(color_eyre::eyre::eyre!(
                "❌ Schema parity check FAILED: Unexpected index in MySQL for table '{}'\n  Extra index columns: {:?}\n  (Only single-column FK indexes are allowed as MySQL-specific)",
                table_name,
                extra
            ));
        }
    }

    Ok(())
}

/// Extends `duct::Expression` with a logged variant of `run`.
trait ExpressionExt {
    /// Log the invocation, run it, and log again on failure.
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // Repeated so the failing invocation sits next to the error output
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
