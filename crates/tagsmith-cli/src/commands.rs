use std::ffi::OsString;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use colored::Colorize;
use serde_json::json;
use tagsmith_fsck::{FsckConfig, FsckError, SeverityPolicy};
use tagsmith_gate::{AdmitError, TagAdmission};
use tagsmith_store::{LooseObjectStore, ObjectStore, StoredObject};
use tagsmith_types::{ObjectId, ObjectType};
use tracing::debug;

use crate::cli::*;

/// Environment variable naming the store directory.
pub const STORE_ENV: &str = "TAGSMITH_DIR";
pub const DEFAULT_STORE_DIR: &str = ".tagsmith";
pub const CONFIG_FILE: &str = "config.toml";

/// Options shared by every command.
pub struct Globals {
    pub store: PathBuf,
    pub config: Option<PathBuf>,
    pub overrides: Vec<String>,
    pub format: OutputFormat,
}

impl Globals {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            store: store_root(cli.store.clone(), std::env::var_os(STORE_ENV)),
            config: cli.config.clone(),
            overrides: cli.overrides.clone(),
            format: cli.format,
        }
    }

    fn open_store(&self) -> anyhow::Result<LooseObjectStore> {
        LooseObjectStore::open(&self.store)
            .with_context(|| format!("could not open store at {}", self.store.display()))
    }

    /// Built-in defaults, then the config file, then `-c` overrides.
    pub fn policy(&self) -> anyhow::Result<SeverityPolicy> {
        let mut config = FsckConfig::default();
        let path = self
            .config
            .clone()
            .unwrap_or_else(|| self.store.join(CONFIG_FILE));
        if self.config.is_some() || path.is_file() {
            debug!(path = %path.display(), "loading config");
            config.merge(&FsckConfig::load(&path)?);
        }
        for assignment in &self.overrides {
            config
                .set_assignment(assignment)
                .with_context(|| format!("bad -c option {assignment:?}"))?;
        }
        Ok(SeverityPolicy::from_config(&config)?)
    }
}

fn store_root(explicit: Option<PathBuf>, env: Option<OsString>) -> PathBuf {
    explicit
        .or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_DIR))
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let globals = Globals::from_cli(&cli);
    let mut out = io::stdout().lock();
    match cli.command {
        Command::CreateTag(args) => cmd_create_tag(
            &globals,
            &args,
            io::stdin().lock(),
            &mut out,
            &mut io::stderr().lock(),
        ),
        Command::HashObject(args) => match &args.file {
            Some(path) => {
                let file = fs::File::open(path)
                    .with_context(|| format!("could not open {}", path.display()))?;
                cmd_hash_object(&globals, &args, file, &mut out)
            }
            None => cmd_hash_object(&globals, &args, io::stdin().lock(), &mut out),
        },
        Command::CatObject(args) => cmd_cat_object(&globals, &args, &mut out),
        Command::Replace(args) => cmd_replace(&globals, &args, &mut out),
    }
}

fn cmd_create_tag(
    globals: &Globals,
    args: &CreateTagArgs,
    mut input: impl Read,
    out: &mut impl Write,
    err: &mut impl Write,
) -> anyhow::Result<()> {
    let policy = globals.policy()?;
    let store = globals.open_store()?;
    let gate = TagAdmission::new(&store, policy, args.is_strict());

    let mut buf = Vec::new();
    input.read_to_end(&mut buf).map_err(AdmitError::Input)?;
    let validation = gate.validator().validate(&buf);
    for diagnostic in validation.warnings() {
        let label = "warning:".yellow().bold();
        writeln!(err, "{label} tag input does not pass fsck: {diagnostic}")?;
    }

    let admitted = match gate.admit_validated(validation, &buf) {
        Ok(admitted) => admitted,
        Err(AdmitError::Structural(FsckError::Rejected { diagnostics })) => {
            for diagnostic in &diagnostics {
                let label = "error:".red().bold();
                writeln!(err, "{label} tag input does not pass fsck: {diagnostic}")?;
            }
            bail!("tag on stdin did not pass our strict fsck check");
        }
        Err(e) => return Err(e.into()),
    };

    match globals.format {
        OutputFormat::Text => writeln!(out, "{}", admitted.id)?,
        OutputFormat::Json => writeln!(
            out,
            "{}",
            json!({
                "id": admitted.id,
                "target": admitted.record.target(),
                "name": admitted.record.name(),
                "warnings": admitted.warnings,
            })
        )?,
    }
    Ok(())
}

fn cmd_hash_object(
    globals: &Globals,
    args: &HashObjectArgs,
    mut input: impl Read,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    if args.write && args.kind == ObjectType::Tag {
        bail!("refusing to write a tag object without validation; use create-tag");
    }
    let mut data = Vec::new();
    input.read_to_end(&mut data).context("could not read input")?;
    let object = StoredObject::new(args.kind, data);

    let id = if args.write {
        globals.open_store()?.write(&object)?
    } else {
        object.compute_id()
    };
    match globals.format {
        OutputFormat::Text => writeln!(out, "{id}")?,
        OutputFormat::Json => writeln!(
            out,
            "{}",
            json!({ "id": id, "type": object.kind, "size": object.size, "written": args.write })
        )?,
    }
    Ok(())
}

fn cmd_cat_object(
    globals: &Globals,
    args: &CatObjectArgs,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let store = globals.open_store()?;
    let object = store
        .read(&args.id)?
        .ok_or_else(|| anyhow!("object {} not found", args.id))?;

    match globals.format {
        OutputFormat::Text if args.show_type => writeln!(out, "{}", object.kind)?,
        OutputFormat::Text if args.size => writeln!(out, "{}", object.size)?,
        OutputFormat::Text => out.write_all(&object.data)?,
        OutputFormat::Json => writeln!(
            out,
            "{}",
            json!({
                "id": args.id,
                "type": object.kind,
                "size": object.size,
                "data": String::from_utf8_lossy(&object.data),
            })
        )?,
    }
    Ok(())
}

fn cmd_replace(globals: &Globals, args: &ReplaceArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let store = globals.open_store()?;
    let original = args.original;

    let Some(replacement) = args.replacement else {
        if !store.remove_replacement(&original)? {
            bail!("replace ref '{original}' not found");
        }
        match globals.format {
            OutputFormat::Text => writeln!(out, "Deleted replace ref '{original}'")?,
            OutputFormat::Json => writeln!(out, "{}", json!({ "deleted": original }))?,
        }
        return Ok(());
    };

    if original == replacement {
        bail!("new object is the same as the old one: '{original}'");
    }
    if !args.force {
        check_same_type(&store, &original, &replacement)?;
    }

    let mut candidate = store.load_replacements()?;
    candidate.insert(original, replacement);
    candidate
        .resolve(&original)
        .context("replacement would create a cycle")?;
    store.add_replacement(&original, &replacement)?;

    match globals.format {
        OutputFormat::Text => writeln!(out, "{original} -> {replacement}")?,
        OutputFormat::Json => writeln!(
            out,
            "{}",
            json!({ "original": original, "replacement": replacement })
        )?,
    }
    Ok(())
}

fn check_same_type(
    store: &LooseObjectStore,
    original: &ObjectId,
    replacement: &ObjectId,
) -> anyhow::Result<()> {
    let kind_of = |id: &ObjectId| -> anyhow::Result<ObjectType> {
        let object = store
            .read(id)?
            .ok_or_else(|| anyhow!("failed to resolve '{id}' as a valid object"))?;
        Ok(object.kind)
    };
    let (old, new) = (kind_of(original)?, kind_of(replacement)?);
    if old != new {
        bail!(
            "Objects must be of the same type.\n\
             '{original}' points to a replaced object of type '{old}'\n\
             while '{replacement}' points to a replacement object of type '{new}'."
        );
    }
    Ok(())
}
