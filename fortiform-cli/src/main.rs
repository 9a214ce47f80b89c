use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use log::debug;
use serde_json::Value as Json;
use similar::{ChangeTag, TextDiff};

use fortiform_core::differ::{self, Diff};
use fortiform_core::redact::{redact_local, redact_native};
use fortiform_core::value::{local_from_json, local_to_json, native_from_json, native_to_json};
use fortiform_core::{FieldSpec, LocalTree, PatchTable, ResourceData, Translator};
use fortiform_provider::schemas::{self, ResourceConfig};

#[derive(Parser)]
#[command(name = "fortiform")]
#[command(about = "Translate FortiManager objects to and from local attribute trees", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List resource types and their API paths
    Resources,
    /// Show the field tree of a resource type
    Schema {
        resource_type: String,
    },
    /// Validate every resource table and an optional coercion table
    Validate {
        /// Coercion table (JSON)
        #[arg(long)]
        patch_table: Option<PathBuf>,
    },
    /// Flatten an API object (JSON) into a local attribute tree
    Flatten {
        resource_type: String,
        /// API object as returned by FortiManager
        file: PathBuf,

        /// Discover every object list, declared or not
        #[arg(long)]
        import: bool,

        /// Prior local state (JSON)
        #[arg(long)]
        prior: Option<PathBuf>,

        /// Coercion table (JSON)
        #[arg(long)]
        patch_table: Option<PathBuf>,

        /// Mask sensitive values
        #[arg(long)]
        redact: bool,
    },
    /// Expand a local attribute tree (JSON) into an API request body
    Expand {
        resource_type: String,
        /// Local attribute tree
        file: PathBuf,

        /// Prior local state (JSON); only set or changed values are sent
        #[arg(long)]
        prior: Option<PathBuf>,

        /// Mask sensitive values
        #[arg(long)]
        redact: bool,
    },
    /// Compare a prior state with desired values
    Plan {
        resource_type: String,

        /// Prior local state (JSON); omitted means the object does not exist
        #[arg(long)]
        prior: Option<PathBuf>,

        /// Desired local values (JSON); omitted means the object is removed
        #[arg(long)]
        desired: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let result = match cli.command {
        Commands::Resources => {
            print!("{}", format_resources());
            Ok(())
        }
        Commands::Schema { resource_type } => run_schema(&resource_type),
        Commands::Validate { patch_table } => run_validate(patch_table.as_deref()),
        Commands::Flatten {
            resource_type,
            file,
            import,
            prior,
            patch_table,
            redact,
        } => run_flatten(
            &resource_type,
            &file,
            import,
            prior.as_deref(),
            patch_table.as_deref(),
            redact,
        )
        .and_then(print_json),
        Commands::Expand {
            resource_type,
            file,
            prior,
            redact,
        } => run_expand(&resource_type, &file, prior.as_deref(), redact).and_then(print_json),
        Commands::Plan {
            resource_type,
            prior,
            desired,
        } => run_plan(&resource_type, prior.as_deref(), desired.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn print_json(value: Json) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn find_resource(resource_type: &str) -> Result<&'static ResourceConfig> {
    match schemas::find(resource_type) {
        Some(resource) => Ok(resource),
        None => bail!(
            "Unknown resource type '{}'. Known types: {}",
            resource_type,
            schemas::resource_types().join(", ")
        ),
    }
}

fn read_json(path: &Path) -> Result<Json> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn read_local(resource: &ResourceConfig, path: &Path) -> Result<LocalTree> {
    let json = read_json(path)?;
    local_from_json(&resource.spec.fields, &json)
        .with_context(|| format!("Invalid local tree in {}", path.display()))
}

/// Resource table rules, overridden by an optional coercion table file
fn load_patch_table(path: Option<&Path>) -> Result<PatchTable> {
    let mut table = match path {
        Some(path) => PatchTable::from_file(path)?,
        None => PatchTable::builtin(),
    };
    table.merge(&schemas::builtin_patch_table());
    debug!("Loaded {} coercion rules", table.rules().len());
    Ok(table)
}

// =============================================================================
// Commands
// =============================================================================

fn format_resources() -> String {
    let mut out = String::new();
    for resource in schemas::registry() {
        out.push_str(&format!(
            "{:<32} {}\n",
            resource.resource_type, resource.api_path
        ));
    }
    out
}

fn run_schema(resource_type: &str) -> Result<()> {
    let resource = find_resource(resource_type)?;
    println!(
        "{} {}",
        resource.resource_type.cyan().bold(),
        resource.api_path
    );
    if let Some(description) = &resource.spec.description {
        println!("  {}", description.dimmed());
    }
    println!("  id: {}", resource.spec.id_field);
    print!("{}", format_fields(&resource.spec.fields, 1));
    Ok(())
}

fn format_fields(fields: &[FieldSpec], depth: usize) -> String {
    let mut out = String::new();
    let indent = "  ".repeat(depth);
    for field in fields {
        out.push_str(&format!("{}{} ({})", indent, field.local_name, field.kind));
        if field.api_name != field.local_name {
            out.push_str(&format!(" <- {}", field.api_name));
        }
        if field.sensitive {
            out.push_str(" [sensitive]");
        }
        out.push('\n');
        out.push_str(&format_fields(&field.children, depth + 1));
    }
    out
}

fn run_validate(patch_table: Option<&Path>) -> Result<()> {
    println!("{}", "Validating...".cyan());

    let mut failures = 0;
    for resource in schemas::registry() {
        match resource.spec.validate() {
            Ok(()) => println!("  • {}", resource.resource_type),
            Err(errors) => {
                failures += 1;
                println!("  {} {}", "✗".red(), resource.resource_type);
                for error in errors {
                    println!("      {}", error);
                }
            }
        }
    }

    if let Some(path) = patch_table {
        let table = PatchTable::from_file(path)?;
        for rule in table.rules() {
            if rule.resource != fortiform_core::patch::ANY_RESOURCE
                && schemas::find(&rule.resource).is_none()
            {
                bail!("Coercion rule for unknown resource type '{}'", rule.resource);
            }
        }
        println!("  • {} ({} rules)", path.display(), table.rules().len());
    }

    if failures > 0 {
        bail!("{} resource tables have schema errors", failures);
    }

    println!(
        "{}",
        format!(
            "✓ {} resource tables validated successfully.",
            schemas::registry().len()
        )
        .green()
        .bold()
    );
    Ok(())
}

fn run_flatten(
    resource_type: &str,
    file: &Path,
    import: bool,
    prior: Option<&Path>,
    patch_table: Option<&Path>,
    redact: bool,
) -> Result<Json> {
    let resource = find_resource(resource_type)?;
    let patch = load_patch_table(patch_table)?;
    let native = native_from_json(&read_json(file)?)
        .with_context(|| format!("Invalid API object in {}", file.display()))?;

    let mut data = match prior {
        Some(path) => {
            let state = read_local(resource, path)?;
            ResourceData::new(&resource.spec)
                .with_prior(state.clone())
                .with_config(state)
        }
        None => ResourceData::new(&resource.spec),
    };

    Translator::new(&resource.spec, &patch)
        .with_import_mode(import)
        .flatten(Some(&native), &mut data)?;

    let tree = data.into_tree();
    Ok(if redact {
        redact_local(&resource.spec.fields, &tree)
    } else {
        local_to_json(&tree)
    })
}

fn run_expand(resource_type: &str, file: &Path, prior: Option<&Path>, redact: bool) -> Result<Json> {
    let resource = find_resource(resource_type)?;
    let patch = PatchTable::new();
    let config = read_local(resource, file)?;

    let mut data = ResourceData::new(&resource.spec).with_config(config);
    if let Some(path) = prior {
        data = data.with_prior(read_local(resource, path)?);
    }

    let object = Translator::new(&resource.spec, &patch).expand(&data)?;
    Ok(if redact {
        redact_native(&resource.spec.fields, &object)
    } else {
        native_to_json(&object)
    })
}

fn run_plan(resource_type: &str, prior: Option<&Path>, desired: Option<&Path>) -> Result<()> {
    let resource = find_resource(resource_type)?;
    let prior = prior.map(|p| read_local(resource, p)).transpose()?;
    let desired = desired.map(|p| read_local(resource, p)).transpose()?;

    let diff = differ::diff(&resource.spec, prior.as_ref(), desired.as_ref());
    println!("{}", format_diff(resource_type, &diff));

    if diff.is_change() {
        let before = request_body(resource, prior.as_ref())?;
        let after = request_body(resource, desired.as_ref())?;
        print_diff(&before, &after);
    }
    Ok(())
}

fn format_diff(resource_type: &str, diff: &Diff) -> String {
    match diff {
        Diff::Create => format!("{} {}", "+".green().bold(), resource_type),
        Diff::Delete => format!("{} {}", "-".red().bold(), resource_type),
        Diff::NoChange => format!("{}", "No changes.".green()),
        Diff::Update { changed_paths } => {
            let mut out = format!("{} {}", "~".yellow().bold(), resource_type);
            for path in changed_paths {
                out.push_str(&format!("\n    {}", path.yellow()));
            }
            out
        }
    }
}

/// Pretty, redacted request body for a local tree; empty when absent
fn request_body(resource: &ResourceConfig, tree: Option<&LocalTree>) -> Result<String> {
    let Some(tree) = tree else {
        return Ok(String::new());
    };
    let patch = PatchTable::new();
    let object = Translator::new(&resource.spec, &patch).expand_tree(tree)?;
    let mut body = serde_json::to_string_pretty(&redact_native(&resource.spec.fields, &object))?;
    body.push('\n');
    Ok(body)
}

fn print_diff(original: &str, updated: &str) {
    let diff = TextDiff::from_lines(original, updated);
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => "-".red(),
            ChangeTag::Insert => "+".green(),
            ChangeTag::Equal => " ".normal(),
        };
        print!("{}{}", sign, change);
    }
}
