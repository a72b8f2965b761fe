use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use serde_json::{Value, json};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

use schemaform::{
    FormDefinition, SchemaForm, UiOptions, ValidationSchema,
    domain::{FieldType, definition_schema},
    form::{OrderKind, OrderedPair, UniqueValue, completion_percentage, path, value_to_string},
    io::{DocumentFormat, OutputDestination, OutputOptions, emit, load_definition, load_values},
};

const LOG_ENV: &str = "SCHEMAFORM_LOG";

#[derive(Debug, Parser)]
#[command(
    name = "schemaform",
    version,
    about = "Check form definitions, validate values and fill forms in the terminal"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load a form definition and report its sections and fields
    Check {
        /// Form definition (.json, .yaml or .toml)
        form: PathBuf,
    },
    /// Validate a value document against a form definition
    Validate {
        form: PathBuf,
        /// Values to validate
        #[arg(long = "values", value_name = "FILE")]
        values: PathBuf,
        #[command(flatten)]
        rules: RuleArgs,
    },
    /// Print the JSON Schema that form definitions must satisfy
    MetaSchema,
    /// Fill the form in the terminal and write the submitted values
    Edit {
        form: PathBuf,
        /// Existing entity to edit; omitted means a new entity
        #[arg(long = "values", value_name = "FILE")]
        values: Option<PathBuf>,
        /// Identifier passed along with submitted edits
        #[arg(long = "entity-id", value_name = "ID")]
        entity_id: Option<String>,
        /// Title shown at the top of the form
        #[arg(long = "title", value_name = "TEXT")]
        title: Option<String>,
        /// Output destinations ("-" writes to stdout)
        #[arg(short = 'o', long = "output", value_name = "DEST", num_args = 1.., action = ArgAction::Append)]
        outputs: Vec<String>,
        /// Emit compact JSON/TOML rather than pretty formatting
        #[arg(long = "no-pretty")]
        no_pretty: bool,
        /// Close a form with unsaved changes without asking twice
        #[arg(long = "no-confirm-exit")]
        no_confirm_exit: bool,
        #[command(flatten)]
        rules: RuleArgs,
    },
}

/// Entity-specific validators that can be attached from the command line.
#[derive(Debug, clap::Args)]
struct RuleArgs {
    /// Value already taken by another entity (repeatable)
    #[arg(long = "existing", value_name = "FIELD=VALUE", action = ArgAction::Append)]
    existing: Vec<String>,
    /// Require UPPER >= LOWER (repeatable)
    #[arg(long = "ordered", value_name = "LOWER:UPPER", action = ArgAction::Append)]
    ordered: Vec<String>,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Check { form } => check(&form),
        Command::Validate {
            form,
            values,
            rules,
        } => validate(&form, &values, &rules),
        Command::MetaSchema => {
            println!("{}", serde_json::to_string_pretty(&definition_schema())?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Edit {
            form,
            values,
            entity_id,
            title,
            outputs,
            no_pretty,
            no_confirm_exit,
            rules,
        } => edit(EditArgs {
            form,
            values,
            entity_id,
            title,
            outputs,
            pretty: !no_pretty,
            confirm_exit: !no_confirm_exit,
            rules,
        }),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn load_form(path: &Path) -> Result<FormDefinition> {
    load_definition(path).map_err(|err| eyre!("{err:#}"))
}

fn check(path: &Path) -> Result<ExitCode> {
    let definition = load_form(path)?;
    let title = definition.title.as_deref().unwrap_or("(untitled form)");
    println!(
        "{title}: {} section(s), {} field(s)",
        definition.sections.len(),
        definition.field_count()
    );
    for section in &definition.sections {
        let required = section.fields.iter().filter(|field| field.required).count();
        println!(
            "  {} ({} field(s), {required} required)",
            section.title,
            section.fields.len()
        );
        for field in section.fields.iter().filter(|field| !field.kind.is_known()) {
            println!(
                "    warning: `{}` has unsupported type `{}`",
                field.name, field.kind
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn validate(form: &Path, values: &Path, rules: &RuleArgs) -> Result<ExitCode> {
    let definition = load_form(form)?;
    let values = load_values(values).map_err(|err| eyre!("{err:#}"))?;
    let schema = build_validation(&definition, rules, None)?;
    let errors = schema.validate(&values, &definition.sections);
    let report = json!({
        "valid": errors.is_empty(),
        "completion": completion_percentage(&values, &definition.sections),
        "errors": errors,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(if errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

struct EditArgs {
    form: PathBuf,
    values: Option<PathBuf>,
    entity_id: Option<String>,
    title: Option<String>,
    outputs: Vec<String>,
    pretty: bool,
    confirm_exit: bool,
    rules: RuleArgs,
}

fn edit(args: EditArgs) -> Result<ExitCode> {
    let definition = load_form(&args.form)?;
    let entity = args
        .values
        .as_deref()
        .map(load_values)
        .transpose()
        .map_err(|err| eyre!("{err:#}"))?
        .map(Value::Object);
    let output = output_options(&args.outputs, args.pretty)?;
    let schema = build_validation(&definition, &args.rules, entity.as_ref())?;

    let mut form = SchemaForm::new(definition)
        .with_validation(schema)
        .with_options(UiOptions::default().with_confirm_exit(args.confirm_exit));
    if let Some(title) = args.title {
        form = form.with_title(title);
    }
    if entity.is_some() || args.entity_id.is_some() {
        let entity_id = args
            .entity_id
            .or_else(|| {
                args.values
                    .as_deref()
                    .and_then(Path::file_stem)
                    .map(|stem| stem.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| "entity".to_string());
        form = form.with_entity(entity_id, entity.unwrap_or_else(|| json!({})));
    }

    // A failed file write fails the submit. Stdout waits for the terminal
    // to be restored.
    let (stdout, files) = split_stdout(output);
    let submitted = form
        .run(|values, _entity_id| {
            let written = emit(&values, &files).map_err(|err| format!("{err:#}"));
            async move { written }
        })
        .map_err(|err| eyre!("{err:#}"))?;

    match submitted {
        Some(values) => {
            if let Some(stdout) = stdout {
                emit(&values, &stdout).map_err(|err| eyre!("{err:#}"))?;
            }
            tracing::info!(fields = values.len(), "form saved");
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("form closed without saving");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn output_options(outputs: &[String], pretty: bool) -> Result<OutputOptions> {
    let mut destinations = Vec::new();
    for raw in outputs {
        if raw.trim().is_empty() {
            return Err(eyre!("output destination cannot be empty"));
        }
        destinations.push(OutputDestination::parse(raw));
    }
    if destinations.is_empty() {
        destinations.push(OutputDestination::Stdout);
    }

    let mut format = None;
    for destination in &destinations {
        let OutputDestination::File(path) = destination else {
            continue;
        };
        let detected = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(DocumentFormat::from_name)
            .ok_or_else(|| {
                eyre!(
                    "cannot infer format from output file {}; use one of: {}",
                    path.display(),
                    format_list()
                )
            })?;
        match format {
            Some(existing) if existing != detected => {
                return Err(eyre!(
                    "output file {} uses {detected} but other destinations use {existing}; align extensions",
                    path.display()
                ));
            }
            _ => format = Some(detected),
        }
    }

    Ok(OutputOptions::new(format.unwrap_or(DocumentFormat::Json))
        .with_pretty(pretty)
        .with_destinations(destinations))
}

fn split_stdout(output: OutputOptions) -> (Option<OutputOptions>, OutputOptions) {
    let (stdout, files): (Vec<_>, Vec<_>) = output
        .destinations
        .iter()
        .cloned()
        .partition(|destination| *destination == OutputDestination::Stdout);
    let stdout = (!stdout.is_empty())
        .then(|| output.clone().with_destinations(vec![OutputDestination::Stdout]));
    (stdout, output.with_destinations(files))
}

fn format_list() -> String {
    DocumentFormat::available()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Turn `--existing` and `--ordered` flags into custom validators. In edit
/// mode the entity's own current value never counts as a duplicate.
fn build_validation(
    definition: &FormDefinition,
    rules: &RuleArgs,
    entity: Option<&Value>,
) -> Result<ValidationSchema> {
    let mut schema = ValidationSchema::new();

    let mut taken: Vec<(String, Vec<String>)> = Vec::new();
    for raw in &rules.existing {
        let (field, value) = raw
            .split_once('=')
            .ok_or_else(|| eyre!("--existing expects FIELD=VALUE, got `{raw}`"))?;
        require_field(definition, field)?;
        match taken.iter_mut().find(|(name, _)| name == field) {
            Some((_, values)) => values.push(value.to_string()),
            None => taken.push((field.to_string(), vec![value.to_string()])),
        }
    }
    for (field, values) in taken {
        let mut unique = UniqueValue::new(field.as_str(), values);
        let current = entity
            .and_then(Value::as_object)
            .and_then(|entity| path::lookup(entity, &field));
        if let Some(current) = current {
            unique = unique.editing(value_to_string(current));
        }
        schema.push(unique);
    }

    for raw in &rules.ordered {
        let (lower, upper) = raw
            .split_once(':')
            .ok_or_else(|| eyre!("--ordered expects LOWER:UPPER, got `{raw}`"))?;
        let kind = match &require_field(definition, lower)?.kind {
            FieldType::Date => OrderKind::Date,
            FieldType::Time => OrderKind::Time,
            FieldType::Number => OrderKind::Number,
            other => {
                return Err(eyre!(
                    "--ordered needs date, time or number fields; `{lower}` is `{other}`"
                ));
            }
        };
        require_field(definition, upper)?;
        schema.push(OrderedPair::new(lower, upper, kind));
    }
    Ok(schema)
}

fn require_field<'a>(
    definition: &'a FormDefinition,
    name: &str,
) -> Result<&'a schemaform::FieldSchema> {
    definition
        .field(name)
        .ok_or_else(|| eyre!("form has no field named `{name}`"))
        .wrap_err("invalid validator flag")
}
