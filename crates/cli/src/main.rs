//! openapi-gateway-integrations CLI
//!
//! Command-line interface for translating vendor-annotated OpenAPI
//! documents into API Gateway integrations and CloudFormation resources.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use openapi_gateway_integrations_common::{ProjectConfig, Template};
use openapi_gateway_integrations_deploy::{deploy_api, AwsControlPlane, DeployOutcome, DeployTarget};
use openapi_gateway_integrations_synthesis::GatewaySynthesizer;
use openapi_gateway_integrations_translator::{ApiDocument, TransformOptions, CORS_MARKER};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "openapi-gateway-integrations")]
#[command(version, about = "Translate vendor-annotated OpenAPI documents into API Gateway integrations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Report the vendor markers found in a document, without transforming
    #[command(after_help = "EXAMPLES:\n  \
        # Inspect the document configured in gateway.yml\n  \
        openapi-gateway-integrations inspect\n\n  \
        # Inspect an explicit document\n  \
        openapi-gateway-integrations inspect --api openapi.yml")]
    Inspect {
        /// Path to the project configuration file
        #[arg(short, long, default_value = "gateway.yml")]
        config: PathBuf,

        /// OpenAPI document (overrides the configured path)
        #[arg(short, long)]
        api: Option<PathBuf>,
    },

    /// Translate the document and merge the synthesized resources into a
    /// CloudFormation template
    #[command(after_help = "EXAMPLES:\n  \
        # Transform into a fresh template\n  \
        openapi-gateway-integrations transform --output template.json\n\n  \
        # Merge into an existing template\n  \
        openapi-gateway-integrations transform \\\n    \
        --template packaged.json \\\n    \
        --output packaged.json")]
    Transform {
        /// Path to the project configuration file
        #[arg(short, long, default_value = "gateway.yml")]
        config: PathBuf,

        /// OpenAPI document (overrides the configured path)
        #[arg(short, long)]
        api: Option<PathBuf>,

        /// Existing CloudFormation template to merge into
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Output template path
        #[arg(short, long, default_value = "template.json")]
        output: PathBuf,
    },

    /// Create a new gateway deployment for the configured stage
    #[command(after_help = "EXAMPLES:\n  \
        # Deploy after the stack update completed\n  \
        openapi-gateway-integrations deploy --config gateway.yml")]
    Deploy {
        /// Path to the project configuration file
        #[arg(short, long, default_value = "gateway.yml")]
        config: PathBuf,

        /// OpenAPI document (overrides the configured path)
        #[arg(short, long)]
        api: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { config, api } => {
            inspect_command(config.as_path(), api.as_deref(), cli.verbose)?;
        }
        Commands::Transform {
            config,
            api,
            template,
            output,
        } => {
            transform_command(
                config.as_path(),
                api.as_deref(),
                template.as_deref(),
                output.as_path(),
                cli.verbose,
            )?;
        }
        Commands::Deploy { config, api } => {
            deploy_command(config.as_path(), api.as_deref(), cli.verbose)?;
        }
    }

    Ok(())
}

fn load_inputs(
    config_path: &Path,
    api_override: Option<&Path>,
) -> Result<(ProjectConfig, ApiDocument)> {
    let config = ProjectConfig::load(config_path)
        .with_context(|| format!("Failed to load configuration {}", config_path.display()))?;

    let api_path = api_override
        .map(PathBuf::from)
        .or_else(|| config.openapi.file.clone())
        .context("No OpenAPI document given; set openapi.file or pass --api")?;

    let document = ApiDocument::from_file(&api_path)
        .with_context(|| format!("Failed to load document {}", api_path.display()))?;

    Ok((config, document))
}

fn transform_options(config: &ProjectConfig, document: ApiDocument) -> TransformOptions {
    TransformOptions {
        body: Some(document),
        key: config.openapi.key.clone(),
        endpoint_type: config.openapi.endpoint_type.clone(),
        update_deployment: config.openapi.update_deployment,
        use_package_version: config.openapi.use_package_version,
    }
}

fn inspect_command(config_path: &Path, api_override: Option<&Path>, verbose: bool) -> Result<()> {
    let (_, document) = load_inputs(config_path, api_override)?;

    println!("{} Inspecting document", "→".cyan());

    let mut functions = 0;
    let mut topics = 0;
    let mut preflights = 0;

    for (path, item) in &document.paths {
        let cors = item.field(CORS_MARKER).is_some();
        if cors {
            preflights += 1;
        }

        if verbose {
            println!("  • {}{}", path.cyan(), if cors { " [cors]" } else { "" });
        }

        for (verb, method) in item.methods() {
            if let Some(reference) = &method.function_reference {
                functions += 1;
                if verbose {
                    println!("      {} → lambda {}", verb.to_uppercase(), reference.yellow());
                }
            }
            if let Some(topic) = &method.topic_reference {
                topics += 1;
                if verbose {
                    println!("      {} → sns {}", verb.to_uppercase(), topic.yellow());
                }
            }
        }
    }

    println!("\n{}", "✓ Inspection complete".green().bold());
    println!("  Paths: {}", document.paths.len());
    println!("  Lambda markers: {functions}");
    println!("  Topic markers: {topics}");
    println!("  CORS markers: {preflights}");

    Ok(())
}

fn transform_command(
    config_path: &Path,
    api_override: Option<&Path>,
    template_path: Option<&Path>,
    output: &Path,
    verbose: bool,
) -> Result<()> {
    let (config, document) = load_inputs(config_path, api_override)?;

    let mut template = match template_path {
        Some(path) => {
            println!("{} Merging into template: {}", "→".cyan(), path.display());
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read template {}", path.display()))?;
            serde_json::from_str::<Template>(&content)
                .with_context(|| format!("Failed to parse template {}", path.display()))?
        }
        None => Template::default(),
    };
    let before = template.resources.len();

    if verbose {
        println!("  Service: {}", config.service);
        println!("  Stage: {}", config.stage);
        println!("  Gateway key: {}", options_key(&config));
    }

    println!("{} Translating document...", "→".cyan());
    let context = config.context();
    let synthesizer = GatewaySynthesizer::new(&context, &config);
    synthesizer
        .process_document(transform_options(&config, document), &mut template.resources)
        .context("Failed to synthesize gateway resources")?;

    let rendered = serde_json::to_string_pretty(&template)
        .context("Failed to render template")?;
    fs::write(output, rendered + "\n")
        .with_context(|| format!("Failed to write template {}", output.display()))?;

    println!("\n{}", "✓ Transformation complete".green().bold());
    println!(
        "  Resources: {} ({} synthesized)",
        template.resources.len(),
        template.resources.len() - before
    );
    println!("  Written to: {}", output.display());

    Ok(())
}

fn deploy_command(config_path: &Path, api_override: Option<&Path>, verbose: bool) -> Result<()> {
    let (config, document) = load_inputs(config_path, api_override)?;

    let package_version = if config.openapi.use_package_version.unwrap_or(false) {
        let version = manifest_version(Path::new("Cargo.toml"))
            .context("use_package_version is set but Cargo.toml could not be read")?;
        println!("{} Using package version {}", "→".cyan(), version.yellow());
        Some(version)
    } else {
        None
    };

    let target = DeployTarget {
        stack_name: config.stack_name(),
        stage: config.stage.clone(),
        package_version,
    };

    if verbose {
        println!("  Stack: {}", target.stack_name);
        println!("  Stage: {}", target.stage);
    }

    println!("{} Connecting to the AWS control plane...", "→".cyan());
    let plane = AwsControlPlane::new(config.region.clone())
        .context("Failed to initialize the AWS control plane")?;

    let mut options = transform_options(&config, document);
    println!(
        "{} Creating deployment for stack {}...",
        "→".cyan(),
        target.stack_name.yellow()
    );
    let outcome = deploy_api(&mut options, &target, &plane)
        .context("Failed to create gateway deployment")?;

    match outcome {
        DeployOutcome::Skipped => {
            println!("\n{}", "✓ Deployment updates disabled, nothing to do".green());
        }
        DeployOutcome::Deployed { rest_api_id } => {
            println!("\n{}", "✓ Deployment created".green().bold());
            println!("  Rest API: {}", rest_api_id.yellow());
            println!("  Stage: {}", target.stage);
        }
    }

    Ok(())
}

fn options_key(config: &ProjectConfig) -> String {
    config
        .openapi
        .key
        .clone()
        .unwrap_or_else(|| openapi_gateway_integrations_synthesis::DEFAULT_GATEWAY_KEY.to_string())
}

/// Read the package version from the project manifest
fn manifest_version(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let manifest: toml::Value = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    manifest
        .get("package")
        .and_then(|package| package.get("version"))
        .and_then(|version| version.as_str())
        .map(String::from)
        .with_context(|| format!("{} has no package.version", path.display()))
}
