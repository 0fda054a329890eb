use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Value, json};

use swag_core::compile::{self, CompileOptions, NamingStyle};
use swag_core::config::SwagConfig;
use swag_core::model;
use swag_core::sanitize;
use swag_core::validate::{self, Language};
use swag_core::{Transformer, TypeDescriptor, TypeRegistry};

use crate::fetch;
use crate::generator::GeneratorRun;

/// Where `check` reads its Swagger document from.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    Url(String),
    File(PathBuf),
}

impl DocumentSource {
    pub async fn load(&self) -> Result<Value> {
        match self {
            DocumentSource::File(path) => fetch::read_document(path),
            DocumentSource::Url(url) => {
                let url = validate::validate_url(url)?;
                fetch::fetch_document(&reqwest::Client::new(), &url).await
            }
        }
    }
}

/// Fetch, filter, check and write the model file, then run the generator.
/// Returns the path of the generated source file.
pub async fn generate(
    cfg: &SwagConfig,
    url: &str,
    lang: Option<&str>,
    output_dir: Option<&Path>,
    skip_check: bool,
) -> Result<PathBuf> {
    let url = validate::validate_url(url)?;
    let lang: Language = match lang {
        Some(lang) => validate::validate_language(lang)?,
        None => cfg.lang,
    };
    let output_dir = output_dir.map_or_else(|| PathBuf::from(&cfg.output_dir), Path::to_path_buf);

    eprintln!("Fetching {url}");
    let client = reqwest::Client::new();
    let document = fetch::fetch_document(&client, &url).await?;
    let definitions = sanitize::into_definitions(document);

    if skip_check {
        log::info!("skipping definitions check");
    } else {
        model::to_definitions(&definitions)
            .context("fetched document does not match the expected definitions shape")?;
    }
    let count = definitions.as_object().map_or(0, |defs| defs.len());

    let model_path = output_dir.join(&cfg.model_file);
    fetch::write_model(&model_path, &definitions)?;
    eprintln!("  wrote {} ({} definitions)", model_path.display(), count);

    let run = GeneratorRun::new(&cfg.generator, &model_path, lang, &output_dir);
    eprintln!("Generating {} models with {}", lang, run.command);
    let generated = run.run()?;
    eprintln!("  wrote {}", generated.display());
    Ok(generated)
}

/// Check a document against the bundled model and compile its definitions.
///
/// With a sample, returns the sample decoded against the named definition;
/// otherwise a summary of the compiled registry.
pub async fn check(
    cfg: &SwagConfig,
    source: &DocumentSource,
    sample: Option<(&str, &Path)>,
    naming: Option<NamingStyle>,
) -> Result<Value> {
    let definitions = sanitize::into_definitions(source.load().await?);

    model::to_definitions(&definitions)
        .context("document does not match the expected definitions shape")?;

    let options = CompileOptions {
        naming: naming.unwrap_or(cfg.naming),
    };
    let registry = compile::compile_definitions(&definitions, &options)?;

    let Some((name, path)) = sample else {
        return Ok(check_summary(&registry));
    };
    let value = fetch::read_document(path)?;
    if !registry.contains(name) {
        anyhow::bail!("no definition named `{name}`");
    }
    let decoded = Transformer::new(&registry)
        .cast(&value, name)
        .with_context(|| format!("{} does not match `{name}`", path.display()))?;
    Ok(decoded.to_json())
}

pub fn check_summary(registry: &TypeRegistry) -> Value {
    let definitions: Vec<Value> = registry
        .iter()
        .map(|(name, ty)| {
            let kind = match ty {
                TypeDescriptor::Object(_) => "object",
                TypeDescriptor::Enum(_) => "enum",
                TypeDescriptor::Array(_) => "array",
                TypeDescriptor::Union(_) => "union",
                TypeDescriptor::Ref(_) => "alias",
                _ => "scalar",
            };
            let fields: Vec<&str> = match ty {
                TypeDescriptor::Object(obj) => obj.fields.iter().map(|f| f.wire.as_str()).collect(),
                _ => Vec::new(),
            };
            json!({
                "name": name,
                "kind": kind,
                "fields": fields,
            })
        })
        .collect();

    json!({
        "count": registry.len(),
        "definitions": definitions,
    })
}
