//! Configuration primitives and loader for the slide-deck toolkit.
//!
//! Settings are resolved from layered `.slide-deck.toml` files with the
//! precedence override flag → working directory → git root → built-in
//! defaults. Relative paths are anchored at the directory of the layer that
//! declared them, so a git-root config can point at files next to itself.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = ".slide-deck.toml";

/// Complete configuration resolved from defaults and on-disk overrides.
#[derive(Clone, Debug)]
pub struct Config {
    pub deck: DeckSettings,
    pub bundle: BundleSettings,
    pub sources: ConfigSources,
}

/// Where the deck manifest and its slide files live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeckSettings {
    /// Directory that manifest `file` entries are relative to.
    pub root: PathBuf,
    pub manifest: PathBuf,
}

/// Inputs and output of the offline bundle build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BundleSettings {
    pub template: PathBuf,
    pub stylesheet: PathBuf,
    pub script: PathBuf,
    pub assets: PathBuf,
    pub output: PathBuf,
}

/// Provenance information for resolved configuration.
#[derive(Clone, Debug)]
pub struct ConfigSources {
    pub working_directory: PathBuf,
    pub layers: Vec<ConfigSource>,
}

/// Specific layer of configuration (default/git/local/override).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    pub path: Option<PathBuf>,
    pub base_dir: PathBuf,
}

impl ConfigSource {
    fn default(base_dir: PathBuf) -> Self {
        ConfigSource {
            kind: ConfigSourceKind::Default,
            path: None,
            base_dir,
        }
    }

    fn for_file(kind: ConfigSourceKind, path: PathBuf) -> Self {
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        ConfigSource {
            kind,
            path: Some(path),
            base_dir,
        }
    }

    fn describe(&self) -> String {
        match (&self.kind, &self.path) {
            (ConfigSourceKind::Default, _) => "built-in defaults".to_owned(),
            (kind, Some(path)) => format!("{} at {}", kind, path.display()),
            (kind, None) => kind.to_string(),
        }
    }
}

/// Kinds of configuration sources, ordered from lowest to highest precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSourceKind {
    Default,
    GitRoot,
    Local,
    Override,
}

impl fmt::Display for ConfigSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSourceKind::Default => "defaults",
            ConfigSourceKind::GitRoot => "git-root config",
            ConfigSourceKind::Local => "local config",
            ConfigSourceKind::Override => "override config",
        };
        f.write_str(label)
    }
}

/// Loader options, typically supplied by the CLI layer.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub override_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }
}

/// Errors surfaced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve working directory {attempted}: {source}")]
    WorkingDirectory {
        attempted: PathBuf,
        source: io::Error,
    },
    #[error("override config {path} not found")]
    OverrideNotFound { path: PathBuf },
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("configuration validation failed:\n{0}")]
    Validation(ConfigValidationErrors),
}

impl Config {
    /// Loads configuration using the precedence rules and returns typed settings.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = resolve_working_dir(options.working_dir)?;
        let override_path = options
            .override_path
            .map(|path| make_absolute(&path, &working_dir));

        if let Some(path) = &override_path {
            if !path.exists() {
                return Err(ConfigError::OverrideNotFound { path: path.clone() });
            }
        }

        let default_source = ConfigSource::default(working_dir.clone());
        let mut merged = defaults_layer(default_source.clone());
        let mut source_layers = vec![default_source];

        let git_config_path = find_git_root(&working_dir).map(|root| root.join(CONFIG_FILE_NAME));
        let local_config_path = working_dir.join(CONFIG_FILE_NAME);

        if let Some(path) = git_config_path.as_ref() {
            if path.exists() && Some(path) != override_path.as_ref() && path != &local_config_path {
                let source = ConfigSource::for_file(ConfigSourceKind::GitRoot, path.clone());
                merged.merge(load_layer(path, source.clone())?);
                source_layers.push(source);
            }
        }

        if local_config_path.exists() && Some(&local_config_path) != override_path.as_ref() {
            let source = ConfigSource::for_file(ConfigSourceKind::Local, local_config_path.clone());
            merged.merge(load_layer(&local_config_path, source.clone())?);
            source_layers.push(source);
        }

        if let Some(path) = override_path {
            let source = ConfigSource::for_file(ConfigSourceKind::Override, path.clone());
            merged.merge(load_layer(&path, source.clone())?);
            source_layers.push(source);
        }

        tracing::debug!(layers = source_layers.len(), "resolved configuration layers");

        let (deck, bundle) = merged.finalize().map_err(ConfigError::Validation)?;
        Ok(Config {
            deck,
            bundle,
            sources: ConfigSources {
                working_directory: working_dir,
                layers: source_layers,
            },
        })
    }
}

fn resolve_working_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(path) => fs::canonicalize(&path).map_err(|source| ConfigError::WorkingDirectory {
            attempted: path,
            source,
        }),
        None => env::current_dir().map_err(|source| ConfigError::WorkingDirectory {
            attempted: PathBuf::from("."),
            source,
        }),
    }
}

fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn load_layer(path: &Path, source: ConfigSource) -> Result<PartialConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|err| ConfigError::Io {
        path: path.into(),
        source: err,
    })?;
    let raw: RawConfig = toml::from_str(&contents).map_err(|err| ConfigError::Parse {
        path: path.into(),
        source: err,
    })?;
    Ok(raw.into_partial(source))
}

fn defaults_layer(source: ConfigSource) -> PartialConfig {
    let at = |value: &str| Some(Located::new(PathBuf::from(value), source.clone()));
    PartialConfig {
        deck: DeckPartial {
            root: at("."),
            manifest: at("deck.json"),
        },
        bundle: BundlePartial {
            template: at("index.html"),
            stylesheet: at("theme.css"),
            script: at("app.js"),
            assets: at("assets"),
            output: at("docs/index.html"),
        },
    }
}

fn find_git_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(".git").exists() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

#[derive(Clone, Debug, Default)]
struct PartialConfig {
    deck: DeckPartial,
    bundle: BundlePartial,
}

impl PartialConfig {
    fn merge(&mut self, other: PartialConfig) {
        self.deck.merge(other.deck);
        self.bundle.merge(other.bundle);
    }

    fn finalize(self) -> Result<(DeckSettings, BundleSettings), ConfigValidationErrors> {
        let mut errors = Vec::new();

        let deck = DeckSettings {
            root: required_path(self.deck.root, "deck.root", &mut errors),
            manifest: required_path(self.deck.manifest, "deck.manifest", &mut errors),
        };

        let output_loc = self.bundle.output.clone();
        let bundle = BundleSettings {
            template: required_path(self.bundle.template, "bundle.template", &mut errors),
            stylesheet: required_path(self.bundle.stylesheet, "bundle.stylesheet", &mut errors),
            script: required_path(self.bundle.script, "bundle.script", &mut errors),
            assets: required_path(self.bundle.assets, "bundle.assets", &mut errors),
            output: required_path(self.bundle.output, "bundle.output", &mut errors),
        };

        if let Some(output) = output_loc {
            let names_file = output
                .value
                .file_name()
                .is_some_and(|name| !name.is_empty());
            if !output.value.as_os_str().is_empty() && !names_file {
                errors.push(
                    ConfigValidationError::new(
                        Some(output.source.clone()),
                        format!("'{}' does not name a file", output.value.display()),
                    )
                    .with_context("bundle.output"),
                );
            }
        }

        if !errors.is_empty() {
            return Err(ConfigValidationErrors(errors));
        }

        Ok((deck, bundle))
    }
}

#[derive(Clone, Debug, Default)]
struct DeckPartial {
    root: Option<Located<PathBuf>>,
    manifest: Option<Located<PathBuf>>,
}

impl DeckPartial {
    fn merge(&mut self, other: DeckPartial) {
        if other.root.is_some() {
            self.root = other.root;
        }
        if other.manifest.is_some() {
            self.manifest = other.manifest;
        }
    }
}

#[derive(Clone, Debug, Default)]
struct BundlePartial {
    template: Option<Located<PathBuf>>,
    stylesheet: Option<Located<PathBuf>>,
    script: Option<Located<PathBuf>>,
    assets: Option<Located<PathBuf>>,
    output: Option<Located<PathBuf>>,
}

impl BundlePartial {
    fn merge(&mut self, other: BundlePartial) {
        if other.template.is_some() {
            self.template = other.template;
        }
        if other.stylesheet.is_some() {
            self.stylesheet = other.stylesheet;
        }
        if other.script.is_some() {
            self.script = other.script;
        }
        if other.assets.is_some() {
            self.assets = other.assets;
        }
        if other.output.is_some() {
            self.output = other.output;
        }
    }
}

#[derive(Clone, Debug)]
struct Located<T> {
    value: T,
    source: ConfigSource,
}

impl<T> Located<T> {
    fn new(value: T, source: ConfigSource) -> Self {
        Located { value, source }
    }
}

fn required_path(
    located: Option<Located<PathBuf>>,
    context: &str,
    errors: &mut Vec<ConfigValidationError>,
) -> PathBuf {
    match located {
        Some(located) if !located.value.as_os_str().is_empty() => resolve_path(&located),
        Some(located) => {
            errors.push(
                ConfigValidationError::new(Some(located.source), "path cannot be empty".into())
                    .with_context(context),
            );
            PathBuf::new()
        }
        None => {
            errors.push(
                ConfigValidationError::new(None, "no value configured".into())
                    .with_context(context),
            );
            PathBuf::new()
        }
    }
}

fn resolve_path(located: &Located<PathBuf>) -> PathBuf {
    let path = &located.value;
    if path.is_absolute() {
        path.clone()
    } else {
        located.source.base_dir.join(path)
    }
}

/// Container for validation failures, formatted as a bullet list.
#[derive(Debug)]
pub struct ConfigValidationErrors(pub Vec<ConfigValidationError>);

impl fmt::Display for ConfigValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "- {err}")?;
        }
        Ok(())
    }
}

impl ConfigValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ConfigValidationError> {
        self.0.iter()
    }
}

/// Validation failure with optional provenance.
#[derive(Clone, Debug)]
pub struct ConfigValidationError {
    pub source: Option<ConfigSource>,
    pub message: String,
    pub context: Option<String>,
}

impl ConfigValidationError {
    fn new(source: Option<ConfigSource>, message: String) -> Self {
        ConfigValidationError {
            source,
            message,
            context: None,
        }
    }

    fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "{}: {}", context, self.message)?;
        } else {
            write!(f, "{}", self.message)?;
        }
        if let Some(source) = &self.source {
            write!(f, " ({})", source.describe())?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    deck: Option<RawDeck>,
    #[serde(default)]
    bundle: Option<RawBundle>,
}

impl RawConfig {
    fn into_partial(self, source: ConfigSource) -> PartialConfig {
        PartialConfig {
            deck: self
                .deck
                .map(|deck| deck.into_partial(&source))
                .unwrap_or_default(),
            bundle: self
                .bundle
                .map(|bundle| bundle.into_partial(&source))
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDeck {
    #[serde(default)]
    root: Option<PathBuf>,
    #[serde(default)]
    manifest: Option<PathBuf>,
}

impl RawDeck {
    fn into_partial(self, source: &ConfigSource) -> DeckPartial {
        DeckPartial {
            root: self.root.map(|value| Located::new(value, source.clone())),
            manifest: self.manifest.map(|value| Located::new(value, source.clone())),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBundle {
    #[serde(default)]
    template: Option<PathBuf>,
    #[serde(default)]
    stylesheet: Option<PathBuf>,
    #[serde(default)]
    script: Option<PathBuf>,
    #[serde(default)]
    assets: Option<PathBuf>,
    #[serde(default)]
    output: Option<PathBuf>,
}

impl RawBundle {
    fn into_partial(self, source: &ConfigSource) -> BundlePartial {
        let locate = |value: Option<PathBuf>| value.map(|path| Located::new(path, source.clone()));
        BundlePartial {
            template: locate(self.template),
            stylesheet: locate(self.stylesheet),
            script: locate(self.script),
            assets: locate(self.assets),
            output: locate(self.output),
        }
    }
}
