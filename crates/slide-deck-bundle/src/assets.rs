use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use base64::{engine::general_purpose, Engine};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::{BundleError, BundleResult};

/// Key prefix under which encoded assets are referenced from slides and CSS.
pub const ASSET_PREFIX: &str = "assets/";

static CSS_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"url\(([^)]+)\)").unwrap());

/// MIME type for the image formats that get embedded.
pub fn mime_for(file_name: &str) -> Option<&'static str> {
    let extension = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "svg" => Some("image/svg+xml"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{mime};base64,{}",
        general_purpose::STANDARD.encode(bytes)
    )
}

/// Encodes every supported image directly inside `dir` as a data URI keyed
/// `assets/<file name>`. A missing directory yields no assets.
pub fn encode_assets(dir: &Path) -> BundleResult<BTreeMap<String, String>> {
    let mut assets = BTreeMap::new();
    if !dir.is_dir() {
        tracing::debug!(dir = %dir.display(), "asset directory not found, embedding no assets");
        return Ok(assets);
    }

    let wrap = |source| BundleError::AssetDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(dir)
        .map_err(wrap)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(wrap)?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str().map(str::to_owned) else {
            tracing::debug!(path = %path.display(), "skipping asset with non UTF-8 name");
            continue;
        };
        let Some(mime) = mime_for(&file_name) else {
            tracing::debug!(file = %file_name, "skipping unsupported asset type");
            continue;
        };

        let bytes = fs::read(&path).map_err(wrap)?;
        assets.insert(format!("{ASSET_PREFIX}{file_name}"), data_uri(mime, &bytes));
    }

    Ok(assets)
}

/// Replaces `url(...)` references to known assets with their data URIs.
pub fn inline_stylesheet_urls(css: &str, assets: &BTreeMap<String, String>) -> String {
    CSS_URL
        .replace_all(css, |caps: &Captures<'_>| {
            let target = strip_quotes(caps[1].trim());
            match assets.get(target) {
                Some(uri) => format!("url('{uri}')"),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn strip_quotes(value: &str) -> &str {
    let value = value
        .strip_prefix(['"', '\''])
        .unwrap_or(value);
    value.strip_suffix(['"', '\'']).unwrap_or(value)
}
