use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{DeckError, DeckResult};
use crate::manifest::DeckManifest;

/// Script statement that carries the embedded data inside a bundle.
pub const EMBED_ASSIGNMENT: &str = "window.EMBED_DATA = ";

/// Pre-packaged copy of the manifest, slide text and image assets used when
/// the primary content source is unavailable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck: Option<DeckManifest>,
    /// Slide markdown keyed by the manifest `file` value.
    #[serde(default)]
    pub slides: BTreeMap<String, String>,
    /// `data:` URIs keyed by the asset path used in slide markup.
    #[serde(default)]
    pub assets: BTreeMap<String, String>,
}

impl EmbeddedData {
    /// Serializes for inclusion inside a `<script>` element.
    ///
    /// `</` is written as `<\/` so slide text cannot terminate the element.
    pub fn to_script_json(&self) -> serde_json::Result<String> {
        let json = serde_json::to_string(self)?;
        Ok(json.replace("</", "<\\/"))
    }

    /// Recovers the data embedded in a built bundle.
    ///
    /// Returns `Ok(None)` when the document carries no assignment or still holds
    /// the empty `window.EMBED_DATA || {}` placeholder.
    pub fn from_bundle_html(html: &str) -> DeckResult<Option<Self>> {
        for (position, _) in html.match_indices(EMBED_ASSIGNMENT) {
            let rest = html[position + EMBED_ASSIGNMENT.len()..].trim_start();
            if !rest.starts_with('{') {
                continue;
            }

            let mut values = serde_json::Deserializer::from_str(rest).into_iter::<EmbeddedData>();
            return match values.next() {
                Some(Ok(data)) => Ok(Some(data)),
                Some(Err(err)) => Err(DeckError::Embedded(err.to_string())),
                None => Ok(None),
            };
        }
        Ok(None)
    }

    pub fn asset(&self, path: &str) -> Option<&str> {
        self.assets.get(path).map(String::as_str)
    }

    pub fn slide(&self, file: &str) -> Option<&str> {
        self.slides.get(file).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::SlideEntry;

    fn sample() -> EmbeddedData {
        let mut data = EmbeddedData {
            deck: Some(DeckManifest {
                title: Some("Offline".into()),
                slides: vec![SlideEntry {
                    title: "One".into(),
                    file: "slides/01.md".into(),
                }],
            }),
            ..EmbeddedData::default()
        };
        data.slides
            .insert("slides/01.md".into(), "```\n</script>\n```".into());
        data.assets
            .insert("assets/a.png".into(), "data:image/png;base64,AA==".into());
        data
    }

    #[test]
    fn script_json_cannot_close_the_script_element() {
        let json = sample().to_script_json().unwrap();
        assert!(!json.contains("</script>"));
        assert!(json.contains(r"<\/script>"));
    }

    #[test]
    fn recovers_data_from_bundle() {
        let data = sample();
        let html = format!(
            "<script>{EMBED_ASSIGNMENT}{};</script>",
            data.to_script_json().unwrap()
        );

        let recovered = EmbeddedData::from_bundle_html(&html).unwrap();
        assert_eq!(recovered, Some(data));
    }

    #[test]
    fn placeholder_assignment_holds_no_data() {
        let html = "<script>window.EMBED_DATA = window.EMBED_DATA || {};</script>";
        assert_eq!(EmbeddedData::from_bundle_html(html).unwrap(), None);
        assert_eq!(EmbeddedData::from_bundle_html("<p>nothing</p>").unwrap(), None);
    }

    #[test]
    fn truncated_data_is_an_error() {
        let html = "window.EMBED_DATA = {\"slides\": {";
        assert!(matches!(
            EmbeddedData::from_bundle_html(html),
            Err(DeckError::Embedded(_))
        ));
    }
}
