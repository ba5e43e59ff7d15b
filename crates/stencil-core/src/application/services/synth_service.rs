//! Synth Service - layered configuration in, one JSON document out.

use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    domain::{
        ConfigValue, FileMode, GeneratedFile, KeyTransformer, Mapping, MergeMode, RelativePath,
        entities::generated::GENERATED_MARKER, merge_layers,
    },
    error::{Context, StencilResult},
};

/// Key under which JSON files carry the generated-file marker.
pub const MARKER_KEY: &str = "//";

#[derive(Debug, Default)]
pub struct SynthService {
    mode: MergeMode,
    transformer: Option<KeyTransformer>,
}

impl SynthService {
    pub fn new(mode: MergeMode) -> Self {
        Self {
            mode,
            transformer: None,
        }
    }

    /// Re-key the merged tree before it is emitted.
    pub fn with_transformer(mut self, transformer: KeyTransformer) -> Self {
        self.transformer = Some(transformer);
        self
    }

    pub fn mode(&self) -> MergeMode {
        self.mode
    }

    /// Merge the layers, then apply the transformer if one is set.
    #[instrument(skip_all, fields(layers = layers.len(), mode = ?self.mode))]
    pub fn synthesize(&self, layers: Vec<Mapping>) -> StencilResult<ConfigValue> {
        let merged = ConfigValue::Mapping(merge_layers(layers, self.mode));
        match &self.transformer {
            Some(transformer) => {
                debug!(case = %transformer.case(), "transforming keys");
                Ok(transformer.transform(&merged)?)
            }
            None => Ok(merged),
        }
    }

    /// [`synthesize`](Self::synthesize) to strict JSON.
    pub fn to_json(&self, layers: Vec<Mapping>) -> StencilResult<Value> {
        Ok(self.synthesize(layers)?.to_json()?)
    }

    /// A JSON file holding the synthesized document, with a trailing newline.
    ///
    /// When `marker` is set the document starts with a `"//"` entry naming
    /// the file as generated. Read-only files get mode `400`.
    pub fn json_file(
        &self,
        path: RelativePath,
        layers: Vec<Mapping>,
        marker: bool,
        readonly: bool,
    ) -> StencilResult<GeneratedFile> {
        let document = match self.to_json(layers)? {
            Value::Object(body) if marker => {
                let mut map = serde_json::Map::with_capacity(body.len() + 1);
                map.insert(MARKER_KEY.to_string(), Value::from(GENERATED_MARKER));
                map.extend(body);
                Value::Object(map)
            }
            other => other,
        };
        let mut content =
            serde_json::to_string_pretty(&document).context("serializing synthesized JSON")?;
        content.push('\n');

        Ok(GeneratedFile::new(path, content).with_mode(FileMode::from_flags(readonly, false)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{KeyCase, OpaqueNode};
    use crate::error::StencilError;
    use serde_json::json;

    fn layer(value: Value) -> Mapping {
        ConfigValue::from(value).into_mapping().unwrap()
    }

    #[test]
    fn merges_then_decamelizes() {
        let transformer = KeyTransformer::new(KeyCase::Snake).preserving_below(["environment"]);
        let service = SynthService::new(MergeMode::NonDestructive).with_transformer(transformer);

        let out = service
            .to_json(vec![
                layer(json!({ "dependsOn": ["a"], "environment": { "MY_VAR": 1 } })),
                layer(json!({ "environment": { "otherVar": 2 } })),
            ])
            .unwrap();

        assert_eq!(
            out,
            json!({ "depends_on": ["a"], "environment": { "MY_VAR": 1, "otherVar": 2 } })
        );
    }

    #[test]
    fn opaque_values_fail_json_emission() {
        let mut base = Mapping::new();
        base.insert("project".into(), OpaqueNode::new("root", ()).into());

        let err = SynthService::default().to_json(vec![base]).unwrap_err();
        assert!(matches!(err, StencilError::Domain(_)));
    }

    #[test]
    fn json_file_has_marker_first() {
        let file = SynthService::default()
            .json_file(
                RelativePath::try_new("tsconfig.json").unwrap(),
                vec![layer(json!({ "compilerOptions": { "strict": true } }))],
                true,
                true,
            )
            .unwrap();

        assert!(file.content.starts_with("{\n  \"//\": \"~~ Generated by stencil"));
        assert!(file.content.ends_with("}\n"));
        assert_eq!(file.mode, FileMode::ReadOnly);
    }
}
