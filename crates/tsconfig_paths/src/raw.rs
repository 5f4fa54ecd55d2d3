use serde::Deserialize;
use serde_json::{Map, Value};

/// Raw shape of a tsconfig document, before `extends` flattening.
///
/// Only the fields resolution cares about are modeled; everything else in
/// the file is ignored. `paths` is kept as a JSON object so that key
/// declaration order survives deserialization (it participates in match
/// precedence tie-breaking).
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TsconfigJson {
    pub extends: Option<String>,
    #[serde(default)]
    pub compiler_options: TsconfigCompilerOptions,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TsconfigCompilerOptions {
    pub base_url: Option<String>,
    pub paths: Option<Map<String, Value>>,
}
