use std::path::PathBuf;

use serde::Deserialize;

use crate::dataset::Dataset;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Fixture,
    File(PathBuf),
}

impl DataSource {
    pub fn describe(&self) -> String {
        match self {
            DataSource::Fixture => "fixture".to_string(),
            DataSource::File(p) => p.to_string_lossy().to_string(),
        }
    }
}

pub struct AppState {
    pub dataset: Dataset,
    pub source: DataSource,
}
