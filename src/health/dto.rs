use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo::HealthAnalysis;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub pet_id: Uuid,
    #[serde(default)]
    pub analysis_type: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisEnvelope {
    pub success: bool,
    pub analysis: HealthAnalysis,
}

#[derive(Debug, Serialize)]
pub struct AnalysesEnvelope {
    pub success: bool,
    pub analyses: Vec<HealthAnalysis>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisTypeInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Key kept snake_case: the consumer reads `analysis_types` verbatim.
#[derive(Debug, Serialize)]
pub struct AnalysisTypesEnvelope {
    pub success: bool,
    pub analysis_types: Vec<AnalysisTypeInfo>,
}
