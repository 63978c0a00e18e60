use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameProvider {
    pub name: String,
    pub id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameProviders {
    pub providers: Vec<GameProvider>,
}

/// A purchasable top-up value of a game provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameProduct {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub code: Option<String>,
    /// Cents
    pub value: i64,
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameProducts {
    pub provider_id: Option<i64>,
    pub products: Vec<GameProduct>,
}
