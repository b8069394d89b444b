use serde::{Deserialize, Serialize};

/// A single multiple-choice comprehension check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub answer: usize,
}

/// A discrete lesson location on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub core_idea: String,
    #[serde(default)]
    pub neighbors: Vec<String>,
    #[serde(default)]
    pub fuel_cost: i32,
    #[serde(default)]
    pub ration_cost: i32,
    #[serde(default = "default_base_xp")]
    pub base_xp: u32,
    #[serde(default)]
    pub reward_tool: Option<String>,
    #[serde(default)]
    pub benefit_from_tool: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub synthesis_prompt: String,
    #[serde(default)]
    pub map_x: f32,
    #[serde(default)]
    pub map_y: f32,
}

fn default_base_xp() -> u32 {
    100
}

/// Resource deltas granted when a puzzle is solved.
/// All fields default to 0 if not specified in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PuzzleReward {
    #[serde(default)]
    pub xp: u32,
    #[serde(default)]
    pub fuel: i32,
    #[serde(default)]
    pub rations: i32,
    #[serde(default)]
    pub integrity: i32,
}

/// A side-challenge raised by the tick scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub id: String,
    pub prompt: String,
    pub solution: String,
    #[serde(default)]
    pub reward: PuzzleReward,
}

/// A purchasable upgrade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upgrade {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    pub cost: u32,
}

/// Read-only content supplied by the shell at startup.
///
/// The core never mutates the catalog; stations, puzzles, and upgrades
/// are looked up by identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ContentCatalog {
    #[serde(default)]
    pub stations: Vec<Station>,
    #[serde(default)]
    pub puzzles: Vec<Puzzle>,
    #[serde(default)]
    pub upgrades: Vec<Upgrade>,
}

impl ContentCatalog {
    /// Create an empty catalog (useful for tests).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load catalog data from JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid catalog data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Build a catalog from pre-parsed parts.
    #[must_use]
    pub fn from_parts(stations: Vec<Station>, puzzles: Vec<Puzzle>, upgrades: Vec<Upgrade>) -> Self {
        Self {
            stations,
            puzzles,
            upgrades,
        }
    }

    /// Find a station by ID.
    #[must_use]
    pub fn station(&self, id: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == id)
    }

    /// Find a puzzle by ID.
    #[must_use]
    pub fn puzzle(&self, id: &str) -> Option<&Puzzle> {
        self.puzzles.iter().find(|p| p.id == id)
    }

    /// Find an upgrade by ID.
    #[must_use]
    pub fn upgrade(&self, id: &str) -> Option<&Upgrade> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    /// All station identifiers in catalog order.
    #[must_use]
    pub fn station_ids(&self) -> Vec<String> {
        self.stations.iter().map(|s| s.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_parses_from_json() {
        let json = r#"{
            "stations": [
                {
                    "id": "relay-01",
                    "title": "Relay One",
                    "core_idea": "Signals attenuate over distance",
                    "neighbors": ["relay-02"],
                    "fuel_cost": 10,
                    "ration_cost": 2,
                    "base_xp": 500,
                    "reward_tool": "spectrometer",
                    "questions": [
                        {
                            "prompt": "What attenuates?",
                            "options": ["signal", "noise"],
                            "answer": 0
                        }
                    ],
                    "synthesis_prompt": "Summarize the core idea."
                }
            ],
            "puzzles": [
                {
                    "id": "pz-anagram",
                    "prompt": "Unscramble: YARLE",
                    "solution": "relay",
                    "reward": { "xp": 50, "integrity": 5 }
                }
            ],
            "upgrades": [
                { "id": "fuel_cell", "name": "Fuel Cell", "cost": 800 }
            ]
        }"#;

        let catalog = ContentCatalog::from_json(json).unwrap();
        let station = catalog.station("relay-01").unwrap();
        assert_eq!(station.base_xp, 500);
        assert_eq!(station.neighbors, vec!["relay-02".to_string()]);
        assert_eq!(station.questions[0].answer, 0);
        assert_eq!(catalog.puzzle("pz-anagram").unwrap().reward.xp, 50);
        assert_eq!(catalog.upgrade("fuel_cell").unwrap().cost, 800);
        assert!(catalog.station("missing").is_none());
    }

    #[test]
    fn optional_fields_default() {
        let json = r#"{
            "stations": [
                { "id": "s1", "title": "Bare Station" }
            ]
        }"#;
        let catalog = ContentCatalog::from_json(json).unwrap();
        let station = catalog.station("s1").unwrap();
        assert_eq!(station.fuel_cost, 0);
        assert_eq!(station.base_xp, 100);
        assert!(station.reward_tool.is_none());
        assert!(station.questions.is_empty());
        assert!(catalog.puzzles.is_empty());
    }
}
