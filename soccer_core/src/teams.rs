use serde::{Deserialize, Serialize};

use crate::{Color, CoreError};

/// Squad ratings, roughly 40..100
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ratings {
    pub attack: f32,
    pub defense: f32,
    pub midfield: f32,
    pub form: f32,
    pub momentum: f32,
}

impl Default for Ratings {
    fn default() -> Self {
        Self {
            attack: 75.0,
            defense: 75.0,
            midfield: 75.0,
            form: 75.0,
            momentum: 75.0,
        }
    }
}

/// Team descriptor. Read-only while a match runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInfo {
    pub id: String,
    pub name: String,
    pub color: String,
    #[serde(default = "default_secondary")]
    pub color2: String,
    #[serde(default)]
    pub ratings: Ratings,
}

fn default_secondary() -> String {
    "#ffffff".to_string()
}

impl TeamInfo {
    pub fn new(id: &str, name: &str, color: &str, color2: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            color: color.to_string(),
            color2: color2.to_string(),
            ratings: Ratings::default(),
        }
    }

    pub fn with_ratings(mut self, ratings: Ratings) -> Self {
        self.ratings = ratings;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let team: TeamInfo = serde_json::from_str(json)?;
        team.validate()?;
        Ok(team)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.id.trim().is_empty() {
            return Err(CoreError::InvalidTeam("team id is empty".to_string()));
        }
        if Color::from_hex(&self.color).is_none() {
            return Err(CoreError::InvalidTeam(format!(
                "team `{}` has unreadable colour `{}`",
                self.id, self.color
            )));
        }
        Ok(())
    }

    pub fn primary(&self) -> Color {
        Color::from_hex(&self.color).unwrap_or(Color::WHITE)
    }

    pub fn secondary(&self) -> Color {
        Color::from_hex(&self.color2).unwrap_or(Color::WHITE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_from_json_defaults_ratings() {
        let team = TeamInfo::from_json(r##"{"id": "brasil", "name": "Brasil", "color": "#FFDC00"}"##)
            .expect("team should parse");
        assert_eq!(team.ratings, Ratings::default());
        assert_eq!(team.secondary(), Color::WHITE);
        assert_eq!(team.primary(), Color(0xffdc00));
    }

    #[test]
    fn test_team_validation() {
        let team = TeamInfo::new("", "Nobody", "#000000", "#ffffff");
        assert!(matches!(team.validate(), Err(CoreError::InvalidTeam(_))));

        let team = TeamInfo::new("x", "X", "not-a-colour", "#ffffff");
        assert!(team.validate().is_err());
    }
}
