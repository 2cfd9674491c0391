/// Placeholder drawn when no activity name is given.
pub const EMPTY_ACTIVITY: &str = "-";

/// The four caption fields of an activity photo.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CaptionFields {
    /// Report date, already formatted for display.
    pub date: Option<String>,
    /// Activity name.
    pub activity: Option<String>,
    /// Free-text location.
    pub location: Option<String>,
    /// Time of day, already formatted for display.
    pub time: Option<String>,
}

impl CaptionFields {
    /// Caption lines in drawing order: date, activity, location, time.
    ///
    /// A blank activity becomes [`EMPTY_ACTIVITY`]; other missing fields become empty lines
    /// so the block keeps its shape.
    pub fn lines(&self) -> [String; 4] {
        let text = |v: &Option<String>| v.as_deref().map(str::trim).unwrap_or("").to_string();
        let activity = match text(&self.activity) {
            a if a.is_empty() => EMPTY_ACTIVITY.to_string(),
            a => a,
        };
        [
            text(&self.date),
            activity,
            text(&self.location),
            text(&self.time),
        ]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/caption/fields.rs"]
mod tests;
