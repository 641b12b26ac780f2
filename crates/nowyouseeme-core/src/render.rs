//! Card model for one visualization.
//!
//! Optional metadata is described by a single table of `(title, extractor)`
//! pairs; an extractor returns `None` when its field is absent or, for
//! sequences, empty, and the section is then left out of the card.

use nowyouseeme_protocol::{Visualization, VisualizationId, decode_payload, display_data_uri};
use std::fmt;

/// Number of id characters shown on a card.
pub const SHORT_ID_LEN: usize = 8;

type Extractor = fn(&Visualization) -> Option<SectionBody>;

const SECTIONS: &[(&str, Extractor)] = &[
    ("Description", |viz| text(&viz.description)),
    ("Tags", |viz| list(&viz.expression.tags)),
    ("Form", |viz| text(&viz.expression.form_type)),
    ("Reasoning", |viz| text(&viz.expression.reasoning)),
    ("Philosophy", |viz| text(&viz.expression.philosophy)),
    ("Evolution", |viz| text(&viz.expression.evolution_story)),
    ("Timeline", timeline),
    ("Mood", |viz| text(&viz.state.current_mood)),
    ("Goals", |viz| list(&viz.state.active_goals)),
    ("Thoughts", |viz| text(&viz.state.recent_thoughts)),
    ("Capabilities", |viz| list(&viz.capabilities.capabilities)),
    ("Specializations", |viz| list(&viz.capabilities.specializations)),
    ("Limitations", |viz| list(&viz.capabilities.limitations)),
    ("Inspiration", |viz| list(&viz.context.inspiration_sources)),
    ("Influences", |viz| list(&viz.context.influences)),
    ("Aspirations", |viz| list(&viz.context.aspirations)),
];

/// Display-ready projection of a [`Visualization`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: VisualizationId,
    pub short_id: String,
    pub agent_name: String,
    /// `YYYY-MM-DD HH:MM:SS` (UTC).
    pub created: String,
    /// `data:image/png;base64,...`
    pub image_uri: String,
    /// Decoded image size, `None` when the payload is not valid base64.
    pub image_len: Option<usize>,
    pub sections: Vec<CardSection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSection {
    pub title: &'static str,
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionBody {
    Text(String),
    List(Vec<String>),
    Timeline(Vec<TimelineEntry>),
}

/// One version-history entry, numbered from 1 in list order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub version: usize,
    pub timestamp: String,
    pub changes: String,
    pub reasoning: String,
}

impl From<&Visualization> for Card {
    fn from(viz: &Visualization) -> Self {
        let sections = SECTIONS
            .iter()
            .filter_map(|&(title, extract)| extract(viz).map(|body| CardSection { title, body }))
            .collect();
        Self {
            id: viz.id.clone(),
            short_id: viz.id.chars().take(SHORT_ID_LEN).collect(),
            agent_name: viz.agent_name.clone(),
            created: viz.created_at.display(),
            image_uri: display_data_uri(&viz.image_data),
            image_len: decode_payload(&viz.image_data).ok().map(|bytes| bytes.len()),
            sections,
        }
    }
}

impl Card {
    pub fn section(&self, title: &str) -> Option<&SectionBody> {
        self.sections
            .iter()
            .find(|section| section.title == title)
            .map(|section| &section.body)
    }
}

fn text(value: &Option<String>) -> Option<SectionBody> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| SectionBody::Text(value.to_string()))
}

fn list(value: &Option<Vec<String>>) -> Option<SectionBody> {
    value
        .as_ref()
        .filter(|items| !items.is_empty())
        .map(|items| SectionBody::List(items.clone()))
}

fn timeline(viz: &Visualization) -> Option<SectionBody> {
    let history = viz.expression.version_history.as_ref()?;
    if history.is_empty() {
        return None;
    }
    let entries = history
        .iter()
        .enumerate()
        .map(|(index, record)| TimelineEntry {
            version: index + 1,
            timestamp: record.timestamp.display(),
            changes: record.changes.clone(),
            reasoning: record.reasoning.clone(),
        })
        .collect();
    Some(SectionBody::Timeline(entries))
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}] {}  {}", self.short_id, self.agent_name, self.created)?;
        match self.image_len {
            Some(len) => writeln!(f, "  image: {len} bytes")?,
            None => writeln!(f, "  image: unreadable payload")?,
        }
        for section in &self.sections {
            match &section.body {
                SectionBody::Text(value) => writeln!(f, "  {}: {}", section.title, value)?,
                SectionBody::List(items) => {
                    writeln!(f, "  {}: {}", section.title, items.join(", "))?
                }
                SectionBody::Timeline(entries) => {
                    writeln!(f, "  {}:", section.title)?;
                    for entry in entries {
                        writeln!(
                            f,
                            "    v{} {} {} ({})",
                            entry.version, entry.timestamp, entry.changes, entry.reasoning
                        )?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nowyouseeme_protocol::{Timestamp, VersionRecord};
    use pretty_assertions::assert_eq;

    fn bare() -> Visualization {
        serde_json::from_value(serde_json::json!({
            "id": "0123456789abcdef",
            "agent_name": "Bot1",
            "image_data": "aGVsbG8=",
            "created_at": "2024-01-01T12:30:05Z"
        }))
        .expect("decode")
    }

    #[test]
    fn required_fields_alone_yield_a_card() {
        let card = Card::from(&bare());
        assert_eq!(card.short_id, "01234567");
        assert_eq!(card.created, "2024-01-01 12:30:05");
        assert_eq!(card.image_uri, "data:image/png;base64,aGVsbG8=");
        assert_eq!(card.image_len, Some(5));
        assert!(card.sections.is_empty());
    }

    #[test]
    fn empty_sequences_and_blank_text_are_omitted() {
        let mut viz = bare();
        viz.expression.tags = Some(Vec::new());
        viz.state.current_mood = Some("  ".to_string());
        viz.capabilities.limitations = Some(vec!["no color".to_string()]);
        viz.expression.version_history = Some(Vec::new());

        let card = Card::from(&viz);
        let titles: Vec<_> = card.sections.iter().map(|section| section.title).collect();
        assert_eq!(titles, vec!["Limitations"]);
    }

    #[test]
    fn timeline_numbers_versions_from_one() {
        let mut viz = bare();
        viz.expression.version_history = Some(vec![
            VersionRecord {
                timestamp: Timestamp::new("2024-01-01"),
                changes: "born".to_string(),
                reasoning: "first light".to_string(),
            },
            VersionRecord {
                timestamp: Timestamp::new("2024-02-01T08:00:00Z"),
                changes: "sharper edges".to_string(),
                reasoning: "clarity".to_string(),
            },
        ]);

        let card = Card::from(&viz);
        let Some(SectionBody::Timeline(entries)) = card.section("Timeline") else {
            panic!("missing timeline");
        };
        assert_eq!(entries[0].version, 1);
        assert_eq!(entries[0].timestamp, "2024-01-01 00:00:00");
        assert_eq!(entries[1].version, 2);
        assert!(card.to_string().contains("v2 2024-02-01 08:00:00 sharper edges (clarity)"));
    }

    #[test]
    fn short_id_tolerates_short_and_multibyte_ids() {
        let mut viz = bare();
        viz.id = "ab".to_string();
        assert_eq!(Card::from(&viz).short_id, "ab");
        viz.id = "ééééééééé".to_string();
        assert_eq!(Card::from(&viz).short_id, "éééééééé");
    }

    #[test]
    fn invalid_payload_still_renders() {
        let mut viz = bare();
        viz.image_data = "%%%".to_string();
        let card = Card::from(&viz);
        assert_eq!(card.image_len, None);
        assert!(card.to_string().contains("unreadable payload"));
    }
}
