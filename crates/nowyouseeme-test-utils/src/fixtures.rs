use nowyouseeme_protocol::{Timestamp, Visualization};
use std::path::{Path, PathBuf};

/// A complete 1x1 transparent PNG.
pub const PNG_1X1: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// A record carrying only the required fields.
pub fn visualization(id: &str, agent_name: &str, created_at: &str) -> Visualization {
    Visualization {
        id: id.to_string(),
        agent_name: agent_name.to_string(),
        description: None,
        image_data: "aVZCT1J3MEtHZ289".to_string(),
        created_at: Timestamp::new(created_at),
        updated_at: None,
        expression: Default::default(),
        state: Default::default(),
        capabilities: Default::default(),
        context: Default::default(),
    }
}

/// Write [`PNG_1X1`] into `dir` and return its path.
pub fn write_png(dir: &Path) -> PathBuf {
    let path = dir.join("portrait.png");
    std::fs::write(&path, PNG_1X1).expect("write png fixture");
    path
}
