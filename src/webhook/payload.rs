//! Chat card message payload

use serde::{Deserialize, Serialize};

pub const DEFAULT_CARD_TITLE: &str = "Obsidian";
pub const DEFAULT_CARD_IMAGE_URL: &str = "https://obsidian.md/images/2023-06-logo.png";
pub const CARD_SUBTITLE: &str = "Task is due!";

/// Static parts of the card header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardStyle {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_image_url")]
    pub image_url: String,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            title: default_title(),
            image_url: default_image_url(),
        }
    }
}

fn default_title() -> String {
    DEFAULT_CARD_TITLE.to_string()
}

fn default_image_url() -> String {
    DEFAULT_CARD_IMAGE_URL.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub thread: Thread,
    #[serde(rename = "cardsV2")]
    pub cards_v2: Vec<CardWithId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub thread_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardWithId {
    pub card_id: String,
    pub card: Card,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub header: CardHeader,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardHeader {
    pub title: String,
    pub subtitle: String,
    pub image_url: String,
    pub image_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub header: String,
    pub widgets: Vec<Widget>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub text_paragraph: TextParagraph,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextParagraph {
    pub text: String,
}

impl ChatMessage {
    /// Card announcing that `content` was due at `due_iso`. The thread key and
    /// card id are both `<content>-<due_iso>`, so repeated sends for the same
    /// reminder land in the same thread.
    pub fn due_reminder(content: &str, due_iso: &str, style: &CardStyle) -> Self {
        let key = format!("{}-{}", content, due_iso);
        Self {
            thread: Thread {
                thread_key: key.clone(),
            },
            cards_v2: vec![CardWithId {
                card_id: key,
                card: Card {
                    header: CardHeader {
                        title: style.title.clone(),
                        subtitle: CARD_SUBTITLE.to_string(),
                        image_url: style.image_url.clone(),
                        image_type: "CIRCLE".to_string(),
                    },
                    sections: vec![Section {
                        header: due_iso.to_string(),
                        widgets: vec![Widget {
                            text_paragraph: TextParagraph {
                                text: content.to_string(),
                            },
                        }],
                    }],
                },
            }],
        }
    }
}
