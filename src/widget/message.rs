//! Message widget: a markdown note rendered as stacked text blocks.
//!
//! Block-level markdown only: headings sized by level, paragraphs, list
//! items with a bullet prefix, thematic breaks as rules. Inline emphasis
//! flows through as plain text; a two-color panel at reading distance
//! has no use for italics.

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::RenderContext;
use crate::error::TintaError;
use crate::render::text::{HAlign, TextStyle};
use crate::render::tree::VisualNode;
use crate::widget::{RenderOutput, Widget};

/// Paragraph body size; headings scale up from here.
const BODY_PX: u32 = 16;
/// Lines per block before the wrap starts shrinking the size.
const MAX_LINES_PER_BLOCK: usize = 8;
const MIN_PX: u32 = 12;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Align {
    Left,
    #[default]
    Center,
    Right,
}

impl Align {
    fn to_halign(self) -> HAlign {
        match self {
            Align::Left => HAlign::Left,
            Align::Center => HAlign::Center,
            Align::Right => HAlign::Right,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct MessageSettings {
    text: String,
    align: Align,
}

impl Default for MessageSettings {
    fn default() -> Self {
        Self {
            text: "Hello!".into(),
            align: Align::Center,
        }
    }
}

pub struct Message;

impl Widget for Message {
    fn id(&self) -> &'static str {
        "message"
    }

    fn name(&self) -> &'static str {
        "Message"
    }

    fn default_settings(&self) -> Value {
        serde_json::to_value(MessageSettings::default()).unwrap_or_default()
    }

    fn validate(&self, settings: &Value) -> bool {
        match serde_json::from_value::<MessageSettings>(settings.clone()) {
            Ok(parsed) => !parsed.text.trim().is_empty(),
            Err(_) => false,
        }
    }

    fn render(
        &self,
        settings: &Value,
        _ctx: &RenderContext,
        _width: u32,
        _height: u32,
    ) -> Result<RenderOutput, TintaError> {
        let settings: MessageSettings = serde_json::from_value(settings.clone())
            .map_err(|e| TintaError::InvalidSettings(e.to_string()))?;

        let children = markdown_blocks(&settings.text, settings.align.to_halign());
        Ok(RenderOutput::Declarative(VisualNode::Column {
            gap: 6,
            children,
        }))
    }
}

fn heading_style(level: HeadingLevel) -> TextStyle {
    match level {
        HeadingLevel::H1 => TextStyle::bold(32),
        HeadingLevel::H2 => TextStyle::bold(24),
        _ => TextStyle::bold(BODY_PX),
    }
}

/// Fold the markdown event stream into block-level visual nodes.
fn markdown_blocks(text: &str, align: HAlign) -> Vec<VisualNode> {
    let mut nodes = Vec::new();
    let mut current = String::new();
    let mut style = TextStyle::regular(BODY_PX);

    let flush = |current: &mut String, style: TextStyle, nodes: &mut Vec<VisualNode>| {
        let content = current.trim();
        if !content.is_empty() {
            nodes.push(VisualNode::Text {
                content: content.to_string(),
                style,
                align,
                max_lines: MAX_LINES_PER_BLOCK,
                min_px: MIN_PX,
            });
        }
        current.clear();
    };

    for event in Parser::new(text) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                flush(&mut current, style, &mut nodes);
                style = heading_style(level);
            }
            Event::End(TagEnd::Heading(_)) => {
                flush(&mut current, style, &mut nodes);
                style = TextStyle::regular(BODY_PX);
            }
            Event::Start(Tag::Item) => {
                flush(&mut current, style, &mut nodes);
                current.push_str("\u{2022} ");
            }
            Event::End(TagEnd::Item) | Event::End(TagEnd::Paragraph) => {
                flush(&mut current, style, &mut nodes);
            }
            Event::Text(t) | Event::Code(t) => current.push_str(&t),
            Event::SoftBreak => current.push(' '),
            Event::HardBreak => flush(&mut current, style, &mut nodes),
            Event::Rule => {
                flush(&mut current, style, &mut nodes);
                nodes.push(VisualNode::Rule { thickness: 2 });
            }
            _ => {}
        }
    }
    flush(&mut current, style, &mut nodes);
    nodes
}
