//! Poll Rendering
//!
//! Lays a [`PollSnapshot`] out as an embed plus button rows, the shape chat
//! platforms use for interactive messages.

use super::event::{ComponentAction, TOGGLE_CUSTOM_ID};
use crate::polls::{ChoiceTally, PollSnapshot};
use serde::{Deserialize, Serialize};

/// Embed accent color
pub const POLL_COLOR: u32 = 0x40639a;

/// Buttons per action row
pub const BUTTONS_PER_ROW: usize = 5;

/// Field value shown while results are masked
pub const MASKED_VALUE: &str = "-";

/// Rendered poll message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPoll {
    pub message_id: String,
    pub embed: PollEmbed,
    pub components: Vec<ActionRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollEmbed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub footer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRow {
    pub buttons: Vec<Button>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    Primary,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub custom_id: String,
    pub style: ButtonStyle,
    pub disabled: bool,
}

/// Render a snapshot. Choice buttons are disabled while the poll is closed;
/// the toggle button never is.
pub fn render_poll(snapshot: &PollSnapshot) -> RenderedPoll {
    let fields = snapshot
        .choices
        .iter()
        .map(|tally| EmbedField {
            name: tally.label.clone(),
            value: field_value(tally, snapshot.masked),
            inline: true,
        })
        .collect();

    let embed = PollEmbed {
        title: snapshot.title.clone(),
        description: snapshot.description.clone(),
        color: POLL_COLOR,
        fields,
        footer: format!("Due: {}", snapshot.due_at.format("%d %b %y %H:%M UTC")),
    };

    let mut components: Vec<ActionRow> = snapshot
        .choices
        .chunks(BUTTONS_PER_ROW)
        .enumerate()
        .map(|(row, chunk)| ActionRow {
            buttons: chunk
                .iter()
                .enumerate()
                .map(|(col, tally)| Button {
                    label: tally.label.clone(),
                    custom_id: ComponentAction::choice_custom_id(row * BUTTONS_PER_ROW + col),
                    style: ButtonStyle::Primary,
                    disabled: snapshot.is_closed,
                })
                .collect(),
        })
        .collect();

    components.push(ActionRow {
        buttons: vec![Button {
            label: "Close / Reopen".to_string(),
            custom_id: TOGGLE_CUSTOM_ID.to_string(),
            style: ButtonStyle::Danger,
            disabled: false,
        }],
    });

    RenderedPoll {
        message_id: snapshot.id.clone(),
        embed,
        components,
    }
}

// Masking hides voter identities as well as counts.
fn field_value(tally: &ChoiceTally, masked: bool) -> String {
    if masked {
        return MASKED_VALUE.to_string();
    }
    let mut value = format!("**{} votes, {}%**", tally.count, tally.percentage);
    if let Some(voters) = tally.voters.as_ref().filter(|v| !v.is_empty()) {
        let mentions: Vec<String> = voters.iter().map(|id| format!("<@{id}>")).collect();
        value.push('\n');
        value.push_str(&mentions.join(", "));
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polls::{PollEngine, PollPolicy, PollRequest};
    use chrono::{TimeZone, Utc};

    fn engine_with(choices: usize, policy: PollPolicy) -> PollEngine {
        let engine = PollEngine::new();
        let labels = (0..choices).map(|i| format!("C{i}")).collect();
        let due = Utc.with_ymd_and_hms(2024, 7, 1, 18, 30, 0).unwrap();
        engine
            .create_poll(
                PollRequest::new("m1", "Title", labels, "owner", due)
                    .with_description("Desc")
                    .with_policy(policy),
            )
            .unwrap();
        engine
    }

    #[test]
    fn test_render_counts_and_mentions() {
        let engine = engine_with(2, PollPolicy::default());
        engine.cast_or_retract("m1", 0, "111").unwrap();
        engine.cast_or_retract("m1", 0, "222").unwrap();
        engine.cast_or_retract("m1", 1, "333").unwrap();
        let rendered = render_poll(&engine.snapshot("m1").unwrap());

        assert_eq!(rendered.message_id, "m1");
        assert_eq!(rendered.embed.title, "Title");
        assert_eq!(rendered.embed.color, POLL_COLOR);
        assert_eq!(rendered.embed.footer, "Due: 01 Jul 24 18:30 UTC");
        assert_eq!(rendered.embed.fields[0].value, "**2 votes, 66%**\n<@111>, <@222>");
        assert_eq!(rendered.embed.fields[1].value, "**1 votes, 33%**\n<@333>");
    }

    #[test]
    fn test_render_empty_and_anonymous() {
        let engine = engine_with(2, PollPolicy::default().anonymous(true));
        let rendered = render_poll(&engine.snapshot("m1").unwrap());
        assert_eq!(rendered.embed.fields[0].value, "**0 votes, 0%**");

        engine.cast_or_retract("m1", 1, "111").unwrap();
        let rendered = render_poll(&engine.snapshot("m1").unwrap());
        assert_eq!(rendered.embed.fields[1].value, "**1 votes, 100%**");
    }

    #[test]
    fn test_render_masked_until_closed() {
        let engine = engine_with(2, PollPolicy::default().mask_results(true));
        engine.cast_or_retract("m1", 0, "111").unwrap();
        let rendered = render_poll(&engine.snapshot("m1").unwrap());
        assert!(rendered.embed.fields.iter().all(|f| f.value == MASKED_VALUE));

        engine.toggle_poll("m1", "owner").unwrap();
        let rendered = render_poll(&engine.snapshot("m1").unwrap());
        assert_eq!(rendered.embed.fields[0].value, "**1 votes, 100%**\n<@111>");
    }

    #[test]
    fn test_button_layout() {
        let engine = engine_with(12, PollPolicy::default());
        let rendered = render_poll(&engine.snapshot("m1").unwrap());

        let sizes: Vec<usize> = rendered.components.iter().map(|r| r.buttons.len()).collect();
        assert_eq!(sizes, vec![5, 5, 2, 1]);
        assert_eq!(rendered.components[1].buttons[0].custom_id, "choice_5");
        assert_eq!(rendered.components[2].buttons[1].custom_id, "choice_11");
        let toggle = &rendered.components[3].buttons[0];
        assert_eq!(toggle.custom_id, "toggle");
        assert_eq!(toggle.style, ButtonStyle::Danger);
    }

    #[test]
    fn test_closed_poll_disables_choice_buttons_only() {
        let engine = engine_with(3, PollPolicy::default());
        engine.toggle_poll("m1", "owner").unwrap();
        let rendered = render_poll(&engine.snapshot("m1").unwrap());

        let (toggle_row, choice_rows) = rendered.components.split_last().unwrap();
        assert!(choice_rows.iter().flat_map(|r| &r.buttons).all(|b| b.disabled));
        assert!(!toggle_row.buttons[0].disabled);
    }
}
