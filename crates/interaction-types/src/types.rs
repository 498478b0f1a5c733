//! Core component and addressing types

use serde::{Deserialize, Serialize};

/// The user who activated a control
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Requester {
    pub id: u64,
    pub username: String,
}

/// Component type as reported by the platform
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Button,
    StringSelect,
    UserSelect,
    RoleSelect,
    ChannelSelect,
    Unknown,
}

/// Button style
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    #[default]
    Primary,
    Secondary,
    Success,
    Danger,
}

/// A button component
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Button {
    /// Identifier echoed back in the activation event
    pub custom_id: String,
    #[serde(default)]
    pub style: ButtonStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

impl Button {
    pub fn new(custom_id: impl Into<String>, style: ButtonStyle) -> Self {
        Self {
            custom_id: custom_id.into(),
            style,
            label: None,
            emoji: None,
            disabled: false,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// One option in a select menu
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub default: bool,
}

/// A select menu component
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectMenu {
    pub custom_id: String,
    #[serde(default)]
    pub options: Vec<SelectOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default = "default_min_values")]
    pub min_values: u8,
    #[serde(default = "default_max_values")]
    pub max_values: u8,
    #[serde(default)]
    pub disabled: bool,
}

fn default_min_values() -> u8 {
    1
}
fn default_max_values() -> u8 {
    1
}

/// An addressable interactive element
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Control {
    Button(Button),
    Select(SelectMenu),
}

impl Control {
    pub fn custom_id(&self) -> &str {
        match self {
            Control::Button(b) => &b.custom_id,
            Control::Select(s) => &s.custom_id,
        }
    }

    pub fn is_disabled(&self) -> bool {
        match self {
            Control::Button(b) => b.disabled,
            Control::Select(s) => s.disabled,
        }
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        match self {
            Control::Button(b) => b.disabled = disabled,
            Control::Select(s) => s.disabled = disabled,
        }
    }
}

impl From<Button> for Control {
    fn from(button: Button) -> Self {
        Control::Button(button)
    }
}

impl From<SelectMenu> for Control {
    fn from(select: SelectMenu) -> Self {
        Control::Select(select)
    }
}

/// An action row: an ordered group of controls
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ActionRow {
    #[serde(default)]
    pub components: Vec<Control>,
}

impl ActionRow {
    pub fn new(components: impl IntoIterator<Item = Control>) -> Self {
        Self {
            components: components.into_iter().collect(),
        }
    }
}

/// A caller-composed UI payload: a bare control, a row, or a list of either.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Layout {
    Single(Control),
    Row(ActionRow),
    Many(Vec<Layout>),
}

impl Layout {
    /// Marks every control carrying `custom_id` as disabled, anywhere in the
    /// tree. Returns how many controls changed state.
    pub fn disable_matching(&mut self, custom_id: &str) -> usize {
        match self {
            Layout::Single(control) => disable_if_matching(control, custom_id),
            Layout::Row(row) => row
                .components
                .iter_mut()
                .map(|c| disable_if_matching(c, custom_id))
                .sum(),
            Layout::Many(items) => items
                .iter_mut()
                .map(|item| item.disable_matching(custom_id))
                .sum(),
        }
    }
}

fn disable_if_matching(control: &mut Control, custom_id: &str) -> usize {
    if control.custom_id() == custom_id && !control.is_disabled() {
        control.set_disabled(true);
        1
    } else {
        0
    }
}

impl From<Control> for Layout {
    fn from(control: Control) -> Self {
        Layout::Single(control)
    }
}

impl From<ActionRow> for Layout {
    fn from(row: ActionRow) -> Self {
        Layout::Row(row)
    }
}

/// Token needed to answer an interaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InteractionRef {
    pub interaction_id: u64,
    pub interaction_token: String,
}

/// A previously sent message that carries a layout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageRef {
    pub channel_id: u64,
    pub message_id: u64,
}

/// Where a layout or notice should be delivered
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Destination {
    pub channel_id: u64,
    /// When set, the delivery answers this interaction instead of posting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction: Option<InteractionRef>,
}

impl Destination {
    pub fn channel(channel_id: u64) -> Self {
        Self {
            channel_id,
            interaction: None,
        }
    }
}
