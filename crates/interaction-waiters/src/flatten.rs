//! Normalizes a nested [`Layout`] into the flat list of addressable controls.

use std::collections::HashSet;

use interaction_types::{Control, Layout};

use crate::error::{Result, WaitError};

/// Flattens `layout` into its controls in input order.
///
/// Empty rows and lists contribute nothing; the call fails with
/// [`WaitError::NoControls`] only when the whole layout is empty.
pub fn flatten(layout: &Layout) -> Result<Vec<&Control>> {
    let mut controls = Vec::new();
    collect(layout, &mut controls);
    if controls.is_empty() {
        return Err(WaitError::NoControls);
    }
    Ok(controls)
}

fn collect<'a>(layout: &'a Layout, out: &mut Vec<&'a Control>) {
    match layout {
        Layout::Single(control) => out.push(control),
        Layout::Row(row) => out.extend(row.components.iter()),
        Layout::Many(items) => {
            for item in items {
                collect(item, out);
            }
        }
    }
}

/// Identifiers a waiter for `layout` should own, in layout order.
///
/// Fails with [`WaitError::DuplicateIdentifier`] when two controls share one.
pub fn owned_identifiers(layout: &Layout) -> Result<Vec<String>> {
    let controls = flatten(layout)?;
    let mut seen = HashSet::with_capacity(controls.len());
    for control in &controls {
        if !seen.insert(control.custom_id()) {
            return Err(WaitError::DuplicateIdentifier(
                control.custom_id().to_string(),
            ));
        }
    }
    Ok(controls
        .into_iter()
        .map(|c| c.custom_id().to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use interaction_types::{ActionRow, Button, ButtonStyle, SelectMenu};

    fn button(id: &str) -> Control {
        Button::new(id, ButtonStyle::Secondary).into()
    }

    fn ids(controls: &[&Control]) -> Vec<String> {
        controls.iter().map(|c| c.custom_id().to_string()).collect()
    }

    #[test]
    fn test_single_control() {
        let layout = Layout::Single(button("a"));
        let controls = flatten(&layout).unwrap();
        assert_eq!(controls.len(), 1);
        assert_eq!(*controls[0], button("a"));
    }

    #[test]
    fn test_row_keeps_order() {
        let layout = Layout::Row(ActionRow::new([button("a"), button("b"), button("c")]));
        assert_eq!(ids(&flatten(&layout).unwrap()), ["a", "b", "c"]);
    }

    #[test]
    fn test_list_concatenates_and_skips_empty_rows() {
        let layout = Layout::Many(vec![
            Layout::Row(ActionRow::new([button("a"), button("b")])),
            Layout::Single(button("c")),
            Layout::Row(ActionRow::default()),
        ]);
        assert_eq!(ids(&flatten(&layout).unwrap()), ["a", "b", "c"]);
    }

    #[test]
    fn test_nested_lists() {
        let layout = Layout::Many(vec![
            Layout::Many(vec![Layout::Single(button("x"))]),
            Layout::Many(vec![]),
            Layout::Single(
                SelectMenu {
                    custom_id: "pick".into(),
                    options: vec![],
                    placeholder: None,
                    min_values: 1,
                    max_values: 1,
                    disabled: false,
                }
                .into(),
            ),
        ]);
        assert_eq!(ids(&flatten(&layout).unwrap()), ["x", "pick"]);
    }

    #[test]
    fn test_empty_list_fails() {
        assert_eq!(
            flatten(&Layout::Many(vec![])).unwrap_err(),
            WaitError::NoControls
        );
    }

    #[test]
    fn test_empty_row_fails() {
        let layout = Layout::Row(ActionRow::default());
        assert_eq!(flatten(&layout).unwrap_err(), WaitError::NoControls);
    }

    #[test]
    fn test_owned_identifiers_rejects_duplicates() {
        let layout = Layout::Many(vec![
            Layout::Row(ActionRow::new([button("yes"), button("no")])),
            Layout::Single(button("yes")),
        ]);
        assert_eq!(
            owned_identifiers(&layout).unwrap_err(),
            WaitError::DuplicateIdentifier("yes".into())
        );
    }

    #[test]
    fn test_owned_identifiers() {
        let layout = Layout::Row(ActionRow::new([button("yes"), button("no")]));
        assert_eq!(owned_identifiers(&layout).unwrap(), ["yes", "no"]);
    }
}
