//! Form control value property
//!
//! `value` is a property, not an attribute: assigning it never touches the
//! markup. Until assigned, form controls report a default derived from their
//! attributes or content; other elements have no value at all.

use crate::{DomError, DomResult, DomTree, NodeId};

impl DomTree {
    /// Current `value` property of an element
    pub fn value(&self, id: NodeId) -> Option<String> {
        let element = self.element(id)?;
        if let Some(value) = &element.value {
            return Some(value.clone());
        }

        match element.tag_name() {
            "input" | "data" => Some(element.get_attr("value").unwrap_or_default().to_string()),
            "meter" | "progress" => Some(element.get_attr("value").unwrap_or("0").to_string()),
            "option" => Some(self.option_value(id)),
            "textarea" | "output" => Some(self.text_content(id)),
            "select" => Some(
                self.selected_option(id)
                    .map(|option| self.option_value(option))
                    .unwrap_or_default(),
            ),
            _ => None,
        }
    }

    /// Assign the `value` property of an element
    pub fn set_value(&mut self, id: NodeId, value: &str) -> DomResult<()> {
        match self.get_mut(id) {
            Some(node) => {
                let element = node.as_element_mut().ok_or(DomError::NotAnElement(id))?;
                element.value = Some(value.to_string());
                Ok(())
            }
            None => Err(DomError::NotFound(id)),
        }
    }

    /// Copy assigned `value` properties into markup
    ///
    /// `input`, `data`, `meter` and `progress` get a `value` attribute,
    /// `textarea` and `output` get the value as text, and a `<select>` marks
    /// the first matching option `selected`. Returns how many elements
    /// changed.
    pub fn reflect_values(&mut self) -> DomResult<usize> {
        let assigned: Vec<(NodeId, String)> = (0..self.len())
            .map(|index| NodeId(index as u32))
            .filter_map(|id| Some((id, self.element(id)?.value.clone()?)))
            .collect();

        let mut reflected = 0;
        for (id, value) in assigned {
            match self.tag_name(id) {
                Some("input" | "data" | "meter" | "progress") => {
                    self.set_attribute(id, "value", &value)?;
                }
                Some("textarea" | "output") => self.set_text_content(id, &value)?,
                Some("select") => {
                    if !self.select_option(id, &value) {
                        tracing::debug!("no option of {} has value {:?}", id, value);
                        continue;
                    }
                }
                _ => continue,
            }
            reflected += 1;
        }
        Ok(reflected)
    }

    /// Mark the first option carrying `value` as the only selected one
    fn select_option(&mut self, select: NodeId, value: &str) -> bool {
        let options: Vec<NodeId> = self
            .descendant_elements(select)
            .filter(|&option| self.tag_name(option) == Some("option"))
            .collect();
        let Some(chosen) = options.iter().copied().find(|&option| self.option_value(option) == value) else {
            return false;
        };
        for option in options {
            if let Some(element) = self.element_mut(option) {
                if option == chosen {
                    element.set_attr("selected", "");
                } else {
                    element.remove_attr("selected");
                }
            }
        }
        true
    }

    /// Selected `<option>` of a `<select>`: first with `selected`, else first
    pub fn selected_option(&self, select: NodeId) -> Option<NodeId> {
        let mut first = None;
        for option in self.descendant_elements(select) {
            if self.tag_name(option) != Some("option") {
                continue;
            }
            if self.has_attribute(option, "selected") {
                return Some(option);
            }
            first.get_or_insert(option);
        }
        first
    }

    fn option_value(&self, option: NodeId) -> String {
        match self.get_attribute(option, "value") {
            Some(value) => value.to_string(),
            None => self
                .text_content(option)
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}
