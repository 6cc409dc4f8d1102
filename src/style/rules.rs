use std::fmt;

use serde_json::{Map, Value};

use crate::config::StyleConfig;
use crate::error::ViewError;
use crate::network::{Attributed, ElementKind};
use crate::util::format_threshold;

use super::classes::thresholds;
use super::range::{numeric_value, value_range};

pub const WEIGHT_ATTRIBUTE: &str = "weight";
pub const STAKE_ATTRIBUTE: &str = "stake";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    GreaterThan,
}

impl Comparison {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::GreaterThan => ">",
        }
    }

    pub fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            Self::GreaterThan => value > threshold,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Predicate {
    pub attribute: String,
    pub comparison: Comparison,
    pub threshold: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Selector {
    pub kind: ElementKind,
    pub predicate: Option<Predicate>,
}

impl Selector {
    pub fn all(kind: ElementKind) -> Self {
        Self {
            kind,
            predicate: None,
        }
    }

    pub fn greater_than(kind: ElementKind, attribute: &str, threshold: f64) -> Self {
        Self {
            kind,
            predicate: Some(Predicate {
                attribute: attribute.to_string(),
                comparison: Comparison::GreaterThan,
                threshold,
            }),
        }
    }

    /// An element lacking the predicate's attribute never matches it.
    pub fn matches<T: Attributed>(&self, kind: ElementKind, item: &T) -> Result<bool, ViewError> {
        if self.kind != kind {
            return Ok(false);
        }
        let Some(predicate) = &self.predicate else {
            return Ok(true);
        };

        let value = numeric_value(&predicate.attribute, item.attribute(&predicate.attribute))?;
        Ok(value.is_some_and(|value| predicate.comparison.holds(value, predicate.threshold)))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.label())?;
        if let Some(predicate) = &self.predicate {
            write!(
                f,
                "[{} {} {}]",
                predicate.attribute,
                predicate.comparison.symbol(),
                format_threshold(predicate.threshold)
            )?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum StyleProperty {
    BackgroundColor(String),
    Label(String),
    /// Node width, or stroke width on edges.
    Width(u32),
    Height(u32),
}

impl StyleProperty {
    pub fn name(&self) -> &'static str {
        match self {
            Self::BackgroundColor(_) => "background-color",
            Self::Label(_) => "label",
            Self::Width(_) => "width",
            Self::Height(_) => "height",
        }
    }

    pub fn value(&self) -> Value {
        match self {
            Self::BackgroundColor(text) | Self::Label(text) => Value::String(text.clone()),
            Self::Width(size) | Self::Height(size) => Value::from(*size),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StyleRule {
    pub selector: Selector,
    pub properties: Vec<StyleProperty>,
}

impl StyleRule {
    pub fn style_map(&self) -> Map<String, Value> {
        self.properties
            .iter()
            .map(|property| (property.name().to_string(), property.value()))
            .collect()
    }
}

/// Rules applied to every element before the generated classes.
pub fn base_rules(style: &StyleConfig) -> Vec<StyleRule> {
    vec![StyleRule {
        selector: Selector::all(ElementKind::Node),
        properties: vec![
            StyleProperty::BackgroundColor(style.node_color.clone()),
            StyleProperty::Label("data(label)".to_string()),
        ],
    }]
}

/// One rule per weight class, lowest threshold first, width = 1-based class position.
///
/// An edge without a weight matches none of these rules and keeps the base edge style.
pub fn edge_width_rules<T: Attributed>(edges: &[T], class_count: usize) -> Result<Vec<StyleRule>, ViewError> {
    let range = value_range(edges, WEIGHT_ATTRIBUTE)?;
    let breakpoints = thresholds(range.min(), range.max(), class_count)?;

    Ok(breakpoints
        .into_iter()
        .zip(1u32..)
        .map(|(threshold, width)| StyleRule {
            selector: Selector::greater_than(ElementKind::Edge, WEIGHT_ATTRIBUTE, threshold),
            properties: vec![StyleProperty::Width(width)],
        })
        .collect())
}

/// One rule per palette entry over the stake range, growing by `size_step` per class.
pub fn node_appearance_rules<T: Attributed>(
    nodes: &[T],
    palette: &[String],
    base_size: u32,
    size_step: u32,
) -> Result<Vec<StyleRule>, ViewError> {
    let range = value_range(nodes, STAKE_ATTRIBUTE)?;
    let breakpoints = thresholds(range.min(), range.max(), palette.len())?;

    Ok(breakpoints
        .into_iter()
        .zip(palette)
        .zip(1u32..)
        .map(|((threshold, color), class)| {
            let size = base_size.saturating_add(size_step.saturating_mul(class));
            StyleRule {
                selector: Selector::greater_than(ElementKind::Node, STAKE_ATTRIBUTE, threshold),
                properties: vec![
                    StyleProperty::BackgroundColor(color.clone()),
                    StyleProperty::Width(size),
                    StyleProperty::Height(size),
                ],
            }
        })
        .collect())
}

/// Applies every matching rule in order; the last rule to set a property wins.
pub fn resolve<T: Attributed>(
    rules: &[StyleRule],
    kind: ElementKind,
    item: &T,
) -> Result<Map<String, Value>, ViewError> {
    let mut resolved = Map::new();
    for rule in rules {
        if rule.selector.matches(kind, item)? {
            for property in &rule.properties {
                resolved.insert(property.name().to_string(), property.value());
            }
        }
    }
    Ok(resolved)
}
