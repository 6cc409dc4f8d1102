mod classes;
mod range;
mod rules;

pub use range::{ValueRange, value_range};
pub use rules::{
    STAKE_ATTRIBUTE, StyleRule, WEIGHT_ATTRIBUTE, base_rules, edge_width_rules,
    node_appearance_rules, resolve,
};
