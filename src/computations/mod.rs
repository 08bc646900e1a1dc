use crate::error::GSError;
use itertools::Itertools;
use log::info;
use lp_api::NodeId;
use std::collections::BTreeMap;

pub mod dedup;
pub mod engine;
pub mod iterate;
pub mod reference;
pub mod wcc;

#[cfg(test)]
mod tests;

pub type Labels = BTreeMap<NodeId, NodeId>;

/// Checks that two label maps agree on every node, logging a few examples of each kind of
/// difference otherwise.
pub fn compare_labels(
    left_name: &str,
    left: &Labels,
    right_name: &str,
    right: &Labels,
) -> Result<(), GSError> {
    info!("Checking {} labels against {} labels...", left_name, right_name);
    let print_count = 3;

    let mismatched = left
        .iter()
        .filter_map(|(node, label)| match right.get(node) {
            Some(other) if other != label => Some((*node, *label, *other)),
            _ => None,
        })
        .collect_vec();
    let missing_right = left.keys().filter(|node| !right.contains_key(node)).collect_vec();
    let missing_left = right.keys().filter(|node| !left.contains_key(node)).collect_vec();

    if !mismatched.is_empty() {
        info!(
            "{} nodes have different labels [e.g.: {:?}] as (node, {}, {})",
            mismatched.len(),
            mismatched.iter().take(print_count).collect_vec(),
            left_name,
            right_name
        );
    }
    if !missing_right.is_empty() {
        info!(
            "{} nodes [e.g.: {:?}] not present in {} labels",
            missing_right.len(),
            missing_right.iter().take(print_count).collect_vec(),
            right_name
        );
    }
    if !missing_left.is_empty() {
        info!(
            "{} nodes [e.g.: {:?}] not present in {} labels",
            missing_left.len(),
            missing_left.iter().take(print_count).collect_vec(),
            left_name
        );
    }

    if mismatched.is_empty() && missing_right.is_empty() && missing_left.is_empty() {
        info!("Results match");
        Ok(())
    } else {
        Err(GSError::ResultsMismatch)
    }
}
