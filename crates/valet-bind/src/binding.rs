//! Moving records in and out of scope elements

use std::collections::HashMap;

use valet_dom::{DomResult, DomTree, NodeId};

use crate::{AccessorRegistry, BindConfig, FieldValue, ID_FIELD, Record, TYPE_FIELD, TreeScanner, WriteDistribution};

/// Build the record shown by `scope`
///
/// Same-named properties accumulate into a sequence in document order.
/// Properties whose accessor yields nothing are left out.
pub fn read_scope(
    tree: &DomTree,
    scope: NodeId,
    config: &BindConfig,
    accessors: &AccessorRegistry,
) -> Record {
    let markers = &config.markers;
    let scanner = TreeScanner::new(markers);
    let mut record = Record::new();

    if let Some(id) = tree.get_attribute(scope, &markers.id) {
        record.set(ID_FIELD, id);
    }
    if let Some(type_name) = tree.get_attribute(scope, &markers.type_name) {
        record.set(TYPE_FIELD, type_name);
    }

    for property in scanner.properties(tree, scope) {
        let Some(name) = scanner.property_name(tree, property) else {
            continue;
        };
        if let Some(value) = accessors.read(tree, property) {
            record.accumulate(name, FieldValue::Scalar(value));
        }
    }
    record
}

/// Push `record` into every property element of `scope`
///
/// Fields missing from `record` clear their elements. A property that is
/// itself a scope is written like any other property, so under the default
/// accessor its children, nested scope markup included, are replaced by the
/// text value.
pub fn write_scope(
    tree: &mut DomTree,
    scope: NodeId,
    record: &Record,
    config: &BindConfig,
    accessors: &AccessorRegistry,
) -> DomResult<()> {
    let markers = &config.markers;
    let scanner = TreeScanner::new(markers);

    if config.sync_identity {
        if let Some(id) = record.id().filter(|id| !id.is_empty()) {
            tree.set_attribute(scope, &markers.id, id)?;
        }
        if let Some(type_name) = record.type_name().filter(|t| !t.is_empty()) {
            tree.set_attribute(scope, &markers.type_name, type_name)?;
        }
    }

    let properties: Vec<(NodeId, String)> = scanner
        .properties(tree, scope)
        .into_iter()
        .filter_map(|node| Some((node, scanner.property_name(tree, node)?.to_string())))
        .collect();

    let mut positions: HashMap<&str, usize> = HashMap::new();
    for (node, name) in &properties {
        let value = record.get(name);
        let scalar = match config.distribution {
            WriteDistribution::Broadcast => value.map(FieldValue::to_scalar),
            WriteDistribution::Positional => {
                let position = positions.entry(name.as_str()).or_default();
                let scalar = value.and_then(|v| v.values().get(*position).cloned());
                *position += 1;
                scalar
            }
        };
        accessors.write(tree, *node, scalar.as_deref())?;
    }
    Ok(())
}
