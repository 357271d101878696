//! JSON renderer. Sections: `assignments`, `unassigned`, `leftover` and,
//! with a run record, `integrity`. Key order in the output is not part of
//! the format.

use serde_json::{json, Map as JsonMap, Value};

use crate::ReportModel;

pub fn render_json(m: &ReportModel) -> Value {
    let mut root = JsonMap::new();

    let rows: Vec<Value> = m
        .rows
        .iter()
        .map(|r| json!({ "player": r.player, "faction": r.faction }))
        .collect();
    root.insert("assignments".into(), Value::Array(rows));
    root.insert("unassigned".into(), json!(m.unassigned));
    root.insert("leftover".into(), json!(m.leftover));

    if let Some(i) = &m.integrity {
        root.insert(
            "integrity".into(),
            json!({
                "assignment_id": i.assignment_id,
                "run_id": i.run_id,
                "input_sha256": i.input_sha256,
                "tie_seed": i.tie_seed,
            }),
        );
    }
    Value::Object(root)
}
