//! Plain text: one `Player: Faction` line per player, in model order.

use crate::ReportModel;

pub const UNASSIGNED: &str = "(unassigned)";

pub fn render_text(m: &ReportModel) -> String {
    let mut out = String::new();
    for row in &m.rows {
        out.push_str(&row.player);
        out.push_str(": ");
        out.push_str(row.faction.as_deref().unwrap_or(UNASSIGNED));
        out.push('\n');
    }
    out
}
