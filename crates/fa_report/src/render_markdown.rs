//! Markdown: a `| Player | Faction |` table, then the leftover pool and,
//! when known, the run ids.

use std::fmt::Write as _;

use crate::ReportModel;

/// Pipes and backslashes would break the table.
fn cell(s: &str) -> String {
    s.replace('\\', "\\\\").replace('|', "\\|")
}

pub fn render_markdown(m: &ReportModel) -> String {
    let mut out = String::from("| Player | Faction |\n|---|---|\n");
    for row in &m.rows {
        let faction = row.faction.as_deref().map(cell).unwrap_or_else(|| "_unassigned_".into());
        let _ = writeln!(out, "| {} | {} |", cell(&row.player), faction);
    }

    if !m.leftover.is_empty() {
        let _ = write!(out, "\nUnclaimed: {}\n", m.leftover.join(", "));
    }
    if let Some(i) = &m.integrity {
        let _ = write!(
            out,
            "\n`{}` · `{}` · seed `{}` · input sha256 `{}`\n",
            i.assignment_id, i.run_id, i.tie_seed, i.input_sha256
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_model, fixtures};

    #[test]
    fn table_then_footer() {
        let m = build_model(&fixtures::assignment(), Some(&fixtures::run())).unwrap();
        let md = render_markdown(&m);
        assert!(md.starts_with("| Player | Faction |\n|---|---|\n| Alice | Atreides |\n"));
        assert!(md.contains("| Cy | _unassigned_ |\n"));
        assert!(md.contains("Unclaimed: Emperor, Bene Gesserit\n"));
        assert!(md.contains("seed `42`"));
    }

    #[test]
    fn pipes_in_names_are_escaped() {
        assert_eq!(cell("a|b"), "a\\|b");
    }
}
