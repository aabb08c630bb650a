use crate::{env::GridState, table::QTable};

/// Render one text heatmap per action over a learned table
///
/// A pure, read-only consumer of the table: each action gets a titled
/// `grid_size` x `grid_size` block of `%.2f` values in row-major order, with
/// the goal cell masked as `G` and hazard cells masked as `H` instead of
/// their (meaningless) values. Labels are taken in action-index order;
/// missing labels fall back to the index.
pub fn render_heatmaps(
    table: &QTable,
    goal: GridState,
    hazards: &[GridState],
    labels: &[&str],
) -> String {
    let (rows, cols, actions) = table.shape();
    let mut out = String::new();

    for action in 0..actions {
        match labels.get(action) {
            Some(label) => out.push_str(&format!("Action: {label}\n")),
            None => out.push_str(&format!("Action: {action}\n")),
        }
        for row in 0..rows {
            for col in 0..cols {
                if (row, col) == goal {
                    out.push_str("      G");
                } else if hazards.contains(&(row, col)) {
                    out.push_str("      H");
                } else {
                    out.push_str(&format!("{:7.2}", table.get((row, col), action)));
                }
            }
            out.push('\n');
        }
        out.push('\n');
    }

    out
}
