//! CSV diagnostics for the scheduling artifacts.
//!
//! Human-diff-able dumps of the precedence graph and the placement table,
//! written through any `io::Write`. The format is for inspection only and
//! is not version-stable.

use grani_ir::Event;
use std::io::{self, Write};

use crate::ldpg::LogicalDataPrecedenceGraph;
use crate::pdpt::PhysicalDataPrecedenceTable;

/// Dump the precedence graph: a vertex table followed by an edge list.
pub fn dump_ldpg<W: Write>(ldpg: &LogicalDataPrecedenceGraph, out: &mut W) -> io::Result<()> {
    writeln!(out, "vertex,label,depth,latency,priority")?;
    for (position, &node) in ldpg.order().iter().enumerate() {
        let data = ldpg.node(node);
        writeln!(
            out,
            "{position},{},{},{},{}",
            data.event.label(),
            data.depth,
            data.latency,
            data.priority
        )?;
    }

    // Map node indices back to schedule positions for stable output.
    let position_of = |needle| {
        ldpg.order()
            .iter()
            .position(|&node| node == needle)
            .unwrap_or(usize::MAX)
    };
    writeln!(out, "from,to")?;
    for edge in ldpg.graph().edge_indices() {
        let (from, to) = ldpg.graph().edge_endpoints(edge).expect("edge exists");
        writeln!(out, "{},{}", position_of(from), position_of(to))?;
    }
    Ok(())
}

/// Dump the placement table: one CSV line per physical qubit, one field
/// per time step. Occupied cells read `p<row>::<label>`, with a `*`
/// marking the control row of a controlled operation.
pub fn dump_pdpt<W: Write>(pdpt: &PhysicalDataPrecedenceTable, out: &mut W) -> io::Result<()> {
    let columns = pdpt.num_columns();
    for row in 0..pdpt.num_rows() {
        let mut fields = vec![format!("p{row}")];
        for column in 0..columns {
            let field = match pdpt.cell(row, column) {
                Some(placement) => {
                    let marker = match control_of(&placement.event) {
                        Some(control) if control == row as u32 => "*",
                        _ => "",
                    };
                    format!("p{row}::{}{marker}", placement.event.label())
                }
                None => String::new(),
            };
            fields.push(field);
        }
        writeln!(out, "{}", fields.join(","))?;
    }
    Ok(())
}

/// The control qubit of a (possibly conditioned) controlled operation.
fn control_of(event: &Event) -> Option<u32> {
    match event {
        Event::ControlledGate { control, .. } => Some(control.0),
        Event::If { inner, .. } => control_of(inner),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grani_hal::ConstantLatency;
    use grani_ir::{GateOp, LinearSchedule, QubitId};

    #[test]
    fn test_ldpg_dump_lists_vertices_and_edges() {
        let schedule: LinearSchedule = [
            Event::gate(GateOp::named("h"), [QubitId(0)]),
            Event::controlled(GateOp::named("x"), QubitId(0), [QubitId(1)]),
        ]
        .into_iter()
        .collect();
        let ldpg = LogicalDataPrecedenceGraph::build(&schedule, &ConstantLatency(1));

        let mut buffer = Vec::new();
        dump_ldpg(&ldpg, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.contains("0,h,1,1,2"));
        assert!(text.contains("1,cx,2,1,1"));
        assert!(text.contains("\n0,1\n"));
    }

    #[test]
    fn test_pdpt_dump_marks_control_row() {
        let mut pdpt = PhysicalDataPrecedenceTable::new(2);
        pdpt.place(
            Event::controlled(GateOp::named("x"), QubitId(0), [QubitId(1)]),
            &[0, 1],
            0,
            false,
        );

        let mut buffer = Vec::new();
        dump_pdpt(&pdpt, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.contains("p0,p0::cx*"));
        assert!(text.contains("p1,p1::cx"));
        assert!(!text.contains("p1::cx*"));
    }

    #[test]
    fn test_pdpt_dump_pads_empty_cells() {
        let mut pdpt = PhysicalDataPrecedenceTable::new(2);
        pdpt.place(Event::gate(GateOp::named("h"), [QubitId(0)]), &[0], 0, false);
        pdpt.place(Event::gate(GateOp::named("x"), [QubitId(0)]), &[0], 1, false);

        let mut buffer = Vec::new();
        dump_pdpt(&pdpt, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        // Row 1 has no placements but still spans both columns.
        assert!(text.contains("p1,,\n"));
    }
}
