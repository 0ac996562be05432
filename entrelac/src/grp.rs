//! Line-oriented `.grp` graph files.
//!
//! ```text
//! # ---------- nodes ----------
//! n0=[0;0]
//! n1=[10;0]
//! # ---------- arcs ----------
//! n0 -> n1
//! ```
//!
//! `nK` numbers are local to one file; they are not node identities.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use crate::error::GrpError;
use crate::geometry::limits;
use crate::model::{NodeId, Point};
use crate::Graph;

pub const NODES_HEADER: &str = "# ---------- nodes ----------";
pub const ARCS_HEADER: &str = "# ---------- arcs ----------";

pub fn parse_into<R: BufRead>(g: &mut Graph, input: R) -> Result<(), GrpError> {
    g.clear();
    let res = read_lines(g, input);
    if res.is_err() {
        g.clear();
    }
    res
}

fn read_lines<R: BufRead>(g: &mut Graph, input: R) -> Result<(), GrpError> {
    let mut refs: HashMap<u32, NodeId> = HashMap::new();
    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.contains('=') {
            let (reference, pos) = parse_node_decl(line, line_no)?;
            if g.node_count() >= limits::MAX_NODES {
                return Err(GrpError::TooLarge { what: "node", limit: limits::MAX_NODES });
            }
            // A repeated number rebinds to the newest node; earlier arcs keep the old one.
            refs.insert(reference, g.add_node(pos));
        } else {
            let (src, dst) = parse_arc_decl(line, line_no)?;
            let resolve = |reference: u32| {
                refs.get(&reference)
                    .copied()
                    .ok_or(GrpError::UnknownNodeRef { line: line_no, reference })
            };
            let (a, b) = (resolve(src)?, resolve(dst)?);
            if g.arc_count() >= limits::MAX_ARCS {
                return Err(GrpError::TooLarge { what: "arc", limit: limits::MAX_ARCS });
            }
            g.connect(a, b).ok_or(GrpError::UnknownNodeRef { line: line_no, reference: src })?;
        }
    }
    log::debug!("parsed graph: {} nodes, {} arcs", g.node_count(), g.arc_count());
    Ok(())
}

fn parse_ref(text: &str) -> Option<u32> {
    text.trim().strip_prefix('n')?.trim().parse().ok()
}

fn parse_coord(text: &str, line: usize) -> Result<f64, GrpError> {
    let bad = || GrpError::BadCoordinate { line, text: text.to_string() };
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite()).ok_or_else(bad)
}

/// `nID=[X;Y]`
fn parse_node_decl(line: &str, line_no: usize) -> Result<(u32, Point), GrpError> {
    let malformed = || GrpError::MalformedNode { line: line_no, text: line.to_string() };
    let (lhs, rhs) = line.split_once('=').ok_or_else(malformed)?;
    if rhs.contains('=') {
        return Err(malformed());
    }
    let reference = parse_ref(lhs).ok_or_else(malformed)?;
    let inner = rhs
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(malformed)?;
    let fields: Vec<&str> = inner.split(';').collect();
    let [x, y] = fields.as_slice() else {
        return Err(malformed());
    };
    Ok((reference, Point::new(parse_coord(x, line_no)?, parse_coord(y, line_no)?)))
}

/// `nSRC -> nDST`
fn parse_arc_decl(line: &str, line_no: usize) -> Result<(u32, u32), GrpError> {
    let malformed = || GrpError::MalformedArc { line: line_no, text: line.to_string() };
    let (lhs, rhs) = line.split_once("->").ok_or_else(malformed)?;
    if rhs.contains("->") {
        return Err(malformed());
    }
    let src = parse_ref(lhs).ok_or_else(malformed)?;
    let dst = parse_ref(rhs).ok_or_else(malformed)?;
    Ok((src, dst))
}

/// Renders nodes numbered `n0..` in creation order, then the arcs between them.
pub fn to_grp_text(g: &Graph) -> String {
    let mut refs: HashMap<NodeId, usize> = HashMap::with_capacity(g.node_count());
    let mut text = String::new();
    text.push_str(NODES_HEADER);
    text.push('\n');
    for (k, n) in g.nodes().enumerate() {
        refs.insert(n.id(), k);
        let p = n.position();
        text.push_str(&format!("n{}=[{};{}]\n", k, p.x, p.y));
    }
    text.push_str(ARCS_HEADER);
    text.push('\n');
    for a in g.arcs() {
        if let (Some(s), Some(d)) = (refs.get(&a.src()), refs.get(&a.dst())) {
            text.push_str(&format!("n{} -> n{}\n", s, d));
        }
    }
    text
}

pub fn write_grp<W: Write>(g: &Graph, mut out: W) -> std::io::Result<()> {
    out.write_all(to_grp_text(g).as_bytes())?;
    out.flush()?;
    log::debug!("saved graph: {} nodes, {} arcs", g.node_count(), g.arc_count());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_decl_accepts_spaces_and_decimals() {
        let (r, p) = parse_node_decl("n12 = [ -1.5 ; 2e3 ]", 1).unwrap();
        assert_eq!(r, 12);
        assert_eq!(p, Point::new(-1.5, 2000.0));
    }

    #[test]
    fn node_decl_rejects_bad_shapes() {
        for bad in ["n1=[1;2;3]", "n1=1;2", "x1=[1;2]", "n=[1;2]", "n1=[1;2]=", "n-1=[1;2]", "n1=[1]"] {
            assert!(parse_node_decl(bad, 3).is_err(), "accepted {bad}");
        }
    }

    #[test]
    fn node_decl_rejects_non_finite() {
        assert!(matches!(parse_node_decl("n1=[inf;2]", 1), Err(GrpError::BadCoordinate { .. })));
        assert!(matches!(parse_node_decl("n1=[NaN;2]", 1), Err(GrpError::BadCoordinate { .. })));
        assert!(matches!(parse_node_decl("n1=[1e400;2]", 1), Err(GrpError::BadCoordinate { .. })));
        assert_eq!(parse_node_decl("n1=[1e300;2]", 1).unwrap().1, Point::new(1e300, 2.0));
    }

    #[test]
    fn arc_decl_shapes() {
        assert_eq!(parse_arc_decl("n3 -> n4", 1).unwrap(), (3, 4));
        assert_eq!(parse_arc_decl("n3->n4", 1).unwrap(), (3, 4));
        for bad in ["n1 -< n2", "n1 -> n2 -> n3", "n1 -> 2", "1 -> n2", "n1 ->"] {
            assert!(parse_arc_decl(bad, 1).is_err(), "accepted {bad}");
        }
    }

    #[test]
    fn errors_carry_line_numbers() {
        let mut g = Graph::new();
        let err = parse_into(&mut g, "n0=[0;0]\n\n# c\nn0 -> n9\n".as_bytes()).unwrap_err();
        assert_eq!(err.line(), Some(4));
        assert!(matches!(err, GrpError::UnknownNodeRef { reference: 9, .. }));
        assert!(g.is_empty());
    }
}
