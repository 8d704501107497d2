//! Explorer Example
//!
//! Demonstrates the outline view adapter:
//! - Building a tree through the view's allocation and insertion APIs
//! - Expand/collapse driving the visible rows
//! - Drag-and-drop with the cycle guard rejecting bad drops
//! - A host that draws rows as indented terminal lines

use std::fs::File;

use log::LevelFilter;
use simplelog::{Config, WriteLogger};
use trellis_view::{Node, NodeId, NodeKind, Row, RowHost, SelectionMode, Tree, TreeView};

/// Draws rows to stdout and reports view notifications.
struct Stdout;

impl RowHost for Stdout {
    fn draw_row(&mut self, node: &Node, row: &Row, selected: bool) {
        let indent = "  ".repeat(row.depth as usize);
        let marker = match (row.has_children, row.expanded) {
            (true, true) => "v ",
            (true, false) => "> ",
            (false, _) => "  ",
        };
        let cursor = if selected { "*" } else { " " };
        println!("{cursor} {indent}{marker}{}", node.name());
    }

    fn selection_changed(&mut self, added: &[NodeId], removed: &[NodeId]) {
        println!("  (selection: +{} -{})", added.len(), removed.len());
    }

    fn reveal(&mut self, ids: &[NodeId]) {
        println!("  (revealing {} row(s))", ids.len());
    }
}

fn main() {
    // Initialize file logging
    if let Ok(log_file) = File::create("explorer.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), log_file);
    }

    let mut tree = Tree::new();
    let root = tree.root();
    let projects = tree.create_folder("projects");
    let notes = tree.create_folder("notes");
    let inbox = tree.create_node("inbox", NodeKind::Leaf);
    tree.insert_children(&[projects, notes, inbox], root, 0)
        .expect("seeding the outline");

    let mut view = TreeView::new(tree);
    view.set_selection_mode(SelectionMode::Multiple);

    let trellis = view.create_node("trellis", NodeKind::Leaf);
    let journal = view.create_node("journal", NodeKind::Leaf);
    view.insert_inside(projects, trellis)
        .expect("filing under projects");
    view.insert_inside(notes, journal).expect("filing under notes");
    view.expand_all();

    let mut host = Stdout;
    println!("initial outline:");
    view.draw(&mut host);

    println!("\ndrop 'journal' into 'projects':");
    view.commit_drop(&[journal], projects, 0, &mut host)
        .expect("a sideways drop is valid");
    view.draw(&mut host);

    println!("\ndrop 'projects' into its own child is refused:");
    match view.commit_drop(&[projects], trellis, 0, &mut host) {
        Ok(()) => unreachable!("the cycle guard must reject this"),
        Err(err) => println!("  {err}"),
    }

    println!("\ncollapsed again:");
    view.collapse_all();
    view.draw(&mut host);
}
