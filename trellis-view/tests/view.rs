//! Tests for the view adapter: row projection, expansion state,
//! selection, and drag-and-drop mediation.

use trellis_view::{
    Node, NodeId, NodeKind, Projection, Row, RowHost, SelectionMode, Tree, TreeError, TreeView,
};

#[derive(Default)]
struct RecordingHost {
    drawn: Vec<(NodeId, u16, bool)>,
    revealed: Vec<Vec<NodeId>>,
    selection_events: Vec<(Vec<NodeId>, Vec<NodeId>)>,
    pre_drop_calls: usize,
}

impl RowHost for RecordingHost {
    fn draw_row(&mut self, node: &Node, row: &Row, selected: bool) {
        assert_eq!(node.id(), row.id);
        self.drawn.push((row.id, row.depth, selected));
    }

    fn selection_changed(&mut self, added: &[NodeId], removed: &[NodeId]) {
        self.selection_events
            .push((added.to_vec(), removed.to_vec()));
    }

    fn reveal(&mut self, ids: &[NodeId]) {
        self.revealed.push(ids.to_vec());
    }

    fn before_drop(&mut self, _dragged: &[NodeId], _target: NodeId) {
        self.pre_drop_calls += 1;
    }
}

/// Builds root -> [projects -> [tasks -> [todo], done], inbox].
fn sample_view() -> (TreeView, NodeId, NodeId, NodeId, NodeId) {
    let mut tree = Tree::new();
    let root = tree.root();
    let projects = tree.create_folder("projects");
    let inbox = tree.create_node("inbox", NodeKind::Leaf);
    tree.insert_children(&[projects, inbox], root, 0).unwrap();
    let tasks = tree.create_folder("tasks");
    let done = tree.create_node("done", NodeKind::Leaf);
    tree.insert_children(&[tasks, done], projects, 0).unwrap();
    let todo = tree.create_node("todo", NodeKind::Leaf);
    tree.insert_inside(tasks, todo).unwrap();

    let view = TreeView::new(tree);
    (view, projects, tasks, todo, inbox)
}

fn row_ids(view: &TreeView) -> Vec<NodeId> {
    view.rows().iter().map(|row| row.id).collect()
}

#[test]
fn rows_start_collapsed_and_never_show_the_sentinel_root() {
    let (view, projects, _tasks, _todo, inbox) = sample_view();
    assert_eq!(row_ids(&view), vec![projects, inbox]);
    assert!(view.rows().iter().all(|row| row.depth == 0));
}

#[test]
fn expansion_reveals_exactly_the_expanded_subtrees() {
    let (mut view, projects, tasks, todo, inbox) = sample_view();
    let done = view.tree().children_of(projects)[1];

    view.expand(projects);
    assert_eq!(row_ids(&view), vec![projects, tasks, done, inbox]);
    assert_eq!(view.rows()[1].depth, 1);
    assert!(!view.rows()[1].expanded);

    view.expand(tasks);
    assert_eq!(row_ids(&view), vec![projects, tasks, todo, done, inbox]);
    assert_eq!(view.rows()[2].depth, 2);

    view.collapse(projects);
    assert_eq!(row_ids(&view), vec![projects, inbox]);
    assert!(
        view.is_expanded(tasks),
        "collapsing an ancestor keeps nested expansion state"
    );
}

#[test]
fn expand_all_uses_the_trees_folder_query() {
    let (mut view, projects, tasks, todo, inbox) = sample_view();
    view.expand_all();
    let done = view.tree().children_of(projects)[1];
    assert_eq!(row_ids(&view), vec![projects, tasks, todo, done, inbox]);
    view.collapse_all();
    assert_eq!(row_ids(&view), vec![projects, inbox]);
}

#[test]
fn both_projections_derive_identical_rows() {
    let (mut view, projects, tasks, ..) = sample_view();
    view.expand(projects);
    view.expand(tasks);

    let direct = view.rows().to_vec();
    view.set_projection(Projection::FlattenedScan);
    assert_eq!(view.rows(), &direct[..]);
}

#[test]
fn the_row_filter_hides_a_subtree_under_both_projections() {
    let (mut view, projects, _tasks, _todo, inbox) = sample_view();
    view.expand_all();
    view.set_row_filter(Some(Box::new(|node: &Node| node.name() != "tasks")));

    let done = view.tree().children_of(projects)[1];
    assert_eq!(row_ids(&view), vec![projects, done, inbox]);

    view.set_projection(Projection::FlattenedScan);
    assert_eq!(row_ids(&view), vec![projects, done, inbox]);

    view.set_row_filter(None);
    assert_eq!(row_ids(&view).len(), 5);
}

#[test]
fn draw_hands_every_visible_row_to_the_host_in_order() {
    let (mut view, projects, _tasks, _todo, inbox) = sample_view();
    view.set_selection_mode(SelectionMode::Multiple);
    view.select(inbox);

    let mut host = RecordingHost::default();
    view.draw(&mut host);
    assert_eq!(
        host.drawn,
        vec![(projects, 0, false), (inbox, 0, true)]
    );
}

#[test]
fn validate_drop_rejects_every_cyclic_target() {
    let (mut view, projects, tasks, todo, inbox) = sample_view();
    view.expand_all();

    // Dropping a folder into its own descendant chain is rejected at
    // every level, including directly onto itself.
    assert!(!view.validate_drop(projects, &[projects]));
    assert!(!view.validate_drop(tasks, &[projects]));
    assert!(!view.validate_drop(todo, &[projects]));
    assert!(!view.validate_drop(tasks, &[inbox, tasks]));

    // Sideways and upward moves are fine.
    assert!(view.validate_drop(projects, &[inbox]));
    assert!(view.validate_drop(view.tree().root(), &[tasks]));
    assert!(!view.validate_drop(projects, &[]));
}

#[test]
fn commit_drop_moves_reselects_and_reveals() {
    let (mut view, _projects, tasks, _todo, inbox) = sample_view();
    view.set_selection_mode(SelectionMode::Multiple);
    view.expand_all();

    let mut host = RecordingHost::default();
    view.commit_drop(&[inbox], tasks, 0, &mut host).unwrap();

    assert_eq!(host.pre_drop_calls, 1);
    assert_eq!(host.revealed, vec![vec![inbox]]);
    assert_eq!(view.selected_ids(), vec![inbox]);
    assert_eq!(view.tree().children_of(tasks).first(), Some(&inbox));
    view.tree().verify().unwrap();

    // The row cache reflects the move without an explicit rebuild call.
    let ids = row_ids(&view);
    let tasks_pos = ids.iter().position(|&id| id == tasks).unwrap();
    assert_eq!(ids[tasks_pos + 1], inbox);
    assert_eq!(view.rows()[tasks_pos + 1].depth, 2);
}

#[test]
fn commit_drop_on_a_cyclic_target_fails_without_mutating() {
    let (mut view, projects, tasks, ..) = sample_view();
    view.set_selection_mode(SelectionMode::Multiple);
    view.expand_all();
    let before = row_ids(&view);

    let mut host = RecordingHost::default();
    let result = view.commit_drop(&[projects], tasks, 0, &mut host);
    assert!(matches!(result, Err(TreeError::InvalidArgument(_))));

    assert_eq!(host.pre_drop_calls, 1, "the pre-drop hook still ran");
    assert!(host.revealed.is_empty());
    assert!(host.selection_events.is_empty());
    assert_eq!(row_ids(&view), before);
    view.tree().verify().unwrap();
}

#[test]
fn range_select_follows_visible_row_order() {
    let (mut view, projects, tasks, todo, _inbox) = sample_view();
    view.set_selection_mode(SelectionMode::Multiple);
    view.expand_all();

    view.select(projects);
    let (added, _removed) = view.range_select(todo, false);
    assert_eq!(added.len(), 2);
    assert_eq!(view.selected_ids(), vec![projects, tasks, todo]);
}

#[test]
fn removing_a_selected_subtree_prunes_the_selection() {
    let (mut view, projects, tasks, todo, inbox) = sample_view();
    view.set_selection_mode(SelectionMode::Multiple);
    view.expand_all();
    view.toggle_select(todo);
    view.toggle_select(inbox);

    view.remove(tasks).unwrap();
    assert_eq!(view.selected_ids(), vec![inbox]);
    assert_eq!(row_ids(&view), vec![projects, view.tree().children_of(projects)[0], inbox]);
}

#[test]
fn mutations_through_the_view_keep_rows_fresh() {
    let (mut view, projects, _tasks, _todo, inbox) = sample_view();

    let note = view.create_node("note", NodeKind::Leaf);
    view.insert_after(inbox, note).unwrap();
    assert_eq!(row_ids(&view), vec![projects, inbox, note]);

    let archive = view.create_folder("archive");
    view.insert_children(&[archive], view.tree().root(), 0).unwrap();
    assert_eq!(row_ids(&view), vec![archive, projects, inbox, note]);

    view.insert_inside(archive, note).unwrap();
    view.expand(archive);
    assert_eq!(row_ids(&view), vec![archive, note, projects, inbox]);

    view.move_nodes(view.tree().root(), 3, &[archive]).unwrap();
    assert_eq!(row_ids(&view), vec![projects, inbox, archive, note]);
    view.tree().verify().unwrap();
}

#[test]
fn ancestor_and_folder_queries_are_forwarded() {
    let (view, projects, tasks, todo, _inbox) = sample_view();
    assert_eq!(view.ancestors_of(todo), vec![tasks, projects]);
    assert_eq!(view.descendant_folders_of(projects), vec![projects, tasks]);
}
