use articletree::commands::sort::{self, SortKey};
use articletree::commands::{clipboard, delete, moves};
use articletree::error::TreeError;
use articletree::events::{EventLog, StructureEvent};
use articletree::history::{History, Transaction};
use articletree::identity::SequentialGenerator;
use articletree::model::{Article, ArticleData, ArticleId};
use articletree::Outline;
use proptest::prelude::*;
use std::collections::HashSet;

fn build(layout: &[(usize, &str)]) -> Outline {
    let items = layout
        .iter()
        .map(|(depth, title)| (*depth, ArticleData::titled(*title)));
    Outline::from_depths(Box::new(SequentialGenerator::new()), items).unwrap()
}

fn id_of(outline: &Outline, title: &str) -> ArticleId {
    outline
        .iter()
        .find(|(_, article)| article.title() == title)
        .map(|(_, article)| article.id())
        .unwrap()
}

fn snapshot(outline: &Outline) -> Vec<(usize, ArticleId, Option<ArticleId>)> {
    outline
        .iter()
        .map(|(depth, article)| (depth, article.id(), article.parent()))
        .collect()
}

/// Subtree ranges are contiguous and end where depth returns to the node's level.
fn check_contiguity(outline: &Outline) {
    for position in 0..outline.len() {
        let depth = outline.depth_at(position).unwrap();
        let range = outline.subtree_range(position).unwrap();
        assert_eq!(range.start, position);
        for inner in range.clone().skip(1) {
            assert!(outline.depth_at(inner).unwrap() > depth);
        }
        if let Some(next) = outline.depth_at(range.end) {
            assert!(next <= depth);
        }
    }
}

fn check_root_singularity(outline: &Outline) {
    let parentless: Vec<usize> = outline
        .iter()
        .enumerate()
        .filter(|(_, (_, article))| article.parent().is_none())
        .map(|(position, _)| position)
        .collect();
    if outline.is_empty() {
        assert!(parentless.is_empty());
    } else {
        assert_eq!(parentless, vec![0]);
    }
}

fn check_identity_uniqueness(outline: &Outline) {
    let ids: HashSet<ArticleId> = outline.ids().collect();
    assert_eq!(ids.len(), outline.len());
    assert_eq!(outline.index().len(), outline.len());
}

fn check_all(outline: &Outline) {
    outline.verify().unwrap();
    check_contiguity(outline);
    check_root_singularity(outline);
    check_identity_uniqueness(outline);
}

#[test]
fn test_scenario_insert_root() {
    let mut outline = Outline::with_generator(Box::new(SequentialGenerator::new()));
    let a = outline.create_article(Some("A"));
    let a_id = a.id();

    outline.insert_subtree(None, 0, vec![a]).unwrap();

    assert_eq!(outline.ids().collect::<Vec<_>>(), vec![a_id]);
    assert_eq!(outline.index().lookup(&a_id).unwrap().title(), "A");
}

#[test]
fn test_scenario_insert_sibling_children() {
    let mut outline = build(&[(0, "A")]);
    let a = id_of(&outline, "A");
    let b = outline.create_article(Some("B"));
    let c = outline.create_article(Some("C")).child_of(a);
    let (b_id, c_id) = (b.id(), c.id());

    outline.insert_subtree(Some(a), 1, vec![b, c]).unwrap();

    assert_eq!(outline.ids().collect::<Vec<_>>(), vec![a, b_id, c_id]);
    assert_eq!(outline.children_of(0).unwrap(), vec![1, 2]);
    check_all(&outline);
}

#[test]
fn test_scenario_remove_and_reinsert_leaf() {
    let mut outline = build(&[(0, "A"), (1, "B"), (1, "C")]);
    let a = id_of(&outline, "A");
    let before = snapshot(&outline);

    let removed = outline.remove_subtree(1).unwrap();
    assert_eq!(outline.len(), 2);
    assert_eq!(outline.at(1).unwrap().title(), "C");

    outline.insert_subtree(Some(a), 1, removed).unwrap();
    assert_eq!(snapshot(&outline), before);
}

#[test]
fn test_scenario_index_zero_is_reserved() {
    let mut outline = build(&[(0, "A"), (1, "B")]);
    let a = id_of(&outline, "A");
    let d = outline.create_article(Some("D"));

    let err = outline.insert_subtree(Some(a), 0, vec![d]).unwrap_err();

    assert_eq!(err, TreeError::RootReplacement);
    assert_eq!(outline.len(), 2);
}

#[test]
fn test_scenario_branch_depth() {
    let outline = build(&[(0, "A"), (1, "B"), (2, "C"), (1, "D")]);
    assert_eq!(outline.branch_depth(0).unwrap(), 2);
}

#[test]
fn test_round_trip_for_every_subtree() {
    let layout = [
        (0, "Root"),
        (1, "A"),
        (2, "A1"),
        (3, "A1a"),
        (3, "A1b"),
        (2, "A2"),
        (1, "B"),
        (1, "C"),
        (2, "C1"),
    ];
    let mut outline = build(&layout);
    let before = snapshot(&outline);

    for position in 1..outline.len() {
        let parent = outline
            .parent_position(position)
            .unwrap()
            .and_then(|p| outline.id_at(p));
        let removed = outline.remove_subtree(position).unwrap();
        check_all(&outline);
        outline.insert_subtree(parent, position, removed).unwrap();
        assert_eq!(snapshot(&outline), before, "round trip at {}", position);
    }
}

#[test]
fn test_copy_independence() {
    let mut outline = build(&[(0, "Root"), (1, "A"), (2, "A1"), (1, "B")]);
    let existing: HashSet<ArticleId> = outline.ids().collect();

    let mut copies = outline.copy_subtree(1).unwrap();

    assert!(copies.iter().all(|copy| !existing.contains(&copy.id())));
    for copy in copies.iter_mut() {
        copy.data.set_title("mutated");
    }
    assert_eq!(outline.at(1).unwrap().title(), "A");
    assert_eq!(outline.at(2).unwrap().title(), "A1");
}

#[test]
fn test_failed_insert_is_all_or_nothing() {
    let mut outline = build(&[(0, "Root"), (1, "A"), (2, "A1"), (1, "B")]);
    let root = id_of(&outline, "Root");
    let before = snapshot(&outline);
    let log = EventLog::new();
    outline.subscribe(Box::new(log.clone()));

    // Inside A's subtree, between A and A1
    let x = outline.create_article(Some("X"));
    let err = outline.insert_subtree(Some(root), 2, vec![x]).unwrap_err();
    assert_eq!(
        err,
        TreeError::MisplacedIndex {
            index: 2,
            parent: Some(root)
        }
    );

    // Second node claims a parent outside the block
    let head = Article::new(ArticleId::from_u128(9_000), ArticleData::titled("Head"));
    let stray = Article::with_parent(
        ArticleId::from_u128(9_001),
        ArticleId::from_u128(4_242),
        ArticleData::titled("Stray"),
    );
    let err = outline
        .insert_subtree(Some(root), 4, vec![head, stray])
        .unwrap_err();
    assert_eq!(err, TreeError::UnknownParent(ArticleId::from_u128(4_242)));

    assert_eq!(snapshot(&outline), before);
    assert!(log.structure_events().is_empty());
}

#[test]
fn test_empty_block_and_membership_errors() {
    let mut outline = build(&[(0, "Root"), (1, "A")]);
    let root = id_of(&outline, "Root");

    assert_eq!(
        outline.insert_subtree(Some(root), 2, Vec::new()).unwrap_err(),
        TreeError::EmptyBlock
    );

    let a = outline.at(1).unwrap().clone();
    assert_eq!(
        outline.insert_subtree(Some(root), 2, vec![a.clone()]).unwrap_err(),
        TreeError::AlreadyMember(a.id())
    );
}

#[test]
fn test_observer_sees_move_as_remove_then_insert() {
    let mut outline = build(&[(0, "Root"), (1, "A"), (1, "B")]);
    let (a, b) = (id_of(&outline, "A"), id_of(&outline, "B"));
    let log = EventLog::new();
    outline.subscribe(Box::new(log.clone()));

    moves::move_down(&mut outline, &a).unwrap();

    assert_eq!(
        log.structure_events(),
        vec![
            StructureEvent::NodeRemoved {
                id: a,
                position: 1,
                child_rank: 0
            },
            StructureEvent::NodeInserted { position: 2, id: a },
        ]
    );
    assert_eq!(outline.ids().collect::<Vec<_>>()[1], b);
}

fn titled_layout(depths: &[usize]) -> Vec<(usize, String)> {
    depths
        .iter()
        .enumerate()
        .map(|(n, depth)| (*depth, format!("N{}", n)))
        .collect()
}

fn build_owned(layout: &[(usize, String)]) -> Outline {
    let borrowed: Vec<(usize, &str)> = layout.iter().map(|(d, t)| (*d, t.as_str())).collect();
    build(&borrowed)
}

/// Valid pre-order depth sequences: a root at depth 0, then each depth in `1..=prev + 1`.
fn depth_layout(max_len: usize) -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(any::<u16>(), 0..max_len).prop_map(|choices| {
        let mut depths = vec![0usize];
        for choice in choices {
            let previous = depths[depths.len() - 1];
            depths.push(1 + usize::from(choice) % (previous + 1));
        }
        depths
    })
}

#[derive(Debug, Clone, Copy)]
enum Edit {
    MoveUp,
    MoveDown,
    Indent,
    Outdent,
    MoveTo,
    Sort,
    Copy,
    Paste,
    Cut,
    Duplicate,
    Delete,
}

fn edit_script(max_len: usize) -> impl Strategy<Value = Vec<(Edit, usize, usize)>> {
    let edit = prop_oneof![
        Just(Edit::MoveUp),
        Just(Edit::MoveDown),
        Just(Edit::Indent),
        Just(Edit::Outdent),
        Just(Edit::MoveTo),
        Just(Edit::Sort),
        Just(Edit::Copy),
        Just(Edit::Paste),
        Just(Edit::Cut),
        Just(Edit::Duplicate),
        Just(Edit::Delete),
    ];
    prop::collection::vec((edit, any::<usize>(), any::<usize>()), 0..max_len)
}

/// Applies one edit. Errors (root moves, cycles, siblings of the root) are expected and
/// must leave the outline consistent.
fn apply(
    outline: &mut Outline,
    board: &mut clipboard::Clipboard,
    (edit, target, other): (Edit, usize, usize),
) -> Option<Transaction> {
    let ids: Vec<ArticleId> = outline.ids().collect();
    if ids.is_empty() {
        return None;
    }
    let target = ids[target % ids.len()];
    let other = ids[other % ids.len()];
    let result = match edit {
        Edit::MoveUp => moves::move_up(outline, &target),
        Edit::MoveDown => moves::move_down(outline, &target),
        Edit::Indent => moves::indent(outline, &target),
        Edit::Outdent => moves::outdent(outline, &target),
        Edit::MoveTo => moves::move_to(outline, &target, &other),
        Edit::Sort => sort::sort_children(outline, &target, SortKey::Title),
        Edit::Copy => clipboard::copy(outline, board, &target),
        Edit::Paste if outline.len() < 60 => {
            clipboard::paste(outline, board, &target, clipboard::PastePosition::AsChild)
        }
        Edit::Duplicate if outline.len() < 60 => clipboard::duplicate(outline, &target),
        Edit::Cut => clipboard::cut(outline, board, &target),
        Edit::Delete => delete::run(outline, &target),
        Edit::Paste | Edit::Duplicate => return None,
    };
    result.ok().map(|result| result.transaction)
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_remove_then_reinsert_restores_state(depths in depth_layout(24)) {
        let mut outline = build_owned(&titled_layout(&depths));
        let before = snapshot(&outline);

        for position in 1..outline.len() {
            let parent = outline
                .parent_position(position)
                .unwrap()
                .and_then(|p| outline.id_at(p));
            let removed = outline.remove_subtree(position).unwrap();
            check_all(&outline);
            outline.insert_subtree(parent, position, removed).unwrap();
            prop_assert_eq!(snapshot(&outline), before.clone());
        }
    }

    #[test]
    fn prop_layouts_satisfy_structural_invariants(depths in depth_layout(40)) {
        let outline = build_owned(&titled_layout(&depths));
        prop_assert_eq!(outline.len(), depths.len());
        let loaded: Vec<usize> = outline.iter().map(|(depth, _)| depth).collect();
        prop_assert_eq!(loaded, depths);
        check_all(&outline);
    }

    #[test]
    fn prop_copies_are_fresh_and_independent(depths in depth_layout(24)) {
        let mut outline = build_owned(&titled_layout(&depths));
        let before = snapshot(&outline);
        let existing: HashSet<ArticleId> = outline.ids().collect();

        for position in 0..outline.len() {
            let range = outline.subtree_range(position).unwrap();
            let mut copies = outline.copy_subtree(position).unwrap();

            prop_assert_eq!(copies.len(), range.len());
            prop_assert!(copies.iter().all(|copy| !existing.contains(&copy.id())));
            // Same topology: every copy points at the copy of its original's parent
            for offset in 1..copies.len() {
                let original_parent = outline.at(range.start + offset).unwrap().parent().unwrap();
                let parent_offset = outline.position_of(&original_parent).unwrap() - range.start;
                prop_assert_eq!(copies[offset].parent(), Some(copies[parent_offset].id()));
            }
            for copy in copies.iter_mut() {
                copy.data.set_title("mutated");
            }
            prop_assert_eq!(snapshot(&outline), before.clone());
        }
        prop_assert!(outline.iter().all(|(_, article)| article.title() != "mutated"));
    }

    #[test]
    fn prop_invariants_hold_under_edit_scripts(
        depths in depth_layout(16),
        script in edit_script(80),
    ) {
        let mut outline = build_owned(&titled_layout(&depths));
        let mut board = clipboard::Clipboard::new();

        for step in script {
            apply(&mut outline, &mut board, step);
            check_all(&outline);
        }
    }

    #[test]
    fn prop_undoing_a_script_restores_the_start(
        depths in depth_layout(16),
        script in edit_script(40),
    ) {
        let mut outline = build_owned(&titled_layout(&depths));
        let start = snapshot(&outline);
        let mut board = clipboard::Clipboard::new();
        let mut history = History::new(usize::MAX);

        for step in script {
            if let Some(transaction) = apply(&mut outline, &mut board, step) {
                history.record(transaction);
            }
        }
        let after = snapshot(&outline);

        while history.undo(&mut outline).unwrap().is_some() {
            check_all(&outline);
        }
        prop_assert_eq!(snapshot(&outline), start);

        while history.redo(&mut outline).unwrap().is_some() {}
        prop_assert_eq!(snapshot(&outline), after);
    }
}
