//! End-to-end hierarchy scenarios through the library API.

use rstest::{fixture, rstest};

use taxopath::config::{EntityColumns, OutputConfig, RelationColumns};
use taxopath::domain::NodeId;
use taxopath::hierarchy::{
    DepthResolver, Hierarchy, PathEnumerator, find_cycles, load_hierarchy,
};
use taxopath::materialize::{Labels, RowMaterializer, annotate_levels, entity_ids};
use taxopath_table::{Table, TableReader};

fn table(csv: &str) -> Table {
    TableReader::new().read(csv.as_bytes()).unwrap().0
}

fn id(s: &str) -> NodeId {
    NodeId::from(s)
}

fn rendered(paths: &mut PathEnumerator<'_>, node: &str) -> Vec<String> {
    paths.paths(&id(node)).iter().map(|p| p.join(";")).collect()
}

/// A is the root, B and C hang below it, D has both as parents.
#[fixture]
fn diamond() -> Hierarchy {
    let relations = table(
        "PARENTOBJECTTYPE,PARENTID,CHILDID,CHILDOBJECTTYPE\n\
         skillgroup,A,B,skillgroup\n\
         skillgroup,A,C,skillgroup\n\
         skillgroup,B,D,skill\n\
         skillgroup,C,D,skill\n",
    );
    load_hierarchy(&relations, &RelationColumns::default()).unwrap()
}

#[rstest]
#[case::root("A", 1, &["A"])]
#[case::single_parent("B", 2, &["A;B"])]
#[case::sibling("C", 2, &["A;C"])]
#[case::two_parents("D", 3, &["A;B;D", "A;C;D"])]
#[case::unlinked("U", 1, &["U"])]
fn diamond_depths_and_paths(
    diamond: Hierarchy,
    #[case] node: &str,
    #[case] depth: usize,
    #[case] paths: &[&str],
) {
    let mut depths = DepthResolver::new(&diamond);
    let mut enumerator = PathEnumerator::new(&diamond);

    assert_eq!(depths.depth(&id(node)), depth);
    assert_eq!(rendered(&mut enumerator, node), paths);
}

#[rstest]
fn depth_is_idempotent(diamond: Hierarchy) {
    let mut depths = DepthResolver::new(&diamond);
    let first: Vec<usize> = ["D", "C", "B", "A"].iter().map(|n| depths.depth(&id(n))).collect();
    let second: Vec<usize> = ["D", "C", "B", "A"].iter().map(|n| depths.depth(&id(n))).collect();

    assert_eq!(first, second);
    assert_eq!(first, vec![3, 2, 2, 1]);
}

#[test]
fn two_node_cycle_terminates() {
    let relations = table("PARENTID,CHILDID\nX,Y\nY,X\n");
    let hierarchy = load_hierarchy(&relations, &RelationColumns::default()).unwrap();
    let mut depths = DepthResolver::new(&hierarchy);
    let mut paths = PathEnumerator::new(&hierarchy);

    let x = depths.depth(&id("X"));
    let y = depths.depth(&id("Y"));
    assert!(x <= 2 && y <= 2);
    assert_eq!(rendered(&mut paths, "X"), ["Y;X"]);
    assert_eq!(rendered(&mut paths, "Y"), ["X;Y"]);

    assert_eq!(find_cycles(&hierarchy).len(), 1);
    assert!(!depths.cycle_breaks().is_empty());
}

#[test]
fn cycle_does_not_corrupt_acyclic_branch() {
    // N has a clean parent R and a parent M caught in an M <-> K cycle.
    let relations = table("PARENTID,CHILDID\nR,N\nM,N\nK,M\nM,K\n");
    let hierarchy = load_hierarchy(&relations, &RelationColumns::default()).unwrap();
    let mut depths = DepthResolver::new(&hierarchy);
    let mut paths = PathEnumerator::new(&hierarchy);

    assert_eq!(depths.depth(&id("R")), 1);
    assert_eq!(depths.depth(&id("N")), 3);
    assert_eq!(rendered(&mut paths, "N"), ["R;N", "K;M;N"]);
}

#[rstest]
fn levels_and_paths_for_an_entity_table(diamond: Hierarchy) {
    let entities = table("ID,PREFERREDLABEL\nD,negotiate\nU,unlinked\n");
    let ids = entity_ids(&entities, &EntityColumns::default()).unwrap();

    let mut depths = DepthResolver::new(&diamond);
    let (levelled, distribution) = annotate_levels(&entities, &ids, &mut depths, "LEVEL").unwrap();
    let levels: Vec<&str> = levelled.records().filter_map(|r| r.get("LEVEL")).collect();
    assert_eq!(levels, ["3", "1"]);
    assert_eq!(distribution.total, 5);
    assert_eq!(
        distribution.levels.into_iter().collect::<Vec<_>>(),
        [(1, 2), (2, 2), (3, 1)]
    );

    let output = OutputConfig::default();
    let mut labels = Labels::new();
    labels.extend_from_table(&entities, &EntityColumns::default()).unwrap();
    let mut paths = PathEnumerator::new(&diamond);
    let (expanded, stats) = RowMaterializer::new(&output, &labels)
        .expand(&entities, &ids, &mut paths)
        .unwrap();

    let rows: Vec<(&str, &str)> = expanded
        .records()
        .map(|r| (r.get("ID").unwrap(), r.get("HIERARCHY_PATH").unwrap()))
        .collect();
    assert_eq!(rows, [("D", "A;B;D"), ("D", "A;C;D"), ("U", "U")]);
    assert_eq!(stats.single_path, 1);
    assert_eq!(stats.multi_path, 1);
}
