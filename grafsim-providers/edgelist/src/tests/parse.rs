use super::{DEFAULT_COMMENT, EdgeListError, summarise};
use grafsim_test_support::fixtures;
use rstest::rstest;

fn summary_of(text: &str) -> Result<crate::EdgeListSummary, EdgeListError> {
    summarise(text.as_bytes(), DEFAULT_COMMENT)
}

#[rstest]
#[case::path(fixtures::path(5), 5, 4)]
#[case::star(fixtures::star(6), 6, 5)]
#[case::complete(fixtures::complete(4), 4, 6)]
#[case::two_triangles(fixtures::two_triangles(), 6, 6)]
fn fixture_text_is_counted(
    #[case] fixture: fixtures::EdgeList,
    #[case] nodes: usize,
    #[case] edges: usize,
) {
    let summary = summary_of(&fixture.to_text()).expect("fixture parses");
    assert_eq!(summary.nodes, nodes);
    assert_eq!(summary.edges, edges);
    assert_eq!(summary.self_loops, 0);
}

#[test]
fn comments_and_short_lines_are_skipped() {
    let text = "% header line\n\n   \n7\n1 2 % trailing comment\n%2 3\n2 3\n";
    let summary = summary_of(text).expect("valid edge list");
    assert_eq!(summary.nodes, 3);
    assert_eq!(summary.edges, 2);
}

#[test]
fn reversed_and_repeated_edges_count_once() {
    let summary = summary_of("1 2\n2 1\n1 2\n").expect("valid edge list");
    assert_eq!(summary.edges, 1);
    assert_eq!(summary.mean_degree(), 1.0);
}

#[test]
fn self_loops_add_two_to_their_node() {
    // Degrees: 1 -> 1 + 2 (loop), 2 -> 1; mean (3 + 1) / 2.
    let summary = summary_of("1 2\n1 1\n").expect("valid edge list");
    assert_eq!(summary.self_loops, 1);
    assert_eq!(summary.edges, 2);
    assert_eq!(summary.mean_degree(), 2.0);
}

#[test]
fn weights_and_extra_columns_are_accepted() {
    let summary = summary_of("1 2 0.5 1700000000\n2 3 4\n").expect("valid edge list");
    assert_eq!(summary.edges, 2);
}

#[rstest]
#[case::negative("-1 2\n", 1, "-1")]
#[case::text("1 2\nalice bob\n", 2, "alice")]
#[case::float_id("1.5 2\n", 1, "1.5")]
fn malformed_node_ids_are_rejected(#[case] text: &str, #[case] line: usize, #[case] token: &str) {
    let err = summary_of(text).expect_err("node id is invalid");
    match err {
        EdgeListError::InvalidNode {
            line: reported,
            token: found,
        } => {
            assert_eq!(reported, line);
            assert_eq!(found, token);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_weight_is_rejected() {
    let err = summary_of("1 2 heavy\n").expect_err("weight is invalid");
    assert!(matches!(err, EdgeListError::InvalidWeight { line: 1, .. }));
}

#[rstest]
#[case::blank("")]
#[case::comments_only("% nothing here\n% at all\n")]
#[case::single_tokens("1\n2\n")]
fn edgeless_input_is_empty(#[case] text: &str) {
    assert!(matches!(summary_of(text), Err(EdgeListError::Empty)));
}

#[test]
fn custom_comment_marker_is_honoured() {
    let summary = summarise("# header\n1 2 # note\n".as_bytes(), "#").expect("valid edge list");
    assert_eq!(summary.edges, 1);
    let err = summarise("# header\n".as_bytes(), "").expect_err("`#` is a node id");
    assert!(matches!(err, EdgeListError::InvalidNode { line: 1, .. }));
}
