use proptest::prelude::*;

use crate::api::{CollectedCalls, Options, rewrite, rewrite_dispatch, rewrite_with};
use crate::{CallInvocation, RuleSet, stock};

fn set(defs: &[(&str, &str, &str)]) -> RuleSet {
    RuleSet::compile(defs).unwrap()
}

fn render() -> Options {
    Options { render_calls: true }
}

fn call(name: &str, args: &[&str]) -> CallInvocation {
    CallInvocation {
        name: name.into(),
        args: args.iter().map(|a| a.to_string()).collect(),
    }
}

#[test]
fn unmatched_input_passes_through_verbatim() {
    let rules = set(&[("", "zzz", "Q")]);
    let res = rewrite("nothing to see here\nat all", &rules).unwrap();
    assert_eq!(res.output, "nothing to see here\nat all");
    assert!(res.calls.is_empty());
}

#[test]
fn literal_escape_rule_replaces_in_place() {
    let rules = set(&[("", r#""\\q""#, r#""~PAUSE~""#)]);
    let res = rewrite("go \\q now", &rules).unwrap();
    assert_eq!(res.output, "go ~PAUSE~ now");
    assert!(res.calls.is_empty());
}

#[test]
fn first_match_wins_regardless_of_length() {
    // Both rules match at position 0; the earlier, shorter one wins.
    let rules = set(&[("", "ab", "X"), ("", "abc", "Y")]);
    let res = rewrite("abcd", &rules).unwrap();
    assert_eq!(res.output, "Xcd");

    // Declaration order decides, not pattern length.
    let rules = set(&[("", "abc", "Y"), ("", "ab", "X")]);
    let res = rewrite("abcd", &rules).unwrap();
    assert_eq!(res.output, "Yd");
}

#[test]
fn replacement_text_is_never_rescanned() {
    let rules = set(&[("", "a", "aa")]);
    assert_eq!(rewrite("a", &rules).unwrap().output, "aa");
    assert_eq!(rewrite("aaa", &rules).unwrap().output, "aaaaaa");

    // A replacement equal to a later rule's pattern is not re-matched
    // either.
    let rules = set(&[("", "a", "b"), ("", "b", "c")]);
    assert_eq!(rewrite("ab", &rules).unwrap().output, "bc");
}

#[test]
fn scan_resumes_after_the_matched_span() {
    let rules = set(&[("", "aa", "X")]);
    assert_eq!(rewrite("aaa", &rules).unwrap().output, "Xa");
}

#[test]
fn calls_are_emitted_in_match_order() {
    let rules = set(&[("", "(a.)", r#"<$seen("\1");>"#)]);
    let res = rewrite("axzay", &rules).unwrap();
    assert_eq!(res.output, "<>z<>");
    assert_eq!(
        res.calls,
        vec![call("seen", &["ax"]), call("seen", &["ay"])]
    );
}

#[test]
fn argument_calls_precede_their_enclosing_call() {
    let rules = set(&[("", "(x)", r#"$outer("p"$inner("\1")"q");"#)]);
    let res = rewrite("x", &rules).unwrap();
    assert_eq!(
        res.calls,
        vec![call("inner", &["x"]), call("outer", &["pq"])]
    );
}

#[test]
fn dictionary_macro_emits_registration() {
    let res = rewrite("（Hello）＊", stock()).unwrap();
    assert!(res.output.starts_with("Hello"));
    assert_eq!(
        res.output,
        "Hello\\f(12)※\\f(#confont_yl@SYSTEM)*"
    );
    assert_eq!(res.calls, vec![call("dic_add_word_con", &["Hello"])]);
}

#[test]
fn dictionary_macro_renders_call_text_when_asked() {
    let res = rewrite_with("（Hello）＊", stock(), &render()).unwrap();
    assert_eq!(
        res.output,
        "Hello\\f(12)※\\f(#confont_yl@SYSTEM)$dic_add_word_con(\"Hello\");*"
    );
    assert_eq!(res.calls, vec![call("dic_add_word_con", &["Hello"])]);
}

#[test]
fn pause_macro_expands_between_control_escapes() {
    let res = rewrite("go \\q now", stock()).unwrap();
    assert_eq!(res.output, "go \\~\\~ now");
    assert_eq!(
        res.calls,
        vec![call("pause_set_altwink", &[]), call("pause", &[])]
    );

    let res = rewrite_with("go \\q now", stock(), &render()).unwrap();
    assert_eq!(
        res.output,
        "go \\~$pause_set_altwink();$pause();\\~ now"
    );
}

#[test]
fn reversed_marker_macro_puts_the_word_last() {
    let res = rewrite("＊（ことば）", stock()).unwrap();
    assert_eq!(res.output, "\\f(12)※\\f(#confont_yl@SYSTEM)*ことば");
    assert_eq!(res.calls, vec![call("dic_add_word_con", &["ことば"])]);
}

#[test]
fn single_line_flag_lets_runs_cross_lines() {
    let bounded = set(&[("", "a.*b", "X")]);
    let res = rewrite("a\nb", &bounded).unwrap();
    assert_eq!(res.output, "a\nb");

    let crossing = set(&[("s", "a.*b", "X")]);
    let res = rewrite("a\nb", &crossing).unwrap();
    assert_eq!(res.output, "X");
}

#[test]
fn greedy_run_spans_the_longest_match() {
    let rules = set(&[("", "a(.*)b", r"[\1]")]);
    let res = rewrite("axbyb", &rules).unwrap();
    assert_eq!(res.output, "[xby]");
}

#[test]
fn zero_width_wildcard_matches_are_skipped() {
    // `.*` matches nothing right before a line boundary; the scan must
    // still move.
    let rules = set(&[("", ".*", "R")]);
    let res = rewrite("ab\ncd", &rules).unwrap();
    assert_eq!(res.output, "R\nR");

    let res = rewrite("\n\n", &rules).unwrap();
    assert_eq!(res.output, "\n\n");
}

#[test]
fn anchored_rule_fires_once_per_line() {
    let rules = set(&[("", "^ab", "X")]);
    let res = rewrite("ab abab\nab", &rules).unwrap();
    assert_eq!(res.output, "X abab\nX");

    let whole_input = set(&[("s", "^ab", "X")]);
    let res = rewrite("ab\nab", &whole_input).unwrap();
    assert_eq!(res.output, "X\nab");
}

#[test]
fn ruleset_macro_compiles_literal_triples_in_order() {
    let rules = ruleset![("", "ab", "X"), ("s", "a.*b", "Y")];
    let res = rewrite("ab a\nb", &rules).unwrap();
    assert_eq!(res.output, "X Y");
}

#[test]
fn identical_runs_are_identical() {
    let input = "（a）＊ and \\q and （b）＊";
    let first = rewrite(input, stock()).unwrap();
    let second = rewrite(input, stock()).unwrap();
    assert_eq!(first.output, second.output);
    assert_eq!(first.calls, second.calls);
}

#[test]
fn dispatcher_sees_calls_across_matches_in_scan_order() {
    let mut sink = CollectedCalls::default();
    let res = rewrite_dispatch(
        "（a）＊x（b）＊",
        stock(),
        &Options::default(),
        &mut sink,
    )
    .unwrap();
    assert_eq!(
        sink.calls,
        vec![
            call("dic_add_word_con", &["a"]),
            call("dic_add_word_con", &["b"]),
        ]
    );
    assert_eq!(sink.calls, res.calls);
}

proptest! {
    #[test]
    fn rewriting_is_deterministic(input in any::<String>()) {
        let first = rewrite(&input, stock()).unwrap();
        let second = rewrite(&input, stock()).unwrap();
        prop_assert_eq!(first.output, second.output);
        prop_assert_eq!(first.calls, second.calls);
    }

    #[test]
    fn rewriting_terminates_with_bounded_output(input in any::<String>()) {
        // Every match consumes at least one character and each expansion
        // adds at most one capture replay plus fixed decoration, so the
        // output cannot blow past a small linear bound.
        let res = rewrite(&input, stock()).unwrap();
        prop_assert!(res.output.len() <= input.len() * 64 + 64);
    }

    #[test]
    fn inputs_without_macro_syntax_are_untouched(input in "[a-zA-Z0-9 .,!?\n]*") {
        let res = rewrite(&input, stock()).unwrap();
        prop_assert_eq!(res.output, input);
        prop_assert!(res.calls.is_empty());
    }
}
