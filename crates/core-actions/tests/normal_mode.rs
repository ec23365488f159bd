mod common;
use common::*;

use pretty_assertions::assert_eq;

#[test]
fn x_deletes_under_cursor_with_count() {
    let mut s = Session::new("abcdef");
    s.keys("x");
    assert_eq!(s.text(), "bcdef");
    assert_eq!(s.unnamed().as_deref(), Some("a"));
    s.keys("3x");
    assert_eq!(s.text(), "ef");
    assert_eq!(s.cursor(), 0);
}

#[test]
fn x_on_empty_line_is_a_no_op() {
    let mut s = Session::new("\nabc");
    s.keys("x");
    assert_eq!(s.text(), "\nabc");
}

#[test]
fn delete_word_counts_multiply() {
    let mut s = Session::new("foo bar baz qux");
    s.keys("dw");
    assert_eq!(s.text(), "bar baz qux");
    let mut s = Session::new("foo bar baz qux");
    s.keys("2dw");
    assert_eq!(s.text(), "baz qux");
    let mut s = Session::new("foo bar baz qux");
    s.keys("d2w");
    assert_eq!(s.text(), "baz qux");
}

#[test]
fn dw_on_last_word_stops_at_line_end() {
    let mut s = Session::new("foo\nbar");
    s.keys("dw");
    assert_eq!(s.text(), "\nbar");
}

#[test]
fn dw_at_text_end_takes_the_rest() {
    let mut s = Session::new("foo");
    s.keys("dw");
    assert_eq!(s.text(), "");
}

#[test]
fn cw_changes_to_word_end() {
    let mut s = Session::new("foo bar");
    s.keys("cw");
    assert_eq!(s.mode(), "insert");
    assert_eq!(s.text(), " bar");
    s.keys("xy<Esc>");
    assert_eq!(s.text(), "xy bar");
    assert_eq!(s.cursor(), 1);
    assert_eq!(s.mode(), "normal");
}

#[test]
fn cw_on_blank_behaves_like_dw() {
    let mut s = Session::at("a  b", 1);
    s.keys("cw");
    assert_eq!(s.text(), "ab");
}

#[test]
fn big_word_operators_follow_the_word_rules() {
    let mut s = Session::new("a.b c");
    s.keys("cW");
    assert_eq!(s.text(), " c");
    let mut s = Session::new("a.b\nc");
    s.keys("dW");
    assert_eq!(s.text(), "\nc");
    let mut s = Session::new("a.b\nc");
    s.keys("dE");
    assert_eq!(s.text(), "\nc");
}

#[test]
fn find_char_operators_are_inclusive_or_stop_short() {
    let mut s = Session::new("abxcd");
    s.keys("dfx");
    assert_eq!(s.text(), "cd");
    let mut s = Session::new("abxcd");
    s.keys("dtx");
    assert_eq!(s.text(), "xcd");
    let mut s = Session::at("abxcd", 4);
    s.keys("dFx");
    assert_eq!(s.text(), "abd");
}

#[test]
fn semicolon_and_comma_repeat_last_find() {
    let mut s = Session::new("a.b.c.d.");
    s.keys("f.");
    assert_eq!(s.cursor(), 1);
    s.keys(";");
    assert_eq!(s.cursor(), 3);
    s.keys(";");
    assert_eq!(s.cursor(), 5);
    s.keys(",");
    assert_eq!(s.cursor(), 3);
}

#[test]
fn repeated_till_advances_each_time() {
    let mut s = Session::new("a.b.c.d.");
    s.keys("t.");
    assert_eq!(s.cursor(), 0);
    let mut seen = Vec::new();
    for _ in 0..3 {
        s.keys(";");
        seen.push(s.cursor());
    }
    assert_eq!(seen, vec![2, 4, 6]);
    s.keys(",");
    assert_eq!(s.cursor(), 4);
}

#[test]
fn repeat_without_previous_find_reports() {
    let mut s = Session::new("abc");
    s.keys(";");
    assert_eq!(s.ui().error.as_deref(), Some("No previous find-char command"));
    assert_eq!(s.cursor(), 0);
}

#[test]
fn failed_find_leaves_cursor_and_reports() {
    let mut s = Session::at("abc", 1);
    s.keys("fz");
    assert_eq!(s.cursor(), 1);
    assert_eq!(s.ui().error.as_deref(), Some("Character 'z' not found"));
}

#[test]
fn dd_deletes_lines_and_keeps_them_in_register() {
    let mut s = Session::new("one\ntwo\nthree");
    s.keys("dd");
    assert_eq!(s.text(), "two\nthree");
    assert_eq!(s.unnamed().as_deref(), Some("one\n"));
    let mut s = Session::new("one\ntwo\nthree");
    s.keys("jdd");
    assert_eq!(s.text(), "one\nthree");
    assert_eq!(s.cursor(), 4);
}

#[test]
fn dd_on_last_line_takes_preceding_terminator() {
    let mut s = Session::new("one\ntwo\nthree");
    s.keys("Gdd");
    assert_eq!(s.text(), "one\ntwo");
    assert_eq!(s.cursor(), 4);
    assert_eq!(s.unnamed().as_deref(), Some("three\n"));
}

#[test]
fn counted_dd() {
    let mut s = Session::new("a\nb\nc\nd");
    s.keys("2dd");
    assert_eq!(s.text(), "c\nd");
}

#[test]
fn yank_and_put_lines() {
    let mut s = Session::new("one\ntwo");
    s.keys("yyp");
    assert_eq!(s.text(), "one\none\ntwo");
    assert_eq!(s.cursor(), 4);
    s.keys("GP");
    assert_eq!(s.text(), "one\none\none\ntwo");
}

#[test]
fn put_lines_after_unterminated_last_line() {
    let mut s = Session::new("one\ntwo");
    s.keys("yyGp");
    assert_eq!(s.text(), "one\ntwo\none");
    assert_eq!(s.cursor(), 8);
}

#[test]
fn yank_word_and_put_before() {
    let mut s = Session::new("foo bar");
    s.keys("ywP");
    assert_eq!(s.text(), "foo foo bar");
    assert_eq!(s.cursor(), 3);
}

#[test]
fn named_registers_are_separate_from_unnamed() {
    let mut s = Session::new("one\ntwo");
    s.keys("\"ayyjdd");
    assert_eq!(s.text(), "one");
    assert_eq!(s.unnamed().as_deref(), Some("two\n"));
    s.keys("\"ap");
    assert_eq!(s.text(), "one\none");
}

#[test]
fn put_from_empty_register_reports() {
    let mut s = Session::new("abc");
    s.keys("\"qp");
    assert_eq!(s.text(), "abc");
    assert_eq!(s.ui().error.as_deref(), Some("E353: Nothing in register q"));
}

#[test]
fn replace_char_with_count() {
    let mut s = Session::new("abcd");
    s.keys("rx");
    assert_eq!(s.text(), "xbcd");
    s.keys("3ry");
    assert_eq!(s.text(), "yyyd");
    assert_eq!(s.cursor(), 2);
    s.keys("5rz");
    assert_eq!(s.text(), "yyyd");
    assert_eq!(s.ui().error.as_deref(), Some("Cannot replace past the line end"));
}

#[test]
fn delete_to_line_end_and_change_to_line_end() {
    let mut s = Session::at("abc def", 4);
    s.keys("D");
    assert_eq!(s.text(), "abc ");
    assert_eq!(s.cursor(), 3);
    let mut s = Session::at("abc def", 4);
    s.keys("Cxyz<Esc>");
    assert_eq!(s.text(), "abc xyz");
}

#[test]
fn capital_x_deletes_before_cursor() {
    let mut s = Session::at("abcd", 3);
    s.keys("2X");
    assert_eq!(s.text(), "ad");
    assert_eq!(s.cursor(), 1);
}

#[test]
fn word_text_objects() {
    let mut s = Session::at("foo bar", 1);
    s.keys("diw");
    assert_eq!(s.text(), " bar");
    let mut s = Session::at("foo bar", 1);
    s.keys("daw");
    assert_eq!(s.text(), "bar");
    let mut s = Session::at("foo.bar baz", 1);
    s.keys("diW");
    assert_eq!(s.text(), " baz");
}

#[test]
fn cc_keeps_an_empty_line() {
    let mut s = Session::new("  abc\ndef");
    s.keys("ccX<Esc>");
    assert_eq!(s.text(), "X\ndef");
}

#[test]
fn escape_cancels_pending_operator() {
    let mut s = Session::new("abc");
    s.keys("d<Esc>x");
    assert_eq!(s.text(), "bc");
}

#[test]
fn line_motions() {
    let mut s = Session::new("  a b\nc\nd");
    s.keys("$");
    assert_eq!(s.cursor(), 4);
    s.keys("0");
    assert_eq!(s.cursor(), 0);
    s.keys("^");
    assert_eq!(s.cursor(), 2);
    s.keys("G");
    assert_eq!(s.cursor(), 8);
    s.keys("gg");
    assert_eq!(s.cursor(), 2);
    s.keys("2G");
    assert_eq!(s.cursor(), 6);
}

#[test]
fn vertical_motion_keeps_column() {
    let mut s = Session::at("abcd\nx\nabcd", 3);
    s.keys("j");
    assert_eq!(s.cursor(), 5);
    s.keys("j");
    assert_eq!(s.cursor(), 10);
    s.keys("$kk");
    assert_eq!(s.cursor(), 3);
}

#[test]
fn word_motion_stops_on_empty_line() {
    let mut s = Session::new("foo\n\nbar");
    s.keys("w");
    assert_eq!(s.cursor(), 4);
    s.keys("w");
    assert_eq!(s.cursor(), 5);
    s.keys("b");
    assert_eq!(s.cursor(), 4);
}

#[test]
fn insert_entry_points() {
    let mut s = Session::new("abc");
    s.keys("A!<Esc>");
    assert_eq!(s.text(), "abc!");
    assert_eq!(s.cursor(), 3);
    s.keys("I>");
    assert_eq!(s.text(), ">abc!");
    s.keys("<Esc>");
    let mut s = Session::new("ac");
    s.keys("ab<Esc>");
    assert_eq!(s.text(), "abc");
    assert_eq!(s.cursor(), 1);
}

#[test]
fn open_line_below_and_above() {
    let mut s = Session::new("abc");
    s.keys("ohi<Esc>");
    assert_eq!(s.text(), "abc\nhi");
    assert_eq!(s.cursor(), 5);
    let mut s = Session::new("abc");
    s.keys("Ohi<Esc>");
    assert_eq!(s.text(), "hi\nabc");
    assert_eq!(s.cursor(), 1);
}

#[test]
fn substitute_char() {
    let mut s = Session::new("abc");
    s.keys("2sX<Esc>");
    assert_eq!(s.text(), "Xc");
}

#[test]
fn search_and_repeat() {
    let mut s = Session::new("foo bar foo bar");
    s.keys("/bar<CR>");
    assert_eq!(s.cursor(), 4);
    assert_eq!(s.mode(), "normal");
    s.keys("n");
    assert_eq!(s.cursor(), 12);
    s.keys("n");
    assert_eq!(s.cursor(), 4);
    s.keys("N");
    assert_eq!(s.cursor(), 12);
    s.keys("?foo<CR>");
    assert_eq!(s.cursor(), 8);
    s.keys("n");
    assert_eq!(s.cursor(), 0);
}

#[test]
fn search_word_anchors() {
    let mut s = Session::new("barfoo foo");
    s.keys("/\\<foo<CR>");
    assert_eq!(s.cursor(), 7);
}

#[test]
fn n_without_search_reports() {
    let mut s = Session::new("abc");
    s.keys("n");
    assert_eq!(s.ui().error.as_deref(), Some("E35: No previous regular expression"));
}

#[test]
fn delete_key_acts_like_x() {
    let mut s = Session::new("abc");
    s.keys("<Del>");
    assert_eq!(s.text(), "bc");
}
