mod common;
use common::*;

use pretty_assertions::assert_eq;

#[test]
fn typing_into_empty_buffer() {
    let mut s = Session::new("");
    s.keys("ihello<Esc>");
    assert_eq!(s.text(), "hello");
    assert_eq!(s.cursor(), 4);
    assert_eq!(s.ui().mode, "NORMAL");
}

#[test]
fn enter_and_backspace_in_insert() {
    let mut s = Session::new("ab");
    s.keys("lix<CR>y<BS><BS><BS>");
    assert_eq!(s.text(), "ab");
    s.keys("<CR><Esc>");
    assert_eq!(s.text(), "a\nb");
    assert_eq!(s.cursor(), 2);
}

#[test]
fn escape_at_line_start_stays_put() {
    let mut s = Session::new("ab\ncd");
    s.keys("ji<Esc>");
    assert_eq!(s.cursor(), 3);
}

#[test]
fn insert_control_keys() {
    let mut s = Session::new("");
    s.keys("ifoo bar<C-w>baz<Esc>");
    assert_eq!(s.text(), "foo baz");
    let mut s = Session::new("keep");
    s.keys("A typed<C-u>!<Esc>");
    assert_eq!(s.text(), "keep!");
}

#[test]
fn replace_mode_overwrites_and_backspace_restores() {
    let mut s = Session::new("abc");
    s.keys("Rxy<Esc>");
    assert_eq!(s.text(), "xyc");
    assert_eq!(s.cursor(), 1);
    let mut s = Session::new("abc");
    s.keys("Rxyzw<BS>");
    assert_eq!(s.text(), "xyz");
    s.keys("<BS><BS><Esc>");
    assert_eq!(s.text(), "xbc");
    assert_eq!(s.cursor(), 0);
}

#[test]
fn line_completion_through_the_coordinator() {
    let mut s = Session::at("foo bar\nf", 8);
    s.keys("A<C-x>");
    assert_eq!(s.mode(), "insert expand");
    assert_eq!(s.ui().mode, "^X mode (^L^N^P)");
    s.keys("<C-l>");
    assert_eq!(s.text(), "foo bar\nfoo bar");
    assert_eq!(s.ui().info.as_deref(), Some("match 1 of 1"));
    s.keys("<C-l>");
    assert_eq!(s.text(), "foo bar\nf");
    assert_eq!(s.ui().info.as_deref(), Some("Back at original"));
    s.keys("<C-n>!<Esc>");
    assert_eq!(s.text(), "foo bar\nfoo bar!");
    assert_eq!(s.mode(), "normal");
}

#[test]
fn goto_line_from_command_line() {
    let mut s = Session::new("one\n  two\nthree");
    s.keys(":2");
    assert_eq!(s.mode(), "command");
    assert_eq!(s.ui().command_line.as_deref(), Some(":2"));
    s.keys("<CR>");
    assert_eq!(s.mode(), "normal");
    assert_eq!(s.cursor(), 6);
    assert_eq!(s.ui().command_line, None);
}

#[test]
fn unknown_command_reports_and_returns_to_normal() {
    let mut s = Session::new("abc");
    s.keys(":bogus<CR>");
    assert_eq!(s.mode(), "normal");
    assert_eq!(s.ui().error.as_deref(), Some("E492: Not an editor command: bogus"));
    assert_eq!(s.text(), "abc");
}

#[test]
fn command_line_editing_keys() {
    let mut s = Session::new("a\nb\nc");
    s.keys(":xyz<C-u>3<CR>");
    assert_eq!(s.cursor(), 4);
    s.keys(":<BS>");
    assert_eq!(s.mode(), "normal");
    s.keys(":1<Esc>");
    assert_eq!(s.mode(), "normal");
    assert_eq!(s.cursor(), 4);
}

#[test]
fn mapping_defined_on_the_command_line() {
    let mut s = Session::new("one\ntwo");
    s.keys(":nnoremap Q dd<CR>");
    s.keys("Q");
    assert_eq!(s.text(), "two");
    s.keys(":nunmap Q<CR>Q");
    assert_eq!(s.text(), "two");
    s.keys(":nunmap Q<CR>");
    assert_eq!(s.ui().error.as_deref(), Some("E31: No such mapping"));
}

#[test]
fn listing_mappings_from_the_command_line() {
    let mut s = Session::new("");
    s.keys(":imap jj <lt>Esc><CR>");
    s.keys(":inoremap kk x<CR>");
    s.keys(":imap<CR>");
    assert_eq!(s.ui().info.as_deref(), Some("insert  jj <Esc>\ninsert  kk * x"));
    s.keys(":nmap<CR>");
    assert_eq!(s.ui().info.as_deref(), Some("No mapping found"));
}
