use unpacker_core::ResourceMatcher;

#[test]
fn globs_use_shell_semantics() {
    let matcher = ResourceMatcher::new(["war/*.htm"]);
    assert!(matcher.matches("war/page.htm"));
    assert!(!matcher.matches("other/page.htm"));
    assert!(!matcher.matches("war/page.txt"));
}

#[test]
fn star_crosses_directory_separators() {
    let matcher = ResourceMatcher::new(["*"]);
    assert!(matcher.matches("page.htm"));
    assert!(matcher.matches("deep/nested/page.htm"));

    let matcher = ResourceMatcher::new(["*.html"]);
    assert!(matcher.matches("popup/settings.html"));
}

#[test]
fn question_marks_and_classes_match_single_characters() {
    let matcher = ResourceMatcher::new(["war/page?.htm", "doc[ab].htm"]);
    assert!(matcher.matches("war/page1.htm"));
    assert!(!matcher.matches("war/page12.htm"));
    assert!(matcher.matches("doca.htm"));
    assert!(!matcher.matches("docc.htm"));
}

#[test]
fn invalid_patterns_are_dropped() {
    let matcher = ResourceMatcher::new(["[", "war/*.htm"]);
    assert!(!matcher.is_empty());
    assert!(matcher.matches("war/page.htm"));
    assert!(!matcher.matches("["));

    let matcher = ResourceMatcher::new(["["]);
    assert!(matcher.is_empty());
    assert!(!matcher.matches("anything"));
}

#[test]
fn empty_declaration_matches_nothing() {
    let matcher = ResourceMatcher::new(Vec::<String>::new());
    assert!(matcher.is_empty());
    assert!(!matcher.matches("war/page.htm"));
}
