extern crate conveyor;

use conveyor::res::shortcut::ShortcutResolver;

#[test]
fn basic() {
    let mut shortcuts = ShortcutResolver::new();

    shortcuts.add("home:", "file://docs/").unwrap();
    shortcuts.add("a:", "home:").unwrap();
    shortcuts.add("b:", "a:conveyor/").unwrap();

    assert!(shortcuts.has("home:"));
    assert!(shortcuts.has("a:"));
    assert!(shortcuts.has("b:"));
    assert!(!shortcuts.has("abc:"));

    assert_eq!(shortcuts.resolve("home:"), Some("file://docs/".into()));
    assert_eq!(shortcuts.resolve("b:"), Some("file://docs/conveyor/".into()));
    assert_eq!(shortcuts.resolve("b:a.png"), Some("file://docs/conveyor/a.png".into()));

    shortcuts.add("home:", "mem://").unwrap();
    assert_eq!(shortcuts.resolve("b:"), Some("mem://conveyor/".into()));

    // Sources without shortcuts are kept as is.
    assert_eq!(shortcuts.resolve("a.png"), Some("a.png".into()));
    assert_eq!(shortcuts.resolve("undefined:a.png"), None);
}

#[test]
fn err() {
    let mut shortcuts = ShortcutResolver::new();
    // Shortcut MUST ends with a colon (':').
    assert!(shortcuts.add("home", "file://docs/").is_err());
    // Shortcut MUST be at least 2 chars to not be confused with DOS drive letters.
    assert!(shortcuts.add(":", "file://docs/").is_err());
    // Fullname must end in a '/' (dir) or ':' (other shortcut).
    assert!(shortcuts.add("home:", "file://docs").is_err());
}
