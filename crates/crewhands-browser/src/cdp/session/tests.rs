use super::core::PageSession;

#[test]
fn test_quad_center() {
    let quad = vec![0.0, 0.0, 100.0, 0.0, 100.0, 100.0, 0.0, 100.0];
    let (x, y) = PageSession::quad_center(&quad);
    assert_eq!(x, 50.0);
    assert_eq!(y, 50.0);
}

#[test]
fn test_quad_center_short_quad() {
    assert_eq!(PageSession::quad_center(&[1.0, 2.0]), (0.0, 0.0));
}

#[test]
fn test_get_modifiers() {
    let modifiers = ["Control", "Shift"];
    let flags = PageSession::get_modifiers(&modifiers);
    assert_eq!(flags, 10); // 2 + 8
}

#[test]
fn test_get_modifiers_ignores_keys() {
    assert_eq!(PageSession::get_modifiers(&["Meta", "a"]), 4);
    assert_eq!(PageSession::get_modifiers(&[]), 0);
}
