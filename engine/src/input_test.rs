use super::*;

// =============================================================
// Tool
// =============================================================

#[test]
fn tool_default_is_select() {
    assert_eq!(Tool::default(), Tool::Select);
}

#[test]
fn tool_element_kinds() {
    assert_eq!(Tool::Select.element_kind(), None);
    assert_eq!(Tool::Pan.element_kind(), None);
    assert_eq!(Tool::Ellipse.element_kind(), Some(ElementKind::Shape));
    assert_eq!(Tool::Arrow.element_kind(), Some(ElementKind::Arrow));
    assert_eq!(Tool::Note.element_kind(), Some(ElementKind::Note));
}

#[test]
fn shape_tools_override_shape_prop() {
    assert_eq!(Tool::Diamond.overrides()["shape"], "diamond");
    assert!(Tool::Draw.overrides().is_empty());
}

#[test]
fn tool_names_parse() {
    for (name, tool) in [("select", Tool::Select), ("rectangle", Tool::Rectangle), ("draw", Tool::Draw)] {
        assert_eq!(Tool::from_name(name), Some(tool));
    }
    assert_eq!(Tool::from_name("lasso"), None);
}

// =============================================================
// Modifiers / Key
// =============================================================

#[test]
fn modifiers_default_all_false() {
    let m = Modifiers::default();
    assert!(!m.shift && !m.ctrl && !m.alt && !m.meta);
    assert!(!m.command());
}

#[test]
fn command_is_ctrl_or_meta() {
    assert!(Modifiers { ctrl: true, ..Modifiers::default() }.command());
    assert!(Modifiers { meta: true, ..Modifiers::default() }.command());
}

#[test]
fn key_name_lowercases_letters_only() {
    assert_eq!(Key("Z".into()).name(), "z");
    assert_eq!(Key("Escape".into()).name(), "Escape");
}

// =============================================================
// InputState
// =============================================================

#[test]
fn input_state_default_is_idle() {
    assert!(matches!(InputState::default(), InputState::Idle));
    assert_eq!(InputState::default().name(), "idle");
}

#[test]
fn ui_state_default() {
    let ui = UiState::default();
    assert_eq!(ui.tool, Tool::Select);
    assert!(!ui.tool_lock);
    assert!(ui.marquee.is_none());
    assert!(ui.editing.is_none());
}
