/// Path language tests: parsing, canonical formatting, getter and setter
/// evaluation, and the error classes each step raises.
use persist_core::{ListState, ObjectState, Path, PathKey, PersistError, Shape, State, StateKind};

fn world() -> State {
    State::Object(ObjectState::from_iter([
        ("a", State::string("text")),
        ("empty", State::object()),
        (
            "players",
            State::List(ListState::from_iter([
                State::Object(ObjectState::from_iter([
                    ("name", State::string("Ann")),
                    ("pos", State::vector2(1.0, 2.0)),
                ])),
                State::Object(ObjectState::from_iter([("name", State::string("Bo"))])),
            ])),
        ),
    ]))
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn parse_mixed_segments() {
    let path = Path::parse("a[1].b").unwrap();
    assert_eq!(
        path.keys(),
        vec![
            &PathKey::Field("a".into()),
            &PathKey::Index(1),
            &PathKey::Field("b".into())
        ]
    );
    assert_eq!(path.len(), 3);
}

#[test]
fn parse_empty_is_root() {
    let path = Path::parse("").unwrap();
    assert!(path.is_empty());
    assert_eq!(path, Path::root());
}

#[test]
fn leading_bracket_or_dot_is_format_error() {
    for text in ["[1]", ".a"] {
        match Path::parse(text) {
            Err(PersistError::PathFormat { position, .. }) => assert_eq!(position, 0),
            other => panic!("expected format error for {text:?}, got {other:?}"),
        }
    }
}

#[test]
fn malformed_brackets_are_format_errors() {
    for text in ["a[", "a[1", "a[x]", "a[1x]", "a[]", "a..b", "a.", "a b"] {
        let err = Path::parse(text).unwrap_err();
        assert!(err.is_format(), "{text:?} gave {err}");
        assert!(!err.is_evaluation());
    }
}

#[test]
fn display_is_canonical_and_reparses() {
    for text in ["a", "a.b", "a[0]", "players[10].pos.x", "x_y-z[3][4]"] {
        let path: Path = text.parse().unwrap();
        assert_eq!(path.to_string(), text);
        assert_eq!(Path::parse(&path.to_string()).unwrap(), path);
    }
}

#[test]
fn builders_extend_without_mutating() {
    let base = Path::parse("players").unwrap();
    let first = base.index(0);
    let name = first.field("name");
    assert_eq!(base.to_string(), "players");
    assert_eq!(name.to_string(), "players[0].name");
    assert_eq!(name.parent(), Some(first.clone()));
    assert_eq!(name.key(), Some(&PathKey::Field("name".into())));
    assert_eq!(Path::root().parent(), None);
}

// ============================================================================
// Getter
// ============================================================================

#[test]
fn get_walks_objects_lists_and_composites() {
    let root = world();
    let name = Path::parse("players[1].name").unwrap().get(&root).unwrap();
    assert_eq!(name.as_ref(), &State::string("Bo"));

    let y = Path::parse("players[0].pos.y").unwrap().get(&root).unwrap();
    assert_eq!(y.into_owned(), State::float(2.0));
    let x = Path::parse("players[0].pos[0]").unwrap().get(&root).unwrap();
    assert_eq!(x.into_owned(), State::float(1.0));
}

#[test]
fn get_field_on_scalar_is_shape_error() {
    let root = world();
    let err = Path::parse("a.b").unwrap().get(&root).unwrap_err();
    assert!(matches!(
        err,
        PersistError::ShapeMismatch {
            expected: Shape::Object,
            found: StateKind::String
        }
    ));
    assert!(err.is_evaluation());
}

#[test]
fn get_index_on_object_is_shape_error() {
    let err = Path::parse("empty[0]").unwrap().get(&world()).unwrap_err();
    assert!(matches!(
        err,
        PersistError::ShapeMismatch {
            expected: Shape::List,
            found: StateKind::Object
        }
    ));
}

#[test]
fn missing_children_are_undefined_errors() {
    let root = world();
    let err = Path::parse("empty.missing").unwrap().get(&root).unwrap_err();
    assert!(matches!(err, PersistError::UndefinedField(ref name) if name == "missing"));

    let err = Path::parse("players[7]").unwrap().get(&root).unwrap_err();
    assert!(matches!(err, PersistError::UndefinedItem(7)));

    let err = Path::parse("players[0].pos.z").unwrap().get(&root).unwrap_err();
    assert!(matches!(err, PersistError::UndefinedField(_)));
}

#[test]
fn descending_into_a_component_is_shape_error() {
    let err = Path::parse("players[0].pos.x.y").unwrap().get(&world()).unwrap_err();
    assert!(matches!(
        err,
        PersistError::ShapeMismatch {
            found: StateKind::Float,
            ..
        }
    ));
}

// ============================================================================
// Setter
// ============================================================================

#[test]
fn set_upserts_object_fields() {
    let mut root = world();
    let path = Path::parse("players[1].level").unwrap();
    path.set(&mut root, State::int(4)).unwrap();
    assert_eq!(path.get(&root).unwrap().into_owned(), State::int(4));
}

#[test]
fn set_replaces_list_items_and_bounds_checks() {
    let mut root = world();
    Path::parse("players[1]")
        .unwrap()
        .set(&mut root, State::string("gone"))
        .unwrap();
    assert_eq!(
        root.get_at_path::<String>("players[1]").unwrap().as_deref(),
        Some("gone")
    );

    let err = Path::parse("players[2]")
        .unwrap()
        .set(&mut root, State::int(0))
        .unwrap_err();
    assert!(matches!(err, PersistError::OutOfBounds { index: 2, len: 2 }));
}

#[test]
fn set_through_composite_views_stays_in_sync() {
    let mut root = world();
    Path::parse("players[0].pos[1]")
        .unwrap()
        .set(&mut root, State::float(9.0))
        .unwrap();
    assert_eq!(
        root.get_at_path::<f32>("players[0].pos.y").unwrap(),
        Some(9.0)
    );
    assert_eq!(
        root.get_at_path::<glam::Vec2>("players[0].pos").unwrap(),
        Some(glam::Vec2::new(1.0, 9.0))
    );
}

#[test]
fn set_with_missing_parent_is_undefined_error() {
    let mut root = world();
    let before = root.clone();
    let err = Path::parse("nobody.name")
        .unwrap()
        .set(&mut root, State::int(1))
        .unwrap_err();
    assert!(matches!(err, PersistError::UndefinedField(_)));
    assert_eq!(root, before);
}

#[test]
fn set_on_scalar_parent_is_shape_error() {
    let mut root = world();
    let err = Path::parse("a.b")
        .unwrap()
        .set(&mut root, State::int(1))
        .unwrap_err();
    assert!(matches!(
        err,
        PersistError::ShapeMismatch {
            expected: Shape::Object,
            found: StateKind::String
        }
    ));
}

#[test]
fn set_root_replaces_whole_tree() {
    let mut root = world();
    Path::root().set(&mut root, State::int(1)).unwrap();
    assert_eq!(root, State::int(1));
}

#[test]
fn set_of_get_is_identity() {
    let original = world();
    for text in ["a", "players", "players[0]", "players[0].pos", "players[0].pos.x", "players[1].name"] {
        let mut root = original.clone();
        let path = Path::parse(text).unwrap();
        let value = path.get(&root).unwrap().into_owned();
        path.set(&mut root, value).unwrap();
        assert_eq!(root, original, "path {text}");
    }
}
