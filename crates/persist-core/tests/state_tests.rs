/// Value tree contract tests: typed access, container operations, shape
/// checks and the two views of composite states.
use persist_core::{
    Composite, ListState, ObjectState, PersistError, Shape, State, StateKind,
};

fn sample_object() -> ObjectState {
    ObjectState::from_iter([
        ("name", State::string("Hero")),
        ("hp", State::int(30)),
        ("xp", State::long(1_000_000)),
        ("speed", State::float(1.5)),
    ])
}

// ============================================================================
// Typed access
// ============================================================================

#[test]
fn typed_get_never_coerces_between_widths() {
    let obj = sample_object();
    assert_eq!(obj.get::<i32>("hp"), Some(&30));
    assert_eq!(obj.get::<i64>("hp"), None);
    assert_eq!(obj.get::<i64>("xp"), Some(&1_000_000));
    assert_eq!(obj.get::<f64>("speed"), None);
    assert_eq!(obj.get::<f32>("speed"), Some(&1.5));
}

#[test]
fn object_get_or_uses_default_on_absent_or_wrong_type() {
    let obj = sample_object();
    assert_eq!(obj.get_or("hp", 0), 30);
    assert_eq!(obj.get_or("mana", 5), 5);
    assert_eq!(obj.get_or("name", 5), 5);
    assert_eq!(obj.get_or("name", String::new()), "Hero");
}

#[test]
fn list_get_out_of_range_returns_default() {
    let list = ListState::from_iter([State::int(1), State::int(2)]);
    assert_eq!(list.get_or(5, -1), -1);
    assert_eq!(list.get::<i32>(5), None);
}

#[test]
fn list_set_out_of_range_is_bounds_error() {
    let mut list = ListState::from_iter([State::int(1), State::int(2)]);
    let err = list.set(5, State::int(9)).unwrap_err();
    assert!(matches!(err, PersistError::OutOfBounds { index: 5, len: 2 }));
    list.set(1, State::int(9)).unwrap();
    assert_eq!(list.get::<i32>(1), Some(&9));
}

#[test]
fn filtered_enumeration() {
    let list = ListState::from_iter([
        State::int(3),
        State::string("skip"),
        State::int(8),
        State::int(12),
    ]);
    let evens: Vec<i32> = list.get_all_where(|n: &i32| n % 2 == 0).copied().collect();
    assert_eq!(evens, vec![8, 12]);

    let obj = sample_object();
    let numeric: Vec<&str> = obj.get_all_keys::<i32>().collect();
    assert_eq!(numeric, vec!["hp"]);
    let names: Vec<&String> = obj.get_all_values::<String>().collect();
    assert_eq!(names, vec!["Hero"]);
}

fn labels(list: &ListState) -> Vec<&String> {
    list.get_all::<String>().collect()
}

fn positions(obj: &ObjectState) -> Vec<(&str, &glam::Vec3)> {
    obj.get_all::<glam::Vec3>().collect()
}

#[test]
fn typed_enumeration_borrows_from_container() {
    let list = ListState::from_iter([State::string("a"), State::int(1), State::string("b")]);
    assert_eq!(labels(&list), vec!["a", "b"]);

    let obj = ObjectState::from_iter([
        ("spawn", State::vector3(0.0, 1.0, 0.0)),
        ("name", State::string("Hero")),
    ]);
    assert_eq!(positions(&obj), vec![("spawn", &glam::Vec3::Y)]);
    assert_eq!(obj.get_all_keys::<String>().collect::<Vec<_>>(), vec!["name"]);
}

#[test]
fn fluent_nested_building() {
    let mut root = ObjectState::new();
    let quests = root.set_new_list("quests");
    let first = quests.add_new_object();
    first.set("id", "q1");
    first.set_new_list("steps").add(State::bool(true));

    let state = State::Object(root);
    assert_eq!(
        state.get_at_path::<bool>("quests[0].steps[0]").unwrap(),
        Some(true)
    );
}

// ============================================================================
// Equality and ownership
// ============================================================================

#[test]
fn equality_is_structural() {
    let a = State::Object(ObjectState::from_iter([
        ("a", State::List(ListState::from_iter([State::int(1)]))),
        ("b", State::vector2(1.0, 2.0)),
    ]));
    let b = State::Object(ObjectState::from_iter([
        ("b", State::vector2(1.0, 2.0)),
        ("a", State::List(ListState::from_iter([State::int(1)]))),
    ]));
    assert_eq!(a, b);
    assert_ne!(a, State::object());
    assert_ne!(State::int(1), State::long(1));
}

#[test]
fn inserted_values_are_independent_copies() {
    let shared = State::List(ListState::from_iter([State::int(1)]));
    let mut root = ObjectState::new();
    root.set("a", shared.clone());
    root.set("b", shared);
    root.get_mut::<ListState>("a").unwrap().add(State::int(2));
    assert_eq!(root.get::<ListState>("a").map(ListState::len), Some(2));
    assert_eq!(root.get::<ListState>("b").map(ListState::len), Some(1));
}

// ============================================================================
// Shapes
// ============================================================================

#[test]
fn shapes_by_kind() {
    assert_eq!(State::int(1).shape(), Shape::Scalar);
    assert_eq!(State::list().shape(), Shape::List);
    assert_eq!(State::object().shape(), Shape::Object);
    assert_eq!(State::vector3_int(1, 2, 3).shape(), Shape::Composite);
    assert!(Shape::Composite.is_list_like() && Shape::Composite.is_object_like());
    assert_eq!(State::quaternion(0.0, 0.0, 0.0, 1.0).kind(), StateKind::Quaternion);
}

#[test]
fn container_operation_on_wrong_shape_is_shape_error() {
    let mut object = State::object();
    let err = object.set_item(0, State::int(1)).unwrap_err();
    assert!(matches!(
        err,
        PersistError::Shape {
            found: StateKind::Object,
            ..
        }
    ));

    let list = State::list();
    assert!(matches!(
        list.field("x"),
        Err(PersistError::Shape {
            found: StateKind::List,
            ..
        })
    ));
    assert!(State::string("s").item(0).is_err());
}

// ============================================================================
// Composite dual views
// ============================================================================

#[test]
fn composite_views_share_backing_fields() {
    let mut v = State::vector3(1.0, 2.0, 3.0);
    assert_eq!(v.item(0).unwrap().unwrap().into_owned(), State::float(1.0));
    assert_eq!(v.field("x").unwrap().unwrap().into_owned(), State::float(1.0));

    v.set_item(2, State::float(7.0)).unwrap();
    assert_eq!(v.field("z").unwrap().unwrap().into_owned(), State::float(7.0));

    v.set_field("y", State::float(-4.0)).unwrap();
    assert_eq!(v.item(1).unwrap().unwrap().into_owned(), State::float(-4.0));
    assert_eq!(v, State::vector3(1.0, -4.0, 7.0));
}

#[test]
fn composite_ignores_incompatible_writes() {
    let mut v = State::vector2_int(4, 5);
    v.set_field("x", State::float(1.0)).unwrap();
    v.set_field("x", State::long(1)).unwrap();
    v.set_field("w", State::int(1)).unwrap();
    v.set_item(9, State::int(1)).unwrap();
    assert_eq!(v, State::vector2_int(4, 5));

    v.set_field("x", State::int(1)).unwrap();
    assert_eq!(v, State::vector2_int(1, 5));
}

#[test]
fn composite_out_of_range_reads_are_absent() {
    let v = State::vector2(1.0, 2.0);
    assert!(v.item(2).unwrap().is_none());
    assert!(v.field("z").unwrap().is_none());
}

#[test]
fn quaternion_exposes_both_views() {
    let q = State::quaternion(0.1, 0.2, 0.3, 0.9);
    let names: Vec<String> = q.fields().into_iter().map(|(k, _)| k.into_owned()).collect();
    assert_eq!(names, vec!["x", "y", "z", "w"]);
    assert_eq!(q.items().len(), 4);
    assert_eq!(q.item(3).unwrap().unwrap().into_owned(), State::float(0.9));
}

#[test]
fn composite_trait_metadata() {
    assert_eq!(<glam::Vec3 as Composite>::FIELDS, &["x", "y", "z"]);
    assert_eq!(<glam::IVec2 as Composite>::KIND, StateKind::Vector2Int);
    assert_eq!(<glam::Quat as Composite>::field_index("w"), Some(3));
}

// ============================================================================
// Enum helpers
// ============================================================================

#[derive(Debug, PartialEq)]
enum Difficulty {
    Easy,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Difficulty::Easy => "Easy",
            Difficulty::Hard => "Hard",
        })
    }
}

impl std::str::FromStr for Difficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, ()> {
        match s {
            "Easy" => Ok(Difficulty::Easy),
            "Hard" => Ok(Difficulty::Hard),
            _ => Err(()),
        }
    }
}

#[test]
fn enums_round_trip_through_string_states() {
    let state = State::from_enum(&Difficulty::Hard);
    assert_eq!(state, State::string("Hard"));
    assert_eq!(state.to_enum(Difficulty::Easy), Difficulty::Hard);
    assert_eq!(State::string("Nightmare").to_enum(Difficulty::Easy), Difficulty::Easy);
    assert_eq!(State::int(1).to_enum(Difficulty::Easy), Difficulty::Easy);
}
