use neko_derive::Reflect;
use neko_reflection::{ReflectionTable, ReflectionTableMut};

#[derive(Reflect)]
struct Point {
    x: i32,
    y: i32,
}

#[test]
fn get_field_returns_a_copy_when_types_match() {
    let p = Point { x: 3, y: 4 };
    let table = ReflectionTable::capture(&p);
    assert_eq!(table.get_field::<i32>("x").unwrap(), 3);
    assert_eq!(table.get_field::<i32>("y").unwrap(), 4);
}

#[test]
fn get_field_fails_on_type_mismatch() {
    let p = Point { x: 3, y: 4 };
    let table = ReflectionTable::capture(&p);
    assert!(table.get_field::<String>("x").is_err());
}

#[test]
fn get_field_fails_on_unknown_name() {
    let p = Point { x: 3, y: 4 };
    let table = ReflectionTable::capture(&p);
    assert!(table.get_field::<i32>("z").is_err());
}

#[test]
fn set_field_writes_through_the_stored_pointer() {
    let mut p = Point { x: 3, y: 4 };
    {
        let mut table = ReflectionTableMut::capture(&mut p);
        table.set_field("x", 100i32).unwrap();
    }
    assert_eq!(p.x, 100);
}

#[test]
fn bind_field_exposes_non_member_data_and_replaces_on_rebind() {
    let mut p = Point { x: 1, y: 2 };
    let mut extra = 42i32;
    let mut table = ReflectionTableMut::capture(&mut p);
    table.bind_field("extra", &mut extra);
    assert_eq!(table.get_field::<i32>("extra").unwrap(), 42);

    table.set_field("extra", 99i32).unwrap();
    drop(table);
    assert_eq!(extra, 99);
}
