use neko_derive::Reflect;
use neko_proto::{Proto, ProtoFactory};

#[derive(Reflect, Debug, Default, Clone, PartialEq)]
#[neko(name = "demo.Alpha")]
struct Alpha {
    a: i32,
    b: String,
}
impl Proto for Alpha {}
neko_proto::register_proto!(Alpha);

#[derive(Reflect, Debug, Default, Clone, PartialEq)]
#[neko(name = "demo.Beta")]
struct Beta {
    x: i32,
}
impl Proto for Beta {}
neko_proto::register_proto!(Beta);

#[test]
fn distinct_names_get_distinct_ids() {
    let alpha_id = ProtoFactory::type_id::<Alpha>().unwrap();
    let beta_id = ProtoFactory::type_id::<Beta>().unwrap();
    assert_ne!(alpha_id, beta_id);
    assert!(alpha_id > neko_proto::RESERVED_BASE);
    assert!(beta_id > neko_proto::RESERVED_BASE);
}

#[test]
fn iproto_type_id_matches_factory_type_id() {
    let proto = ProtoFactory::create("demo.Alpha").unwrap();
    assert_eq!(proto.type_id(), ProtoFactory::type_id::<Alpha>().unwrap());
    assert_eq!(proto.name(), "demo.Alpha");
}

#[test]
fn encode_then_decode_round_trips_through_iproto() {
    let mut proto = ProtoFactory::wrap(Alpha {
        a: 7,
        b: "seven".to_string(),
    });
    let bytes = proto.encode().unwrap();

    let mut fresh = ProtoFactory::create("demo.Alpha").unwrap();
    fresh.decode(&bytes).unwrap();
    assert_eq!(fresh.downcast_ref::<Alpha>().unwrap().a, 7);

    proto.decode(&bytes).unwrap();
    assert_eq!(proto.downcast_ref::<Alpha>(), fresh.downcast_ref::<Alpha>());
}

#[test]
fn create_by_id_finds_the_same_registration_as_create_by_name() {
    let id = ProtoFactory::type_id::<Beta>().unwrap();
    let by_id = ProtoFactory::create_by_id(id).unwrap();
    assert_eq!(by_id.name(), "demo.Beta");
}

#[test]
fn unknown_name_is_an_error() {
    assert!(ProtoFactory::create("demo.NoSuchThing").is_err());
}

#[test]
fn reflection_object_exposes_field_names() {
    let proto = ProtoFactory::wrap(Alpha {
        a: 1,
        b: "x".to_string(),
    });
    let table = proto.reflection_object();
    assert_eq!(table.get_field::<i32>("a").unwrap(), 1);
}
