use neko_derive::Reflect;

#[derive(Reflect)]
struct Inner {
    x: i32,
    y: i32,
}

#[derive(Reflect)]
struct Demo {
    a: i32,
    b: String,
    c: Option<i32>,
    inner: Inner,
}

#[test]
fn single_line_record_with_nested_record() {
    let value = Demo {
        a: 1,
        b: "hi".to_string(),
        c: None,
        inner: Inner { x: 2, y: 3 },
    };
    let text = neko_print::to_string(&value).unwrap();
    assert_eq!(
        text,
        r#"{ a = 1, b = "hi", c = null, inner = { x = 2, y = 3 } }"#
    );
}

#[test]
fn sequence_field_renders_as_bracketed_list() {
    #[derive(Reflect)]
    struct Seq {
        items: Vec<i32>,
    }
    let text = neko_print::to_string(&Seq {
        items: vec![1, 2, 3],
    })
    .unwrap();
    assert_eq!(text, "{ items = [1, 2, 3] }");
}
