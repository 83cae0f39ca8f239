//! Tests for files, text cursors, and JSON documents

mod common;

use common::{check_children, check_summary, ptr, Blob, Image, Json};

#[test]
fn test_qfile()
{
    for mut image in [Image::qt5(), Image::qt6()] {
        let open = image.qfile("/tmp/log.txt", 0x3, 0);
        let open = image.place(open);
        let failed = image.qfile("/root/secret", 0, 5);
        let failed = image.place(failed);
        let detached = image.place(vec![0; 16]);
        let inspector = image.finish();

        check_summary(
            &inspector,
            open,
            "QFile",
            Some("{filename=/tmp/log.txt, openmode=read|write, error=NoError}"),
        );
        check_summary(
            &inspector,
            failed,
            "QFile",
            Some("{filename=/root/secret, openmode=closed, error=OpenError}"),
        );
        check_summary(&inspector, detached, "QFile", None);
    }
}

#[test]
fn test_qfile_ignores_unknown_mode_bits()
{
    let mut image = Image::qt6();
    let file = image.qfile("a", 0x1 | 0x10 | 0x1000, 42);
    let file = image.place(file);
    let inspector = image.finish();

    check_summary(&inspector, file, "QFile", Some("{filename=a, openmode=read|text, error=42}"));
}

#[test]
fn test_qtextcursor()
{
    for mut image in [Image::qt5(), Image::qt6()] {
        let cursor = image.qtextcursor(3, 7);
        let cursor = image.place(cursor);
        let null = image.place(ptr(0));
        let inspector = image.finish();

        check_summary(&inspector, cursor, "QTextCursor", Some("{pos=3, anchor=7}"));
        check_summary(&inspector, null, "QTextCursor", None);
    }
}

#[test]
fn test_json_array()
{
    let mut image = Image::qt6();
    let array = image.json_array(&[
        Json::Int(1),
        Json::Str("two".to_string()),
        Json::Double(2.5),
        Json::Bool(true),
        Json::Null,
    ]);
    let array = image.place(array);
    let empty = image.place(ptr(0));
    let inspector = image.finish();

    check_summary(&inspector, array, "QJsonArray", Some("size=5"));
    check_children(
        &inspector,
        array,
        "QJsonArray",
        &[("[0]", "1"), ("[1]", "\"two\""), ("[2]", "2.5"), ("[3]", "true"), ("[4]", "null")],
    );
    check_summary(&inspector, empty, "QJsonArray", Some("size=0"));
    check_children(&inspector, empty, "QJsonArray", &[]);
}

#[test]
fn test_nested_json_array()
{
    let mut image = Image::qt6();
    let array = image.json_array(&[Json::Array(vec![Json::Int(7), Json::Int(8)]), Json::Bool(false)]);
    let array = image.place(array);
    let inspector = image.finish();

    check_children(&inspector, array, "QJsonArray", &[("[0]", "size=2"), ("[1]", "false")]);
}

#[test]
fn test_json_object()
{
    let mut image = Image::qt6();
    let object = image.json_object(&[
        ("name", Json::Str("lumen".to_string())),
        ("answer", Json::Int(42)),
        ("list", Json::Array(vec![Json::Null])),
    ]);
    let object = image.place(object);
    let inspector = image.finish();

    check_summary(&inspector, object, "QJsonObject", Some("size=3"));
    check_children(
        &inspector,
        object,
        "QJsonObject",
        &[("[\"name\"]", "\"lumen\""), ("[\"answer\"]", "42"), ("[\"list\"]", "size=1")],
    );
}

#[test]
fn test_json_value_scalars()
{
    let mut image = Image::qt6();
    let number = image.json_value(0x00, -3);
    let number = image.place(number);
    let truth = image.json_value(0x15, 0);
    let truth = image.place(truth);
    let null = image.json_value(0x16, 0);
    let null = image.place(null);
    let inspector = image.finish();

    check_summary(&inspector, number, "QJsonValue", Some("-3"));
    check_summary(&inspector, truth, "QJsonValue", Some("true"));
    check_summary(&inspector, null, "QJsonValue", Some("null"));
    check_children(&inspector, number, "QJsonValue", &[]);
}

#[test]
fn test_json_value_holding_array()
{
    let mut image = Image::qt6();
    let array = image.json_array(&[Json::Int(1), Json::Int(2)]);
    let value = image.place(Blob::new(24).bytes(8, &array).i32(16, 0x80).into_vec());
    let inspector = image.finish();

    check_summary(&inspector, value, "QJsonValue", Some("size=2"));
    check_children(&inspector, value, "QJsonValue", &[("[0]", "1"), ("[1]", "2")]);
}

#[test]
fn test_json_value_holding_string()
{
    let mut image = Image::qt6();
    let array = image.json_array(&[Json::Str("inner".to_string())]);
    let value = image.place(Blob::new(24).i64(0, 0).bytes(8, &array).i32(16, 0x60).into_vec());
    let empty = image.json_value(0x60, 0);
    let empty = image.place(empty);
    let inspector = image.finish();

    check_summary(&inspector, value, "QJsonValue", Some("\"inner\""));
    check_summary(&inspector, empty, "QJsonValue", Some("\"\""));
}

#[test]
fn test_json_is_not_available_before_qt6()
{
    let mut image = Image::qt5();
    let array = image.place(ptr(0));
    let inspector = image.finish();

    check_summary(&inspector, array, "QJsonArray", None);
    check_children(&inspector, array, "QJsonArray", &[]);
}
