//! Tests for `QObject` and application objects

mod common;

use common::{check_children, check_summary, int, Image};
use lumen_core::FormatOptions;

fn int_variant(image: &mut Image, value: i32) -> Vec<u8>
{
    if image.version().major() >= 6 {
        image.qvariant6("int", &int(value))
    } else {
        image.qvariant5(2, &int(value))
    }
}

#[test]
fn test_plain_qobject()
{
    for mut image in [Image::qt5(), Image::qt6()] {
        let object = image.qobject(None, &[]);
        let object = image.place(object);
        let inspector = image.finish();

        check_summary(&inspector, object, "QObject", None);
        check_children(&inspector, object, "QObject", &[("parent", "None"), ("children", "size=0")]);
    }
}

#[test]
fn test_named_qobject_with_dynamic_property()
{
    for mut image in [Image::qt5(), Image::qt6()] {
        let answer = int_variant(&mut image, 42);
        let object = image.qobject(Some("Peter"), &[("answer", answer)]);
        let object = image.place(object);
        let inspector = image.finish();

        check_summary(&inspector, object, "QObject", Some("{\"Peter\"}"));
        check_children(
            &inspector,
            object,
            "QObject",
            &[("parent", "None"), ("children", "size=0"), ("[answer]", "42")],
        );
    }
}

#[test]
fn test_unnamed_qobject_with_properties()
{
    let mut image = Image::qt6();
    let first = int_variant(&mut image, 1);
    let second = int_variant(&mut image, 2);
    let object = image.qobject(None, &[("first", first), ("second", second)]);
    let object = image.place(object);
    let inspector = image.finish();

    check_summary(&inspector, object, "QObject", None);
    check_children(
        &inspector,
        object,
        "QObject",
        &[("parent", "None"), ("children", "size=0"), ("[first]", "1"), ("[second]", "2")],
    );
}

#[test]
fn test_qcoreapplication_arguments()
{
    for mut image in [Image::qt5(), Image::qt6()] {
        let app = image.qcoreapplication(&["./app", "-v"]);
        let app = image.place(app);
        let inspector = image.finish();

        check_summary(&inspector, app, "QCoreApplication", Some("{\"./app\" \"-v\"}"));
        check_summary(&inspector, app, "QApplication", Some("{\"./app\" \"-v\"}"));
        check_children(&inspector, app, "QCoreApplication", &[("parent", "None"), ("children", "size=0")]);
    }
}

#[test]
fn test_qcoreapplication_argument_limit()
{
    let mut image = Image::qt6();
    let app = image.qcoreapplication(&["./app", "-v", "--verbose"]);
    let app = image.place(app);
    let inspector = image.finish_with(FormatOptions::default().with_max_children(1));

    check_summary(&inspector, app, "QCoreApplication", Some("{\"./app\" ...}"));
}
