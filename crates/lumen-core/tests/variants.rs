//! Tests for `QVariant` delegation

mod common;

use common::{check_children, check_summary, int, ptr, Blob, Image};

#[test]
fn test_qt6_variant_of_int()
{
    let mut image = Image::qt6();
    let variant = image.qvariant6("int", &int(42));
    let variant = image.place(variant);
    let inspector = image.finish();

    check_summary(&inspector, variant, "QVariant", Some("42"));
    check_children(&inspector, variant, "QVariant", &[]);
}

#[test]
fn test_qt6_variant_of_string()
{
    let mut image = Image::qt6();
    let text = image.qstring("Hello");
    let variant = image.qvariant6("QString", &text);
    let variant = image.place(variant);
    let inspector = image.finish();

    check_summary(&inspector, variant, "QVariant", Some("\"Hello\""));
}

#[test]
fn test_qt6_variant_of_list_delegates_children()
{
    let mut image = Image::qt6();
    let list = image.qlist(&[int(3), int(4)]);
    let variant = image.qvariant6("QList<int>", &list);
    let variant = image.place(variant);
    let inspector = image.finish();

    check_summary(&inspector, variant, "QVariant", Some("size=2"));
    check_children(&inspector, variant, "QVariant", &[("[0]", "3"), ("[1]", "4")]);
}

#[test]
fn test_qt6_shared_variant()
{
    let mut image = Image::qt6();
    let name = image.place(b"QRect\0".to_vec());
    let interface = image.place(Blob::new(32).u32(4, 16).u64(24, name).into_vec());
    let rect = Blob::new(16).i32(8, 9).i32(12, 4).into_vec();
    let shared = image.place(Blob::new(16).i32(0, 1).i32(4, 16).bytes(16, &rect).into_vec());
    let variant = Blob::new(32).u64(0, shared).u64(24, (interface >> 2) | (1 << 62));
    let variant = image.place(variant.into_vec());
    let inspector = image.finish();

    check_summary(&inspector, variant, "QVariant", Some("10x5+0+0"));
}

#[test]
fn test_empty_variant()
{
    for mut image in [Image::qt5(), Image::qt6()] {
        let variant = image.place(vec![0; 32]);
        let inspector = image.finish();

        check_summary(&inspector, variant, "QVariant", None);
        check_children(&inspector, variant, "QVariant", &[]);
    }
}

#[test]
fn test_qt5_builtin_variants()
{
    let mut image = Image::qt5();
    let number = image.qvariant5(2, &int(7));
    let number = image.place(number);
    let text = image.qstring("five");
    let text = image.qvariant5(10, &text);
    let text = image.place(text);
    let flag = image.qvariant5(1, &[1]);
    let flag = image.place(flag);
    let inspector = image.finish();

    check_summary(&inspector, number, "QVariant", Some("7"));
    check_summary(&inspector, text, "QVariant", Some("\"five\""));
    check_summary(&inspector, flag, "QVariant", Some("true"));
}

#[test]
fn test_qt5_shared_variant()
{
    let mut image = Image::qt5();
    let rect = image.place(Blob::new(16).i32(0, 1).i32(4, 2).i32(8, 3).i32(12, 4).into_vec());
    let private = image.place(ptr(rect));
    let variant = Blob::new(16).u64(0, private).u32(8, 19 | (1 << 30));
    let variant = image.place(variant.into_vec());
    let inspector = image.finish();

    check_summary(&inspector, variant, "QVariant", Some("3x3+1+2"));
    check_children(
        &inspector,
        variant,
        "QVariant",
        &[("x1", "1"), ("y1", "2"), ("x2", "3"), ("y2", "4")],
    );
}

#[test]
fn test_qt5_unknown_type_id_has_no_summary()
{
    let mut image = Image::qt5();
    let variant = image.qvariant5(1024, &int(1));
    let variant = image.place(variant);
    let inspector = image.finish();

    check_summary(&inspector, variant, "QVariant", None);
    check_children(&inspector, variant, "QVariant", &[]);
}
