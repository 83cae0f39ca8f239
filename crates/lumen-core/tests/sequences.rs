//! Tests for sequential containers

mod common;

use common::{check_children, check_summary, int, Image};
use lumen_core::FormatOptions;

#[test]
fn test_empty_qlist()
{
    let mut image = Image::qt6();
    let list = image.qlist(&[]);
    let list = image.place(list);
    let inspector = image.finish();

    check_summary(&inspector, list, "QList<int>", Some("size=0"));
    check_children(&inspector, list, "QList<int>", &[]);
}

#[test]
fn test_default_constructed_qlist()
{
    let mut image = Image::qt6();
    let list = image.place(vec![0; 24]);
    let inspector = image.finish();

    check_summary(&inspector, list, "QList<int>", Some("size=0"));
    check_children(&inspector, list, "QList<int>", &[]);
}

#[test]
fn test_qlist_of_ints()
{
    let mut image = Image::qt6();
    let list = image.qlist(&[int(1), int(2), int(3), int(4)]);
    let list = image.place(list);
    let inspector = image.finish();

    check_summary(&inspector, list, "QList<int>", Some("size=4"));
    check_children(
        &inspector,
        list,
        "QList<int>",
        &[("[0]", "1"), ("[1]", "2"), ("[2]", "3"), ("[3]", "4")],
    );
}

#[test]
fn test_qt5_qlist_of_ints()
{
    let mut image = Image::qt5();
    let list = image.qlist(&[int(1), int(2), int(3), int(4)]);
    let list = image.place(list);
    let inspector = image.finish();

    check_summary(&inspector, list, "QList<int>", Some("size=4"));
    check_children(
        &inspector,
        list,
        "QList<int>",
        &[("[0]", "1"), ("[1]", "2"), ("[2]", "3"), ("[3]", "4")],
    );
}

#[test]
fn test_qstringlist_alias()
{
    for mut image in [Image::qt5(), Image::qt6()] {
        let a = image.qstring("a");
        let bc = image.qstring("bc");
        let list = image.qlist(&[a, bc]);
        let list = image.place(list);
        let inspector = image.finish();

        check_summary(&inspector, list, "QStringList", Some("size=2"));
        check_children(&inspector, list, "QStringList", &[("[0]", "\"a\""), ("[1]", "\"bc\"")]);
    }
}

#[test]
fn test_qt5_qvector_is_contiguous()
{
    let mut image = Image::qt5();
    let data: Vec<u8> = [7i32, 8].iter().flat_map(|v| v.to_le_bytes()).collect();
    let vector = image.shared_array(&data, 2);
    let vector = image.place(vector);
    let inspector = image.finish();

    check_children(&inspector, vector, "QVector<int>", &[("[0]", "7"), ("[1]", "8")]);
}

#[test]
fn test_std_vector()
{
    let mut image = Image::qt6();
    let vector = image.std_vector(&[int(10), int(20), int(30)]);
    let vector = image.place(vector);
    let inspector = image.finish();

    check_summary(&inspector, vector, "std::vector<int>", Some("size=3"));
    check_children(&inspector, vector, "std::vector<int>", &[("[0]", "10"), ("[1]", "20"), ("[2]", "30")]);
}

#[test]
fn test_std_vector_with_ragged_end_has_no_summary()
{
    let mut image = Image::qt6();
    let data = image.place(vec![0; 16]);
    let vector = image.place(common::Blob::new(24).u64(0, data).u64(8, data + 6).into_vec());
    let inspector = image.finish();

    check_summary(&inspector, vector, "std::vector<int>", None);
    check_children(&inspector, vector, "std::vector<int>", &[]);
}

#[test]
fn test_child_limit_appends_marker()
{
    let mut image = Image::qt6();
    let list = image.qlist(&[int(1), int(2), int(3), int(4)]);
    let list = image.place(list);
    let inspector = image.finish_with(FormatOptions::default().with_max_children(2));

    check_summary(&inspector, list, "QList<int>", Some("size=4"));
    check_children(&inspector, list, "QList<int>", &[("[0]", "1"), ("[1]", "2"), ("...", "<2 more>")]);
}

#[test]
fn test_children_follow_current_memory()
{
    let mut image = Image::qt6();
    let list = image.qlist(&[int(1), int(2), int(3)]);
    let address = image.place(list.clone());

    // Same storage after erasing the first element: data pointer advanced, size shrunk
    let data = u64::from_le_bytes(list[8..16].try_into().unwrap());
    image.write(address + 8, common::ptr(data + 4));
    image.write(address + 16, 2i64.to_le_bytes().to_vec());
    let inspector = image.finish();

    check_children(&inspector, address, "QList<int>", &[("[0]", "2"), ("[1]", "3")]);
}
