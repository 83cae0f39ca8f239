//! Tests for depth limits, repeated requests, and tree rendering

mod common;

use common::{children_of, handle, int, Image};
use lumen_core::{ChildKey, FormatOptions, InspectRequest};

#[test]
fn test_depth_limit_marks_nested_children()
{
    let mut image = Image::qt6();
    let inner = image.qlist(&[int(1), int(2)]);
    let outer = image.qlist(&[inner]);
    let outer = image.place(outer);
    let inspector = image.finish_with(FormatOptions::default().with_max_depth(1));

    let root = handle(&inspector, outer, "QList<QList<int>>");
    let children = inspector.format(&root).children;
    assert_eq!(children.len(), 1);
    let nested = children[0].as_handle().unwrap();
    assert_eq!(nested.depth(), 1);

    let nested = inspector.format(nested);
    assert_eq!(nested.summary.as_deref(), Some("size=2"));
    assert_eq!(nested.children.len(), 1);
    assert_eq!(nested.children[0].key, ChildKey::Truncated);
    assert_eq!(children_of(&inspector, children[0].as_handle().unwrap()), [("...".to_string(), "<depth limit 1>".to_string())]);
}

#[test]
fn test_repeated_requests_agree()
{
    let mut image = Image::qt6();
    let text = image.qstring("again");
    let list = image.qlist(&[text]);
    let list = image.place(list);
    let inspector = image.finish();

    let request = InspectRequest::new(list, "QList<QString>");
    let first = inspector.respond(&request).unwrap();
    let second = inspector.respond(&request).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.summary.as_deref(), Some("size=1"));
}

#[test]
fn test_concurrent_requests_share_one_inspector()
{
    let mut image = Image::qt6();
    let text = image.qstring("shared");
    let inner = image.qlist(&[int(1), int(2)]);
    let list = image.qlist(&[inner]);
    let list = image.place(list);
    let text = image.place(text);
    let inspector = image.finish();

    let requests = [
        InspectRequest::new(list, "QList<QList<int>>"),
        InspectRequest::new(text, "QString"),
    ];
    let expected: Vec<_> = requests.iter().map(|request| inspector.respond(request).unwrap()).collect();

    std::thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    (0..16)
                        .map(|_| requests.iter().map(|request| inspector.respond(request).unwrap()).collect::<Vec<_>>())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for worker in workers {
            for results in worker.join().unwrap() {
                assert_eq!(results, expected);
            }
        }
    });
    assert_eq!(expected[0].summary.as_deref(), Some("size=1"));
    assert_eq!(expected[1].summary.as_deref(), Some("\"shared\""));
}

#[test]
fn test_request_options_override_defaults()
{
    let mut image = Image::qt6();
    let list = image.qlist(&[int(1), int(2), int(3)]);
    let list = image.place(list);
    let inspector = image.finish();

    let request = InspectRequest::new(list, "QList<int>").with_options(FormatOptions::default().with_max_children(1));
    let result = inspector.respond(&request).unwrap();
    assert_eq!(result.children.len(), 2);
    assert_eq!(result.children[1].key, ChildKey::Truncated);
    assert_eq!(inspector.format(&handle(&inspector, list, "QList<int>")).children.len(), 3);
}

#[test]
fn test_inspection_is_lazy_and_stable()
{
    let mut image = Image::qt6();
    let list = image.qlist(&[int(4)]);
    let list = image.place(list);
    let inspector = image.finish();

    let root = handle(&inspector, list, "QList<int>");
    let inspection = inspector.inspect(&root);
    assert_eq!(inspection.summary().as_deref(), Some("size=1"));
    assert_eq!(inspection.children().len(), 1);
    assert_eq!(inspection.summary().as_deref(), Some("size=1"));
    assert_eq!(inspection.into_result(), inspector.format(&root));
}

#[test]
fn test_malformed_type_name_is_an_error()
{
    let inspector = Image::qt6().finish();

    assert!(inspector.respond(&InspectRequest::new(0x1000u64, "QList<int")).is_err());
}

#[test]
fn test_render_tree()
{
    let mut image = Image::qt6();
    let first = image.qlist(&[int(1), int(2)]);
    let second = image.qlist(&[]);
    let outer = image.qlist(&[first, second]);
    let outer = image.place(outer);
    let inspector = image.finish();

    let root = handle(&inspector, outer, "QList<QList<int>>");
    assert_eq!(
        inspector.render_tree(&root, 2),
        "QList<QList<int>> = size=2\n  [0] = size=2\n    [0] = 1\n    [1] = 2\n  [1] = size=0\n"
    );
    assert_eq!(inspector.render_tree(&root, 0), "QList<QList<int>> = size=2\n");
}
