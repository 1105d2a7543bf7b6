use folio_core::{parse_work, parse_works};

#[test]
fn missing_fields_fall_back_to_defaults() {
    let works = parse_works(r#"[{"id": 7}, {"title": "Sans image"}]"#).expect("lenient parse");
    assert_eq!(works.len(), 2);
    assert_eq!(works[0].id, 7);
    assert_eq!(works[0].title, "");
    assert_eq!(works[0].image_url, "");
    assert_eq!(works[0].category_name(), "");
    assert_eq!(works[1].title, "Sans image");
}

#[test]
fn created_work_parses_without_nested_category() {
    let work = parse_work(
        r#"{"id": 12, "title": "Jardin", "imageUrl": "http://localhost:5678/images/jardin.png",
            "categoryId": 3, "userId": 1}"#,
    )
    .expect("created work parses");
    assert_eq!(work.category_id, Some(3));
    assert_eq!(work.category.name, "");
}

#[test]
fn malformed_body_is_an_error() {
    assert!(parse_works("<html>").is_err());
}

#[test]
fn null_fields_fall_back_to_defaults() {
    let works = parse_works(
        r#"[
            {"id": 1, "title": "A", "imageUrl": "images/a.png", "category": {"id": 1, "name": "Objets"}},
            {"id": 2, "title": "B", "imageUrl": null, "category": {"id": 1, "name": "Objets"}},
            {"id": 3, "title": null, "imageUrl": "images/c.png", "category": null},
            {"id": null, "title": "D", "category": {"id": null, "name": null}}
        ]"#,
    )
    .expect("null fields tolerated");
    assert_eq!(works.len(), 4);
    assert_eq!(works[0].category_name(), "Objets");
    assert_eq!(works[1].image_url, "");
    assert_eq!(works[1].title, "B");
    assert_eq!(works[2].title, "");
    assert_eq!(works[2].category_name(), "");
    assert_eq!(works[3].id, 0);
    assert_eq!(works[3].category.id, 0);
}
