use folio_core::{distinct_categories, filter_choices, filter_works, parse_works, FilterChoice, Work};

fn sample_works() -> Vec<Work> {
    let body = r#"[
        {"id": 1, "title": "Abajour Tahina", "imageUrl": "http://localhost:5678/images/abajour.png",
         "categoryId": 1, "userId": 1, "category": {"id": 1, "name": "Objets"}},
        {"id": 2, "title": "Appartement Paris V", "imageUrl": "http://localhost:5678/images/paris-v.png",
         "categoryId": 2, "userId": 1, "category": {"id": 2, "name": "Appartements"}},
        {"id": 3, "title": "Restaurant Sushisen", "imageUrl": "http://localhost:5678/images/sushisen.png",
         "categoryId": 3, "userId": 1, "category": {"id": 3, "name": "Hotels & restaurants"}},
        {"id": 4, "title": "Villa Ferneze", "imageUrl": "http://localhost:5678/images/ferneze.png",
         "categoryId": 2, "userId": 1, "category": {"id": 2, "name": "Appartements"}}
    ]"#;
    parse_works(body).expect("sample works parse")
}

#[test]
fn categories_keep_first_appearance_order() {
    let works = sample_works();
    let names: Vec<_> = distinct_categories(&works)
        .into_iter()
        .map(|category| category.name)
        .collect();
    assert_eq!(names, vec!["Objets", "Appartements", "Hotels & restaurants"]);
}

#[test]
fn category_keeps_id_of_first_work() {
    let works = sample_works();
    let categories = distinct_categories(&works);
    assert_eq!(categories[1].id, 2);
}

#[test]
fn choices_start_with_all() {
    let works = sample_works();
    let choices = filter_choices(&works);
    assert_eq!(choices.len(), 4);
    assert_eq!(choices[0], FilterChoice::All);
    assert_eq!(choices[0].label(), "Tous");
    assert_eq!(choices[2].label(), "Appartements");
}

#[test]
fn category_filter_selects_exact_subset() {
    let works = sample_works();
    let filtered = filter_works(&works, &FilterChoice::Category("Appartements".to_string()));
    let ids: Vec<_> = filtered.iter().map(|work| work.id).collect();
    assert_eq!(ids, vec![2, 4]);
}

#[test]
fn all_filter_restores_everything() {
    let works = sample_works();
    let narrowed = filter_works(&works, &FilterChoice::Category("Objets".to_string()));
    assert_eq!(narrowed.len(), 1);
    let restored = filter_works(&works, &FilterChoice::All);
    assert_eq!(restored, works);
}

#[test]
fn unknown_category_yields_nothing() {
    let works = sample_works();
    let filtered = filter_works(&works, &FilterChoice::Category("Jardins".to_string()));
    assert!(filtered.is_empty());
}

#[test]
fn empty_works_only_offer_all() {
    assert_eq!(filter_choices(&[]), vec![FilterChoice::All]);
}
