mod common;

use axum::http::StatusCode;
use bizdesk::models::{contract, person, work};
use common::*;
use sea_orm::{EntityTrait, PaginatorTrait};

#[tokio::test]
async fn test_empty_list_is_a_valid_page() {
    let app = TestApp::new().await;

    let response = app.get("/people/", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["count"], 0);
    assert_eq!(body["object_list"], serde_json::json!([]));
    assert_eq!(body["page"]["number"], 1);
    assert_eq!(body["page"]["has_next"], false);
}

#[tokio::test]
async fn test_person_search_matches_first_name_or_company() {
    let app = TestApp::new().await;
    create_person(&app.db, "Maria", Some("Acme"), "p").await;
    create_person(&app.db, "João", Some("Beta Engenharia"), "p").await;
    create_person(&app.db, "Carla", None, "c").await;

    let body = body_json(app.get("/people/?search_box=mar", None).await).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["object_list"][0]["first_name"], "Maria");
    assert_eq!(body["search_box"], "mar");

    let body = body_json(app.get("/people/?search_box=ACME", None).await).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["object_list"][0]["first_name"], "Maria");

    let body = body_json(app.get("/people/?search_box=beta+eng", None).await).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["object_list"][0]["company"], "Beta Engenharia");

    // Wildcards are matched literally
    let body = body_json(app.get("/people/?search_box=%25", None).await).await;
    assert_eq!(body["count"], 0);

    // Blank search lists everything
    let body = body_json(app.get("/people/?search_box=+++", None).await).await;
    assert_eq!(body["count"], 3);
}

#[tokio::test]
async fn test_pagination_past_the_end_is_empty() {
    let app = TestApp::new().await;
    for i in 0..25 {
        create_person(&app.db, &format!("Pessoa {:02}", i), None, "p").await;
    }

    let body = body_json(app.get("/people/?page=3", None).await).await;
    assert_eq!(body["count"], 25);
    assert_eq!(body["object_list"].as_array().unwrap().len(), 5);
    assert_eq!(body["page"]["num_pages"], 3);
    assert_eq!(body["page"]["has_next"], false);
    assert_eq!(body["page"]["has_previous"], true);
    assert_eq!(body["object_list"][0]["first_name"], "Pessoa 20");

    let response = app.get("/people/?page=4", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["object_list"].as_array().unwrap().len(), 0);

    for bad in ["abc", "0", "-2"] {
        let body = body_json(app.get(&format!("/people/?page={}", bad), None).await).await;
        assert_eq!(body["page"]["number"], 1);
        assert_eq!(body["object_list"].as_array().unwrap().len(), 10);
    }
}

#[tokio::test]
async fn test_customer_screen_is_scoped_to_customers() {
    let app = TestApp::new().await;
    let plain = create_person(&app.db, "Carla", None, "p").await;
    let customer = create_person(&app.db, "Dora", Some("Dora Obras"), "c").await;

    let body = body_json(app.get("/customers/", None).await).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["object_list"][0]["id"], customer);

    let response = app.get(&format!("/customers/{}/", plain), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get(&format!("/customers/{}/", customer), None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_detail_unknown_and_malformed_ids() {
    let app = TestApp::new().await;

    let response = app.get("/works/999/", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert!(body["error"].is_string());

    let response = app.get("/works/abc/", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_person_redirects_with_flash() {
    let app = TestApp::new().await;
    create_user(&app.db, "ana", "Ana", "s3nha", true).await;
    let session = app.session("ana");

    let response = app
        .post_form(
            "/people/new/",
            &[("first_name", "Ana Paula"), ("email", "ana@example.com")],
            Some(&session),
        )
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/people/");
    let flash = set_cookie(&response, "flash").expect("flash cookie");

    let people = person::Entity::find().all(&app.db).await.unwrap();
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].first_name, "Ana Paula");
    assert_eq!(people[0].person_type, "p");
    assert_eq!(people[0].email.as_deref(), Some("ana@example.com"));

    // The next page shows the message once and clears it
    let response = app.get("/people/", Some(&flash)).await;
    assert_eq!(set_cookie(&response, "flash").as_deref(), Some("flash="));
    let body = body_json(response).await;
    assert_eq!(body["messages"], serde_json::json!(["Pessoa criada!"]));

    let body = body_json(app.get("/people/", None).await).await;
    assert_eq!(body["messages"], serde_json::json!([]));
}

#[tokio::test]
async fn test_customer_create_sets_customer_type() {
    let app = TestApp::new().await;
    let session = app.session("ana");

    let response = app
        .post_form("/customers/new/", &[("first_name", "Eva")], Some(&session))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/customers/");

    let people = person::Entity::find().all(&app.db).await.unwrap();
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].person_type, "c");
}

#[tokio::test]
async fn test_invalid_create_rerenders_form_without_writing() {
    let app = TestApp::new().await;
    let session = app.session("ana");

    let response = app
        .post_form(
            "/people/new/",
            &[("first_name", "   "), ("email", "not-an-email"), ("company", "Acme")],
            Some(&session),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["errors"]["first_name"].is_array());
    assert!(body["errors"]["email"].is_array());
    assert_eq!(body["values"]["company"], "Acme");
    assert_eq!(body["action"], "/people/new/");

    assert_eq!(person::Entity::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let app = TestApp::new().await;
    let session = app.session("ana");

    let response = app
        .post_form("/people/999/edit/", &[("first_name", "X")], Some(&session))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get("/people/999/edit/", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(person::Entity::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_rewrites_row_in_place() {
    let app = TestApp::new().await;
    let session = app.session("ana");
    let id = create_person(&app.db, "Bia", Some("Velha"), "c").await;

    let body = body_json(app.get(&format!("/people/{}/edit/", id), Some(&session)).await).await;
    assert_eq!(body["values"]["first_name"], "Bia");
    assert_eq!(body["values"]["company"], "Velha");

    let response = app
        .post_form(
            &format!("/people/{}/edit/", id),
            &[("first_name", "Beatriz"), ("company", "")],
            Some(&session),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/people/");

    let people = person::Entity::find().all(&app.db).await.unwrap();
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].first_name, "Beatriz");
    assert_eq!(people[0].company, None);
    // Editing never changes the person type
    assert_eq!(people[0].person_type, "c");
}

#[tokio::test]
async fn test_work_customer_must_be_a_customer() {
    let app = TestApp::new().await;
    let session = app.session("ana");
    let plain = create_person(&app.db, "Carla", None, "p").await;
    let customer = create_person(&app.db, "Dora", None, "c").await;

    let response = app
        .post_form(
            "/works/new/",
            &[("name_work", "Galpão"), ("customer", &plain.to_string())],
            Some(&session),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["errors"]["customer"].is_array());
    assert_eq!(work::Entity::find().count(&app.db).await.unwrap(), 0);

    let response = app
        .post_form(
            "/works/new/",
            &[("name_work", "Galpão"), ("customer", &customer.to_string())],
            Some(&session),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let body = body_json(app.get("/works/?search_box=dora", None).await).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["object_list"][0]["customer_name"], "Dora");
}

#[tokio::test]
async fn test_new_form_lists_choices() {
    let app = TestApp::new().await;
    let session = app.session("ana");
    create_person(&app.db, "Carla", None, "p").await;
    let customer = create_person(&app.db, "Dora", None, "c").await;

    let response = app.get("/works/new/", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["errors"], serde_json::json!({}));
    let customers = body["choices"]["customer"].as_array().unwrap();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0]["value"], customer.to_string());
}

#[tokio::test]
async fn test_unauthenticated_write_redirects_to_login() {
    let app = TestApp::new().await;
    let customer = create_person(&app.db, "Dora", None, "c").await;

    let response = app
        .post_form(
            "/works/new/",
            &[("name_work", "Galpão"), ("customer", &customer.to_string())],
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/accounts/login/?next=%2Fworks%2Fnew%2F");
    assert_eq!(work::Entity::find().count(&app.db).await.unwrap(), 0);

    let response = app.get("/people/1/edit/", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/accounts/login/?next=%2Fpeople%2F1%2Fedit%2F");

    // Reads stay public
    assert_eq!(app.get("/works/", None).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_contract_is_unique_per_proposal() {
    let app = TestApp::new().await;
    let fixture = create_fixture(&app.db).await;
    let session = app.session("ana");
    let proposal_id = create_proposal(&app.db, &fixture, 1, "c").await;

    let fields = [
        ("proposal", proposal_id.to_string()),
        ("contract_value", "1200,50".to_string()),
        ("is_canceled", "on".to_string()),
    ];
    let fields: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, v.as_str())).collect();

    let response = app.post_form("/contracts/new/", &fields, Some(&session)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/contracts/");

    let response = app.post_form("/contracts/new/", &fields, Some(&session)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["errors"]["proposal"].is_array());

    let contracts = contract::Entity::find().all(&app.db).await.unwrap();
    assert_eq!(contracts.len(), 1);
    assert_eq!(contracts[0].contract_value, Some(1200.5));
    assert!(contracts[0].is_canceled);

    // Re-saving the same contract keeps its proposal
    let response = app
        .post_form(
            &format!("/contracts/{}/edit/", contracts[0].id),
            &fields,
            Some(&session),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let body = body_json(app.get(&format!("/contracts/{}/", contracts[0].id), None).await).await;
    assert_eq!(body["object"]["num_prop"], 1);
}

#[tokio::test]
async fn test_search_folds_accented_capitals() {
    let app = TestApp::new().await;
    let session = app.session("ana");
    create_person(&app.db, "JOÃO", None, "p").await;
    create_person(&app.db, "Érica", Some("CONSTRUÇÕES ÁGUA"), "p").await;
    create_person(&app.db, "Joana", None, "p").await;

    let body = body_json(app.get("/people/?search_box=jo%C3%A3o", None).await).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["object_list"][0]["first_name"], "JOÃO");

    let body = body_json(app.get("/people/?search_box=%C3%A9rica", None).await).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["object_list"][0]["first_name"], "Érica");

    let body = body_json(app.get("/people/?search_box=constru%C3%A7%C3%B5es+%C3%A1gua", None).await).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["object_list"][0]["company"], "CONSTRUÇÕES ÁGUA");

    // Search keys follow edits made through the form
    let id = create_person(&app.db, "Bia", None, "p").await;
    let response = app
        .post_form(
            &format!("/people/{}/edit/", id),
            &[("first_name", "ÍTALO")],
            Some(&session),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let body = body_json(app.get("/people/?search_box=%C3%ADtalo", None).await).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["object_list"][0]["id"], id);
    let body = body_json(app.get("/people/?search_box=bia", None).await).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_work_search_matches_work_name() {
    let app = TestApp::new().await;
    let dora = create_person(&app.db, "Dora", None, "c").await;
    let aurora = create_work(&app.db, "EDIFÍCIO Aurora", dora).await;
    create_work(&app.db, "Galpão Leste", dora).await;

    let body = body_json(app.get("/works/?search_box=aurora", None).await).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["object_list"][0]["id"], aurora);

    let body = body_json(app.get("/works/?search_box=edif%C3%ADcio", None).await).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["object_list"][0]["name_work"], "EDIFÍCIO Aurora");

    let body = body_json(app.get("/works/?search_box=leste", None).await).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["object_list"][0]["name_work"], "Galpão Leste");
}

#[tokio::test]
async fn test_entry_search_covers_work_and_customer() {
    let app = TestApp::new().await;
    let fixture = create_fixture(&app.db).await;
    let bruno = create_person(&app.db, "Bruno", None, "c").await;
    let galpao = create_work(&app.db, "Galpão Leste", bruno).await;

    let aurora_entry = create_entry(
        &app.db,
        fixture.category_id,
        fixture.work_id,
        fixture.contact_id,
        fixture.employee_id,
    )
    .await;
    let galpao_entry = create_entry(
        &app.db,
        fixture.category_id,
        galpao,
        fixture.contact_id,
        fixture.employee_id,
    )
    .await;

    let body = body_json(app.get("/entries/?search_box=aurora", None).await).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["object_list"][0]["id"], aurora_entry);

    let body = body_json(app.get("/entries/?search_box=BRUNO", None).await).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["object_list"][0]["id"], galpao_entry);
    assert_eq!(body["object_list"][0]["customer_name"], "Bruno");

    // Contact names are not searched
    let body = body_json(app.get("/entries/?search_box=carla", None).await).await;
    assert_eq!(body["count"], 0);

    // Promoted entries stay out of search results
    let session = app.session("ana");
    let response = app
        .post_form(&format!("/entries/{}/promote/", galpao_entry), &[], Some(&session))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let body = body_json(app.get("/entries/?search_box=bruno", None).await).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_entry_create_and_update_notifications() {
    let app = TestApp::new().await;
    let fixture = create_fixture(&app.db).await;
    let session = app.session("ana");

    let category = fixture.category_id.to_string();
    let work = fixture.work_id.to_string();
    let contact = fixture.contact_id.to_string();
    let seller = fixture.employee_id.to_string();
    let fields = [
        ("category", category.as_str()),
        ("description", "Quadro de força"),
        ("work", work.as_str()),
        ("person", contact.as_str()),
        ("seller", seller.as_str()),
    ];

    let response = app.post_form("/entries/new/", &fields, Some(&session)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/entries/");
    let flash = set_cookie(&response, "flash").expect("flash cookie");

    let body = body_json(app.get("/entries/", Some(&flash)).await).await;
    assert_eq!(body["messages"], serde_json::json!(["Entrada criada!"]));
    assert_eq!(body["count"], 1);
    let id = body["object_list"][0]["id"].as_i64().unwrap();

    let mut edited = fields.to_vec();
    edited[1] = ("description", "Quadro de força e iluminação");
    let response = app
        .post_form(&format!("/entries/{}/edit/", id), &edited, Some(&session))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/entries/");
    let flash = set_cookie(&response, "flash").expect("flash cookie");

    let body = body_json(app.get("/entries/", Some(&flash)).await).await;
    assert_eq!(body["messages"], serde_json::json!(["Entrada atualizada!"]));
    assert_eq!(body["object_list"][0]["description"], "Quadro de força e iluminação");
}
