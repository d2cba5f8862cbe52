mod test_utils;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};
use test_utils::*;

use portfolio_i18n::entities::locale::Locale;

const U1: &str = "3f2b8c1e-9d4a-4e6b-8f1a-2c3d4e5f6a7b";

#[actix_rt::test]
async fn admin_routes_require_a_token() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::get().uri("/api/v1/admin/projects/tr").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/projects/tr")
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn non_admin_tokens_are_forbidden() {
    let ctx = TestContext::new();
    let token = ctx
        .state
        .auth_handler
        .token_service
        .create_jwt("visitor@example.com", false)
        .unwrap();
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/projects/tr")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn login_issues_a_token_that_opens_admin_routes() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let auth: Value = test::read_body_json(resp).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/health")
        .insert_header(("Authorization", format!("Bearer {}", auth["access_token"].as_str().unwrap())))
        .to_request();
    let health: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(health["database"], "OK");

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": ADMIN_EMAIL, "password": "wrong" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn created_translation_joins_its_sibling() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/projects/tr")
        .insert_header(ctx.bearer())
        .set_json(json!({
            "title": "Mavi Vazo",
            "description": "Sırlı **stoneware** vazo.",
            "technologies": ["stoneware", "sır"],
            "images": ["/uploads/vazo.jpg"],
            "status": true
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let tr: Value = test::read_body_json(resp).await;
    assert_eq!(tr["id"], "mavi-vazo");
    assert_eq!(tr["seo"]["metaTitle"], "Mavi Vazo");

    let original_id = tr["originalId"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/projects/en")
        .insert_header(ctx.bearer())
        .set_json(json!({ "originalId": original_id, "title": "Blue Vase", "status": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let en: Value = test::read_body_json(resp).await;
    assert_eq!(en["id"], "blue-vase");
    assert_eq!(en["images"], json!(["/uploads/vazo.jpg"]));

    let req = test::TestRequest::get().uri("/api/v1/tr/projects/mavi-vazo").to_request();
    let detail: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["title"], "Mavi Vazo");
    assert_eq!(detail["description"], "Sırlı **stoneware** vazo.");
    assert_eq!(detail["images"], json!(["/uploads/vazo.jpg"]));
    assert!(detail["descriptionHtml"].as_str().unwrap().contains("<strong>stoneware</strong>"));
    assert_eq!(detail["translations"]["en"], "blue-vase");
}

#[actix_rt::test]
async fn duplicate_translations_are_rejected() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
        let req = test::TestRequest::post()
            .uri("/api/v1/admin/projects/tr")
            .insert_header(ctx.bearer())
            .set_json(json!({ "originalId": U1, "title": "Vazo" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), expected);
    }

    assert_eq!(ctx.projects.count_original_id(U1), 1);
}

#[actix_rt::test]
async fn image_updates_reach_the_sibling() {
    let ctx = TestContext::new();
    ctx.projects.seed(project(Locale::Tr, "vazo-1", U1, true));
    ctx.projects.seed(project(Locale::En, "vase-1", U1, true));
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::patch()
        .uri("/api/v1/admin/projects/tr/vazo-1")
        .insert_header(ctx.bearer())
        .set_json(json!({ "images": ["/uploads/a.jpg", "/uploads/b.jpg"] }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let en = ctx.projects.get(Locale::En, U1).unwrap();
    assert_eq!(en.images, vec!["/uploads/a.jpg".to_string(), "/uploads/b.jpg".to_string()]);
}

#[actix_rt::test]
async fn updates_keep_the_shared_id_and_leave_the_sibling_text_alone() {
    let ctx = TestContext::new();
    ctx.projects.seed(project(Locale::Tr, "vazo-1", U1, true));
    ctx.projects.seed(project(Locale::En, "vase-1", U1, true));
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::patch()
        .uri("/api/v1/admin/projects/tr/vazo-1")
        .insert_header(ctx.bearer())
        .set_json(json!({ "originalId": "hijack", "status": false, "title": "Yeşil Vazo" }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(updated["originalId"], U1);
    assert_eq!(updated["id"], "yesil-vazo");
    assert_eq!(updated["status"], false);

    let en = ctx.projects.get(Locale::En, U1).unwrap();
    assert!(en.status);
    assert_eq!(en.title, "vase 1");
}

#[actix_rt::test]
async fn delete_removes_both_records_and_their_files() {
    let ctx = TestContext::new();
    let mut tr = project(Locale::Tr, "vazo-1", U1, true);
    tr.images = vec!["/uploads/a.jpg".into(), "https://cdn.example.com/x.jpg".into()];
    let mut en = project(Locale::En, "vase-1", U1, true);
    en.images = vec!["/uploads/a.jpg".into(), "/uploads/b.jpg".into()];
    ctx.projects.seed(tr);
    ctx.projects.seed(en);
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::delete()
        .uri("/api/v1/admin/projects/en/vazo-1")
        .insert_header(ctx.bearer())
        .to_request();
    let report: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(report["siblingFound"], true);
    assert_eq!(report["deleted"], json!(["en", "tr"]));
    assert_eq!(report["removedImages"], json!(["/uploads/a.jpg", "/uploads/b.jpg"]));
    assert_eq!(ctx.projects.count_original_id(U1), 0);
    assert_eq!(ctx.images.removed.lock().len(), 2);
}

#[actix_rt::test]
async fn delete_keeps_files_still_listed_by_another_project() {
    let ctx = TestContext::new();
    let mut tr = project(Locale::Tr, "vazo-1", U1, true);
    tr.images = vec!["/uploads/a.jpg".into(), "/uploads/shared.jpg".into()];
    let mut other = project(Locale::Tr, "kase", "U2", true);
    other.images = vec!["/uploads/shared.jpg".into()];
    ctx.projects.seed(tr);
    ctx.projects.seed(other);
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::delete()
        .uri("/api/v1/admin/projects/tr/vazo-1")
        .insert_header(ctx.bearer())
        .to_request();
    let report: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(report["removedImages"], json!(["/uploads/a.jpg"]));
    assert_eq!(report["retainedImages"], json!(["/uploads/shared.jpg"]));
    assert!(!ctx.images.removed.lock().contains(&"/uploads/shared.jpg".to_string()));
    assert_eq!(ctx.projects.count_original_id("U2"), 1);
}

#[actix_rt::test]
async fn delete_without_sibling_succeeds_and_reports_cleanup_failures() {
    let ctx = TestContext::new();
    let mut tr = project(Locale::Tr, "tek", U1, false);
    tr.images = vec!["/uploads/locked.jpg".into()];
    ctx.projects.seed(tr);
    ctx.images.failing.lock().insert("/uploads/locked.jpg".into());
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/admin/projects/tr/{}", U1))
        .insert_header(ctx.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let report: Value = test::read_body_json(resp).await;
    assert_eq!(report["siblingFound"], false);
    assert_eq!(report["cleanupErrors"][0]["url"], "/uploads/locked.jpg");
    assert_eq!(ctx.projects.count_original_id(U1), 0);
}

#[actix_rt::test]
async fn reorder_reports_unknown_ids() {
    let ctx = TestContext::new();
    ctx.projects.seed(project(Locale::Tr, "bir", "p-1", true));
    ctx.projects.seed(project(Locale::Tr, "iki", "p-2", true));
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::put()
        .uri("/api/v1/admin/projects/tr/order")
        .insert_header(ctx.bearer())
        .set_json(json!({ "originalIds": ["p-2", "p-1", "p-9"] }))
        .to_request();
    let report: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(report["updated"], 2);
    assert_eq!(report["missing"], json!(["p-9"]));
    assert_eq!(ctx.projects.get(Locale::Tr, "p-2").unwrap().order, 0);
    assert_eq!(ctx.projects.get(Locale::Tr, "p-1").unwrap().order, 1);
}

#[actix_rt::test]
async fn malformed_json_gets_a_json_error() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/projects/tr")
        .insert_header(ctx.bearer())
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}
